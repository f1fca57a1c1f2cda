use std::fs::read_to_string;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::exit;

use clap::Parser;

use tin::{evaluate, Environment};


/// The Tin interpreter. Runs a script, or starts an interactive session
/// when no script is given.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Path to a script to evaluate.
    path: Option<PathBuf>,
}


fn main() {
    let args = Cli::parse();

    match args.path {
        Some(path) => {
            let source = read_to_string(&path).unwrap_or_else(|err| {
                eprintln!("Error: {}: {}", path.display(), err);
                exit(1);
            });
            let result = evaluate(&source, &Environment::new());
            println!("{}", result.inspect());
            if result.is_error() {
                exit(1);
            }
        }
        None => {
            if let Err(err) = repl() {
                eprintln!("Error: {}", err);
                exit(1);
            }
        }
    }
}


/// Read a line, evaluate it against a persistent environment, print the
/// result, repeat.
fn repl() -> io::Result<()> {
    let env = Environment::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    write!(stdout, ">> ")?;
    stdout.flush()?;

    for line in stdin.lock().lines() {
        let line = line?;
        if !line.trim().is_empty() {
            let result = evaluate(&line, &env);
            writeln!(stdout, "{}", result.inspect())?;
        }
        write!(stdout, ">> ")?;
        stdout.flush()?;
    }

    writeln!(stdout)?;
    Ok(())
}
