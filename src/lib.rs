//! Tin is a small dynamically typed scripting language: integers, booleans,
//! strings, arrays, hashes and first-class functions with lexical closures,
//! evaluated by walking the syntax tree.
//!
//! The pipeline is a single-pass lexer ([`lexing`]), a Pratt parser
//! ([`parsing`]) and a recursive evaluator ([`eval`]) over a chain of
//! shared-ownership environments. Runtime errors are values: they propagate
//! through evaluation and come back as the final result, so the only
//! fallible host-facing surface is the syntax.

#[macro_use]
extern crate lazy_static;

mod builtins;

pub mod ast;
pub mod error;
pub mod eval;
pub mod lexing;
pub mod object;
pub mod parsing;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::{Location, SyntaxError};
pub use eval::Environment;
pub use object::Object;
pub use parsing::parse;


/// Evaluate a source string against an existing environment.
///
/// Parser errors are surfaced as a single error object with all messages
/// joined, so the result of this function is always a value fit for
/// printing.
pub fn evaluate(input: &str, env: &Environment) -> Object {
    match parsing::parse(input) {
        Ok(program) => eval::eval_program(&program, env),
        Err(errors) => {
            let messages: Vec<String> = errors.iter().map(SyntaxError::to_string).collect();
            Object::error(messages.join("\n"))
        }
    }
}


/// Evaluate a source string against a fresh root environment.
pub fn eval_raw(input: &str) -> Object {
    evaluate(input, &Environment::new())
}
