use std::fmt::Display;

use gc::{Finalize, Trace};

use crate::types::{BinOp, Key, UnOp};

// Program
// ----------------------------------------------------------------

/// A parsed program: an ordered sequence of statements. The program owns the
/// whole tree; nothing in it changes after parsing.
#[derive(Debug, Clone, PartialEq, Trace, Finalize)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for statement in &self.statements {
            statement.fmt(f)?;
        }
        Ok(())
    }
}

// Stmt
// ----------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Trace, Finalize)]
pub enum Stmt {
    /// Bind the value of an expression to a name in the current scope.
    Let {
        #[unsafe_ignore_trace]
        name: Key,
        value: Expr,
    },

    /// Return a value from the enclosing function.
    Return(Expr),

    /// An expression in statement position; its value is the value of the
    /// statement.
    Expr(Expr),
}

impl Display for Stmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Let { name, value } => write!(f, "let {} = {};", name, value),
            Self::Return(value) => write!(f, "return {};", value),
            Self::Expr(value) => value.fmt(f),
        }
    }
}

// Block
// ----------------------------------------------------------------

/// A brace-delimited statement sequence, used by `if` and `fn`.
#[derive(Debug, Clone, PartialEq, Trace, Finalize)]
pub struct Block(pub Vec<Stmt>);

impl Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for statement in &self.0 {
            statement.fmt(f)?;
        }
        Ok(())
    }
}

// Expr
// ----------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Trace, Finalize)]
pub enum Expr {
    /// A name to look up at evaluation time.
    Identifier(#[unsafe_ignore_trace] Key),

    /// Integer literal.
    Integer(i64),

    /// Boolean literal.
    Boolean(bool),

    /// String literal. The parser interns the raw bytes between the quotes.
    StringLit(#[unsafe_ignore_trace] Key),

    /// Array literal.
    List(Vec<Expr>),

    /// Hash literal, as written: a sequence of key-value expression pairs.
    Map(Vec<(Expr, Expr)>),

    /// Function literal. Evaluation captures the current environment.
    Function {
        #[unsafe_ignore_trace]
        params: Vec<Key>,
        body: Block,
    },

    /// Prefix operator application.
    Prefix(#[unsafe_ignore_trace] UnOp, Box<Expr>),

    /// Infix operator application.
    Infix(#[unsafe_ignore_trace] BinOp, Box<Expr>, Box<Expr>),

    /// Conditional, with an optional alternative.
    If {
        condition: Box<Expr>,
        consequence: Block,
        alternative: Option<Block>,
    },

    /// Function call.
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },

    /// The index operator.
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
    },
}

impl Expr {
    pub fn id(name: &str) -> Expr {
        Expr::Identifier(Key::new(name))
    }

    pub fn string(text: &str) -> Expr {
        Expr::StringLit(Key::new(text))
    }
}

// The canonical string form: infix and prefix applications are fully
// parenthesised, so precedence is visible in the output and the output
// re-parses to a tree of the same shape.
impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier(name) => name.fmt(f),
            Self::Integer(value) => value.fmt(f),
            Self::Boolean(value) => value.fmt(f),
            Self::StringLit(text) => text.fmt(f),

            Self::List(elements) => {
                let inner: Vec<String> = elements.iter().map(Expr::to_string).collect();
                write!(f, "[{}]", inner.join(","))
            }

            Self::Map(pairs) => {
                let inner: Vec<String> = pairs
                    .iter()
                    .map(|(key, value)| format!("{}:{}", key, value))
                    .collect();
                write!(f, "{{{}}}", inner.join(", "))
            }

            Self::Function { params, body } => {
                let names: Vec<&str> = params.iter().map(Key::as_str).collect();
                write!(f, "fn({}) {{{}}}", names.join(", "), body)
            }

            Self::Prefix(op, right) => write!(f, "({}{})", op, right),

            Self::Infix(op, left, right) => write!(f, "({} {} {})", left, op, right),

            Self::If { condition, consequence, alternative } => {
                write!(f, "if ({}) {{{}}}", condition, consequence)?;
                if let Some(block) = alternative {
                    write!(f, " else {{{}}}", block)?;
                }
                Ok(())
            }

            Self::Call { callee, args } => {
                let inner: Vec<String> = args.iter().map(Expr::to_string).collect();
                write!(f, "{}({})", callee, inner.join(","))
            }

            Self::Index { target, index } => write!(f, "({}[{}])", target, index),
        }
    }
}
