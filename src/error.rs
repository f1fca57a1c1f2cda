use std::fmt::Display;
use std::ops::Range;

use serde::{Serialize, Deserialize};

use crate::lexing::TokenType;


/// A region of source code: where it starts, which line it starts on, and
/// how long it is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub offset: usize,
    pub line: u32,
    pub length: usize,
}

impl From<(usize, u32, usize)> for Location {
    fn from((offset, line, length): (usize, u32, usize)) -> Self {
        Location { offset, line, length }
    }
}

impl From<Range<usize>> for Location {
    fn from(range: Range<usize>) -> Self {
        Location {
            offset: range.start,
            line: 1,
            length: range.end - range.start,
        }
    }
}

impl<T> From<Tagged<T>> for Location {
    fn from(value: Tagged<T>) -> Self {
        value.location
    }
}


/// A value of type `T` together with the source location it came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tagged<T> {
    location: Location,
    contents: T,
}

impl<T> Tagged<T> {
    pub fn location(&self) -> Location {
        self.location
    }

    /// Override the line number. Locations constructed from plain ranges
    /// default to line 1.
    pub fn line(mut self, line: u32) -> Self {
        self.location.line = line;
        self
    }

    pub fn map<F, U>(self, f: F) -> Tagged<U> where F: FnOnce(T) -> U {
        Tagged::<U> {
            location: self.location,
            contents: f(self.contents),
        }
    }
}

impl<T> AsRef<T> for Tagged<T> {
    fn as_ref(&self) -> &T {
        &self.contents
    }
}


pub trait Taggable: Sized {
    fn tag<T>(self, loc: T) -> Tagged<Self> where Location: From<T>;
}

impl<T> Taggable for T where T: Sized {
    fn tag<U>(self, loc: U) -> Tagged<Self> where Location: From<U> {
        Tagged::<Self> {
            location: Location::from(loc),
            contents: self,
        }
    }
}


/// Everything that can go wrong while parsing.
///
/// The display forms of these reasons are stable: the REPL surfaces them
/// verbatim and the test suite matches on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Syntax {
    /// The parser required a specific token and found something else.
    ExpectedToken { expected: TokenType, got: TokenType },

    /// A token showed up in expression position that no expression can
    /// start with.
    MissingPrefix(TokenType),

    /// An integer literal that does not fit in 64 bits.
    BadIntegerLiteral(String),
}

impl Display for Syntax {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExpectedToken { expected, got } =>
                write!(f, "expected {}, got {}", expected, got),
            Self::MissingPrefix(kind) =>
                write!(f, "no prefix parse function for {} found", kind),
            Self::BadIntegerLiteral(text) =>
                write!(f, "could not parse {} as integer", text),
        }
    }
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntaxError {
    pub location: Location,
    pub reason: Syntax,
}

impl SyntaxError {
    pub fn new(location: Location, reason: Syntax) -> Self {
        SyntaxError { location, reason }
    }
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.reason.fmt(f)
    }
}
