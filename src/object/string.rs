//! String implementation.

use std::fmt::Display;

use gc::{Finalize, Gc, Trace};

use crate::types::Key;

#[derive(Clone, PartialEq, Debug, Trace, Finalize)]
enum StrV {
    Interned(#[unsafe_ignore_trace] Key),
    Natural(Gc<String>),
}

/// The string variant represents all possible Tin strings.
///
/// String literals are interned by the parser and share storage; strings
/// built at runtime (concatenation) are natural. The distinction is not
/// observable from the language.
#[derive(Clone, PartialEq, Debug, Trace, Finalize)]
pub struct Str(StrV);

impl Display for Str {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Key> for Str {
    fn from(value: Key) -> Self {
        Str(StrV::Interned(value))
    }
}

impl Str {
    /// Construct a new interned string.
    pub fn interned<T>(x: T) -> Self
    where
        Key: From<T>,
    {
        Self(StrV::Interned(Key::from(x)))
    }

    /// Construct a new natural (non-interned) string.
    pub fn natural<T: AsRef<str>>(x: T) -> Self {
        Self(StrV::Natural(Gc::new(x.as_ref().to_string())))
    }

    /// Access the internal string slice.
    pub fn as_str(&self) -> &str {
        let Self(this) = self;
        match this {
            StrV::Interned(x) => x.as_str(),
            StrV::Natural(x) => x.as_str(),
        }
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.as_str().len()
    }

    /// Concatenate two string variants (the + operator for strings).
    pub fn add(&self, other: &Str) -> Str {
        Self::natural(format!("{}{}", self.as_str(), other.as_str()))
    }

    /// Identity: interned strings are identical when they share a symbol,
    /// natural strings when they share storage.
    pub fn ptr_eq(&self, other: &Str) -> bool {
        let Self(this) = self;
        let Self(that) = other;
        match (this, that) {
            (StrV::Interned(x), StrV::Interned(y)) => x == y,
            (StrV::Natural(x), StrV::Natural(y)) => Gc::ptr_eq(x, y),
            _ => false,
        }
    }
}
