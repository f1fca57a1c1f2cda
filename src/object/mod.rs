//! Runtime values.
//!
//! A Tin value is represented by the [`Object`] enumeration. The evaluator's
//! dispatch is total over it, including the two internal control-flow cases:
//! [`Object::Return`], the envelope that carries a return value out to the
//! nearest call boundary, and [`Object::Error`], a runtime error travelling
//! as a value. Everything else is observable from the language.

mod function;
mod string;

use std::fmt::Display;

use gc::{Finalize, Trace};

use crate::types::{Gc, List, Map, Type};

pub use function::{Builtin, Closure, Func};
pub use string::Str;


/// A runtime value.
#[derive(Debug, Clone, PartialEq, Trace, Finalize)]
pub enum Object {
    /// Integers
    Integer(i64),

    /// Booleans
    Boolean(bool),

    /// Strings
    String(Str),

    /// Arrays: ordered, zero-indexed, heterogeneous
    List(Gc<List>),

    /// Hashes, keyed by the fingerprints of their key objects
    Map(Gc<Map>),

    /// User functions (closures)
    Function(Func),

    /// Host functions bound as values
    Builtin(#[unsafe_ignore_trace] Builtin),

    /// The return envelope. Unwrapped at program-statement and
    /// function-call boundaries; never user-visible.
    Return(Box<Object>),

    /// A runtime error. Short-circuits everything up to the entry point.
    Error(String),

    /// Null
    Null,
}

impl From<i64> for Object {
    fn from(x: i64) -> Object {
        Object::Integer(x)
    }
}

impl From<bool> for Object {
    fn from(x: bool) -> Object {
        Object::Boolean(x)
    }
}

impl Object {
    /// Construct an interned string object.
    pub fn int_string<T: AsRef<str>>(x: T) -> Object {
        Object::String(Str::interned(crate::types::Key::new(x)))
    }

    /// Construct a natural (non-interned) string object.
    pub fn nat_string<T: AsRef<str>>(x: T) -> Object {
        Object::String(Str::natural(x))
    }

    pub fn list(values: List) -> Object {
        Object::List(Gc::new(values))
    }

    pub fn map(values: Map) -> Object {
        Object::Map(Gc::new(values))
    }

    pub fn error<T: Into<String>>(message: T) -> Object {
        Object::Error(message.into())
    }

    /// The type tag, as rendered in error messages.
    pub fn type_of(&self) -> Type {
        match self {
            Self::Integer(_) => Type::Integer,
            Self::Boolean(_) => Type::Boolean,
            Self::String(_) => Type::String,
            Self::List(_) => Type::List,
            Self::Map(_) => Type::Map,
            Self::Function(_) => Type::Function,
            Self::Builtin(_) => Type::Builtin,
            Self::Return(_) => Type::Return,
            Self::Error(_) => Type::Error,
            Self::Null => Type::Null,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Everything is truthy except `null` and `false`.
    pub fn truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Boolean(val) => *val,
            _ => true,
        }
    }

    /// Identity, as observed by `==` on operands that are not both integers
    /// and not both strings. Booleans and null are singletons, so identity
    /// is value identity; aggregates and functions are identical only when
    /// they are the same object.
    pub fn user_eq(&self, other: &Object) -> bool {
        match (self, other) {
            (Self::Boolean(x), Self::Boolean(y)) => x == y,
            (Self::Null, Self::Null) => true,
            (Self::String(x), Self::String(y)) => x.ptr_eq(y),
            (Self::List(x), Self::List(y)) => Gc::ptr_eq(x, y),
            (Self::Map(x), Self::Map(y)) => Gc::ptr_eq(x, y),
            (Self::Function(x), Self::Function(y)) => x.ptr_eq(y),
            (Self::Builtin(x), Self::Builtin(y)) => x == y,
            _ => false,
        }
    }

    /// The fingerprint of a hashable value. Integers, booleans and strings
    /// are hashable; everything else is rejected at eval time.
    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Self::Integer(x) => Some(HashKey {
                kind: Type::Integer,
                digest: *x as u64,
            }),
            Self::Boolean(x) => Some(HashKey {
                kind: Type::Boolean,
                digest: *x as u64,
            }),
            Self::String(x) => Some(HashKey {
                kind: Type::String,
                digest: fnv1a(x.as_str().as_bytes()),
            }),
            _ => None,
        }
    }

    /// The printed form of a value, as shown by the REPL and by `puts`.
    pub fn inspect(&self) -> String {
        self.to_string()
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(value) => value.fmt(f),
            Self::Boolean(value) => value.fmt(f),
            Self::String(value) => value.fmt(f),

            Self::List(values) => {
                let inner: Vec<String> = values.iter().map(Object::to_string).collect();
                write!(f, "[{}]", inner.join(","))
            }

            Self::Map(values) => {
                let inner: Vec<String> = values
                    .iter()
                    .map(|(_, (key, value))| format!("{}: {}", key, value))
                    .collect();
                write!(f, "{{{}}}", inner.join(", "))
            }

            Self::Function(func) => func.fmt(f),
            Self::Builtin(_) => f.write_str("built-in function"),
            Self::Return(value) => value.fmt(f),
            Self::Error(message) => write!(f, "ERROR: {}", message),
            Self::Null => f.write_str("null"),
        }
    }
}


/// A hash map key: the type of the key object paired with a 64-bit digest of
/// its value. Two keys collide exactly when they came from equal objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashKey {
    pub kind: Type,
    pub digest: u64,
}

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// 64-bit FNV-1a. Not user-visible; any deterministic digest would do.
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut digest = FNV_OFFSET;
    for byte in bytes {
        digest ^= *byte as u64;
        digest = digest.wrapping_mul(FNV_PRIME);
    }
    digest
}
