use std::fmt::{Debug, Display};
use std::hash::Hash;

use gc::custom_trace;
use indexmap::{map::Iter, IndexMap};
use serde::{Deserialize, Serialize};
use symbol_table::GlobalSymbol;

use crate::object::{HashKey, Object};

pub use gc::Gc;

/// Type used for all interned strings: identifiers, parameter names and
/// string literals.
pub type Key = GlobalSymbol;

/// Type used for array values.
pub type List = Vec<Object>;

/// Type used for hash values. Each entry keeps the original key object next
/// to the value so that hashes can be printed back out.
pub type Map = OrderedMap<HashKey, (Object, Object)>;

/// Signature of a built-in function implemented in Rust. Errors are reported
/// as error objects, which the evaluator propagates like any other.
pub type NativeFunction = fn(&List) -> Object;


/// Enumeration of all the different types a Tin object can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    /// i64
    Integer,

    /// bool
    Boolean,

    /// Str
    String,

    /// Vec<Object>
    List,

    /// OrderedMap<HashKey, (Object, Object)>
    Map,

    /// Func
    Function,

    /// Builtin
    Builtin,

    /// The return envelope, internal to the evaluator
    Return,

    /// A runtime error travelling as a value
    Error,

    /// The empty variant
    Null,
}

// These names are the tags that show up in runtime error messages, so they
// follow the language-level vocabulary (arrays and hashes), not the
// implementation-level one.
impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer => f.write_str("INTEGER"),
            Self::Boolean => f.write_str("BOOLEAN"),
            Self::String => f.write_str("STRING"),
            Self::List => f.write_str("ARRAY"),
            Self::Map => f.write_str("HASH"),
            Self::Function => f.write_str("FUNCTION"),
            Self::Builtin => f.write_str("BUILTIN"),
            Self::Return => f.write_str("RETURN_VALUE"),
            Self::Error => f.write_str("ERROR"),
            Self::Null => f.write_str("NULL"),
        }
    }
}


#[derive(gc::Trace, gc::Finalize, Debug)]
pub struct GcCell<T: gc::Trace + ?Sized + 'static>(gc::Gc<gc::GcCell<T>>);

// Not derived: cloning the handle must not require cloning the contents.
impl<T: gc::Trace + ?Sized> Clone for GcCell<T> {
    fn clone(&self) -> Self {
        GcCell(self.0.clone())
    }
}

impl<T: gc::Trace> GcCell<T> {
    pub fn new(obj: T) -> GcCell<T> {
        GcCell(gc::Gc::new(gc::GcCell::new(obj)))
    }

    pub fn borrow(&self) -> gc::GcCellRef<'_, T> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> gc::GcCellRefMut<'_, T> {
        self.0.borrow_mut()
    }

    pub fn ptr_eq(&self, other: &GcCell<T>) -> bool {
        gc::Gc::ptr_eq(&self.0, &other.0)
    }
}


/// An insertion-ordered map. Iteration order is deterministic, which keeps
/// hash printing stable.
#[derive(Clone, Debug)]
pub struct OrderedMap<K, V>(IndexMap<K, V>);

impl<K, V> OrderedMap<K, V> {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        self.0.iter()
    }
}

impl<K: Hash + Eq, V> OrderedMap<K, V> {
    pub fn get(&self, k: &K) -> Option<&V> {
        self.0.get(k)
    }

    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.0.insert(key, value)
    }
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self(IndexMap::new())
    }
}

impl<K: Hash + Eq, V2, V1: PartialEq<V2>> PartialEq<OrderedMap<K, V2>> for OrderedMap<K, V1> {
    fn eq(&self, other: &OrderedMap<K, V2>) -> bool {
        self.0.eq(&other.0)
    }
}

impl<K: Copy, V: gc::Finalize> gc::Finalize for OrderedMap<K, V> {
    fn finalize(&self) {
        for (_, v) in self {
            v.finalize();
        }
    }
}

unsafe impl<K: Copy, V: gc::Trace> gc::Trace for OrderedMap<K, V> {
    custom_trace!(this, {
        for (_, v) in this {
            mark(v);
        }
    });
}

impl<'a, K, V> IntoIterator for &'a OrderedMap<K, V> {
    type Item = <&'a IndexMap<K, V> as IntoIterator>::Item;
    type IntoIter = <&'a IndexMap<K, V> as IntoIterator>::IntoIter;
    fn into_iter(self) -> Self::IntoIter {
        (&self.0).into_iter()
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        OrderedMap(IndexMap::from_iter(iter))
    }
}


/// Enumerates all the unary operators in the Tin language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnOp {
    /// Arithmetical negation (unary minus)
    ArithmeticalNegate,

    /// Logical negation (the bang operator)
    LogicalNegate,
}

/// Enumerates all the binary operators in the Tin language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    /// Addition or string concatenation
    Add,

    /// Subtraction
    Subtract,

    /// Multiplication
    Multiply,

    /// Division
    Divide,

    /// Less-than
    Less,

    /// Greater-than
    Greater,

    /// Equality
    Equal,

    /// Inequality
    NotEqual,
}

// Operator display forms are the source lexemes. Canonical AST printing and
// runtime error messages both rely on this.
impl Display for UnOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ArithmeticalNegate => f.write_str("-"),
            Self::LogicalNegate => f.write_str("!"),
        }
    }
}

impl Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Add => f.write_str("+"),
            Self::Subtract => f.write_str("-"),
            Self::Multiply => f.write_str("*"),
            Self::Divide => f.write_str("/"),
            Self::Less => f.write_str("<"),
            Self::Greater => f.write_str(">"),
            Self::Equal => f.write_str("=="),
            Self::NotEqual => f.write_str("!="),
        }
    }
}
