//! Function implementation.

use std::fmt::{Debug, Display};

use gc::{Finalize, Gc, Trace};

use super::Object;
use crate::ast::Block;
use crate::eval::Environment;
use crate::types::{Key, List, NativeFunction};

/// The body of a user function: parameter names, the statements to run, and
/// the environment that was current at the point of definition.
#[derive(Debug, Trace, Finalize)]
pub struct Closure {
    #[unsafe_ignore_trace]
    pub params: Vec<Key>,
    pub body: Block,
    pub env: Environment,
}

/// A user function value. Cheap to clone; the closure is shared.
#[derive(Clone, Debug, Trace, Finalize)]
pub struct Func(Gc<Closure>);

impl Func {
    pub fn new(params: Vec<Key>, body: Block, env: Environment) -> Func {
        Func(Gc::new(Closure { params, body, env }))
    }

    pub fn params(&self) -> &[Key] {
        &self.0.params
    }

    pub fn body(&self) -> &Block {
        &self.0.body
    }

    pub fn env(&self) -> &Environment {
        &self.0.env
    }

    /// All user functions compare different to each other unless they are
    /// the same object.
    pub fn ptr_eq(&self, other: &Func) -> bool {
        Gc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Func {
    fn eq(&self, other: &Func) -> bool {
        self.ptr_eq(other)
    }
}

impl Display for Func {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.params().iter().map(Key::as_str).collect();
        write!(f, "fn({}) {{\n{}\n}}", names.join(","), self.body())
    }
}


/// A built-in function is a 'pure' function implemented in Rust associated
/// with a name. The name is what identifier lookup found it under.
#[derive(Copy, Clone)]
pub struct Builtin {
    /// The rust callable for evaluating the function.
    pub func: NativeFunction,

    /// The name of the function.
    pub name: Key,
}

impl Builtin {
    pub fn call(&self, args: &List) -> Object {
        (self.func)(args)
    }
}

impl Debug for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builtin").field("name", &self.name).finish()
    }
}

/// Built-ins compare equal by name.
impl PartialEq for Builtin {
    fn eq(&self, other: &Builtin) -> bool {
        self.name == other.name
    }
}
