use phf::phf_map;

use crate::object::Object;
use crate::types::{Gc, List, NativeFunction};


pub static BUILTINS: phf::Map<&'static str, NativeFunction> = phf_map! {
    "len" => len,
    "first" => first,
    "last" => last,
    "rest" => rest,
    "push" => push,
    "puts" => puts,
};


fn arity_error(got: usize, want: usize) -> Object {
    Object::error(format!("wrong number of arguments. got={}, want={}", got, want))
}


/// Byte length of a string, or element count of an array.
pub fn len(args: &List) -> Object {
    match &args[..] {
        [Object::String(x)] => Object::Integer(x.len() as i64),
        [Object::List(x)] => Object::Integer(x.len() as i64),
        [other] => Object::error(format!(
            "argument to len not supported, got {}",
            other.type_of(),
        )),
        _ => arity_error(args.len(), 1),
    }
}


/// First element of an array, or null if it is empty.
pub fn first(args: &List) -> Object {
    match &args[..] {
        [Object::List(x)] => x.first().cloned().unwrap_or(Object::Null),
        [other] => Object::error(format!(
            "argument to first not supported, got {}",
            other.type_of(),
        )),
        _ => arity_error(args.len(), 1),
    }
}


/// Last element of an array, or null if it is empty.
pub fn last(args: &List) -> Object {
    match &args[..] {
        [Object::List(x)] => x.last().cloned().unwrap_or(Object::Null),
        [other] => Object::error(format!(
            "argument to last not supported, got {}",
            other.type_of(),
        )),
        _ => arity_error(args.len(), 1),
    }
}


/// A new array containing everything but the first element, or null if the
/// array is empty.
pub fn rest(args: &List) -> Object {
    match &args[..] {
        [Object::List(x)] => {
            if x.is_empty() {
                Object::Null
            } else {
                Object::List(Gc::new(x[1..].to_vec()))
            }
        }
        [other] => Object::error(format!(
            "argument to rest not supported, got {}",
            other.type_of(),
        )),
        _ => arity_error(args.len(), 1),
    }
}


/// A new array with the value appended. The original is untouched.
pub fn push(args: &List) -> Object {
    match &args[..] {
        [Object::List(x), value] => {
            let mut values = x.as_ref().clone();
            values.push(value.clone());
            Object::List(Gc::new(values))
        }
        [other, _] => Object::error(format!(
            "argument to push not supported, got {}",
            other.type_of(),
        )),
        _ => arity_error(args.len(), 2),
    }
}


/// Print each argument on its own line.
pub fn puts(args: &List) -> Object {
    for value in args {
        println!("{}", value);
    }
    Object::Null
}
