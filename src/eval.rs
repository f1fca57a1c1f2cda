use gc::{Finalize, Trace};

use crate::ast::{Block, Expr, Program, Stmt};
use crate::builtins::BUILTINS;
use crate::object::{Builtin, Func, Object, Str};
use crate::types::{BinOp, Gc, GcCell, Key, List, Map, OrderedMap, UnOp};

// Environment
// ----------------------------------------------------------------

/// A lexical scope: a name→value store plus an optional link to the
/// enclosing scope.
///
/// Environments are shared-ownership handles. A closure keeps the
/// environment it was defined in alive, and observes `let` bindings made in
/// that scope after the closure was created. Recursive bindings
/// (`let f = fn() { f() }`) put an environment inside a value stored in
/// itself; the tracing collector owns that cycle.
#[derive(Debug, Clone, Trace, Finalize)]
pub struct Environment(GcCell<EnvData>);

#[derive(Debug, Trace, Finalize)]
struct EnvData {
    store: OrderedMap<Key, Object>,
    outer: Option<Environment>,
}

impl Environment {
    /// The root environment: empty, with no outer scope.
    pub fn new() -> Environment {
        Environment(GcCell::new(EnvData {
            store: OrderedMap::new(),
            outer: None,
        }))
    }

    /// Open a fresh scope enclosed in this one. The outer link never
    /// changes for the life of the inner scope.
    pub fn enclosed(&self) -> Environment {
        Environment(GcCell::new(EnvData {
            store: OrderedMap::new(),
            outer: Some(self.clone()),
        }))
    }

    /// Look up a name, walking outward through the scope chain.
    pub fn get(&self, name: &Key) -> Option<Object> {
        let data = self.0.borrow();
        match data.store.get(name) {
            Some(value) => Some(value.clone()),
            None => data.outer.as_ref().and_then(|outer| outer.get(name)),
        }
    }

    /// Bind a name in this scope, shadowing any binding further out.
    pub fn set(&self, name: Key, value: Object) {
        self.0.borrow_mut().store.insert(name, value);
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

// Evaluator
// ----------------------------------------------------------------

/// Evaluate a program statement by statement, remembering the last value.
///
/// This is one of the two places that open return envelopes; the other is
/// the function call site. Errors end evaluation immediately.
pub fn eval_program(program: &Program, env: &Environment) -> Object {
    let mut result = Object::Null;
    for statement in &program.statements {
        result = match eval_stmt(statement, env) {
            Object::Return(ref value) => return (**value).clone(),
            ref error @ Object::Error(_) => return error.clone(),
            other => other,
        };
    }
    result
}

/// Like [`eval_program`], except that return envelopes pass through intact,
/// so a return inside a nested block still exits the enclosing function.
fn eval_block(block: &Block, env: &Environment) -> Object {
    let mut result = Object::Null;
    for statement in &block.0 {
        result = eval_stmt(statement, env);
        if matches!(result, Object::Return(_) | Object::Error(_)) {
            return result;
        }
    }
    result
}

fn eval_stmt(statement: &Stmt, env: &Environment) -> Object {
    match statement {
        Stmt::Let { name, value } => {
            let value = eval_expr(value, env);
            if value.is_error() {
                return value;
            }
            env.set(*name, value);
            Object::Null
        }

        Stmt::Return(value) => {
            let value = eval_expr(value, env);
            if value.is_error() {
                return value;
            }
            Object::Return(Box::new(value))
        }

        Stmt::Expr(value) => eval_expr(value, env),
    }
}

pub fn eval_expr(node: &Expr, env: &Environment) -> Object {
    match node {
        Expr::Identifier(name) => eval_identifier(*name, env),
        Expr::Integer(value) => Object::Integer(*value),
        Expr::Boolean(value) => Object::Boolean(*value),
        Expr::StringLit(text) => Object::String(Str::interned(*text)),

        Expr::List(elements) => {
            let values = eval_expressions(elements, env);
            if let [only] = &values[..] {
                if only.is_error() {
                    return only.clone();
                }
            }
            Object::List(Gc::new(values))
        }

        Expr::Map(pairs) => eval_map(pairs, env),

        Expr::Function { params, body } => {
            Object::Function(Func::new(params.clone(), body.clone(), env.clone()))
        }

        Expr::Prefix(op, right) => {
            let right = eval_expr(right, env);
            if right.is_error() {
                return right;
            }
            eval_prefix(*op, right)
        }

        Expr::Infix(op, left, right) => {
            let left = eval_expr(left, env);
            if left.is_error() {
                return left;
            }
            let right = eval_expr(right, env);
            if right.is_error() {
                return right;
            }
            eval_infix(*op, left, right)
        }

        Expr::If { condition, consequence, alternative } => {
            let condition = eval_expr(condition, env);
            if condition.is_error() {
                return condition;
            }
            if condition.truthy() {
                eval_block(consequence, env)
            } else if let Some(block) = alternative {
                eval_block(block, env)
            } else {
                Object::Null
            }
        }

        Expr::Call { callee, args } => {
            let callee = eval_expr(callee, env);
            if callee.is_error() {
                return callee;
            }
            let args = eval_expressions(args, env);
            if let [only] = &args[..] {
                if only.is_error() {
                    return only.clone();
                }
            }
            apply_function(callee, args)
        }

        Expr::Index { target, index } => {
            let target = eval_expr(target, env);
            if target.is_error() {
                return target;
            }
            let index = eval_expr(index, env);
            if index.is_error() {
                return index;
            }
            eval_index(target, index)
        }
    }
}

/// Names resolve through the scope chain first, so user bindings shadow the
/// built-ins.
fn eval_identifier(name: Key, env: &Environment) -> Object {
    if let Some(value) = env.get(&name) {
        return value;
    }
    match BUILTINS.get(name.as_str()) {
        Some(func) => Object::Builtin(Builtin { func: *func, name }),
        None => Object::error(format!("identifier not found: {}", name)),
    }
}

/// Evaluate expressions left to right. The first error abandons the rest
/// and comes back as the only element.
fn eval_expressions(nodes: &[Expr], env: &Environment) -> List {
    let mut values = List::new();
    for node in nodes {
        let value = eval_expr(node, env);
        if value.is_error() {
            return vec![value];
        }
        values.push(value);
    }
    values
}

fn eval_map(pairs: &[(Expr, Expr)], env: &Environment) -> Object {
    let mut values = Map::new();
    for (key_node, value_node) in pairs {
        let key = eval_expr(key_node, env);
        if key.is_error() {
            return key;
        }
        let digest = match key.hash_key() {
            Some(digest) => digest,
            None => {
                return Object::error(format!("unusable as hash key: {}", key.type_of()))
            }
        };
        let value = eval_expr(value_node, env);
        if value.is_error() {
            return value;
        }
        values.insert(digest, (key, value));
    }
    Object::Map(Gc::new(values))
}

fn eval_prefix(op: UnOp, right: Object) -> Object {
    match op {
        UnOp::LogicalNegate => Object::Boolean(!right.truthy()),
        UnOp::ArithmeticalNegate => match right {
            Object::Integer(value) => Object::Integer(value.wrapping_neg()),
            _ => Object::error(format!("unknown operator: {}{}", op, right.type_of())),
        },
    }
}

// Dispatch order matters: the string rule comes before the identity rule,
// so `==` on two strings is an unknown operator, not an identity test.
fn eval_infix(op: BinOp, left: Object, right: Object) -> Object {
    match (&left, &right) {
        (Object::Integer(x), Object::Integer(y)) => eval_integer_infix(op, *x, *y),
        (Object::String(x), Object::String(y)) => eval_string_infix(op, x, y),
        _ => match op {
            BinOp::Equal => Object::Boolean(left.user_eq(&right)),
            BinOp::NotEqual => Object::Boolean(!left.user_eq(&right)),
            _ if left.type_of() != right.type_of() => Object::error(format!(
                "type mismatch: {} {} {}",
                left.type_of(),
                op,
                right.type_of(),
            )),
            _ => Object::error(format!(
                "unknown operator: {} {} {}",
                left.type_of(),
                op,
                right.type_of(),
            )),
        },
    }
}

/// 64-bit wrapping arithmetic. Division truncates toward zero; dividing by
/// zero is a runtime error rather than a host trap.
fn eval_integer_infix(op: BinOp, x: i64, y: i64) -> Object {
    match op {
        BinOp::Add => Object::Integer(x.wrapping_add(y)),
        BinOp::Subtract => Object::Integer(x.wrapping_sub(y)),
        BinOp::Multiply => Object::Integer(x.wrapping_mul(y)),
        BinOp::Divide => {
            if y == 0 {
                Object::error("division by zero")
            } else {
                Object::Integer(x.wrapping_div(y))
            }
        }
        BinOp::Less => Object::Boolean(x < y),
        BinOp::Greater => Object::Boolean(x > y),
        BinOp::Equal => Object::Boolean(x == y),
        BinOp::NotEqual => Object::Boolean(x != y),
    }
}

fn eval_string_infix(op: BinOp, x: &Str, y: &Str) -> Object {
    match op {
        BinOp::Add => Object::String(x.add(y)),
        _ => Object::error(format!("unknown operator: STRING {} STRING", op)),
    }
}

/// Apply a callee to already-evaluated arguments. User functions run their
/// body in a fresh scope enclosed over the captured environment; this is
/// the second of the two places that open return envelopes. Built-ins get
/// the argument vector and their result is returned verbatim.
fn apply_function(callee: Object, args: List) -> Object {
    match &callee {
        Object::Function(func) => {
            if args.len() != func.params().len() {
                return Object::error(format!(
                    "wrong number of arguments. got={}, want={}",
                    args.len(),
                    func.params().len(),
                ));
            }
            let scope = func.env().enclosed();
            for (param, value) in func.params().iter().zip(args) {
                scope.set(*param, value);
            }
            match eval_block(func.body(), &scope) {
                Object::Return(ref value) => (**value).clone(),
                other => other,
            }
        }

        Object::Builtin(builtin) => builtin.call(&args),

        _ => Object::error(format!("not a function: {}", callee.type_of())),
    }
}

fn eval_index(target: Object, index: Object) -> Object {
    match (&target, &index) {
        (Object::List(values), Object::Integer(i)) => {
            if *i < 0 {
                return Object::Null;
            }
            values.get(*i as usize).cloned().unwrap_or(Object::Null)
        }

        (Object::Map(values), _) => match index.hash_key() {
            Some(digest) => values
                .get(&digest)
                .map(|(_, value)| value.clone())
                .unwrap_or(Object::Null),
            None => Object::error(format!("unusable as hash key: {}", index.type_of())),
        },

        _ => Object::error(format!(
            "index operator not supported: {}",
            target.type_of(),
        )),
    }
}
