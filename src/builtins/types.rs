//! Type predicates: NIL?, PAIR?, SYMBOL?, INTEGER?, FLOAT?, NUMERIC?,
//! BOOLEAN?, BUILTIN?, CLOSURE?, MACRO?
//!
//! Each takes one value and answers with a boolean. NUMERIC? accepts
//! integers and floats alike.

use crate::builtins::gather;
use crate::error::{self, Error};
use crate::interp::Interp;
use crate::value::Value;

fn predicate(
    interp: &Interp,
    args: Value,
    function: &str,
    test: fn(Value) -> bool,
) -> Result<Value, Error> {
    let argv = gather(interp, args);
    if argv.len() != 1 {
        return Err(Error::arity(function, error::ARITY_ONE, argv.len()));
    }
    Ok(Value::Bool(test(argv[0])))
}

pub fn builtin_nil_p(interp: &mut Interp, args: Value) -> Result<Value, Error> {
    predicate(interp, args, "NIL?", |v| matches!(v, Value::Nil))
}

pub fn builtin_pair_p(interp: &mut Interp, args: Value) -> Result<Value, Error> {
    predicate(interp, args, "PAIR?", |v| matches!(v, Value::Pair(_)))
}

pub fn builtin_symbol_p(interp: &mut Interp, args: Value) -> Result<Value, Error> {
    predicate(interp, args, "SYMBOL?", |v| matches!(v, Value::Symbol(_)))
}

pub fn builtin_integer_p(interp: &mut Interp, args: Value) -> Result<Value, Error> {
    predicate(interp, args, "INTEGER?", |v| matches!(v, Value::Integer(_)))
}

pub fn builtin_float_p(interp: &mut Interp, args: Value) -> Result<Value, Error> {
    predicate(interp, args, "FLOAT?", |v| matches!(v, Value::Float(_)))
}

pub fn builtin_numeric_p(interp: &mut Interp, args: Value) -> Result<Value, Error> {
    predicate(interp, args, "NUMERIC?", Value::is_numeric)
}

pub fn builtin_boolean_p(interp: &mut Interp, args: Value) -> Result<Value, Error> {
    predicate(interp, args, "BOOLEAN?", |v| matches!(v, Value::Bool(_)))
}

pub fn builtin_builtin_p(interp: &mut Interp, args: Value) -> Result<Value, Error> {
    predicate(interp, args, "BUILTIN?", |v| matches!(v, Value::Builtin(_)))
}

pub fn builtin_closure_p(interp: &mut Interp, args: Value) -> Result<Value, Error> {
    predicate(interp, args, "CLOSURE?", |v| matches!(v, Value::Closure(_)))
}

pub fn builtin_macro_p(interp: &mut Interp, args: Value) -> Result<Value, Error> {
    predicate(interp, args, "MACRO?", |v| matches!(v, Value::Macro(_)))
}

/// Register all type predicate builtins in the environment
pub fn register(interp: &mut Interp, env: Value) -> Result<(), Error> {
    interp.register_builtin(env, "NIL?", builtin_nil_p)?;
    interp.register_builtin(env, "PAIR?", builtin_pair_p)?;
    interp.register_builtin(env, "SYMBOL?", builtin_symbol_p)?;
    interp.register_builtin(env, "INTEGER?", builtin_integer_p)?;
    interp.register_builtin(env, "FLOAT?", builtin_float_p)?;
    interp.register_builtin(env, "NUMERIC?", builtin_numeric_p)?;
    interp.register_builtin(env, "BOOLEAN?", builtin_boolean_p)?;
    interp.register_builtin(env, "BUILTIN?", builtin_builtin_p)?;
    interp.register_builtin(env, "CLOSURE?", builtin_closure_p)?;
    interp.register_builtin(env, "MACRO?", builtin_macro_p)?;
    Ok(())
}
