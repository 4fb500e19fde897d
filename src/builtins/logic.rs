//! Logic operations: AND, OR, NOT
//!
//! NOT is true only for the literal false; every other value, including
//! nil, 0, and "", counts as true. AND and OR take at least two values
//! and walk adjacent pairs the way the numeric comparisons do: AND holds
//! when each pair is truthy on both sides, OR when each pair is truthy
//! on at least one side. Under this reading (or #t #f #f) is #f, which
//! differs from conventional short-circuit OR.

use crate::builtins::gather;
use crate::error::{self, Error};
use crate::interp::Interp;
use crate::value::Value;

fn pairwise(
    interp: &Interp,
    args: Value,
    function: &str,
    holds: fn(bool, bool) -> bool,
) -> Result<Value, Error> {
    let argv = gather(interp, args);
    if argv.len() < 2 {
        return Err(Error::arity(function, error::ARITY_AT_LEAST_TWO, argv.len()));
    }
    for pair in argv.windows(2) {
        if !holds(pair[0].is_truthy(), pair[1].is_truthy()) {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}

/// True when every adjacent pair of arguments is truthy on both sides.
///
/// ```lisp
/// (and #t #t #t) => #t
/// (and #t #f) => #f
/// ```
pub fn builtin_and(interp: &mut Interp, args: Value) -> Result<Value, Error> {
    pairwise(interp, args, "AND", |a, b| a && b)
}

/// True when every adjacent pair of arguments has a truthy side.
///
/// ```lisp
/// (or #f #t) => #t
/// (or #f #f) => #f
/// ```
pub fn builtin_or(interp: &mut Interp, args: Value) -> Result<Value, Error> {
    pairwise(interp, args, "OR", |a, b| a || b)
}

/// True only for the literal false.
///
/// ```lisp
/// (not #f) => #t
/// (not nil) => #f
/// (not 0) => #f
/// ```
pub fn builtin_not(interp: &mut Interp, args: Value) -> Result<Value, Error> {
    let argv = gather(interp, args);
    if argv.len() != 1 {
        return Err(Error::arity("NOT", error::ARITY_ONE, argv.len()));
    }
    Ok(Value::Bool(argv[0] == Value::Bool(false)))
}

/// Register all logic builtins in the environment
pub fn register(interp: &mut Interp, env: Value) -> Result<(), Error> {
    interp.register_builtin(env, "AND", builtin_and)?;
    interp.register_builtin(env, "OR", builtin_or)?;
    interp.register_builtin(env, "NOT", builtin_not)?;
    Ok(())
}
