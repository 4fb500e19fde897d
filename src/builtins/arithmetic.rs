//! Arithmetic operations: +, -, *, /
//!
//! All take at least two numeric arguments. Integer arithmetic wraps at
//! the 64-bit boundary; any float operand promotes the whole computation
//! to float; `/` always returns a float.

use crate::builtins::gather;
use crate::error::{self, Error};
use crate::interp::Interp;
use crate::value::Value;

/// Numeric accumulator; stays integral until a float operand shows up.
#[derive(Clone, Copy)]
enum Acc {
    Int(i64),
    Float(f64),
}

fn as_float(acc: Acc) -> f64 {
    match acc {
        Acc::Int(n) => n as f64,
        Acc::Float(f) => f,
    }
}

fn numeric(function: &str, value: Value, position: usize) -> Result<Acc, Error> {
    match value {
        Value::Integer(n) => Ok(Acc::Int(n)),
        Value::Float(f) => Ok(Acc::Float(f)),
        other => Err(Error::wrong_type(
            function,
            "number",
            other.type_name(),
            position,
        )),
    }
}

fn fold(
    interp: &Interp,
    args: Value,
    function: &str,
    int_op: fn(i64, i64) -> i64,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value, Error> {
    let argv = gather(interp, args);
    if argv.len() < 2 {
        return Err(Error::arity(function, error::ARITY_AT_LEAST_TWO, argv.len()));
    }
    let mut acc = numeric(function, argv[0], 1)?;
    for (i, &arg) in argv[1..].iter().enumerate() {
        let rhs = numeric(function, arg, i + 2)?;
        acc = match (acc, rhs) {
            (Acc::Int(a), Acc::Int(b)) => Acc::Int(int_op(a, b)),
            (a, b) => Acc::Float(float_op(as_float(a), as_float(b))),
        };
    }
    Ok(match acc {
        Acc::Int(n) => Value::Integer(n),
        Acc::Float(f) => Value::Float(f),
    })
}

/// Returns the sum of its arguments.
///
/// ```lisp
/// (+ 1 2 3) => 6
/// (+ 1 2.5) => 3.5
/// ```
pub fn builtin_add(interp: &mut Interp, args: Value) -> Result<Value, Error> {
    fold(interp, args, "+", i64::wrapping_add, |a, b| a + b)
}

/// Subtracts the later arguments from the first.
///
/// ```lisp
/// (- 10 3 2) => 5
/// ```
pub fn builtin_sub(interp: &mut Interp, args: Value) -> Result<Value, Error> {
    fold(interp, args, "-", i64::wrapping_sub, |a, b| a - b)
}

/// Returns the product of its arguments.
///
/// ```lisp
/// (* 2 3 4) => 24
/// ```
pub fn builtin_mul(interp: &mut Interp, args: Value) -> Result<Value, Error> {
    fold(interp, args, "*", i64::wrapping_mul, |a, b| a * b)
}

/// Divides the first argument by the rest, always in floating point.
///
/// ```lisp
/// (/ 20 4) => 5.0
/// (/ 1 3) => 0.3333333333333333
/// ```
pub fn builtin_div(interp: &mut Interp, args: Value) -> Result<Value, Error> {
    let argv = gather(interp, args);
    if argv.len() < 2 {
        return Err(Error::arity("/", error::ARITY_AT_LEAST_TWO, argv.len()));
    }
    let mut acc = as_float(numeric("/", argv[0], 1)?);
    for (i, &arg) in argv[1..].iter().enumerate() {
        acc /= as_float(numeric("/", arg, i + 2)?);
    }
    Ok(Value::Float(acc))
}

/// Register all arithmetic builtins in the environment
pub fn register(interp: &mut Interp, env: Value) -> Result<(), Error> {
    interp.register_builtin(env, "+", builtin_add)?;
    interp.register_builtin(env, "-", builtin_sub)?;
    interp.register_builtin(env, "*", builtin_mul)?;
    interp.register_builtin(env, "/", builtin_div)?;
    Ok(())
}
