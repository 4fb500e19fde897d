//! Comparison operations: =, <, >, EQ?
//!
//! The numeric comparisons take at least two arguments and hold when
//! every adjacent pair satisfies them left to right. EQ? is the
//! type-dependent equality of the engine: values compare by value where
//! they are immediate, by identity where they live on the heap, and by
//! text for strings.

use crate::builtins::gather;
use crate::error::{self, Error};
use crate::interp::Interp;
use crate::value::Value;

fn as_float(value: Value) -> f64 {
    match value {
        Value::Integer(n) => n as f64,
        Value::Float(f) => f,
        _ => unreachable!("callers check for numeric values"),
    }
}

fn pairwise(
    interp: &Interp,
    args: Value,
    function: &str,
    int_cmp: fn(i64, i64) -> bool,
    float_cmp: fn(f64, f64) -> bool,
) -> Result<Value, Error> {
    let argv = gather(interp, args);
    if argv.len() < 2 {
        return Err(Error::arity(function, error::ARITY_AT_LEAST_TWO, argv.len()));
    }
    for (i, pair) in argv.windows(2).enumerate() {
        let (a, b) = (pair[0], pair[1]);
        if !a.is_numeric() {
            return Err(Error::wrong_type(function, "number", a.type_name(), i + 1));
        }
        if !b.is_numeric() {
            return Err(Error::wrong_type(function, "number", b.type_name(), i + 2));
        }
        let holds = match (a, b) {
            (Value::Integer(x), Value::Integer(y)) => int_cmp(x, y),
            _ => float_cmp(as_float(a), as_float(b)),
        };
        if !holds {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}

/// Numeric equality over adjacent pairs.
///
/// ```lisp
/// (= 2 2 2) => #t
/// (= 2 2.0) => #t
/// ```
pub fn builtin_num_eq(interp: &mut Interp, args: Value) -> Result<Value, Error> {
    pairwise(interp, args, "=", |a, b| a == b, |a, b| a == b)
}

/// Strictly increasing over adjacent pairs.
pub fn builtin_lt(interp: &mut Interp, args: Value) -> Result<Value, Error> {
    pairwise(interp, args, "<", |a, b| a < b, |a, b| a < b)
}

/// Strictly decreasing over adjacent pairs.
pub fn builtin_gt(interp: &mut Interp, args: Value) -> Result<Value, Error> {
    pairwise(interp, args, ">", |a, b| a > b, |a, b| a > b)
}

/// Type-dependent equality: value equality for nil, booleans, integers,
/// and floats; textual equality for strings; identity for everything
/// that lives on the heap. Values of different types are never EQ?.
///
/// ```lisp
/// (eq? 'foo 'foo) => #t
/// (eq? "a" "a") => #t
/// (eq? (cons 1 2) (cons 1 2)) => #f
/// ```
pub fn builtin_eq_p(interp: &mut Interp, args: Value) -> Result<Value, Error> {
    let argv = gather(interp, args);
    if argv.len() != 2 {
        return Err(Error::arity("EQ?", error::ARITY_TWO, argv.len()));
    }
    let result = match (argv[0], argv[1]) {
        (Value::Nil, Value::Nil) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Integer(a), Value::Integer(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => a == b,
        (Value::String(a), Value::String(b)) => interp.heap.text(a) == interp.heap.text(b),
        (Value::Symbol(a), Value::Symbol(b)) => a == b,
        (Value::Pair(a), Value::Pair(b)) => a == b,
        (Value::Closure(a), Value::Closure(b)) => a == b,
        (Value::Macro(a), Value::Macro(b)) => a == b,
        (Value::Builtin(a), Value::Builtin(b)) => a == b,
        _ => false,
    };
    Ok(Value::Bool(result))
}

/// Register all comparison builtins in the environment
pub fn register(interp: &mut Interp, env: Value) -> Result<(), Error> {
    interp.register_builtin(env, "=", builtin_num_eq)?;
    interp.register_builtin(env, "<", builtin_lt)?;
    interp.register_builtin(env, ">", builtin_gt)?;
    interp.register_builtin(env, "EQ?", builtin_eq_p)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_comparisons() {
        let mut interp = Interp::new();
        assert_eq!(interp.eval_source("(= 2 2 2)"), Ok(Value::Bool(true)));
        assert_eq!(interp.eval_source("(= 2 3)"), Ok(Value::Bool(false)));
        assert_eq!(interp.eval_source("(< 1 2 3)"), Ok(Value::Bool(true)));
        assert_eq!(interp.eval_source("(< 1 3 2)"), Ok(Value::Bool(false)));
        assert_eq!(interp.eval_source("(> 3 2 1)"), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_mixed_numeric_comparison() {
        let mut interp = Interp::new();
        assert_eq!(interp.eval_source("(= 2 2.0)"), Ok(Value::Bool(true)));
        assert_eq!(interp.eval_source("(< 1 1.5)"), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_comparison_arity_and_types() {
        let mut interp = Interp::new();
        assert!(matches!(
            interp.eval_source("(= 1)"),
            Err(Error::WrongArity { .. })
        ));
        assert!(matches!(
            interp.eval_source("(< 1 'a)"),
            Err(Error::WrongType { .. })
        ));
    }

    #[test]
    fn test_eq_value_types() {
        let mut interp = Interp::new();
        assert_eq!(interp.eval_source("(eq? nil nil)"), Ok(Value::Bool(true)));
        assert_eq!(interp.eval_source("(eq? 1 1)"), Ok(Value::Bool(true)));
        assert_eq!(interp.eval_source("(eq? 1 2)"), Ok(Value::Bool(false)));
        assert_eq!(interp.eval_source("(eq? 1 1.0)"), Ok(Value::Bool(false)));
        assert_eq!(interp.eval_source("(eq? #t #t)"), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_eq_strings_compare_text() {
        let mut interp = Interp::new();
        assert_eq!(
            interp.eval_source("(eq? \"abc\" \"abc\")"),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            interp.eval_source("(eq? \"abc\" \"abd\")"),
            Ok(Value::Bool(false))
        );
    }

    #[test]
    fn test_eq_heap_values_compare_by_identity() {
        let mut interp = Interp::new();
        assert_eq!(
            interp.eval_source("(eq? 'foo 'foo)"),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            interp.eval_source("(eq? (cons 1 2) (cons 1 2))"),
            Ok(Value::Bool(false))
        );
        assert_eq!(
            interp.eval_source("(define xs (cons 1 2)) (eq? xs xs)"),
            Ok(Value::Bool(true))
        );
    }
}
