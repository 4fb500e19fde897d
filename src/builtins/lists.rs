//! Pair operations: CAR, CDR, CONS
//!
//! Pair cells are bare two-slot records; CAR and CDR project the slots
//! and CONS allocates a fresh cell. Both projections of nil are nil, not
//! errors.

use crate::builtins::gather;
use crate::error::{self, Error};
use crate::interp::Interp;
use crate::value::Value;

/// First slot of a pair; nil for nil.
///
/// ```lisp
/// (car '(1 2 3)) => 1
/// (car nil) => nil
/// ```
pub fn builtin_car(interp: &mut Interp, args: Value) -> Result<Value, Error> {
    let argv = gather(interp, args);
    if argv.len() != 1 {
        return Err(Error::arity("CAR", error::ARITY_ONE, argv.len()));
    }
    match argv[0] {
        Value::Nil => Ok(Value::Nil),
        Value::Pair(p) => Ok(interp.heap.car(p)),
        other => Err(Error::wrong_type("CAR", "pair", other.type_name(), 1)),
    }
}

/// Second slot of a pair; nil for nil.
///
/// ```lisp
/// (cdr '(1 2 3)) => (2 3)
/// (cdr nil) => nil
/// ```
pub fn builtin_cdr(interp: &mut Interp, args: Value) -> Result<Value, Error> {
    let argv = gather(interp, args);
    if argv.len() != 1 {
        return Err(Error::arity("CDR", error::ARITY_ONE, argv.len()));
    }
    match argv[0] {
        Value::Nil => Ok(Value::Nil),
        Value::Pair(p) => Ok(interp.heap.cdr(p)),
        other => Err(Error::wrong_type("CDR", "pair", other.type_name(), 1)),
    }
}

/// Allocates a pair of its two arguments.
///
/// ```lisp
/// (cons 0 '(1 2)) => (0 1 2)
/// (cons 1 2) => (1 . 2)
/// ```
pub fn builtin_cons(interp: &mut Interp, args: Value) -> Result<Value, Error> {
    let argv = gather(interp, args);
    if argv.len() != 2 {
        return Err(Error::arity("CONS", error::ARITY_TWO, argv.len()));
    }
    Ok(interp.cons(argv[0], argv[1]))
}

/// Register all pair builtins in the environment
pub fn register(interp: &mut Interp, env: Value) -> Result<(), Error> {
    interp.register_builtin(env, "CAR", builtin_car)?;
    interp.register_builtin(env, "CDR", builtin_cdr)?;
    interp.register_builtin(env, "CONS", builtin_cons)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_car_and_cdr() {
        let mut interp = Interp::new();
        assert_eq!(
            interp.eval_source("(car (quote (1 2 3)))"),
            Ok(Value::Integer(1))
        );
        let rest = interp.eval_source("(cdr (quote (1 2 3)))").unwrap();
        assert_eq!(
            interp.list_to_vec(rest),
            Some(vec![Value::Integer(2), Value::Integer(3)])
        );
    }

    #[test]
    fn test_car_cdr_of_nil_are_nil() {
        let mut interp = Interp::new();
        assert_eq!(interp.eval_source("(car nil)"), Ok(Value::Nil));
        assert_eq!(interp.eval_source("(cdr nil)"), Ok(Value::Nil));
    }

    #[test]
    fn test_car_of_non_pair_is_a_type_error() {
        let mut interp = Interp::new();
        assert_eq!(
            interp.eval_source("(car 1)"),
            Err(Error::wrong_type("CAR", "pair", "integer", 1))
        );
        assert!(matches!(
            interp.eval_source("(cdr \"s\")"),
            Err(Error::WrongType { .. })
        ));
    }

    #[test]
    fn test_cons_builds_pairs() {
        let mut interp = Interp::new();
        let v = interp.eval_source("(cons 1 2)").unwrap();
        let Value::Pair(p) = v else { panic!("expected a pair") };
        assert_eq!(interp.heap.car(p), Value::Integer(1));
        assert_eq!(interp.heap.cdr(p), Value::Integer(2));
    }

    #[test]
    fn test_pair_arity() {
        let mut interp = Interp::new();
        assert!(matches!(
            interp.eval_source("(car 1 2)"),
            Err(Error::WrongArity { .. })
        ));
        assert!(matches!(
            interp.eval_source("(cons 1)"),
            Err(Error::WrongArity { .. })
        ));
    }
}
