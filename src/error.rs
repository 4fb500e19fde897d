// ABOUTME: The closed set of error kinds shared by the reader, the
// evaluator, and primitives

use thiserror::Error;

// ===== Arity constant strings (eliminates allocations in error paths) =====
pub const ARITY_ONE: &str = "1";
pub const ARITY_TWO: &str = "2";
pub const ARITY_THREE: &str = "3";
pub const ARITY_AT_LEAST_TWO: &str = "at least 2";

/// Everything that can go wrong inside the engine. The set is closed:
/// hosts can match on it exhaustively, and primitives report failures
/// through it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed source text
    #[error("syntax error: {0}")]
    Syntax(String),

    /// Nothing but whitespace and comments to read; non-fatal
    #[error("empty input")]
    EmptyInput,

    #[error("unbound symbol: {0}")]
    UnboundSymbol(String),

    /// Arity error with operator name, expected count/range, and actual count
    #[error("{function}: expected {expected} argument{}, got {actual}", if *.expected == "1" { "" } else { "s" })]
    WrongArity {
        function: String,
        expected: String, // "2", "at least 2"
        actual: usize,
    },

    /// Type mismatch with operator name, expected type, actual type, and position
    #[error("{function}: expected {expected}, got {actual} at argument {position}")]
    WrongType {
        function: String,
        expected: String,
        actual: String,
        position: usize,
    },

    #[error("numeric overflow: {0}")]
    NumericOverflow(String),

    #[error("numeric underflow: {0}")]
    NumericUnderflow(String),

    #[error("allocation failed: {0}")]
    Allocation(String),

    #[error("{0}")]
    Unknown(String),
}

impl Error {
    pub fn syntax(detail: impl Into<String>) -> Self {
        Error::Syntax(detail.into())
    }

    /// Create an arity error with expected and actual counts
    pub fn arity(function: &str, expected: impl Into<String>, actual: usize) -> Self {
        Error::WrongArity {
            function: function.to_string(),
            expected: expected.into(),
            actual,
        }
    }

    /// Create a type mismatch error with full context
    pub fn wrong_type(function: &str, expected: &str, actual: &str, position: usize) -> Self {
        Error::WrongType {
            function: function.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
            position,
        }
    }

    pub fn unknown(detail: impl Into<String>) -> Self {
        Error::Unknown(detail.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_message_pluralizes() {
        let one = Error::arity("CAR", ARITY_ONE, 2);
        assert_eq!(one.to_string(), "CAR: expected 1 argument, got 2");

        let two = Error::arity("CONS", ARITY_TWO, 1);
        assert_eq!(two.to_string(), "CONS: expected 2 arguments, got 1");
    }

    #[test]
    fn test_type_message_carries_position() {
        let err = Error::wrong_type("+", "number", "string", 2);
        assert_eq!(err.to_string(), "+: expected number, got string at argument 2");
    }

    #[test]
    fn test_unbound_message() {
        let err = Error::UnboundSymbol("FOO".to_string());
        assert_eq!(err.to_string(), "unbound symbol: FOO");
    }
}
