// ABOUTME: An embeddable Lisp interpreter: reader, trampolined evaluator,
// mark-sweep heap, and the standard primitives

pub mod builtins;
pub mod config;
pub mod env;
pub mod error;
pub mod eval;
pub mod heap;
pub mod interp;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod symbols;
pub mod value;

pub use error::Error;
pub use interp::Interp;
pub use parser::Parsed;
pub use symbols::Symbol;
pub use value::{BuiltinFn, Value};
