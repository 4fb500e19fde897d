//! # Built-in Operations
//!
//! The standard primitives installed into the root environment at
//! start-up, organized by category:
//!
//! - **[arithmetic]**: +, -, *, / over mixed integers and floats
//! - **[comparison]**: =, <, >, EQ?
//! - **[logic]**: AND, OR, NOT
//! - **[types]**: NIL?, PAIR?, SYMBOL?, INTEGER?, FLOAT?, NUMERIC?,
//!   BOOLEAN?, BUILTIN?, CLOSURE?, MACRO?
//! - **[lists]**: CAR, CDR, CONS
//! - **[console]**: DISPLAY, CONCAT, NEWLINE
//!
//! Each category is a sub-module with a `register` function that installs
//! its bindings. Hosts add their own primitives the same way, through
//! `Interp::register_builtin`.

use crate::error::Error;
use crate::interp::Interp;
use crate::value::Value;

pub mod arithmetic;
pub mod comparison;
pub mod console;
pub mod lists;
pub mod logic;
pub mod types;

// Re-export for convenience
pub use arithmetic::register as register_arithmetic;
pub use comparison::register as register_comparison;
pub use console::register as register_console;
pub use lists::register as register_lists;
pub use logic::register as register_logic;
pub use types::register as register_types;

/// Collects a primitive's argument list into a vector. The evaluator
/// always hands primitives proper lists.
pub(crate) fn gather(interp: &Interp, args: Value) -> Vec<Value> {
    interp.list_to_vec(args).unwrap_or_default()
}

/// Installs every standard primitive into the root environment.
pub fn register_builtins(interp: &mut Interp) -> Result<(), Error> {
    let env = interp.root();
    register_arithmetic(interp, env)?;
    register_comparison(interp, env)?;
    register_logic(interp, env)?;
    register_types(interp, env)?;
    register_lists(interp, env)?;
    register_console(interp, env)?;
    Ok(())
}
