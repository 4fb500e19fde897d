// ABOUTME: Configuration and constants for the interpreter and its REPL

pub const VERSION: &str = "1.0.0";
pub const WELCOME_MESSAGE: &str = "Bamboo Lisp v1.0";
pub const WELCOME_SUBTITLE: &str = "The amazingly embeddable Lisp, in Rust. Type (quit) to leave.";
pub const PROMPT: &str = "> ";

/// Evaluator steps between garbage collections.
pub const GC_STEPS_PER_SWEEP: usize = 10_000;

/// Line terminator written by DISPLAY and NEWLINE.
pub const LINEBREAK: &str = "\n";
