// ABOUTME: REPL and script-mode driver hosting the bamboo engine

use bamboo::{config, lexer, Error, Interp, Parsed, Value};
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Config, Editor};
use rustyline_derive::{Completer, Helper, Highlighter, Hinter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// The amazingly embeddable Lisp
#[derive(Parser, Debug)]
#[command(name = "bamboo")]
#[command(version = config::VERSION)]
#[command(about = "The amazingly embeddable Lisp")]
struct CliArgs {
    /// Script file to execute (starts a REPL when omitted)
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,

    /// Evaluator steps between garbage collections
    #[arg(long = "gc-steps", value_name = "STEPS", default_value_t = config::GC_STEPS_PER_SWEEP)]
    gc_steps: usize,

    /// Print the token spans of each input before parsing it
    #[arg(long = "trace-tokens")]
    trace_tokens: bool,

    /// Skip the welcome banner
    #[arg(long = "quiet", short = 'q')]
    quiet: bool,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let mut interp = Interp::new();
    interp.set_gc_threshold(args.gc_steps);
    register_repl_builtins(&mut interp);

    match args.script {
        Some(ref path) => run_script(&mut interp, path),
        None => run_repl(&mut interp, &args),
    }
}

// ============================================================================
// REPL-specific built-in functions
// ============================================================================

/// (LOAD "file.lisp") reads a source file and evaluates it in the root
/// environment, returning the last value.
fn builtin_load(interp: &mut Interp, args: Value) -> Result<Value, Error> {
    let argv = interp.list_to_vec(args).unwrap_or_default();
    if argv.len() != 1 {
        return Err(Error::arity("LOAD", "1", argv.len()));
    }
    let Some(path) = interp.string_text(argv[0]).map(str::to_string) else {
        return Err(Error::wrong_type("LOAD", "string", argv[0].type_name(), 1));
    };
    let source = std::fs::read_to_string(&path)
        .map_err(|err| Error::unknown(format!("cannot read {path}: {err}")))?;
    interp.eval_source(&source)
}

fn register_repl_builtins(interp: &mut Interp) {
    let env = interp.root();
    interp
        .register_builtin(env, "LOAD", builtin_load)
        .expect("fresh root environment is a frame");
}

// ============================================================================
// Drivers
// ============================================================================

fn run_script(interp: &mut Interp, path: &Path) -> ExitCode {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Cannot read script file {}: {err}", path.display());
            return ExitCode::FAILURE;
        }
    };
    match interp.eval_source(&source) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_repl(interp: &mut Interp, args: &CliArgs) -> ExitCode {
    let rl_config = Config::builder().auto_add_history(true).build();
    let mut rl = match Editor::with_config(rl_config) {
        Ok(rl) => rl,
        Err(err) => {
            eprintln!("Failed to initialize REPL: {err}");
            return ExitCode::FAILURE;
        }
    };
    rl.set_helper(Some(BambooHelper));

    let history_file = ".bamboo_history";
    let _ = rl.load_history(history_file);

    if !args.quiet {
        println!("{}", config::WELCOME_MESSAGE);
        println!("{}", config::WELCOME_SUBTITLE);
    }

    loop {
        match rl.readline(config::PROMPT) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                match line.trim() {
                    "(quit)" | "(exit)" => {
                        println!("Goodbye!");
                        break;
                    }
                    _ => {}
                }
                if args.trace_tokens {
                    println!("{}", lexer::trace_tokens(&line));
                }
                eval_line(interp, &line);
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: {err}");
                break;
            }
        }
    }

    let _ = rl.save_history(history_file);
    ExitCode::SUCCESS
}

/// Parses and evaluates every expression on `line`, printing each result.
/// An error aborts the current form only; the environment survives.
fn eval_line(interp: &mut Interp, line: &str) {
    let mut cursor = line;
    loop {
        match interp.parse_expr(cursor) {
            Ok((Parsed::Empty, _)) => break,
            Ok((Parsed::Expr(expr) | Parsed::Quoted(expr), rest)) => {
                cursor = rest;
                let root = interp.root();
                match interp.eval_expr(expr, root) {
                    Ok(result) => println!("=> {}", interp.print_expr(result)),
                    Err(err) => {
                        eprintln!("Error: {err}");
                        break;
                    }
                }
            }
            Ok((Parsed::ListEnd, _)) => {
                eprintln!("Error: {}", Error::syntax("unexpected )"));
                break;
            }
            Err(err) => {
                eprintln!("Error: {err}");
                break;
            }
        }
    }
}

// ============================================================================
// Line editing
// ============================================================================

/// Keeps the REPL reading more lines until every bracket is balanced.
#[derive(Completer, Helper, Highlighter, Hinter)]
struct BambooHelper;

impl Validator for BambooHelper {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> rustyline::Result<ValidationResult> {
        if bracket_surplus(ctx.input()) > 0 {
            Ok(ValidationResult::Incomplete)
        } else {
            Ok(ValidationResult::Valid(None))
        }
    }
}

/// Count of unclosed parentheses, ignoring strings and comments.
fn bracket_surplus(input: &str) -> i32 {
    let mut depth = 0;
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            '"' => {
                for c in chars.by_ref() {
                    if c == '"' {
                        break;
                    }
                }
            }
            ';' => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            _ => {}
        }
    }
    depth
}
