//! Console output: DISPLAY, CONCAT, NEWLINE
//!
//! DISPLAY and NEWLINE write to the interpreter's diagnostic sink.
//! Rendering differs from the pretty-printer: strings appear without
//! quotes, booleans as TRUE/FALSE, and nil is elided entirely.

use crate::builtins::gather;
use crate::config;
use crate::error::Error;
use crate::interp::Interp;
use crate::value::Value;

fn render(interp: &Interp, args: &[Value]) -> String {
    let mut out = String::new();
    for &arg in args {
        match arg {
            Value::Nil => {}
            Value::String(s) => out.push_str(interp.heap.text(s)),
            Value::Symbol(sym) => out.push_str(interp.symbol_name(sym)),
            Value::Bool(b) => out.push_str(if b { "TRUE" } else { "FALSE" }),
            other => interp.write_expr(&mut out, other),
        }
    }
    out
}

/// Writes the concatenated rendering of its arguments and a line
/// terminator to the sink, and returns the concatenation.
///
/// ```lisp
/// (display "n = " 42) => "n = 42"
/// ```
pub fn builtin_display(interp: &mut Interp, args: Value) -> Result<Value, Error> {
    let argv = gather(interp, args);
    let text = render(interp, &argv);
    interp.write_sink(&text);
    interp.write_sink(config::LINEBREAK);
    Ok(interp.string(&text))
}

/// The rendering of DISPLAY without the write or terminator.
///
/// ```lisp
/// (concat "a" 1 #t) => "a1TRUE"
/// ```
pub fn builtin_concat(interp: &mut Interp, args: Value) -> Result<Value, Error> {
    let argv = gather(interp, args);
    let text = render(interp, &argv);
    Ok(interp.string(&text))
}

/// Writes a line terminator to the sink.
pub fn builtin_newline(interp: &mut Interp, args: Value) -> Result<Value, Error> {
    let argv = gather(interp, args);
    if !argv.is_empty() {
        return Err(Error::arity("NEWLINE", "0", argv.len()));
    }
    interp.write_sink(config::LINEBREAK);
    Ok(Value::Nil)
}

/// Register all console builtins in the environment
pub fn register(interp: &mut Interp, env: Value) -> Result<(), Error> {
    interp.register_builtin(env, "DISPLAY", builtin_display)?;
    interp.register_builtin(env, "CONCAT", builtin_concat)?;
    interp.register_builtin(env, "NEWLINE", builtin_newline)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::Write;
    use std::rc::Rc;

    /// Sink whose contents the test can read back.
    #[derive(Clone, Default)]
    struct SharedSink(Rc<RefCell<Vec<u8>>>);

    impl SharedSink {
        fn text(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).expect("sink holds UTF-8")
        }
    }

    impl Write for SharedSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn capturing_interp() -> (Interp, SharedSink) {
        let mut interp = Interp::new();
        let sink = SharedSink::default();
        interp.set_sink(Box::new(sink.clone()));
        (interp, sink)
    }

    #[test]
    fn test_display_writes_and_returns() {
        let (mut interp, sink) = capturing_interp();
        let result = interp
            .eval_source("(display \"hello \" 1 \" \" #t)")
            .unwrap();
        assert_eq!(interp.string_text(result), Some("hello 1 TRUE"));
        assert_eq!(sink.text(), "hello 1 TRUE\n");
    }

    #[test]
    fn test_display_elides_nil() {
        let (mut interp, sink) = capturing_interp();
        let result = interp.eval_source("(display \"a\" nil \"b\")").unwrap();
        assert_eq!(interp.string_text(result), Some("ab"));
        assert_eq!(sink.text(), "ab\n");
    }

    #[test]
    fn test_display_renders_symbols_and_floats() {
        let (mut interp, sink) = capturing_interp();
        interp.eval_source("(display 'foo \" \" 2.5)").unwrap();
        assert_eq!(sink.text(), "FOO 2.5\n");
    }

    #[test]
    fn test_concat_does_not_write() {
        let (mut interp, sink) = capturing_interp();
        let result = interp.eval_source("(concat \"a\" 1 #f)").unwrap();
        assert_eq!(interp.string_text(result), Some("a1FALSE"));
        assert_eq!(sink.text(), "");
    }

    #[test]
    fn test_newline() {
        let (mut interp, sink) = capturing_interp();
        assert_eq!(interp.eval_source("(newline)"), Ok(Value::Nil));
        assert_eq!(sink.text(), "\n");
        assert!(matches!(
            interp.eval_source("(newline 1)"),
            Err(Error::WrongArity { .. })
        ));
    }
}
