// ABOUTME: Interpreter context owning the heap, symbol table, root
// environment, and garbage collection policy

use crate::builtins;
use crate::config;
use crate::error::Error;
use crate::eval::Frame;
use crate::heap::Heap;
use crate::parser::{self, Parsed};
use crate::symbols::{Symbol, SymbolTable};
use crate::value::Value;
use std::io::{self, Write};

/// Interned names of the special forms, resolved once at start-up so the
/// evaluator recognises operators by handle comparison alone.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SpecialForms {
    pub quote: Symbol,
    pub if_: Symbol,
    pub define: Symbol,
    pub lambda: Symbol,
    pub defmacro: Symbol,
    pub apply: Symbol,
}

/// One interpreter instance. Everything the engine allocates hangs off
/// this context, and every collection starts from the roots it knows:
/// the root environment, the expression and environment the evaluator is
/// working on, the frame stack, and values pinned while a primitive runs.
///
/// A value obtained from the engine stays valid until the next collection
/// unless it is reachable from the root environment; print or re-bind
/// results before evaluating further, as a REPL naturally does.
pub struct Interp {
    pub(crate) heap: Heap,
    pub(crate) symbols: SymbolTable,
    pub(crate) forms: SpecialForms,
    /// Trampoline frames of every in-flight evaluation, outermost first.
    /// Lives here rather than on the evaluator's call stack so that a
    /// primitive re-entering the evaluator keeps its caller's paused
    /// frames inside the collector's root set.
    pub(crate) frames: Vec<Frame>,
    /// Values pinned for the duration of a primitive call.
    pub(crate) protected: Vec<Value>,
    root: Value,
    steps: usize,
    gc_threshold: usize,
    last_detail: String,
    sink: Box<dyn Write>,
}

impl Interp {
    /// Builds a fresh interpreter: empty heap, interned special forms, and
    /// a root environment populated with the standard primitives.
    pub fn new() -> Self {
        let mut symbols = SymbolTable::new();
        let forms = SpecialForms {
            quote: symbols.intern("QUOTE"),
            if_: symbols.intern("IF"),
            define: symbols.intern("DEFINE"),
            lambda: symbols.intern("LAMBDA"),
            defmacro: symbols.intern("DEFMACRO"),
            apply: symbols.intern("APPLY"),
        };
        let mut heap = Heap::new();
        let root = Value::Pair(heap.alloc_pair(Value::Nil, Value::Nil));

        let mut interp = Interp {
            heap,
            symbols,
            forms,
            frames: Vec::new(),
            protected: Vec::new(),
            root,
            steps: 0,
            gc_threshold: config::GC_STEPS_PER_SWEEP,
            last_detail: String::new(),
            sink: Box::new(io::stdout()),
        };
        builtins::register_builtins(&mut interp).expect("fresh root environment is a frame");
        interp
    }

    /// The root environment the primitives are installed in.
    pub fn root(&self) -> Value {
        self.root
    }

    /// Tears down the interpreter: frees every allocation unconditionally
    /// and forgets every interned name. Dropping the context has the same
    /// effect through ownership.
    pub fn destroy(&mut self) {
        self.frames.clear();
        self.protected.clear();
        self.heap.sweep_all();
        self.symbols.clear();
        self.root = Value::Nil;
    }

    /// Sets how many evaluator steps run between collections.
    pub fn set_gc_threshold(&mut self, steps: usize) {
        self.gc_threshold = steps.max(1);
    }

    /// Redirects the diagnostic sink DISPLAY and NEWLINE write to.
    pub fn set_sink(&mut self, sink: Box<dyn Write>) {
        self.sink = sink;
    }

    /// The text of the most recent diagnostic, for hosts that saw only an
    /// error code go by.
    pub fn error_detail(&self) -> &str {
        &self.last_detail
    }

    pub(crate) fn note_error(&mut self, err: &Error) {
        self.last_detail = err.to_string();
    }

    pub(crate) fn write_sink(&mut self, text: &str) {
        let _ = self.sink.write_all(text.as_bytes());
        let _ = self.sink.flush();
    }

    // ===== Garbage collection =====

    /// Called on every iteration of the evaluator's main loop; collects
    /// once the step counter reaches the configured threshold.
    pub(crate) fn gc_step(&mut self, expr: Value, env: Value) {
        self.steps += 1;
        if self.steps < self.gc_threshold {
            return;
        }
        self.steps = 0;
        self.collect(expr, env);
    }

    fn collect(&mut self, expr: Value, env: Value) {
        self.heap.mark(expr);
        self.heap.mark(env);
        self.heap.mark(self.root);
        for &value in &self.protected {
            self.heap.mark(value);
        }
        for frame in &self.frames {
            frame.mark(&mut self.heap);
        }
        self.heap.sweep();
    }

    pub fn live_pairs(&self) -> usize {
        self.heap.live_pairs()
    }

    pub fn live_strings(&self) -> usize {
        self.heap.live_strings()
    }

    // ===== Parsing entry points =====

    /// Parses one expression from `input`, returning what was read and the
    /// unconsumed remainder. The outcome distinguishes a value, the quote
    /// shorthand, a list terminator, and empty input.
    pub fn parse_expr<'a>(&mut self, input: &'a str) -> Result<(Parsed, &'a str), Error> {
        let result = parser::parse_expr(self, input);
        if let Err(ref err) = result {
            self.note_error(err);
        }
        result
    }

    /// Parses and evaluates every expression in `source` against the root
    /// environment, returning the value of the last one (Nil when the
    /// source held none).
    pub fn eval_source(&mut self, source: &str) -> Result<Value, Error> {
        let mut cursor = source;
        let mut result = Value::Nil;
        loop {
            match self.parse_expr(cursor)? {
                (Parsed::Empty, _) => break,
                (Parsed::ListEnd, _) => {
                    let err = Error::syntax("unexpected )");
                    self.note_error(&err);
                    return Err(err);
                }
                (Parsed::Expr(expr) | Parsed::Quoted(expr), rest) => {
                    cursor = rest;
                    let root = self.root;
                    result = self.eval_expr(expr, root)?;
                }
            }
        }
        Ok(result)
    }

    // ===== Value construction and inspection helpers =====

    pub fn intern(&mut self, name: &str) -> Symbol {
        self.symbols.intern(name)
    }

    pub fn symbol_name(&self, sym: Symbol) -> &str {
        self.symbols.name(sym)
    }

    pub fn cons(&mut self, head: Value, tail: Value) -> Value {
        Value::Pair(self.heap.alloc_pair(head, tail))
    }

    pub fn string(&mut self, text: &str) -> Value {
        Value::String(self.heap.alloc_string(text))
    }

    /// The text of a string value, or None for any other kind.
    pub fn string_text(&self, value: Value) -> Option<&str> {
        match value {
            Value::String(s) => Some(self.heap.text(s)),
            _ => None,
        }
    }

    /// True for Nil and for pair chains terminated by Nil.
    pub fn is_proper_list(&self, mut value: Value) -> bool {
        loop {
            match value {
                Value::Nil => return true,
                Value::Pair(p) => value = self.heap.cdr(p),
                _ => return false,
            }
        }
    }

    /// Collects a proper list into a vector; None for improper lists.
    pub fn list_to_vec(&self, mut value: Value) -> Option<Vec<Value>> {
        let mut out = Vec::new();
        loop {
            match value {
                Value::Nil => return Some(out),
                Value::Pair(p) => {
                    out.push(self.heap.car(p));
                    value = self.heap.cdr(p);
                }
                _ => return None,
            }
        }
    }

    /// Builds a proper list from a slice of values.
    pub fn vec_to_list(&mut self, items: &[Value]) -> Value {
        let mut list = Value::Nil;
        for &item in items.iter().rev() {
            list = self.cons(item, list);
        }
        list
    }

    /// Number of pair links in `value`; counts the proper prefix of an
    /// improper list.
    pub fn list_len(&self, mut value: Value) -> usize {
        let mut len = 0;
        while let Value::Pair(p) = value {
            len += 1;
            value = self.heap.cdr(p);
        }
        len
    }
}

impl Default for Interp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_populates_root() {
        let mut interp = Interp::new();
        let plus = interp.intern("+");
        let root = interp.root();
        assert!(matches!(
            interp.env_get(root, plus),
            Ok(Value::Builtin(_))
        ));
    }

    #[test]
    fn test_list_round_trip() {
        let mut interp = Interp::new();
        let list = interp.vec_to_list(&[Value::Integer(1), Value::Integer(2)]);
        assert!(interp.is_proper_list(list));
        assert_eq!(interp.list_len(list), 2);
        assert_eq!(
            interp.list_to_vec(list),
            Some(vec![Value::Integer(1), Value::Integer(2)])
        );
    }

    #[test]
    fn test_improper_list_detected() {
        let mut interp = Interp::new();
        let dotted = interp.cons(Value::Integer(1), Value::Integer(2));
        assert!(!interp.is_proper_list(dotted));
        assert_eq!(interp.list_to_vec(dotted), None);
        assert_eq!(interp.list_len(dotted), 1);
    }

    #[test]
    fn test_destroy_frees_everything() {
        let mut interp = Interp::new();
        interp.eval_source("(define xs (quote (1 2 3)))").unwrap();
        assert!(interp.live_pairs() > 0);
        interp.destroy();
        assert_eq!(interp.live_pairs(), 0);
        assert_eq!(interp.live_strings(), 0);
        assert!(interp.symbols.is_empty());
    }

    #[test]
    fn test_error_detail_recorded() {
        let mut interp = Interp::new();
        assert!(interp.eval_source("unbound-thing").is_err());
        assert_eq!(interp.error_detail(), "unbound symbol: UNBOUND-THING");
    }
}
