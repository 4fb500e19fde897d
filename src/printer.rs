// ABOUTME: Renders values back to reader syntax for diagnostics and REPLs

use crate::heap::PairRef;
use crate::interp::Interp;
use crate::value::Value;

impl Interp {
    /// Renders `value` as text. The reader and this rendering round-trip
    /// for every value except closures, macros, and builtins.
    pub fn print_expr(&self, value: Value) -> String {
        let mut out = String::new();
        self.write_expr(&mut out, value);
        out
    }

    pub(crate) fn write_expr(&self, out: &mut String, value: Value) {
        match value {
            Value::Nil => out.push_str("nil"),
            Value::Integer(n) => out.push_str(&n.to_string()),
            // Debug formatting keeps a decimal point or exponent, so a
            // float never reads back as an integer.
            Value::Float(f) => out.push_str(&format!("{f:?}")),
            Value::Bool(true) => out.push_str("#t"),
            Value::Bool(false) => out.push_str("#f"),
            Value::Symbol(sym) => out.push_str(self.symbols.name(sym)),
            Value::String(s) => {
                out.push('"');
                out.push_str(self.heap.text(s));
                out.push('"');
            }
            Value::Pair(p) => self.write_pair(out, p),
            Value::Builtin(f) => {
                out.push_str(&format!("#<BUILTIN:{:#x}>", f.addr()));
            }
            Value::Closure(cell) => self.write_callable(out, "FUNCTION", cell),
            Value::Macro(cell) => self.write_callable(out, "MACRO", cell),
        }
    }

    /// Lists print element-wise; a non-nil tail prints after a dot.
    fn write_pair(&self, out: &mut String, p: PairRef) {
        out.push('(');
        self.write_expr(out, self.heap.car(p));
        let mut tail = self.heap.cdr(p);
        loop {
            match tail {
                Value::Nil => break,
                Value::Pair(next) => {
                    out.push(' ');
                    self.write_expr(out, self.heap.car(next));
                    tail = self.heap.cdr(next);
                }
                other => {
                    out.push_str(" . ");
                    self.write_expr(out, other);
                    break;
                }
            }
        }
        out.push(')');
    }

    fn write_callable(&self, out: &mut String, tag: &str, cell: PairRef) {
        out.push_str("#<");
        out.push_str(tag);
        out.push(':');
        if let Value::Pair(spec) = self.heap.cdr(cell) {
            self.write_expr(out, self.heap.car(spec));
            out.push(' ');
            self.write_expr(out, self.heap.cdr(spec));
        }
        out.push('>');
    }
}
