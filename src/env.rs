// ABOUTME: Environment chain: parent-linked binding frames stored as
// heap pairs

use crate::error::Error;
use crate::interp::Interp;
use crate::symbols::Symbol;
use crate::value::{BuiltinFn, NativeFn, Value};

// An environment is the pair (parent . bindings) where bindings is a list
// of (symbol . value) pairs. The representation lives on the heap so that
// captured environments are collected exactly like any other structure.
impl Interp {
    /// Creates a frame with no bindings. `parent` is Nil for the root.
    pub fn env_new(&mut self, parent: Value) -> Value {
        self.cons(parent, Value::Nil)
    }

    /// Looks up a symbol in the frame chain, innermost frame first.
    /// Symbols are interned, so the scan compares handles.
    pub fn env_get(&self, env: Value, sym: Symbol) -> Result<Value, Error> {
        let mut frame = env;
        while let Value::Pair(f) = frame {
            let mut bindings = self.heap.cdr(f);
            while let Value::Pair(b) = bindings {
                if let Value::Pair(entry) = self.heap.car(b) {
                    if self.heap.car(entry) == Value::Symbol(sym) {
                        return Ok(self.heap.cdr(entry));
                    }
                }
                bindings = self.heap.cdr(b);
            }
            frame = self.heap.car(f);
        }
        Err(Error::UnboundSymbol(self.symbols.name(sym).to_string()))
    }

    /// Updates an existing binding in `env`'s own frame, else prepends a
    /// new one. Never walks the parent chain: assigning over an outer
    /// binding shadows it locally.
    pub fn env_set(&mut self, env: Value, sym: Symbol, value: Value) -> Result<(), Error> {
        let Value::Pair(frame) = env else {
            return Err(Error::wrong_type("DEFINE", "environment", env.type_name(), 0));
        };

        let mut bindings = self.heap.cdr(frame);
        while let Value::Pair(b) = bindings {
            if let Value::Pair(entry) = self.heap.car(b) {
                if self.heap.car(entry) == Value::Symbol(sym) {
                    self.heap.set_cdr(entry, value);
                    return Ok(());
                }
            }
            bindings = self.heap.cdr(b);
        }

        let entry = self.cons(Value::Symbol(sym), value);
        let head = self.heap.cdr(frame);
        let bindings = self.cons(entry, head);
        self.heap.set_cdr(frame, bindings);
        Ok(())
    }

    /// Interns `name` and binds it to a primitive in `env`. Callers pass
    /// the upper-cased spelling the reader produces.
    pub fn register_builtin(
        &mut self,
        env: Value,
        name: &str,
        func: BuiltinFn,
    ) -> Result<(), Error> {
        let sym = self.intern(name);
        self.env_set(env, sym, Value::Builtin(NativeFn(func)))
    }
}
