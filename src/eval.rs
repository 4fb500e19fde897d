// ABOUTME: Trampolined evaluator: special forms, closures, macros, and
// proper tail calls without host stack growth

use crate::error::{self, Error};
use crate::heap::Heap;
use crate::interp::Interp;
use crate::symbols::Symbol;
use crate::value::Value;

/// Operator state of an in-progress frame.
#[derive(Debug, Clone, Copy)]
pub(crate) enum OpSlot {
    /// The operator expression is still being reduced.
    Pending,
    /// IF is waiting on its condition value.
    If {
        then_branch: Value,
        else_branch: Value,
    },
    /// DEFINE is waiting on the value expression for `name`.
    Define { name: Symbol },
    /// APPLY is collecting its function and argument-list values.
    Apply,
    /// A macro body is running; its value becomes the next expression.
    Expand,
    /// The operator has been reduced to a callable value.
    Val(Value),
}

/// One reified evaluation in progress. Lisp call state lives in these
/// records on the context's frame stack, never on the host call stack.
#[derive(Debug)]
pub(crate) struct Frame {
    /// Environment the frame evaluates in.
    pub(crate) env: Value,
    pub(crate) op: OpSlot,
    /// Argument expressions still to evaluate, in source order.
    pub(crate) pending: Value,
    /// Argument values already computed, in source order.
    pub(crate) args: Vec<Value>,
    /// Remaining body expressions of an entered closure.
    pub(crate) body: Value,
}

impl Frame {
    fn new(env: Value, op: OpSlot, pending: Value) -> Self {
        Frame {
            env,
            op,
            pending,
            args: Vec::new(),
            body: Value::Nil,
        }
    }

    /// Marks every heap value the frame holds.
    pub(crate) fn mark(&self, heap: &mut Heap) {
        heap.mark(self.env);
        heap.mark(self.pending);
        heap.mark(self.body);
        match self.op {
            OpSlot::Val(v) => heap.mark(v),
            OpSlot::If {
                then_branch,
                else_branch,
            } => {
                heap.mark(then_branch);
                heap.mark(else_branch);
            }
            _ => {}
        }
        for &arg in &self.args {
            heap.mark(arg);
        }
    }
}

/// What a reduction step decided.
enum Reduction {
    /// The expression was already a value.
    Value(Value),
    /// A frame was pushed; reduce this expression next.
    Reduce(Value),
}

/// Where control goes after an application.
enum Transfer {
    /// A closure was entered; reduce this expression in this environment.
    Reduce(Value, Value),
    /// A builtin produced a value to hand to the enclosing frame.
    Deliver(Value),
}

impl Interp {
    /// Evaluates `expr` in `env`, driving the trampoline until the frame
    /// stack returns to its depth at entry.
    pub fn eval_expr(&mut self, expr: Value, env: Value) -> Result<Value, Error> {
        let base = self.frames.len();
        let result = self.run(base, expr, env);
        self.frames.truncate(base);
        if let Err(ref err) = result {
            self.note_error(err);
        }
        result
    }

    fn run(&mut self, base: usize, mut expr: Value, mut env: Value) -> Result<Value, Error> {
        'reduce: loop {
            self.gc_step(expr, env);

            // Reduce the current expression to a value.
            let mut value = match expr {
                Value::Symbol(sym) => self.env_get(env, sym)?,
                Value::Pair(p) => {
                    if !self.is_proper_list(expr) {
                        return Err(Error::syntax("expression is an improper list"));
                    }
                    let op = self.heap.car(p);
                    let args = self.heap.cdr(p);
                    match self.reduce_pair(op, args, env)? {
                        Reduction::Value(v) => v,
                        Reduction::Reduce(next) => {
                            expr = next;
                            continue 'reduce;
                        }
                    }
                }
                literal => literal,
            };

            // Deliver the value to enclosing frames until one of them
            // needs another expression reduced.
            'deliver: loop {
                if self.frames.len() == base {
                    return Ok(value);
                }

                // Body phase: further body expressions of an entered
                // closure remain; the value of a non-final one is dropped.
                if !self.frames.last().expect("frame").body.is_nil() {
                    let (next_env, next_expr) = self.next_body_expr();
                    env = next_env;
                    expr = next_expr;
                    continue 'reduce;
                }

                let op = self.frames.last().expect("frame").op;
                match op {
                    OpSlot::Pending => {
                        if let Value::Macro(cell) = value {
                            // Macro call: the body runs over the
                            // unevaluated argument expressions, and the
                            // outer frame re-evaluates its result in the
                            // caller's environment.
                            let outer = self.frames.last_mut().expect("frame");
                            outer.op = OpSlot::Expand;
                            let arg_exprs = outer.pending;
                            outer.pending = Value::Nil;
                            let args = self
                                .list_to_vec(arg_exprs)
                                .expect("call expressions are proper lists");
                            let mut inner =
                                Frame::new(env, OpSlot::Val(Value::Closure(cell)), Value::Nil);
                            inner.args = args;
                            self.frames.push(inner);
                            match self.apply_frame()? {
                                Transfer::Reduce(next_env, next_expr) => {
                                    env = next_env;
                                    expr = next_expr;
                                    continue 'reduce;
                                }
                                Transfer::Deliver(v) => {
                                    value = v;
                                    continue 'deliver;
                                }
                            }
                        }
                        self.frames.last_mut().expect("frame").op = OpSlot::Val(value);
                    }
                    OpSlot::If {
                        then_branch,
                        else_branch,
                    } => {
                        let frame = self.frames.pop().expect("frame");
                        env = frame.env;
                        // Only the literal false boolean takes the else
                        // branch.
                        expr = if value == Value::Bool(false) {
                            else_branch
                        } else {
                            then_branch
                        };
                        continue 'reduce;
                    }
                    OpSlot::Define { name } => {
                        let frame = self.frames.pop().expect("frame");
                        self.env_set(frame.env, name, value)?;
                        value = Value::Symbol(name);
                        continue 'deliver;
                    }
                    OpSlot::Expand => {
                        let frame = self.frames.pop().expect("frame");
                        env = frame.env;
                        expr = value;
                        continue 'reduce;
                    }
                    OpSlot::Apply | OpSlot::Val(_) => {
                        self.frames.last_mut().expect("frame").args.push(value);
                    }
                }

                // Argument phase: evaluate the next pending expression,
                // or apply once none remain.
                let pending = self.frames.last().expect("frame").pending;
                if let Value::Pair(p) = pending {
                    let next_expr = self.heap.car(p);
                    let rest = self.heap.cdr(p);
                    let frame = self.frames.last_mut().expect("frame");
                    frame.pending = rest;
                    env = frame.env;
                    expr = next_expr;
                    continue 'reduce;
                }

                match self.apply_frame()? {
                    Transfer::Reduce(next_env, next_expr) => {
                        env = next_env;
                        expr = next_expr;
                        continue 'reduce;
                    }
                    Transfer::Deliver(v) => {
                        value = v;
                        continue 'deliver;
                    }
                }
            }
        }
    }

    /// Handles a pair expression: special forms by interned-name match on
    /// the operator symbol, everything else as an application.
    fn reduce_pair(&mut self, op: Value, args: Value, env: Value) -> Result<Reduction, Error> {
        if let Value::Symbol(sym) = op {
            if sym == self.forms.quote {
                let [quoted] = self.expect_form_args::<1>("QUOTE", args)?;
                return Ok(Reduction::Value(quoted));
            }
            if sym == self.forms.if_ {
                let [cond, then_branch, else_branch] = self.expect_form_args::<3>("IF", args)?;
                self.frames.push(Frame::new(
                    env,
                    OpSlot::If {
                        then_branch,
                        else_branch,
                    },
                    Value::Nil,
                ));
                return Ok(Reduction::Reduce(cond));
            }
            if sym == self.forms.define {
                return self.reduce_define(args, env);
            }
            if sym == self.forms.lambda {
                let Value::Pair(p) = args else {
                    return Err(Error::arity("LAMBDA", error::ARITY_AT_LEAST_TWO, 0));
                };
                let params = self.heap.car(p);
                let body = self.heap.cdr(p);
                if body.is_nil() {
                    return Err(Error::arity("LAMBDA", error::ARITY_AT_LEAST_TWO, 1));
                }
                let closure = self.make_callable("LAMBDA", env, params, body, false)?;
                return Ok(Reduction::Value(closure));
            }
            if sym == self.forms.defmacro {
                return self.reduce_defmacro(args, env);
            }
            if sym == self.forms.apply {
                let [_, _] = self.expect_form_args::<2>("APPLY", args)?;
                let Value::Pair(p) = args else {
                    unreachable!("arity checked above")
                };
                let func_expr = self.heap.car(p);
                let rest = self.heap.cdr(p);
                self.frames.push(Frame::new(env, OpSlot::Apply, rest));
                return Ok(Reduction::Reduce(func_expr));
            }
        }

        // Ordinary application: reduce the operator expression first.
        self.frames.push(Frame::new(env, OpSlot::Pending, args));
        Ok(Reduction::Reduce(op))
    }

    /// DEFINE has two spellings: (DEFINE name value) and the lambda
    /// shorthand (DEFINE (name . params) body...). Both return the name.
    fn reduce_define(&mut self, args: Value, env: Value) -> Result<Reduction, Error> {
        let Value::Pair(p) = args else {
            return Err(Error::arity("DEFINE", error::ARITY_AT_LEAST_TWO, 0));
        };
        let target = self.heap.car(p);
        let rest = self.heap.cdr(p);
        if rest.is_nil() {
            return Err(Error::arity("DEFINE", error::ARITY_AT_LEAST_TWO, 1));
        }

        match target {
            Value::Symbol(name) => {
                let [_, value_expr] = self.expect_form_args::<2>("DEFINE", args)?;
                self.frames
                    .push(Frame::new(env, OpSlot::Define { name }, Value::Nil));
                Ok(Reduction::Reduce(value_expr))
            }
            Value::Pair(signature) => {
                let name = self.heap.car(signature);
                let Value::Symbol(name) = name else {
                    return Err(Error::wrong_type("DEFINE", "symbol", name.type_name(), 1));
                };
                let params = self.heap.cdr(signature);
                let closure = self.make_callable("DEFINE", env, params, rest, false)?;
                self.env_set(env, name, closure)?;
                Ok(Reduction::Value(Value::Symbol(name)))
            }
            other => Err(Error::wrong_type(
                "DEFINE",
                "symbol or signature",
                other.type_name(),
                1,
            )),
        }
    }

    /// DEFMACRO is the lambda shorthand with the macro tag.
    fn reduce_defmacro(&mut self, args: Value, env: Value) -> Result<Reduction, Error> {
        let Value::Pair(p) = args else {
            return Err(Error::arity("DEFMACRO", error::ARITY_AT_LEAST_TWO, 0));
        };
        let signature = self.heap.car(p);
        let body = self.heap.cdr(p);
        if body.is_nil() {
            return Err(Error::arity("DEFMACRO", error::ARITY_AT_LEAST_TWO, 1));
        }
        let Value::Pair(signature) = signature else {
            return Err(Error::syntax("DEFMACRO requires a (name . params) signature"));
        };
        let name = self.heap.car(signature);
        let Value::Symbol(name) = name else {
            return Err(Error::wrong_type("DEFMACRO", "symbol", name.type_name(), 1));
        };
        let params = self.heap.cdr(signature);
        let mac = self.make_callable("DEFMACRO", env, params, body, true)?;
        self.env_set(env, name, mac)?;
        Ok(Reduction::Value(Value::Symbol(name)))
    }

    /// Applies the top frame's operator to its collected arguments.
    fn apply_frame(&mut self) -> Result<Transfer, Error> {
        // APPLY resolves into an ordinary application of its first value
        // to the elements of its second.
        if matches!(self.frames.last().expect("frame").op, OpSlot::Apply) {
            let (func, arg_list) = {
                let frame = self.frames.last().expect("frame");
                (frame.args[0], frame.args[1])
            };
            let Some(args) = self.list_to_vec(arg_list) else {
                return Err(Error::syntax("APPLY requires a proper argument list"));
            };
            let frame = self.frames.last_mut().expect("frame");
            frame.op = OpSlot::Val(func);
            frame.args = args;
        }

        let op = match self.frames.last().expect("frame").op {
            OpSlot::Val(v) => v,
            _ => unreachable!("apply phase requires a reduced operator"),
        };

        match op {
            Value::Builtin(func) => {
                let frame = self.frames.pop().expect("frame");
                let args = self.vec_to_list(&frame.args);
                // Pin the arguments and calling environment: the
                // primitive may re-enter the evaluator and collect.
                let depth = self.protected.len();
                self.protected.push(args);
                self.protected.push(frame.env);
                let result = (func.0)(self, args);
                self.protected.truncate(depth);
                Ok(Transfer::Deliver(result?))
            }
            Value::Closure(cell) => {
                let captured = self.heap.car(cell);
                let Value::Pair(spec) = self.heap.cdr(cell) else {
                    return Err(Error::wrong_type("apply", "function", op.type_name(), 0));
                };
                let params = self.heap.car(spec);
                let body = self.heap.cdr(spec);

                let call_env = self.env_new(captured);
                let args = std::mem::take(&mut self.frames.last_mut().expect("frame").args);
                self.bind_params(call_env, params, &args)?;

                let frame = self.frames.last_mut().expect("frame");
                frame.env = call_env;
                frame.body = body;
                if frame.body.is_nil() {
                    self.frames.pop();
                    return Ok(Transfer::Deliver(Value::Nil));
                }
                let (next_env, next_expr) = self.next_body_expr();
                Ok(Transfer::Reduce(next_env, next_expr))
            }
            other => Err(Error::wrong_type("apply", "function", other.type_name(), 0)),
        }
    }

    /// Takes the next body expression out of the top frame. The final
    /// expression pops the frame first, so a tail call reuses its depth.
    fn next_body_expr(&mut self) -> (Value, Value) {
        let frame = self.frames.last().expect("frame");
        let env = frame.env;
        let Value::Pair(p) = frame.body else {
            unreachable!("body phase requires a non-empty body")
        };
        let next = self.heap.car(p);
        let rest = self.heap.cdr(p);
        let frame = self.frames.last_mut().expect("frame");
        frame.body = rest;
        if rest.is_nil() {
            self.frames.pop();
        }
        (env, next)
    }

    /// Builds the closure/macro cell `(env . (params . body))` after
    /// validating the parameter spec.
    pub(crate) fn make_callable(
        &mut self,
        form: &str,
        env: Value,
        params: Value,
        body: Value,
        is_macro: bool,
    ) -> Result<Value, Error> {
        if !self.is_proper_list(body) {
            return Err(Error::syntax("callable body must be a proper list"));
        }
        // Parameter spec: a proper list of symbols, a list of symbols
        // whose final tail is a rest symbol, or a bare rest symbol.
        let mut spec = params;
        let mut position = 1;
        loop {
            match spec {
                Value::Nil | Value::Symbol(_) => break,
                Value::Pair(p) => {
                    let param = self.heap.car(p);
                    if !matches!(param, Value::Symbol(_)) {
                        return Err(Error::wrong_type(form, "symbol", param.type_name(), position));
                    }
                    position += 1;
                    spec = self.heap.cdr(p);
                }
                other => {
                    return Err(Error::wrong_type(
                        form,
                        "parameter list",
                        other.type_name(),
                        1,
                    ));
                }
            }
        }
        let spec_and_body = self.cons(params, body);
        let cell = self.heap.alloc_pair(env, spec_and_body);
        Ok(if is_macro {
            Value::Macro(cell)
        } else {
            Value::Closure(cell)
        })
    }

    /// Binds a parameter spec to argument values in `env`, walking both
    /// in parallel. A bare symbol in tail position takes the rest.
    pub(crate) fn bind_params(
        &mut self,
        env: Value,
        params: Value,
        args: &[Value],
    ) -> Result<(), Error> {
        let mut spec = params;
        let mut taken = 0;
        loop {
            match spec {
                Value::Symbol(rest) => {
                    let tail = self.vec_to_list(&args[taken..]);
                    return self.env_set(env, rest, tail);
                }
                Value::Pair(p) => {
                    if taken >= args.len() {
                        let expected = self.param_arity(params);
                        return Err(Error::arity("lambda", expected, args.len()));
                    }
                    let param = self.heap.car(p);
                    let Value::Symbol(name) = param else {
                        return Err(Error::wrong_type(
                            "lambda",
                            "symbol",
                            param.type_name(),
                            taken + 1,
                        ));
                    };
                    self.env_set(env, name, args[taken])?;
                    taken += 1;
                    spec = self.heap.cdr(p);
                }
                _ => break,
            }
        }
        if taken != args.len() {
            let expected = self.param_arity(params);
            return Err(Error::arity("lambda", expected, args.len()));
        }
        Ok(())
    }

    /// Renders a parameter spec's arity for diagnostics.
    fn param_arity(&self, params: Value) -> String {
        let mut spec = params;
        let mut count = 0usize;
        loop {
            match spec {
                Value::Pair(p) => {
                    count += 1;
                    spec = self.heap.cdr(p);
                }
                Value::Nil => return count.to_string(),
                _ => return format!("at least {count}"),
            }
        }
    }

    /// Walks a special form's argument list into exactly N expressions.
    fn expect_form_args<const N: usize>(
        &self,
        form: &str,
        args: Value,
    ) -> Result<[Value; N], Error> {
        let mut out = [Value::Nil; N];
        let mut rest = args;
        for slot in &mut out {
            let Value::Pair(p) = rest else {
                return Err(Error::arity(form, N.to_string(), self.list_len(args)));
            };
            *slot = self.heap.car(p);
            rest = self.heap.cdr(p);
        }
        if !rest.is_nil() {
            return Err(Error::arity(form, N.to_string(), self.list_len(args)));
        }
        Ok(out)
    }

    /// Applies a builtin or closure to an argument list outside the
    /// trampoline; the entry point a primitive uses to call back in.
    pub fn apply(&mut self, func: Value, args: Value) -> Result<Value, Error> {
        match func {
            Value::Builtin(f) => {
                let depth = self.protected.len();
                self.protected.push(args);
                let result = (f.0)(self, args);
                self.protected.truncate(depth);
                result
            }
            Value::Closure(cell) => {
                let captured = self.heap.car(cell);
                let Value::Pair(spec) = self.heap.cdr(cell) else {
                    return Err(Error::wrong_type("APPLY", "function", func.type_name(), 0));
                };
                let params = self.heap.car(spec);
                let mut body = self.heap.cdr(spec);
                let Some(argv) = self.list_to_vec(args) else {
                    return Err(Error::syntax("APPLY requires a proper argument list"));
                };
                let call_env = self.env_new(captured);
                self.bind_params(call_env, params, &argv)?;

                let mut result = Value::Nil;
                while let Value::Pair(b) = body {
                    let expr = self.heap.car(b);
                    body = self.heap.cdr(b);
                    let depth = self.protected.len();
                    self.protected.push(body);
                    self.protected.push(call_env);
                    let step = self.eval_expr(expr, call_env);
                    self.protected.truncate(depth);
                    result = step?;
                }
                Ok(result)
            }
            other => Err(Error::wrong_type("APPLY", "function", other.type_name(), 0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(interp: &mut Interp, src: &str) -> Result<Value, Error> {
        interp.eval_source(src)
    }

    fn eval_ok(interp: &mut Interp, src: &str) -> Value {
        eval(interp, src).expect("evaluation failed")
    }

    #[test]
    fn test_literals_self_evaluate() {
        let mut interp = Interp::new();
        assert_eq!(eval_ok(&mut interp, "42"), Value::Integer(42));
        assert_eq!(eval_ok(&mut interp, "2.5"), Value::Float(2.5));
        assert_eq!(eval_ok(&mut interp, "#t"), Value::Bool(true));
        assert_eq!(eval_ok(&mut interp, "nil"), Value::Nil);
    }

    #[test]
    fn test_quote_returns_argument_unevaluated() {
        let mut interp = Interp::new();
        let v = eval_ok(&mut interp, "(quote (+ 1 2))");
        assert_eq!(interp.list_len(v), 3);

        assert!(matches!(
            eval(&mut interp, "(quote)"),
            Err(Error::WrongArity { .. })
        ));
        assert!(matches!(
            eval(&mut interp, "(quote a b)"),
            Err(Error::WrongArity { .. })
        ));
    }

    #[test]
    fn test_if_branches_on_literal_false_only() {
        let mut interp = Interp::new();
        let a = Value::Symbol(interp.intern("A"));
        let b = Value::Symbol(interp.intern("B"));
        assert_eq!(eval_ok(&mut interp, "(if #f 'a 'b)"), b);
        assert_eq!(eval_ok(&mut interp, "(if #t 'a 'b)"), a);
        assert_eq!(eval_ok(&mut interp, "(if 0 'a 'b)"), a);
        assert_eq!(eval_ok(&mut interp, "(if \"\" 'a 'b)"), a);
        assert_eq!(eval_ok(&mut interp, "(if nil 'a 'b)"), a);
    }

    #[test]
    fn test_if_requires_three_arguments() {
        let mut interp = Interp::new();
        assert!(matches!(
            eval(&mut interp, "(if #t 1)"),
            Err(Error::WrongArity { .. })
        ));
        assert!(matches!(
            eval(&mut interp, "(if #t 1 2 3)"),
            Err(Error::WrongArity { .. })
        ));
    }

    #[test]
    fn test_define_variable_returns_symbol() {
        let mut interp = Interp::new();
        let x = Value::Symbol(interp.intern("X"));
        assert_eq!(eval_ok(&mut interp, "(define x 42)"), x);
        assert_eq!(eval_ok(&mut interp, "x"), Value::Integer(42));
    }

    #[test]
    fn test_define_function_shorthand() {
        let mut interp = Interp::new();
        eval_ok(&mut interp, "(define (square n) (* n n))");
        assert_eq!(eval_ok(&mut interp, "(square 7)"), Value::Integer(49));
    }

    #[test]
    fn test_lambda_captures_environment() {
        let mut interp = Interp::new();
        eval_ok(
            &mut interp,
            "(define (adder n) (lambda (m) (+ n m))) (define add3 (adder 3))",
        );
        assert_eq!(eval_ok(&mut interp, "(add3 4)"), Value::Integer(7));
    }

    #[test]
    fn test_closure_body_runs_in_sequence() {
        let mut interp = Interp::new();
        eval_ok(&mut interp, "(define (two) (define unused 1) 2)");
        assert_eq!(eval_ok(&mut interp, "(two)"), Value::Integer(2));
    }

    #[test]
    fn test_rest_parameter() {
        let mut interp = Interp::new();
        eval_ok(&mut interp, "(define (tail x . rest) rest)");
        let v = eval_ok(&mut interp, "(tail 1 2 3)");
        assert_eq!(
            interp.list_to_vec(v),
            Some(vec![Value::Integer(2), Value::Integer(3)])
        );

        // A bare symbol takes every argument.
        eval_ok(&mut interp, "(define (all . xs) xs)");
        let v = eval_ok(&mut interp, "(all 1 2)");
        assert_eq!(interp.list_len(v), 2);
    }

    #[test]
    fn test_argument_count_mismatch() {
        let mut interp = Interp::new();
        eval_ok(&mut interp, "(define (pair a b) (cons a b))");
        assert!(matches!(
            eval(&mut interp, "(pair 1)"),
            Err(Error::WrongArity { .. })
        ));
        assert!(matches!(
            eval(&mut interp, "(pair 1 2 3)"),
            Err(Error::WrongArity { .. })
        ));
    }

    #[test]
    fn test_calling_a_non_function_fails() {
        let mut interp = Interp::new();
        assert!(matches!(
            eval(&mut interp, "(1 2 3)"),
            Err(Error::WrongType { .. })
        ));
    }

    #[test]
    fn test_unbound_symbol() {
        let mut interp = Interp::new();
        assert_eq!(
            eval(&mut interp, "missing"),
            Err(Error::UnboundSymbol("MISSING".to_string()))
        );
    }

    #[test]
    fn test_macro_receives_arguments_unevaluated() {
        let mut interp = Interp::new();
        eval_ok(
            &mut interp,
            "(defmacro (quoted x) (cons 'quote (cons x nil)))",
        );
        let v = eval_ok(&mut interp, "(quoted (+ 1 2))");
        assert_eq!(interp.list_len(v), 3);
    }

    #[test]
    fn test_macro_expansion_is_re_evaluated() {
        let mut interp = Interp::new();
        eval_ok(
            &mut interp,
            "(defmacro (twice x) (cons '+ (cons x (cons x nil))))",
        );
        assert_eq!(eval_ok(&mut interp, "(twice 21)"), Value::Integer(42));
    }

    #[test]
    fn test_apply_special_form() {
        let mut interp = Interp::new();
        assert_eq!(
            eval_ok(&mut interp, "(apply + (quote (1 2 3)))"),
            Value::Integer(6)
        );
        assert!(matches!(
            eval(&mut interp, "(apply +)"),
            Err(Error::WrongArity { .. })
        ));
        assert!(matches!(
            eval(&mut interp, "(apply + 1)"),
            Err(Error::Syntax(_))
        ));
    }

    #[test]
    fn test_apply_entry_point() {
        let mut interp = Interp::new();
        let plus = eval_ok(&mut interp, "+");
        let args = interp.vec_to_list(&[Value::Integer(2), Value::Integer(3)]);
        assert_eq!(interp.apply(plus, args), Ok(Value::Integer(5)));

        let square = eval_ok(&mut interp, "(lambda (n) (* n n))");
        let args = interp.vec_to_list(&[Value::Integer(6)]);
        assert_eq!(interp.apply(square, args), Ok(Value::Integer(36)));
    }

    #[test]
    fn test_improper_expression_rejected() {
        let mut interp = Interp::new();
        assert!(matches!(
            eval(&mut interp, "(+ 1 . 2)"),
            Err(Error::Syntax(_))
        ));
    }

    #[test]
    fn test_tail_recursion_reuses_frames() {
        let mut interp = Interp::new();
        eval_ok(
            &mut interp,
            "(define (loop n) (if (= n 0) 'done (loop (- n 1))))",
        );
        let done = Value::Symbol(interp.intern("DONE"));
        assert_eq!(eval_ok(&mut interp, "(loop 200000)"), done);
        assert!(interp.frames.is_empty());
    }

    #[test]
    fn test_non_special_operator_position_evaluates() {
        let mut interp = Interp::new();
        assert_eq!(
            eval_ok(&mut interp, "((lambda (x) (+ x 1)) 41)"),
            Value::Integer(42)
        );
        assert_eq!(
            eval_ok(&mut interp, "((if #t + *) 2 3)"),
            Value::Integer(5)
        );
    }
}
