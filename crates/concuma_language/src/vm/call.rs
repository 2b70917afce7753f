//! Call protocol shared by the statement and expression forms.

use std::rc::Rc;

use concuma_foundation::{Error, ErrorKind, ExecutionLimit, Result, Value};

use super::{Flow, Interpreter};
use crate::binding::{Binding, Function};
use crate::environment::Environment;
use crate::native::NativeFn;

enum Callee {
    User(Rc<Function>),
    Native(NativeFn),
}

impl Interpreter<'_> {
    /// Decodes a call, evaluates its arguments in the caller's environment
    /// and invokes the callee.
    pub(crate) fn call(&mut self) -> Result<Value> {
        let symbol = self.cursor.read_symbol();
        let argc = self.cursor.read_count(1)?;
        let mut args = Vec::with_capacity(argc);
        for _ in 0..argc {
            args.push(self.eval_value()?);
        }

        let binding = self.resolve(symbol)?;
        let callee = match &*binding.borrow() {
            Binding::Function(function) => Callee::User(Rc::clone(function)),
            Binding::ExtFunction { native, .. } => Callee::Native(native.clone()),
            other => {
                return Err(Error::new(ErrorKind::NotCallable(format!(
                    "{} {}",
                    other.kind(),
                    self.name(symbol)
                ))));
            }
        };
        match callee {
            Callee::Native(native) => native.call(&args),
            Callee::User(function) => self.invoke(&function, args),
        }
    }

    /// Runs a user function body in a fresh frame.
    ///
    /// The caller's cursor and environment are restored on every path.
    fn invoke(&mut self, function: &Function, args: Vec<Value>) -> Result<Value> {
        let program = self.program;
        let names = program.names();
        if args.len() != function.params.len() {
            return Err(Error::arity_mismatch(
                function.name.render(names),
                function.params.len().to_string(),
                args.len(),
            ));
        }
        let limit = self.config.max_call_depth;
        if self.depth >= limit {
            return Err(Error::limit_exceeded(ExecutionLimit::CallDepth { limit }));
        }

        let frame = Environment::child(&function.closure);
        for (&param, value) in function.params.iter().zip(args) {
            frame.add(
                param,
                Binding::Var {
                    is_const: false,
                    value,
                },
            )?;
        }
        tracing::trace!(
            function = %function.name.render(names),
            depth = self.depth + 1,
            "call"
        );

        let return_to = self.cursor.position();
        let caller_env = std::mem::replace(&mut self.env, frame);
        let caller_namespace =
            std::mem::replace(&mut self.namespace, function.name.parent_path().to_vec());
        self.cursor.seek(function.body);
        self.depth += 1;
        let result = self.exec_statement();
        self.depth -= 1;
        self.namespace = caller_namespace;
        self.env = caller_env;
        self.cursor.seek(return_to);

        match result {
            Ok(Flow::Return(value)) => Ok(value),
            Ok(Flow::Normal) => Ok(Value::Null),
            Ok(flow @ Flow::Break) => Err(flow.stray().in_frame(function.name.render(names))),
            Err(err) => Err(err.in_frame(function.name.render(names))),
        }
    }
}
