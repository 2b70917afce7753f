//! Statement dispatch.

use std::rc::Rc;

use concuma_foundation::{Error, ErrorKind, Result, Value, coerce};

use super::{Flow, Interpreter};
use crate::binding::{Binding, Class, Function, ModuleScope};
use crate::environment::Environment;
use crate::opcode::StmtOp;
use crate::skip;

impl Interpreter<'_> {
    pub(super) fn dispatch_statement(&mut self) -> Result<Flow> {
        let byte = self.cursor.advance();
        let Some(op) = StmtOp::from_byte(byte) else {
            return Err(Error::unknown_opcode("statement", byte));
        };
        match op {
            StmtOp::Print => self.print(),
            StmtOp::If => self.if_statement(),
            StmtOp::Block => self.block(),
            StmtOp::Declaration => self.declaration(),
            StmtOp::Definition => self.definition(),
            StmtOp::For => self.for_loop(),
            StmtOp::Break => Ok(Flow::Break),
            StmtOp::Function => self.function_declaration(),
            StmtOp::Call => self.call().map(|_| Flow::Normal),
            StmtOp::Return => self.return_statement(),
            StmtOp::Class => self.class_declaration(),
            StmtOp::Module => self.module_declaration(),
            StmtOp::Import => self.import(),
            StmtOp::Reserved => Err(Error::new(ErrorKind::ReservedOpcode(op.byte()))),
        }
    }

    fn print(&mut self) -> Result<Flow> {
        let operand = self.eval_expression()?;
        let line = operand.render(self.program.names());
        if self.config.echo_output {
            println!("{line}");
        } else {
            self.output.push(line);
        }
        Ok(Flow::Normal)
    }

    fn if_statement(&mut self) -> Result<Flow> {
        let condition = self.eval_value()?;
        if coerce::truthy(&condition)? {
            let flow = self.exec_statement()?;
            // A signal leaves the cursor mid-branch; its receiver repositions.
            if flow.is_normal() {
                self.skip_optional_statement()?;
            }
            Ok(flow)
        } else {
            self.skip_statement()?;
            self.exec_optional_statement()
        }
    }

    fn block(&mut self) -> Result<Flow> {
        let count = self.cursor.read_count(1)?;
        let scope = Environment::child(&self.env);
        self.scoped(scope, |vm| {
            for _ in 0..count {
                let flow = vm.exec_statement()?;
                if !flow.is_normal() {
                    return Ok(flow);
                }
            }
            Ok(Flow::Normal)
        })
    }

    fn declaration(&mut self) -> Result<Flow> {
        let is_const = self.cursor.advance() != 0;
        let symbol = self.cursor.read_symbol();
        let value = if self.cursor.child_present() {
            self.eval_value()?
        } else {
            Value::Null
        };
        self.bind(symbol, Binding::Var { is_const, value })?;
        Ok(Flow::Normal)
    }

    fn definition(&mut self) -> Result<Flow> {
        let symbol = self.cursor.read_symbol();
        let binding = self.resolve(symbol)?;
        match &*binding.borrow() {
            Binding::Var { is_const: false, .. } => {}
            Binding::Var { is_const: true, .. } => {
                return Err(Error::new(ErrorKind::ConstAssignment(self.name(symbol))));
            }
            other => {
                return Err(Error::new(ErrorKind::NotAssignable(format!(
                    "{} {}",
                    other.kind(),
                    self.name(symbol)
                ))));
            }
        }
        let value = self.eval_value()?;
        if let Binding::Var { value: slot, .. } = &mut *binding.borrow_mut() {
            *slot = value;
        }
        Ok(Flow::Normal)
    }

    fn for_loop(&mut self) -> Result<Flow> {
        let scope = Environment::child(&self.env);
        self.scoped(scope, |vm| {
            let init = vm.exec_optional_statement()?;
            if !init.is_normal() {
                return Ok(init);
            }
            let condition_at = vm.cursor.position();
            loop {
                vm.cursor.seek(condition_at);
                let condition = vm.eval_value()?;
                if !coerce::truthy(&condition)? {
                    vm.skip_statement()?;
                    vm.skip_optional_statement()?;
                    return Ok(Flow::Normal);
                }
                let body_at = vm.cursor.position();
                match vm.exec_statement()? {
                    Flow::Normal => match vm.loop_step()? {
                        Flow::Normal => {}
                        Flow::Break => return Ok(Flow::Normal),
                        flow @ Flow::Return(_) => return Ok(flow),
                    },
                    Flow::Break => {
                        vm.cursor.seek(body_at);
                        vm.skip_statement()?;
                        return match vm.loop_step()? {
                            flow @ Flow::Return(_) => Ok(flow),
                            _ => Ok(Flow::Normal),
                        };
                    }
                    flow @ Flow::Return(_) => return Ok(flow),
                }
            }
        })
    }

    /// Runs the optional increment of a loop. On `break` the cursor is moved
    /// past the increment so the loop can end cleanly.
    fn loop_step(&mut self) -> Result<Flow> {
        let step_at = self.cursor.position();
        let flow = self.exec_optional_statement()?;
        if flow == Flow::Break {
            self.cursor.seek(step_at);
            self.skip_optional_statement()?;
        }
        Ok(flow)
    }

    fn function_declaration(&mut self) -> Result<Flow> {
        let symbol = self.cursor.read_symbol();
        let count = self.cursor.read_count(4)?;
        let closure = Environment::child(&self.env);
        let mut params = Vec::with_capacity(count);
        for _ in 0..count {
            let param = self.cursor.read_symbol();
            self.bind_in(&closure, param, Binding::uninitialized())?;
            params.push(param);
        }
        let body = self.cursor.position();
        self.skip_statement()?;

        let function = Function {
            name: self.qualify(symbol),
            params,
            body,
            closure,
        };
        tracing::debug!(
            function = %function.name.render(self.program.names()),
            params = count,
            body,
            "function declared"
        );
        self.bind(symbol, Binding::Function(Rc::new(function)))?;
        Ok(Flow::Normal)
    }

    fn return_statement(&mut self) -> Result<Flow> {
        let value = if self.cursor.child_present() {
            self.eval_value()?
        } else {
            Value::Null
        };
        Ok(Flow::Return(value))
    }

    fn class_declaration(&mut self) -> Result<Flow> {
        let symbol = self.cursor.read_symbol();
        let variable_offsets = skip::skip_members(&mut self.cursor)?;
        let method_offsets = skip::skip_members(&mut self.cursor)?;
        let class = Class {
            name: self.qualify(symbol),
            variable_offsets,
            method_offsets,
            closure: Rc::clone(&self.env),
        };
        tracing::debug!(
            class = %class.name.render(self.program.names()),
            variables = class.variable_offsets.len(),
            methods = class.method_offsets.len(),
            "class declared"
        );
        self.bind(symbol, Binding::Class(Rc::new(class)))?;
        Ok(Flow::Normal)
    }

    fn module_declaration(&mut self) -> Result<Flow> {
        let symbol = self.cursor.read_symbol();
        let scope = Environment::child(&self.env);
        self.namespace.push(symbol);
        let result = self.scoped(Rc::clone(&scope), |vm| {
            vm.module_members()?;
            vm.module_members()
        });
        self.namespace.pop();
        result?;

        let module = ModuleScope {
            name: self.qualify(symbol),
            env: scope,
        };
        tracing::debug!(
            module = %module.name.render(self.program.names()),
            "module declared"
        );
        self.bind(symbol, Binding::Env(Rc::new(module)))?;
        Ok(Flow::Normal)
    }

    fn module_members(&mut self) -> Result<()> {
        let count = self.cursor.read_count(1)?;
        for _ in 0..count {
            let flow = self.exec_statement()?;
            if !flow.is_normal() {
                return Err(flow.stray());
            }
        }
        Ok(())
    }

    fn import(&mut self) -> Result<Flow> {
        let symbol = self.cursor.read_symbol();
        let alias = if self.cursor.child_present() {
            Some(self.cursor.read_symbol())
        } else {
            None
        };
        let program = self.program;
        let names = program.names();
        let name = names
            .get(symbol)
            .ok_or_else(|| Error::new(ErrorKind::UnnamedSymbol(symbol)))?;
        let native = self
            .natives
            .get(name)
            .cloned()
            .ok_or_else(|| Error::new(ErrorKind::UnregisteredNative(name.to_string())))?;
        let target = alias.unwrap_or(symbol);
        tracing::debug!(
            native = name,
            binding = %names.display(target),
            arity = %native.arity(),
            "host function imported"
        );
        let binding = Binding::ExtFunction {
            name: self.qualify(target),
            native,
        };
        self.bind(target, binding)?;
        Ok(Flow::Normal)
    }
}
