//! Tree-walking interpreter over the flat instruction stream.
//!
//! The VM decodes statements directly from the program image. There is no
//! separate call stack: a user-function call saves the caller's cursor and
//! environment, seeks to the function body, executes exactly one statement
//! there and restores both afterwards.
//!
//! `break` and `return` are not errors. Every statement yields a [`Flow`]
//! which the nearest enclosing loop or call consumes; anything that reaches
//! the top level unconsumed aborts the run.
//!
//! # Example
//!
//! ```
//! use concuma_language::Vm;
//! use concuma_language::emit::{Expr, ProgramBuilder, Stmt};
//! use concuma_language::opcode::BinaryOp;
//!
//! let mut builder = ProgramBuilder::new();
//! builder.push(Stmt::print(Expr::binary(BinaryOp::Add, Expr::int(2), Expr::int(3))));
//! let program = builder.build_program().unwrap();
//!
//! let mut vm = Vm::new();
//! vm.run(&program).unwrap();
//! assert_eq!(vm.output(), ["5"]);
//! ```

mod call;
mod expression;
mod statement;

use std::rc::Rc;

use concuma_foundation::{Error, ErrorKind, ExecutionLimit, Result, SymbolId, Value};

use crate::binding::{Binding, BindingRef, QualifiedName};
use crate::config::VmConfig;
use crate::cursor::Cursor;
use crate::environment::{EnvRef, Environment};
use crate::native::{NativeFn, NativeRegistry};
use crate::program::{CODE_START, Program};
use crate::skip;
use crate::stack::ensure_sufficient_stack;

/// Outcome of executing one statement.
#[derive(Clone, Debug, PartialEq)]
pub enum Flow {
    /// Continue with the next statement.
    Normal,
    /// Leave the innermost enclosing loop.
    Break,
    /// Leave the current user function with a value.
    Return(Value),
}

impl Flow {
    /// Returns true for [`Flow::Normal`].
    #[must_use]
    pub fn is_normal(&self) -> bool {
        matches!(self, Self::Normal)
    }

    /// Keyword that raised the signal.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Break => "break",
            Self::Return(_) => "return",
        }
    }

    /// Converts a signal that nothing can receive into an error.
    fn stray(&self) -> Error {
        Error::new(ErrorKind::StrayControlFlow(self.keyword()))
    }
}

/// The Concuma virtual machine.
///
/// Holds the host function registry, the captured `Print` output and the
/// configuration. Each [`run`](Self::run) starts from a fresh root environment.
#[derive(Debug, Default)]
pub struct Vm {
    natives: NativeRegistry,
    output: Vec<String>,
    config: VmConfig,
}

impl Vm {
    /// Creates a VM with the default configuration and no host functions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a VM with the given configuration.
    #[must_use]
    pub fn with_config(config: VmConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    /// Host functions available to Import.
    #[must_use]
    pub fn natives(&self) -> &NativeRegistry {
        &self.natives
    }

    /// Mutable access to the host function registry.
    pub fn natives_mut(&mut self) -> &mut NativeRegistry {
        &mut self.natives
    }

    /// Registers one host function.
    pub fn register_native(&mut self, native: NativeFn) -> Result<()> {
        self.natives.register(native)
    }

    /// Executes every top-level statement of `program`.
    ///
    /// Output produced before a failure is kept.
    pub fn run(&mut self, program: &Program) -> Result<()> {
        tracing::debug!(
            code_bytes = program.code_end() - CODE_START,
            names = program.names().len(),
            "run started"
        );
        let mut interpreter =
            Interpreter::new(program, &self.natives, &self.config, &mut self.output);
        let result = interpreter.run();
        tracing::debug!(
            ok = result.is_ok(),
            statements = interpreter.executed,
            "run finished"
        );
        result
    }

    /// Loads `bytes` as a program image and runs it.
    pub fn run_bytes(&mut self, bytes: impl Into<Vec<u8>>) -> Result<()> {
        let program = Program::load(bytes)?;
        self.run(&program)
    }

    /// Lines printed so far. Always empty while output is echoed.
    #[must_use]
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Takes the printed lines, leaving the buffer empty.
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    /// Clears the output buffer.
    pub fn clear_output(&mut self) {
        self.output.clear();
    }

    /// Forgets every host function and all output.
    pub fn reset(&mut self) {
        self.natives.clear();
        self.output.clear();
    }
}

/// Execution state of one run.
pub(crate) struct Interpreter<'a> {
    program: &'a Program,
    cursor: Cursor<'a>,
    env: EnvRef,
    natives: &'a NativeRegistry,
    config: &'a VmConfig,
    output: &'a mut Vec<String>,
    /// Module path of the declarations currently being executed.
    namespace: Vec<SymbolId>,
    /// Active user-function calls.
    depth: usize,
    /// Statements executed so far.
    executed: u64,
}

impl<'a> Interpreter<'a> {
    fn new(
        program: &'a Program,
        natives: &'a NativeRegistry,
        config: &'a VmConfig,
        output: &'a mut Vec<String>,
    ) -> Self {
        Self {
            program,
            cursor: Cursor::at(program.bytes(), CODE_START),
            env: Environment::root(),
            natives,
            config,
            output,
            namespace: Vec::new(),
            depth: 0,
            executed: 0,
        }
    }

    fn run(&mut self) -> Result<()> {
        let end = self.program.code_end();
        while self.cursor.position() < end {
            let start = self.cursor.position();
            let flow = self.exec_statement()?;
            if !flow.is_normal() {
                return Err(flow.stray().at_offset(start));
            }
        }
        Ok(())
    }

    /// Executes one statement, tagging any error with its offset.
    pub(crate) fn exec_statement(&mut self) -> Result<Flow> {
        let start = self.cursor.position();
        ensure_sufficient_stack(|| {
            self.consume_fuel()
                .and_then(|()| self.dispatch_statement())
                .map_err(|err| err.at_offset(start))
        })
    }

    /// Executes the optional statement behind a presence marker.
    pub(crate) fn exec_optional_statement(&mut self) -> Result<Flow> {
        if self.cursor.child_present() {
            self.exec_statement()
        } else {
            Ok(Flow::Normal)
        }
    }

    fn consume_fuel(&mut self) -> Result<()> {
        self.executed += 1;
        match self.config.exec_fuel {
            Some(limit) if self.executed > limit => {
                Err(Error::limit_exceeded(ExecutionLimit::Fuel { limit }))
            }
            _ => Ok(()),
        }
    }

    /// Runs `f` with `env` as the active environment, restoring the previous
    /// one afterwards whatever the outcome.
    pub(crate) fn scoped<T>(
        &mut self,
        env: EnvRef,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let saved = std::mem::replace(&mut self.env, env);
        let result = f(self);
        self.env = saved;
        result
    }

    pub(crate) fn skip_statement(&mut self) -> Result<()> {
        skip::skip_statement(&mut self.cursor)
    }

    pub(crate) fn skip_optional_statement(&mut self) -> Result<()> {
        skip::skip_optional_statement(&mut self.cursor)
    }

    /// Display name of `symbol`.
    pub(crate) fn name(&self, symbol: SymbolId) -> String {
        self.program.names().display(symbol)
    }

    /// Qualified name of `symbol` declared at the current module path.
    pub(crate) fn qualify(&self, symbol: SymbolId) -> QualifiedName {
        QualifiedName::new(&self.namespace, symbol)
    }

    /// Resolves `symbol` in the active environment.
    pub(crate) fn resolve(&self, symbol: SymbolId) -> Result<BindingRef> {
        self.env
            .lookup(symbol)
            .ok_or_else(|| Error::unknown_symbol(self.name(symbol)))
    }

    /// Binds `symbol` in `env`, reporting duplicates by name.
    pub(crate) fn bind_in(
        &self,
        env: &EnvRef,
        symbol: SymbolId,
        binding: Binding,
    ) -> Result<BindingRef> {
        if env.contains_local(symbol) {
            return Err(Error::duplicate_symbol(self.name(symbol)));
        }
        env.add(symbol, binding)
    }

    /// Binds `symbol` in the active environment.
    pub(crate) fn bind(&self, symbol: SymbolId, binding: Binding) -> Result<BindingRef> {
        let env = Rc::clone(&self.env);
        self.bind_in(&env, symbol, binding)
    }
}
