//! Error types for the Concuma VM.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//!
//! Every runtime failure is raised as a single [`Error`] that unwinds the whole
//! run. `break` and `return` are *not* errors; they travel as control-flow
//! signals inside the interpreter.

use std::fmt;

use thiserror::Error;

use crate::symbol::SymbolId;
use crate::types::ValueType;

/// The main error type for Concuma operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Records the byte offset of the statement that failed.
    ///
    /// Only the first (innermost) offset is kept.
    #[must_use]
    pub fn at_offset(mut self, offset: usize) -> Self {
        let context = self.context.get_or_insert_with(ErrorContext::new);
        if context.offset.is_none() {
            context.offset = Some(offset);
        }
        self
    }

    /// Records that the error unwound through a call to `frame`.
    #[must_use]
    pub fn in_frame(mut self, frame: impl Into<String>) -> Self {
        self.context
            .get_or_insert_with(ErrorContext::new)
            .stack
            .push(frame.into());
        self
    }

    /// Returns the category of this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// Creates an unknown symbol error.
    #[must_use]
    pub fn unknown_symbol(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownSymbol(name.into()))
    }

    /// Creates a duplicate declaration error.
    #[must_use]
    pub fn duplicate_symbol(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateSymbol(name.into()))
    }

    /// Creates a binary operand type error.
    #[must_use]
    pub fn invalid_operands(op: &'static str, left: ValueType, right: ValueType) -> Self {
        Self::new(ErrorKind::InvalidOperands { op, left, right })
    }

    /// Creates a unary operand type error.
    #[must_use]
    pub fn invalid_operand(op: &'static str, operand: ValueType) -> Self {
        Self::new(ErrorKind::InvalidOperand { op, operand })
    }

    /// Creates an unknown opcode error.
    #[must_use]
    pub fn unknown_opcode(construct: &'static str, opcode: u8) -> Self {
        Self::new(ErrorKind::UnknownOpcode { construct, opcode })
    }

    /// Creates a malformed program error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedProgram(message.into()))
    }

    /// Creates an arity mismatch error.
    #[must_use]
    pub fn arity_mismatch(callee: impl Into<String>, expected: String, actual: usize) -> Self {
        Self::new(ErrorKind::ArityMismatch {
            callee: callee.into(),
            expected,
            actual,
        })
    }

    /// Creates an invalid argument error for a host function.
    #[must_use]
    pub fn invalid_argument(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument {
            function: function.into(),
            message: message.into(),
        })
    }

    /// Creates an execution limit error.
    #[must_use]
    pub fn limit_exceeded(limit: ExecutionLimit) -> Self {
        Self::new(ErrorKind::LimitExceeded(limit))
    }
}

/// Coarse classification of errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Unknown symbols, duplicate declarations, assignment to constants.
    Lookup,
    /// Incompatible operands, non-truthable values, malformed accessor targets.
    Type,
    /// Unknown opcodes, malformed program images, stray control flow.
    Format,
    /// Arity mismatches, non-callable callees, missing host functions.
    Call,
    /// Configured execution limits.
    Limit,
    /// Invariant violations inside the VM.
    Internal,
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    // === Lookup ===
    /// Symbol is not bound in any enclosing environment.
    #[error("unknown variable: {0}")]
    UnknownSymbol(String),

    /// Symbol is already bound in the same environment.
    #[error("duplicate declaration: {0}")]
    DuplicateSymbol(String),

    /// Assignment to a `const` variable.
    #[error("cannot assign to constant {0}")]
    ConstAssignment(String),

    /// Assignment to a binding that is not a variable.
    #[error("cannot assign to {0}: not a variable")]
    NotAssignable(String),

    /// Symbol id has no entry in the name table.
    #[error("symbol {0} has no name")]
    UnnamedSymbol(SymbolId),

    // === Type ===
    /// Binary operator applied to operands it does not accept.
    #[error("cannot apply `{op}` to {left} and {right}")]
    InvalidOperands {
        /// The operator.
        op: &'static str,
        /// Type of the left operand.
        left: ValueType,
        /// Type of the right operand.
        right: ValueType,
    },

    /// Unary operator applied to an operand it does not accept.
    #[error("cannot apply unary `{op}` to {operand}")]
    InvalidOperand {
        /// The operator.
        op: &'static str,
        /// Type of the operand.
        operand: ValueType,
    },

    /// Value has no truth value.
    #[error("attempting to get truthy value of non-truthable type {0}")]
    NotTruthable(ValueType),

    /// Member access on something that is not a module.
    #[error("cannot access members of {0}: not a module")]
    InvalidAccessor(String),

    // === Format ===
    /// Opcode or tag byte not defined by the instruction format.
    #[error("unknown {construct} opcode 0x{opcode:02X}")]
    UnknownOpcode {
        /// What was being decoded (statement, expression, literal tag, ...).
        construct: &'static str,
        /// The offending byte.
        opcode: u8,
    },

    /// Opcode reserved by the format with no executable meaning.
    #[error("reserved opcode 0x{0:02X} cannot be executed")]
    ReservedOpcode(u8),

    /// Structural problem with the program image.
    #[error("malformed program: {0}")]
    MalformedProgram(String),

    /// `break` or `return` with no enclosing construct to receive it.
    #[error("`{0}` has no enclosing construct to return to")]
    StrayControlFlow(&'static str),

    // === Call ===
    /// Wrong number of arguments.
    #[error("{callee} expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        /// Name of the callee.
        callee: String,
        /// Description of expected arity.
        expected: String,
        /// Actual number of arguments.
        actual: usize,
    },

    /// Callee binding is not a function.
    #[error("{0} is not callable")]
    NotCallable(String),

    /// Import of a name with no host registration.
    #[error("no host function registered as `{0}`")]
    UnregisteredNative(String),

    /// Host function rejected at registration time.
    #[error("cannot register host function `{name}`: {reason}")]
    InvalidNative {
        /// Name the function was registered under.
        name: String,
        /// Why registration failed.
        reason: String,
    },

    /// Host function rejected its arguments.
    #[error("{function}: {message}")]
    InvalidArgument {
        /// Name of the host function.
        function: String,
        /// Description of the problem.
        message: String,
    },

    // === Limit ===
    /// Configured execution limit exceeded.
    #[error("limit exceeded: {0}")]
    LimitExceeded(ExecutionLimit),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ErrorKind {
    /// Returns the category of this error kind.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownSymbol(_)
            | Self::DuplicateSymbol(_)
            | Self::ConstAssignment(_)
            | Self::NotAssignable(_)
            | Self::UnnamedSymbol(_) => ErrorCategory::Lookup,
            Self::InvalidOperands { .. }
            | Self::InvalidOperand { .. }
            | Self::NotTruthable(_)
            | Self::InvalidAccessor(_) => ErrorCategory::Type,
            Self::UnknownOpcode { .. }
            | Self::ReservedOpcode(_)
            | Self::MalformedProgram(_)
            | Self::StrayControlFlow(_) => ErrorCategory::Format,
            Self::ArityMismatch { .. }
            | Self::NotCallable(_)
            | Self::UnregisteredNative(_)
            | Self::InvalidNative { .. }
            | Self::InvalidArgument { .. } => ErrorCategory::Call,
            Self::LimitExceeded(_) => ErrorCategory::Limit,
            Self::Internal(_) => ErrorCategory::Internal,
        }
    }
}

/// Execution limits (kill switches) that can be exceeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionLimit {
    /// Maximum nesting of user-function calls.
    CallDepth {
        /// The configured limit.
        limit: usize,
    },
    /// Maximum number of executed statements.
    Fuel {
        /// The configured limit.
        limit: u64,
    },
}

impl fmt::Display for ExecutionLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CallDepth { limit } => write!(f, "max call depth ({limit}) exceeded"),
            Self::Fuel { limit } => write!(f, "execution fuel ({limit} statements) exhausted"),
        }
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Byte offset of the innermost statement being executed.
    pub offset: Option<usize>,
    /// User-function frames the error unwound through, innermost first.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the statement offset.
    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(offset) = self.offset {
            write!(f, "at offset 0x{offset:04X}")?;
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}
