//! Bytecode emitter.
//!
//! Builds program images from a small statement/expression tree. The VM never
//! depends on this module; it exists so hosts, tests and benchmarks can produce
//! well-formed images without hand-assembling bytes.
//!
//! ```
//! use concuma_language::emit::{Expr, ProgramBuilder, Stmt};
//!
//! let mut builder = ProgramBuilder::new();
//! let x = builder.symbol("x");
//! builder.push(Stmt::declare(x, Expr::int(2)));
//! builder.push(Stmt::print(Expr::var(x)));
//! let program = builder.build_program().unwrap();
//! assert_eq!(program.names().get(x), Some("x"));
//! ```

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]

use std::collections::HashMap;

use concuma_foundation::{Result, SymbolId, Value};

use crate::opcode::{BinaryOp, ExprOp, LiteralTag, StmtOp, UnaryOp};
use crate::program::{CODE_START, Program};

/// An expression node.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// `op operand`
    Unary(UnaryOp, Box<Expr>),
    /// `lhs op rhs`
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    /// `(expr)`
    Group(Box<Expr>),
    /// A constant.
    Literal(Value),
    /// A symbol reference.
    Var(SymbolId),
    /// `callee(args...)`
    Call(SymbolId, Vec<Expr>),
    /// `module::expr`
    Accessor(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// The `null` literal.
    #[must_use]
    pub fn null() -> Self {
        Self::Literal(Value::Null)
    }

    /// A boolean literal.
    #[must_use]
    pub fn bool(value: bool) -> Self {
        Self::Literal(Value::Bool(value))
    }

    /// An integer literal.
    #[must_use]
    pub fn int(value: i32) -> Self {
        Self::Literal(Value::Int(value))
    }

    /// A float literal.
    #[must_use]
    pub fn float(value: f64) -> Self {
        Self::Literal(Value::Float(value))
    }

    /// A string literal.
    #[must_use]
    pub fn string(value: &str) -> Self {
        Self::Literal(Value::from(value))
    }

    /// A symbol reference.
    #[must_use]
    pub fn var(symbol: SymbolId) -> Self {
        Self::Var(symbol)
    }

    /// `!operand`
    #[must_use]
    pub fn not(operand: Self) -> Self {
        Self::Unary(UnaryOp::Not, Box::new(operand))
    }

    /// `-operand`
    #[must_use]
    pub fn neg(operand: Self) -> Self {
        Self::Unary(UnaryOp::Negate, Box::new(operand))
    }

    /// `lhs op rhs`
    #[must_use]
    pub fn binary(op: BinaryOp, lhs: Self, rhs: Self) -> Self {
        Self::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    /// `(inner)`
    #[must_use]
    pub fn group(inner: Self) -> Self {
        Self::Group(Box::new(inner))
    }

    /// `callee(args...)`
    #[must_use]
    pub fn call(callee: SymbolId, args: Vec<Self>) -> Self {
        Self::Call(callee, args)
    }

    /// Evaluates `inner` inside the module named by `module`.
    #[must_use]
    pub fn access(module: Self, inner: Self) -> Self {
        Self::Accessor(Box::new(module), Box::new(inner))
    }

    /// Appends the encoding of this expression to `out`.
    pub fn encode(&self, out: &mut Vec<u8>) {
        match self {
            Self::Unary(op, operand) => {
                out.push(ExprOp::Unary.byte());
                out.push(op.byte());
                operand.encode(out);
            }
            Self::Binary(op, lhs, rhs) => {
                out.push(ExprOp::Binary.byte());
                out.push(op.byte());
                lhs.encode(out);
                rhs.encode(out);
            }
            Self::Group(inner) => {
                out.push(ExprOp::Group.byte());
                inner.encode(out);
            }
            Self::Literal(value) => {
                out.push(ExprOp::Literal.byte());
                encode_literal(value, out);
            }
            Self::Var(symbol) => {
                out.push(ExprOp::Var.byte());
                push_symbol(*symbol, out);
            }
            Self::Call(callee, args) => {
                out.push(ExprOp::Call.byte());
                push_symbol(*callee, out);
                push_count(args.len(), out);
                for arg in args {
                    arg.encode(out);
                }
            }
            Self::Accessor(module, inner) => {
                out.push(ExprOp::Accessor.byte());
                module.encode(out);
                inner.encode(out);
            }
        }
    }
}

/// A statement node.
#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    /// Print one expression.
    Print(Expr),
    /// Conditional with optional else branch.
    If {
        /// Condition.
        cond: Expr,
        /// Taken when the condition is truthy.
        then: Box<Stmt>,
        /// Taken otherwise.
        otherwise: Option<Box<Stmt>>,
    },
    /// Scoped statement sequence.
    Block(Vec<Stmt>),
    /// Variable declaration.
    Declare {
        /// Whether later assignment is rejected.
        is_const: bool,
        /// Declared symbol.
        symbol: SymbolId,
        /// Optional initializer.
        init: Option<Expr>,
    },
    /// Assignment to an existing variable.
    Assign {
        /// Target symbol.
        symbol: SymbolId,
        /// New value.
        value: Expr,
    },
    /// `for (init; cond; step) body`
    For {
        /// Runs once in the loop scope.
        init: Option<Box<Stmt>>,
        /// Checked before each iteration.
        cond: Expr,
        /// Loop body.
        body: Box<Stmt>,
        /// Runs after each iteration.
        step: Option<Box<Stmt>>,
    },
    /// Leave the innermost loop.
    Break,
    /// Function declaration.
    Function {
        /// Function name.
        symbol: SymbolId,
        /// Parameter symbols, in order.
        params: Vec<SymbolId>,
        /// Body statement.
        body: Box<Stmt>,
    },
    /// Call whose result is discarded.
    Call {
        /// Callee symbol.
        callee: SymbolId,
        /// Arguments.
        args: Vec<Expr>,
    },
    /// Return from the current function.
    Return(Option<Expr>),
    /// Class declaration.
    Class {
        /// Class name.
        symbol: SymbolId,
        /// Variable statements.
        variables: Vec<Stmt>,
        /// Method statements.
        methods: Vec<Stmt>,
    },
    /// Module declaration.
    Module {
        /// Module name.
        symbol: SymbolId,
        /// Variable statements.
        variables: Vec<Stmt>,
        /// Method statements.
        methods: Vec<Stmt>,
    },
    /// Import of a host function.
    Import {
        /// Symbol whose name selects the host function.
        symbol: SymbolId,
        /// Optional local name.
        alias: Option<SymbolId>,
    },
}

impl Stmt {
    /// `print expr`
    #[must_use]
    pub fn print(expr: Expr) -> Self {
        Self::Print(expr)
    }

    /// `let symbol = init`
    #[must_use]
    pub fn declare(symbol: SymbolId, init: Expr) -> Self {
        Self::Declare {
            is_const: false,
            symbol,
            init: Some(init),
        }
    }

    /// `const symbol = init`
    #[must_use]
    pub fn constant(symbol: SymbolId, init: Expr) -> Self {
        Self::Declare {
            is_const: true,
            symbol,
            init: Some(init),
        }
    }

    /// `symbol = value`
    #[must_use]
    pub fn assign(symbol: SymbolId, value: Expr) -> Self {
        Self::Assign { symbol, value }
    }

    /// `if cond then`
    #[must_use]
    pub fn when(cond: Expr, then: Self) -> Self {
        Self::If {
            cond,
            then: Box::new(then),
            otherwise: None,
        }
    }

    /// `if cond then else otherwise`
    #[must_use]
    pub fn if_else(cond: Expr, then: Self, otherwise: Self) -> Self {
        Self::If {
            cond,
            then: Box::new(then),
            otherwise: Some(Box::new(otherwise)),
        }
    }

    /// `for (init; cond; step) body`
    #[must_use]
    pub fn for_loop(init: Option<Self>, cond: Expr, step: Option<Self>, body: Self) -> Self {
        Self::For {
            init: init.map(Box::new),
            cond,
            body: Box::new(body),
            step: step.map(Box::new),
        }
    }

    /// `fn symbol(params) body`
    #[must_use]
    pub fn function(symbol: SymbolId, params: Vec<SymbolId>, body: Self) -> Self {
        Self::Function {
            symbol,
            params,
            body: Box::new(body),
        }
    }

    /// `callee(args);`
    #[must_use]
    pub fn call(callee: SymbolId, args: Vec<Expr>) -> Self {
        Self::Call { callee, args }
    }

    /// `return expr`
    #[must_use]
    pub fn ret(expr: Expr) -> Self {
        Self::Return(Some(expr))
    }

    /// Appends the encoding of this statement to `out`.
    pub fn encode(&self, out: &mut Vec<u8>) {
        match self {
            Self::Print(expr) => {
                out.push(StmtOp::Print.byte());
                expr.encode(out);
            }
            Self::If {
                cond,
                then,
                otherwise,
            } => {
                out.push(StmtOp::If.byte());
                cond.encode(out);
                then.encode(out);
                encode_optional(otherwise.as_deref(), out);
            }
            Self::Block(stmts) => {
                out.push(StmtOp::Block.byte());
                encode_all(stmts, out);
            }
            Self::Declare {
                is_const,
                symbol,
                init,
            } => {
                out.push(StmtOp::Declaration.byte());
                out.push(u8::from(*is_const));
                push_symbol(*symbol, out);
                match init {
                    Some(expr) => expr.encode(out),
                    None => out.push(0x00),
                }
            }
            Self::Assign { symbol, value } => {
                out.push(StmtOp::Definition.byte());
                push_symbol(*symbol, out);
                value.encode(out);
            }
            Self::For {
                init,
                cond,
                body,
                step,
            } => {
                out.push(StmtOp::For.byte());
                encode_optional(init.as_deref(), out);
                cond.encode(out);
                body.encode(out);
                encode_optional(step.as_deref(), out);
            }
            Self::Break => out.push(StmtOp::Break.byte()),
            Self::Function {
                symbol,
                params,
                body,
            } => {
                out.push(StmtOp::Function.byte());
                push_symbol(*symbol, out);
                push_count(params.len(), out);
                for param in params {
                    push_symbol(*param, out);
                }
                body.encode(out);
            }
            Self::Call { callee, args } => {
                out.push(StmtOp::Call.byte());
                push_symbol(*callee, out);
                push_count(args.len(), out);
                for arg in args {
                    arg.encode(out);
                }
            }
            Self::Return(expr) => {
                out.push(StmtOp::Return.byte());
                match expr {
                    Some(expr) => expr.encode(out),
                    None => out.push(0x00),
                }
            }
            Self::Class {
                symbol,
                variables,
                methods,
            } => {
                out.push(StmtOp::Class.byte());
                push_symbol(*symbol, out);
                encode_all(variables, out);
                encode_all(methods, out);
            }
            Self::Module {
                symbol,
                variables,
                methods,
            } => {
                out.push(StmtOp::Module.byte());
                push_symbol(*symbol, out);
                encode_all(variables, out);
                encode_all(methods, out);
            }
            Self::Import { symbol, alias } => {
                out.push(StmtOp::Import.byte());
                push_symbol(*symbol, out);
                match alias {
                    Some(alias) => push_symbol(*alias, out),
                    None => out.push(0x00),
                }
            }
        }
    }
}

/// Appends a literal payload (tag byte plus value) to `out`.
///
/// Strings are written one byte per character behind a `u8` length;
/// characters outside the single-byte range become `?` and anything past
/// 255 characters is dropped.
pub fn encode_literal(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::Null => out.push(LiteralTag::Null.byte()),
        Value::Bool(b) => {
            out.push(LiteralTag::Bool.byte());
            out.push(u8::from(*b));
        }
        Value::Int(n) => {
            out.push(LiteralTag::Int.byte());
            out.extend_from_slice(&n.to_le_bytes());
        }
        Value::Float(f) => {
            out.push(LiteralTag::Float.byte());
            out.extend_from_slice(&f.to_le_bytes());
        }
        Value::String(s) => {
            out.push(LiteralTag::String.byte());
            let mut bytes = string_bytes(s);
            bytes.truncate(usize::from(u8::MAX));
            out.push(u8::try_from(bytes.len()).unwrap_or(u8::MAX));
            out.extend_from_slice(&bytes);
        }
    }
}

fn encode_optional(stmt: Option<&Stmt>, out: &mut Vec<u8>) {
    match stmt {
        Some(stmt) => stmt.encode(out),
        None => out.push(0x00),
    }
}

fn encode_all(stmts: &[Stmt], out: &mut Vec<u8>) {
    push_count(stmts.len(), out);
    for stmt in stmts {
        stmt.encode(out);
    }
}

fn push_symbol(symbol: SymbolId, out: &mut Vec<u8>) {
    out.extend_from_slice(&symbol.raw().to_le_bytes());
}

fn push_count(count: usize, out: &mut Vec<u8>) {
    out.extend_from_slice(&(count as i32).to_le_bytes());
}

fn string_bytes(s: &str) -> Vec<u8> {
    s.chars().map(|c| u8::try_from(c).unwrap_or(b'?')).collect()
}

fn push_string(s: &str, out: &mut Vec<u8>) {
    let bytes = string_bytes(s);
    out.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
    out.extend_from_slice(&bytes);
}

/// Assembles a complete program image.
#[derive(Clone, Debug, Default)]
pub struct ProgramBuilder {
    statements: Vec<Stmt>,
    names: Vec<(SymbolId, String)>,
    by_name: HashMap<String, SymbolId>,
    next_id: i32,
}

impl ProgramBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    /// Returns the symbol for `name`, allocating a fresh id the first time.
    ///
    /// Ids whose low byte is zero are never allocated: an import alias with
    /// such an id would read as the "no alias" marker.
    pub fn symbol(&mut self, name: &str) -> SymbolId {
        if let Some(&symbol) = self.by_name.get(name) {
            return symbol;
        }
        while self.next_id & 0xFF == 0 {
            self.next_id += 1;
        }
        let symbol = SymbolId(self.next_id);
        self.next_id += 1;
        self.by_name.insert(name.to_string(), symbol);
        self.names.push((symbol, name.to_string()));
        symbol
    }

    /// Appends a top-level statement.
    pub fn push(&mut self, stmt: Stmt) -> &mut Self {
        self.statements.push(stmt);
        self
    }

    /// Appends several top-level statements.
    pub fn extend(&mut self, stmts: impl IntoIterator<Item = Stmt>) -> &mut Self {
        self.statements.extend(stmts);
        self
    }

    /// Encodes the image: header, statements, then the name table.
    #[must_use]
    pub fn build(&self) -> Vec<u8> {
        let mut out = vec![0; CODE_START];
        for stmt in &self.statements {
            stmt.encode(&mut out);
        }
        let offset = out.len() as i32;
        out[..CODE_START].copy_from_slice(&offset.to_le_bytes());
        for (symbol, name) in &self.names {
            push_string(name, &mut out);
            push_symbol(*symbol, &mut out);
        }
        out
    }

    /// Encodes and loads the image.
    pub fn build_program(&self) -> Result<Program> {
        Program::load(self.build())
    }
}
