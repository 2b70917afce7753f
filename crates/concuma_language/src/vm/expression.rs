//! Expression evaluation.

use std::rc::Rc;

use concuma_foundation::{Error, ErrorKind, Result, Value, coerce};

use super::Interpreter;
use crate::binding::Operand;
use crate::opcode::{BinaryOp, ExprOp, UnaryOp};
use crate::stack::ensure_sufficient_stack;

impl Interpreter<'_> {
    /// Evaluates one expression. `Var` yields the binding itself.
    pub(crate) fn eval_expression(&mut self) -> Result<Operand> {
        ensure_sufficient_stack(|| self.dispatch_expression())
    }

    fn dispatch_expression(&mut self) -> Result<Operand> {
        let byte = self.cursor.advance();
        let Some(op) = ExprOp::from_byte(byte) else {
            return Err(Error::unknown_opcode("expression", byte));
        };
        match op {
            ExprOp::Unary => self.unary().map(Operand::Value),
            ExprOp::Binary => self.binary(),
            ExprOp::Group => self.eval_expression(),
            ExprOp::Literal => self.cursor.read_literal().map(Operand::Value),
            ExprOp::Var => {
                let symbol = self.cursor.read_symbol();
                self.resolve(symbol).map(Operand::Bound)
            }
            ExprOp::Call => self.call().map(Operand::Value),
            ExprOp::Accessor => self.accessor(),
        }
    }

    /// Evaluates one expression and unwraps it to a plain value.
    pub(crate) fn eval_value(&mut self) -> Result<Value> {
        self.eval_expression().map(Operand::into_value)
    }

    fn unary(&mut self) -> Result<Value> {
        let byte = self.cursor.advance();
        let op = UnaryOp::from_byte(byte)
            .ok_or_else(|| Error::unknown_opcode("unary operator", byte))?;
        let operand = self.eval_value()?;
        match op {
            UnaryOp::Not => coerce::not(&operand),
            UnaryOp::Negate => coerce::negate(&operand),
        }
    }

    fn binary(&mut self) -> Result<Operand> {
        let byte = self.cursor.advance();
        let op = BinaryOp::from_byte(byte)
            .ok_or_else(|| Error::unknown_opcode("binary operator", byte))?;
        let lhs = self.eval_expression()?;
        let rhs = self.eval_expression()?;
        if op == BinaryOp::Member {
            if lhs.as_module().is_none() {
                return Err(Error::new(ErrorKind::InvalidAccessor(describe(&lhs))));
            }
            return Ok(Operand::Value(rhs.into_value()));
        }

        let (a, b) = (lhs.into_value(), rhs.into_value());
        let value = match op {
            BinaryOp::Add => coerce::add(&a, &b)?,
            BinaryOp::Subtract => coerce::subtract(&a, &b)?,
            BinaryOp::Multiply => coerce::multiply(&a, &b)?,
            BinaryOp::Divide => coerce::divide(&a, &b)?,
            BinaryOp::Equal => Value::Bool(coerce::equals(&a, &b)),
            BinaryOp::NotEqual => Value::Bool(!coerce::equals(&a, &b)),
            BinaryOp::Less => Value::Bool(coerce::less(&a, &b)?),
            BinaryOp::LessEqual => Value::Bool(coerce::less_equal(&a, &b)?),
            BinaryOp::Greater => Value::Bool(coerce::greater(&a, &b)?),
            BinaryOp::GreaterEqual => Value::Bool(coerce::greater_equal(&a, &b)?),
            BinaryOp::Member => b,
        };
        Ok(Operand::Value(value))
    }

    /// Evaluates the right expression inside the module named by the left.
    fn accessor(&mut self) -> Result<Operand> {
        let target = self.eval_expression()?;
        let module = target
            .as_module()
            .ok_or_else(|| Error::new(ErrorKind::InvalidAccessor(describe(&target))))?;
        self.scoped(Rc::clone(&module.env), Interpreter::eval_expression)
    }
}

/// Short description of an operand for error messages.
fn describe(operand: &Operand) -> String {
    match operand {
        Operand::Value(value) => value.value_type().to_string(),
        Operand::Bound(binding) => binding.borrow().kind().to_string(),
    }
}
