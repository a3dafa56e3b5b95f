//! Operand expressions handed to the operator entry points.

use lat_ir::{ArithOp, Name};
use lat_value::Value;

/// An unevaluated operand.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// A literal. Its value is shared, so operators never write it.
    Literal(Value),
    Var(Name),
    /// `target[index]`.
    Index { target: Box<Expr>, index: Box<Expr> },
    /// `(op args...)`: binary, self-reducing or n-ary by operand count.
    Apply { op: ArithOp, args: Vec<Expr> },
    BitNot(Box<Expr>),
    /// `(op= target args...)`: compound assignment.
    Assign {
        op: ArithOp,
        target: Box<Expr>,
        args: Vec<Expr>,
    },
}

impl Expr {
    pub fn literal(value: Value) -> Self {
        Expr::Literal(value.into_constant())
    }

    pub fn int(n: i64) -> Self {
        Expr::Literal(Value::Integer(n))
    }

    pub fn apply(op: ArithOp, args: Vec<Expr>) -> Self {
        Expr::Apply { op, args }
    }

    pub fn index(target: Expr, index: Expr) -> Self {
        Expr::Index {
            target: Box::new(target),
            index: Box::new(index),
        }
    }

    pub fn assign(op: ArithOp, target: Expr, args: Vec<Expr>) -> Self {
        Expr::Assign {
            op,
            target: Box::new(target),
            args,
        }
    }

    pub fn bit_not(operand: Expr) -> Self {
        Expr::BitNot(Box::new(operand))
    }

    /// Short description for error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Expr::Literal(_) => "literal",
            Expr::Var(_) => "variable",
            Expr::Index { .. } => "index expression",
            Expr::Apply { .. } => "operator application",
            Expr::BitNot(_) => "bitwise not",
            Expr::Assign { .. } => "assignment",
        }
    }

    /// Whether this is the literal integer `2`.
    pub(crate) fn is_literal_two(&self) -> bool {
        matches!(
            self,
            Expr::Literal(Value::Integer(2) | Value::Short(2))
        )
    }
}
