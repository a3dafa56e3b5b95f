//! Operator entry points over unevaluated operands.
//!
//! # Operand Count
//!
//! `(op args...)` is resolved by how many operands it has:
//! - two: one application of the direct operator
//! - one: the operand reduces itself, an empty container yielding the
//!   identity (`0`, or `""` for string kinds) without folding
//! - three or more: a left fold of the direct operator
//!
//! Only the first operand of a fold can be written in place: every later
//! application receives the previous result, which this evaluator owns.
//!
//! # Compound Assignment
//!
//! `(op= target args...)` reads `target`, which must be a variable or an
//! index expression rooted at one, applies the operator as above with the
//! current value as the first operand, and writes the result back.
//! `(^^= x 2)` multiplies `x` by itself instead of calling the power kernel.

mod builder;

pub use builder::EvaluatorBuilder;

use smallvec::SmallVec;

use lat_ir::{ArithOp, Name, SharedInterner, StringInterner};
use lat_stack::ensure_sufficient_stack;
use lat_value::{
    depth_exceeded, invalid_assignment_target, type_error, unbound_variable, EvalError,
    EvalResult, Scalar, Value, ValueKind,
};

use crate::environment::{Bindings, Environment};
use crate::eval_mode::{EvalMode, ModeState};
use crate::expr::Expr;
use crate::operators::evaluate_binary;
use crate::reduce::self_reduce;
use crate::unary::bit_not;

/// Evaluates operand expressions against a set of bindings.
pub struct Evaluator<B = Environment> {
    interner: SharedInterner,
    env: B,
    mode: EvalMode,
    mode_state: ModeState,
    /// Current expression nesting.
    depth: usize,
}

/// A compound assignment target: a variable and the indices below it.
struct Place {
    root: Name,
    path: SmallVec<[i64; 4]>,
}

impl Evaluator {
    /// An `Interpret` mode evaluator over an empty environment.
    pub fn new(interner: SharedInterner) -> Self {
        EvaluatorBuilder::new(interner).build()
    }
}

impl<B: Bindings> Evaluator<B> {
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn env(&self) -> &B {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut B {
        &mut self.env
    }

    pub fn mode(&self) -> &EvalMode {
        &self.mode
    }

    /// Operator applications performed so far.
    pub fn operations(&self) -> u64 {
        self.mode_state.operations
    }

    /// Intern `name` and bind it in the innermost scope.
    pub fn define(&mut self, name: &str, value: Value) -> Name {
        let name = self.interner.intern(name);
        self.env.define(name, value);
        name
    }

    /// Evaluate one expression.
    pub fn eval(&mut self, expr: &Expr) -> EvalResult {
        if let Some(max) = self.mode.max_depth() {
            if self.depth >= max {
                return Err(depth_exceeded(max));
            }
        }
        self.depth += 1;
        let result = ensure_sufficient_stack(|| self.eval_inner(expr));
        self.depth -= 1;
        result
    }

    fn eval_inner(&mut self, expr: &Expr) -> EvalResult {
        match expr {
            Expr::Literal(value) => Ok(value.clone().into_constant()),
            Expr::Var(name) => self.read(*name),
            Expr::Index { target, index } => {
                let target = self.eval(target)?;
                let index = self.eval_index(index)?;
                target.index(index)
            }
            Expr::Apply { op, args } => self.apply(*op, args),
            Expr::BitNot(operand) => {
                let value = self.eval(operand)?;
                self.mode_state.check_budget()?;
                bit_not(value)
            }
            Expr::Assign { op, target, args } => self.assign(*op, target, args),
        }
    }

    fn read(&self, name: Name) -> EvalResult {
        self.env
            .read(name)
            .ok_or_else(|| unbound_variable(self.interner.lookup(name)))
    }

    fn eval_index(&mut self, index: &Expr) -> Result<i64, EvalError> {
        let value = self.eval(index)?;
        Scalar::from_value(&value)
            .map(Scalar::to_i64)
            .ok_or_else(|| type_error("[]", value.type_name()).with_operand(&value))
    }

    /// `(op args...)`.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(op = op.as_symbol(), operands = args.len())
    )]
    pub fn apply(&mut self, op: ArithOp, args: &[Expr]) -> EvalResult {
        match args {
            [] => Err(EvalError::new(format!(
                "`{}` needs at least one operand",
                op.as_symbol()
            ))),
            [only] => {
                let value = self.eval(only)?;
                self.reduce(value, op)
            }
            [first, rest @ ..] => {
                let left = self.eval(first)?;
                self.fold(left, rest, op)
            }
        }
    }

    fn fold(&mut self, mut acc: Value, rest: &[Expr], op: ArithOp) -> EvalResult {
        for arg in rest {
            let right = self.eval(arg)?;
            acc = self.binary(acc, right, op)?;
        }
        Ok(acc)
    }

    /// One application of the direct operator to evaluated operands.
    pub fn binary(&mut self, left: Value, right: Value, op: ArithOp) -> EvalResult {
        self.mode_state.check_budget()?;
        evaluate_binary(left, right, op)
    }

    /// Fold `op` over the elements of `value`.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(op = op.as_symbol(), kind = %value.kind())
    )]
    pub fn reduce(&mut self, value: Value, op: ArithOp) -> EvalResult {
        let textual = matches!(value.kind(), ValueKind::String | ValueKind::StringVector);
        if value.is_empty_container() && (!textual || op.applies_to_strings()) {
            return Ok(if textual {
                Value::string("")
            } else {
                Value::Integer(0)
            });
        }
        self.mode_state.check_budget()?;
        self_reduce(value, op)
    }

    /// `(op= target args...)`; returns the value written back.
    #[tracing::instrument(level = "debug", skip_all, fields(op = op.as_compound_symbol()))]
    pub fn assign(&mut self, op: ArithOp, target: &Expr, args: &[Expr]) -> EvalResult {
        let place = self.place(target)?;
        let current = self.load(&place)?;
        let result = match args {
            [exponent] if op == ArithOp::Pow && exponent.is_literal_two() => {
                tracing::trace!("squaring by self-multiply");
                let square = current.clone();
                self.binary(current, square, ArithOp::Mul)?
            }
            [] => self.reduce(current, op)?,
            args => self.fold(current, args, op)?,
        };
        self.store(&place, result.clone())?;
        Ok(result)
    }

    fn place(&mut self, target: &Expr) -> Result<Place, EvalError> {
        match target {
            Expr::Var(name) => Ok(Place {
                root: *name,
                path: SmallVec::new(),
            }),
            Expr::Index { target, index } => {
                let mut place = ensure_sufficient_stack(|| self.place(target))?;
                place.path.push(self.eval_index(index)?);
                Ok(place)
            }
            other => Err(invalid_assignment_target(other.describe())),
        }
    }

    fn load(&self, place: &Place) -> EvalResult {
        let mut value = self.read(place.root)?;
        for &index in &place.path {
            value = value.index(index)?;
        }
        Ok(value)
    }

    fn store(&mut self, place: &Place, value: Value) -> Result<(), EvalError> {
        let root = self.read(place.root)?;
        let updated = write_path(root, &place.path, value)?;
        if self.env.write(place.root, updated) {
            Ok(())
        } else {
            Err(unbound_variable(self.interner.lookup(place.root)))
        }
    }
}

/// `container` with the element at `path` replaced by `value`.
fn write_path(mut container: Value, path: &[i64], value: Value) -> EvalResult {
    let Some((&index, rest)) = path.split_first() else {
        return Ok(value);
    };
    let element = if rest.is_empty() {
        value
    } else {
        ensure_sufficient_stack(|| {
            container
                .index(index)
                .and_then(|child| write_path(child, rest, value))
        })?
    };
    container.set_index(index, element)?;
    Ok(container)
}

#[cfg(test)]
mod tests;
