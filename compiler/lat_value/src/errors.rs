//! Error types for numeric evaluation.
//!
//! # Structured Error Categories
//!
//! `EvalErrorKind` provides typed error categories. Factory functions
//! (e.g., `division_by_zero()`) are the public API; they populate both
//! `kind` and `message`.

use crate::value::Value;

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// Typed error category.
///
/// `Display` (generated by `thiserror`) is the message stored on
/// [`EvalError::message`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalErrorKind {
    // Arithmetic
    #[error("division by zero")]
    DivisionByZero,

    // Shape
    #[error("shape error: {message}")]
    ShapeError { message: String },
    #[error("near-singular matrix")]
    NearSingularMatrix,

    // Type/Operator
    #[error("operator `{op}` cannot be applied to {type_name}")]
    TypeError { op: String, type_name: String },

    // Access
    #[error("unbound variable: {name}")]
    UnboundVariable { name: String },
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: i64, len: usize },
    #[error("invalid assignment target: {description}")]
    InvalidAssignmentTarget { description: String },

    // Limits
    #[error("operation budget of {budget} exceeded")]
    BudgetExceeded { budget: u64 },
    #[error("maximum evaluation depth of {depth} exceeded")]
    DepthExceeded { depth: usize },

    /// Catch-all for errors without a structured kind.
    #[error("{message}")]
    Custom { message: String },
}

/// Additional context note attached to an error, such as the textual form
/// of the offending operand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalNote {
    pub message: String,
}

impl EvalNote {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Evaluation error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct EvalError {
    /// Structured error category.
    pub kind: EvalErrorKind,
    /// Human-readable error message. For factory-created errors this equals
    /// `kind.to_string()`.
    pub message: String,
    /// Secondary context, in the order it was attached.
    pub notes: Vec<EvalNote>,
}

impl EvalError {
    /// Create an error with just a message, using the `Custom` kind.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: EvalErrorKind::Custom {
                message: message.clone(),
            },
            message,
            notes: Vec::new(),
        }
    }

    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            message,
            notes: Vec::new(),
        }
    }

    /// Add a context note to this error.
    #[must_use]
    pub fn with_note(mut self, note: EvalNote) -> Self {
        self.notes.push(note);
        self
    }

    /// Attach the textual form of an operand as a note.
    #[must_use]
    pub fn with_operand(self, value: &Value) -> Self {
        self.with_note(EvalNote::new(format!("operand: {value}")))
    }
}

// Arithmetic Errors

/// Division or modulo by zero.
#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

// Shape Errors

/// Operand shapes are incompatible.
#[cold]
pub fn shape_error(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ShapeError {
        message: message.into(),
    })
}

/// Linear algebra on a non-square matrix.
#[cold]
pub fn not_square(rows: usize, cols: usize) -> EvalError {
    shape_error(format!("expected a square matrix, got {rows}x{cols}"))
}

/// LU decomposition found a row below the pivot tolerance.
#[cold]
pub fn near_singular_matrix() -> EvalError {
    EvalError::from_kind(EvalErrorKind::NearSingularMatrix)
}

// Type/Operator Errors

/// Operator cannot be applied to a value of this kind.
#[cold]
pub fn type_error(op: &str, type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeError {
        op: op.to_string(),
        type_name: type_name.to_string(),
    })
}

/// Operator has no rule for this pair of kinds.
#[cold]
pub fn binary_type_mismatch(op: &str, left: &str, right: &str) -> EvalError {
    type_error(op, &format!("`{left}` and `{right}`"))
}

// Access Errors

/// Variable not found in any scope.
#[cold]
pub fn unbound_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnboundVariable {
        name: name.to_string(),
    })
}

/// Index outside `0..len`.
#[cold]
pub fn index_out_of_bounds(index: i64, len: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexOutOfBounds { index, len })
}

/// Compound assignment target is neither a variable nor an index expression.
#[cold]
pub fn invalid_assignment_target(description: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidAssignmentTarget {
        description: description.to_string(),
    })
}

// Limit Errors

/// Bounded mode ran out of operator applications.
#[cold]
pub fn budget_exceeded(budget: u64) -> EvalError {
    EvalError::from_kind(EvalErrorKind::BudgetExceeded { budget })
}

/// Expression nesting exceeded the configured depth.
#[cold]
pub fn depth_exceeded(depth: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DepthExceeded { depth })
}

#[cfg(test)]
mod tests;
