//! Evaluation modes for the operator entry points.
//!
//! Uses enum dispatch: every policy is a method on `EvalMode`.

use lat_value::{budget_exceeded, EvalError};

/// Evaluation mode. Determines budget and depth limits via match dispatch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum EvalMode {
    /// Unbounded evaluation.
    #[default]
    Interpret,
    /// Caps the number of operator applications.
    Bounded {
        /// Maximum operator applications before aborting.
        budget: u64,
    },
}

impl EvalMode {
    /// Maximum expression nesting, or `None` for unlimited (native `stacker`
    /// fallback).
    ///
    /// - `Interpret`: `None` on native (stacker grows the stack), 200 on WASM
    /// - `Bounded`: always 64
    #[inline]
    pub fn max_depth(&self) -> Option<usize> {
        match self {
            Self::Interpret => {
                #[cfg(target_arch = "wasm32")]
                {
                    Some(200)
                }
                #[cfg(not(target_arch = "wasm32"))]
                {
                    None
                }
            }
            Self::Bounded { .. } => Some(64),
        }
    }

    #[inline]
    pub fn is_bounded(&self) -> bool {
        matches!(self, Self::Bounded { .. })
    }
}

/// Per-mode mutable state stored alongside `EvalMode`.
#[derive(Clone, Debug)]
pub struct ModeState {
    /// Operator applications so far.
    pub operations: u64,
    budget: Option<u64>,
}

impl ModeState {
    pub fn new(mode: &EvalMode) -> Self {
        match mode {
            EvalMode::Bounded { budget } => Self {
                operations: 0,
                budget: Some(*budget),
            },
            EvalMode::Interpret => Self {
                operations: 0,
                budget: None,
            },
        }
    }

    /// Count one operator application, failing once the budget is spent.
    #[inline]
    pub fn check_budget(&mut self) -> Result<(), EvalError> {
        self.operations = self.operations.saturating_add(1);
        match self.budget {
            Some(budget) if self.operations > budget => Err(budget_exceeded(budget)),
            _ => Ok(()),
        }
    }
}
