//! `EvaluatorBuilder` for creating Evaluator instances with various configurations.

use lat_ir::SharedInterner;

use super::Evaluator;
use crate::environment::{Bindings, Environment};
use crate::eval_mode::{EvalMode, ModeState};

/// Builder for creating Evaluator instances.
///
/// The default mode is `Interpret` and the default bindings an empty
/// [`Environment`].
pub struct EvaluatorBuilder<B = Environment> {
    interner: SharedInterner,
    env: B,
    mode: EvalMode,
}

impl EvaluatorBuilder {
    /// Create a new builder with default `Interpret` mode.
    pub fn new(interner: SharedInterner) -> Self {
        Self {
            interner,
            env: Environment::new(),
            mode: EvalMode::default(),
        }
    }
}

impl<B: Bindings> EvaluatorBuilder<B> {
    /// Set the evaluation mode.
    ///
    /// Controls the operation budget and the nesting limit.
    #[must_use]
    pub fn mode(mut self, mode: EvalMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the initial bindings.
    #[must_use]
    pub fn env<E: Bindings>(self, env: E) -> EvaluatorBuilder<E> {
        EvaluatorBuilder {
            interner: self.interner,
            env,
            mode: self.mode,
        }
    }

    /// Build the evaluator.
    pub fn build(self) -> Evaluator<B> {
        let mode_state = ModeState::new(&self.mode);
        Evaluator {
            interner: self.interner,
            env: self.env,
            mode: self.mode,
            mode_state,
            depth: 0,
        }
    }
}
