//! Variable bindings read and written by the operator entry points.
//!
//! Uses a scope stack (not cloning) for scope management.

use rustc_hash::FxHashMap;

use lat_ir::Name;
use lat_value::Value;

/// Binding storage consumed by the evaluator.
pub trait Bindings {
    /// Current value of `name`, or `None` if it is unbound.
    fn read(&self, name: Name) -> Option<Value>;

    /// Overwrite an existing binding. Returns `false` if `name` is unbound.
    fn write(&mut self, name: Name, value: Value) -> bool;

    /// Bind `name` in the innermost scope.
    fn define(&mut self, name: Name, value: Value);
}

/// Scope stack with the global scope at the bottom.
#[derive(Clone, Debug)]
pub struct Environment {
    scopes: Vec<FxHashMap<Name, Value>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            scopes: vec![FxHashMap::default()],
        }
    }

    /// Number of scopes, including the global scope.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    #[inline]
    pub fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    /// Pop the innermost scope. The global scope is never popped.
    #[inline]
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Bindings for Environment {
    #[inline]
    fn read(&self, name: Name) -> Option<Value> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(&name))
            .cloned()
    }

    fn write(&mut self, name: Name, value: Value) -> bool {
        match self
            .scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.get_mut(&name))
        {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    #[inline]
    fn define(&mut self, name: Name, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, value);
        }
    }
}
