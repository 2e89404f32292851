//! Execution context and limits.

use std::collections::HashMap;
use std::rc::Rc;

use crate::value::Value;

/// Limits enforced during execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmLimits {
    /// Maximum nesting of calls (the module frame is depth 0).
    pub max_call_depth: usize,
    /// Maximum operand stack size per frame.
    pub max_stack: usize,
}

impl Default for VmLimits {
    fn default() -> Self {
        Self {
            max_call_depth: 256,
            max_stack: 1024,
        }
    }
}

impl VmLimits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_call_depth: 8,
            max_stack: 16,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_call_depth: usize::MAX,
            max_stack: usize::MAX,
        }
    }
}

/// Global namespace for one execution.
#[derive(Debug, Default)]
pub struct Context {
    globals: HashMap<Rc<str>, Value>,
    limits: VmLimits,
}

impl Context {
    /// Creates an empty context with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty context with the given limits.
    #[must_use]
    pub fn with_limits(limits: VmLimits) -> Self {
        Self {
            globals: HashMap::new(),
            limits,
        }
    }

    /// Returns the limits this context executes under.
    #[must_use]
    pub const fn limits(&self) -> &VmLimits {
        &self.limits
    }

    /// Returns the value bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    /// Binds `name` to `value`, replacing any previous binding.
    pub fn set(&mut self, name: Rc<str>, value: Value) {
        self.globals.insert(name, value);
    }

    /// Returns the number of bound globals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.globals.len()
    }

    /// Returns `true` if no globals are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.globals.is_empty()
    }

    /// Drops every binding.
    pub fn clear(&mut self) {
        self.globals.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let mut context = Context::new();
        assert!(context.is_empty());
        context.set(Rc::from("v_0"), Value::Int(1));
        assert_eq!(context.get("v_0"), Some(&Value::Int(1)));
        assert_eq!(context.len(), 1);
        context.clear();
        assert!(context.get("v_0").is_none());
    }

    #[test]
    fn testing_limits_smaller() {
        let test_limits = VmLimits::for_testing();
        let default_limits = VmLimits::default();
        assert!(test_limits.max_call_depth < default_limits.max_call_depth);
        assert!(test_limits.max_stack < default_limits.max_stack);
        assert_eq!(Context::with_limits(test_limits).limits().max_stack, 16);
    }
}
