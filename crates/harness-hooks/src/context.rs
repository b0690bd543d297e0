//! Hook context: the immutable key/value carrier threaded through hooks.
//!
//! A context is never mutated in place. [`HookContext::with_value`] returns a
//! new context that shares its parent, so a hook that fails can be "undone"
//! simply by keeping the context it was given.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// One binding in the context chain.
struct Binding {
    key: String,
    value: Value,
    parent: Option<Arc<Binding>>,
}

/// Immutable, cheaply clonable key/value context.
///
/// Lookups find the most recent binding for a key, so a hook can shadow a
/// value attached by an earlier hook without affecting contexts that were
/// derived before it.
#[derive(Clone, Default)]
pub struct HookContext {
    head: Option<Arc<Binding>>,
}

impl HookContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new context with `key` bound to `value`.
    #[must_use]
    pub fn with_value(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            head: Some(Arc::new(Binding {
                key: key.into(),
                value: value.into(),
                parent: self.head.clone(),
            })),
        }
    }

    /// Returns the most recent value bound to `key`.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.bindings().find(|b| b.key == key).map(|b| &b.value)
    }

    /// Returns whether `key` is bound.
    pub fn contains(&self, key: &str) -> bool {
        self.value(key).is_some()
    }

    /// Returns the distinct keys, most recently bound first.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for binding in self.bindings() {
            if !keys.contains(&binding.key.as_str()) {
                keys.push(&binding.key);
            }
        }
        keys
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.keys().len()
    }

    /// Returns whether no key is bound.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Returns whether both contexts are the same chain.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    fn bindings(&self) -> impl Iterator<Item = &Binding> {
        std::iter::successors(self.head.as_deref(), |b| b.parent.as_deref())
    }
}

impl fmt::Debug for HookContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for key in self.keys() {
            map.entry(&key, &self.value(key));
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_context() {
        let ctx = HookContext::new();
        assert!(ctx.is_empty());
        assert_eq!(ctx.len(), 0);
        assert!(ctx.value("anything").is_none());
    }

    #[test]
    fn test_with_value_leaves_parent_untouched() {
        let parent = HookContext::new().with_value("a", 1);
        let child = parent.with_value("b", "two");

        assert_eq!(parent.value("a"), Some(&json!(1)));
        assert!(parent.value("b").is_none());
        assert_eq!(child.value("a"), Some(&json!(1)));
        assert_eq!(child.value("b"), Some(&json!("two")));
    }

    #[test]
    fn test_shadowing() {
        let ctx = HookContext::new()
            .with_value("level", "info")
            .with_value("level", "debug");

        assert_eq!(ctx.value("level"), Some(&json!("debug")));
        assert_eq!(ctx.len(), 1);
        assert_eq!(ctx.keys(), vec!["level"]);
    }

    #[test]
    fn test_clone_shares_chain() {
        let ctx = HookContext::new().with_value("k", true);
        let cloned = ctx.clone();
        assert!(ctx.ptr_eq(&cloned));
        assert!(!ctx.ptr_eq(&cloned.with_value("k", false)));
    }
}
