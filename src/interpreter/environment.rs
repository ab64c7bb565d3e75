use crate::object::Object;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Bindings of a single scope.
type Scope = HashMap<String, Object>;

/// A lexical scope with an optional enclosing scope.
///
/// Cloning an `Environment` yields another handle to the same bindings, which is how
/// closures keep their defining scope alive. Call frames point outward to the closure's
/// scope; nothing points inward.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    store: Rc<RefCell<Scope>>,
    outer: Option<Rc<Environment>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fresh scope whose lookups fall back to `outer`.
    pub fn enclosed(outer: Rc<Environment>) -> Self {
        Self {
            store: Rc::new(RefCell::new(HashMap::new())),
            outer: Some(outer),
        }
    }

    /// Get a variable, searching from this scope outward.
    pub fn get(&self, name: &str) -> Option<Object> {
        if let Some(value) = self.store.borrow().get(name) {
            return Some(value.clone());
        }
        self.outer.as_ref().and_then(|outer| outer.get(name))
    }

    /// Binds `name` in this scope, shadowing any outer binding.
    pub fn set(&self, name: impl Into<String>, value: Object) {
        self.store.borrow_mut().insert(name.into(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_set_get() {
        let env = Environment::new();
        env.set("x", Object::Integer(42));
        assert_eq!(env.get("x"), Some(Object::Integer(42)));
        assert_eq!(env.get("y"), None);
    }

    #[test]
    fn test_enclosed_lookup_and_shadowing() {
        let outer = Rc::new(Environment::new());
        outer.set("x", Object::Integer(1));
        outer.set("y", Object::Integer(2));

        let inner = Environment::enclosed(Rc::clone(&outer));
        inner.set("x", Object::Integer(10));

        assert_eq!(inner.get("x"), Some(Object::Integer(10)));
        assert_eq!(inner.get("y"), Some(Object::Integer(2)));
        assert_eq!(outer.get("x"), Some(Object::Integer(1)));
    }

    #[test]
    fn test_clones_share_bindings() {
        let env = Environment::new();
        let handle = env.clone();
        handle.set("late", Object::Boolean(true));
        assert_eq!(env.get("late"), Some(Object::Boolean(true)));
    }
}
