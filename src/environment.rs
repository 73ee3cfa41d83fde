use crate::object::Object;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;
use tracing::debug;

#[derive(Default)]
struct Frame {
    store: HashMap<String, Object>,
    constants: HashSet<String>,
    outer: Option<Environment>,
}

/// A shared handle to one scope in the lexical chain.
#[derive(Clone, Default)]
pub struct Environment(Rc<RefCell<Frame>>);

impl Environment {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_enclosed(outer: &Environment) -> Self {
        Self(Rc::new(RefCell::new(Frame {
            outer: Some(outer.clone()),
            ..Default::default()
        })))
    }

    fn outer(&self) -> Option<Environment> {
        self.0.borrow().outer.clone()
    }

    pub fn lookup(&self, name: &str) -> Option<Object> {
        if let Some(value) = self.0.borrow().store.get(name) {
            return Some(value.clone());
        }
        self.outer()?.lookup(name)
    }

    pub fn contains_local(&self, name: &str) -> bool {
        self.0.borrow().store.contains_key(name)
    }

    /// Binds `name` in this scope only. Returns whether it was already bound here.
    pub fn bind(&self, name: &str, value: Object) -> bool {
        let mut frame = self.0.borrow_mut();
        frame.constants.remove(name);
        let shadowed = frame.store.insert(name.to_owned(), value).is_some();
        if shadowed {
            debug!(name, "rebinding in the same scope");
        }
        shadowed
    }

    pub fn bind_const(&self, name: &str, value: Object) -> bool {
        let shadowed = self.bind(name, value);
        self.0.borrow_mut().constants.insert(name.to_owned());
        shadowed
    }

    /// Writes to the nearest scope that owns `name`, returning that scope.
    /// Never creates a binding.
    pub fn assign(&self, name: &str, value: Object) -> Option<Environment> {
        let owner = self.owner(name)?;
        owner.0.borrow_mut().store.insert(name.to_owned(), value);
        Some(owner)
    }

    fn owner(&self, name: &str) -> Option<Environment> {
        if self.contains_local(name) {
            return Some(self.clone());
        }
        self.outer()?.owner(name)
    }

    /// Whether the binding `name` resolves to was declared `const`.
    pub fn is_constant(&self, name: &str) -> bool {
        self.owner(name)
            .map_or(false, |owner| owner.is_local_constant(name))
    }

    pub fn is_local_constant(&self, name: &str) -> bool {
        self.0.borrow().constants.contains(name)
    }

    /// A new scope holding a shallow copy of this scope's bindings, with the same parent.
    pub fn snapshot(&self) -> Environment {
        let frame = self.0.borrow();
        Self(Rc::new(RefCell::new(Frame {
            store: frame.store.clone(),
            constants: frame.constants.clone(),
            outer: frame.outer.clone(),
        })))
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let frame = self.0.borrow();
        let mut names: Vec<&String> = frame.store.keys().collect();
        names.sort();
        f.debug_struct("Environment")
            .field("names", &names)
            .field("enclosed", &frame.outer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lookup_walks_outward() {
        let global = Environment::new();
        global.bind("x", Object::Integer(1));
        let inner = Environment::with_enclosed(&global);
        assert_eq!(inner.lookup("x"), Some(Object::Integer(1)));
        assert_eq!(inner.lookup("y"), None);
    }

    #[test]
    fn test_bind_reports_shadowing_in_same_scope_only() {
        let global = Environment::new();
        assert!(!global.bind("x", Object::Integer(1)));
        assert!(global.bind("x", Object::Integer(2)));

        let inner = Environment::with_enclosed(&global);
        assert!(!inner.bind("x", Object::Integer(3)));
        assert_eq!(inner.lookup("x"), Some(Object::Integer(3)));
        assert_eq!(global.lookup("x"), Some(Object::Integer(2)));
    }

    #[test]
    fn test_assign_mutates_nearest_owner() {
        let global = Environment::new();
        global.bind("x", Object::Integer(1));
        let inner = Environment::with_enclosed(&global);

        assert!(inner.assign("x", Object::Integer(5)).is_some());
        assert_eq!(global.lookup("x"), Some(Object::Integer(5)));
        assert!(!inner.contains_local("x"));

        assert!(inner.assign("missing", Object::Nil).is_none());
        assert_eq!(global.lookup("missing"), None);
    }

    #[test]
    fn test_constants() {
        let global = Environment::new();
        global.bind_const("LIMIT", Object::Integer(10));
        let inner = Environment::with_enclosed(&global);
        assert!(inner.is_constant("LIMIT"));

        inner.bind("LIMIT", Object::Integer(0));
        assert!(!inner.is_constant("LIMIT"));
        assert!(global.is_constant("LIMIT"));
    }

    #[test]
    fn test_snapshot_is_shallow_copy() {
        let global = Environment::new();
        global.bind("g", Object::Integer(1));
        let scope = Environment::with_enclosed(&global);
        scope.bind("x", Object::Integer(1));

        let snapshot = scope.snapshot();
        scope.assign("x", Object::Integer(2));
        global.assign("g", Object::Integer(2));

        assert_eq!(snapshot.lookup("x"), Some(Object::Integer(1)));
        assert_eq!(snapshot.lookup("g"), Some(Object::Integer(2)));
    }
}
