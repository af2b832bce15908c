//! Host-registered getter, setter and validator hooks.
//!
//! Schemas name hooks by dotted path (`"records.helpers.author"`). The host
//! registers a closure under each name before building trees; lookups of names
//! that were never registered fail with [`Error::ImportLookup`].

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::node::{ObjectProxy, ProxyNode};

/// Computes a property's value from the object that holds it.
pub type GetterFn = Rc<dyn Fn(&ProxyNode) -> std::result::Result<Value, String>>;

/// Receives writes to a property: `(object, key, raw value)`.
pub type SetterFn = Rc<dyn Fn(&ObjectProxy, &str, Value) -> std::result::Result<(), String>>;

/// Returns a failure message for an invalid node.
pub type ValidatorFn = Rc<dyn Fn(&ProxyNode) -> Option<String>>;

#[derive(Clone, Default)]
pub struct HookRegistry {
    getters: HashMap<String, GetterFn>,
    setters: HashMap<String, SetterFn>,
    validators: HashMap<String, ValidatorFn>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_getter<F>(&mut self, name: impl Into<String>, getter: F) -> &mut Self
    where
        F: Fn(&ProxyNode) -> std::result::Result<Value, String> + 'static,
    {
        self.getters.insert(name.into(), Rc::new(getter));
        self
    }

    pub fn register_setter<F>(&mut self, name: impl Into<String>, setter: F) -> &mut Self
    where
        F: Fn(&ObjectProxy, &str, Value) -> std::result::Result<(), String> + 'static,
    {
        self.setters.insert(name.into(), Rc::new(setter));
        self
    }

    pub fn register_validator<F>(&mut self, name: impl Into<String>, validator: F) -> &mut Self
    where
        F: Fn(&ProxyNode) -> Option<String> + 'static,
    {
        self.validators.insert(name.into(), Rc::new(validator));
        self
    }

    pub fn getter(&self, name: &str) -> Result<GetterFn> {
        self.getters.get(name).cloned().ok_or_else(|| missing(name))
    }

    pub fn setter(&self, name: &str) -> Result<SetterFn> {
        self.setters.get(name).cloned().ok_or_else(|| missing(name))
    }

    pub fn validator(&self, name: &str) -> Result<ValidatorFn> {
        self.validators.get(name).cloned().ok_or_else(|| missing(name))
    }
}

fn missing(name: &str) -> Error {
    Error::ImportLookup {
        name: name.to_string(),
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut getters: Vec<_> = self.getters.keys().collect();
        let mut setters: Vec<_> = self.setters.keys().collect();
        let mut validators: Vec<_> = self.validators.keys().collect();
        getters.sort();
        setters.sort();
        validators.sort();
        f.debug_struct("HookRegistry")
            .field("getters", &getters)
            .field("setters", &setters)
            .field("validators", &validators)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_registered_and_missing() {
        let mut hooks = HookRegistry::new();
        hooks
            .register_getter("helpers.author", |_| Ok(json!("Smith, J.")))
            .register_validator("helpers.never", |_| None);

        let getter = hooks.getter("helpers.author").unwrap();
        assert_eq!(getter(&ProxyNode::Null).unwrap(), json!("Smith, J."));
        assert!(hooks.validator("helpers.never").unwrap()(&ProxyNode::Null).is_none());

        match hooks.setter("helpers.author") {
            Err(Error::ImportLookup { name }) => assert_eq!(name, "helpers.author"),
            _ => panic!("expected ImportLookup"),
        }
        assert!(matches!(
            hooks.getter("no.such.module"),
            Err(Error::ImportLookup { .. })
        ));
    }

    #[test]
    fn test_reregister_replaces() {
        let mut hooks = HookRegistry::new();
        hooks.register_getter("g", |_| Ok(json!(1)));
        hooks.register_getter("g", |_| Ok(json!(2)));
        assert_eq!(hooks.getter("g").unwrap()(&ProxyNode::Null).unwrap(), json!(2));
    }
}
