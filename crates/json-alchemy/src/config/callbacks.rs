//! Read callbacks attached to key paths.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::node::ProxyNode;

/// Transforms a stored child on read.
pub type ReadFn = Rc<dyn Fn(&ProxyNode) -> Result<Value, String>>;

/// Path segment that matches every array item.
pub const ANY_ITEM: &str = "*";

/// A tree of read callbacks mirroring the shape of the documents it applies
/// to. Each container carries the subtree for its own position.
#[derive(Clone, Default)]
pub struct Callbacks {
    read: Option<ReadFn>,
    children: HashMap<String, Rc<Callbacks>>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `callback` to the key at `path`, using [`ANY_ITEM`] to step
    /// through arrays.
    ///
    /// ```
    /// use json_alchemy::Callbacks;
    /// use serde_json::json;
    ///
    /// let callbacks = Callbacks::new().on_read(&["authors", "*", "family_name"], |node| {
    ///     Ok(json!(node.to_json().as_str().unwrap_or_default().to_uppercase()))
    /// });
    /// assert!(!callbacks.is_empty());
    /// ```
    pub fn on_read<F>(mut self, path: &[&str], callback: F) -> Self
    where
        F: Fn(&ProxyNode) -> Result<Value, String> + 'static,
    {
        self.insert(path, Rc::new(callback));
        self
    }

    fn insert(&mut self, path: &[&str], callback: ReadFn) {
        match path.split_first() {
            None => self.read = Some(callback),
            Some((head, rest)) => {
                let child = self.children.entry(head.to_string()).or_default();
                Rc::make_mut(child).insert(rest, callback);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.read.is_none() && self.children.is_empty()
    }

    pub(crate) fn child(&self, key: &str) -> Option<Rc<Callbacks>> {
        self.children.get(key).cloned()
    }

    pub(crate) fn read(&self) -> Option<ReadFn> {
        self.read.clone()
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("read", &self.read.is_some())
            .field("children", &self.children)
            .finish()
    }
}
