//! Mapping proxy.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{json_equal, Links, Meta, NodeInput, ProxyKind, ProxyNode, WeakContainer};
use crate::config::Config;
use crate::derived;
use crate::error::{Error, Result};
use crate::schema::Schema;
use crate::wrap::{self, wrap_with};

pub(crate) struct ObjectCell {
    entries: RefCell<IndexMap<String, ProxyNode>>,
    meta: RefCell<Meta>,
}

/// A shared handle on a JSON object whose values are proxies.
///
/// Cloning the handle does not copy the object: every clone observes the same
/// entries.
#[derive(Clone)]
pub struct ObjectProxy(pub(crate) Rc<ObjectCell>);

impl ObjectProxy {
    /// Wrap an object (or null, read as `{}`) with the default [`Config`].
    pub fn new(value: impl Into<NodeInput>, schema: Schema) -> Result<Self> {
        Self::with_config(value, schema, Config::default())
    }

    pub fn with_config(
        value: impl Into<NodeInput>,
        schema: Schema,
        config: impl Into<Rc<Config>>,
    ) -> Result<Self> {
        let input = match value.into() {
            NodeInput::Raw(Value::Null) => NodeInput::Raw(Value::Object(Map::new())),
            other => other,
        };
        match wrap::wrap(input, schema, config.into())? {
            ProxyNode::Object(object) => Ok(object),
            other => Err(Error::KindMismatch {
                expected: ProxyKind::Object,
                found: other.kind(),
            }),
        }
    }

    /// Create the container first so children can link back to it.
    pub(crate) fn build(map: Map<String, Value>, meta: Meta) -> Result<Self> {
        let object = ObjectProxy(Rc::new(ObjectCell {
            entries: RefCell::new(IndexMap::with_capacity(map.len())),
            meta: RefCell::new(meta),
        }));
        for (key, value) in map {
            let child = wrap_with(NodeInput::Raw(value), object.child_meta(&key))?;
            object.0.entries.borrow_mut().insert(key, child);
        }
        Ok(object)
    }

    pub(crate) fn meta(&self) -> Meta {
        self.0.meta.borrow().clone()
    }

    pub fn schema(&self) -> Schema {
        self.0.meta.borrow().schema.clone()
    }

    pub fn config(&self) -> Rc<Config> {
        Rc::clone(&self.0.meta.borrow().config)
    }

    pub fn root(&self) -> ProxyNode {
        ProxyNode::Object(self.clone()).root()
    }

    pub fn parent(&self) -> ProxyNode {
        ProxyNode::Object(self.clone()).parent()
    }

    fn child_links(&self) -> Links {
        let own = WeakContainer::Object(Rc::downgrade(&self.0));
        let root = self
            .0
            .meta
            .borrow()
            .links
            .root
            .clone()
            .unwrap_or_else(|| own.clone());
        Links {
            parent: Some(own),
            root: Some(root),
        }
    }

    /// Metadata a child stored under `key` is wrapped with.
    pub(crate) fn child_meta(&self, key: &str) -> Meta {
        let links = self.child_links();
        let meta = self.0.meta.borrow();
        Meta {
            schema: meta.schema.property(key),
            links,
            config: Rc::clone(&meta.config),
            callbacks: meta.callbacks.as_ref().and_then(|c| c.child(key)),
        }
    }

    /// The value under `key`.
    ///
    /// A `getter` or `template` + `watch` in the key's schema computes the
    /// value and ignores whatever is stored. Otherwise the stored child is
    /// returned, transformed by a read callback when one is registered for
    /// this position.
    pub fn get(&self, key: &str) -> Result<ProxyNode> {
        let meta = self.child_meta(key);
        let schema = meta.schema.resolve(&meta.config)?;
        let meta = Meta {
            schema: schema.clone(),
            ..meta
        };

        if let Some(name) = schema.keyword("getter").and_then(Value::as_str) {
            return derived::computed(self, name, meta);
        }
        let template = schema.keyword("template").and_then(Value::as_str);
        let watch = schema.keyword("watch").and_then(Value::as_object);
        if let (Some(template), Some(watch)) = (template, watch) {
            return derived::rendered(self, template, watch, meta);
        }

        let stored = self
            .stored(key)
            .ok_or_else(|| Error::KeyNotFound(key.to_string()))?;
        match meta.callbacks.as_ref().and_then(|c| c.read()) {
            Some(read) => {
                let value = read(&stored).map_err(|message| Error::Hook {
                    name: key.to_string(),
                    message,
                })?;
                wrap_with(NodeInput::Raw(value), meta)
            }
            None => Ok(stored),
        }
    }

    /// [`get`](Self::get), with `default` wrapped against the key's schema
    /// when the key is missing.
    pub fn get_or(&self, key: &str, default: impl Into<NodeInput>) -> Result<ProxyNode> {
        match self.get(key) {
            Err(Error::KeyNotFound(_)) => wrap_with(default.into(), self.child_meta(key)),
            other => other,
        }
    }

    /// The stored child, bypassing derived fields and callbacks.
    pub fn stored(&self, key: &str) -> Option<ProxyNode> {
        self.0.entries.borrow().get(key).cloned()
    }

    /// Assign `value` to `key`.
    ///
    /// A `setter` in the key's schema receives the raw value and owns all
    /// storage. Otherwise the value is wrapped against `properties[key]` and
    /// stored, replacing any previous child.
    pub fn set(&self, key: &str, value: impl Into<NodeInput>) -> Result<()> {
        let meta = self.child_meta(key);
        let schema = meta.schema.resolve(&meta.config)?;
        if let Some(name) = schema.keyword("setter").and_then(Value::as_str) {
            return derived::assign(self, name, key, value.into(), &meta.config);
        }
        self.store_with(key, value.into(), meta)
    }

    /// Wrap and store `value` under `key` without consulting a setter.
    pub fn store(&self, key: &str, value: impl Into<NodeInput>) -> Result<()> {
        self.store_with(key, value.into(), self.child_meta(key))
    }

    fn store_with(&self, key: &str, input: NodeInput, meta: Meta) -> Result<()> {
        let child = wrap_with(input, meta)?;
        self.0.entries.borrow_mut().insert(key.to_string(), child);
        Ok(())
    }

    /// Remove and return the child under `key`.
    pub fn remove(&self, key: &str) -> Result<ProxyNode> {
        self.0
            .entries
            .borrow_mut()
            .shift_remove(key)
            .ok_or_else(|| Error::KeyNotFound(key.to_string()))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.entries.borrow().contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.0.entries.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.0.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.entries.borrow().is_empty()
    }

    /// Stored entries in insertion order.
    pub fn entries(&self) -> Vec<(String, ProxyNode)> {
        self.0
            .entries
            .borrow()
            .iter()
            .map(|(key, child)| (key.clone(), child.clone()))
            .collect()
    }

    /// Replace the schema and push each key's new fragment down into the
    /// existing children, recursively.
    pub fn set_schema(&self, schema: Schema) -> Result<()> {
        let config = self.config();
        self.0.meta.borrow_mut().schema = schema.resolve(&config)?;
        for (key, child) in self.entries() {
            let child_schema = self.child_meta(&key).schema.resolve(&config)?;
            let child = child.with_schema(child_schema)?;
            self.0.entries.borrow_mut().insert(key, child);
        }
        Ok(())
    }

    pub(crate) fn relink(&self, links: Links) {
        self.0.meta.borrow_mut().links = links;
        let child_links = self.child_links();
        for (key, child) in self.entries() {
            let child = child.relinked(child_links.clone());
            self.0.entries.borrow_mut().insert(key, child);
        }
    }

    /// Move every entry of `source` into this object and link the moved
    /// children here. `source` is left empty.
    pub(crate) fn adopt(&self, source: &ObjectProxy) {
        if Rc::ptr_eq(&self.0, &source.0) {
            return;
        }
        let moved = std::mem::take(&mut *source.0.entries.borrow_mut());
        let links = self.child_links();
        let relinked = moved
            .into_iter()
            .map(|(key, child)| (key, child.relinked(links.clone())))
            .collect();
        *self.0.entries.borrow_mut() = relinked;
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.0
                .entries
                .borrow()
                .iter()
                .map(|(key, child)| (key.clone(), child.to_json()))
                .collect(),
        )
    }
}

impl PartialEq<Value> for ObjectProxy {
    fn eq(&self, other: &Value) -> bool {
        json_equal(&self.to_json(), other)
    }
}

impl fmt::Debug for ObjectProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectProxy").field(&self.to_json()).finish()
    }
}
