//! Sequence proxy.
//!
//! Positional (`items: [...]`) schemas depend on the index a value sits at,
//! so every operation that shifts elements re-schematises the elements it
//! moved.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use super::{json_equal, Links, Meta, NodeInput, ProxyKind, ProxyNode, WeakContainer};
use crate::config::{Config, ANY_ITEM};
use crate::error::{Error, Result};
use crate::schema::Schema;
use crate::wrap::{self, wrap_with};

pub(crate) struct ArrayCell {
    items: RefCell<Vec<ProxyNode>>,
    meta: RefCell<Meta>,
}

/// A shared handle on a JSON array whose elements are proxies.
#[derive(Clone)]
pub struct ArrayProxy(pub(crate) Rc<ArrayCell>);

impl ArrayProxy {
    /// Wrap an array (or null, read as `[]`) with the default [`Config`].
    pub fn new(value: impl Into<NodeInput>, schema: Schema) -> Result<Self> {
        Self::with_config(value, schema, Config::default())
    }

    pub fn with_config(
        value: impl Into<NodeInput>,
        schema: Schema,
        config: impl Into<Rc<Config>>,
    ) -> Result<Self> {
        let input = match value.into() {
            NodeInput::Raw(Value::Null) => NodeInput::Raw(Value::Array(Vec::new())),
            other => other,
        };
        match wrap::wrap(input, schema, config.into())? {
            ProxyNode::Array(array) => Ok(array),
            other => Err(Error::KindMismatch {
                expected: ProxyKind::Array,
                found: other.kind(),
            }),
        }
    }

    pub(crate) fn build(values: Vec<Value>, meta: Meta) -> Result<Self> {
        let array = Self::from_nodes(Vec::with_capacity(values.len()), meta);
        for (index, value) in values.into_iter().enumerate() {
            let child = wrap_with(NodeInput::Raw(value), array.child_meta(index))?;
            array.0.items.borrow_mut().push(child);
        }
        Ok(array)
    }

    /// An array holding `nodes` as they are, without re-wrapping or
    /// re-linking them.
    pub(crate) fn from_nodes(nodes: Vec<ProxyNode>, meta: Meta) -> Self {
        ArrayProxy(Rc::new(ArrayCell {
            items: RefCell::new(nodes),
            meta: RefCell::new(meta),
        }))
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
        ProxyNode::Array(self.clone()).root()
    }

    pub fn parent(&self) -> ProxyNode {
        ProxyNode::Array(self.clone()).parent()
    }

    pub fn len(&self) -> usize {
        self.0.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.items.borrow().is_empty()
    }

    /// A snapshot of the elements in order.
    pub fn items(&self) -> Vec<ProxyNode> {
        self.0.items.borrow().clone()
    }

    pub(crate) fn stored(&self, index: usize) -> Option<ProxyNode> {
        self.0.items.borrow().get(index).cloned()
    }

    /// Element at `index`; negative indices count from the end.
    pub fn get(&self, index: isize) -> Result<ProxyNode> {
        let position = self.position(index)?;
        Ok(self.0.items.borrow()[position].clone())
    }

    fn position(&self, index: isize) -> Result<usize> {
        let len = self.len();
        let position = if index < 0 { len as isize + index } else { index };
        if position < 0 || position as usize >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        Ok(position as usize)
    }

    fn child_links(&self) -> Links {
        let own = WeakContainer::Array(Rc::downgrade(&self.0));
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

    pub(crate) fn child_meta(&self, index: usize) -> Meta {
        let links = self.child_links();
        let meta = self.0.meta.borrow();
        Meta {
            schema: meta.schema.item(index),
            links,
            config: Rc::clone(&meta.config),
            callbacks: meta.callbacks.as_ref().and_then(|c| c.child(ANY_ITEM)),
        }
    }

    /// Fragment that applies at `index`. Uniform `items` apply at every
    /// index; for positional `items` a negative index is mapped to its
    /// positive equivalent first.
    pub fn child_schema(&self, index: isize) -> Schema {
        let schema = self.schema();
        if schema.keyword("items").is_some_and(Value::is_object) {
            return schema.item(0);
        }
        let position = if index < 0 {
            self.len() as isize + index
        } else {
            index
        };
        match usize::try_from(position) {
            Ok(position) => schema.item(position),
            Err(_) => Schema::empty(),
        }
    }

    pub fn set(&self, index: isize, value: impl Into<NodeInput>) -> Result<()> {
        let position = self.position(index)?;
        let child = wrap_with(value.into(), self.child_meta(position))?;
        self.0.items.borrow_mut()[position] = child;
        Ok(())
    }

    pub fn append(&self, value: impl Into<NodeInput>) -> Result<()> {
        let child = wrap_with(value.into(), self.child_meta(self.len()))?;
        self.0.items.borrow_mut().push(child);
        Ok(())
    }

    pub fn extend<I>(&self, values: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<NodeInput>,
    {
        for value in values {
            self.append(value)?;
        }
        Ok(())
    }

    /// Insert before `index`, clamped into `[-len, len]` like a list insert.
    pub fn insert(&self, index: isize, value: impl Into<NodeInput>) -> Result<()> {
        let len = self.len() as isize;
        let position = (if index < 0 {
            (len + index).max(0)
        } else {
            index.min(len)
        }) as usize;
        let child = wrap_with(value.into(), self.child_meta(position))?;
        self.0.items.borrow_mut().insert(position, child);
        self.reschema_from(position)
    }

    /// Replace `[start, stop)` with `values`. Bounds follow slice-assignment
    /// rules: negative bounds count from the end, out-of-range bounds clamp
    /// and a stop before start inserts at start.
    pub fn set_slice<I>(&self, start: Option<isize>, stop: Option<isize>, values: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<NodeInput>,
    {
        let len = self.len() as isize;
        let clamp = |bound: isize| {
            if bound < 0 {
                (len + bound).max(0)
            } else {
                bound.min(len)
            }
        };
        let lower = start.map_or(0, clamp) as usize;
        let upper = (stop.map_or(len, clamp) as usize).max(lower);

        let mut replacement = Vec::new();
        for (offset, value) in values.into_iter().enumerate() {
            replacement.push(wrap_with(value.into(), self.child_meta(lower + offset))?);
        }
        let _removed: Vec<ProxyNode> = self
            .0
            .items
            .borrow_mut()
            .splice(lower..upper, replacement)
            .collect();
        self.reschema_from(lower)
    }

    /// Remove and return the element at `index`.
    pub fn remove(&self, index: isize) -> Result<ProxyNode> {
        let position = self.position(index)?;
        let removed = self.0.items.borrow_mut().remove(position);
        self.reschema_from(position)?;
        Ok(removed)
    }

    /// Remove and return the last element.
    pub fn pop(&self) -> Result<ProxyNode> {
        self.remove(-1)
    }

    /// Replace the schema and re-schematise every element by position.
    pub fn set_schema(&self, schema: Schema) -> Result<()> {
        let config = self.config();
        self.0.meta.borrow_mut().schema = schema.resolve(&config)?;
        self.reschema_from(0)
    }

    fn reschema_from(&self, start: usize) -> Result<()> {
        let config = self.config();
        let schema = self.schema();
        for (index, item) in self.items().into_iter().enumerate().skip(start) {
            let item = item.with_schema(schema.item(index).resolve(&config)?)?;
            self.0.items.borrow_mut()[index] = item;
        }
        Ok(())
    }

    pub(crate) fn relink(&self, links: Links) {
        self.0.meta.borrow_mut().links = links;
        let child_links = self.child_links();
        for (index, item) in self.items().into_iter().enumerate() {
            self.0.items.borrow_mut()[index] = item.relinked(child_links.clone());
        }
    }

    /// Move every element of `source` into this array and link the moved
    /// elements here. `source` is left empty.
    pub(crate) fn adopt(&self, source: &ArrayProxy) {
        if Rc::ptr_eq(&self.0, &source.0) {
            return;
        }
        let moved = std::mem::take(&mut *source.0.items.borrow_mut());
        let links = self.child_links();
        *self.0.items.borrow_mut() = moved
            .into_iter()
            .map(|item| item.relinked(links.clone()))
            .collect();
    }

    pub fn to_json(&self) -> Value {
        Value::Array(self.0.items.borrow().iter().map(ProxyNode::to_json).collect())
    }
}

impl PartialEq<Value> for ArrayProxy {
    fn eq(&self, other: &Value) -> bool {
        json_equal(&self.to_json(), other)
    }
}

impl fmt::Debug for ArrayProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ArrayProxy").field(&self.to_json()).finish()
    }
}
