//! Proxy nodes.
//!
//! Every value in a document is a [`ProxyNode`]. Objects and arrays are
//! shared handles (`Rc`) whose storage owns their children; strings and
//! numbers are immutable value types. Each proxy carries its schema fragment
//! plus `Weak` links to its parent container and to the top of its tree.
//! Booleans and null have no proxy representation and pass through as plain
//! variants without schema or links.

mod array;
mod leaf;
mod object;

pub use array::ArrayProxy;
pub use leaf::{IntegerProxy, LeafProxy, LeafValue, NumberProxy, StringProxy};
pub use object::ObjectProxy;

pub(crate) use array::ArrayCell;
pub(crate) use object::ObjectCell;

use std::fmt;
use std::rc::{Rc, Weak};

use json_alchemy_path::{PathComponent, PathNode};
use serde_json::{Number, Value};

use crate::config::{Callbacks, Config};
use crate::error::{Error, Result};
use crate::schema::Schema;
use crate::wrap;

// ── Kinds ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyKind {
    Object,
    Array,
    String,
    Number,
    Integer,
    Bool,
    Null,
}

impl fmt::Display for ProxyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProxyKind::Object => "object",
            ProxyKind::Array => "array",
            ProxyKind::String => "string",
            ProxyKind::Number => "number",
            ProxyKind::Integer => "integer",
            ProxyKind::Bool => "boolean",
            ProxyKind::Null => "null",
        };
        f.write_str(name)
    }
}

// ── Links and metadata ─────────────────────────────────────────────────────

/// A non-owning handle on a container.
#[derive(Clone)]
pub(crate) enum WeakContainer {
    Object(Weak<ObjectCell>),
    Array(Weak<ArrayCell>),
}

impl WeakContainer {
    pub(crate) fn upgrade(&self) -> Option<ProxyNode> {
        match self {
            WeakContainer::Object(weak) => weak.upgrade().map(|rc| ProxyNode::Object(ObjectProxy(rc))),
            WeakContainer::Array(weak) => weak.upgrade().map(|rc| ProxyNode::Array(ArrayProxy(rc))),
        }
    }
}

/// `None` means the node is its own parent / root.
#[derive(Clone, Default)]
pub(crate) struct Links {
    pub(crate) parent: Option<WeakContainer>,
    pub(crate) root: Option<WeakContainer>,
}

/// Everything a proxy carries besides its value.
#[derive(Clone)]
pub(crate) struct Meta {
    pub(crate) schema: Schema,
    pub(crate) links: Links,
    pub(crate) config: Rc<Config>,
    pub(crate) callbacks: Option<Rc<Callbacks>>,
}

impl Meta {
    /// Metadata for the top of a new tree.
    pub(crate) fn detached(schema: Schema, config: Rc<Config>) -> Self {
        let callbacks = Some(config.callbacks());
        Self {
            schema,
            links: Links::default(),
            config,
            callbacks,
        }
    }
}

// ── Input ──────────────────────────────────────────────────────────────────

/// A value handed to the wrap dispatcher.
#[derive(Debug, Clone)]
pub enum NodeInput {
    Raw(Value),
    Node(ProxyNode),
    /// A host value with no JSON representation (for example a NaN float).
    Unrepresentable(String),
}

impl NodeInput {
    pub(crate) fn into_json(self) -> Result<Value> {
        match self {
            NodeInput::Raw(value) => Ok(value),
            NodeInput::Node(node) => Ok(node.to_json()),
            NodeInput::Unrepresentable(description) => Err(Error::WrapType(description)),
        }
    }
}

impl From<Value> for NodeInput {
    fn from(value: Value) -> Self {
        NodeInput::Raw(value)
    }
}

impl From<&Value> for NodeInput {
    fn from(value: &Value) -> Self {
        NodeInput::Raw(value.clone())
    }
}

impl From<ProxyNode> for NodeInput {
    fn from(node: ProxyNode) -> Self {
        NodeInput::Node(node)
    }
}

impl From<&ProxyNode> for NodeInput {
    fn from(node: &ProxyNode) -> Self {
        NodeInput::Node(node.clone())
    }
}

impl From<ObjectProxy> for NodeInput {
    fn from(object: ObjectProxy) -> Self {
        NodeInput::Node(ProxyNode::Object(object))
    }
}

impl From<ArrayProxy> for NodeInput {
    fn from(array: ArrayProxy) -> Self {
        NodeInput::Node(ProxyNode::Array(array))
    }
}

impl From<&str> for NodeInput {
    fn from(value: &str) -> Self {
        NodeInput::Raw(Value::String(value.to_string()))
    }
}

impl From<String> for NodeInput {
    fn from(value: String) -> Self {
        NodeInput::Raw(Value::String(value))
    }
}

impl From<i64> for NodeInput {
    fn from(value: i64) -> Self {
        NodeInput::Raw(Value::from(value))
    }
}

impl From<i32> for NodeInput {
    fn from(value: i32) -> Self {
        NodeInput::Raw(Value::from(value))
    }
}

impl From<u64> for NodeInput {
    fn from(value: u64) -> Self {
        NodeInput::Raw(Value::from(value))
    }
}

impl From<f64> for NodeInput {
    fn from(value: f64) -> Self {
        match Number::from_f64(value) {
            Some(number) => NodeInput::Raw(Value::Number(number)),
            None => NodeInput::Unrepresentable(value.to_string()),
        }
    }
}

impl From<bool> for NodeInput {
    fn from(value: bool) -> Self {
        NodeInput::Raw(Value::Bool(value))
    }
}

// ── ProxyNode ──────────────────────────────────────────────────────────────

/// A node of a live document.
#[derive(Clone)]
pub enum ProxyNode {
    Object(ObjectProxy),
    Array(ArrayProxy),
    String(StringProxy),
    Number(NumberProxy),
    Integer(IntegerProxy),
    Bool(bool),
    Null,
}

impl ProxyNode {
    /// Wrap `value` as the top of a new tree with the default [`Config`].
    ///
    /// ```
    /// use json_alchemy::{ProxyNode, Schema};
    /// use serde_json::json;
    ///
    /// let schema = Schema::new(json!({
    ///     "type": "object",
    ///     "properties": {"name": {"type": "string", "maxLength": 3}}
    /// }));
    /// let doc = ProxyNode::new(json!({"name": "Bob"}), schema).unwrap();
    /// assert_eq!(doc.get("name").unwrap(), "Bob");
    /// assert!(doc.validate().is_ok());
    /// ```
    pub fn new(value: impl Into<NodeInput>, schema: Schema) -> Result<ProxyNode> {
        Self::with_config(value, schema, Config::default())
    }

    pub fn with_config(
        value: impl Into<NodeInput>,
        schema: Schema,
        config: impl Into<Rc<Config>>,
    ) -> Result<ProxyNode> {
        wrap::wrap(value, schema, config.into())
    }

    pub fn kind(&self) -> ProxyKind {
        match self {
            ProxyNode::Object(_) => ProxyKind::Object,
            ProxyNode::Array(_) => ProxyKind::Array,
            ProxyNode::String(_) => ProxyKind::String,
            ProxyNode::Number(_) => ProxyKind::Number,
            ProxyNode::Integer(_) => ProxyKind::Integer,
            ProxyNode::Bool(_) => ProxyKind::Bool,
            ProxyNode::Null => ProxyKind::Null,
        }
    }

    pub(crate) fn meta(&self) -> Option<Meta> {
        match self {
            ProxyNode::Object(object) => Some(object.meta()),
            ProxyNode::Array(array) => Some(array.meta()),
            ProxyNode::String(leaf) => Some(leaf.meta().clone()),
            ProxyNode::Number(leaf) => Some(leaf.meta().clone()),
            ProxyNode::Integer(leaf) => Some(leaf.meta().clone()),
            ProxyNode::Bool(_) | ProxyNode::Null => None,
        }
    }

    /// The node's schema fragment. `None` for booleans and null.
    pub fn schema(&self) -> Option<Schema> {
        self.meta().map(|meta| meta.schema)
    }

    pub fn config(&self) -> Option<Rc<Config>> {
        self.meta().map(|meta| meta.config)
    }

    /// The top of the tree. A node without links is its own root.
    pub fn root(&self) -> ProxyNode {
        self.meta()
            .and_then(|meta| meta.links.root)
            .and_then(|root| root.upgrade())
            .unwrap_or_else(|| self.clone())
    }

    /// The enclosing container. A node without links is its own parent.
    pub fn parent(&self) -> ProxyNode {
        self.meta()
            .and_then(|meta| meta.links.parent)
            .and_then(|parent| parent.upgrade())
            .unwrap_or_else(|| self.clone())
    }

    /// Identity of containers. Leaves and passthrough values have none.
    pub fn same_node(&self, other: &ProxyNode) -> bool {
        match (self, other) {
            (ProxyNode::Object(a), ProxyNode::Object(b)) => Rc::ptr_eq(&a.0, &b.0),
            (ProxyNode::Array(a), ProxyNode::Array(b)) => Rc::ptr_eq(&a.0, &b.0),
            _ => false,
        }
    }

    /// The plain JSON value of the stored state.
    pub fn to_json(&self) -> Value {
        match self {
            ProxyNode::Object(object) => object.to_json(),
            ProxyNode::Array(array) => array.to_json(),
            ProxyNode::String(leaf) => leaf.to_json(),
            ProxyNode::Number(leaf) => leaf.to_json(),
            ProxyNode::Integer(leaf) => leaf.to_json(),
            ProxyNode::Bool(b) => Value::Bool(*b),
            ProxyNode::Null => Value::Null,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectProxy> {
        match self {
            ProxyNode::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayProxy> {
        match self {
            ProxyNode::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ProxyNode::String(leaf) => Some(leaf.as_str()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ProxyNode::Integer(leaf) => Some(leaf.value()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ProxyNode::Number(leaf) => Some(leaf.value()),
            ProxyNode::Integer(leaf) => Some(leaf.value() as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ProxyNode::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ProxyNode::Null)
    }

    pub fn object(&self) -> Result<&ObjectProxy> {
        self.as_object().ok_or(Error::KindMismatch {
            expected: ProxyKind::Object,
            found: self.kind(),
        })
    }

    pub fn array(&self) -> Result<&ArrayProxy> {
        self.as_array().ok_or(Error::KindMismatch {
            expected: ProxyKind::Array,
            found: self.kind(),
        })
    }

    /// [`ObjectProxy::get`] on an object node.
    pub fn get(&self, key: &str) -> Result<ProxyNode> {
        self.object()?.get(key)
    }

    /// [`ArrayProxy::get`] on an array node.
    pub fn at(&self, index: isize) -> Result<ProxyNode> {
        self.array()?.get(index)
    }

    /// [`ObjectProxy::set`] on an object node.
    pub fn set(&self, key: &str, value: impl Into<NodeInput>) -> Result<()> {
        self.object()?.set(key, value)
    }

    /// Walk stored children along `path`. Array steps are decimal indices.
    pub fn find(&self, path: &[String]) -> Option<ProxyNode> {
        let mut current = self.clone();
        for step in path {
            current = match &current {
                ProxyNode::Object(object) => object.stored(step)?,
                ProxyNode::Array(array) => array.stored(step.parse().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// The same node under a different schema. Containers are re-schematised
    /// in place; leaves are rebuilt.
    pub(crate) fn with_schema(&self, schema: Schema) -> Result<ProxyNode> {
        Ok(match self {
            ProxyNode::Object(object) => {
                object.set_schema(schema)?;
                self.clone()
            }
            ProxyNode::Array(array) => {
                array.set_schema(schema)?;
                self.clone()
            }
            ProxyNode::String(leaf) => ProxyNode::String(leaf.with_schema(schema)),
            ProxyNode::Number(leaf) => ProxyNode::Number(leaf.with_schema(schema)),
            ProxyNode::Integer(leaf) => ProxyNode::Integer(leaf.with_schema(schema)),
            ProxyNode::Bool(_) | ProxyNode::Null => self.clone(),
        })
    }

    /// The same node attached at a new position, with every descendant's
    /// root updated to match.
    pub(crate) fn relinked(&self, links: Links) -> ProxyNode {
        match self {
            ProxyNode::Object(object) => {
                object.relink(links);
                self.clone()
            }
            ProxyNode::Array(array) => {
                array.relink(links);
                self.clone()
            }
            ProxyNode::String(leaf) => ProxyNode::String(leaf.with_links(links)),
            ProxyNode::Number(leaf) => ProxyNode::Number(leaf.with_links(links)),
            ProxyNode::Integer(leaf) => ProxyNode::Integer(leaf.with_links(links)),
            ProxyNode::Bool(_) | ProxyNode::Null => self.clone(),
        }
    }
}

impl From<ObjectProxy> for ProxyNode {
    fn from(object: ObjectProxy) -> Self {
        ProxyNode::Object(object)
    }
}

impl From<ArrayProxy> for ProxyNode {
    fn from(array: ArrayProxy) -> Self {
        ProxyNode::Array(array)
    }
}

// ── Path queries ───────────────────────────────────────────────────────────

impl PathNode for ProxyNode {
    fn child_by_key(&self, key: &str) -> Option<Self> {
        self.as_object()?.stored(key)
    }

    fn child_by_index(&self, index: usize) -> Option<Self> {
        self.as_array()?.stored(index)
    }

    fn array_len(&self) -> Option<usize> {
        self.as_array().map(ArrayProxy::len)
    }

    fn children(&self) -> Vec<(PathComponent, Self)> {
        match self {
            ProxyNode::Object(object) => object
                .entries()
                .into_iter()
                .map(|(key, child)| (PathComponent::Key(key), child))
                .collect(),
            ProxyNode::Array(array) => array
                .items()
                .into_iter()
                .enumerate()
                .map(|(index, child)| (PathComponent::Index(index), child))
                .collect(),
            _ => Vec::new(),
        }
    }
}

// ── Equality ───────────────────────────────────────────────────────────────

/// Deep JSON equality where numbers compare by value (`1 == 1.0`).
pub(crate) fn json_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => x.as_f64() == y.as_f64(),
        },
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(x, y)| json_equal(x, y))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(key, x)| y.get(key).is_some_and(|y| json_equal(x, y)))
        }
        _ => a == b,
    }
}

impl PartialEq for ProxyNode {
    fn eq(&self, other: &Self) -> bool {
        json_equal(&self.to_json(), &other.to_json())
    }
}

impl PartialEq<Value> for ProxyNode {
    fn eq(&self, other: &Value) -> bool {
        json_equal(&self.to_json(), other)
    }
}

impl PartialEq<&str> for ProxyNode {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<i64> for ProxyNode {
    fn eq(&self, other: &i64) -> bool {
        match self {
            ProxyNode::Integer(leaf) => leaf.value() == *other,
            ProxyNode::Number(leaf) => leaf.value() == *other as f64,
            _ => false,
        }
    }
}

impl PartialEq<f64> for ProxyNode {
    fn eq(&self, other: &f64) -> bool {
        self.as_f64() == Some(*other)
    }
}

impl PartialEq<bool> for ProxyNode {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

impl fmt::Debug for ProxyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyNode::Object(object) => fmt::Debug::fmt(object, f),
            ProxyNode::Array(array) => fmt::Debug::fmt(array, f),
            ProxyNode::String(leaf) => fmt::Debug::fmt(leaf, f),
            ProxyNode::Number(leaf) => fmt::Debug::fmt(leaf, f),
            ProxyNode::Integer(leaf) => fmt::Debug::fmt(leaf, f),
            ProxyNode::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            ProxyNode::Null => f.write_str("Null"),
        }
    }
}

impl fmt::Display for ProxyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyNode::String(leaf) => f.write_str(leaf.as_str()),
            other => write!(f, "{}", other.to_json()),
        }
    }
}
