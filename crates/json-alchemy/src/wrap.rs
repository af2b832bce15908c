//! Wrap dispatcher: raw JSON in, proxy tree out.
//!
//! The proxy variant is chosen from the runtime shape of the value alone; the
//! schema only travels along. Containers are allocated before their children
//! so every child can be linked to its parent and root while it is built.

use std::rc::Rc;

use serde_json::Value;
use tracing::trace;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::node::{
    ArrayProxy, IntegerProxy, Meta, NodeInput, NumberProxy, ObjectProxy, ProxyNode, StringProxy,
};
use crate::schema::Schema;

/// Wrap `value` as the top of a new tree.
///
/// An existing [`ProxyNode`] is returned unchanged, as are booleans and null.
pub fn wrap(value: impl Into<NodeInput>, schema: Schema, config: Rc<Config>) -> Result<ProxyNode> {
    wrap_with(value.into(), Meta::detached(schema, config))
}

/// Wrap `input` with fully prepared metadata (schema, links, config).
pub(crate) fn wrap_with(input: NodeInput, meta: Meta) -> Result<ProxyNode> {
    let value = match input {
        NodeInput::Node(node) => return Ok(node),
        NodeInput::Unrepresentable(description) => return Err(Error::WrapType(description)),
        NodeInput::Raw(value) => value,
    };

    Ok(match value {
        Value::Null => ProxyNode::Null,
        Value::Bool(b) => ProxyNode::Bool(b),
        Value::Object(map) => ProxyNode::Object(ObjectProxy::build(map, resolved(meta)?)?),
        Value::Array(items) => ProxyNode::Array(ArrayProxy::build(items, resolved(meta)?)?),
        Value::String(s) => ProxyNode::String(StringProxy::new(Rc::from(s), resolved(meta)?)),
        Value::Number(number) => {
            if let Some(i) = number.as_i64() {
                ProxyNode::Integer(IntegerProxy::new(i, resolved(meta)?))
            } else if number.is_u64() {
                return Err(Error::WrapType(number.to_string()));
            } else {
                match number.as_f64() {
                    Some(f) => ProxyNode::Number(NumberProxy::new(f, resolved(meta)?)),
                    None => return Err(Error::WrapType(number.to_string())),
                }
            }
        }
    })
}

fn resolved(meta: Meta) -> Result<Meta> {
    let schema = meta.schema.resolve(&meta.config)?;
    trace!(pointer = %schema.pointer(), "wrap");
    Ok(Meta { schema, ..meta })
}
