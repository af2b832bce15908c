//! Schema-declared derived fields.
//!
//! A property whose schema names a `getter` is computed on every read; one
//! with `template` + `watch` is rendered from values found elsewhere in the
//! tree. A `setter` takes over writes to its property entirely.

use std::rc::Rc;

use json_alchemy_pointer::parse_dotted_path;
use serde_json::{Map, Value};
use tracing::trace;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::node::{Meta, NodeInput, ObjectProxy, ProxyNode};
use crate::wrap::wrap_with;

/// Run the getter registered under `name` and wrap its result with `meta`.
pub(crate) fn computed(object: &ObjectProxy, name: &str, meta: Meta) -> Result<ProxyNode> {
    let getter = meta.config.hooks().getter(name)?;
    trace!(getter = name, "computing derived field");
    let value = getter(&ProxyNode::Object(object.clone())).map_err(|message| Error::Hook {
        name: name.to_string(),
        message,
    })?;
    wrap_with(NodeInput::Raw(value), meta)
}

/// Render `template` with each placeholder of `watch` bound to the value at
/// its dotted path from the root. Paths that lead nowhere bind to null.
pub(crate) fn rendered(
    object: &ObjectProxy,
    template: &str,
    watch: &Map<String, Value>,
    meta: Meta,
) -> Result<ProxyNode> {
    let root = object.root();
    let mut values = Map::with_capacity(watch.len());
    for (placeholder, path) in watch {
        let value = path
            .as_str()
            .and_then(|path| root.find(&parse_dotted_path(path)))
            .map_or(Value::Null, |node| node.to_json());
        values.insert(placeholder.clone(), value);
    }
    let text = meta
        .config
        .renderer()
        .render(template, &values)
        .map_err(Error::Template)?;
    wrap_with(NodeInput::Raw(Value::String(text)), meta)
}

/// Hand a write of `key` to the setter registered under `name`.
pub(crate) fn assign(
    object: &ObjectProxy,
    name: &str,
    key: &str,
    input: NodeInput,
    config: &Rc<Config>,
) -> Result<()> {
    let setter = config.hooks().setter(name)?;
    let value = input.into_json()?;
    setter(object, key, value).map_err(|message| Error::Hook {
        name: name.to_string(),
        message,
    })
}
