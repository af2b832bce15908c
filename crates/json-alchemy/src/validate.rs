//! Two-phase validation.
//!
//! Phase one walks the tree pre-order and runs the hooks a schema names:
//! `validation` predicates and `enumSource` membership checks. Phase two hands
//! the unwrapped value and its `$ref`-inlined fragment to the `jsonschema`
//! crate (Draft 4). The first failure of either phase is returned.

use json_alchemy_pointer::{format_json_pointer, parse_dotted_path};
use jsonschema::Draft;
use serde_json::Value;

use crate::config::Config;
use crate::error::{Error, Result, ValidationError};
use crate::node::{json_equal, ProxyNode};
use crate::schema::Schema;

impl ProxyNode {
    /// Validate this node and everything below it.
    ///
    /// Mutations are never validated implicitly; call this (or edit through
    /// [`transaction`](ProxyNode::transaction)) to check a document.
    pub fn validate(&self) -> Result<()> {
        let Some(meta) = self.meta() else {
            return Ok(());
        };
        let mut path = Vec::new();
        run_hooks(self, &self.root(), &mut path, &meta.config)?;
        structural(&self.to_json(), &meta.schema, &meta.config)
    }
}

fn run_hooks(node: &ProxyNode, root: &ProxyNode, path: &mut Vec<String>, config: &Config) -> Result<()> {
    if let Some(schema) = node.schema() {
        if let Some(name) = schema.keyword("validation").and_then(Value::as_str) {
            let validator = config.hooks().validator(name)?;
            if let Some(message) = validator(node) {
                return Err(hook_failure(message, path, &schema, "validation"));
            }
        }
        if let Some(source) = schema.keyword("enumSource").and_then(Value::as_str) {
            check_enum_source(node, root, source, path, &schema)?;
        }
    }

    let children = match node {
        ProxyNode::Object(object) => object.entries(),
        ProxyNode::Array(array) => array
            .items()
            .into_iter()
            .enumerate()
            .map(|(index, child)| (index.to_string(), child))
            .collect(),
        _ => return Ok(()),
    };
    for (step, child) in children {
        path.push(step);
        run_hooks(&child, root, path, config)?;
        path.pop();
    }
    Ok(())
}

/// The value must be a member of the current value-set of the node at the
/// dotted path `source`: an array's elements, an object's keys, or a scalar
/// itself.
fn check_enum_source(
    node: &ProxyNode,
    root: &ProxyNode,
    source: &str,
    path: &[String],
    schema: &Schema,
) -> Result<()> {
    let Some(target) = root.find(&parse_dotted_path(source)) else {
        return Err(hook_failure(
            format!("enumSource '{source}' does not exist"),
            path,
            schema,
            "enumSource",
        ));
    };
    let value = node.to_json();
    let allowed: Vec<Value> = match target.to_json() {
        Value::Array(items) => items,
        Value::Object(map) => map.into_iter().map(|(key, _)| Value::String(key)).collect(),
        scalar => vec![scalar],
    };
    if allowed.iter().any(|candidate| json_equal(candidate, &value)) {
        return Ok(());
    }
    Err(hook_failure(
        format!("{value} is not one of the values of '{source}'"),
        path,
        schema,
        "enumSource",
    ))
}

fn hook_failure(message: String, path: &[String], schema: &Schema, keyword: &str) -> Error {
    Error::Validation(ValidationError {
        message,
        instance_path: format_json_pointer(path),
        schema_path: format!("{}/{keyword}", schema.pointer()),
        keyword: keyword.to_string(),
    })
}

/// Check `instance` against `schema` with the `jsonschema` crate.
pub(crate) fn structural(instance: &Value, schema: &Schema, config: &Config) -> Result<()> {
    if schema.is_unconstrained() {
        return Ok(());
    }
    let inlined = schema.inlined(config)?;
    let validator = jsonschema::options()
        .with_draft(Draft::Draft4)
        .with_format("objectid", is_objectid)
        .with_format("uuid", is_uuid)
        .should_validate_formats(true)
        .build(&inlined)
        .map_err(|error| Error::InvalidSchema(error.to_string()))?;

    let result = match validator.iter_errors(instance).next() {
        None => Ok(()),
        Some(error) => {
            let schema_path = error.schema_path.to_string();
            let keyword = schema_path
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string();
            Err(Error::Validation(ValidationError {
                message: error.to_string(),
                instance_path: error.instance_path.to_string(),
                schema_path,
                keyword,
            }))
        }
    };
    result
}

fn objectid_regex() -> &'static regex::Regex {
    use std::sync::OnceLock;
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"^[a-f0-9]{24}$").unwrap())
}

fn uuid_regex() -> &'static regex::Regex {
    use std::sync::OnceLock;
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"^[a-f0-9\-]{36}$").unwrap())
}

fn is_objectid(value: &str) -> bool {
    objectid_regex().is_match(value)
}

fn is_uuid(value: &str) -> bool {
    uuid_regex().is_match(value)
}
