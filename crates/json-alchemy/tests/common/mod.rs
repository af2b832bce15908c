#![allow(dead_code)]

use std::rc::Rc;

use json_alchemy::{Config, FetchError, HookRegistry, ProxyNode, Schema};
use serde_json::{json, Value};

pub const AUTHOR: &str = "Smith, J.";

/// A single optional string field and nothing else.
pub fn simple() -> Schema {
    Schema::new(json!({
        "type": "object",
        "properties": {"my_field": {"type": "string"}},
        "additionalProperties": false
    }))
}

pub fn required_field() -> Schema {
    Schema::new(json!({
        "type": "object",
        "properties": {
            "identifier": {"type": "integer"},
            "my_field": {"type": "string"}
        },
        "required": ["identifier"]
    }))
}

pub fn list() -> Schema {
    Schema::new(json!({"type": "array", "items": {"type": "string"}}))
}

/// Records with authors; given names must start with an uppercase letter.
pub fn complex() -> Schema {
    Schema::new(json!({
        "title": "Complex record",
        "type": "object",
        "definitions": {
            "name": {"type": "string"}
        },
        "properties": {
            "authors": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "family_name": {"$ref": "#/definitions/name"},
                        "given_name": {
                            "type": "string",
                            "validation": "fortests.helpers.is_correct_name"
                        }
                    }
                }
            }
        }
    }))
}

/// Street address as a positional tuple: number, name, street type,
/// direction.
pub fn items_in_list() -> Schema {
    Schema::new(json!({
        "type": "array",
        "items": [
            {"type": "number"},
            {"type": "string"},
            {"type": "string", "enum": ["Street", "Avenue", "Boulevard"]},
            {"type": "string", "enum": ["NW", "NE", "SW", "SE"]}
        ]
    }))
}

pub fn items_in_list_complex() -> Schema {
    Schema::new(json!({
        "type": "array",
        "items": [
            {"type": "number"},
            {"type": "string"},
            {"type": "object", "properties": {"my_field": {"type": "string"}}},
            {"type": "array", "items": {"type": "number"}}
        ]
    }))
}

pub fn multiple_types() -> Schema {
    Schema::new(json!({
        "type": "object",
        "properties": {
            "idontknowthetype": {
                "type": "array",
                "items": {
                    "type": ["array", "object"],
                    "minItems": 1,
                    "required": ["foo"]
                }
            }
        }
    }))
}

pub fn template() -> Schema {
    Schema::new(json!({
        "type": "object",
        "properties": {
            "first_name": {"type": "string"},
            "last_name": {"type": "string"},
            "full_name": {
                "type": "string",
                "template": "{{first}} {{last}}",
                "watch": {"first": "first_name", "last": "last_name"}
            }
        }
    }))
}

pub fn calculated_dict() -> Value {
    json!({
        "title": "Test calculated fields in a dictionary",
        "type": "object",
        "properties": {
            "author": {
                "type": "string",
                "getter": "fortests.helpers.author",
                "setter": "fortests.helpers.raise_error"
            }
        }
    })
}

pub fn record_hooks() -> HookRegistry {
    let mut hooks = HookRegistry::new();
    hooks
        .register_getter("fortests.helpers.author", |_| Ok(json!(AUTHOR)))
        .register_getter("fortests.helpers.schema_title", |node| {
            let schema = node.root().schema().ok_or("root has no schema")?;
            Ok(schema.keyword("title").cloned().unwrap_or(Value::Null))
        })
        .register_setter("fortests.helpers.raise_error", |_, key, _| {
            Err(format!("We can't process {key}"))
        })
        .register_validator("fortests.helpers.is_correct_name", |node| {
            let starts_upper = node
                .as_str()
                .and_then(|name| name.chars().next())
                .is_some_and(char::is_uppercase);
            (!starts_upper).then(|| "The author name doesn't start with an uppercase.".to_string())
        });
    hooks
}

/// A fetcher serving `{"type": "string"}` from `http://www.json.com` and
/// failing everything else with a 500.
pub fn fake_remote(url: &str) -> Result<Value, FetchError> {
    match url {
        "http://www.json.com" => Ok(json!({"type": "string"})),
        _ => Err(FetchError::Status {
            status: 500,
            url: url.to_string(),
        }),
    }
}

pub fn config() -> Rc<Config> {
    Rc::new(Config::new().with_hooks(record_hooks()).with_fetcher(fake_remote))
}

pub fn doc(value: Value, schema: Schema) -> ProxyNode {
    ProxyNode::with_config(value, schema, config())
        .unwrap_or_else(|e| panic!("failed to wrap document: {e}"))
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
