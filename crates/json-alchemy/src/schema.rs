//! Schema fragments and `$ref` resolution.
//!
//! A [`Schema`] is a handle on a shared schema document plus the path of one
//! fragment inside it. Deriving a child fragment extends the path, so threading
//! schemas down a tree of proxies never copies schema JSON.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::LazyLock;

use json_alchemy_pointer::{format_json_pointer, get, SchemaRef};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};

static UNCONSTRAINED: LazyLock<Value> = LazyLock::new(|| Value::Object(Map::new()));

/// Keywords whose values are instance data, never subschemas.
const LITERAL_KEYWORDS: &[&str] = &["enum", "const", "default", "examples"];

/// Keywords whose values map arbitrary names to subschemas.
const SCHEMA_MAP_KEYWORDS: &[&str] = &[
    "properties",
    "patternProperties",
    "definitions",
    "dependencies",
];

/// A JSON-Schema fragment.
#[derive(Clone)]
pub struct Schema {
    document: Rc<Value>,
    path: Rc<[String]>,
}

impl Schema {
    /// The whole of `document` as a fragment.
    pub fn new(document: Value) -> Self {
        Self {
            document: Rc::new(document),
            path: Rc::from(Vec::new()),
        }
    }

    /// The empty mapping: every value is accepted.
    pub fn empty() -> Self {
        Self::new(Value::Object(Map::new()))
    }

    /// Parse a schema document from JSON text.
    ///
    /// ```
    /// use json_alchemy::{Error, Schema};
    ///
    /// assert!(Schema::parse(r#"{"type": "object"}"#).is_ok());
    /// assert!(matches!(Schema::parse(r#"{"type": "object""#), Err(Error::MalformedSchema(_))));
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map(Self::new)
            .map_err(|e| Error::MalformedSchema(e.to_string()))
    }

    /// The JSON this handle points at. A path that no longer exists in the
    /// document reads as the empty mapping.
    pub fn fragment(&self) -> &Value {
        get(&self.document, &self.path).unwrap_or(&*UNCONSTRAINED)
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    /// JSON Pointer of the fragment inside its document.
    pub fn pointer(&self) -> String {
        format_json_pointer(&self.path)
    }

    pub fn keyword(&self, name: &str) -> Option<&Value> {
        self.fragment().get(name)
    }

    pub fn description(&self) -> Option<&str> {
        self.keyword("description").and_then(Value::as_str)
    }

    pub fn is_unconstrained(&self) -> bool {
        self.fragment().as_object().is_some_and(Map::is_empty)
    }

    /// Fragment for the value stored under `key` of an object.
    pub fn property(&self, key: &str) -> Schema {
        match self.keyword("properties").and_then(|p| p.get(key)) {
            Some(_) => self.descend(&["properties", key]),
            None => Schema::empty(),
        }
    }

    /// Fragment for position `index` of an array.
    ///
    /// Uniform `items` apply to every position. Positional `items` apply by
    /// index and leave positions past their length unconstrained.
    pub fn item(&self, index: usize) -> Schema {
        match self.keyword("items") {
            Some(Value::Array(items)) if index < items.len() => {
                self.descend(&["items", index.to_string().as_str()])
            }
            Some(Value::Array(_)) | None => Schema::empty(),
            Some(_) => self.descend(&["items"]),
        }
    }

    fn descend(&self, steps: &[&str]) -> Schema {
        let mut path = self.path.to_vec();
        path.extend(steps.iter().map(|s| s.to_string()));
        Schema {
            document: Rc::clone(&self.document),
            path: Rc::from(path),
        }
    }

    fn reference(&self) -> Option<&str> {
        self.keyword("$ref").and_then(Value::as_str)
    }

    /// Follow `$ref` until a fragment without one is reached.
    pub fn resolve(&self, config: &Config) -> Result<Schema> {
        let mut current = self.clone();
        let mut seen: Vec<String> = Vec::new();
        while let Some(reference) = current.reference() {
            if seen.iter().any(|r| r == reference) {
                return Err(Error::SchemaResolution {
                    reference: reference.to_string(),
                    reason: "reference cycle".into(),
                });
            }
            seen.push(reference.to_string());
            current = current.follow(reference, config)?;
        }
        Ok(current)
    }

    /// One step of `$ref` resolution relative to this fragment's document.
    fn follow(&self, reference: &str, config: &Config) -> Result<Schema> {
        let inaccessible = |reason: &str| Error::SchemaResolution {
            reference: reference.to_string(),
            reason: reason.to_string(),
        };

        match SchemaRef::parse(reference).map_err(|e| inaccessible(&e.to_string()))? {
            SchemaRef::Local(path) => {
                if path.is_empty() {
                    return Err(inaccessible("empty fragment"));
                }
                if get(&self.document, &path).is_none() {
                    return Err(inaccessible("no such fragment"));
                }
                debug!(reference, "resolved local $ref");
                Ok(Schema {
                    document: Rc::clone(&self.document),
                    path: Rc::from(path),
                })
            }
            SchemaRef::Remote { url, fragment } => {
                let Some(document) = config.remote_document(&url) else {
                    return Ok(Schema::empty());
                };
                if get(&document, &fragment).is_none() {
                    warn!(reference, "remote $ref fragment missing, treating as unconstrained");
                    return Ok(Schema::empty());
                }
                debug!(reference, "resolved remote $ref");
                Ok(Schema {
                    document,
                    path: Rc::from(fragment),
                })
            }
        }
    }

    /// The fragment with every nested `$ref` replaced by its target, as a
    /// standalone schema for the validator. Recursive references are kept as
    /// references into a `definitions` table placed next to the inlined body.
    pub(crate) fn inlined(&self, config: &Config) -> Result<Value> {
        let mut inliner = Inliner::new(config);
        let body = inliner.inline(self)?;
        let definitions = inliner.into_definitions();
        if definitions.is_empty() {
            return Ok(body);
        }
        Ok(json!({"definitions": definitions, "allOf": [body]}))
    }

    /// Where this fragment lives: document identity plus pointer.
    fn identity(&self) -> String {
        format!("{:p}{}", Rc::as_ptr(&self.document), self.pointer())
    }
}

/// Inlines `$ref`s of one or more fragments into a single schema document.
///
/// A reference to a fragment that is already being inlined becomes
/// `{"$ref": "#/definitions/refN"}`; the fragment's inlined body is recorded
/// under that name and must be placed at `/definitions` of the root document
/// that embeds the inlined values.
pub(crate) struct Inliner<'a> {
    config: &'a Config,
    active: Vec<String>,
    names: HashMap<String, String>,
    definitions: Map<String, Value>,
}

impl<'a> Inliner<'a> {
    pub(crate) fn new(config: &'a Config) -> Self {
        Self {
            config,
            active: Vec::new(),
            names: HashMap::new(),
            definitions: Map::new(),
        }
    }

    pub(crate) fn inline(&mut self, schema: &Schema) -> Result<Value> {
        self.enter(schema)
    }

    pub(crate) fn into_definitions(self) -> Map<String, Value> {
        self.definitions
    }

    fn enter(&mut self, target: &Schema) -> Result<Value> {
        let identity = target.identity();
        if self.active.contains(&identity) {
            let next = self.names.len();
            let name = self
                .names
                .entry(identity)
                .or_insert_with(|| format!("ref{next}"));
            return Ok(json!({"$ref": format!("#/definitions/{name}")}));
        }
        self.active.push(identity);
        let body = self.schema(target, target.fragment());
        let identity = self.active.pop().unwrap_or_default();
        let body = body?;
        if let Some(name) = self.names.get(&identity) {
            self.definitions
                .entry(name.clone())
                .or_insert_with(|| body.clone());
        }
        Ok(body)
    }

    /// `value` sits where a schema (or a list of schemas) is expected.
    fn schema(&mut self, owner: &Schema, value: &Value) -> Result<Value> {
        match value {
            Value::Object(map) => {
                if let Some(reference) = map.get("$ref").and_then(Value::as_str) {
                    let target = owner.follow(reference, self.config)?;
                    return self.enter(&target);
                }
                let mut out = Map::with_capacity(map.len());
                for (key, child) in map {
                    let child = if LITERAL_KEYWORDS.contains(&key.as_str()) {
                        child.clone()
                    } else if SCHEMA_MAP_KEYWORDS.contains(&key.as_str()) {
                        self.schema_map(owner, child)?
                    } else {
                        self.schema(owner, child)?
                    };
                    out.insert(key.clone(), child);
                }
                Ok(Value::Object(out))
            }
            Value::Array(items) => items
                .iter()
                .map(|item| self.schema(owner, item))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            other => Ok(other.clone()),
        }
    }

    /// `value` maps names to schemas; its keys are never keywords.
    fn schema_map(&mut self, owner: &Schema, value: &Value) -> Result<Value> {
        match value {
            Value::Object(map) => {
                let mut out = Map::with_capacity(map.len());
                for (name, child) in map {
                    out.insert(name.clone(), self.schema(owner, child)?);
                }
                Ok(Value::Object(out))
            }
            other => self.schema(owner, other),
        }
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Value> for Schema {
    fn from(document: Value) -> Self {
        Self::new(document)
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.fragment() == other.fragment()
    }
}

impl PartialEq<Value> for Schema {
    fn eq(&self, other: &Value) -> bool {
        self.fragment() == other
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("pointer", &self.pointer())
            .field("fragment", self.fragment())
            .finish()
    }
}
