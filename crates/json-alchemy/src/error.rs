//! Error type shared by every document operation.

use json_alchemy_path::ParseError;
use thiserror::Error;

use crate::node::ProxyKind;

/// A structural or hook validation failure.
///
/// `instance_path` and `schema_path` are JSON Pointers relative to the node
/// `validate` was called on. `keyword` is the schema keyword that failed
/// (`required`, `maxLength`, `validation`, `enumSource`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    pub instance_path: String,
    pub schema_path: String,
    pub keyword: String,
}

#[derive(Debug, Error)]
pub enum Error {
    /// The value has no proxy representation.
    #[error("Type not defined for value: {0}")]
    WrapType(String),

    #[error("$ref '{reference}' is not accessible: {reason}")]
    SchemaResolution { reference: String, reason: String },

    #[error("{0} is immutable")]
    ImmutableMutation(ProxyKind),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("KEY_NOT_FOUND: {0}")]
    KeyNotFound(String),

    #[error("INDEX_OUT_OF_RANGE: {index} (len {len})")]
    IndexOutOfRange { index: isize, len: usize },

    /// A schema names a hook that was never registered.
    #[error("No hook registered under '{name}'")]
    ImportLookup { name: String },

    /// A registered hook reported a failure.
    #[error("{message}")]
    Hook { name: String, message: String },

    #[error("Malformed schema: {0}")]
    MalformedSchema(String),

    /// The structural validator refused to compile the schema.
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Expected {expected}, found {found}")]
    KindMismatch {
        expected: ProxyKind,
        found: ProxyKind,
    },

    #[error("Template error: {0}")]
    Template(String),

    #[error("Invalid query: {0}")]
    Query(#[from] ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;
