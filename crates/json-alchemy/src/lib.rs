//! json-alchemy: a schema-aware live JSON document model.
//!
//! Every value of a document is wrapped in a typed [`ProxyNode`] that carries
//! its JSON-Schema fragment next to the data. Objects and arrays thread the
//! right fragment down to each child (including positional `items`), `$ref`s
//! are resolved when a node is built, and every node can reach its parent and
//! the top of its tree through non-owning links.
//!
//! Mutations are never validated implicitly. Call [`ProxyNode::validate`], or
//! edit through [`ProxyNode::transaction`], which validates a detached draft
//! and commits it only when it is valid.
//!
//! Schemas may also declare derived fields: `getter` and `setter` name hooks
//! registered on a [`HookRegistry`], and `template` + `watch` render a string
//! from other values of the tree.
//!
//! # Example
//!
//! ```
//! use json_alchemy::{Error, ProxyNode, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::new(json!({
//!     "type": "object",
//!     "properties": {"name": {"type": "string", "maxLength": 3}},
//!     "required": ["name"]
//! }));
//!
//! let doc = ProxyNode::new(json!({}), schema).unwrap();
//! assert!(matches!(doc.validate(), Err(Error::Validation(_))));
//!
//! doc.set("name", "Bob").unwrap();
//! assert!(doc.validate().is_ok());
//!
//! let result = doc.transaction(|draft| draft.set("name", "Robert"));
//! assert!(result.is_err());
//! assert_eq!(doc.get("name").unwrap(), "Bob");
//! ```

pub mod config;
mod derived;
mod error;
mod node;
mod schema;
mod search;
mod transaction;
mod validate;
pub mod wrap;

pub use config::{
    Callbacks, Config, FetchError, HandlebarsRenderer, HookRegistry, HttpFetcher, SchemaFetcher,
    TemplateRenderer,
};
pub use error::{Error, Result, ValidationError};
pub use node::{
    ArrayProxy, IntegerProxy, LeafProxy, LeafValue, NodeInput, NumberProxy, ObjectProxy, ProxyKind,
    ProxyNode, StringProxy,
};
pub use schema::Schema;
pub use wrap::wrap;
