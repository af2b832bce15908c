//! Path queries over JSON-shaped trees.
//!
//! A small JSONPath dialect: member access (`.name`, `['name']`), indices
//! (`[0]`, `[-1]`), slices (`[1:3]`, `[::-1]`), wildcards (`*`, `[*]`), unions
//! (`[0,2]`) and recursive descent (`..name`). The leading `$` is optional, so
//! `authors[*].family_name` and `$.authors[*].family_name` are the same query.
//!
//! The evaluator is generic over [`PathNode`], which is implemented here for
//! `&serde_json::Value` and by downstream crates for their own node handles.
//!
//! # Example
//!
//! ```
//! use json_alchemy_path::{QueryEval, QueryParser};
//! use serde_json::json;
//!
//! let doc = json!({
//!     "authors": [
//!         {"family_name": "Higgs"},
//!         {"family_name": "Englert"}
//!     ]
//! });
//!
//! let query = QueryParser::parse("authors[*].family_name").unwrap();
//! let names: Vec<_> = QueryEval::eval_nodes(&query, &&doc);
//! assert_eq!(names, vec![&json!("Higgs"), &json!("Englert")]);
//! ```

mod types;
pub use types::*;

mod parser;
pub use parser::{ParseError, QueryParser};

mod eval;
pub use eval::{slice_indices, QueryEval};

mod node;
pub use node::PathNode;
