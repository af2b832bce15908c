//! Path-query search over a proxy tree.

use std::rc::Rc;

use json_alchemy_path::{QueryEval, QueryParser};
use serde_json::{json, Value};
use tracing::trace;

use crate::config::Config;
use crate::error::Result;
use crate::node::{ArrayProxy, Meta, ProxyNode};
use crate::schema::{Inliner, Schema};

impl ProxyNode {
    /// Evaluate a path query against this node.
    ///
    /// The matched nodes are collected as they are, without re-wrapping, into
    /// a new array whose schema is positional: item `i` is the schema of
    /// match `i` (with its `$ref`s inlined), or `{}` for booleans and null.
    ///
    /// ```
    /// use json_alchemy::{ProxyNode, Schema};
    /// use serde_json::json;
    ///
    /// let doc = ProxyNode::new(
    ///     json!({"authors": [{"name": "Ellis"}, {"name": "Higgs"}]}),
    ///     Schema::empty(),
    /// )
    /// .unwrap();
    /// let names = doc.search("$.authors[*].name").unwrap();
    /// assert_eq!(names, json!(["Ellis", "Higgs"]));
    /// ```
    pub fn search(&self, query: &str) -> Result<ArrayProxy> {
        let parsed = QueryParser::parse(query)?;
        let matches = QueryEval::eval_nodes(&parsed, self);
        trace!(query, matches = matches.len(), "search");

        let config = self
            .config()
            .unwrap_or_else(|| Rc::new(Config::default()));
        let mut inliner = Inliner::new(&config);
        let mut items = Vec::with_capacity(matches.len());
        for node in &matches {
            let schema = match node.meta() {
                Some(meta) => inliner.inline(&meta.schema)?,
                None => json!({}),
            };
            items.push(schema);
        }
        let mut schema = json!({"type": "array", "items": Value::Array(items)});
        let definitions = inliner.into_definitions();
        if !definitions.is_empty() {
            schema["definitions"] = Value::Object(definitions);
        }
        let schema = Schema::new(schema);
        Ok(ArrayProxy::from_nodes(matches, Meta::detached(schema, config)))
    }
}
