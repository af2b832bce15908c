//! Transactional edits.
//!
//! # Terminology
//!
//! - `base`: the committed node the caller holds.
//! - `draft`: a detached copy rebuilt from the base's JSON, edited freely.
//!
//! A draft only reaches the base when the edit closure succeeds and the
//! draft validates. The commit moves the draft's children into the base's
//! storage, so the base keeps its identity and every handle on it sees the
//! new state.

use tracing::debug;

use crate::error::{Error, Result};
use crate::node::{NodeInput, ProxyNode};
use crate::wrap::wrap_with;

impl ProxyNode {
    /// Replace this container's contents with `other`'s, in place.
    ///
    /// `other`'s children are moved (leaving it empty) and relinked so their
    /// parent is this node and their root is this node's root. Leaves and
    /// passthrough values are immutable.
    pub fn update(&self, other: &ProxyNode) -> Result<()> {
        match (self, other) {
            (ProxyNode::Object(base), ProxyNode::Object(source)) => {
                base.adopt(source);
                Ok(())
            }
            (ProxyNode::Array(base), ProxyNode::Array(source)) => {
                base.adopt(source);
                Ok(())
            }
            (ProxyNode::Object(_) | ProxyNode::Array(_), _) => Err(Error::KindMismatch {
                expected: self.kind(),
                found: other.kind(),
            }),
            _ => Err(Error::ImmutableMutation(self.kind())),
        }
    }

    /// Edit a draft of this node and commit it atomically.
    ///
    /// The draft has this node's schema, configuration and root/parent
    /// lookups but shares no storage with it. When `edit` returns `Ok`, the
    /// draft is validated and, if valid, committed with [`update`]. When
    /// `edit` fails or validation fails, the error is returned and this node
    /// is left as it was.
    ///
    /// ```
    /// use json_alchemy::{ProxyNode, Schema};
    /// use serde_json::json;
    ///
    /// let schema = Schema::new(json!({
    ///     "type": "object",
    ///     "properties": {"a": {"type": "integer", "maximum": 10}}
    /// }));
    /// let doc = ProxyNode::new(json!({"a": 1}), schema).unwrap();
    ///
    /// assert!(doc.transaction(|draft| draft.set("a", 999)).is_err());
    /// assert_eq!(doc, json!({"a": 1}));
    ///
    /// doc.transaction(|draft| draft.set("a", 5)).unwrap();
    /// assert_eq!(doc, json!({"a": 5}));
    /// ```
    ///
    /// [`update`]: ProxyNode::update
    pub fn transaction<R>(&self, edit: impl FnOnce(&ProxyNode) -> Result<R>) -> Result<R> {
        let meta = match self {
            ProxyNode::Object(_) | ProxyNode::Array(_) => self.meta(),
            _ => None,
        };
        let Some(meta) = meta else {
            return Err(Error::ImmutableMutation(self.kind()));
        };
        let pointer = meta.schema.pointer();
        let draft = wrap_with(NodeInput::Raw(self.to_json()), meta)?;

        let output = match edit(&draft) {
            Ok(output) => output,
            Err(error) => {
                debug!(%pointer, %error, "transaction aborted by edit");
                return Err(error);
            }
        };
        if let Err(error) = draft.validate() {
            debug!(%pointer, %error, "transaction rolled back");
            return Err(error);
        }
        self.update(&draft)?;
        debug!(%pointer, "transaction committed");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ProxyKind;
    use crate::schema::Schema;
    use serde_json::json;

    fn bounded() -> Schema {
        Schema::new(json!({
            "type": "object",
            "properties": {"a": {"type": "integer", "maximum": 10}}
        }))
    }

    #[test]
    fn test_commit_keeps_identity() {
        let doc = ProxyNode::new(json!({"a": 1}), bounded()).unwrap();
        let alias = doc.clone();
        let returned = doc
            .transaction(|draft| {
                draft.set("a", 5)?;
                draft.set("b", "new")?;
                Ok("done")
            })
            .unwrap();
        assert_eq!(returned, "done");
        assert_eq!(alias, json!({"a": 5, "b": "new"}));
        assert!(alias.same_node(&doc));
    }

    #[test]
    fn test_invalid_draft_is_discarded() {
        let doc = ProxyNode::new(json!({"a": 1}), bounded()).unwrap();
        let result = doc.transaction(|draft| draft.set("a", 999));
        assert!(matches!(result, Err(Error::Validation(ref e)) if e.keyword == "maximum"));
        assert_eq!(doc, json!({"a": 1}));
    }

    #[test]
    fn test_edit_error_skips_validation_and_commit() {
        let doc = ProxyNode::new(json!({"a": 1}), bounded()).unwrap();
        let result: Result<()> = doc.transaction(|draft| {
            draft.set("a", 2)?;
            draft.get("missing")?;
            Ok(())
        });
        assert!(matches!(result, Err(Error::KeyNotFound(_))));
        assert_eq!(doc, json!({"a": 1}));
    }

    #[test]
    fn test_draft_is_detached() {
        let doc = ProxyNode::new(json!({"a": 1}), bounded()).unwrap();
        doc.transaction(|draft| {
            draft.set("a", 3)?;
            assert_eq!(doc, json!({"a": 1}));
            assert!(!draft.same_node(&doc));
            assert_eq!(draft.schema(), doc.schema());
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_committed_children_link_into_base() {
        let doc = ProxyNode::new(json!({"outer": {"inner": {"x": 1}}}), Schema::empty()).unwrap();
        let outer = doc.get("outer").unwrap();
        outer
            .transaction(|draft| draft.get("inner")?.set("x", 2))
            .unwrap();
        let inner = outer.get("inner").unwrap();
        assert_eq!(inner, json!({"x": 2}));
        assert!(inner.parent().same_node(&outer));
        assert!(inner.root().same_node(&doc));
        assert!(inner.get("x").unwrap().root().same_node(&doc));
    }

    #[test]
    fn test_array_transaction() {
        let schema = Schema::new(json!({"type": "array", "items": {"type": "string"}}));
        let doc = ProxyNode::new(json!(["a"]), schema).unwrap();
        doc.transaction(|draft| draft.array()?.append("b")).unwrap();
        assert_eq!(doc, json!(["a", "b"]));
        assert!(doc.transaction(|draft| draft.array()?.append(1)).is_err());
        assert_eq!(doc, json!(["a", "b"]));
    }

    #[test]
    fn test_leaves_refuse() {
        let doc = ProxyNode::new(json!({"s": "x", "n": 1.5, "i": 1, "b": true}), Schema::empty())
            .unwrap();
        for key in ["s", "n", "i", "b"] {
            let leaf = doc.get(key).unwrap();
            let before = leaf.to_json();
            assert!(matches!(
                leaf.transaction(|_| Ok(())),
                Err(Error::ImmutableMutation(_))
            ));
            assert!(matches!(leaf.update(&leaf), Err(Error::ImmutableMutation(_))));
            assert_eq!(leaf, before);
        }
    }

    #[test]
    fn test_update_kind_mismatch() {
        let object = ProxyNode::new(json!({}), Schema::empty()).unwrap();
        let array = ProxyNode::new(json!([]), Schema::empty()).unwrap();
        assert!(matches!(
            object.update(&array),
            Err(Error::KindMismatch {
                expected: ProxyKind::Object,
                found: ProxyKind::Array
            })
        ));
    }
}
