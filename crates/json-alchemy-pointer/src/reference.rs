//! Classification of `$ref` strings.

use crate::{parse_dotted_path, parse_json_pointer, Path, PointerError, MAX_POINTER_LENGTH};

/// Where a `$ref` points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaRef {
    /// `#/a/b` or `#a.b`: a fragment of the document holding the reference.
    Local(Path),
    /// Anything else: a document to fetch, optionally narrowed by a fragment
    /// written after `#`.
    Remote { url: String, fragment: Path },
}

impl SchemaRef {
    /// Parse the value of a `$ref` key.
    ///
    /// A fragment starting with `/` is read as a JSON Pointer, anything else
    /// as a dotted path.
    ///
    /// ```
    /// use json_alchemy_pointer::SchemaRef;
    ///
    /// assert_eq!(
    ///     SchemaRef::parse("#/definitions/name").unwrap(),
    ///     SchemaRef::Local(vec!["definitions".into(), "name".into()]),
    /// );
    /// assert_eq!(
    ///     SchemaRef::parse("#definitions.name").unwrap(),
    ///     SchemaRef::Local(vec!["definitions".into(), "name".into()]),
    /// );
    /// assert_eq!(
    ///     SchemaRef::parse("http://example.com/s.json#/x").unwrap(),
    ///     SchemaRef::Remote { url: "http://example.com/s.json".into(), fragment: vec!["x".into()] },
    /// );
    /// ```
    pub fn parse(reference: &str) -> Result<SchemaRef, PointerError> {
        if reference.is_empty() {
            return Err(PointerError::EmptyReference);
        }
        if reference.len() > MAX_POINTER_LENGTH {
            return Err(PointerError::PointerTooLong);
        }
        match reference.split_once('#') {
            Some(("", fragment)) => Ok(SchemaRef::Local(parse_fragment(fragment))),
            Some((url, fragment)) => Ok(SchemaRef::Remote {
                url: url.to_string(),
                fragment: parse_fragment(fragment),
            }),
            None => Ok(SchemaRef::Remote {
                url: reference.to_string(),
                fragment: Vec::new(),
            }),
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, SchemaRef::Local(_))
    }
}

fn parse_fragment(fragment: &str) -> Path {
    if fragment.starts_with('/') {
        parse_json_pointer(fragment)
    } else {
        parse_dotted_path(fragment)
    }
}
