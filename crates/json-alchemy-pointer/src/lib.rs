//! JSON Pointer (RFC 6901) and dotted-path utilities.
//!
//! Schema documents address fragments in two notations: JSON Pointers
//! (`/definitions/address`) and dotted paths (`definitions.address`). Both
//! parse into the same [`Path`] of unescaped components, which [`get`] then
//! follows through a `serde_json::Value`. [`SchemaRef`] classifies the string
//! found under a `$ref` key into a local or a remote reference.
//!
//! # Example
//!
//! ```
//! use json_alchemy_pointer::{get, parse_json_pointer, parse_dotted_path};
//! use serde_json::json;
//!
//! let doc = json!({"definitions": {"name": {"type": "string"}}});
//!
//! let by_pointer = get(&doc, &parse_json_pointer("/definitions/name"));
//! let by_dots = get(&doc, &parse_dotted_path("definitions.name"));
//! assert_eq!(by_pointer, Some(&json!({"type": "string"})));
//! assert_eq!(by_pointer, by_dots);
//! ```

use serde_json::Value;
use thiserror::Error;

mod dotted;
pub use dotted::{format_dotted_path, parse_dotted_path};

mod reference;
pub use reference::SchemaRef;

/// A step in a path. Array indices are kept in their decimal string form.
pub type PathStep = String;

/// A parsed path: a JSON Pointer or dotted path split into components.
pub type Path = Vec<PathStep>;

/// Maximum accepted length of a pointer or `$ref` string.
const MAX_POINTER_LENGTH: usize = 1024;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PointerError {
    #[error("POINTER_TOO_LONG")]
    PointerTooLong,
    #[error("EMPTY_REFERENCE")]
    EmptyReference,
}

/// Unescapes a JSON Pointer path component.
///
/// Per RFC 6901, `~1` is replaced with `/` and `~0` is replaced with `~`.
///
/// ```
/// use json_alchemy_pointer::unescape_component;
///
/// assert_eq!(unescape_component("a~0b"), "a~b");
/// assert_eq!(unescape_component("c~1d"), "c/d");
/// ```
pub fn unescape_component(component: &str) -> String {
    if !component.contains('~') {
        return component.to_string();
    }
    // ~1 before ~0, otherwise "~01" would decode to "/"
    component.replace("~1", "/").replace("~0", "~")
}

/// Escapes a JSON Pointer path component.
///
/// ```
/// use json_alchemy_pointer::escape_component;
///
/// assert_eq!(escape_component("a~b"), "a~0b");
/// assert_eq!(escape_component("c/d"), "c~1d");
/// ```
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    component.replace('~', "~0").replace('/', "~1")
}

/// Parse a JSON Pointer string into path components.
///
/// The empty string is the root. A leading `/` is stripped when present
/// (without it the first component is kept) and every component is
/// unescaped.
///
/// ```
/// use json_alchemy_pointer::parse_json_pointer;
///
/// assert_eq!(parse_json_pointer(""), Vec::<String>::new());
/// assert_eq!(parse_json_pointer("/"), vec![""]);
/// assert_eq!(parse_json_pointer("/items/0"), vec!["items", "0"]);
/// ```
pub fn parse_json_pointer(pointer: &str) -> Path {
    if pointer.is_empty() {
        return Vec::new();
    }
    let body = pointer.strip_prefix('/').unwrap_or(pointer);
    body.split('/').map(unescape_component).collect()
}

/// Format path components into a JSON Pointer string.
///
/// ```
/// use json_alchemy_pointer::format_json_pointer;
///
/// assert_eq!(format_json_pointer(&[]), "");
/// assert_eq!(format_json_pointer(&["a/b".to_string(), "0".to_string()]), "/a~1b/0");
/// ```
pub fn format_json_pointer(path: &[String]) -> String {
    let mut out = String::new();
    for component in path {
        out.push('/');
        out.push_str(&escape_component(component));
    }
    out
}

/// Check if a string is a canonical non-negative array index (no sign, no
/// leading zeros).
pub fn is_valid_index(index: &str) -> bool {
    if index.is_empty() {
        return false;
    }
    let bytes = index.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(|&b| b.is_ascii_digit())
}

/// Get a value from a JSON document by path.
///
/// Returns `None` if any step is missing or walks into a scalar.
///
/// ```
/// use json_alchemy_pointer::get;
/// use serde_json::json;
///
/// let doc = json!({"items": [{"type": "integer"}, {"type": "string"}]});
/// let val = get(&doc, &["items".to_string(), "1".to_string()]);
/// assert_eq!(val, Some(&json!({"type": "string"})));
/// assert_eq!(get(&doc, &["missing".to_string()]), None);
/// ```
pub fn get<'a>(val: &'a Value, path: &[String]) -> Option<&'a Value> {
    let mut current = val;
    for step in path {
        match current {
            Value::Array(arr) => {
                if !is_valid_index(step) {
                    return None;
                }
                let idx: usize = step.parse().ok()?;
                current = arr.get(idx)?;
            }
            Value::Object(map) => {
                current = map.get(step)?;
            }
            _ => return None,
        }
    }
    Some(current)
}
