//! Dotted paths (`authors.0.family_name`).
//!
//! Used by schema hooks (`watch`, `enumSource`) and by `$ref` fragments that
//! are not written as JSON Pointers. A dotted path has no escaping: keys that
//! contain `.` can only be addressed with a JSON Pointer.

use crate::Path;

/// Parse a dotted path into components. The empty string is the root.
///
/// ```
/// use json_alchemy_pointer::parse_dotted_path;
///
/// assert_eq!(parse_dotted_path(""), Vec::<String>::new());
/// assert_eq!(parse_dotted_path("authors.0.name"), vec!["authors", "0", "name"]);
/// ```
pub fn parse_dotted_path(path: &str) -> Path {
    if path.is_empty() {
        return Vec::new();
    }
    path.split('.').map(str::to_string).collect()
}

/// Join path components with `.`.
pub fn format_dotted_path(path: &[String]) -> String {
    path.join(".")
}
