//! Path segment codec for catalog patch paths.
//!
//! Patch paths use JSON Pointer (RFC 6901) syntax: segments joined by `/`,
//! with `~` and `/` inside a segment escaped as `~0` and `~1`. Identifiers
//! such as `urn:li:dataset:(urn:li:dataPlatform:hive,db/tbl,PROD)` routinely
//! contain `/`, so every map or set key must go through [`quote`] before it
//! becomes part of a path.
//!
//! # Example
//!
//! ```
//! use catalog_patch_pointer::{format_pointer, parse_pointer, quote};
//!
//! assert_eq!(quote("a/b"), "a~1b");
//!
//! let path = vec!["owners".to_string(), "urn:li:corpuser:a/b".to_string()];
//! let pointer = format_pointer(&path);
//! assert_eq!(pointer, "/owners/urn:li:corpuser:a~1b");
//! assert_eq!(parse_pointer(&pointer), path);
//! ```

pub mod validate;
pub use validate::{
    validate_path, validate_pointer, ValidationError, MAX_PATH_DEPTH, MAX_POINTER_LENGTH,
};

/// Separator between path segments.
pub const SEPARATOR: char = '/';

/// Quotes a single path segment.
///
/// `~` is replaced with `~0` first, then `/` with `~1`. The empty string is a
/// valid segment and quotes to itself; `"/owners/"` addresses the key `""`.
///
/// # Example
///
/// ```
/// use catalog_patch_pointer::quote;
///
/// assert_eq!(quote("a~b"), "a~0b");
/// assert_eq!(quote("c/d"), "c~1d");
/// assert_eq!(quote("~1"), "~01");
/// assert_eq!(quote(""), "");
/// ```
pub fn quote(segment: &str) -> String {
    if !segment.contains(SEPARATOR) && !segment.contains('~') {
        return segment.to_string();
    }
    // ~ before /, otherwise the ~ of a fresh ~1 would be escaped again
    segment.replace('~', "~0").replace(SEPARATOR, "~1")
}

/// Reverses [`quote`].
///
/// # Example
///
/// ```
/// use catalog_patch_pointer::unquote;
///
/// assert_eq!(unquote("a~0b"), "a~b");
/// assert_eq!(unquote("c~1d"), "c/d");
/// assert_eq!(unquote("~01"), "~1");
/// ```
pub fn unquote(segment: &str) -> String {
    if !segment.contains('~') {
        return segment.to_string();
    }
    segment.replace("~1", "/").replace("~0", "~")
}

/// Formats raw segments into a pointer string, quoting each one.
///
/// Returns an empty string for the root (no segments).
///
/// # Example
///
/// ```
/// use catalog_patch_pointer::format_pointer;
///
/// assert_eq!(format_pointer::<&str>(&[]), "");
/// assert_eq!(format_pointer(&["title".to_string()]), "/title");
/// assert_eq!(
///     format_pointer(&["tags".to_string(), "a/b".to_string()]),
///     "/tags/a~1b"
/// );
/// ```
pub fn format_pointer<S: AsRef<str>>(path: &[S]) -> String {
    let mut out = String::new();
    for segment in path {
        out.push(SEPARATOR);
        out.push_str(&quote(segment.as_ref()));
    }
    out
}

/// Parses a pointer string into raw (unquoted) segments.
///
/// - Empty string returns no segments
/// - The leading `/` is stripped
/// - Each segment is unquoted
///
/// # Example
///
/// ```
/// use catalog_patch_pointer::parse_pointer;
///
/// assert_eq!(parse_pointer(""), Vec::<String>::new());
/// assert_eq!(parse_pointer("/"), vec![""]);
/// assert_eq!(parse_pointer("/owners/a~1b/TECHNICAL_OWNER"), vec!["owners", "a/b", "TECHNICAL_OWNER"]);
/// ```
pub fn parse_pointer(pointer: &str) -> Vec<String> {
    match pointer.strip_prefix(SEPARATOR) {
        Some(rest) => rest.split(SEPARATOR).map(unquote).collect(),
        None if pointer.is_empty() => Vec::new(),
        // Relative pointers are read as if they were absolute.
        None => pointer.split(SEPARATOR).map(unquote).collect(),
    }
}
