//! Limits on patch paths.
//!
//! The catalog stores a patch as JSON text and resolves each path against
//! an aspect document, so a path has to be absolute and stay within a size
//! the receiver accepts. Depth is counted in raw segments; length is counted
//! on the quoted pointer, which is what goes over the wire.

use thiserror::Error;

/// Longest rendered pointer, in bytes.
pub const MAX_POINTER_LENGTH: usize = 1024;

/// Deepest path, in segments.
pub const MAX_PATH_DEPTH: usize = 256;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("pointer must start with '/'")]
    NotAbsolute,
    #[error("pointer is {len} bytes, limit is {}", MAX_POINTER_LENGTH)]
    PointerTooLong { len: usize },
    #[error("path has {depth} segments, limit is {}", MAX_PATH_DEPTH)]
    PathTooDeep { depth: usize },
}

/// Checks a pointer read back from text, e.g. a raw patch from a caller.
///
/// `""` addresses the whole aspect and is accepted.
///
/// # Example
///
/// ```
/// use catalog_patch_pointer::validate_pointer;
///
/// validate_pointer("").unwrap();
/// validate_pointer("/owners/urn:li:corpuser:jdoe").unwrap();
/// validate_pointer("owners").unwrap_err();
/// ```
pub fn validate_pointer(pointer: &str) -> Result<(), ValidationError> {
    if pointer.is_empty() {
        return Ok(());
    }
    if !pointer.starts_with('/') {
        return Err(ValidationError::NotAbsolute);
    }
    if pointer.len() > MAX_POINTER_LENGTH {
        return Err(ValidationError::PointerTooLong { len: pointer.len() });
    }
    Ok(())
}

/// Checks raw segments before they are rendered.
///
/// Both the depth and the length of the quoted pointer are bounded; a
/// segment full of `/` grows by one byte per slash once quoted.
pub fn validate_path<S: AsRef<str>>(path: &[S]) -> Result<(), ValidationError> {
    if path.len() > MAX_PATH_DEPTH {
        return Err(ValidationError::PathTooDeep { depth: path.len() });
    }
    let len: usize = path.iter().map(|s| 1 + quoted_len(s.as_ref())).sum();
    if len > MAX_POINTER_LENGTH {
        return Err(ValidationError::PointerTooLong { len });
    }
    Ok(())
}

fn quoted_len(segment: &str) -> usize {
    segment.len() + segment.bytes().filter(|b| matches!(b, b'~' | b'/')).count()
}
