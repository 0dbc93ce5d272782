//! Patch operations and the paths they address.
//!
//! A [`PatchPath`] keeps raw segments; quoting happens once, when the path is
//! rendered as a pointer. Callers never pre-quote keys.

use std::fmt;

use catalog_patch_pointer::{format_pointer, parse_pointer, validate_path, validate_pointer};
use serde_json::{json, Map, Value};

use crate::error::{PatchError, PatchResult};

/// Value carried by `remove` operations.
pub fn empty_marker() -> Value {
    Value::Object(Map::new())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchOpKind {
    Add,
    Remove,
    Replace,
}

impl PatchOpKind {
    pub fn op_name(&self) -> &'static str {
        match self {
            PatchOpKind::Add => "add",
            PatchOpKind::Remove => "remove",
            PatchOpKind::Replace => "replace",
        }
    }

    pub fn from_name(name: &str) -> PatchResult<Self> {
        match name {
            "add" => Ok(PatchOpKind::Add),
            "remove" => Ok(PatchOpKind::Remove),
            "replace" => Ok(PatchOpKind::Replace),
            other => Err(PatchError::invalid_argument(format!("unknown op: {other}"))),
        }
    }
}

impl fmt::Display for PatchOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.op_name())
    }
}

/// A location inside an aspect, first segment being the field name.
///
/// # Examples
///
/// ```
/// use catalog_patch::PatchPath;
///
/// let path = PatchPath::field("owners").key("urn:li:corpuser:a/b").key("TECHNICAL_OWNER");
/// assert_eq!(path.to_pointer(), "/owners/urn:li:corpuser:a~1b/TECHNICAL_OWNER");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PatchPath(Vec<String>);

impl PatchPath {
    /// Path to a whole field.
    #[inline]
    pub fn field(name: impl Into<String>) -> Self {
        Self(vec![name.into()])
    }

    /// Append a key segment (builder pattern).
    #[inline]
    pub fn key(mut self, k: impl Into<String>) -> Self {
        self.0.push(k.into());
        self
    }

    #[inline]
    pub fn from_segments(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Parses a pointer such as `/customProperties/a~1b`.
    pub fn parse(pointer: &str) -> PatchResult<Self> {
        validate_pointer(pointer).map_err(|e| PatchError::invalid_path(format!("{pointer:?}: {e}")))?;
        Ok(Self(parse_pointer(pointer)))
    }

    #[inline]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// The leading field name, if any.
    #[inline]
    pub fn field_name(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Renders the path with every segment quoted.
    pub fn to_pointer(&self) -> String {
        format_pointer(&self.0)
    }
}

impl fmt::Display for PatchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_pointer())
    }
}

/// One add/remove/replace instruction within an aspect.
///
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchOp {
    aspect_name: String,
    kind: PatchOpKind,
    path: PatchPath,
    value: Value,
}

impl PatchOp {
    /// # Errors
    ///
    /// `InvalidPath` if the aspect name or path is empty, the leading field
    /// name is empty, or the path is deeper or its pointer longer than the
    /// codec allows.
    pub fn new(
        aspect_name: impl Into<String>,
        kind: PatchOpKind,
        path: PatchPath,
        value: Value,
    ) -> PatchResult<Self> {
        let aspect_name = aspect_name.into();
        if aspect_name.is_empty() {
            return Err(PatchError::invalid_path("aspect name is empty"));
        }
        match path.field_name() {
            None => return Err(PatchError::invalid_path(format!("{aspect_name}: path is empty"))),
            Some("") => {
                return Err(PatchError::invalid_path(format!(
                    "{aspect_name}: path must start with a field name"
                )))
            }
            Some(_) => {}
        }
        validate_path(path.segments())
            .map_err(|e| PatchError::invalid_path(format!("{aspect_name}{path}: {e}")))?;
        Ok(Self {
            aspect_name,
            kind,
            path,
            value,
        })
    }

    #[inline]
    pub fn aspect_name(&self) -> &str {
        &self.aspect_name
    }

    #[inline]
    pub fn kind(&self) -> PatchOpKind {
        self.kind
    }

    #[inline]
    pub fn path(&self) -> &PatchPath {
        &self.path
    }

    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Wire form: `{"op": .., "path": .., "value": ..}`.
    pub fn to_json(&self) -> Value {
        json!({
            "op": self.kind.op_name(),
            "path": self.path.to_pointer(),
            "value": self.value
        })
    }
}
