use serde_json::Value;

use crate::accumulator::PatchAccumulator;
use crate::error::{PatchError, PatchResult};
use crate::op::{empty_marker, PatchOp, PatchOpKind, PatchPath};

/// Keyed container (map, set, or edge list keyed by destination) inside an aspect.
///
/// `add_entry`/`remove_entry` ask the receiver to merge one entry;
/// `set_all` asks it to replace the whole container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerPatchHelper {
    aspect: &'static str,
    field: &'static str,
}

impl ContainerPatchHelper {
    pub const fn new(aspect: &'static str, field: &'static str) -> Self {
        Self { aspect, field }
    }

    #[inline]
    pub fn aspect(&self) -> &'static str {
        self.aspect
    }

    #[inline]
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// `<field>/<key>`, rejecting an empty key.
    pub fn entry_path(&self, key: &str) -> PatchResult<PatchPath> {
        if key.is_empty() {
            return Err(PatchError::invalid_argument(format!(
                "{}.{}: entry key is empty",
                self.aspect, self.field
            )));
        }
        Ok(PatchPath::field(self.field).key(key))
    }

    /// Builds the `add` operation without appending it.
    pub fn add_op(&self, key: &str, value: Value) -> PatchResult<PatchOp> {
        PatchOp::new(self.aspect, PatchOpKind::Add, self.entry_path(key)?, value)
    }

    pub fn remove_op(&self, key: &str) -> PatchResult<PatchOp> {
        PatchOp::new(
            self.aspect,
            PatchOpKind::Remove,
            self.entry_path(key)?,
            empty_marker(),
        )
    }

    pub fn add_entry(&self, acc: &mut PatchAccumulator, key: &str, value: Value) -> PatchResult<()> {
        acc.push(self.add_op(key, value)?);
        Ok(())
    }

    pub fn remove_entry(&self, acc: &mut PatchAccumulator, key: &str) -> PatchResult<()> {
        acc.push(self.remove_op(key)?);
        Ok(())
    }

    /// One `add` at the bare field whose value is the whole collection.
    pub fn set_all(&self, acc: &mut PatchAccumulator, entries: Value) -> PatchResult<()> {
        acc.append(self.aspect, PatchOpKind::Add, PatchPath::field(self.field), entries)
    }
}
