//! Ordered collection of patch operations for one entity.

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::PatchResult;
use crate::op::{PatchOp, PatchOpKind, PatchPath};

/// Aspect name to its operations, in first-appearance order.
pub type AspectPatches = IndexMap<String, Vec<PatchOp>>;

/// Insertion-ordered operations.
///
/// Nothing is deduplicated: two writes to the same path are both kept and
/// the receiver replays them in order.
#[derive(Debug, Clone, Default)]
pub struct PatchAccumulator {
    ops: Vec<PatchOp>,
}

impl PatchAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and appends one operation.
    pub fn append(
        &mut self,
        aspect_name: &str,
        kind: PatchOpKind,
        path: PatchPath,
        value: Value,
    ) -> PatchResult<()> {
        let op = PatchOp::new(aspect_name, kind, path, value)?;
        self.push(op);
        Ok(())
    }

    pub fn push(&mut self, op: PatchOp) {
        tracing::debug!(
            aspect = op.aspect_name(),
            op = op.kind().op_name(),
            path = %op.path(),
            "append patch op"
        );
        self.ops.push(op);
    }

    /// Appends every operation or none of them.
    pub fn extend<I>(&mut self, ops: I) -> PatchResult<()>
    where
        I: IntoIterator<Item = PatchResult<PatchOp>>,
    {
        let ops = ops.into_iter().collect::<PatchResult<Vec<_>>>()?;
        for op in ops {
            self.push(op);
        }
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatchOp> {
        self.ops.iter()
    }

    /// Groups the current operations by aspect.
    ///
    /// Pure read; later appends show up in later calls.
    pub fn materialize(&self) -> AspectPatches {
        let mut grouped = AspectPatches::new();
        for op in &self.ops {
            grouped
                .entry(op.aspect_name().to_string())
                .or_default()
                .push(op.clone());
        }
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PatchError;
    use serde_json::json;

    fn paths(grouped: &AspectPatches, aspect: &str) -> Vec<String> {
        grouped[aspect]
            .iter()
            .map(|op| format!("{} {}", op.kind(), op.path()))
            .collect()
    }

    #[test]
    fn groups_by_first_appearance() {
        let mut acc = PatchAccumulator::new();
        acc.append("ownership", PatchOpKind::Add, PatchPath::field("owners").key("a"), json!({}))
            .unwrap();
        acc.append("chartInfo", PatchOpKind::Add, PatchPath::field("title"), json!("t"))
            .unwrap();
        acc.append("ownership", PatchOpKind::Remove, PatchPath::field("owners").key("b"), json!({}))
            .unwrap();

        let grouped = acc.materialize();
        assert_eq!(grouped.keys().collect::<Vec<_>>(), vec!["ownership", "chartInfo"]);
        assert_eq!(paths(&grouped, "ownership"), vec!["add /owners/a", "remove /owners/b"]);
    }

    #[test]
    fn same_path_is_not_collapsed() {
        let mut acc = PatchAccumulator::new();
        let path = PatchPath::field("customProperties").key("k1");
        acc.append("chartInfo", PatchOpKind::Add, path.clone(), json!("v1")).unwrap();
        acc.append("chartInfo", PatchOpKind::Remove, path, json!({})).unwrap();
        assert_eq!(
            paths(&acc.materialize(), "chartInfo"),
            vec!["add /customProperties/k1", "remove /customProperties/k1"]
        );
    }

    #[test]
    fn materialize_is_repeatable_and_live() {
        let mut acc = PatchAccumulator::new();
        acc.append("chartInfo", PatchOpKind::Add, PatchPath::field("title"), json!("a"))
            .unwrap();
        assert_eq!(acc.materialize(), acc.materialize());
        acc.append("chartInfo", PatchOpKind::Add, PatchPath::field("description"), json!("b"))
            .unwrap();
        assert_eq!(acc.materialize()["chartInfo"].len(), 2);
        assert_eq!(acc.len(), 2);
    }

    #[test]
    fn failed_append_leaves_state_alone() {
        let mut acc = PatchAccumulator::new();
        let err = acc
            .append("", PatchOpKind::Add, PatchPath::field("title"), json!("a"))
            .unwrap_err();
        assert!(matches!(err, PatchError::InvalidPath(_)));
        assert!(acc.is_empty());
    }

    #[test]
    fn extend_is_all_or_nothing() {
        let mut acc = PatchAccumulator::new();
        let result = acc.extend(vec![
            PatchOp::new("chartInfo", PatchOpKind::Add, PatchPath::field("inputs").key("a"), json!("a")),
            PatchOp::new("chartInfo", PatchOpKind::Add, PatchPath::default(), json!("b")),
        ]);
        assert!(result.is_err());
        assert!(acc.is_empty());
    }
}
