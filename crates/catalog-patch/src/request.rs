//! The finished, aspect-grouped patch batch and its JSON forms.

use serde_json::{json, Map, Value};

use crate::accumulator::AspectPatches;
use crate::error::PatchResult;
use crate::op::PatchOp;
use crate::records::{to_value, SystemMetadata};

/// Content type of an aspect value holding a JSON Patch document.
pub const PATCH_CONTENT_TYPE: &str = "application/json-patch+json";

pub const PATCH_CHANGE_TYPE: &str = "PATCH";

#[derive(Debug, Clone, PartialEq)]
pub struct PatchRequest {
    pub entity_urn: String,
    pub entity_type: String,
    pub aspect_patches: AspectPatches,
    pub system_metadata: Option<SystemMetadata>,
    pub audit_header: Option<Value>,
}

fn ops_to_json(ops: &[PatchOp]) -> Value {
    Value::Array(ops.iter().map(PatchOp::to_json).collect())
}

impl PatchRequest {
    /// Total number of operations across all aspects.
    pub fn len(&self) -> usize {
        self.aspect_patches.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Operations for one aspect, in append order.
    pub fn aspect(&self, aspect_name: &str) -> Option<&[PatchOp]> {
        self.aspect_patches.get(aspect_name).map(Vec::as_slice)
    }

    /// All operations, aspect by aspect.
    pub fn ops(&self) -> impl Iterator<Item = &PatchOp> {
        self.aspect_patches.values().flatten()
    }

    fn metadata_json(&self) -> PatchResult<Option<Value>> {
        self.system_metadata.as_ref().map(to_value).transpose()
    }

    /// The whole request as one JSON object.
    pub fn to_json(&self) -> PatchResult<Value> {
        let mut aspects = Map::new();
        for (name, ops) in &self.aspect_patches {
            aspects.insert(name.clone(), ops_to_json(ops));
        }
        let mut m = Map::new();
        m.insert("entityUrn".into(), json!(self.entity_urn));
        m.insert("entityType".into(), json!(self.entity_type));
        m.insert("aspectPatches".into(), Value::Object(aspects));
        if let Some(sm) = self.metadata_json()? {
            m.insert("systemMetadata".into(), sm);
        }
        if let Some(h) = &self.audit_header {
            m.insert("auditHeader".into(), h.clone());
        }
        Ok(Value::Object(m))
    }

    /// One change proposal per aspect; the aspect value is the JSON text of
    /// its operation array.
    pub fn to_proposals(&self) -> PatchResult<Vec<Value>> {
        let system_metadata = self.metadata_json()?;
        let mut out = Vec::with_capacity(self.aspect_patches.len());
        for (name, ops) in &self.aspect_patches {
            let mut m = Map::new();
            m.insert("entityType".into(), json!(self.entity_type));
            m.insert("entityUrn".into(), json!(self.entity_urn));
            m.insert("changeType".into(), json!(PATCH_CHANGE_TYPE));
            m.insert("aspectName".into(), json!(name));
            m.insert(
                "aspect".into(),
                json!({
                    "value": ops_to_json(ops).to_string(),
                    "contentType": PATCH_CONTENT_TYPE
                }),
            );
            if let Some(sm) = &system_metadata {
                m.insert("systemMetadata".into(), sm.clone());
            }
            if let Some(h) = &self.audit_header {
                m.insert("auditHeader".into(), h.clone());
            }
            out.push(Value::Object(m));
        }
        Ok(out)
    }
}
