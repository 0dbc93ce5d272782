//! Chart patches (`chartInfo` plus the shared ownership/tag/term aspects).

use serde_json::Value;

use crate::builder::{ensure_urn_type, EdgeInput, EntityKind, EntityPatchBuilder};
use crate::error::PatchResult;
use crate::helpers::ContainerPatchHelper;
use crate::records::{to_value, AccessLevel, ChangeAuditStamps, ChartType, Edge};
use crate::urn::{self, Urn};

pub const CHART_INFO_ASPECT: &str = "chartInfo";

const INPUT_EDGES: ContainerPatchHelper = ContainerPatchHelper::new(CHART_INFO_ASPECT, "inputEdges");
const INPUTS: ContainerPatchHelper = ContainerPatchHelper::new(CHART_INFO_ASPECT, "inputs");

#[derive(Debug, Clone, Copy)]
pub struct Chart;

impl EntityKind for Chart {
    const ENTITY_TYPE: &'static str = urn::CHART;
    const PROPERTIES_ASPECT: &'static str = CHART_INFO_ASPECT;
}

/// Patch builder for `urn:li:chart:*` entities.
///
/// # Examples
///
/// ```
/// use catalog_patch::{ChartPatchBuilder, Tag};
///
/// let mut builder = ChartPatchBuilder::new("urn:li:chart:(tool,id1)")?;
/// builder
///     .set_title("Revenue")?
///     .add_tag(&Tag::new("urn:li:tag:pii"))?
///     .remove_owner("urn:li:corpuser:alice", None)?;
///
/// let request = builder.build();
/// assert_eq!(request.entity_urn, "urn:li:chart:(tool,id1)");
/// assert_eq!(request.len(), 3);
/// # Ok::<(), catalog_patch::PatchError>(())
/// ```
pub type ChartPatchBuilder = EntityPatchBuilder<Chart>;

impl EntityPatchBuilder<Chart> {
    /// Required; an empty title is an error rather than a no-op.
    pub fn set_title(&mut self, title: &str) -> PatchResult<&mut Self> {
        self.set_required_str("title", title)
    }

    /// Required; an empty description is an error rather than a no-op.
    pub fn set_description(&mut self, description: &str) -> PatchResult<&mut Self> {
        self.set_required_str("description", description)
    }

    /// Epoch millis; `None` and `0` are skipped.
    pub fn set_last_refreshed(&mut self, last_refreshed: Option<i64>) -> PatchResult<&mut Self> {
        match last_refreshed {
            Some(ts) if ts != 0 => self.set_field("lastRefreshed", Value::from(ts)),
            _ => Ok(self),
        }
    }

    pub fn set_last_modified(&mut self, last_modified: Option<&ChangeAuditStamps>) -> PatchResult<&mut Self> {
        self.set_optional("lastModified", last_modified)
    }

    pub fn set_external_url(&mut self, external_url: Option<&str>) -> PatchResult<&mut Self> {
        self.set_optional_str("externalUrl", external_url)
    }

    pub fn set_chart_url(&mut self, chart_url: Option<&str>) -> PatchResult<&mut Self> {
        self.set_optional_str("chartUrl", chart_url)
    }

    pub fn set_type(&mut self, chart_type: Option<ChartType>) -> PatchResult<&mut Self> {
        self.set_optional("type", chart_type.as_ref())
    }

    pub fn set_access(&mut self, access: Option<AccessLevel>) -> PatchResult<&mut Self> {
        self.set_optional("access", access.as_ref())
    }

    /// Adds a dataset the chart reads from.
    ///
    /// A bare urn or string becomes an edge stamped by the builder's minter;
    /// a full [`Edge`] is stored as given.
    pub fn add_input_edge(&mut self, input: impl Into<EdgeInput>) -> PatchResult<&mut Self> {
        let (target, edge) = self.resolve_edge(input.into(), urn::DATASET, "add_input_edge")?;
        INPUT_EDGES.add_entry(&mut self.ops, &target.to_string(), to_value(&edge)?)?;
        Ok(self)
    }

    pub fn remove_input_edge(&mut self, input: &str) -> PatchResult<&mut Self> {
        INPUT_EDGES.remove_entry(&mut self.ops, input)?;
        Ok(self)
    }

    /// Replaces all input edges.
    pub fn set_input_edges(&mut self, inputs: &[Edge]) -> PatchResult<&mut Self> {
        for edge in inputs {
            ensure_urn_type(&Urn::parse(&edge.destination_urn)?, urn::DATASET, "set_input_edges")?;
        }
        INPUT_EDGES.set_all(&mut self.ops, to_value(&inputs)?)?;
        Ok(self)
    }

    /// Adds plain dataset urns to the legacy `inputs` list.
    ///
    /// Every urn is checked before anything is appended.
    pub fn add_inputs(&mut self, input_urns: &[&str]) -> PatchResult<&mut Self> {
        let mut ops = Vec::with_capacity(input_urns.len());
        for raw in input_urns {
            let target = Urn::parse(raw)?;
            ensure_urn_type(&target, urn::DATASET, "add_inputs")?;
            ops.push(INPUTS.add_op(raw, Value::String(target.to_string())));
        }
        self.ops.extend(ops)?;
        Ok(self)
    }
}
