//! Value records carried by patch operations.
//!
//! Field names serialize in camelCase and enums in SCREAMING_SNAKE_CASE, the
//! shapes the catalog expects inside an aspect.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::audit::AuditStamp;
use crate::error::{PatchError, PatchResult};

pub(crate) fn to_value<T: Serialize>(record: &T) -> PatchResult<Value> {
    serde_json::to_value(record)
        .map_err(|e| PatchError::invalid_argument(format!("unserializable value: {e}")))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OwnershipType {
    TechnicalOwner,
    BusinessOwner,
    DataSteward,
    None,
    Dataowner,
    Producer,
    Developer,
    Consumer,
    Delegate,
    Stakeholder,
}

impl OwnershipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OwnershipType::TechnicalOwner => "TECHNICAL_OWNER",
            OwnershipType::BusinessOwner => "BUSINESS_OWNER",
            OwnershipType::DataSteward => "DATA_STEWARD",
            OwnershipType::None => "NONE",
            OwnershipType::Dataowner => "DATAOWNER",
            OwnershipType::Producer => "PRODUCER",
            OwnershipType::Developer => "DEVELOPER",
            OwnershipType::Consumer => "CONSUMER",
            OwnershipType::Delegate => "DELEGATE",
            OwnershipType::Stakeholder => "STAKEHOLDER",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub owner: String,
    #[serde(rename = "type")]
    pub owner_type: OwnershipType,
}

impl Owner {
    pub fn new(owner: impl Into<String>, owner_type: OwnershipType) -> Self {
        Self {
            owner: owner.into(),
            owner_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Tag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            context: None,
        }
    }
}

/// Glossary term association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub urn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Term {
    pub fn new(urn: impl Into<String>) -> Self {
        Self {
            urn: urn.into(),
            context: None,
        }
    }
}

/// A timestamped relationship to another entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub destination_urn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<AuditStamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<AuditStamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, String>>,
}

impl Edge {
    pub fn new(destination_urn: impl Into<String>) -> Self {
        Self {
            destination_urn: destination_urn.into(),
            created: None,
            last_modified: None,
            properties: None,
        }
    }

    pub fn with_stamps(mut self, created: AuditStamp, last_modified: AuditStamp) -> Self {
        self.created = Some(created);
        self.last_modified = Some(last_modified);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeAuditStamps {
    pub created: AuditStamp,
    pub last_modified: AuditStamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<AuditStamp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeStamp {
    pub time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DatasetLineageType {
    Copy,
    Transformed,
    View,
}

/// One upstream dataset in a lineage aspect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Upstream {
    pub dataset: String,
    #[serde(rename = "type")]
    pub lineage_type: DatasetLineageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_stamp: Option<AuditStamp>,
}

impl Upstream {
    pub fn new(dataset: impl Into<String>, lineage_type: DatasetLineageType) -> Self {
        Self {
            dataset: dataset.into(),
            lineage_type,
            audit_stamp: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FineGrainedLineageUpstreamType {
    FieldSet,
    Dataset,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FineGrainedLineageDownstreamType {
    Field,
    FieldSet,
}

/// Column-level lineage: which upstream columns feed which downstream ones.
///
/// `upstreams` and `downstreams` hold schema field urns (or dataset urns for
/// [`FineGrainedLineageUpstreamType::Dataset`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FineGrainedLineage {
    pub upstream_type: FineGrainedLineageUpstreamType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstreams: Option<Vec<String>>,
    pub downstream_type: FineGrainedLineageDownstreamType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downstreams: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform_operation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f32>,
}

impl FineGrainedLineage {
    /// Upstream columns feeding one downstream column.
    pub fn field(downstream: impl Into<String>, upstreams: Vec<String>) -> Self {
        Self {
            upstream_type: FineGrainedLineageUpstreamType::FieldSet,
            upstreams: Some(upstreams),
            downstream_type: FineGrainedLineageDownstreamType::Field,
            downstreams: Some(vec![downstream.into()]),
            transform_operation: None,
            confidence_score: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChartType {
    Bar,
    Pie,
    Scatter,
    Table,
    Text,
    Line,
    Area,
    Histogram,
    BoxPlot,
    WordCloud,
    Cohort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessLevel {
    Public,
    Private,
}

/// Ingestion bookkeeping forwarded untouched with every aspect patch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_observed: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, String>>,
}
