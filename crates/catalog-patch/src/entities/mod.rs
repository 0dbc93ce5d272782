//! Entity field tables over the generic builder.

pub mod chart;
pub mod dataset;

pub use chart::{Chart, ChartPatchBuilder, CHART_INFO_ASPECT};
pub use dataset::{
    Dataset, DatasetPatchBuilder, UpstreamInput, DATASET_PROPERTIES_ASPECT,
    EDITABLE_DATASET_PROPERTIES_ASPECT, UPSTREAM_LINEAGE_ASPECT,
};
