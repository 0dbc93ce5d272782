//! Partial-update ("patch") builders for metadata catalog entities.
//!
//! A builder collects add/remove/replace operations against named aspects of
//! one entity and hands them over as an aspect-grouped [`PatchRequest`].
//! Nothing is sent anywhere; transport is the caller's concern.
//!
//! # Example
//!
//! ```
//! use catalog_patch::{ChartPatchBuilder, Owner, OwnershipType, Tag};
//!
//! let mut chart = ChartPatchBuilder::new("urn:li:chart:(looker,sales.7)")?;
//! chart
//!     .set_title("Revenue")?
//!     .add_owner(&Owner::new("urn:li:corpuser:jdoe", OwnershipType::TechnicalOwner))?
//!     .add_tag(&Tag::new("urn:li:tag:finance"))?;
//!
//! let request = chart.build();
//! let aspects: Vec<_> = request.aspect_patches.keys().map(String::as_str).collect();
//! assert_eq!(aspects, ["chartInfo", "ownership", "globalTags"]);
//! # Ok::<(), catalog_patch::PatchError>(())
//! ```

pub mod accumulator;
pub mod audit;
pub mod builder;
pub mod entities;
pub mod error;
pub mod helpers;
pub mod op;
pub mod records;
pub mod request;
pub mod urn;

pub use accumulator::{AspectPatches, PatchAccumulator};
pub use audit::{AuditStamp, AuditStampMinter, FixedClock, SystemClock};
pub use builder::{EdgeInput, EntityKind, EntityPatchBuilder};
pub use entities::{Chart, ChartPatchBuilder, Dataset, DatasetPatchBuilder, UpstreamInput};
pub use error::{PatchError, PatchResult};
pub use op::{PatchOp, PatchOpKind, PatchPath};
pub use records::{
    AccessLevel, ChangeAuditStamps, ChartType, DatasetLineageType, Edge, FineGrainedLineage,
    FineGrainedLineageDownstreamType, FineGrainedLineageUpstreamType, Owner, OwnershipType,
    SystemMetadata, Tag, Term, TimeStamp, Upstream,
};
pub use request::PatchRequest;
pub use urn::{Urn, UrnError};
