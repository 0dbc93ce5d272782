//! Policies that turn a domain intent into patch operations on one container
//! field of one aspect.
//!
//! Helpers hold no state beyond the aspect and field they manage; the
//! accumulator they write to is passed in per call.

pub mod container;
pub mod custom_properties;
pub mod ownership;
pub mod schema_field;

pub use container::ContainerPatchHelper;
pub use custom_properties::CustomPropertiesPatchHelper;
pub use ownership::OwnershipPatchHelper;
pub use schema_field::SchemaFieldPatchHelper;
