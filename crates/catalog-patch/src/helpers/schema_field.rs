use serde_json::Value;

use crate::accumulator::PatchAccumulator;
use crate::error::{PatchError, PatchResult};
use crate::op::{empty_marker, PatchOpKind, PatchPath};
use crate::records::{to_value, Tag, Term};

use super::ContainerPatchHelper;

pub const EDITABLE_SCHEMA_METADATA_ASPECT: &str = "editableSchemaMetadata";

/// Per-column documentation, tags and terms in `editableSchemaMetadata`.
///
/// Fields are keyed by their field path, so a column `address/zip` lands at
/// `/editableSchemaFieldInfo/address~1zip/...`.
#[derive(Debug, Clone, Copy)]
pub struct SchemaFieldPatchHelper {
    fields: ContainerPatchHelper,
}

impl Default for SchemaFieldPatchHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaFieldPatchHelper {
    pub const fn new() -> Self {
        Self {
            fields: ContainerPatchHelper::new(
                EDITABLE_SCHEMA_METADATA_ASPECT,
                "editableSchemaFieldInfo",
            ),
        }
    }

    fn append(
        &self,
        acc: &mut PatchAccumulator,
        kind: PatchOpKind,
        path: PatchPath,
        value: Value,
    ) -> PatchResult<()> {
        acc.append(EDITABLE_SCHEMA_METADATA_ASPECT, kind, path, value)
    }

    /// `/editableSchemaFieldInfo/<field_path>/<container>/<list>`
    fn list_path(&self, field_path: &str, container: &str, list: &str) -> PatchResult<PatchPath> {
        Ok(self.fields.entry_path(field_path)?.key(container).key(list))
    }

    /// `add /editableSchemaFieldInfo/<field_path>/description`
    pub fn set_description(
        &self,
        acc: &mut PatchAccumulator,
        field_path: &str,
        description: &str,
    ) -> PatchResult<()> {
        let path = self.fields.entry_path(field_path)?.key("description");
        self.append(acc, PatchOpKind::Add, path, Value::String(description.to_string()))
    }

    /// `add /editableSchemaFieldInfo/<field_path>/globalTags/tags/<tag>`
    pub fn add_tag(
        &self,
        acc: &mut PatchAccumulator,
        field_path: &str,
        tag: &Tag,
    ) -> PatchResult<()> {
        if tag.tag.is_empty() {
            return Err(PatchError::invalid_argument("tag is empty"));
        }
        let path = self.list_path(field_path, "globalTags", "tags")?.key(tag.tag.as_str());
        self.append(acc, PatchOpKind::Add, path, to_value(tag)?)
    }

    pub fn remove_tag(
        &self,
        acc: &mut PatchAccumulator,
        field_path: &str,
        tag: &str,
    ) -> PatchResult<()> {
        if tag.is_empty() {
            return Err(PatchError::invalid_argument("tag is empty"));
        }
        let path = self.list_path(field_path, "globalTags", "tags")?.key(tag);
        self.append(acc, PatchOpKind::Remove, path, empty_marker())
    }

    pub fn set_tags(
        &self,
        acc: &mut PatchAccumulator,
        field_path: &str,
        tags: &[Tag],
    ) -> PatchResult<()> {
        if tags.iter().any(|t| t.tag.is_empty()) {
            return Err(PatchError::invalid_argument("tag is empty"));
        }
        let path = self.list_path(field_path, "globalTags", "tags")?;
        self.append(acc, PatchOpKind::Add, path, to_value(&tags)?)
    }

    /// `add /editableSchemaFieldInfo/<field_path>/glossaryTerms/terms/<term>`
    pub fn add_term(
        &self,
        acc: &mut PatchAccumulator,
        field_path: &str,
        term: &Term,
    ) -> PatchResult<()> {
        if term.urn.is_empty() {
            return Err(PatchError::invalid_argument("glossary term is empty"));
        }
        let path = self
            .list_path(field_path, "glossaryTerms", "terms")?
            .key(term.urn.as_str());
        self.append(acc, PatchOpKind::Add, path, to_value(term)?)
    }

    pub fn remove_term(
        &self,
        acc: &mut PatchAccumulator,
        field_path: &str,
        term: &str,
    ) -> PatchResult<()> {
        if term.is_empty() {
            return Err(PatchError::invalid_argument("glossary term is empty"));
        }
        let path = self.list_path(field_path, "glossaryTerms", "terms")?.key(term);
        self.append(acc, PatchOpKind::Remove, path, empty_marker())
    }

    pub fn set_terms(
        &self,
        acc: &mut PatchAccumulator,
        field_path: &str,
        terms: &[Term],
    ) -> PatchResult<()> {
        if terms.iter().any(|t| t.urn.is_empty()) {
            return Err(PatchError::invalid_argument("glossary term is empty"));
        }
        let path = self.list_path(field_path, "glossaryTerms", "terms")?;
        self.append(acc, PatchOpKind::Add, path, to_value(&terms)?)
    }
}
