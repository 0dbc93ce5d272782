//! Generic entity patch builder.
//!
//! One builder type serves every entity kind; a kind only contributes its
//! type qualifier and properties aspect through [`EntityKind`], plus an
//! `impl EntityPatchBuilder<Kind>` block with its field setters.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;

use crate::accumulator::PatchAccumulator;
use crate::audit::{AuditStamp, AuditStampMinter, SystemClock};
use crate::error::{PatchError, PatchResult};
use crate::helpers::{ContainerPatchHelper, CustomPropertiesPatchHelper, OwnershipPatchHelper};
use crate::op::{PatchOpKind, PatchPath};
use crate::records::{to_value, Edge, Owner, OwnershipType, SystemMetadata, Tag, Term};
use crate::request::PatchRequest;
use crate::urn::{self, Urn};

pub const GLOBAL_TAGS_ASPECT: &str = "globalTags";
pub const GLOSSARY_TERMS_ASPECT: &str = "glossaryTerms";

const TAGS: ContainerPatchHelper = ContainerPatchHelper::new(GLOBAL_TAGS_ASPECT, "tags");
const TERMS: ContainerPatchHelper = ContainerPatchHelper::new(GLOSSARY_TERMS_ASPECT, "terms");
const OWNERSHIP: OwnershipPatchHelper = OwnershipPatchHelper::new();

/// Field table of one entity kind.
pub trait EntityKind {
    /// Type qualifier every target urn must carry.
    const ENTITY_TYPE: &'static str;
    /// Aspect holding the entity's scalar fields and `customProperties`.
    const PROPERTIES_ASPECT: &'static str;
}

/// Relationship target as accepted by edge mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeInput {
    /// Used as given, stamps included.
    Edge(Edge),
    /// Wrapped in an edge with freshly minted stamps.
    Urn(Urn),
    /// Parsed, then treated like [`EdgeInput::Urn`].
    Str(String),
}

impl From<Edge> for EdgeInput {
    fn from(edge: Edge) -> Self {
        EdgeInput::Edge(edge)
    }
}

impl From<Urn> for EdgeInput {
    fn from(urn: Urn) -> Self {
        EdgeInput::Urn(urn)
    }
}

impl From<&str> for EdgeInput {
    fn from(s: &str) -> Self {
        EdgeInput::Str(s.to_string())
    }
}

impl From<String> for EdgeInput {
    fn from(s: String) -> Self {
        EdgeInput::Str(s)
    }
}

/// Accumulates patch operations against one entity.
///
/// Every mutation either appends and returns the builder for chaining, or
/// fails and leaves the builder as it was. [`build`](Self::build) only reads,
/// so it can be called again after further mutations.
pub struct EntityPatchBuilder<K> {
    pub(crate) urn: Urn,
    system_metadata: Option<SystemMetadata>,
    audit_header: Option<Value>,
    minter: Arc<dyn AuditStampMinter + Send + Sync>,
    pub(crate) ops: PatchAccumulator,
    kind: PhantomData<K>,
}

impl<K> Clone for EntityPatchBuilder<K> {
    fn clone(&self) -> Self {
        Self {
            urn: self.urn.clone(),
            system_metadata: self.system_metadata.clone(),
            audit_header: self.audit_header.clone(),
            minter: Arc::clone(&self.minter),
            ops: self.ops.clone(),
            kind: PhantomData,
        }
    }
}

impl<K: EntityKind> fmt::Debug for EntityPatchBuilder<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityPatchBuilder")
            .field("entity_type", &K::ENTITY_TYPE)
            .field("urn", &self.urn)
            .field("ops", &self.ops.len())
            .finish_non_exhaustive()
    }
}

pub(crate) fn ensure_urn_type(
    urn: &Urn,
    expected: &'static str,
    context: &'static str,
) -> PatchResult<()> {
    if urn.is_type(expected) {
        return Ok(());
    }
    Err(PatchError::InvalidUrnType {
        urn: urn.to_string(),
        expected,
        found: urn.entity_type().to_string(),
        context,
    })
}

/// Prefixes a bare name with `urn:li:<entity_type>:`; full urns pass through.
pub(crate) fn normalize_urn(value: &str, entity_type: &str, what: &str) -> PatchResult<String> {
    if value.is_empty() {
        return Err(PatchError::invalid_argument(format!("{what} is empty")));
    }
    let prefix = format!("urn:li:{entity_type}:");
    if value.starts_with(&prefix) {
        return Ok(value.to_string());
    }
    Ok(Urn::new(entity_type, value)?.to_string())
}

impl<K: EntityKind> EntityPatchBuilder<K> {
    /// # Errors
    ///
    /// `InvalidIdentifier` if `urn` does not parse or is not a `K::ENTITY_TYPE` urn.
    pub fn new(urn: &str) -> PatchResult<Self> {
        Self::for_urn(Urn::parse(urn)?)
    }

    pub fn for_urn(urn: Urn) -> PatchResult<Self> {
        if !urn.is_type(K::ENTITY_TYPE) {
            return Err(PatchError::invalid_identifier(
                urn.to_string(),
                format!("expected a {} urn, got {}", K::ENTITY_TYPE, urn.entity_type()),
            ));
        }
        Ok(Self {
            urn,
            system_metadata: None,
            audit_header: None,
            minter: Arc::new(SystemClock::default()),
            ops: PatchAccumulator::new(),
            kind: PhantomData,
        })
    }

    pub fn with_system_metadata(mut self, system_metadata: SystemMetadata) -> Self {
        self.system_metadata = Some(system_metadata);
        self
    }

    pub fn with_audit_header(mut self, audit_header: Value) -> Self {
        self.audit_header = Some(audit_header);
        self
    }

    /// Replaces the clock used for stamps on synthesized edges.
    pub fn with_minter(mut self, minter: impl AuditStampMinter + Send + Sync + 'static) -> Self {
        self.minter = Arc::new(minter);
        self
    }

    #[inline]
    pub fn urn(&self) -> &Urn {
        &self.urn
    }

    #[inline]
    pub fn operations(&self) -> &PatchAccumulator {
        &self.ops
    }

    /// Appends a raw operation, for fields without a typed setter.
    pub fn add_patch(
        &mut self,
        aspect_name: &str,
        kind: PatchOpKind,
        path: PatchPath,
        value: Value,
    ) -> PatchResult<&mut Self> {
        self.ops.append(aspect_name, kind, path, value)?;
        Ok(self)
    }

    pub fn add_owner(&mut self, owner: &Owner) -> PatchResult<&mut Self> {
        OWNERSHIP.add_owner(&mut self.ops, owner)?;
        Ok(self)
    }

    /// With `owner_type`, removes only that grant and keeps the owner's others.
    pub fn remove_owner(
        &mut self,
        owner: &str,
        owner_type: Option<OwnershipType>,
    ) -> PatchResult<&mut Self> {
        OWNERSHIP.remove_owner(&mut self.ops, owner, owner_type)?;
        Ok(self)
    }

    /// Replaces all owners.
    pub fn set_owners(&mut self, owners: &[Owner]) -> PatchResult<&mut Self> {
        OWNERSHIP.set_owners(&mut self.ops, owners)?;
        Ok(self)
    }

    pub fn add_tag(&mut self, tag: &Tag) -> PatchResult<&mut Self> {
        TAGS.add_entry(&mut self.ops, &tag.tag, to_value(tag)?)?;
        Ok(self)
    }

    /// Accepts a tag urn or a bare tag name (`pii` means `urn:li:tag:pii`).
    pub fn remove_tag(&mut self, tag: &str) -> PatchResult<&mut Self> {
        let tag = normalize_urn(tag, urn::TAG, "tag")?;
        TAGS.remove_entry(&mut self.ops, &tag)?;
        Ok(self)
    }

    pub fn set_tags(&mut self, tags: &[Tag]) -> PatchResult<&mut Self> {
        if tags.iter().any(|t| t.tag.is_empty()) {
            return Err(PatchError::invalid_argument("tag is empty"));
        }
        TAGS.set_all(&mut self.ops, to_value(&tags)?)?;
        Ok(self)
    }

    pub fn add_term(&mut self, term: &Term) -> PatchResult<&mut Self> {
        TERMS.add_entry(&mut self.ops, &term.urn, to_value(term)?)?;
        Ok(self)
    }

    /// Accepts a term urn or a bare term name.
    pub fn remove_term(&mut self, term: &str) -> PatchResult<&mut Self> {
        let term = normalize_urn(term, urn::GLOSSARY_TERM, "glossary term")?;
        TERMS.remove_entry(&mut self.ops, &term)?;
        Ok(self)
    }

    pub fn set_terms(&mut self, terms: &[Term]) -> PatchResult<&mut Self> {
        if terms.iter().any(|t| t.urn.is_empty()) {
            return Err(PatchError::invalid_argument("glossary term is empty"));
        }
        TERMS.set_all(&mut self.ops, to_value(&terms)?)?;
        Ok(self)
    }

    pub fn add_custom_property(&mut self, key: &str, value: &str) -> PatchResult<&mut Self> {
        CustomPropertiesPatchHelper::new(K::PROPERTIES_ASPECT)
            .add_property(&mut self.ops, key, value)?;
        Ok(self)
    }

    pub fn remove_custom_property(&mut self, key: &str) -> PatchResult<&mut Self> {
        CustomPropertiesPatchHelper::new(K::PROPERTIES_ASPECT)
            .remove_property(&mut self.ops, key)?;
        Ok(self)
    }

    /// Replaces the whole `customProperties` map.
    pub fn set_custom_properties<I, Key, V>(&mut self, properties: I) -> PatchResult<&mut Self>
    where
        I: IntoIterator<Item = (Key, V)>,
        Key: Into<String>,
        V: Into<String>,
    {
        CustomPropertiesPatchHelper::new(K::PROPERTIES_ASPECT)
            .set_properties(&mut self.ops, properties)?;
        Ok(self)
    }

    /// Snapshot of everything accumulated so far.
    pub fn build(&self) -> PatchRequest {
        let aspect_patches = self.ops.materialize();
        tracing::debug!(
            urn = %self.urn,
            aspects = aspect_patches.len(),
            ops = self.ops.len(),
            "build patch request"
        );
        PatchRequest {
            entity_urn: self.urn.to_string(),
            entity_type: K::ENTITY_TYPE.to_string(),
            aspect_patches,
            system_metadata: self.system_metadata.clone(),
            audit_header: self.audit_header.clone(),
        }
    }

    // ── Field helpers for entity modules ──────────────────────────────

    /// `add /<field>` on the properties aspect.
    pub(crate) fn set_field(
        &mut self,
        field: &'static str,
        value: Value,
    ) -> PatchResult<&mut Self> {
        self.ops
            .append(K::PROPERTIES_ASPECT, PatchOpKind::Add, PatchPath::field(field), value)?;
        Ok(self)
    }

    /// Fails with `RequiredField` on an empty string.
    pub(crate) fn set_required_str(
        &mut self,
        field: &'static str,
        value: &str,
    ) -> PatchResult<&mut Self> {
        if value.is_empty() {
            return Err(PatchError::RequiredField { field });
        }
        self.set_field(field, Value::String(value.to_string()))
    }

    /// No-op on `None` or an empty string.
    pub(crate) fn set_optional_str(
        &mut self,
        field: &'static str,
        value: Option<&str>,
    ) -> PatchResult<&mut Self> {
        match value {
            Some(v) if !v.is_empty() => self.set_field(field, Value::String(v.to_string())),
            _ => Ok(self),
        }
    }

    /// No-op on `None`.
    pub(crate) fn set_optional<T: serde::Serialize>(
        &mut self,
        field: &'static str,
        value: Option<&T>,
    ) -> PatchResult<&mut Self> {
        match value {
            Some(v) => {
                let v = to_value(v)?;
                self.set_field(field, v)
            }
            None => Ok(self),
        }
    }

    /// Resolves an edge target and checks its type qualifier.
    ///
    /// Returns the destination urn alongside the edge to store.
    pub(crate) fn resolve_edge(
        &self,
        input: EdgeInput,
        expected: &'static str,
        context: &'static str,
    ) -> PatchResult<(Urn, Edge)> {
        match input {
            EdgeInput::Edge(edge) => {
                let urn = Urn::parse(&edge.destination_urn)?;
                ensure_urn_type(&urn, expected, context)?;
                Ok((urn, edge))
            }
            EdgeInput::Urn(urn) => self.synthesize_edge(urn, expected, context),
            EdgeInput::Str(s) => self.synthesize_edge(Urn::parse(&s)?, expected, context),
        }
    }

    pub(crate) fn mint(&self) -> AuditStamp {
        self.minter.mint()
    }

    fn synthesize_edge(
        &self,
        urn: Urn,
        expected: &'static str,
        context: &'static str,
    ) -> PatchResult<(Urn, Edge)> {
        ensure_urn_type(&urn, expected, context)?;
        tracing::trace!(destination = %urn, "synthesize edge with minted stamps");
        let edge = Edge::new(urn.to_string()).with_stamps(self.mint(), self.mint());
        Ok((urn, edge))
    }
}
