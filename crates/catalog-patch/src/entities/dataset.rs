//! Dataset patches: `datasetProperties`, `editableDatasetProperties`,
//! `upstreamLineage` (table and column level) and per-column
//! `editableSchemaMetadata`.

use serde_json::Value;

use crate::builder::{ensure_urn_type, normalize_urn, EntityKind, EntityPatchBuilder};
use crate::error::{PatchError, PatchResult};
use crate::helpers::{ContainerPatchHelper, SchemaFieldPatchHelper};
use crate::op::{PatchOpKind, PatchPath};
use crate::records::{
    to_value, DatasetLineageType, FineGrainedLineage, Tag, Term, TimeStamp, Upstream,
};
use crate::urn::{self, Urn};

pub const DATASET_PROPERTIES_ASPECT: &str = "datasetProperties";
pub const EDITABLE_DATASET_PROPERTIES_ASPECT: &str = "editableDatasetProperties";
pub const UPSTREAM_LINEAGE_ASPECT: &str = "upstreamLineage";

const UPSTREAMS: ContainerPatchHelper =
    ContainerPatchHelper::new(UPSTREAM_LINEAGE_ASPECT, "upstreams");
const FINE_GRAINED_LINEAGES: ContainerPatchHelper =
    ContainerPatchHelper::new(UPSTREAM_LINEAGE_ASPECT, "fineGrainedLineages");
const SCHEMA_FIELDS: SchemaFieldPatchHelper = SchemaFieldPatchHelper::new();

#[derive(Debug, Clone, Copy)]
pub struct Dataset;

impl EntityKind for Dataset {
    const ENTITY_TYPE: &'static str = urn::DATASET;
    const PROPERTIES_ASPECT: &'static str = DATASET_PROPERTIES_ASPECT;
}

pub type DatasetPatchBuilder = EntityPatchBuilder<Dataset>;

/// Upstream dataset as accepted by [`DatasetPatchBuilder::add_upstream`].
///
/// A bare urn or string becomes a `TRANSFORMED` upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamInput {
    Upstream(Upstream),
    Urn(Urn),
    Str(String),
}

impl From<Upstream> for UpstreamInput {
    fn from(upstream: Upstream) -> Self {
        UpstreamInput::Upstream(upstream)
    }
}

impl From<&Upstream> for UpstreamInput {
    fn from(upstream: &Upstream) -> Self {
        UpstreamInput::Upstream(upstream.clone())
    }
}

impl From<Urn> for UpstreamInput {
    fn from(urn: Urn) -> Self {
        UpstreamInput::Urn(urn)
    }
}

impl From<&str> for UpstreamInput {
    fn from(s: &str) -> Self {
        UpstreamInput::Str(s.to_string())
    }
}

impl From<String> for UpstreamInput {
    fn from(s: String) -> Self {
        UpstreamInput::Str(s)
    }
}

impl UpstreamInput {
    fn into_upstream(self) -> Upstream {
        match self {
            UpstreamInput::Upstream(upstream) => upstream,
            UpstreamInput::Urn(urn) => {
                Upstream::new(urn.to_string(), DatasetLineageType::Transformed)
            }
            UpstreamInput::Str(s) => Upstream::new(s, DatasetLineageType::Transformed),
        }
    }
}

impl EntityPatchBuilder<Dataset> {
    /// Description as ingested from the source system.
    pub fn set_description(&mut self, description: Option<&str>) -> PatchResult<&mut Self> {
        self.set_optional_str("description", description)
    }

    /// Description edited in the catalog, kept in `editableDatasetProperties`
    /// and shown in preference to the ingested one.
    pub fn set_editable_description(
        &mut self,
        description: Option<&str>,
    ) -> PatchResult<&mut Self> {
        match description {
            Some(d) if !d.is_empty() => {
                self.ops.append(
                    EDITABLE_DATASET_PROPERTIES_ASPECT,
                    PatchOpKind::Add,
                    PatchPath::field("description"),
                    Value::String(d.to_string()),
                )?;
                Ok(self)
            }
            _ => Ok(self),
        }
    }

    /// Stored in the `name` field.
    pub fn set_display_name(&mut self, display_name: Option<&str>) -> PatchResult<&mut Self> {
        self.set_optional_str("name", display_name)
    }

    pub fn set_qualified_name(&mut self, qualified_name: Option<&str>) -> PatchResult<&mut Self> {
        self.set_optional_str("qualifiedName", qualified_name)
    }

    pub fn set_external_url(&mut self, external_url: Option<&str>) -> PatchResult<&mut Self> {
        self.set_optional_str("externalUrl", external_url)
    }

    /// No-op on `None` or a zero time.
    pub fn set_created(&mut self, created: Option<&TimeStamp>) -> PatchResult<&mut Self> {
        self.set_optional("created", created.filter(|ts| ts.time != 0))
    }

    /// No-op on `None` or a zero time.
    pub fn set_last_modified(
        &mut self,
        last_modified: Option<&TimeStamp>,
    ) -> PatchResult<&mut Self> {
        self.set_optional("lastModified", last_modified.filter(|ts| ts.time != 0))
    }

    fn checked_upstream(
        &self,
        mut upstream: Upstream,
        context: &'static str,
    ) -> PatchResult<Upstream> {
        ensure_urn_type(&Urn::parse(&upstream.dataset)?, urn::DATASET, context)?;
        if upstream.audit_stamp.is_none() {
            upstream.audit_stamp = Some(self.mint());
        }
        Ok(upstream)
    }

    /// Accepts an [`Upstream`], a dataset [`Urn`] or a urn string.
    ///
    /// Upstreams without an audit stamp get one from the builder's minter.
    pub fn add_upstream(&mut self, upstream: impl Into<UpstreamInput>) -> PatchResult<&mut Self> {
        let upstream = self.checked_upstream(upstream.into().into_upstream(), "add_upstream")?;
        UPSTREAMS.add_entry(&mut self.ops, &upstream.dataset, to_value(&upstream)?)?;
        Ok(self)
    }

    pub fn remove_upstream(&mut self, dataset: &str) -> PatchResult<&mut Self> {
        UPSTREAMS.remove_entry(&mut self.ops, dataset)?;
        Ok(self)
    }

    /// Replaces the whole upstream list.
    pub fn set_upstreams(&mut self, upstreams: &[Upstream]) -> PatchResult<&mut Self> {
        let upstreams = upstreams
            .iter()
            .map(|u| self.checked_upstream(u.clone(), "set_upstreams"))
            .collect::<PatchResult<Vec<_>>>()?;
        UPSTREAMS.set_all(&mut self.ops, to_value(&upstreams)?)?;
        Ok(self)
    }

    // ── Column-level lineage ──────────────────────────────────────────

    /// Entries are keyed by their first downstream; every referenced
    /// upstream and downstream must be a well-formed urn.
    fn lineage_key(lineage: &FineGrainedLineage) -> PatchResult<String> {
        let downstreams = lineage.downstreams.as_deref().unwrap_or_default();
        let key = downstreams.first().ok_or_else(|| {
            PatchError::invalid_argument("fine-grained lineage has no downstream")
        })?;
        let upstreams = lineage.upstreams.as_deref().unwrap_or_default();
        for u in downstreams.iter().chain(upstreams) {
            Urn::parse(u)?;
        }
        Ok(key.clone())
    }

    /// `add /fineGrainedLineages/<first downstream>`
    pub fn add_fine_grained_lineage(
        &mut self,
        lineage: &FineGrainedLineage,
    ) -> PatchResult<&mut Self> {
        let key = Self::lineage_key(lineage)?;
        FINE_GRAINED_LINEAGES.add_entry(&mut self.ops, &key, to_value(lineage)?)?;
        Ok(self)
    }

    pub fn remove_fine_grained_lineage(&mut self, downstream: &str) -> PatchResult<&mut Self> {
        FINE_GRAINED_LINEAGES.remove_entry(&mut self.ops, downstream)?;
        Ok(self)
    }

    /// Replaces every column-level lineage of the dataset.
    pub fn set_fine_grained_lineages(
        &mut self,
        lineages: &[FineGrainedLineage],
    ) -> PatchResult<&mut Self> {
        for lineage in lineages {
            Self::lineage_key(lineage)?;
        }
        FINE_GRAINED_LINEAGES.set_all(&mut self.ops, to_value(&lineages)?)?;
        Ok(self)
    }

    /// Adds `upstream` as a `TRANSFORMED` upstream together with one
    /// column lineage per `(downstream column, upstream columns)` pair.
    ///
    /// Column names become schema field urns of the respective dataset.
    /// Either every operation is appended or none is.
    pub fn add_column_lineage<I, D, U, C>(
        &mut self,
        upstream: &str,
        mapping: I,
    ) -> PatchResult<&mut Self>
    where
        I: IntoIterator<Item = (D, U)>,
        D: AsRef<str>,
        U: IntoIterator<Item = C>,
        C: AsRef<str>,
    {
        let upstream_urn = Urn::parse(upstream)?;
        let upstream = self.checked_upstream(
            UpstreamInput::Urn(upstream_urn.clone()).into_upstream(),
            "add_column_lineage",
        )?;
        let mut ops = vec![UPSTREAMS.add_op(&upstream.dataset, to_value(&upstream)?)];
        for (downstream, columns) in mapping {
            let downstream = Urn::schema_field(&self.urn, downstream.as_ref())?.to_string();
            let upstreams = columns
                .into_iter()
                .map(|c| -> PatchResult<String> {
                    Ok(Urn::schema_field(&upstream_urn, c.as_ref())?.to_string())
                })
                .collect::<PatchResult<Vec<_>>>()?;
            let lineage = FineGrainedLineage::field(downstream.as_str(), upstreams);
            ops.push(FINE_GRAINED_LINEAGES.add_op(&downstream, to_value(&lineage)?));
        }
        self.ops.extend(ops)?;
        Ok(self)
    }

    // ── Per-column metadata ───────────────────────────────────────────

    pub fn set_field_description(
        &mut self,
        field_path: &str,
        description: &str,
    ) -> PatchResult<&mut Self> {
        SCHEMA_FIELDS.set_description(&mut self.ops, field_path, description)?;
        Ok(self)
    }

    pub fn add_field_tag(&mut self, field_path: &str, tag: &Tag) -> PatchResult<&mut Self> {
        SCHEMA_FIELDS.add_tag(&mut self.ops, field_path, tag)?;
        Ok(self)
    }

    /// Accepts a tag urn or a bare tag name.
    pub fn remove_field_tag(&mut self, field_path: &str, tag: &str) -> PatchResult<&mut Self> {
        let tag = normalize_urn(tag, urn::TAG, "tag")?;
        SCHEMA_FIELDS.remove_tag(&mut self.ops, field_path, &tag)?;
        Ok(self)
    }

    pub fn set_field_tags(&mut self, field_path: &str, tags: &[Tag]) -> PatchResult<&mut Self> {
        SCHEMA_FIELDS.set_tags(&mut self.ops, field_path, tags)?;
        Ok(self)
    }

    pub fn add_field_term(&mut self, field_path: &str, term: &Term) -> PatchResult<&mut Self> {
        SCHEMA_FIELDS.add_term(&mut self.ops, field_path, term)?;
        Ok(self)
    }

    /// Accepts a term urn or a bare term name.
    pub fn remove_field_term(&mut self, field_path: &str, term: &str) -> PatchResult<&mut Self> {
        let term = normalize_urn(term, urn::GLOSSARY_TERM, "glossary term")?;
        SCHEMA_FIELDS.remove_term(&mut self.ops, field_path, &term)?;
        Ok(self)
    }

    pub fn set_field_terms(&mut self, field_path: &str, terms: &[Term]) -> PatchResult<&mut Self> {
        SCHEMA_FIELDS.set_terms(&mut self.ops, field_path, terms)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditStamp, FixedClock};
    use crate::error::PatchError;
    use serde_json::{json, Value};

    const DS: &str = "urn:li:dataset:(urn:li:dataPlatform:hive,db.orders,PROD)";
    const UP: &str = "urn:li:dataset:(urn:li:dataPlatform:kafka,orders/raw,PROD)";

    fn builder() -> DatasetPatchBuilder {
        DatasetPatchBuilder::new(DS)
            .unwrap()
            .with_minter(FixedClock(AuditStamp::new(10, "urn:li:corpuser:etl")))
    }

    fn ops(b: &DatasetPatchBuilder) -> Vec<Value> {
        b.operations().iter().map(|op| op.to_json()).collect()
    }

    #[test]
    fn properties() {
        let mut b = builder();
        b.set_description(None)
            .unwrap()
            .set_display_name(Some(""))
            .unwrap();
        assert!(b.operations().is_empty());

        b.set_description(Some("Orders fact table"))
            .unwrap()
            .set_display_name(Some("orders"))
            .unwrap()
            .set_qualified_name(Some("db.orders"))
            .unwrap()
            .set_external_url(Some("https://hive/orders"))
            .unwrap()
            .set_created(Some(&TimeStamp { time: 5, actor: None }))
            .unwrap();
        let paths: Vec<_> = ops(&b).iter().map(|o| o["path"].clone()).collect();
        assert_eq!(
            paths,
            vec![
                json!("/description"),
                json!("/name"),
                json!("/qualifiedName"),
                json!("/externalUrl"),
                json!("/created"),
            ]
        );
        assert!(b
            .operations()
            .iter()
            .all(|op| op.aspect_name() == DATASET_PROPERTIES_ASPECT));
    }

    #[test]
    fn upstream_gets_minted_stamp_and_quoted_key() {
        let mut b = builder();
        b.add_upstream(&Upstream::new(UP, DatasetLineageType::Transformed))
            .unwrap();
        let op = &ops(&b)[0];
        assert_eq!(
            op["path"],
            json!("/upstreams/urn:li:dataset:(urn:li:dataPlatform:kafka,orders~1raw,PROD)")
        );
        assert_eq!(op["value"]["type"], json!("TRANSFORMED"));
        assert_eq!(op["value"]["auditStamp"], json!({"time": 10, "actor": "urn:li:corpuser:etl"}));
    }

    #[test]
    fn upstream_must_be_dataset() {
        let mut b = builder();
        let err = b
            .add_upstream(&Upstream::new("urn:li:chart:(a,b)", DatasetLineageType::View))
            .unwrap_err();
        assert!(matches!(err, PatchError::InvalidUrnType { .. }));
        assert!(b
            .set_upstreams(&[
                Upstream::new(UP, DatasetLineageType::Copy),
                Upstream::new("urn:li:corpuser:x", DatasetLineageType::Copy),
            ])
            .is_err());
        assert!(b.operations().is_empty());
    }

    #[test]
    fn remove_and_set_upstreams() {
        let mut b = builder();
        b.remove_upstream(UP)
            .unwrap()
            .set_upstreams(&[Upstream::new(UP, DatasetLineageType::Copy)])
            .unwrap();
        let all = ops(&b);
        assert_eq!(all[0]["op"], json!("remove"));
        assert_eq!(all[1]["path"], json!("/upstreams"));
        assert_eq!(all[1]["value"].as_array().unwrap().len(), 1);
        assert!(b
            .operations()
            .iter()
            .all(|op| op.aspect_name() == UPSTREAM_LINEAGE_ASPECT));
    }

    #[test]
    fn zero_timestamps_are_skipped() {
        let mut b = builder();
        b.set_created(Some(&TimeStamp { time: 0, actor: None }))
            .unwrap()
            .set_last_modified(Some(&TimeStamp {
                time: 0,
                actor: Some("urn:li:corpuser:etl".into()),
            }))
            .unwrap()
            .set_last_modified(None)
            .unwrap();
        assert!(b.operations().is_empty());

        b.set_last_modified(Some(&TimeStamp { time: 7, actor: None }))
            .unwrap();
        assert_eq!(ops(&b)[0]["value"], json!({"time": 7}));
    }

    #[test]
    fn bare_upstream_defaults_to_transformed() {
        let mut b = builder();
        b.add_upstream(UP)
            .unwrap()
            .add_upstream(Urn::dataset("s3", "bucket/orders", "DEV").unwrap())
            .unwrap()
            .add_upstream(Upstream::new(UP, DatasetLineageType::View))
            .unwrap();
        let all = ops(&b);
        assert_eq!(all[0]["value"]["type"], json!("TRANSFORMED"));
        assert_eq!(all[0]["value"]["dataset"], json!(UP));
        assert_eq!(
            all[1]["path"],
            json!("/upstreams/urn:li:dataset:(urn:li:dataPlatform:s3,bucket~1orders,DEV)")
        );
        assert_eq!(all[1]["value"]["type"], json!("TRANSFORMED"));
        assert_eq!(all[2]["value"]["type"], json!("VIEW"));

        assert!(matches!(
            b.add_upstream("urn:li:corpuser:x"),
            Err(PatchError::InvalidUrnType { .. })
        ));
        assert!(matches!(
            b.add_upstream("orders"),
            Err(PatchError::InvalidIdentifier { .. })
        ));
        assert_eq!(b.operations().len(), 3);
    }

    #[test]
    fn editable_description_has_its_own_aspect() {
        let mut b = builder();
        b.set_editable_description(Some(""))
            .unwrap()
            .set_editable_description(Some("Curated"))
            .unwrap()
            .set_description(Some("Ingested"))
            .unwrap();
        let aspects: Vec<_> = b.operations().iter().map(|op| op.aspect_name()).collect();
        assert_eq!(aspects, vec![EDITABLE_DATASET_PROPERTIES_ASPECT, DATASET_PROPERTIES_ASPECT]);
        assert_eq!(ops(&b)[0]["path"], json!("/description"));
    }

    #[test]
    fn field_tags_and_terms_quote_field_path() {
        let mut b = builder();
        b.add_field_tag("address/zip", &Tag::new("urn:li:tag:pii"))
            .unwrap()
            .remove_field_tag("address/zip", "pii")
            .unwrap()
            .add_field_term("x~y", &Term::new("urn:li:glossaryTerm:Money"))
            .unwrap()
            .remove_field_term("x~y", "Money")
            .unwrap()
            .set_field_tags("a/b~c", &[Tag::new("urn:li:tag:raw")])
            .unwrap()
            .set_field_description("a/b~c", "mixed")
            .unwrap();
        let paths: Vec<_> = ops(&b).iter().map(|o| o["path"].clone()).collect();
        assert_eq!(
            paths,
            vec![
                json!("/editableSchemaFieldInfo/address~1zip/globalTags/tags/urn:li:tag:pii"),
                json!("/editableSchemaFieldInfo/address~1zip/globalTags/tags/urn:li:tag:pii"),
                json!("/editableSchemaFieldInfo/x~0y/glossaryTerms/terms/urn:li:glossaryTerm:Money"),
                json!("/editableSchemaFieldInfo/x~0y/glossaryTerms/terms/urn:li:glossaryTerm:Money"),
                json!("/editableSchemaFieldInfo/a~1b~0c/globalTags/tags"),
                json!("/editableSchemaFieldInfo/a~1b~0c/description"),
            ]
        );
        let request = b.build();
        assert_eq!(request.aspect("editableSchemaMetadata").unwrap().len(), 6);

        assert!(b.add_field_tag("", &Tag::new("urn:li:tag:pii")).is_err());
        assert!(b.remove_field_term("col", "").is_err());
        assert_eq!(b.operations().len(), 6);
    }

    #[test]
    fn column_lineage_is_keyed_by_downstream_field() {
        let mut b = builder();
        b.add_column_lineage(UP, [("zip/code", vec!["zip", "plus~4"])])
            .unwrap();
        let all = ops(&b);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0]["value"]["type"], json!("TRANSFORMED"));
        assert_eq!(
            all[1]["path"],
            json!("/fineGrainedLineages/urn:li:schemaField:(urn:li:dataset:(urn:li:dataPlatform:hive,db.orders,PROD),zip~1code)")
        );
        assert_eq!(
            all[1]["value"],
            json!({
                "upstreamType": "FIELD_SET",
                "upstreams": [
                    "urn:li:schemaField:(urn:li:dataset:(urn:li:dataPlatform:kafka,orders/raw,PROD),zip)",
                    "urn:li:schemaField:(urn:li:dataset:(urn:li:dataPlatform:kafka,orders/raw,PROD),plus~4)",
                ],
                "downstreamType": "FIELD",
                "downstreams": [
                    "urn:li:schemaField:(urn:li:dataset:(urn:li:dataPlatform:hive,db.orders,PROD),zip/code)"
                ]
            })
        );
        assert!(b
            .operations()
            .iter()
            .all(|op| op.aspect_name() == UPSTREAM_LINEAGE_ASPECT));
    }

    #[test]
    fn column_lineage_is_atomic() {
        let mut b = builder();
        let err = b
            .add_column_lineage(UP, [("ok", vec!["a"]), ("bad", vec![""])])
            .unwrap_err();
        assert!(matches!(err, PatchError::InvalidIdentifier { .. }));
        assert!(b
            .add_column_lineage("urn:li:chart:(a,b)", [("c", vec!["d"])])
            .is_err());
        assert!(b.operations().is_empty());
    }

    #[test]
    fn fine_grained_lineage_add_remove_set() {
        let down = Urn::schema_field(&Urn::parse(DS).unwrap(), "total").unwrap().to_string();
        let up = Urn::schema_field(&Urn::parse(UP).unwrap(), "amount").unwrap().to_string();
        let mut lineage = FineGrainedLineage::field(down.as_str(), vec![up]);
        lineage.transform_operation = Some("SUM".into());

        let mut b = builder();
        b.add_fine_grained_lineage(&lineage)
            .unwrap()
            .remove_fine_grained_lineage(&down)
            .unwrap()
            .set_fine_grained_lineages(&[lineage.clone()])
            .unwrap();
        let all = ops(&b);
        assert_eq!(all[0]["value"]["transformOperation"], json!("SUM"));
        assert_eq!(all[0]["path"], all[1]["path"]);
        assert_eq!(all[1]["op"], json!("remove"));
        assert_eq!(all[2]["path"], json!("/fineGrainedLineages"));

        let mut orphan = lineage.clone();
        orphan.downstreams = None;
        assert!(matches!(
            b.add_fine_grained_lineage(&orphan),
            Err(PatchError::InvalidArgument(_))
        ));
        let mut garbled = lineage;
        garbled.upstreams = Some(vec!["amount".into()]);
        assert!(b.set_fine_grained_lineages(&[garbled]).is_err());
        assert_eq!(b.operations().len(), 3);
    }
}
