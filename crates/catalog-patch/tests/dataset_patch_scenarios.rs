use catalog_patch::{
    AuditStamp, DatasetLineageType, DatasetPatchBuilder, FixedClock, Owner, OwnershipType,
    PatchError, SystemMetadata, Tag, Term, Upstream, Urn,
};
use serde_json::json;

fn dataset_urn() -> Urn {
    Urn::dataset("snowflake", "analytics.public.orders", "PROD").unwrap()
}

#[test]
fn dataset_patch_end_to_end() {
    let upstream = Urn::dataset("s3", "raw/orders/2024", "PROD").unwrap();
    let mut b = DatasetPatchBuilder::for_urn(dataset_urn())
        .unwrap()
        .with_minter(FixedClock(AuditStamp::new(99, "urn:li:corpuser:etl")))
        .with_system_metadata(SystemMetadata {
            run_id: Some("ingest-2024-01-01".into()),
            last_observed: Some(99),
            ..Default::default()
        });

    b.set_description(Some("Cleaned orders"))
        .unwrap()
        .add_owner(&Owner::new("urn:li:corpGroup:data-eng", OwnershipType::TechnicalOwner))
        .unwrap()
        .add_tag(&Tag::new("urn:li:tag:gold"))
        .unwrap()
        .add_upstream(&Upstream::new(upstream.to_string(), DatasetLineageType::Transformed))
        .unwrap()
        .add_custom_property("sla", "24h")
        .unwrap();

    let request = b.build();
    let v = request.to_json().unwrap();
    assert_eq!(v["entityType"], json!("dataset"));
    assert_eq!(v["systemMetadata"]["runId"], json!("ingest-2024-01-01"));

    let aspects: Vec<_> = request.aspect_patches.keys().cloned().collect();
    assert_eq!(
        aspects,
        vec!["datasetProperties", "ownership", "globalTags", "upstreamLineage"]
    );
    assert_eq!(
        v["aspectPatches"]["datasetProperties"],
        json!([
            {"op": "add", "path": "/description", "value": "Cleaned orders"},
            {"op": "add", "path": "/customProperties/sla", "value": "24h"}
        ])
    );
    assert_eq!(
        v["aspectPatches"]["upstreamLineage"][0]["path"],
        json!("/upstreams/urn:li:dataset:(urn:li:dataPlatform:s3,raw~1orders~12024,PROD)")
    );
}

#[test]
fn dataset_builder_rejects_chart_urn() {
    assert!(matches!(
        DatasetPatchBuilder::new("urn:li:chart:(tool,id1)"),
        Err(PatchError::InvalidIdentifier { .. })
    ));
}

#[test]
fn malformed_upstream_is_invalid_identifier() {
    let mut b = DatasetPatchBuilder::for_urn(dataset_urn()).unwrap();
    let err = b
        .add_upstream(&Upstream::new("orders", DatasetLineageType::Copy))
        .unwrap_err();
    assert!(matches!(err, PatchError::InvalidIdentifier { .. }));
    assert!(b.build().is_empty());
}

#[test]
fn column_metadata_and_lineage_end_to_end() {
    let source = Urn::dataset("s3", "raw/orders", "PROD").unwrap();
    let mut b = DatasetPatchBuilder::for_urn(dataset_urn())
        .unwrap()
        .with_minter(FixedClock(AuditStamp::new(5, "urn:li:corpuser:etl")));

    b.set_editable_description(Some("Orders, one row per line item"))
        .unwrap()
        .add_field_tag("customer/email", &Tag::new("urn:li:tag:pii"))
        .unwrap()
        .add_field_term("price~usd", &Term::new("urn:li:glossaryTerm:Money"))
        .unwrap()
        .add_column_lineage(
            &source.to_string(),
            [("customer/email", vec!["email"]), ("price~usd", vec!["price", "fx/rate"])],
        )
        .unwrap();

    let request = b.build();
    let aspects: Vec<_> = request.aspect_patches.keys().cloned().collect();
    assert_eq!(
        aspects,
        vec!["editableDatasetProperties", "editableSchemaMetadata", "upstreamLineage"]
    );

    let v = request.to_json().unwrap();
    assert_eq!(
        v["aspectPatches"]["editableSchemaMetadata"][0]["path"],
        json!("/editableSchemaFieldInfo/customer~1email/globalTags/tags/urn:li:tag:pii")
    );
    assert_eq!(
        v["aspectPatches"]["editableSchemaMetadata"][1]["path"],
        json!("/editableSchemaFieldInfo/price~0usd/glossaryTerms/terms/urn:li:glossaryTerm:Money")
    );

    let lineage = request.aspect("upstreamLineage").unwrap();
    assert_eq!(lineage.len(), 3);
    assert_eq!(
        lineage[0].path().segments(),
        ["upstreams", "urn:li:dataset:(urn:li:dataPlatform:s3,raw/orders,PROD)"]
    );
    let price = Urn::schema_field(&dataset_urn(), "price~usd").unwrap();
    assert_eq!(lineage[2].path().segments()[1], price.to_string());
    assert_eq!(
        lineage[2].value()["upstreams"][1],
        json!("urn:li:schemaField:(urn:li:dataset:(urn:li:dataPlatform:s3,raw/orders,PROD),fx/rate)")
    );
    assert!(lineage[2].path().to_pointer().ends_with(",price~0usd)"));
}
