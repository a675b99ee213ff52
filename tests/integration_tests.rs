//! End-to-end tests across the workspace crates:
//! - JSON description → `Description` → `Condition` → SELECT text
//! - concept definitions stored as JSON and expanded during compilation
//! - compiler configuration loaded from a file
//!
//! Run with: cargo test --test integration_tests

use std::sync::Arc;

use anyhow::Result;
use semquery_description::{Description, PageRef};
use semquery_sparql::{
    CompilerConfig, ConditionBuilder, InMemoryConceptStore, SortDirection, StaticHierarchy,
    StaticRedirects,
};
use tempfile::tempdir;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

const CITIES_IN_GERMANY: &str = r#"{
    "kind": "conjunction",
    "descriptions": [
        { "kind": "class", "categories": [ { "title": "City", "namespace": 14 } ] },
        {
            "kind": "some_property",
            "property": { "key": "Located_in" },
            "description": {
                "kind": "value",
                "item": { "type": "page", "value": { "title": "Germany" } },
                "property": { "key": "Located_in" }
            }
        },
        {
            "kind": "some_property",
            "property": { "key": "Population", "value_type": "number" },
            "description": {
                "kind": "value",
                "item": { "type": "number", "value": 1000000 },
                "comparator": "greater"
            }
        }
    ]
}"#;

// ============================================================================
// JSON → SELECT
// ============================================================================

#[test]
fn test_json_description_to_select_query() -> Result<()> {
    init_tracing();

    let description = Description::from_json(CITIES_IN_GERMANY)?;
    assert_eq!(
        description.query_string(),
        "[[Category:City]][[Located in::Germany]][[Population::>>1000000]]"
    );

    let mut builder = ConditionBuilder::default();
    builder.set_sort_keys([("Population", SortDirection::Desc)]);
    let condition = builder.build_condition(&description)?;

    assert_eq!(
        builder.select_query(&condition),
        "PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>\n\
         PREFIX xsd: <http://www.w3.org/2001/XMLSchema#>\n\
         PREFIX property: <http://example.org/id/Property-3A>\n\
         SELECT DISTINCT ?result ?v2 WHERE {\n\
         { ?result rdf:type <City> . }\n\
         ?result property:Located_in <Germany> .\n\
         ?result property:Population ?v2 .\n\
         FILTER( ?v2 > \"1000000\"^^xsd:double )\n\
         }\n\
         ORDER BY DESC(?v2)\n"
    );
    Ok(())
}

#[test]
fn test_sorting_by_an_unconstrained_property() -> Result<()> {
    init_tracing();

    let description = Description::from_json(
        r#"{ "kind": "class", "categories": [ { "title": "City", "namespace": 14 } ] }"#,
    )?;
    let mut builder = ConditionBuilder::default();
    builder.set_sort_keys([("_MDAT", SortDirection::Asc), ("", SortDirection::Asc)]);
    let condition = builder.build_condition(&description)?;
    let query = builder.select_query(&condition);

    assert!(query.contains("SELECT DISTINCT ?result ?v1 ?resultsk WHERE {\n"));
    assert!(query.contains("OPTIONAL { ?result property:Modification_date-23aux ?v1 .\n}\n"));
    assert!(query.contains("?result swivt:wikiPageSortKey ?resultsk .\n"));
    assert!(query.ends_with("ORDER BY ASC(?v1) ASC(?resultsk)\n"));
    Ok(())
}

// ============================================================================
// Concepts
// ============================================================================

#[test]
fn test_concepts_expand_through_the_store() -> Result<()> {
    init_tracing();

    let mut store = InMemoryConceptStore::new();
    store.insert(
        &PageRef::concept("German cities"),
        &Description::from_json(CITIES_IN_GERMANY)?,
    )?;
    store.insert_raw(&PageRef::concept("Broken"), "{\"kind\": \"class\"");

    let mut builder = ConditionBuilder::default();
    builder.set_concept_store(Arc::new(store));

    let direct = {
        let mut plain = ConditionBuilder::default();
        let condition = plain.build_condition(&Description::from_json(CITIES_IN_GERMANY)?)?;
        plain.render(&condition)
    };
    let via_concept = builder.build_condition(&Description::concept(PageRef::concept(
        "German cities",
    )))?;
    assert_eq!(builder.render(&via_concept), direct);

    let broken = builder.build_condition(&Description::concept(PageRef::concept("Broken")))?;
    assert!(broken.is_false());
    Ok(())
}

#[test]
fn test_recursive_concept_reports_a_warning() -> Result<()> {
    init_tracing();

    let looped = PageRef::concept("Everything");
    let mut store = InMemoryConceptStore::new();
    store.insert(
        &looped,
        &Description::disjunction([
            Description::class([PageRef::category("Thing")]),
            Description::concept(looped.clone()),
        ]),
    )?;

    let mut builder = ConditionBuilder::default();
    builder.set_concept_store(Arc::new(store));
    let condition = builder.build_condition(&Description::concept(looped.clone()))?;
    assert!(!condition.is_false());
    assert_eq!(builder.warnings().len(), 1);

    // Warnings belong to one compilation.
    builder.build_condition(&Description::Thing)?;
    assert!(builder.warnings().is_empty());
    Ok(())
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_file_with_ports() -> Result<()> {
    init_tracing();

    let dir = tempdir()?;
    let path = dir.path().join("compiler.json");
    std::fs::write(
        &path,
        serde_json::json!({
            "result_variable": "s",
            "page_iri_base": "http://wiki.example/id/",
            "features": { "redirects": true, "no_case": true }
        })
        .to_string(),
    )?;
    let config = CompilerConfig::from_path(&path)?;

    let mut builder = ConditionBuilder::new(config);
    builder
        .set_hierarchy_lookup(Arc::new(
            StaticHierarchy::new().with_subcategories(&PageRef::category("City")),
        ))
        .set_redirect_lookup(Arc::new(StaticRedirects::new([PageRef::main("Munchen")])));

    let description = Description::from_json(
        r#"{
            "kind": "disjunction",
            "descriptions": [
                { "kind": "class", "categories": [ { "title": "City", "namespace": 14 } ] },
                { "kind": "value", "item": { "type": "page", "value": { "title": "Munchen" } } },
                { "kind": "value", "item": { "type": "text", "value": "Ber*" }, "comparator": "like" }
            ]
        }"#,
    )?;
    let condition = builder.build_condition(&description)?;
    let text = builder.render(&condition);

    assert!(text.starts_with("<http://wiki.example/id/Munchen> swivt:redirectsTo ?r2 .\n"));
    assert!(text.contains("OPTIONAL { {\n{ ?v3 rdf:type ?sc1 . ?sc1 rdfs:subClassOf* <http://wiki.example/id/City> . }\n} }\n"));
    assert!(text.contains("FILTER( ?s = ?r2 || regex( ?s, \"^Ber.*$\", \"si\" ) || ?s = ?v3 )\n"));
    Ok(())
}
