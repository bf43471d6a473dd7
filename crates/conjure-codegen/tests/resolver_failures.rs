use conjure_codegen::corpus::ConjureCorpus;
use conjure_codegen::error::{CodegenError, SchemaError};
use conjure_codegen::graph::{TypeGraph, TypeName};
use conjure_codegen::output::GeneratedBundle;

fn resolve(path: &str) -> Result<TypeGraph, SchemaError> {
    let corpus = ConjureCorpus::load(path).expect("load IR");
    TypeGraph::from_corpus(&corpus)
}

#[test]
fn references_across_files_resolve_in_either_order() {
    let graph = resolve("tests/fixtures/multi").unwrap();
    assert!(graph.is_resolved());

    let route = graph.named(&TypeName::new("com.example.trip", "Route")).unwrap();
    let point = graph.lookup(&TypeName::new("com.example.geo", "Point")).unwrap();
    assert!(route.kind.members().iter().any(|m| graph.describe(m) == "list<com.example.geo.Point>"));
    assert!(graph.get(point).is_resolved());
}

#[test]
fn unresolved_reference_fails_the_whole_run() {
    let err = resolve("tests/fixtures/invalid/unresolved.conjure.json").unwrap_err();
    let SchemaError::UnresolvedReference {
        name,
        referenced_from,
    } = err
    else {
        panic!("expected unresolved reference, got {err:?}");
    };
    assert_eq!(name, TypeName::new("com.example.missing", "Ghost"));
    assert_eq!(referenced_from, TypeName::new("com.example.house", "Haunted"));
}

#[test]
fn cyclic_alias_is_reported_with_its_chain() {
    let err = resolve("tests/fixtures/invalid/cyclic-alias.conjure.json").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Cyclic alias: com.example.farm.Chicken -> com.example.farm.Egg -> com.example.farm.Chicken"
    );
}

#[test]
fn record_map_key_is_rejected() {
    let err = resolve("tests/fixtures/invalid/record-map-key.conjure.json").unwrap_err();
    assert!(matches!(
        err,
        SchemaError::InvalidMapKey { ref key, ref owner }
            if key == "com.example.grid.Coordinate" && owner.name == "Board"
    ));
}

#[test]
fn duplicate_names_across_inputs_are_rejected() {
    let err = ConjureCorpus::load_all(["tests/fixtures/multi", "tests/fixtures/multi/b-geo.conjure.json"])
        .unwrap_err();
    assert!(matches!(
        err,
        CodegenError::Schema(SchemaError::DuplicateTypeName { ref name })
            if name.to_string() == "com.example.geo.Point"
    ));
}

#[test]
fn schema_errors_surface_through_the_pipeline() {
    let corpus = ConjureCorpus::load("tests/fixtures/invalid/unresolved.conjure.json").unwrap();
    let err = GeneratedBundle::from_corpus(&corpus, Default::default()).unwrap_err();
    assert!(matches!(
        err,
        CodegenError::Schema(SchemaError::UnresolvedReference { .. })
    ));
}
