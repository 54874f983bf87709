//! End-to-end conversion tests
//!
//! Each test loads fixture schemas and mappings from disk and drives a full
//! conversion through `FormConverter`.

use std::fs;
use std::path::{Path, PathBuf};

use schema_forms::config::RenderConfig;
use schema_forms::{
    load_schema, ErrorFamily, FormConfig, FormConverter, FormError, IdStrategy, MappingError, MappingRepository,
    OutputTarget, ParseErrorKind,
};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn counter_settings() -> RenderConfig {
    RenderConfig {
        ids: IdStrategy::Counter,
        ..RenderConfig::default()
    }
}

fn bundled_converter() -> FormConverter {
    let mapping = MappingRepository::bundled("simple").unwrap();
    FormConverter::new(mapping, counter_settings())
}

// =============================================================================
// Rendering
// =============================================================================

#[test]
fn test_minimal_mapping_end_to_end() {
    let mapping = MappingRepository::load(&fixture("minimal_mapping.json")).unwrap();
    let converter = FormConverter::new(mapping, counter_settings());
    let schema = serde_json::json!({
        "type": "object",
        "title": "Form",
        "properties": {"name": {"type": "string"}}
    });

    let conversion = converter.render(&schema).unwrap();
    assert_eq!(conversion.html, "<div>Form<input></div>");
}

#[test]
fn test_bundled_mapping_renders_contact_form() {
    let schema = load_schema(&fixture("contact_schema.json")).unwrap();
    let html = bundled_converter().render(&schema).unwrap().html;

    // Children are numbered before their parents.
    assert!(html.starts_with("<fieldset id=\"f0010\">\n<legend>Contact</legend>"));
    assert!(html.contains("<p class=\"description\">How to reach you</p>"));
    assert!(html.contains("value=\"Ada\""));
    assert!(html.contains("<input type=\"checkbox\" id=\"f0003\" name=\"f0003\" checked>"));
    assert!(html.contains("<option value=\"green\" selected>green</option>"));
    assert!(html.contains("<option value=\"red\">red</option>"));
    assert!(html.contains("<template id=\"f0006-template\">"));
    assert!(html.contains("<legend>Address</legend>"));
    assert!(html.ends_with("</fieldset>"));
}

#[test]
fn test_properties_render_in_declaration_order() {
    let schema = load_schema(&fixture("contact_schema.json")).unwrap();
    let html = bundled_converter().render(&schema).unwrap().html;

    let positions: Vec<usize> = ["Name", "Age", "Newsletter", "Favourite color", "Tags", "Address"]
        .iter()
        .map(|title| html.find(title).unwrap())
        .collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
}

#[test]
fn test_counter_ids_make_output_repeatable() {
    let schema = load_schema(&fixture("contact_schema.json")).unwrap();
    let converter = bundled_converter();
    assert_eq!(
        converter.render(&schema).unwrap().html,
        converter.render(&schema).unwrap().html
    );
}

#[test]
fn test_random_ids_differ_between_runs() {
    let schema = load_schema(&fixture("contact_schema.json")).unwrap();
    let converter = FormConverter::from_config(&FormConfig::default()).unwrap();
    let first = converter.render(&schema).unwrap().html;
    let second = converter.render(&schema).unwrap().html;
    assert_ne!(first, second);
    assert!(!first.contains("f0001"));
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_missing_type_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("form.html");
    let target = OutputTarget::Overwrite(out.clone());

    let err = bundled_converter()
        .convert_file(&fixture("untyped_schema.json"), &target)
        .unwrap_err();

    match &err {
        FormError::Parse(parse) => {
            assert_eq!(parse.kind, ParseErrorKind::MissingType);
            assert_eq!(parse.depth, 1);
        }
        other => panic!("Expected MissingType, got {:?}", other),
    }
    assert_eq!(err.family(), ErrorFamily::Schema);
    assert!(!out.exists());
}

#[test]
fn test_unknown_mapping_aborts_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("form.html");
    let mapping = MappingRepository::load(&fixture("object_only_mapping.json")).unwrap();
    let converter = FormConverter::new(mapping, counter_settings());

    let err = converter
        .convert_file(&fixture("contact_schema.json"), &OutputTarget::Overwrite(out.clone()))
        .unwrap_err();

    match &err {
        FormError::Mapping(MappingError::UnknownMapping { type_name }) => assert_eq!(type_name, "string"),
        other => panic!("Expected UnknownMapping, got {:?}", other),
    }
    assert_eq!(err.family(), ErrorFamily::Mapping);
    assert!(!out.exists());
}

#[test]
fn test_non_array_enum_is_reported_as_schema_error() {
    let schema = serde_json::json!({"type": "string", "enum": "abc"});
    let err = bundled_converter().render(&schema).unwrap_err();
    assert_eq!(err.family(), ErrorFamily::Schema);
    match err {
        FormError::Parse(parse) => assert_eq!(parse.kind, ParseErrorKind::InvalidEnum { found: "string".into() }),
        other => panic!("Expected InvalidEnum, got {:?}", other),
    }
}

#[test]
fn test_existing_output_survives_failed_conversion() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("form.html");
    fs::write(&out, "previous form").unwrap();

    assert!(bundled_converter()
        .convert_file(&fixture("untyped_schema.json"), &OutputTarget::Overwrite(out.clone()))
        .is_err());
    assert_eq!(fs::read_to_string(&out).unwrap(), "previous form");
}

#[test]
fn test_unknown_bundled_mapping() {
    let mut config = FormConfig::default();
    config.mapping.bundled = "fancy".to_string();
    match FormConverter::from_config(&config) {
        Err(FormError::Mapping(MappingError::UnknownBundledMapping { name })) => assert_eq!(name, "fancy"),
        other => panic!("Expected UnknownBundledMapping, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_mapping_path_takes_precedence() {
    let mut config = FormConfig::default();
    config.mapping.path = Some(fixture("minimal_mapping.json"));
    config.render.ids = IdStrategy::Counter;
    let converter = FormConverter::from_config(&config).unwrap();
    assert_eq!(converter.mapping().len(), 2);
}

// =============================================================================
// Output
// =============================================================================

#[test]
fn test_overwrite_writes_rendered_html() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("form.html");
    fs::write(&out, "stale").unwrap();

    let conversion = bundled_converter()
        .convert_file(&fixture("contact_schema.json"), &OutputTarget::Overwrite(out.clone()))
        .unwrap();

    assert_eq!(fs::read_to_string(&out).unwrap(), conversion.html);
    assert!(!conversion.diagnostics.has_errors());
}
