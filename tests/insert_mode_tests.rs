//! Insert mode tests
//!
//! A rendered form replaces only the block between the two marker lines of an
//! existing page.

use std::fs;
use std::path::{Path, PathBuf};

use schema_forms::config::RenderConfig;
use schema_forms::output::DEFAULT_TAG;
use schema_forms::{ErrorFamily, FormConverter, FormError, IdStrategy, MappingRepository, OutputError, OutputTarget};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn converter() -> FormConverter {
    let mapping = MappingRepository::bundled("simple").unwrap();
    let settings = RenderConfig {
        ids: IdStrategy::Counter,
        ..RenderConfig::default()
    };
    FormConverter::new(mapping, settings)
}

/// Copy a fixture page into a scratch directory
fn scratch_page(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::copy(fixture(name), &path).unwrap();
    path
}

#[test]
fn test_insert_keeps_text_outside_markers() {
    let dir = tempfile::tempdir().unwrap();
    let page = scratch_page(&dir, "page.html");
    let original = fs::read_to_string(&page).unwrap();

    let target = OutputTarget::Insert {
        path: page.clone(),
        tag: DEFAULT_TAG.to_string(),
    };
    let conversion = converter()
        .convert_file(&fixture("contact_schema.json"), &target)
        .unwrap();
    let updated = fs::read_to_string(&page).unwrap();

    let first = original.find(DEFAULT_TAG).unwrap();
    let prefix_end = first + original[first..].find('\n').unwrap() + 1;
    let second = original[prefix_end..].find(DEFAULT_TAG).unwrap() + prefix_end;
    let suffix_start = original[..second].rfind('\n').unwrap() + 1;

    let prefix = &original[..prefix_end];
    let suffix = &original[suffix_start..];
    assert!(updated.starts_with(prefix));
    assert!(updated.ends_with(suffix));
    assert_eq!(
        &updated[prefix.len()..updated.len() - suffix.len()],
        format!("{}\n", conversion.html)
    );
    assert!(!updated.contains("<p>placeholder</p>"));
}

#[test]
fn test_insert_twice_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    let page = scratch_page(&dir, "page.html");
    let target = OutputTarget::from_args(&page, true, DEFAULT_TAG);

    converter().convert_file(&fixture("contact_schema.json"), &target).unwrap();
    let once = fs::read_to_string(&page).unwrap();
    converter().convert_file(&fixture("contact_schema.json"), &target).unwrap();
    let twice = fs::read_to_string(&page).unwrap();

    assert_eq!(once, twice);
}

#[test]
fn test_insert_without_markers_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let page = scratch_page(&dir, "unmarked_page.html");
    let original = fs::read_to_string(&page).unwrap();

    let target = OutputTarget::from_args(&page, true, DEFAULT_TAG);
    let err = converter()
        .convert_file(&fixture("contact_schema.json"), &target)
        .unwrap_err();

    match &err {
        FormError::Output(OutputError::MissingStartTag { tag }) => assert_eq!(tag, DEFAULT_TAG),
        other => panic!("Expected MissingStartTag, got {:?}", other),
    }
    assert_eq!(err.family(), ErrorFamily::Output);
    assert_eq!(fs::read_to_string(&page).unwrap(), original);
}

#[test]
fn test_insert_with_custom_tag() {
    let dir = tempfile::tempdir().unwrap();
    let page = dir.path().join("custom.html");
    fs::write(&page, "<main>\n<!-- form -->\nold\n<!-- form -->\n</main>\n").unwrap();

    let target = OutputTarget::from_args(&page, true, "<!-- form -->");
    let conversion = converter()
        .convert_file(&fixture("contact_schema.json"), &target)
        .unwrap();

    assert_eq!(
        fs::read_to_string(&page).unwrap(),
        format!("<main>\n<!-- form -->\n{}\n<!-- form -->\n</main>\n", conversion.html)
    );
}
