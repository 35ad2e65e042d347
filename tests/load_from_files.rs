//! Config and catalog loading from YAML files on disk

mod common;

use common::{definition, CATALOG_YAML, CONFIG_YAML};
use metatree::{CatalogError, ConfigError, InMemoryCatalog, Metadata, OntologyConfig};
use std::fs;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn builds_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = OntologyConfig::load(write(&dir, "ontology.yaml", CONFIG_YAML)).unwrap();
    let catalog = InMemoryCatalog::load(write(&dir, "catalog.yaml", CATALOG_YAML)).unwrap();

    assert_eq!(config.folder_specs.len(), 3);
    assert_eq!(catalog.len(), 7);

    let metadata = Metadata::new(&config, &catalog).unwrap();
    assert!(metadata.get(&definition("GLUCOSE")).is_some());
    assert_eq!(metadata.source_system_code(), "EHR");
}

#[test]
fn missing_config_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = OntologyConfig::load(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn empty_folder_spec_rejected_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "ontology.yaml",
        "folder_specs:\n  - display_name: Nothing\n    propositions: []\n",
    );
    let err = OntologyConfig::load(path).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn malformed_catalog_is_yaml_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "catalog.yaml", "definitions: [unclosed");
    let err = InMemoryCatalog::load(path).unwrap_err();
    assert!(matches!(err, CatalogError::Yaml(_)));
}

#[test]
fn long_source_system_code_is_truncated() {
    let dir = tempfile::tempdir().unwrap();
    let yaml = format!("settings:\n  source_system_code: {}\n", "X".repeat(60));
    let config = OntologyConfig::load(write(&dir, "ontology.yaml", &yaml)).unwrap();

    let metadata = Metadata::new(&config, &InMemoryCatalog::new()).unwrap();
    assert_eq!(metadata.source_system_code().len(), 50);
    let root = metadata.concept(metadata.concept_root());
    assert_eq!(root.source_system_code().map(str::len), Some(50));
}
