//! Shared fixtures for ontology integration tests
//!
//! A small clinical catalog and a config that exercises every folder spec
//! shape: a prefixed proposition hierarchy with a modifier, a numeric
//! definition inside its own folder concept, and a property-driven value set
//! that the demographics gender axis enumerates again.

#![allow(dead_code)]

use metatree::{ConceptIdentity, InMemoryCatalog, Metadata, OntologyConfig};

pub const CATALOG_YAML: &str = r#"
definitions:
  - id: "ICD9:Diagnoses"
    display_name: Diagnoses
    children: ["ICD9:250", "ICD9:401"]
    properties:
      priority:
        - value: primary
          display_name: Primary
        - value: secondary
          display_name: Secondary
  - id: "ICD9:250"
    display_name: Diabetes mellitus
  - id: "ICD9:401"
    display_name: Essential hypertension
  - id: GLUCOSE
    display_name: Glucose
  - id: HighRisk
    display_name: High risk
    derived: true
    children: ["ICD9:250"]
  - id: GENDER
    display_name: Gender
    properties:
      code:
        - value: F
          display_name: Female
        - value: M
          display_name: Male
  - id: RACE
    display_name: Race
    properties:
      code:
        - value: W
          display_name: White
        - value: B
          display_name: Black
"#;

pub const CONFIG_YAML: &str = r#"
settings:
  root_node_name: Clinical
  source_system_code: EHR
  demographics:
    gender:
      definition: GENDER
      property: code
    race:
      definition: RACE
      property: code
folder_specs:
  - display_name: Diagnoses
    propositions: ["ICD9:Diagnoses"]
    concept_code_prefix: DX
    modifiers:
      - display_name: Diagnosis Priority
        property: priority
  - display_name: Labs
    propositions: [GLUCOSE]
    value_type: number
    use_folder_concept: true
    already_loaded: true
  - display_name: Gender
    propositions: [GENDER]
    property: code
phenotypes: [HighRisk]
"#;

pub fn clinical_catalog() -> InMemoryCatalog {
    InMemoryCatalog::from_yaml_str(CATALOG_YAML).expect("fixture catalog parses")
}

pub fn clinical_config() -> OntologyConfig {
    OntologyConfig::from_yaml_str(CONFIG_YAML).expect("fixture config parses")
}

pub fn clinical_metadata() -> Metadata {
    Metadata::new(&clinical_config(), &clinical_catalog()).expect("fixture ontology builds")
}

pub fn definition(id: &str) -> ConceptIdentity {
    ConceptIdentity::composite(id, None, None)
}

/// Hierarchy paths of the concept for `identity`, in sorted order.
pub fn paths_of(metadata: &Metadata, identity: &ConceptIdentity) -> Vec<String> {
    let r = metadata
        .get(identity)
        .unwrap_or_else(|| panic!("no concept for {}", identity));
    metadata
        .concept(r)
        .hierarchy_paths()
        .iter()
        .cloned()
        .collect()
}
