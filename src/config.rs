//! Ontology configuration: global settings and ordered folder specifications
//!
//! Loaded from YAML. Everything here is read-only once construction starts.

use crate::ontology::DataType;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Semantic type of a folder spec's values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Nominal,
    Number,
    Boolean,
    Date,
}

impl ValueType {
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Number => DataType::Numeric,
            Self::Date => DataType::Date,
            Self::Nominal | Self::Boolean => DataType::Text,
        }
    }
}

/// Catalog value set that enumerates one axis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisSource {
    pub definition: String,
    pub property: String,
}

/// Where each demographic axis takes its values from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemographicSources {
    pub gender: Option<AxisSource>,
    pub language: Option<AxisSource>,
    pub marital_status: Option<AxisSource>,
    pub race: Option<AxisSource>,
    pub religion: Option<AxisSource>,
    pub vital_status: Option<AxisSource>,
}

/// Global settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub root_node_name: String,
    pub source_system_code: String,
    pub skip_demographics_hierarchy: bool,
    pub skip_provider_hierarchy: bool,
    pub demographics: DemographicSources,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_node_name: "Ontology".to_string(),
            source_system_code: "METATREE".to_string(),
            skip_demographics_hierarchy: false,
            skip_provider_hierarchy: false,
            demographics: DemographicSources::default(),
        }
    }
}

/// An additional modifier axis built alongside a folder spec
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierSpec {
    pub display_name: String,
    pub property: String,
    #[serde(default)]
    pub concept_code_prefix: Option<String>,
}

/// One subtree to build from catalog definitions
///
/// Without a `property` the referenced definitions and their descendants are
/// built directly. With one, each definition becomes a container whose
/// children are the property's discrete values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderSpec {
    pub display_name: String,
    pub propositions: Vec<String>,
    #[serde(default)]
    pub property: Option<String>,
    #[serde(default)]
    pub concept_code_prefix: Option<String>,
    #[serde(default)]
    pub value_type: Option<ValueType>,
    #[serde(default)]
    pub modifiers: Vec<ModifierSpec>,
    #[serde(default)]
    pub already_loaded: bool,
    /// Build under a per-spec container instead of the root
    #[serde(default)]
    pub use_folder_concept: bool,
}

impl FolderSpec {
    pub fn new(display_name: impl Into<String>, propositions: Vec<String>) -> Self {
        Self {
            display_name: display_name.into(),
            propositions,
            property: None,
            concept_code_prefix: None,
            value_type: None,
            modifiers: Vec::new(),
            already_loaded: false,
            use_folder_concept: false,
        }
    }

    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.concept_code_prefix = Some(prefix.into());
        self
    }

    pub fn with_value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    pub fn with_modifier(mut self, modifier: ModifierSpec) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn already_loaded(mut self, already_loaded: bool) -> Self {
        self.already_loaded = already_loaded;
        self
    }

    pub fn in_folder_concept(mut self) -> Self {
        self.use_folder_concept = true;
        self
    }
}

/// Complete input for one ontology build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OntologyConfig {
    pub settings: Settings,
    pub folder_specs: Vec<FolderSpec>,
    /// User-defined (derived) definition ids
    pub phenotypes: Vec<String>,
}

impl OntologyConfig {
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        for spec in &self.folder_specs {
            if spec.propositions.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "folder spec '{}' references no definitions",
                    spec.display_name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
settings:
  root_node_name: Clinical
  source_system_code: EHR
  skip_provider_hierarchy: true
  demographics:
    gender:
      definition: GENDER
      property: code
folder_specs:
  - display_name: Diagnoses
    propositions: ["ICD9:Diagnoses"]
    concept_code_prefix: DX
  - display_name: Gender
    propositions: [GENDER]
    property: code
    already_loaded: true
phenotypes: [Diabetes]
"#;

    #[test]
    fn parses_full_config() {
        let config = OntologyConfig::from_yaml_str(YAML).unwrap();
        assert_eq!(config.settings.root_node_name, "Clinical");
        assert!(config.settings.skip_provider_hierarchy);
        assert!(!config.settings.skip_demographics_hierarchy);
        assert_eq!(
            config.settings.demographics.gender,
            Some(AxisSource { definition: "GENDER".into(), property: "code".into() })
        );
        assert_eq!(config.folder_specs.len(), 2);
        assert_eq!(config.folder_specs[0].concept_code_prefix.as_deref(), Some("DX"));
        assert_eq!(config.folder_specs[1].property.as_deref(), Some("code"));
        assert!(config.folder_specs[1].already_loaded);
        assert_eq!(config.phenotypes, vec!["Diabetes"]);
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config = OntologyConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config.settings, Settings::default());
        assert!(config.folder_specs.is_empty());
    }

    #[test]
    fn folder_spec_without_definitions_is_invalid() {
        let yaml = "folder_specs:\n  - display_name: Empty\n    propositions: []\n";
        let err = OntologyConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn value_type_maps_to_data_type() {
        assert_eq!(ValueType::Number.data_type(), DataType::Numeric);
        assert_eq!(ValueType::Date.data_type(), DataType::Date);
        assert_eq!(ValueType::Nominal.data_type(), DataType::Text);
    }
}
