//! Flat, serializable view of a concept for downstream loaders

use super::concept::{Concept, DataType};
use serde::Serialize;

/// One row per canonical concept
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConceptRecord {
    pub concept_code: String,
    pub identity: String,
    pub display_name: String,
    pub data_type: DataType,
    pub source_system_code: Option<String>,
    /// Three-letter visual attributes code, e.g. `LAE`
    pub visual_attributes: String,
    pub derived: bool,
    pub already_loaded: bool,
    pub in_use: bool,
    pub hierarchy_paths: Vec<String>,
}

impl From<&Concept> for ConceptRecord {
    fn from(concept: &Concept) -> Self {
        Self {
            concept_code: concept.concept_code().to_string(),
            identity: concept.identity().id(),
            display_name: concept.display_name().to_string(),
            data_type: concept.data_type(),
            source_system_code: concept.source_system_code().map(str::to_string),
            visual_attributes: concept.visual_attributes().code().to_string(),
            derived: concept.is_derived(),
            already_loaded: concept.is_already_loaded(),
            in_use: concept.is_in_use(),
            hierarchy_paths: concept.hierarchy_paths().iter().cloned().collect(),
        }
    }
}
