//! Provider hierarchy: providers grouped by the first letter of their name
//!
//! The folder is built with the rest of the ontology; providers themselves
//! arrive later, one record at a time, while data is streamed in.

use super::traits::SubtreeBuilder;
use crate::ontology::{ConceptRef, DataType, Metadata, OntologyResult, ScalarValue, VisualAttributes};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Definition id provider concepts' composite identities are keyed by
pub const PROVIDER_DEFINITION_ID: &str = "AIW|Provider";

/// Folder for names that do not start with a letter
const OTHER_FOLDER: &str = "Other";

/// A provider seen during data loading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRecord {
    pub id: String,
    pub full_name: String,
}

impl ProviderRecord {
    pub fn new(id: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
        }
    }

    /// Name of the alphabetical folder this provider belongs in.
    pub fn folder(&self) -> String {
        match self.full_name.trim().chars().next() {
            Some(c) if c.is_alphabetic() => c.to_uppercase().collect(),
            _ => OTHER_FOLDER.to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ProviderConceptTreeBuilder {
    skip: bool,
    roots: Vec<ConceptRef>,
}

impl ProviderConceptTreeBuilder {
    pub fn new(skip: bool) -> Self {
        Self {
            skip,
            roots: Vec::new(),
        }
    }

    /// Merge a provider into the hierarchy.
    ///
    /// Returns `None` when the hierarchy was skipped. Adding the same
    /// provider twice returns the same concept.
    pub fn add(
        &mut self,
        metadata: &mut Metadata,
        record: &ProviderRecord,
    ) -> OntologyResult<Option<ConceptRef>> {
        let Some(&root) = self.roots.first() else {
            return Ok(None);
        };

        let letter = record.folder();
        let folder = metadata.get_or_create_hard_coded_folder(&["Providers", letter.as_str()])?;
        metadata.attach(root, folder);

        let identity = metadata.composite_identity(
            PROVIDER_DEFINITION_ID,
            Some("id"),
            Some(ScalarValue::Nominal(record.id.clone())),
        )?;
        let concept = metadata.get_or_create_concept(identity, None)?;
        {
            let c = metadata.concept_mut(concept);
            c.set_display_name(record.full_name.clone());
            c.set_data_type(DataType::Text);
            c.set_visual_attributes(VisualAttributes::Leaf);
        }
        metadata.attach(folder, concept);

        metadata.extend_hierarchy_paths(root, folder);
        metadata.extend_hierarchy_paths(folder, concept);
        debug!(provider = %record.id, folder = %letter, "provider added");
        Ok(Some(concept))
    }
}

impl SubtreeBuilder for ProviderConceptTreeBuilder {
    fn id(&self) -> &str {
        "providers"
    }

    fn build(&mut self, metadata: &mut Metadata, parent: ConceptRef) -> OntologyResult<()> {
        if self.skip {
            debug!("provider hierarchy skipped by configuration");
            return Ok(());
        }
        let folder = metadata.get_or_create_hard_coded_folder(&["Providers"])?;
        metadata.attach(parent, folder);
        metadata
            .concept_mut(folder)
            .set_visual_attributes(VisualAttributes::Container);
        self.roots = vec![folder];
        Ok(())
    }

    fn roots(&self) -> &[ConceptRef] {
        &self.roots
    }
}
