//! Proposition builder: catalog definitions and their descendants
//!
//! Each referenced definition becomes a concept keyed by its composite
//! identity, and its sub-definitions are built beneath it top-down. Modifier
//! specs add independent modifier roots enumerating a property's values.

use super::traits::SubtreeBuilder;
use super::value_set::ValueSetConceptTreeBuilder;
use crate::catalog::DefinitionCatalog;
use crate::config::{FolderSpec, ModifierSpec, ValueType};
use crate::ontology::{
    ConceptIdentity, ConceptRef, DataType, Metadata, OntologyBuildError, OntologyResult,
    VisualAttributes,
};
use tracing::{debug, warn};

/// Namespace of modifier root identities
const MODIFIER_NAMESPACE: &str = "AIW|Modifiers";

pub struct PropositionConceptTreeBuilder<'a> {
    id: String,
    catalog: &'a dyn DefinitionCatalog,
    propositions: Vec<String>,
    prefix: Option<String>,
    value_type: Option<ValueType>,
    modifiers: Vec<ModifierSpec>,
    already_loaded: bool,
    /// Flag every built concept as derived
    force_derived: bool,
    roots: Vec<ConceptRef>,
}

impl<'a> PropositionConceptTreeBuilder<'a> {
    pub fn new(catalog: &'a dyn DefinitionCatalog, propositions: Vec<String>) -> Self {
        Self {
            id: format!("propositions:{}", propositions.join(",")),
            catalog,
            propositions,
            prefix: None,
            value_type: None,
            modifiers: Vec::new(),
            already_loaded: false,
            force_derived: false,
            roots: Vec::new(),
        }
    }

    pub fn from_folder_spec(catalog: &'a dyn DefinitionCatalog, spec: &FolderSpec) -> Self {
        let mut builder = Self::new(catalog, spec.propositions.clone());
        builder.id = format!("folder:{}", spec.display_name);
        builder.prefix = spec.concept_code_prefix.clone();
        builder.value_type = spec.value_type;
        builder.modifiers = spec.modifiers.clone();
        builder.already_loaded = spec.already_loaded;
        builder
    }

    pub fn derived(mut self, force_derived: bool) -> Self {
        self.force_derived = force_derived;
        self
    }

    fn data_type(&self) -> DataType {
        self.value_type.map(|vt| vt.data_type()).unwrap_or_default()
    }

    /// Build `definition_id` under `parent`, then its descendants.
    ///
    /// `stack` holds the definitions currently being expanded; meeting one
    /// again means the catalog hierarchy has a cycle, and that edge is skipped.
    fn add_definition(
        &self,
        metadata: &mut Metadata,
        parent: ConceptRef,
        definition_id: &str,
        stack: &mut Vec<String>,
    ) -> OntologyResult<()> {
        if stack.iter().any(|s| s == definition_id) {
            warn!(
                builder = %self.id,
                definition = definition_id,
                "cycle in definition hierarchy, skipping"
            );
            return Ok(());
        }

        let definition = self
            .catalog
            .lookup(definition_id)?
            .ok_or_else(|| OntologyBuildError::UnknownDefinition(definition_id.to_string()))?;

        let identity = metadata.composite_identity(definition_id, None, None)?;
        let concept = metadata.get_or_create_concept(identity, self.prefix.as_deref())?;
        {
            let c = metadata.concept_mut(concept);
            c.set_display_name(definition.display_name.clone());
            c.set_data_type(self.data_type());
            c.set_derived(definition.derived || self.force_derived);
            c.set_already_loaded(self.already_loaded);
        }
        metadata.attach(parent, concept);

        stack.push(definition_id.to_string());
        for child in self.catalog.children(definition_id)? {
            self.add_definition(metadata, concept, &child, stack)?;
        }
        stack.pop();
        Ok(())
    }

    fn add_modifier(&mut self, metadata: &mut Metadata, modifier: &ModifierSpec) -> OntologyResult<()> {
        let identity = ConceptIdentity::name(&modifier.display_name, MODIFIER_NAMESPACE);
        let root = metadata.get_or_create_concept(identity, modifier.concept_code_prefix.as_deref())?;
        {
            let c = metadata.concept_mut(root);
            c.set_display_name(modifier.display_name.clone());
            c.set_visual_attributes(VisualAttributes::ModifierContainer);
        }

        for definition_id in &self.propositions {
            let mut values = ValueSetConceptTreeBuilder::new(
                self.catalog,
                definition_id.clone(),
                modifier.property.clone(),
                modifier.concept_code_prefix.clone(),
            )
            .as_modifier();
            metadata.run(&mut values, root)?;
        }

        if !self.roots.contains(&root) {
            self.roots.push(root);
        }
        Ok(())
    }
}

impl SubtreeBuilder for PropositionConceptTreeBuilder<'_> {
    fn id(&self) -> &str {
        &self.id
    }

    fn build(&mut self, metadata: &mut Metadata, parent: ConceptRef) -> OntologyResult<()> {
        debug!(builder = %self.id, count = self.propositions.len(), "building definitions");
        let mut stack = Vec::new();
        for definition_id in &self.propositions {
            self.add_definition(metadata, parent, definition_id, &mut stack)?;
        }

        let modifiers = self.modifiers.clone();
        for modifier in &modifiers {
            self.add_modifier(metadata, modifier)?;
        }
        Ok(())
    }

    /// Modifier roots created by this builder.
    fn roots(&self) -> &[ConceptRef] {
        &self.roots
    }
}
