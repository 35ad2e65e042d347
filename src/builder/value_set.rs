//! Value-set builder: one leaf per discrete value of a definition's property

use super::traits::SubtreeBuilder;
use crate::catalog::DefinitionCatalog;
use crate::ontology::{
    ConceptRef, DataType, Metadata, OntologyBuildError, OntologyResult, VisualAttributes,
};
use tracing::debug;

/// Enumerates the catalog values of `(definition, property)` under a parent.
pub struct ValueSetConceptTreeBuilder<'a> {
    id: String,
    catalog: &'a dyn DefinitionCatalog,
    definition_id: String,
    property: String,
    prefix: Option<String>,
    leaf_attributes: VisualAttributes,
}

impl<'a> ValueSetConceptTreeBuilder<'a> {
    pub fn new(
        catalog: &'a dyn DefinitionCatalog,
        definition_id: impl Into<String>,
        property: impl Into<String>,
        prefix: Option<String>,
    ) -> Self {
        let definition_id = definition_id.into();
        let property = property.into();
        Self {
            id: format!("value-set:{}.{}", definition_id, property),
            catalog,
            definition_id,
            property,
            prefix,
            leaf_attributes: VisualAttributes::Leaf,
        }
    }

    /// Build modifier leaves instead of concept leaves.
    pub fn as_modifier(mut self) -> Self {
        self.leaf_attributes = VisualAttributes::ModifierLeaf;
        self
    }
}

impl SubtreeBuilder for ValueSetConceptTreeBuilder<'_> {
    fn id(&self) -> &str {
        &self.id
    }

    fn build(&mut self, metadata: &mut Metadata, parent: ConceptRef) -> OntologyResult<()> {
        if self.catalog.lookup(&self.definition_id)?.is_none() {
            return Err(OntologyBuildError::UnknownDefinition(self.definition_id.clone()));
        }

        let values = self.catalog.values(&self.definition_id, &self.property)?;
        debug!(builder = %self.id, count = values.len(), "enumerating values");

        for element in values {
            let identity = metadata.composite_identity(
                &self.definition_id,
                Some(&self.property),
                Some(element.value.clone()),
            )?;
            let concept = metadata.get_or_create_concept(identity, self.prefix.as_deref())?;
            {
                let c = metadata.concept_mut(concept);
                c.set_display_name(element.label());
                c.set_data_type(DataType::Text);
                c.set_visual_attributes(self.leaf_attributes);
            }
            metadata.attach(parent, concept);
        }
        Ok(())
    }
}
