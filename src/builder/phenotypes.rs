//! Phenotypes: user-defined derived definitions under their own folder

use super::proposition::PropositionConceptTreeBuilder;
use super::traits::SubtreeBuilder;
use crate::catalog::DefinitionCatalog;
use crate::ontology::{ConceptRef, Metadata, OntologyResult, VisualAttributes};

pub struct PhenotypesBuilder<'a> {
    catalog: &'a dyn DefinitionCatalog,
    phenotypes: Vec<String>,
    roots: Vec<ConceptRef>,
}

impl<'a> PhenotypesBuilder<'a> {
    pub fn new(catalog: &'a dyn DefinitionCatalog, phenotypes: Vec<String>) -> Self {
        Self {
            catalog,
            phenotypes,
            roots: Vec::new(),
        }
    }
}

impl SubtreeBuilder for PhenotypesBuilder<'_> {
    fn id(&self) -> &str {
        "phenotypes"
    }

    /// No folder is created when there are no phenotypes.
    fn build(&mut self, metadata: &mut Metadata, parent: ConceptRef) -> OntologyResult<()> {
        if self.phenotypes.is_empty() {
            return Ok(());
        }

        let folder = metadata.get_or_create_hard_coded_folder(&["Phenotypes"])?;
        metadata.attach(parent, folder);
        metadata
            .concept_mut(folder)
            .set_visual_attributes(VisualAttributes::Container);

        let mut definitions =
            PropositionConceptTreeBuilder::new(self.catalog, self.phenotypes.clone()).derived(true);
        metadata.run(&mut definitions, folder)?;

        self.roots = vec![folder];
        Ok(())
    }

    fn roots(&self) -> &[ConceptRef] {
        &self.roots
    }
}
