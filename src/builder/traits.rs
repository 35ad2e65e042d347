//! Subtree builder protocol: the contract every builder implements

use crate::ontology::{ConceptRef, Metadata, OntologyResult};

/// Populates a subtree under a given parent concept.
///
/// Builders read and write only through the [`Metadata`] they are handed:
/// every concept they need is looked up in its identity cache first and
/// created only on a miss, so a concept already built elsewhere is attached
/// again rather than duplicated.
pub trait SubtreeBuilder {
    /// Identifier used in logs and error context
    fn id(&self) -> &str;

    /// Attach zero or more children under `parent`.
    ///
    /// On error nothing further should be built; the error propagates to
    /// the construction call, which discards the whole ontology.
    fn build(&mut self, metadata: &mut Metadata, parent: ConceptRef) -> OntologyResult<()>;

    /// Roots this builder is responsible for, valid after `build`.
    fn roots(&self) -> &[ConceptRef] {
        &[]
    }
}
