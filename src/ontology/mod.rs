//! The concept ontology: identities, concepts, the arena they live in, and
//! the [`Metadata`] that builds and owns them

mod cache;
mod concept;
mod error;
mod graph;
mod identity;
mod metadata;
mod records;


pub use cache::IdentityCache;
pub use concept::{to_source_system_code, Concept, ConceptRef, DataType, VisualAttributes};
pub use error::{OntologyBuildError, OntologyResult};
pub use graph::{child_path, BreadthFirst, ConceptGraph, DepthFirst, Visit, PATH_SEPARATOR};
pub use identity::{
    CompositeIdentity, CompositeKey, ConceptIdentity, Decimal, NameIdentity, ScalarValue, CODE_LENGTH,
    FOLDER_NAMESPACE, INTERNAL_NAMESPACE,
};
pub use metadata::Metadata;
pub use records::ConceptRecord;
