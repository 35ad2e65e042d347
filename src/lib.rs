//! Metatree: deduplicated multi-rooted concept ontology builder
//!
//! Builds a concept tree from declarative folder specs and an external
//! definition catalog. Every concept is deduplicated by identity, may sit
//! under several parents, and ends up with one hierarchy path per position.
//!
//! # Core Concepts
//!
//! - **Identities**: the key a concept is deduplicated by, either a name in
//!   an owning context or a (definition, property, value) composite
//! - **Builders**: each populates one subtree under a parent concept
//! - **Metadata**: runs the builders in a fixed order and owns the result
//!
//! # Example
//!
//! ```
//! use metatree::{InMemoryCatalog, Metadata, OntologyConfig};
//!
//! let config = OntologyConfig::default();
//! let metadata = Metadata::new(&config, &InMemoryCatalog::new()).unwrap();
//! let root = metadata.concept(metadata.concept_root());
//! assert_eq!(root.hierarchy_paths().len(), 1);
//! ```

pub mod builder;
pub mod catalog;
pub mod config;
pub mod ontology;

pub use builder::{ProviderRecord, SubtreeBuilder};
pub use catalog::{CatalogError, CatalogResult, Definition, DefinitionCatalog, InMemoryCatalog, ValueSetElement};
pub use config::{ConfigError, ConfigResult, FolderSpec, ModifierSpec, OntologyConfig, Settings};
pub use ontology::{
    Concept, ConceptIdentity, ConceptRecord, ConceptRef, Metadata, OntologyBuildError,
    OntologyResult, ScalarValue,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
