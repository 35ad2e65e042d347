//! Subtree builders
//!
//! Each builder assembles one part of the ontology from one source: catalog
//! definitions, catalog value sets, or hard-coded structure. They compose
//! through [`SubtreeBuilder`] and share state only through [`Metadata`].
//!
//! [`Metadata`]: crate::ontology::Metadata

mod demographics;
mod parent;
mod phenotypes;
mod proposition;
mod provider;
mod traits;
mod value_set;

pub use demographics::{
    age_identity, demographics_builder, AgeBuilder, DemographicAxisBuilder, AGE_DEFINITION_ID,
    MAX_AGE,
};
pub use parent::ParentBuilder;
pub use phenotypes::PhenotypesBuilder;
pub use proposition::PropositionConceptTreeBuilder;
pub use provider::{ProviderConceptTreeBuilder, ProviderRecord, PROVIDER_DEFINITION_ID};
pub use traits::SubtreeBuilder;
pub use value_set::ValueSetConceptTreeBuilder;
