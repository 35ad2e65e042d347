//! Errors raised while constructing the ontology

use crate::catalog::CatalogError;
use thiserror::Error;

/// Errors that abort ontology construction
///
/// Every variant is fatal: construction either completes or the partially
/// built `Metadata` is dropped.
#[derive(Debug, Error)]
pub enum OntologyBuildError {
    #[error("invalid concept code '{code}': {reason}")]
    InvalidConceptCode { code: String, reason: String },

    #[error("duplicate concept: {0}")]
    DuplicateIdentity(String),

    #[error("concept code '{code}' of {identity} is already used by {existing}")]
    DuplicateConceptCode {
        code: String,
        identity: String,
        existing: String,
    },

    #[error("concept id already memoized for key: {0}")]
    DuplicateConceptId(String),

    #[error("the definition '{0}' is unknown")]
    UnknownDefinition(String),

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("builder '{builder}' failed under '{parent}': {source}")]
    Builder {
        builder: String,
        parent: String,
        #[source]
        source: Box<OntologyBuildError>,
    },
}

impl OntologyBuildError {
    /// Wrap this error with the builder and parent it surfaced from.
    pub fn in_builder(self, builder: impl Into<String>, parent: impl Into<String>) -> Self {
        Self::Builder {
            builder: builder.into(),
            parent: parent.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, past any builder context.
    pub fn root_cause(&self) -> &OntologyBuildError {
        match self {
            Self::Builder { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Result type for ontology construction
pub type OntologyResult<T> = Result<T, OntologyBuildError>;
