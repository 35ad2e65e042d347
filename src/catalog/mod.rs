//! Definition catalog: the read-only knowledge source queried during a build

mod memory;

pub use memory::InMemoryCatalog;

use crate::ontology::ScalarValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors reading from a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog read error: {0}")]
    Read(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// One discrete value of a definition's property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueSetElement {
    pub value: ScalarValue,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl ValueSetElement {
    pub fn new(value: impl Into<ScalarValue>, display_name: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            display_name: Some(display_name.into()),
        }
    }

    /// The display name, falling back to the formatted value.
    pub fn label(&self) -> String {
        self.display_name
            .clone()
            .unwrap_or_else(|| self.value.to_string())
    }
}

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    pub id: String,
    pub display_name: String,
    /// Synthesized rather than backed by raw data
    #[serde(default)]
    pub derived: bool,
    /// Sub-definitions, top-down
    #[serde(default)]
    pub children: Vec<String>,
    /// Discrete value sets keyed by property name
    #[serde(default)]
    pub properties: BTreeMap<String, Vec<ValueSetElement>>,
}

impl Definition {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            derived: false,
            children: Vec::new(),
            properties: BTreeMap::new(),
        }
    }

    pub fn derived(mut self) -> Self {
        self.derived = true;
        self
    }

    pub fn with_child(mut self, child: impl Into<String>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_values(mut self, property: impl Into<String>, values: Vec<ValueSetElement>) -> Self {
        self.properties.insert(property.into(), values);
        self
    }
}

/// Read-only source of definitions
///
/// Queried synchronously while the ontology is built. Read failures are
/// propagated to the build unmodified.
pub trait DefinitionCatalog {
    /// Look up a definition by id.
    fn lookup(&self, id: &str) -> CatalogResult<Option<Definition>>;

    /// Discrete values of `property` on definition `id`, in catalog order.
    fn values(&self, id: &str, property: &str) -> CatalogResult<Vec<ValueSetElement>>;

    /// Ids of the definition's sub-definitions.
    fn children(&self, id: &str) -> CatalogResult<Vec<String>>;
}
