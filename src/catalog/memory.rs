//! HashMap-backed catalog, loadable from YAML

use super::{CatalogResult, Definition, DefinitionCatalog, ValueSetElement};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    definitions: Vec<Definition>,
}

/// In-memory definition catalog
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    definitions: HashMap<String, Definition>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition, replacing any with the same id.
    pub fn insert(&mut self, definition: Definition) {
        self.definitions.insert(definition.id.clone(), definition);
    }

    pub fn with_definition(mut self, definition: Definition) -> Self {
        self.insert(definition);
        self
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Parse a `definitions:` list.
    pub fn from_yaml_str(yaml: &str) -> CatalogResult<Self> {
        let doc: CatalogDocument = serde_yaml::from_str(yaml)?;
        Ok(doc.definitions.into_iter().fold(Self::new(), Self::with_definition))
    }

    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }
}

impl DefinitionCatalog for InMemoryCatalog {
    fn lookup(&self, id: &str) -> CatalogResult<Option<Definition>> {
        Ok(self.definitions.get(id).cloned())
    }

    fn values(&self, id: &str, property: &str) -> CatalogResult<Vec<ValueSetElement>> {
        Ok(self
            .definitions
            .get(id)
            .and_then(|d| d.properties.get(property))
            .cloned()
            .unwrap_or_default())
    }

    fn children(&self, id: &str) -> CatalogResult<Vec<String>> {
        Ok(self
            .definitions
            .get(id)
            .map(|d| d.children.clone())
            .unwrap_or_default())
    }
}
