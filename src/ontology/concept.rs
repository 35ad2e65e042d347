//! Concept nodes in the ontology

use super::error::OntologyResult;
use super::identity::{ConceptIdentity, CODE_LENGTH};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Handle to a concept stored in a [`ConceptGraph`](super::ConceptGraph)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConceptRef(usize);

impl ConceptRef {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for ConceptRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Value type of the observations a concept describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    #[default]
    Text,
    Numeric,
    Date,
}

impl DataType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Text => "T",
            Self::Numeric => "N",
            Self::Date => "D",
        }
    }
}

/// How the concept is presented: container, folder, leaf, or their
/// modifier counterparts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualAttributes {
    Container,
    Folder,
    Leaf,
    ModifierContainer,
    ModifierFolder,
    ModifierLeaf,
}

impl VisualAttributes {
    /// Three-letter code: kind, active, editable.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Container => "CAE",
            Self::Folder => "FAE",
            Self::Leaf => "LAE",
            Self::ModifierContainer => "DAE",
            Self::ModifierFolder => "OAE",
            Self::ModifierLeaf => "RAE",
        }
    }
}

/// Truncate a source system code to the column width downstream.
pub fn to_source_system_code(code: Option<&str>) -> Option<String> {
    code.map(|c| c.chars().take(CODE_LENGTH).collect())
}

/// A concept in the ontology
///
/// The identity and concept code are fixed at creation. Everything else is
/// set by builders while the tree is assembled, and `in_use` may flip later
/// during data loading.
#[derive(Debug, Clone)]
pub struct Concept {
    identity: ConceptIdentity,
    concept_code: String,
    display_name: String,
    data_type: DataType,
    source_system_code: Option<String>,
    visual_attributes: Option<VisualAttributes>,
    derived: bool,
    already_loaded: bool,
    in_use: bool,
    hierarchy_paths: BTreeSet<String>,
    children: Vec<ConceptRef>,
}

impl Concept {
    /// Create a concept, deriving its code from the identity and prefix.
    ///
    /// The display name starts out as the concept code.
    pub fn new(identity: ConceptIdentity, prefix: Option<&str>) -> OntologyResult<Self> {
        let concept_code = identity.concept_code(prefix)?;
        Ok(Self {
            identity,
            display_name: concept_code.clone(),
            concept_code,
            data_type: DataType::default(),
            source_system_code: None,
            visual_attributes: None,
            derived: false,
            already_loaded: false,
            in_use: false,
            hierarchy_paths: BTreeSet::new(),
            children: Vec::new(),
        })
    }

    pub fn identity(&self) -> &ConceptIdentity {
        &self.identity
    }

    pub fn concept_code(&self) -> &str {
        &self.concept_code
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn set_display_name(&mut self, display_name: impl Into<String>) {
        self.display_name = display_name.into();
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn set_data_type(&mut self, data_type: DataType) {
        self.data_type = data_type;
    }

    pub fn source_system_code(&self) -> Option<&str> {
        self.source_system_code.as_deref()
    }

    /// Stored truncated to [`CODE_LENGTH`] characters.
    pub fn set_source_system_code(&mut self, code: Option<&str>) {
        self.source_system_code = to_source_system_code(code);
    }

    /// Explicit attributes if set, otherwise leaf or folder by child count.
    pub fn visual_attributes(&self) -> VisualAttributes {
        match self.visual_attributes {
            Some(va) => va,
            None if self.children.is_empty() => VisualAttributes::Leaf,
            None => VisualAttributes::Folder,
        }
    }

    pub fn set_visual_attributes(&mut self, va: VisualAttributes) {
        self.visual_attributes = Some(va);
    }

    pub fn is_derived(&self) -> bool {
        self.derived
    }

    pub fn set_derived(&mut self, derived: bool) {
        self.derived = derived;
    }

    pub fn is_already_loaded(&self) -> bool {
        self.already_loaded
    }

    pub fn set_already_loaded(&mut self, already_loaded: bool) {
        self.already_loaded = already_loaded;
    }

    pub fn is_in_use(&self) -> bool {
        self.in_use
    }

    pub fn set_in_use(&mut self, in_use: bool) {
        self.in_use = in_use;
    }

    pub fn hierarchy_paths(&self) -> &BTreeSet<String> {
        &self.hierarchy_paths
    }

    /// Returns false if the path was already recorded.
    pub fn add_hierarchy_path(&mut self, path: impl Into<String>) -> bool {
        self.hierarchy_paths.insert(path.into())
    }

    pub fn children(&self) -> &[ConceptRef] {
        &self.children
    }

    /// Append a child edge; attaching the same child twice is a no-op.
    pub(crate) fn attach_child(&mut self, child: ConceptRef) -> bool {
        if self.children.contains(&child) {
            return false;
        }
        self.children.push(child);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concept() -> Concept {
        Concept::new(ConceptIdentity::composite("LAB:GLUCOSE", None, None), None).unwrap()
    }

    #[test]
    fn display_name_defaults_to_code() {
        let c = concept();
        assert_eq!(c.display_name(), "LAB:GLUCOSE");
        assert_eq!(c.concept_code(), "LAB:GLUCOSE");
    }

    #[test]
    fn source_system_code_truncated_to_column_width() {
        let mut c = concept();
        let long = "s".repeat(75);
        c.set_source_system_code(Some(&long));
        assert_eq!(c.source_system_code(), Some(&long[..50]));

        let exact = "e".repeat(50);
        c.set_source_system_code(Some(&exact));
        assert_eq!(c.source_system_code(), Some(exact.as_str()));

        c.set_source_system_code(None);
        assert_eq!(c.source_system_code(), None);
    }

    #[test]
    fn visual_attributes_follow_children_unless_set() {
        let mut c = concept();
        assert_eq!(c.visual_attributes(), VisualAttributes::Leaf);
        c.attach_child(ConceptRef::new(7));
        assert_eq!(c.visual_attributes(), VisualAttributes::Folder);
        c.set_visual_attributes(VisualAttributes::Container);
        assert_eq!(c.visual_attributes().code(), "CAE");
    }

    #[test]
    fn attaching_same_child_twice_is_noop() {
        let mut c = concept();
        assert!(c.attach_child(ConceptRef::new(1)));
        assert!(!c.attach_child(ConceptRef::new(1)));
        assert_eq!(c.children().len(), 1);
    }

    #[test]
    fn hierarchy_paths_accumulate_as_a_set() {
        let mut c = concept();
        assert!(c.add_hierarchy_path("\\A\\B\\"));
        assert!(!c.add_hierarchy_path("\\A\\B\\"));
        assert!(c.add_hierarchy_path("\\C\\B\\"));
        assert_eq!(c.hierarchy_paths().len(), 2);
    }
}
