//! Composite builder: one container, then each child builder under it

use super::traits::SubtreeBuilder;
use crate::ontology::{ConceptRef, Metadata, OntologyResult, VisualAttributes};
use tracing::debug;

/// Builds a named container folder and runs a fixed list of child builders
/// beneath it, in order.
pub struct ParentBuilder<'a> {
    id: String,
    display_name: String,
    id_suffix: String,
    skip: bool,
    children: Vec<Box<dyn SubtreeBuilder + 'a>>,
    roots: Vec<ConceptRef>,
}

impl<'a> ParentBuilder<'a> {
    /// `id_suffix` keys the container's hard-coded folder identity.
    /// When `skip` is set the whole subtree is omitted.
    pub fn new(
        display_name: impl Into<String>,
        id_suffix: impl Into<String>,
        skip: bool,
        children: Vec<Box<dyn SubtreeBuilder + 'a>>,
    ) -> Self {
        let display_name = display_name.into();
        Self {
            id: format!("parent:{}", display_name),
            display_name,
            id_suffix: id_suffix.into(),
            skip,
            children,
            roots: Vec::new(),
        }
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

impl SubtreeBuilder for ParentBuilder<'_> {
    fn id(&self) -> &str {
        &self.id
    }

    fn build(&mut self, metadata: &mut Metadata, parent: ConceptRef) -> OntologyResult<()> {
        if self.skip {
            debug!(builder = %self.id, "skipped by configuration");
            return Ok(());
        }

        let container = metadata.get_or_create_hard_coded_folder(&[self.id_suffix.as_str()])?;
        metadata.attach(parent, container);
        {
            let concept = metadata.concept_mut(container);
            concept.set_display_name(self.display_name.clone());
            concept.set_visual_attributes(VisualAttributes::Container);
        }

        for child in &mut self.children {
            metadata.run(child.as_mut(), container)?;
        }

        self.roots = vec![container];
        Ok(())
    }

    fn roots(&self) -> &[ConceptRef] {
        &self.roots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::config::{OntologyConfig, Settings};
    use crate::ontology::{ConceptIdentity, OntologyBuildError};

    /// Records where it was built and creates one named leaf.
    struct LeafBuilder {
        name: &'static str,
        fail: bool,
    }

    impl SubtreeBuilder for LeafBuilder {
        fn id(&self) -> &str {
            self.name
        }

        fn build(&mut self, metadata: &mut Metadata, parent: ConceptRef) -> OntologyResult<()> {
            if self.fail {
                return Err(OntologyBuildError::UnknownDefinition(self.name.to_string()));
            }
            let leaf = metadata.get_or_create_hard_coded_folder(&["Test", self.name])?;
            metadata.attach(parent, leaf);
            Ok(())
        }
    }

    fn empty_metadata() -> Metadata {
        let config = OntologyConfig {
            settings: Settings {
                skip_demographics_hierarchy: true,
                skip_provider_hierarchy: true,
                ..Settings::default()
            },
            ..OntologyConfig::default()
        };
        Metadata::new(&config, &InMemoryCatalog::new()).unwrap()
    }

    fn leaf(name: &'static str) -> Box<dyn SubtreeBuilder> {
        Box::new(LeafBuilder { name, fail: false })
    }

    #[test]
    fn builds_container_then_children_in_order() {
        let mut metadata = empty_metadata();
        let root = metadata.concept_root();
        let mut builder = ParentBuilder::new("Group", "Group", false, vec![leaf("first"), leaf("second")]);

        metadata.run(&mut builder, root).unwrap();

        let container = builder.roots()[0];
        assert_eq!(metadata.concept(container).display_name(), "Group");
        assert_eq!(metadata.concept(container).visual_attributes(), VisualAttributes::Container);
        assert!(metadata.concept(root).children().contains(&container));

        let names: Vec<_> = metadata
            .concept(container)
            .children()
            .iter()
            .map(|c| metadata.concept(*c).display_name().to_string())
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn skip_flag_omits_subtree() {
        let mut metadata = empty_metadata();
        let root = metadata.concept_root();
        let before = metadata.concept(root).children().len();
        let mut builder = ParentBuilder::new("Group", "Group", true, vec![leaf("first")]);

        metadata.run(&mut builder, root).unwrap();

        assert!(builder.roots().is_empty());
        assert_eq!(metadata.concept(root).children().len(), before);
        assert!(metadata.get(&ConceptIdentity::internal("Group")).is_none());
    }

    #[test]
    fn rebuilding_reuses_container() {
        let mut metadata = empty_metadata();
        let root = metadata.concept_root();
        let mut first = ParentBuilder::new("Group", "Group", false, vec![leaf("a")]);
        let mut second = ParentBuilder::new("Group", "Group", false, vec![leaf("a")]);

        metadata.run(&mut first, root).unwrap();
        metadata.run(&mut second, root).unwrap();

        assert_eq!(first.roots(), second.roots());
        let container = first.roots()[0];
        assert_eq!(metadata.concept(container).children().len(), 1);
    }

    #[test]
    fn child_failure_aborts_with_context() {
        let mut metadata = empty_metadata();
        let root = metadata.concept_root();
        let mut builder = ParentBuilder::new(
            "Group",
            "Group",
            false,
            vec![
                Box::new(LeafBuilder { name: "broken", fail: true }) as Box<dyn SubtreeBuilder>,
                leaf("never"),
            ],
        );

        let err = metadata.run(&mut builder, root).unwrap_err();
        assert!(matches!(err, OntologyBuildError::Builder { .. }));
        assert!(matches!(err.root_cause(), OntologyBuildError::UnknownDefinition(id) if id == "broken"));
        assert!(metadata.get(&ConceptIdentity::internal("Test|never")).is_none());
        assert!(builder.roots().is_empty());
    }
}
