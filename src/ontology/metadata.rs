//! Metadata: owns the ontology and runs its construction
//!
//! Construction runs in strict phases: folder specs, then phenotypes and
//! demographics, then the provider folder, then hierarchy path
//! materialization. Any error aborts the whole build.

use super::cache::IdentityCache;
use super::concept::{to_source_system_code, Concept, ConceptRef, DataType, VisualAttributes};
use super::error::{OntologyBuildError, OntologyResult};
use super::graph::{child_path, BreadthFirst, ConceptGraph, DepthFirst};
use super::identity::{CompositeIdentity, ConceptIdentity, ScalarValue, FOLDER_NAMESPACE};
use super::records::ConceptRecord;
use crate::builder::{
    age_identity, demographics_builder, PhenotypesBuilder, PropositionConceptTreeBuilder,
    ProviderConceptTreeBuilder, ProviderRecord, SubtreeBuilder, ValueSetConceptTreeBuilder,
};
use crate::catalog::DefinitionCatalog;
use crate::config::{FolderSpec, OntologyConfig, Settings};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// The constructed ontology
///
/// Built once by [`Metadata::new`]. Afterwards the only mutations are
/// [`add_provider`](Self::add_provider) and [`mark_in_use`](Self::mark_in_use);
/// callers sharing a `Metadata` across threads must serialize those
/// themselves.
#[derive(Debug)]
pub struct Metadata {
    graph: ConceptGraph,
    cache: IdentityCache,
    /// Concept code to the concept that owns it
    codes: HashMap<String, ConceptRef>,
    concept_root: ConceptRef,
    modifier_roots: Vec<ConceptRef>,
    source_system_code: String,
    settings: Settings,
    folder_specs: Vec<FolderSpec>,
    phenotypes: Vec<String>,
    provider_builder: Option<ProviderConceptTreeBuilder>,
    /// Set once hierarchy paths have been materialized
    constructed: bool,
}

impl Metadata {
    /// Build the ontology described by `config`, reading definitions from
    /// `catalog`.
    pub fn new(config: &OntologyConfig, catalog: &dyn DefinitionCatalog) -> OntologyResult<Self> {
        let settings = config.settings.clone();
        let source_system_code =
            to_source_system_code(Some(&settings.source_system_code)).unwrap_or_default();

        let identity = ConceptIdentity::name(&settings.root_node_name, "");
        let mut root = Concept::new(identity.clone(), None)?;
        root.set_display_name(settings.root_node_name.clone());
        root.set_data_type(DataType::Text);
        root.set_source_system_code(Some(&source_system_code));
        root.set_visual_attributes(VisualAttributes::Container);

        let mut graph = ConceptGraph::new();
        let mut cache = IdentityCache::new();
        let concept_root = graph.insert(root);
        cache.insert(identity, concept_root)?;
        let codes = HashMap::from([(graph[concept_root].concept_code().to_string(), concept_root)]);

        let mut metadata = Self {
            graph,
            cache,
            codes,
            concept_root,
            modifier_roots: Vec::new(),
            source_system_code,
            settings,
            folder_specs: config.folder_specs.clone(),
            phenotypes: config.phenotypes.clone(),
            provider_builder: None,
            constructed: false,
        };
        metadata.construct(catalog)?;
        Ok(metadata)
    }

    fn construct(&mut self, catalog: &dyn DefinitionCatalog) -> OntologyResult<()> {
        let root = self.concept_root;

        debug!(count = self.folder_specs.len(), "STEP: folder specs");
        let specs = self.folder_specs.clone();
        for spec in &specs {
            self.process_folder_spec(spec, catalog)?;
        }

        debug!("STEP: phenotypes and demographics");
        let mut phenotypes = PhenotypesBuilder::new(catalog, self.phenotypes.clone());
        self.run(&mut phenotypes, root)?;
        let mut demographics = demographics_builder(catalog, &self.settings);
        self.run(&mut demographics, root)?;

        debug!("STEP: providers");
        let mut providers = ProviderConceptTreeBuilder::new(self.settings.skip_provider_hierarchy);
        self.run(&mut providers, root)?;
        self.provider_builder = Some(providers);

        debug!("STEP: hierarchy paths");
        self.materialize_hierarchy_paths();
        self.cache.clear_memo();
        self.constructed = true;

        info!(
            concepts = self.cache.len(),
            modifier_roots = self.modifier_roots.len(),
            "ontology constructed"
        );
        Ok(())
    }

    fn process_folder_spec(
        &mut self,
        spec: &FolderSpec,
        catalog: &dyn DefinitionCatalog,
    ) -> OntologyResult<()> {
        match spec.property {
            None => {
                let parent = if spec.use_folder_concept {
                    self.folder_concept(spec)?
                } else {
                    self.concept_root
                };
                let mut builder = PropositionConceptTreeBuilder::from_folder_spec(catalog, spec);
                self.run(&mut builder, parent)?;
                for &r in builder.roots() {
                    self.add_modifier_root(r);
                }
                Ok(())
            }
            Some(ref property) => {
                for definition_id in &spec.propositions {
                    self.property_container(spec, definition_id, property, catalog)
                        .map_err(|e| {
                            e.in_builder(format!("folder:{}", spec.display_name), self.root_code())
                        })?;
                }
                Ok(())
            }
        }
    }

    /// Container for a definition whose property values become its children.
    fn property_container(
        &mut self,
        spec: &FolderSpec,
        definition_id: &str,
        property: &str,
        catalog: &dyn DefinitionCatalog,
    ) -> OntologyResult<()> {
        let identity = self.composite_identity(definition_id, None, None)?;
        let concept = match self.get(&identity) {
            Some(existing) => existing,
            None => {
                let definition = catalog
                    .lookup(definition_id)?
                    .ok_or_else(|| OntologyBuildError::UnknownDefinition(definition_id.to_string()))?;
                let ssc = self.source_system_code.clone();
                let created =
                    self.new_concept(identity, spec.concept_code_prefix.as_deref(), Some(&ssc))?;
                let c = self.concept_mut(created);
                c.set_display_name(definition.display_name);
                c.set_data_type(DataType::Text);
                created
            }
        };
        self.concept_mut(concept).set_already_loaded(spec.already_loaded);
        self.attach(self.concept_root, concept);

        let mut values = ValueSetConceptTreeBuilder::new(
            catalog,
            definition_id,
            property,
            spec.concept_code_prefix.clone(),
        );
        self.run(&mut values, concept)
    }

    /// Per-spec container for a proposition-driven folder spec.
    fn folder_concept(&mut self, spec: &FolderSpec) -> OntologyResult<ConceptRef> {
        let identity = ConceptIdentity::name(&spec.display_name, FOLDER_NAMESPACE);
        let concept = self.get_or_create_concept(identity, spec.concept_code_prefix.as_deref())?;
        {
            let c = self.concept_mut(concept);
            c.set_display_name(spec.display_name.clone());
            c.set_data_type(DataType::Text);
            c.set_already_loaded(spec.already_loaded);
            c.set_visual_attributes(VisualAttributes::Container);
        }
        self.attach(self.concept_root, concept);
        Ok(concept)
    }

    /// Run a builder under `parent`, wrapping any failure with the builder
    /// and parent it came from.
    pub fn run(&mut self, builder: &mut dyn SubtreeBuilder, parent: ConceptRef) -> OntologyResult<()> {
        debug!(builder = builder.id(), under = self.concept(parent).concept_code(), "build");
        builder
            .build(self, parent)
            .map_err(|e| e.in_builder(builder.id(), self.concept(parent).concept_code()))
    }

    /// Record each visited position's path on the canonical concept for its
    /// identity, across the main root and every modifier root.
    fn materialize_hierarchy_paths(&mut self) {
        let mut paths = Vec::new();
        for root in self.all_roots() {
            for visit in self.graph.breadth_first(root) {
                if let Some(canonical) = self.cache.get(self.graph[visit.concept].identity()) {
                    paths.push((canonical, visit.full_name));
                }
            }
        }
        debug!(positions = paths.len(), "materializing hierarchy paths");
        for (canonical, path) in paths {
            self.graph[canonical].add_hierarchy_path(path);
        }
    }

    /// Give `child` the paths of every position of `parent`. Used for
    /// concepts attached after materialization has run.
    pub(crate) fn extend_hierarchy_paths(&mut self, parent: ConceptRef, child: ConceptRef) {
        if !self.constructed {
            return;
        }
        let code = self.graph[child].concept_code().to_string();
        let paths: Vec<String> = self.graph[parent]
            .hierarchy_paths()
            .iter()
            .map(|p| child_path(p, &code))
            .collect();
        let canonical = self.cache.get(self.graph[child].identity()).unwrap_or(child);
        for path in paths {
            self.graph[canonical].add_hierarchy_path(path);
        }
    }

    // -----------------------------------------------------------------------
    // Identity cache
    // -----------------------------------------------------------------------

    /// The canonical concept for `identity`, if one exists.
    pub fn get(&self, identity: &ConceptIdentity) -> Option<ConceptRef> {
        self.cache.get(identity)
    }

    /// Store `concept` as the canonical concept for its identity.
    ///
    /// Fails if the identity already has a concept, or if another identity
    /// already renders to the same concept code.
    pub fn insert(&mut self, concept: Concept) -> OntologyResult<ConceptRef> {
        if self.cache.contains(concept.identity()) {
            return Err(OntologyBuildError::DuplicateIdentity(concept.identity().id()));
        }
        if let Some(&existing) = self.codes.get(concept.concept_code()) {
            return Err(OntologyBuildError::DuplicateConceptCode {
                code: concept.concept_code().to_string(),
                identity: concept.identity().id(),
                existing: self.concept(existing).identity().id(),
            });
        }
        let identity = concept.identity().clone();
        let code = concept.concept_code().to_string();
        let r = self.graph.insert(concept);
        self.cache.insert(identity, r)?;
        self.codes.insert(code, r);
        Ok(r)
    }

    /// Create a concept that must not exist yet. Its display name starts
    /// out as its concept code.
    pub fn new_concept(
        &mut self,
        identity: ConceptIdentity,
        prefix: Option<&str>,
        source_system_code: Option<&str>,
    ) -> OntologyResult<ConceptRef> {
        if self.cache.contains(&identity) {
            return Err(OntologyBuildError::DuplicateIdentity(identity.id()));
        }
        let mut concept = Concept::new(identity, prefix)?;
        concept.set_source_system_code(source_system_code);
        self.insert(concept)
    }

    /// Reuse the canonical concept for `identity` or create it.
    pub fn get_or_create_concept(
        &mut self,
        identity: ConceptIdentity,
        prefix: Option<&str>,
    ) -> OntologyResult<ConceptRef> {
        match self.get(&identity) {
            Some(existing) => Ok(existing),
            None => {
                let ssc = self.source_system_code.clone();
                self.new_concept(identity, prefix, Some(&ssc))
            }
        }
    }

    /// A structural folder keyed by `AIW|<suffixes joined by |>`, displayed
    /// under its last suffix.
    pub fn get_or_create_hard_coded_folder(&mut self, suffixes: &[&str]) -> OntologyResult<ConceptRef> {
        let identity = ConceptIdentity::internal(&suffixes.join("|"));
        if let Some(existing) = self.get(&identity) {
            return Ok(existing);
        }
        let ssc = self.source_system_code.clone();
        let folder = self.new_concept(identity, None, Some(&ssc))?;
        let c = self.concept_mut(folder);
        c.set_display_name(suffixes.last().copied().unwrap_or_default());
        c.set_data_type(DataType::Text);
        Ok(folder)
    }

    /// Composite identity for a definition, property and value, memoized
    /// while the ontology is being constructed.
    pub fn composite_identity(
        &mut self,
        definition_id: &str,
        property: Option<&str>,
        value: Option<ScalarValue>,
    ) -> OntologyResult<ConceptIdentity> {
        let composite = CompositeIdentity::new(definition_id, property.map(str::to_string), value);
        if self.constructed {
            return Ok(composite.into());
        }
        let key = composite.key();
        if let Some(found) = self.cache.lookup_memo(&key) {
            return Ok(found.clone());
        }
        let identity = ConceptIdentity::from(composite);
        self.cache.memoize(key, identity.clone())?;
        Ok(identity)
    }

    pub fn identity_cache(&self) -> &IdentityCache {
        &self.cache
    }

    // -----------------------------------------------------------------------
    // Tree
    // -----------------------------------------------------------------------

    pub fn concept(&self, r: ConceptRef) -> &Concept {
        &self.graph[r]
    }

    pub fn concept_mut(&mut self, r: ConceptRef) -> &mut Concept {
        &mut self.graph[r]
    }

    /// Attach `child` under `parent`; re-attaching is a no-op.
    ///
    /// An edge that would make `parent` its own descendant is skipped with a
    /// warning, which keeps every traversal finite.
    pub fn attach(&mut self, parent: ConceptRef, child: ConceptRef) -> bool {
        if self.graph.reaches(child, parent) {
            warn!(
                parent = self.concept(parent).concept_code(),
                child = self.concept(child).concept_code(),
                "edge would create a cycle, skipping"
            );
            return false;
        }
        self.graph.attach(parent, child)
    }

    pub fn graph(&self) -> &ConceptGraph {
        &self.graph
    }

    pub fn breadth_first(&self, root: ConceptRef) -> BreadthFirst<'_> {
        self.graph.breadth_first(root)
    }

    pub fn depth_first(&self, root: ConceptRef) -> DepthFirst<'_> {
        self.graph.depth_first(root)
    }

    pub fn concept_root(&self) -> ConceptRef {
        self.concept_root
    }

    pub fn add_modifier_root(&mut self, concept: ConceptRef) {
        if !self.modifier_roots.contains(&concept) {
            self.modifier_roots.push(concept);
        }
    }

    pub fn modifier_roots(&self) -> &[ConceptRef] {
        &self.modifier_roots
    }

    /// The main root followed by every modifier root.
    pub fn all_roots(&self) -> Vec<ConceptRef> {
        std::iter::once(self.concept_root)
            .chain(self.modifier_roots.iter().copied())
            .collect()
    }

    fn root_code(&self) -> String {
        self.concept(self.concept_root).concept_code().to_string()
    }

    // -----------------------------------------------------------------------
    // Post-construction
    // -----------------------------------------------------------------------

    /// Identifiers of every derived concept under the main root, once each.
    pub fn extract_derived(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.graph
            .depth_first(self.concept_root)
            .map(|visit| &self.graph[visit.concept])
            .filter(|c| c.is_derived())
            .map(|c| c.identity().id())
            .filter(|id| seen.insert(id.clone()))
            .collect()
    }

    /// Flag the age concept for `age_in_years` as in use. Ages without a
    /// concept are ignored; returns whether one was found.
    pub fn mark_in_use(&mut self, age_in_years: i64) -> bool {
        match self.cache.get(&age_identity(age_in_years)) {
            Some(concept) => {
                self.graph[concept].set_in_use(true);
                true
            }
            None => false,
        }
    }

    /// Merge a provider seen during data loading into the provider folder.
    pub fn add_provider(&mut self, record: &ProviderRecord) -> OntologyResult<Option<ConceptRef>> {
        let Some(mut builder) = self.provider_builder.take() else {
            return Ok(None);
        };
        let result = builder.add(self, record);
        self.provider_builder = Some(builder);
        result
    }

    /// One record per canonical concept, in creation order.
    pub fn concept_records(&self) -> Vec<ConceptRecord> {
        self.cache
            .concepts()
            .iter()
            .map(|&r| ConceptRecord::from(self.concept(r)))
            .collect()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn folder_specs(&self) -> &[FolderSpec] {
        &self.folder_specs
    }

    pub fn phenotype_ids(&self) -> &[String] {
        &self.phenotypes
    }

    /// At most 50 characters.
    pub fn source_system_code(&self) -> &str {
        &self.source_system_code
    }
}
