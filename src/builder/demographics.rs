//! Demographics: age plus six catalog-driven axes under one container

use super::parent::ParentBuilder;
use super::traits::SubtreeBuilder;
use super::value_set::ValueSetConceptTreeBuilder;
use crate::catalog::DefinitionCatalog;
use crate::config::{AxisSource, Settings};
use crate::ontology::{
    ConceptIdentity, ConceptRef, DataType, Metadata, OntologyResult, ScalarValue,
    VisualAttributes,
};

/// Definition id that age concepts' composite identities are keyed by
pub const AGE_DEFINITION_ID: &str = "AIW|Demographics|Age";

/// Oldest age with its own concept
pub const MAX_AGE: i64 = 120;

/// Age range folders, inclusive bounds
const AGE_RANGES: &[(i64, i64, &str)] = &[
    (0, 17, "0-17 years old"),
    (18, 34, "18-34 years old"),
    (35, 44, "35-44 years old"),
    (45, 54, "45-54 years old"),
    (55, 64, "55-64 years old"),
    (65, 74, "65-74 years old"),
    (75, 84, "75-84 years old"),
    (85, MAX_AGE, ">= 85 years old"),
];

/// Identity of the concept for one whole year of age.
pub fn age_identity(years: i64) -> ConceptIdentity {
    ConceptIdentity::composite(AGE_DEFINITION_ID, None, Some(ScalarValue::Number(years)))
}

/// The demographics container with its seven fixed axes, in display order.
pub fn demographics_builder<'a>(
    catalog: &'a dyn DefinitionCatalog,
    settings: &Settings,
) -> ParentBuilder<'a> {
    let sources = &settings.demographics;
    let axis = |name: &str, source: &Option<AxisSource>| -> Box<dyn SubtreeBuilder + 'a> {
        Box::new(DemographicAxisBuilder::new(catalog, name, source.clone()))
    };

    ParentBuilder::new(
        "Demographics",
        "Demographics",
        settings.skip_demographics_hierarchy,
        vec![
            Box::new(AgeBuilder::new()) as Box<dyn SubtreeBuilder + 'a>,
            axis("Gender", &sources.gender),
            axis("Language", &sources.language),
            axis("Marital Status", &sources.marital_status),
            axis("Race", &sources.race),
            axis("Religion", &sources.religion),
            axis("Vital Status", &sources.vital_status),
        ],
    )
}

/// Age folder with range sub-folders and one leaf per year.
#[derive(Debug, Default)]
pub struct AgeBuilder {
    roots: Vec<ConceptRef>,
}

impl AgeBuilder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SubtreeBuilder for AgeBuilder {
    fn id(&self) -> &str {
        "demographics:age"
    }

    fn build(&mut self, metadata: &mut Metadata, parent: ConceptRef) -> OntologyResult<()> {
        let folder = metadata.get_or_create_hard_coded_folder(&["Demographics", "Age"])?;
        metadata.attach(parent, folder);

        for &(low, high, label) in AGE_RANGES {
            let range = metadata.get_or_create_hard_coded_folder(&["Demographics", "Age", label])?;
            metadata.attach(folder, range);

            for years in low..=high {
                let identity =
                    metadata.composite_identity(AGE_DEFINITION_ID, None, Some(ScalarValue::Number(years)))?;
                let concept = metadata.get_or_create_concept(identity, None)?;
                {
                    let c = metadata.concept_mut(concept);
                    c.set_display_name(format!("{} years old", years));
                    c.set_data_type(DataType::Numeric);
                    c.set_visual_attributes(VisualAttributes::Leaf);
                }
                metadata.attach(range, concept);
            }
        }

        self.roots = vec![folder];
        Ok(())
    }

    fn roots(&self) -> &[ConceptRef] {
        &self.roots
    }
}

/// A demographic folder whose values come from a catalog value set.
///
/// Left empty when no source is configured.
pub struct DemographicAxisBuilder<'a> {
    id: String,
    catalog: &'a dyn DefinitionCatalog,
    display_name: String,
    source: Option<AxisSource>,
    roots: Vec<ConceptRef>,
}

impl<'a> DemographicAxisBuilder<'a> {
    pub fn new(
        catalog: &'a dyn DefinitionCatalog,
        display_name: impl Into<String>,
        source: Option<AxisSource>,
    ) -> Self {
        let display_name = display_name.into();
        Self {
            id: format!("demographics:{}", display_name),
            catalog,
            display_name,
            source,
            roots: Vec::new(),
        }
    }
}

impl SubtreeBuilder for DemographicAxisBuilder<'_> {
    fn id(&self) -> &str {
        &self.id
    }

    fn build(&mut self, metadata: &mut Metadata, parent: ConceptRef) -> OntologyResult<()> {
        let folder =
            metadata.get_or_create_hard_coded_folder(&["Demographics", self.display_name.as_str()])?;
        metadata.attach(parent, folder);
        metadata
            .concept_mut(folder)
            .set_visual_attributes(VisualAttributes::Folder);

        if let Some(ref source) = self.source {
            let mut values = ValueSetConceptTreeBuilder::new(
                self.catalog,
                source.definition.clone(),
                source.property.clone(),
                None,
            );
            metadata.run(&mut values, folder)?;
        }

        self.roots = vec![folder];
        Ok(())
    }

    fn roots(&self) -> &[ConceptRef] {
        &self.roots
    }
}
