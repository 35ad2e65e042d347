//! Concept identities: the deduplication key for every concept
//!
//! Two concepts are the same concept exactly when their identities are equal,
//! no matter which builder discovered them or where they are attached.

use super::error::{OntologyBuildError, OntologyResult};
use super::graph::PATH_SEPARATOR;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum length of codes stored by the downstream dimension tables
pub const CODE_LENGTH: usize = 50;

/// Owning-context token for folders hard-coded by this crate
pub const INTERNAL_NAMESPACE: &str = "AIW";

/// Owning-context token for per-spec folder concepts
pub const FOLDER_NAMESPACE: &str = "AIW|Folders";

/// UUID v5 namespace for shortening over-long concept codes
const CONCEPT_CODE_NS: Uuid = Uuid::from_bytes([
    0x3f, 0x1d, 0x8a, 0x52, 0x6c, 0x0e, 0x4b, 0x7a,
    0x9e, 0x21, 0xd4, 0x85, 0x0c, 0x6f, 0xa3, 0x17,
]);

/// A non-integral numeric value
///
/// Compared and hashed by bit pattern so it can take part in identities.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Decimal(pub f64);

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Decimal {}

impl std::hash::Hash for Decimal {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::fmt::Display for Decimal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A discrete value a definition's property can take
///
/// Untagged so catalogs can write plain scalars. Integers become `Number`,
/// other numbers `Decimal`, and strings that parse as ISO dates `Date`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Boolean(bool),
    Number(i64),
    Decimal(Decimal),
    Date(NaiveDate),
    Nominal(String),
}

impl std::fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", n),
            Self::Decimal(d) => write!(f, "{}", d),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Nominal(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(s: &str) -> Self {
        Self::Nominal(s.to_string())
    }
}

impl From<i64> for ScalarValue {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

/// Identity derived from a display name within an owning context
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NameIdentity {
    namespace: String,
    name: String,
}

impl NameIdentity {
    /// Whitespace in the name is collapsed so that builders spelling the
    /// same folder slightly differently still converge on one identity.
    pub fn new(name: &str, namespace: &str) -> Self {
        Self {
            namespace: namespace.trim().to_string(),
            name: sanitize(name),
        }
    }

    /// A hard-coded folder identity (`AIW|<suffix>`).
    pub fn internal(suffix: &str) -> Self {
        Self::new(suffix, INTERNAL_NAMESPACE)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn id(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}|{}", self.namespace, self.name)
        }
    }
}

/// Identity mirroring a catalog definition, one of its properties, and
/// optionally one discrete value of that property
///
/// Absent fields are distinct from present-but-empty ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompositeIdentity {
    definition_id: String,
    property: Option<String>,
    value: Option<ScalarValue>,
}

impl CompositeIdentity {
    pub fn new(
        definition_id: impl Into<String>,
        property: Option<String>,
        value: Option<ScalarValue>,
    ) -> Self {
        Self {
            definition_id: definition_id.into(),
            property,
            value,
        }
    }

    /// Identity of the definition itself.
    pub fn definition(definition_id: impl Into<String>) -> Self {
        Self::new(definition_id, None, None)
    }

    pub fn definition_id(&self) -> &str {
        &self.definition_id
    }

    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }

    pub fn value(&self) -> Option<&ScalarValue> {
        self.value.as_ref()
    }

    /// The key tuple used by the composite-identity memo.
    pub fn key(&self) -> CompositeKey {
        (
            self.definition_id.clone(),
            self.property.clone(),
            self.value.clone(),
        )
    }

    pub fn id(&self) -> String {
        let mut id = self.definition_id.clone();
        if let Some(ref property) = self.property {
            id.push('.');
            id.push_str(property);
        }
        if let Some(ref value) = self.value {
            id.push('=');
            id.push_str(&value.to_string());
        }
        id
    }
}

/// Raw key tuple of a composite identity
pub type CompositeKey = (String, Option<String>, Option<ScalarValue>);

/// The deduplication key of a concept
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ConceptIdentity {
    Name(NameIdentity),
    Composite(CompositeIdentity),
}

impl ConceptIdentity {
    pub fn name(name: &str, namespace: &str) -> Self {
        Self::Name(NameIdentity::new(name, namespace))
    }

    pub fn internal(suffix: &str) -> Self {
        Self::Name(NameIdentity::internal(suffix))
    }

    pub fn composite(
        definition_id: impl Into<String>,
        property: Option<String>,
        value: Option<ScalarValue>,
    ) -> Self {
        Self::Composite(CompositeIdentity::new(definition_id, property, value))
    }

    /// Stable string form, used for derived-concept extraction and as the
    /// body of the concept code.
    pub fn id(&self) -> String {
        match self {
            Self::Name(n) => n.id(),
            Self::Composite(c) => c.id(),
        }
    }

    /// Derive the concept code for this identity.
    ///
    /// The code is `prefix:id` (or `id` alone). Codes longer than
    /// [`CODE_LENGTH`] are replaced by the prefix plus a UUID v5 digest of
    /// the full code. Codes containing the hierarchy path separator are
    /// rejected.
    pub fn concept_code(&self, prefix: Option<&str>) -> OntologyResult<String> {
        let id = sanitize(&self.id());
        if id.is_empty() {
            return Err(invalid(&id, "empty after sanitization"));
        }
        if id.chars().any(char::is_control) {
            return Err(invalid(&id, "contains control characters"));
        }
        let prefix = prefix.map(sanitize).filter(|p| !p.is_empty());
        let code = with_prefix(prefix.as_deref(), &id);
        if code.contains(PATH_SEPARATOR) {
            return Err(invalid(&code, "contains the hierarchy path separator"));
        }
        if code.chars().count() <= CODE_LENGTH {
            return Ok(code);
        }

        let digest = Uuid::new_v5(&CONCEPT_CODE_NS, code.as_bytes())
            .simple()
            .to_string();
        let short = with_prefix(prefix.as_deref(), &digest);
        if short.chars().count() > CODE_LENGTH {
            return Err(invalid(&code, "prefix too long to shorten code"));
        }
        Ok(short)
    }
}

impl std::fmt::Display for ConceptIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl From<NameIdentity> for ConceptIdentity {
    fn from(id: NameIdentity) -> Self {
        Self::Name(id)
    }
}

impl From<CompositeIdentity> for ConceptIdentity {
    fn from(id: CompositeIdentity) -> Self {
        Self::Composite(id)
    }
}

fn sanitize(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn with_prefix(prefix: Option<&str>, body: &str) -> String {
    match prefix {
        Some(p) => format!("{}:{}", p, body),
        None => body.to_string(),
    }
}

fn invalid(code: &str, reason: &str) -> OntologyBuildError {
    OntologyBuildError::InvalidConceptCode {
        code: code.to_string(),
        reason: reason.to_string(),
    }
}
