//! Identity cache: one canonical concept per identity

use super::concept::ConceptRef;
use super::error::{OntologyBuildError, OntologyResult};
use super::identity::{CompositeKey, ConceptIdentity};
use std::collections::HashMap;

/// Maps each identity to its single canonical concept, and memoizes
/// composite identities by their raw key tuple.
///
/// Both maps are insert-once: a second insertion for the same key is a
/// builder defect and is reported as an error rather than overwritten.
#[derive(Debug, Default)]
pub struct IdentityCache {
    entries: HashMap<ConceptIdentity, ConceptRef>,
    /// Insertion order, for deterministic listing
    order: Vec<ConceptRef>,
    memo: HashMap<CompositeKey, ConceptIdentity>,
}

impl IdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, identity: &ConceptIdentity) -> Option<ConceptRef> {
        self.entries.get(identity).copied()
    }

    pub fn contains(&self, identity: &ConceptIdentity) -> bool {
        self.entries.contains_key(identity)
    }

    /// Register the canonical concept for `identity`.
    pub fn insert(&mut self, identity: ConceptIdentity, concept: ConceptRef) -> OntologyResult<()> {
        if self.entries.contains_key(&identity) {
            return Err(OntologyBuildError::DuplicateIdentity(identity.id()));
        }
        self.entries.insert(identity, concept);
        self.order.push(concept);
        Ok(())
    }

    /// Canonical concepts in insertion order.
    pub fn concepts(&self) -> &[ConceptRef] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn memoize(&mut self, key: CompositeKey, identity: ConceptIdentity) -> OntologyResult<()> {
        if self.memo.contains_key(&key) {
            return Err(OntologyBuildError::DuplicateConceptId(identity.id()));
        }
        self.memo.insert(key, identity);
        Ok(())
    }

    pub fn lookup_memo(&self, key: &CompositeKey) -> Option<&ConceptIdentity> {
        self.memo.get(key)
    }

    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }

    /// Drop every memoized identity. Called once construction finishes.
    pub fn clear_memo(&mut self) {
        self.memo.clear();
        self.memo.shrink_to_fit();
    }
}
