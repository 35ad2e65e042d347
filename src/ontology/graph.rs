//! Arena of concepts and the traversals over it
//!
//! Concepts are stored once and referenced by [`ConceptRef`]. A concept may be
//! attached under several parents, so traversals enumerate *positions*: each
//! distinct root-to-node chain is visited exactly once and carries its own
//! hierarchy path. Construction is strictly top-down, which keeps the
//! structure acyclic and the traversals finite.

use super::concept::{Concept, ConceptRef};
use std::collections::{HashSet, VecDeque};

/// Separator used in hierarchy paths
pub const PATH_SEPARATOR: char = '\\';

/// One visit of a traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    pub concept: ConceptRef,
    /// 0 for the traversal root
    pub depth: usize,
    /// `\code\code\...\` from the traversal root to this position
    pub full_name: String,
}

/// Owns every concept created during one ontology build
#[derive(Debug, Clone, Default)]
pub struct ConceptGraph {
    concepts: Vec<Concept>,
}

impl ConceptGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a concept, returning its handle.
    pub fn insert(&mut self, concept: Concept) -> ConceptRef {
        self.concepts.push(concept);
        ConceptRef::new(self.concepts.len() - 1)
    }

    pub fn get(&self, r: ConceptRef) -> Option<&Concept> {
        self.concepts.get(r.index())
    }

    pub fn get_mut(&mut self, r: ConceptRef) -> Option<&mut Concept> {
        self.concepts.get_mut(r.index())
    }

    /// Attach `child` under `parent`. Returns false if the edge already
    /// existed or `parent` is not in this graph.
    pub fn attach(&mut self, parent: ConceptRef, child: ConceptRef) -> bool {
        match self.concepts.get_mut(parent.index()) {
            Some(p) => p.attach_child(child),
            None => false,
        }
    }

    /// Whether `to` is `from` or one of its descendants.
    pub fn reaches(&self, from: ConceptRef, to: ConceptRef) -> bool {
        let mut seen = HashSet::new();
        let mut stack = vec![from];
        while let Some(r) = stack.pop() {
            if r == to {
                return true;
            }
            if seen.insert(r) {
                if let Some(c) = self.get(r) {
                    stack.extend(c.children().iter().copied());
                }
            }
        }
        false
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// Breadth-first traversal from `root`. Each call starts a fresh walk.
    pub fn breadth_first(&self, root: ConceptRef) -> BreadthFirst<'_> {
        let mut queue = VecDeque::new();
        if let Some(visit) = self.root_visit(root) {
            queue.push_back(visit);
        }
        BreadthFirst { graph: self, queue }
    }

    /// Pre-order depth-first traversal from `root`.
    pub fn depth_first(&self, root: ConceptRef) -> DepthFirst<'_> {
        let stack = self.root_visit(root).into_iter().collect();
        DepthFirst { graph: self, stack }
    }

    fn root_visit(&self, root: ConceptRef) -> Option<Visit> {
        self.get(root).map(|c| Visit {
            concept: root,
            depth: 0,
            full_name: format!("{sep}{}{sep}", c.concept_code(), sep = PATH_SEPARATOR),
        })
    }

    /// Child visits of `visit`, in attachment order.
    fn expand<'a>(&'a self, visit: &'a Visit) -> impl Iterator<Item = Visit> + 'a {
        self.get(visit.concept)
            .map(|c| c.children())
            .unwrap_or_default()
            .iter()
            .filter_map(move |&child| {
                self.get(child).map(|c| Visit {
                    concept: child,
                    depth: visit.depth + 1,
                    full_name: child_path(&visit.full_name, c.concept_code()),
                })
            })
    }
}

impl std::ops::Index<ConceptRef> for ConceptGraph {
    type Output = Concept;

    fn index(&self, r: ConceptRef) -> &Concept {
        &self.concepts[r.index()]
    }
}

impl std::ops::IndexMut<ConceptRef> for ConceptGraph {
    fn index_mut(&mut self, r: ConceptRef) -> &mut Concept {
        &mut self.concepts[r.index()]
    }
}

/// Path of a child position given its parent's path.
pub fn child_path(parent_path: &str, child_code: &str) -> String {
    format!("{}{}{}", parent_path, child_code, PATH_SEPARATOR)
}

/// Lazy breadth-first walk
#[derive(Debug, Clone)]
pub struct BreadthFirst<'g> {
    graph: &'g ConceptGraph,
    queue: VecDeque<Visit>,
}

impl Iterator for BreadthFirst<'_> {
    type Item = Visit;

    fn next(&mut self) -> Option<Visit> {
        let visit = self.queue.pop_front()?;
        self.queue.extend(self.graph.expand(&visit));
        Some(visit)
    }
}

/// Lazy pre-order depth-first walk
#[derive(Debug, Clone)]
pub struct DepthFirst<'g> {
    graph: &'g ConceptGraph,
    stack: Vec<Visit>,
}

impl Iterator for DepthFirst<'_> {
    type Item = Visit;

    fn next(&mut self) -> Option<Visit> {
        let visit = self.stack.pop()?;
        let children: Vec<Visit> = self.graph.expand(&visit).collect();
        self.stack.extend(children.into_iter().rev());
        Some(visit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ontology::ConceptIdentity;

    fn add(graph: &mut ConceptGraph, name: &str) -> ConceptRef {
        graph.insert(Concept::new(ConceptIdentity::name(name, ""), None).unwrap())
    }

    /// root -> (a -> (c), b -> (c))
    fn diamond() -> (ConceptGraph, [ConceptRef; 4]) {
        let mut g = ConceptGraph::new();
        let root = add(&mut g, "root");
        let a = add(&mut g, "a");
        let b = add(&mut g, "b");
        let c = add(&mut g, "c");
        g.attach(root, a);
        g.attach(root, b);
        g.attach(a, c);
        g.attach(b, c);
        (g, [root, a, b, c])
    }

    #[test]
    fn breadth_first_visits_levels_in_order() {
        let (g, [root, a, b, c]) = diamond();
        let order: Vec<_> = g.breadth_first(root).map(|v| v.concept).collect();
        assert_eq!(order, vec![root, a, b, c, c]);
    }

    #[test]
    fn each_position_carries_its_own_path() {
        let (g, [root, _, _, c]) = diamond();
        let paths: Vec<_> = g
            .breadth_first(root)
            .filter(|v| v.concept == c)
            .map(|v| v.full_name)
            .collect();
        assert_eq!(paths, vec!["\\root\\a\\c\\", "\\root\\b\\c\\"]);
    }

    #[test]
    fn depth_first_is_preorder() {
        let (g, [root, a, b, c]) = diamond();
        let order: Vec<_> = g.depth_first(root).map(|v| v.concept).collect();
        assert_eq!(order, vec![root, a, c, b, c]);
    }

    #[test]
    fn traversal_is_restartable() {
        let (g, [root, ..]) = diamond();
        let first: Vec<_> = g.breadth_first(root).collect();
        let second: Vec<_> = g.breadth_first(root).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn traversal_from_subtree_root() {
        let (g, [_, a, _, c]) = diamond();
        let visits: Vec<_> = g.breadth_first(a).collect();
        assert_eq!(visits.len(), 2);
        assert_eq!(visits[1].concept, c);
        assert_eq!(visits[1].depth, 1);
        assert_eq!(visits[1].full_name, "\\a\\c\\");
    }

    #[test]
    fn reaches_follows_every_branch() {
        let (g, [root, a, b, c]) = diamond();
        assert!(g.reaches(root, c));
        assert!(g.reaches(b, c));
        assert!(g.reaches(c, c));
        assert!(!g.reaches(c, root));
        assert!(!g.reaches(a, b));
    }

    #[test]
    fn attach_is_idempotent() {
        let (mut g, [root, a, ..]) = diamond();
        assert!(!g.attach(root, a));
        assert_eq!(g[root].children().len(), 2);
    }
}
