//! An indexed, duplicate-free set of RDF triples.
//!
//! The LDP state machine mostly asks two questions of a graph: "what is the
//! object of (s, p)?" and "which statements match this pattern?". The graph
//! keeps a `(subject, predicate) -> objects` index so the first is a map
//! lookup rather than a scan.

use std::collections::{HashMap, HashSet};

use crate::model::{NamedNode, NamedNodeRef, Subject, Term, Triple};

/// A set of RDF triples with indexed (subject, predicate) lookup.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    triples: HashSet<Triple>,
    index: HashMap<(Subject, NamedNode), Vec<Term>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Insert a triple. Returns `false` if it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        if !self.triples.insert(triple.clone()) {
            return false;
        }
        self.index
            .entry((triple.subject, triple.predicate))
            .or_default()
            .push(triple.object);
        true
    }

    /// Remove a triple. Returns `false` if it was not present.
    pub fn remove(&mut self, triple: &Triple) -> bool {
        if !self.triples.remove(triple) {
            return false;
        }
        let key = (triple.subject.clone(), triple.predicate.clone());
        if let Some(objects) = self.index.get_mut(&key) {
            objects.retain(|o| o != &triple.object);
            if objects.is_empty() {
                self.index.remove(&key);
            }
        }
        true
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// The first object of `(subject, predicate)`, if any.
    pub fn any_object(&self, subject: &Subject, predicate: NamedNodeRef<'_>) -> Option<&Term> {
        self.index
            .get(&(subject.clone(), predicate.into_owned()))
            .and_then(|objects| objects.first())
    }

    /// All objects of `(subject, predicate)`.
    pub fn objects(&self, subject: &Subject, predicate: NamedNodeRef<'_>) -> Vec<Term> {
        self.index
            .get(&(subject.clone(), predicate.into_owned()))
            .map(|objects| objects.to_vec())
            .unwrap_or_default()
    }

    /// All triples matching a pattern of optional subject, predicate, object.
    pub fn statements_matching(
        &self,
        subject: Option<&Subject>,
        predicate: Option<NamedNodeRef<'_>>,
        object: Option<&Term>,
    ) -> Vec<Triple> {
        // (s, p) given: answer straight from the index.
        if let (Some(s), Some(p)) = (subject, predicate) {
            return self
                .objects(s, p)
                .into_iter()
                .filter(|o| object.map_or(true, |wanted| wanted == o))
                .map(|o| Triple::new(s.clone(), p.into_owned(), o))
                .collect();
        }
        self.triples
            .iter()
            .filter(|t| subject.map_or(true, |s| s == &t.subject))
            .filter(|t| predicate.map_or(true, |p| p.as_str() == t.predicate.as_str()))
            .filter(|t| object.map_or(true, |o| o == &t.object))
            .cloned()
            .collect()
    }

    /// Remove every triple matching the pattern; returns how many went.
    pub fn remove_matching(
        &mut self,
        subject: Option<&Subject>,
        predicate: Option<NamedNodeRef<'_>>,
        object: Option<&Term>,
    ) -> usize {
        let doomed = self.statements_matching(subject, predicate, object);
        let count = doomed.len();
        for triple in &doomed {
            self.remove(triple);
        }
        count
    }

    /// Triples in a stable order, for deterministic serialization.
    pub fn triples_sorted(&self) -> Vec<&Triple> {
        let mut triples: Vec<&Triple> = self.triples.iter().collect();
        triples.sort_by_cached_key(|t| {
            (
                t.subject.to_string(),
                t.predicate.as_str().to_owned(),
                t.object.to_string(),
            )
        });
        triples
    }
}

impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.triples == other.triples
    }
}

impl Eq for Graph {}

impl Extend<Triple> for Graph {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        for triple in iter {
            self.insert(triple);
        }
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut graph = Graph::new();
        graph.extend(iter);
        graph
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Triple;
    type IntoIter = std::collections::hash_set::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}
