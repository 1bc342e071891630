//! # Statement Store
//!
//! The in-memory statement graph for Kering.
//!
//! The graph is a *set* of statements with *stable insertion order*:
//! duplicate appends are absorbed without effect, and every scan replays
//! statements in the order they first arrived. All index structures use
//! `BTreeMap`/`BTreeSet` for deterministic ordering.
//!
//! Statements are never mutated or deleted in place. Corrections are new
//! statements.

use crate::types::{Iri, Statement};
use crate::vocab;
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// GRAPH
// =============================================================================

/// The statement graph.
///
/// Holds every statement twice: once in an insertion-ordered log (the scan
/// order) and once in a set (the idempotence check), plus a subject index
/// into the log. A dirty flag tracks whether memory and disk may differ.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Statement log, insertion order.
    statements: Vec<Statement>,

    /// Set view of the log, for duplicate detection.
    present: BTreeSet<Statement>,

    /// Subject index: positions into `statements`, ascending.
    by_subject: BTreeMap<Iri, Vec<usize>>,

    /// True when the in-memory graph has changes not yet flushed.
    dirty: bool,
}

impl Graph {
    /// Create a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a statement if it is not already present.
    ///
    /// Returns `true` when the graph changed. A change marks the graph
    /// dirty; re-appending an existing statement does neither.
    pub fn append(&mut self, statement: Statement) -> bool {
        if self.present.contains(&statement) {
            return false;
        }
        let position = self.statements.len();
        self.by_subject
            .entry(statement.subject.clone())
            .or_default()
            .push(position);
        self.present.insert(statement.clone());
        self.statements.push(statement);
        self.dirty = true;
        true
    }

    /// All statements, in insertion order. Fresh pass per call.
    pub fn scan(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter()
    }

    /// All statements with the given subject, in insertion order.
    pub fn statements_with_subject(&self, subject: &Iri) -> impl Iterator<Item = &Statement> + '_ {
        self.by_subject
            .get(subject)
            .into_iter()
            .flat_map(|positions| positions.iter().map(|&p| &self.statements[p]))
    }

    /// Check whether the exact statement is present.
    #[must_use]
    pub fn contains(&self, statement: &Statement) -> bool {
        self.present.contains(statement)
    }

    /// Check whether `subject` is declared an instance of `class`.
    #[must_use]
    pub fn has_type(&self, subject: &Iri, class: &Iri) -> bool {
        self.statements_with_subject(subject).any(|st| {
            st.predicate.as_str() == vocab::RDF_TYPE && st.object.as_iri() == Some(class)
        })
    }

    /// Check whether any subject is declared an instance of `class`.
    #[must_use]
    pub fn contains_subject_of_type(&self, class: &Iri) -> bool {
        self.statements.iter().any(|st| {
            st.predicate.as_str() == vocab::RDF_TYPE && st.object.as_iri() == Some(class)
        })
    }

    /// All subjects declared instances of `class`, in insertion order.
    ///
    /// Each subject appears once per type declaration; set semantics make
    /// that once overall.
    pub fn subjects_of_type<'a>(&'a self, class: &'a Iri) -> impl Iterator<Item = &'a Iri> + 'a {
        self.statements.iter().filter_map(move |st| {
            (st.predicate.as_str() == vocab::RDF_TYPE && st.object.as_iri() == Some(class))
                .then_some(&st.subject)
        })
    }

    /// Number of statements in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Check if the graph holds no statements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Check whether the graph holds changes not yet flushed to disk.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark memory and disk as consistent. Called after a successful flush
    /// and after a load.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Literal, Term};

    fn st(s: &str, p: &str, o: &str) -> Statement {
        Statement::new(Iri::new(s), Iri::new(p), Iri::new(o))
    }

    #[test]
    fn append_is_idempotent() {
        let mut graph = Graph::new();
        let statement = st("s", "p", "o");

        assert!(graph.append(statement.clone()));
        assert!(!graph.append(statement));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn scan_preserves_insertion_order() {
        let mut graph = Graph::new();
        graph.append(st("z", "p", "1"));
        graph.append(st("a", "p", "2"));
        graph.append(st("m", "p", "3"));

        let objects: Vec<_> = graph
            .scan()
            .filter_map(|s| s.object.as_iri())
            .map(Iri::as_str)
            .collect();
        assert_eq!(objects, vec!["1", "2", "3"]);
    }

    #[test]
    fn subject_index_preserves_insertion_order() {
        let mut graph = Graph::new();
        graph.append(st("a", "p", "1"));
        graph.append(st("b", "p", "x"));
        graph.append(st("a", "q", "2"));

        let for_a: Vec<_> = graph
            .statements_with_subject(&Iri::new("a"))
            .filter_map(|s| s.object.as_iri())
            .map(Iri::as_str)
            .collect();
        assert_eq!(for_a, vec!["1", "2"]);

        assert_eq!(graph.statements_with_subject(&Iri::new("c")).count(), 0);
    }

    #[test]
    fn has_type_matches_exact_subject_and_class() {
        let mut graph = Graph::new();
        let part = Iri::new("https://data.rws.nl/data/x_part0");
        let class = Iri::new(vocab::PART);
        graph.append(Statement::new(
            part.clone(),
            Iri::new(vocab::RDF_TYPE),
            class.clone(),
        ));

        assert!(graph.has_type(&part, &class));
        assert!(!graph.has_type(&part, &Iri::new(vocab::INSPECTION)));
        assert!(!graph.has_type(&Iri::new("other"), &class));
    }

    #[test]
    fn contains_subject_of_type_scans_all_subjects() {
        let mut graph = Graph::new();
        let class = Iri::new(vocab::INSPECTION);
        assert!(!graph.contains_subject_of_type(&class));

        graph.append(Statement::new(
            Iri::new("i1"),
            Iri::new(vocab::RDF_TYPE),
            class.clone(),
        ));
        assert!(graph.contains_subject_of_type(&class));
    }

    #[test]
    fn subjects_of_type_in_insertion_order() {
        let mut graph = Graph::new();
        let class = Iri::new(vocab::PART);
        graph.append(Statement::new(
            Iri::new("p2"),
            Iri::new(vocab::RDF_TYPE),
            class.clone(),
        ));
        graph.append(Statement::new(
            Iri::new("p1"),
            Iri::new(vocab::RDF_TYPE),
            class.clone(),
        ));

        let subjects: Vec<_> = graph.subjects_of_type(&class).map(Iri::as_str).collect();
        assert_eq!(subjects, vec!["p2", "p1"]);
    }

    #[test]
    fn dirty_flag_tracks_changes_only() {
        let mut graph = Graph::new();
        assert!(!graph.is_dirty());

        let statement = st("s", "p", "o");
        graph.append(statement.clone());
        assert!(graph.is_dirty());

        graph.mark_clean();
        assert!(!graph.is_dirty());

        // Duplicate append is not a change.
        graph.append(statement);
        assert!(!graph.is_dirty());
    }

    #[test]
    fn literal_objects_are_not_type_declarations() {
        let mut graph = Graph::new();
        graph.append(Statement::new(
            Iri::new("s"),
            Iri::new(vocab::RDF_TYPE),
            Term::Literal(Literal::Str(vocab::PART.into())),
        ));
        assert!(!graph.contains_subject_of_type(&Iri::new(vocab::PART)));
    }
}
