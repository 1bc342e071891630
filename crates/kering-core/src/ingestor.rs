//! # Ingestor Module
//!
//! Validation and statement construction for inspection events.
//!
//! - Validate events before any graph mutation (fail fast, mutate never)
//! - Reject parts the graph does not know
//! - Reject condition labels outside the closed NEN 2767 enumeration
//! - Build the complete per-event statement batch in one fixed order
//!
//! The ingestor never touches disk and never allocates inspection indices;
//! both belong to [`crate::store::FactStore`].

use crate::graph::Graph;
use crate::types::{ConditionScore, InspectionEvent, Iri, KeringError, Literal, Statement};
use crate::vocab;
use chrono::NaiveDate;

/// Number of statements describing one inspection event.
pub const STATEMENTS_PER_INSPECTION: usize = 6;

/// The Ingestor validates inspection events and builds their statements.
pub struct Ingestor;

impl Ingestor {
    /// Validate an event against the current graph.
    ///
    /// An event is valid if:
    /// - its part is declared an instance of `otl:Part` in the graph
    /// - its condition label parses into [`ConditionScore`]
    ///
    /// Checked in that order; the first failure wins and nothing has been
    /// mutated. Returns the parsed condition on success.
    pub fn validate(graph: &Graph, event: &InspectionEvent) -> Result<ConditionScore, KeringError> {
        if !graph.has_type(&event.part, &Iri::new(vocab::PART)) {
            return Err(KeringError::UnknownPart(event.part.clone()));
        }
        ConditionScore::parse(&event.condition)
    }

    /// Build the full statement batch for one inspection.
    ///
    /// `index` pairs the inspection resource with its score resource
    /// (`inspection_{n}` / `inspection_score_{n}`). The batch order is
    /// fixed; callers append all six statements and flush once.
    #[must_use]
    pub fn build_batch(
        part: &Iri,
        condition: ConditionScore,
        date: NaiveDate,
        index: u64,
    ) -> [Statement; STATEMENTS_PER_INSPECTION] {
        let inspection = vocab::inspection_iri(index);
        let score = vocab::inspection_score_iri(index);

        [
            Statement::new(
                part.clone(),
                Iri::new(vocab::HAS_INSPECTION),
                inspection.clone(),
            ),
            Statement::new(
                inspection.clone(),
                Iri::new(vocab::RDF_TYPE),
                Iri::new(vocab::INSPECTION),
            ),
            Statement::new(
                inspection.clone(),
                Iri::new(vocab::HAS_NEN2767_CONDITION),
                score.clone(),
            ),
            Statement::new(
                score.clone(),
                Iri::new(vocab::RDF_VALUE),
                Literal::Condition(condition),
            ),
            Statement::new(
                score,
                Iri::new(vocab::RDF_TYPE),
                Iri::new(vocab::CONDITION_SCORE),
            ),
            Statement::new(
                inspection,
                Iri::new(vocab::INSPECTION_DATE),
                Literal::Date(date),
            ),
        ]
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Term;

    fn graph_with_part() -> (Graph, Iri) {
        let part = vocab::part_iri("oosterscheldekering", 0);
        let mut graph = Graph::new();
        graph.append(Statement::new(
            part.clone(),
            Iri::new(vocab::RDF_TYPE),
            Iri::new(vocab::PART),
        ));
        (graph, part)
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
    }

    #[test]
    fn validate_accepts_known_part_and_condition() {
        let (graph, part) = graph_with_part();
        let event = InspectionEvent::new(part, "Good", date("2025-01-01"));

        let condition = Ingestor::validate(&graph, &event).expect("valid");
        assert_eq!(condition, ConditionScore::Good);
    }

    #[test]
    fn validate_rejects_absent_part() {
        let (graph, _) = graph_with_part();
        let ghost = vocab::part_iri("oosterscheldekering", 99);
        let event = InspectionEvent::new(ghost.clone(), "Good", date("2025-01-01"));

        let err = Ingestor::validate(&graph, &event);
        assert!(matches!(err, Err(KeringError::UnknownPart(p)) if p == ghost));
    }

    #[test]
    fn validate_rejects_subject_not_typed_as_part() {
        let (mut graph, _) = graph_with_part();
        let asset = vocab::asset_iri("oosterscheldekering");
        graph.append(Statement::new(
            asset.clone(),
            Iri::new(vocab::RDF_TYPE),
            Iri::new(vocab::STORM_SEARCH_BARRIER),
        ));
        let event = InspectionEvent::new(asset, "Good", date("2025-01-01"));

        assert!(matches!(
            Ingestor::validate(&graph, &event),
            Err(KeringError::UnknownPart(_))
        ));
    }

    #[test]
    fn validate_checks_part_before_condition() {
        let (graph, _) = graph_with_part();
        let ghost = vocab::part_iri("oosterscheldekering", 99);
        let event = InspectionEvent::new(ghost, "NotALabel", date("2025-01-01"));

        // Both are wrong; the part check wins.
        assert!(matches!(
            Ingestor::validate(&graph, &event),
            Err(KeringError::UnknownPart(_))
        ));
    }

    #[test]
    fn validate_rejects_unknown_condition_label() {
        let (graph, part) = graph_with_part();
        let event = InspectionEvent::new(part, "Mediocre", date("2025-01-01"));

        assert!(matches!(
            Ingestor::validate(&graph, &event),
            Err(KeringError::InvalidCondition(l)) if l == "Mediocre"
        ));
    }

    #[test]
    fn batch_has_fixed_shape_and_order() {
        let part = vocab::part_iri("oosterscheldekering", 0);
        let batch = Ingestor::build_batch(&part, ConditionScore::Good, date("2025-01-01"), 7);

        let inspection = vocab::inspection_iri(7);
        let score = vocab::inspection_score_iri(7);

        assert_eq!(batch.len(), STATEMENTS_PER_INSPECTION);

        assert_eq!(batch[0].subject, part);
        assert_eq!(batch[0].predicate.as_str(), vocab::HAS_INSPECTION);
        assert_eq!(batch[0].object, Term::Iri(inspection.clone()));

        assert_eq!(batch[1].subject, inspection);
        assert_eq!(batch[1].predicate.as_str(), vocab::RDF_TYPE);
        assert_eq!(batch[1].object, Term::Iri(Iri::new(vocab::INSPECTION)));

        assert_eq!(batch[2].subject, inspection);
        assert_eq!(batch[2].predicate.as_str(), vocab::HAS_NEN2767_CONDITION);
        assert_eq!(batch[2].object, Term::Iri(score.clone()));

        assert_eq!(batch[3].subject, score);
        assert_eq!(batch[3].predicate.as_str(), vocab::RDF_VALUE);
        assert_eq!(
            batch[3].object,
            Term::Literal(Literal::Condition(ConditionScore::Good))
        );

        assert_eq!(batch[4].subject, score);
        assert_eq!(batch[4].predicate.as_str(), vocab::RDF_TYPE);
        assert_eq!(batch[4].object, Term::Iri(Iri::new(vocab::CONDITION_SCORE)));

        assert_eq!(batch[5].subject, inspection);
        assert_eq!(batch[5].predicate.as_str(), vocab::INSPECTION_DATE);
        assert_eq!(
            batch[5].object,
            Term::Literal(Literal::Date(date("2025-01-01")))
        );
    }

    #[test]
    fn batch_pairs_inspection_with_score_resource() {
        let part = vocab::part_iri("oosterscheldekering", 0);
        let batch = Ingestor::build_batch(&part, ConditionScore::Bad, date("2026-06-30"), 3);

        assert_eq!(vocab::inspection_index(&batch[1].subject), Some(3));
        assert_eq!(batch[4].subject, vocab::inspection_score_iri(3));
    }
}
