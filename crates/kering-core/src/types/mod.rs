//! # Core Type Definitions
//!
//! This module contains all core types for the Kering fact store:
//! - Resource identifiers (`Iri`)
//! - Statement components (`Term`, `Literal`, `Statement`)
//! - The NEN 2767 condition ladder (`ConditionScore`)
//! - Ingestion input (`InspectionEvent`)
//! - Error types (`KeringError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module implement `Ord` so they can live in
//! `BTreeMap`/`BTreeSet` with deterministic ordering. Statements are
//! immutable values; the store never mutates one after construction.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// RESOURCE IDENTIFIERS
// =============================================================================

/// A resource identifier in IRI form.
///
/// IRIs are opaque to the store: equality and ordering are plain string
/// comparison, and no navigation or dereferencing ever happens. Subjects and
/// predicates are always IRIs; objects may be.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Iri(pub String);

impl Iri {
    /// Create a new IRI from a string.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the IRI as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// CONDITION SCORES (NEN 2767)
// =============================================================================

/// The closed NEN 2767 condition ladder, score 1 (best) to 6 (worst).
///
/// Condition labels arrive as free text from inspection reports; anything
/// outside this enumeration is rejected at the ingestion boundary and never
/// reaches the graph.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ConditionScore {
    Excellent,
    Good,
    Reasonable,
    BelowAverage,
    Bad,
    VeryBad,
}

impl ConditionScore {
    /// All members, best to worst.
    pub const ALL: [Self; 6] = [
        Self::Excellent,
        Self::Good,
        Self::Reasonable,
        Self::BelowAverage,
        Self::Bad,
        Self::VeryBad,
    ];

    /// The canonical label, as written in inspection reports and in the
    /// durable store file.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Reasonable => "Reasonable",
            Self::BelowAverage => "BelowAverage",
            Self::Bad => "Bad",
            Self::VeryBad => "VeryBad",
        }
    }

    /// The numeric NEN 2767 score (1 = excellent, 6 = very bad).
    #[must_use]
    pub const fn score(self) -> u8 {
        match self {
            Self::Excellent => 1,
            Self::Good => 2,
            Self::Reasonable => 3,
            Self::BelowAverage => 4,
            Self::Bad => 5,
            Self::VeryBad => 6,
        }
    }

    /// Parse a canonical label. Labels are matched exactly; there is no
    /// fuzzy matching, trimming, or case folding.
    pub fn parse(label: &str) -> Result<Self, KeringError> {
        Self::ALL
            .into_iter()
            .find(|c| c.label() == label)
            .ok_or_else(|| KeringError::InvalidCondition(label.to_string()))
    }
}

impl fmt::Display for ConditionScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for ConditionScore {
    type Err = KeringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// =============================================================================
// LITERALS & TERMS
// =============================================================================

/// A typed literal value in object position.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Literal {
    /// Plain string literal.
    Str(String),
    /// Calendar date literal (`xsd:date`).
    Date(NaiveDate),
    /// NEN 2767 condition literal (`nen2767:ConditionScore`).
    Condition(ConditionScore),
}

impl fmt::Display for Literal {
    /// Render the lexical form, without datatype decoration.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Condition(c) => f.write_str(c.label()),
        }
    }
}

/// The object of a statement: either a reference to another resource or a
/// typed literal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Term {
    Iri(Iri),
    Literal(Literal),
}

impl Term {
    /// The resource reference, if this term is one.
    #[must_use]
    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Self::Iri(iri) => Some(iri),
            Self::Literal(_) => None,
        }
    }

    /// The literal payload, if this term is one.
    #[must_use]
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Iri(_) => None,
            Self::Literal(lit) => Some(lit),
        }
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Self::Iri(iri)
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Self::Literal(lit)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => iri.fmt(f),
            Self::Literal(lit) => lit.fmt(f),
        }
    }
}

// =============================================================================
// STATEMENT
// =============================================================================

/// A single fact: an ordered `(subject, predicate, object)` triple.
///
/// Statements are immutable once appended to a graph. Corrections are
/// expressed as additional statements, never as edits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Statement {
    /// The resource this fact is about.
    pub subject: Iri,
    /// The relationship or property name.
    pub predicate: Iri,
    /// The target: another resource or a typed literal.
    pub object: Term,
}

impl Statement {
    /// Create a new statement.
    #[must_use]
    pub fn new(subject: Iri, predicate: Iri, object: impl Into<Term>) -> Self {
        Self {
            subject,
            predicate,
            object: object.into(),
        }
    }
}

// =============================================================================
// INSPECTION EVENT
// =============================================================================

/// One inspection result, as handed to the ingestion workflow.
///
/// The condition arrives as a raw label and is validated against
/// [`ConditionScore`] before any statement is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionEvent {
    /// The part that was inspected (must already exist in the graph).
    pub part: Iri,
    /// Raw condition label, e.g. `"Good"` or `"BelowAverage"`.
    pub condition: String,
    /// The date the inspection took place.
    pub date: NaiveDate,
}

impl InspectionEvent {
    /// Create a new inspection event.
    #[must_use]
    pub fn new(part: Iri, condition: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            part,
            condition: condition.into(),
            date,
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Kering fact store.
///
/// - No silent failures
/// - Use `Result<T, KeringError>` for fallible operations
/// - Validation errors are raised before any graph mutation
#[derive(Debug, Error)]
pub enum KeringError {
    /// The durable store file failed to parse. Fatal at load time: the
    /// store must not open over a file it cannot fully read.
    #[error("corrupt store file, line {line}: {reason}")]
    CorruptStore { line: usize, reason: String },

    /// The referenced asset does not exist in the graph.
    #[error("unknown asset: {0}")]
    UnknownAsset(Iri),

    /// The referenced part does not exist in the graph.
    #[error("unknown part: {0}")]
    UnknownPart(Iri),

    /// The condition label is outside the closed NEN 2767 enumeration.
    #[error("invalid condition label: {0:?}")]
    InvalidCondition(String),

    /// The asset local name cannot be minted into instance IRIs. Raised
    /// before any seeding happens.
    #[error("invalid asset name: {0:?}")]
    InvalidAssetName(String),

    /// The durable write failed. The in-memory graph still holds the
    /// appended statements and stays dirty until a flush succeeds.
    #[error("flush failed, data held in memory only: {0}")]
    Flush(String),

    /// A pattern query is structurally invalid (engine misuse, not a data
    /// condition).
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// An I/O error at the storage boundary.
    #[error("I/O error: {0}")]
    Io(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn condition_parse_accepts_canonical_labels() {
        for c in ConditionScore::ALL {
            assert_eq!(ConditionScore::parse(c.label()).expect("parse"), c);
        }
    }

    #[test]
    fn condition_parse_rejects_unknown_label() {
        let err = ConditionScore::parse("Pristine");
        assert!(matches!(err, Err(KeringError::InvalidCondition(l)) if l == "Pristine"));
    }

    #[test]
    fn condition_parse_is_exact() {
        assert!(ConditionScore::parse("good").is_err());
        assert!(ConditionScore::parse(" Good").is_err());
        assert!(ConditionScore::parse("Below Average").is_err());
    }

    #[test]
    fn condition_scores_are_one_through_six() {
        let scores: Vec<u8> = ConditionScore::ALL.iter().map(|c| c.score()).collect();
        assert_eq!(scores, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn literal_display_renders_lexical_form() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date");
        assert_eq!(Literal::Str("hello".into()).to_string(), "hello");
        assert_eq!(Literal::Date(date).to_string(), "2025-01-01");
        assert_eq!(
            Literal::Condition(ConditionScore::BelowAverage).to_string(),
            "BelowAverage"
        );
    }

    #[test]
    fn statements_order_deterministically() {
        let a = Statement::new(Iri::new("s1"), Iri::new("p"), Iri::new("o"));
        let b = Statement::new(Iri::new("s2"), Iri::new("p"), Iri::new("o"));
        let c = Statement::new(Iri::new("s1"), Iri::new("p"), Literal::Str("x".into()));

        let set: BTreeSet<_> = [b.clone(), c.clone(), a.clone()].into_iter().collect();
        let ordered: Vec<_> = set.into_iter().collect();
        assert_eq!(ordered, vec![a, c, b]);
    }

    #[test]
    fn term_accessors_split_by_kind() {
        let iri_term = Term::from(Iri::new("x"));
        assert!(iri_term.as_iri().is_some());
        assert!(iri_term.as_literal().is_none());

        let lit_term = Term::from(Literal::Str("y".into()));
        assert!(lit_term.as_iri().is_none());
        assert!(lit_term.as_literal().is_some());
    }
}
