//! # Pattern Query Engine
//!
//! Conjunctive statement-pattern matching with variable bindings.
//!
//! A query is a list of triple patterns evaluated in order by a depth-first
//! nested join: every solution of pattern *i* seeds pattern *i + 1*, and a
//! pattern with no match under the current partial binding prunes that
//! branch. Filters apply as soon as their variable is bound.
//!
//! Result rows appear in join discovery order, which is stable because the
//! underlying graph scans in insertion order. "No match" is an empty vector,
//! never an error.

use crate::graph::Graph;
use crate::primitives::MAX_QUERY_PATTERNS;
use crate::types::{Iri, KeringError, Statement, Term};
use crate::vocab;
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// QUERY TYPES
// =============================================================================

/// A set of variable bindings: one result row.
pub type Bindings = BTreeMap<String, Term>;

/// One slot of a triple pattern: a fixed term or a named variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternTerm {
    /// Must equal the statement component exactly.
    Bound(Term),
    /// Captures the statement component, or must equal an earlier capture
    /// of the same name.
    Var(String),
}

impl PatternTerm {
    /// Variable slot.
    #[must_use]
    pub fn var(name: impl Into<String>) -> Self {
        Self::Var(name.into())
    }

    /// Fixed IRI slot.
    #[must_use]
    pub fn iri(iri: impl Into<String>) -> Self {
        Self::Bound(Term::Iri(Iri::new(iri)))
    }

    /// The term this slot requires under the given bindings, if any.
    fn resolve<'a>(&'a self, bindings: &'a Bindings) -> Option<&'a Term> {
        match self {
            Self::Bound(term) => Some(term),
            Self::Var(name) => bindings.get(name),
        }
    }

    fn var_name(&self) -> Option<&str> {
        match self {
            Self::Bound(_) => None,
            Self::Var(name) => Some(name),
        }
    }
}

/// A statement pattern: three slots matched against every candidate
/// statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriplePattern {
    pub subject: PatternTerm,
    pub predicate: PatternTerm,
    pub object: PatternTerm,
}

impl TriplePattern {
    /// Create a new pattern.
    #[must_use]
    pub fn new(subject: PatternTerm, predicate: PatternTerm, object: PatternTerm) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

/// A filter predicate over bound variables.
///
/// Filters constrain rows; they never bind anything. A filter whose
/// variable is not yet bound passes and is re-checked once it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// The variable must be bound to an IRI whose text ends with `suffix`.
    ///
    /// This is string suffix matching, not equality: `_part2` does not
    /// accept `..._part20`, and a variable bound to a literal never passes.
    IriSuffix { var: String, suffix: String },
}

impl Filter {
    /// Evaluate against the current bindings. `None` means the variable is
    /// not bound yet.
    fn accepts(&self, bindings: &Bindings) -> Option<bool> {
        match self {
            Self::IriSuffix { var, suffix } => bindings.get(var).map(|term| {
                term.as_iri()
                    .is_some_and(|iri| iri.as_str().ends_with(suffix))
            }),
        }
    }

    fn var_name(&self) -> &str {
        match self {
            Self::IriSuffix { var, .. } => var,
        }
    }
}

/// A conjunctive query: patterns joined in order, filters, and the
/// variables to project into result rows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatternQuery {
    pub patterns: Vec<TriplePattern>,
    pub filters: Vec<Filter>,
    pub select: Vec<String>,
}

// =============================================================================
// EVALUATION
// =============================================================================

impl PatternQuery {
    /// Create a query over the given patterns, selecting nothing and
    /// filtering nothing.
    #[must_use]
    pub fn new(patterns: Vec<TriplePattern>) -> Self {
        Self {
            patterns,
            filters: Vec::new(),
            select: Vec::new(),
        }
    }

    /// Add a filter.
    #[must_use]
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set the projected variables.
    #[must_use]
    pub fn with_select(mut self, select: Vec<String>) -> Self {
        self.select = select;
        self
    }

    /// Static validation, independent of any graph.
    ///
    /// Every selected and filtered variable must occur in some pattern, and
    /// the pattern count must stay within `MAX_QUERY_PATTERNS`. Violations
    /// are engine misuse, reported as `KeringError::InvalidQuery`.
    pub fn validate(&self) -> Result<(), KeringError> {
        if self.patterns.is_empty() {
            return Err(KeringError::InvalidQuery(
                "query must contain at least one pattern".to_string(),
            ));
        }
        if self.patterns.len() > MAX_QUERY_PATTERNS {
            return Err(KeringError::InvalidQuery(format!(
                "query has {} patterns, maximum is {}",
                self.patterns.len(),
                MAX_QUERY_PATTERNS
            )));
        }

        let mut pattern_vars: BTreeSet<&str> = BTreeSet::new();
        for pattern in &self.patterns {
            pattern_vars.extend(pattern.subject.var_name());
            pattern_vars.extend(pattern.predicate.var_name());
            pattern_vars.extend(pattern.object.var_name());
        }

        for name in &self.select {
            if !pattern_vars.contains(name.as_str()) {
                return Err(KeringError::InvalidQuery(format!(
                    "selected variable {name:?} does not occur in any pattern"
                )));
            }
        }
        for filter in &self.filters {
            let name = filter.var_name();
            if !pattern_vars.contains(name) {
                return Err(KeringError::InvalidQuery(format!(
                    "filtered variable {name:?} does not occur in any pattern"
                )));
            }
        }
        Ok(())
    }

    /// Evaluate against a graph.
    ///
    /// Returns one row per complete solution, projected to the selected
    /// variables, in discovery order. An empty vector means no match and is
    /// a perfectly ordinary answer.
    pub fn evaluate(&self, graph: &Graph) -> Result<Vec<Bindings>, KeringError> {
        self.validate()?;
        if self.requires_uninstantiated_class(graph) {
            return Ok(Vec::new());
        }
        let mut rows = Vec::new();
        let mut bindings = Bindings::new();
        self.join(graph, 0, &mut bindings, &mut rows);
        Ok(rows)
    }

    /// A pattern demanding instances of a class no subject carries can
    /// never be satisfied; the whole join is skipped.
    fn requires_uninstantiated_class(&self, graph: &Graph) -> bool {
        self.patterns.iter().any(|pattern| {
            matches!(
                &pattern.predicate,
                PatternTerm::Bound(Term::Iri(p)) if p.as_str() == vocab::RDF_TYPE
            ) && matches!(
                &pattern.object,
                PatternTerm::Bound(Term::Iri(class)) if !graph.contains_subject_of_type(class)
            )
        })
    }

    /// Depth-first nested join over `self.patterns[depth..]`.
    fn join(&self, graph: &Graph, depth: usize, bindings: &mut Bindings, rows: &mut Vec<Bindings>) {
        let Some(pattern) = self.patterns.get(depth) else {
            rows.push(self.project(bindings));
            return;
        };

        // A resolved subject narrows candidates to its index slot; anything
        // else walks the full log. Both iterate in insertion order.
        let subject_key: Option<Iri> = match pattern.subject.resolve(bindings) {
            Some(Term::Iri(iri)) => Some(iri.clone()),
            Some(Term::Literal(_)) => return,
            None => None,
        };
        let candidates: Box<dyn Iterator<Item = &Statement> + '_> = match &subject_key {
            Some(subject) => Box::new(graph.statements_with_subject(subject)),
            None => Box::new(graph.scan()),
        };

        for statement in candidates {
            let mut newly_bound = Vec::new();
            let matched = Self::match_iri(&pattern.subject, &statement.subject, bindings, &mut newly_bound)
                && Self::match_iri(
                    &pattern.predicate,
                    &statement.predicate,
                    bindings,
                    &mut newly_bound,
                )
                && Self::match_term(&pattern.object, &statement.object, bindings, &mut newly_bound)
                && self.filters_accept(bindings);

            if matched {
                self.join(graph, depth + 1, bindings, rows);
            }
            for name in newly_bound {
                bindings.remove(&name);
            }
        }
    }

    /// Match a pattern slot against an IRI component (subject or
    /// predicate). A bound literal can never match here.
    fn match_iri(
        slot: &PatternTerm,
        actual: &Iri,
        bindings: &mut Bindings,
        newly_bound: &mut Vec<String>,
    ) -> bool {
        match slot {
            PatternTerm::Bound(Term::Iri(expected)) => expected == actual,
            PatternTerm::Bound(Term::Literal(_)) => false,
            PatternTerm::Var(name) => match bindings.get(name) {
                Some(existing) => existing.as_iri() == Some(actual),
                None => {
                    bindings.insert(name.clone(), Term::Iri(actual.clone()));
                    newly_bound.push(name.clone());
                    true
                }
            },
        }
    }

    /// Match a pattern slot against an object term.
    fn match_term(
        slot: &PatternTerm,
        actual: &Term,
        bindings: &mut Bindings,
        newly_bound: &mut Vec<String>,
    ) -> bool {
        match slot {
            PatternTerm::Bound(expected) => expected == actual,
            PatternTerm::Var(name) => match bindings.get(name) {
                Some(existing) => existing == actual,
                None => {
                    bindings.insert(name.clone(), actual.clone());
                    newly_bound.push(name.clone());
                    true
                }
            },
        }
    }

    /// All filters whose variables are bound must pass. Unbound filters
    /// pass for now and are re-checked as the join binds more variables.
    fn filters_accept(&self, bindings: &Bindings) -> bool {
        self.filters
            .iter()
            .all(|filter| filter.accepts(bindings).unwrap_or(true))
    }

    fn project(&self, bindings: &Bindings) -> Bindings {
        self.select
            .iter()
            .filter_map(|name| {
                bindings
                    .get(name)
                    .map(|term| (name.clone(), term.clone()))
            })
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
