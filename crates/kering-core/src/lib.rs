//! # kering-core
//!
//! The asset fact store for Kering - THE LOGIC.
//!
//! This crate records facts about physical assets (a storm-surge barrier,
//! its parts, and periodic NEN 2767 inspections) as a graph of typed
//! subject-predicate-object statements, persists that graph durably as a
//! text file, and answers conjunctive pattern queries over it.
//!
//! ## Architectural Constraints
//!
//! The CORE:
//! - Is the ONLY place where statement data lives (stateful)
//! - Appends in memory first, then flushes the whole graph to disk
//! - Never mutates or deletes a statement; corrections are new statements
//! - Is deterministic: BTree collections, stable insertion order
//! - Has NO async, NO network dependencies (pure Rust)

// =============================================================================
// MODULES
// =============================================================================

pub mod formats;
pub mod graph;
pub mod ingestor;
pub mod pattern;
pub mod primitives;
pub mod storage;
pub mod store;
pub mod types;
pub mod vocab;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{ConditionScore, InspectionEvent, Iri, KeringError, Literal, Statement, Term};

// =============================================================================
// RE-EXPORTS: Fact Store
// =============================================================================

pub use graph::Graph;
pub use ingestor::{Ingestor, STATEMENTS_PER_INSPECTION};
pub use pattern::{Bindings, Filter, PatternQuery, PatternTerm, TriplePattern};
pub use storage::TurtleFile;
pub use store::{FactStore, StoreStats};

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{graph_from_turtle, graph_to_turtle};
