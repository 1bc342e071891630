//! # Fact Store
//!
//! The store façade: one durable statement graph, the inspection sequence
//! counter, and the operations callers actually use.
//!
//! - `open` loads the durable file or seeds a fresh one, never both
//! - every write appends in memory first, then flushes the whole graph
//! - the counter is re-derived from the graph on every open, so identifier
//!   allocation survives restarts without a separate counter file
//!
//! The store is synchronous and single-writer. Callers that share it across
//! tasks wrap it in a lock; the append+flush sequence must run under one
//! write guard.

use crate::formats::graph_to_turtle;
use crate::graph::Graph;
use crate::ingestor::Ingestor;
use crate::pattern::{Bindings, Filter, PatternQuery, PatternTerm, TriplePattern};
use crate::primitives::{DEFAULT_ASSET, DEFAULT_PART_COUNT};
use crate::storage::TurtleFile;
use crate::types::{InspectionEvent, Iri, KeringError, Statement};
use crate::vocab;
use serde::Serialize;
use std::path::{Path, PathBuf};

// =============================================================================
// STATS
// =============================================================================

/// Aggregate counts over the stored graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Total statements in the graph.
    pub statements: usize,
    /// Resources typed `otl:Part`.
    pub parts: usize,
    /// Resources typed `otl:Inspection`.
    pub inspections: usize,
}

// =============================================================================
// FACT STORE
// =============================================================================

/// A durable fact store over one graph file.
#[derive(Debug)]
pub struct FactStore {
    file: TurtleFile,
    graph: Graph,
    next_inspection: u64,
}

impl FactStore {
    /// Open the store at `path` with the default seed (the
    /// `oosterscheldekering` asset with one part).
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, KeringError> {
        Self::open_with_seed(path, DEFAULT_ASSET, DEFAULT_PART_COUNT)
    }

    /// Open the store at `path`, seeding `asset_local` with `part_count`
    /// parts when the file does not exist yet.
    ///
    /// An existing file is loaded in full; any parse failure is fatal
    /// (`CorruptStore`) and the store does not open. A missing file is
    /// seeded and flushed immediately so disk and memory start consistent.
    /// Either way the inspection counter is re-derived from the graph.
    pub fn open_with_seed(
        path: impl Into<PathBuf>,
        asset_local: &str,
        part_count: u64,
    ) -> Result<Self, KeringError> {
        let file = TurtleFile::new(path);
        let graph = if file.exists() {
            file.load()?
        } else {
            Self::validate_asset_local(asset_local)?;
            let mut seeded = Self::seed_graph(asset_local, part_count);
            file.flush(&seeded)?;
            seeded.mark_clean();
            seeded
        };
        let next_inspection = Self::derive_next_inspection(&graph);
        Ok(Self {
            file,
            graph,
            next_inspection,
        })
    }

    /// Seed names become path segments of minted IRIs and of the status
    /// suffix filter, so they are restricted to `[A-Za-z0-9_-]`.
    fn validate_asset_local(asset_local: &str) -> Result<(), KeringError> {
        let acceptable = !asset_local.is_empty()
            && asset_local
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        if acceptable {
            Ok(())
        } else {
            Err(KeringError::InvalidAssetName(asset_local.to_string()))
        }
    }

    /// The seed graph: the asset resource, its parts, and the containment
    /// links. No inspections; a fresh store reports every part as never
    /// inspected.
    fn seed_graph(asset_local: &str, part_count: u64) -> Graph {
        let asset = vocab::asset_iri(asset_local);
        let mut graph = Graph::new();
        graph.append(Statement::new(
            asset.clone(),
            Iri::new(vocab::RDF_TYPE),
            Iri::new(vocab::STORM_SEARCH_BARRIER),
        ));
        for index in 0..part_count {
            let part = vocab::part_iri(asset_local, index);
            graph.append(Statement::new(
                part.clone(),
                Iri::new(vocab::RDF_TYPE),
                Iri::new(vocab::PART),
            ));
            graph.append(Statement::new(
                asset.clone(),
                Iri::new(vocab::HAS_PART),
                part,
            ));
        }
        graph
    }

    /// Next free inspection index: one past the highest index minted so
    /// far, scanning both subject and object positions. Zero for a graph
    /// with no inspections.
    fn derive_next_inspection(graph: &Graph) -> u64 {
        graph
            .scan()
            .flat_map(|st| {
                let subject = vocab::inspection_index(&st.subject);
                let object = st.object.as_iri().and_then(vocab::inspection_index);
                subject.into_iter().chain(object)
            })
            .max()
            .map_or(0, |highest| highest + 1)
    }

    // =========================================================================
    // INGESTION
    // =========================================================================

    /// Record one inspection event.
    ///
    /// Validates first (unknown part, invalid condition: no mutation at
    /// all), then allocates a fresh index, appends the full statement batch
    /// and flushes once. Returns the IRI of the new inspection resource.
    ///
    /// A `Flush` error means the statements are in memory but not yet on
    /// disk; the graph stays dirty and the next successful flush persists
    /// them.
    pub fn ingest_inspection(&mut self, event: &InspectionEvent) -> Result<Iri, KeringError> {
        let condition = Ingestor::validate(&self.graph, event)?;
        let index = self.next_inspection;
        let batch = Ingestor::build_batch(&event.part, condition, event.date, index);
        self.next_inspection = index + 1;
        self.append_batch(batch)?;
        Ok(vocab::inspection_iri(index))
    }

    /// Append statements as one batch, then flush once if anything changed.
    ///
    /// Returns the number of statements that were actually new; duplicates
    /// are absorbed without effect and without touching disk.
    pub fn append_batch(
        &mut self,
        statements: impl IntoIterator<Item = Statement>,
    ) -> Result<usize, KeringError> {
        let mut appended = 0;
        for statement in statements {
            if self.graph.append(statement) {
                appended += 1;
            }
        }
        self.flush_if_dirty()?;
        Ok(appended)
    }

    /// Flush the graph when memory and disk may differ.
    ///
    /// One immediate retry before reporting `Flush`; on failure the graph
    /// stays dirty so the next successful flush persists everything.
    fn flush_if_dirty(&mut self) -> Result<(), KeringError> {
        if !self.graph.is_dirty() {
            return Ok(());
        }
        if self.file.flush(&self.graph).is_err() {
            // One immediate retry; the second failure is the reported one.
            self.file.flush(&self.graph)?;
        }
        self.graph.mark_clean();
        Ok(())
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// All `(condition, date)` pairs for one part of one asset, as display
    /// strings, in statement insertion order.
    ///
    /// An asset not typed `otl:StormSearchBarrier` is `UnknownAsset`. A part
    /// index with no inspections, including one that was never seeded,
    /// yields the empty vector.
    pub fn part_status(
        &self,
        asset_local: &str,
        part_index: u64,
    ) -> Result<Vec<(String, String)>, KeringError> {
        let asset = vocab::asset_iri(asset_local);
        if !self
            .graph
            .has_type(&asset, &Iri::new(vocab::STORM_SEARCH_BARRIER))
        {
            return Err(KeringError::UnknownAsset(asset));
        }

        let query = PatternQuery::new(vec![
            TriplePattern::new(
                PatternTerm::iri(asset.0),
                PatternTerm::iri(vocab::HAS_PART),
                PatternTerm::var("part"),
            ),
            TriplePattern::new(
                PatternTerm::var("part"),
                PatternTerm::iri(vocab::HAS_INSPECTION),
                PatternTerm::var("inspection"),
            ),
            TriplePattern::new(
                PatternTerm::var("inspection"),
                PatternTerm::iri(vocab::HAS_NEN2767_CONDITION),
                PatternTerm::var("condition"),
            ),
            TriplePattern::new(
                PatternTerm::var("condition"),
                PatternTerm::iri(vocab::RDF_VALUE),
                PatternTerm::var("condition_value"),
            ),
            TriplePattern::new(
                PatternTerm::var("inspection"),
                PatternTerm::iri(vocab::INSPECTION_DATE),
                PatternTerm::var("inspection_date"),
            ),
        ])
        .with_filter(Filter::IriSuffix {
            var: "part".to_string(),
            suffix: vocab::part_filter_suffix(asset_local, part_index),
        })
        .with_select(vec![
            "condition_value".to_string(),
            "inspection_date".to_string(),
        ]);

        let rows = query.evaluate(&self.graph)?;
        let mut pairs = Vec::with_capacity(rows.len());
        for row in rows {
            if let (Some(condition), Some(date)) =
                (row.get("condition_value"), row.get("inspection_date"))
            {
                pairs.push((condition.to_string(), date.to_string()));
            }
        }
        Ok(pairs)
    }

    /// Evaluate an arbitrary pattern query against the current graph.
    pub fn evaluate(&self, query: &PatternQuery) -> Result<Vec<Bindings>, KeringError> {
        query.evaluate(&self.graph)
    }

    /// The complete graph in its durable textual form.
    #[must_use]
    pub fn snapshot_turtle(&self) -> String {
        graph_to_turtle(&self.graph)
    }

    /// Aggregate counts over the graph.
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            statements: self.graph.len(),
            parts: self.graph.subjects_of_type(&Iri::new(vocab::PART)).count(),
            inspections: self
                .graph
                .subjects_of_type(&Iri::new(vocab::INSPECTION))
                .count(),
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Path of the durable file.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Read access to the underlying graph.
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Number of statements in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    /// Check if the graph holds no statements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// The index the next ingested inspection will receive.
    #[must_use]
    pub fn next_inspection_index(&self) -> u64 {
        self.next_inspection
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
    }

    fn event(part: Iri, condition: &str, day: &str) -> InspectionEvent {
        InspectionEvent::new(part, condition, date(day))
    }

    #[test]
    fn open_seeds_missing_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("knowledge_graph.ttl");

        let store = FactStore::open(&path).expect("open");

        assert!(path.is_file());
        assert_eq!(
            store.stats(),
            StoreStats {
                statements: 3,
                parts: 1,
                inspections: 0,
            }
        );
        assert!(!store.graph().is_dirty());
        assert_eq!(store.next_inspection_index(), 0);
    }

    #[test]
    fn open_with_seed_creates_requested_parts() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("knowledge_graph.ttl");

        let store = FactStore::open_with_seed(&path, "maeslantkering", 3).expect("open");

        let asset = vocab::asset_iri("maeslantkering");
        for index in 0..3 {
            assert!(store.graph().contains(&Statement::new(
                asset.clone(),
                Iri::new(vocab::HAS_PART),
                vocab::part_iri("maeslantkering", index),
            )));
        }
        assert_eq!(store.stats().parts, 3);
    }

    #[test]
    fn open_does_not_reseed_existing_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("knowledge_graph.ttl");

        let mut store = FactStore::open(&path).expect("open");
        let part = vocab::part_iri(DEFAULT_ASSET, 0);
        store
            .ingest_inspection(&event(part, "Good", "2025-01-01"))
            .expect("ingest");
        let statements = store.len();
        drop(store);

        // A second open with different seed parameters must load, not seed.
        let reopened = FactStore::open_with_seed(&path, "maeslantkering", 5).expect("open");
        assert_eq!(reopened.len(), statements);
        assert_eq!(reopened.stats().parts, 1);
    }

    #[test]
    fn ingest_returns_inspection_iri_and_persists() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("knowledge_graph.ttl");

        let mut store = FactStore::open(&path).expect("open");
        let part = vocab::part_iri(DEFAULT_ASSET, 0);
        let inspection = store
            .ingest_inspection(&event(part, "Good", "2025-01-01"))
            .expect("ingest");

        assert_eq!(inspection, vocab::inspection_iri(0));
        assert_eq!(store.stats().inspections, 1);
        assert!(!store.graph().is_dirty());

        let reloaded = FactStore::open(&path).expect("reopen");
        assert_eq!(reloaded.len(), store.len());
    }

    #[test]
    fn counter_is_rederived_after_restart() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("knowledge_graph.ttl");

        let mut store = FactStore::open(&path).expect("open");
        let part = vocab::part_iri(DEFAULT_ASSET, 0);
        store
            .ingest_inspection(&event(part.clone(), "Good", "2025-01-01"))
            .expect("ingest");
        store
            .ingest_inspection(&event(part, "Bad", "2025-06-01"))
            .expect("ingest");
        drop(store);

        let reopened = FactStore::open(&path).expect("reopen");
        assert_eq!(reopened.next_inspection_index(), 2);
    }

    #[test]
    fn append_batch_absorbs_duplicates_and_reports_new() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("knowledge_graph.ttl");

        let mut store = FactStore::open(&path).expect("open");
        let batch = [
            Statement::new(Iri::new("urn:a"), Iri::new("urn:p"), Iri::new("urn:b")),
            Statement::new(Iri::new("urn:a"), Iri::new("urn:q"), Iri::new("urn:c")),
        ];

        assert_eq!(store.append_batch(batch.clone()).expect("append"), 2);
        assert_eq!(store.append_batch(batch).expect("append"), 0);
        assert!(!store.graph().is_dirty());
    }

    #[test]
    fn part_status_rejects_unknown_asset() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("knowledge_graph.ttl");

        let store = FactStore::open(&path).expect("open");
        let err = store.part_status("hollandsekering", 0);
        assert!(matches!(err, Err(KeringError::UnknownAsset(_))));
    }

    #[test]
    fn part_status_is_empty_for_uninspected_part() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("knowledge_graph.ttl");

        let store = FactStore::open(&path).expect("open");
        assert!(store.part_status(DEFAULT_ASSET, 0).expect("status").is_empty());
        // An index that was never seeded is also just an empty answer.
        assert!(store.part_status(DEFAULT_ASSET, 9).expect("status").is_empty());
    }

    #[test]
    fn part_status_reports_pairs_in_insertion_order() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("knowledge_graph.ttl");

        let mut store = FactStore::open(&path).expect("open");
        let part = vocab::part_iri(DEFAULT_ASSET, 0);
        store
            .ingest_inspection(&event(part.clone(), "Good", "2025-01-01"))
            .expect("ingest");
        store
            .ingest_inspection(&event(part, "BelowAverage", "2026-01-01"))
            .expect("ingest");

        let pairs = store.part_status(DEFAULT_ASSET, 0).expect("status");
        assert_eq!(
            pairs,
            vec![
                ("Good".to_string(), "2025-01-01".to_string()),
                ("BelowAverage".to_string(), "2026-01-01".to_string()),
            ]
        );
    }

    #[test]
    fn failed_validation_leaves_graph_unchanged() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("knowledge_graph.ttl");

        let mut store = FactStore::open(&path).expect("open");
        let before = store.len();

        let ghost = vocab::part_iri(DEFAULT_ASSET, 42);
        assert!(matches!(
            store.ingest_inspection(&event(ghost, "Good", "2025-01-01")),
            Err(KeringError::UnknownPart(_))
        ));
        let part = vocab::part_iri(DEFAULT_ASSET, 0);
        assert!(matches!(
            store.ingest_inspection(&event(part, "Shiny", "2025-01-01")),
            Err(KeringError::InvalidCondition(_))
        ));

        assert_eq!(store.len(), before);
        assert_eq!(store.next_inspection_index(), 0);
    }
}
