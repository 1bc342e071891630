//! # Turtle File Storage
//!
//! The durability layer: one Turtle file holding the complete graph.
//!
//! Every flush rewrites the whole file through a same-directory temp file
//! followed by an atomic rename, so a reader of the path never observes a
//! partial serialization, and a crash mid-write leaves the previous file
//! intact.

use crate::formats::{graph_from_turtle, graph_to_turtle};
use crate::graph::Graph;
use crate::primitives::MAX_STORE_FILE_SIZE;
use crate::types::KeringError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

// =============================================================================
// TURTLE FILE
// =============================================================================

/// Handle on the durable store file.
///
/// Holds only the path; the file is opened per operation. Pure in-memory
/// graphs never touch this type.
#[derive(Debug, Clone)]
pub struct TurtleFile {
    path: PathBuf,
}

impl TurtleFile {
    /// Create a handle for the given path. The file itself may not exist
    /// yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path this handle writes to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check whether the store file exists on disk.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the complete graph from disk.
    ///
    /// The file size is validated against `MAX_STORE_FILE_SIZE` before any
    /// read. Parse failures surface as `KeringError::CorruptStore` and must
    /// be treated as fatal: a store that cannot be fully read must not be
    /// written back.
    pub fn load(&self) -> Result<Graph, KeringError> {
        let metadata = fs::metadata(&self.path).map_err(|e| KeringError::Io(e.to_string()))?;
        if metadata.len() > MAX_STORE_FILE_SIZE {
            return Err(KeringError::Io(format!(
                "store file {} is {} bytes, exceeds maximum {}",
                self.path.display(),
                metadata.len(),
                MAX_STORE_FILE_SIZE
            )));
        }
        let text = fs::read_to_string(&self.path).map_err(|e| KeringError::Io(e.to_string()))?;
        graph_from_turtle(&text)
    }

    /// Write the complete graph to disk atomically.
    ///
    /// Serializes into a temp file next to the target, syncs it, then
    /// renames over the target. Any failure surfaces as
    /// `KeringError::Flush`; the target file is then still the previous
    /// complete serialization.
    pub fn flush(&self, graph: &Graph) -> Result<(), KeringError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| KeringError::Flush(e.to_string()))?;
            }
        }

        let text = graph_to_turtle(graph);
        let temp_path = self.path.with_extension("ttl.tmp");
        {
            let mut file =
                fs::File::create(&temp_path).map_err(|e| KeringError::Flush(e.to_string()))?;
            file.write_all(text.as_bytes())
                .map_err(|e| KeringError::Flush(e.to_string()))?;
            file.sync_all()
                .map_err(|e| KeringError::Flush(e.to_string()))?;
        }
        fs::rename(&temp_path, &self.path).map_err(|e| KeringError::Flush(e.to_string()))?;

        // Best effort: make the rename itself durable.
        if let Some(parent) = self.path.parent() {
            if let Ok(dir) = fs::File::open(parent) {
                let _ = dir.sync_all();
            }
        }

        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Iri, Literal, Statement};
    use crate::vocab;

    fn sample_graph() -> Graph {
        let mut graph = Graph::new();
        graph.append(Statement::new(
            vocab::asset_iri("oosterscheldekering"),
            Iri::new(vocab::RDF_TYPE),
            Iri::new(vocab::STORM_SEARCH_BARRIER),
        ));
        graph.append(Statement::new(
            vocab::part_iri("oosterscheldekering", 0),
            Iri::new("urn:note"),
            Literal::Str("north pillar".to_string()),
        ));
        graph
    }

    #[test]
    fn flush_then_load_roundtrips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = TurtleFile::new(dir.path().join("knowledge_graph.ttl"));

        let graph = sample_graph();
        file.flush(&graph).expect("flush");
        assert!(file.exists());

        let restored = file.load().expect("load");
        let before: Vec<_> = graph.scan().cloned().collect();
        let after: Vec<_> = restored.scan().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn flush_creates_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = TurtleFile::new(dir.path().join("nested/data/knowledge_graph.ttl"));

        file.flush(&sample_graph()).expect("flush");
        assert!(file.exists());
    }

    #[test]
    fn flush_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = TurtleFile::new(dir.path().join("knowledge_graph.ttl"));

        file.flush(&sample_graph()).expect("flush");

        let names: Vec<_> = fs::read_dir(dir.path())
            .expect("read_dir")
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["knowledge_graph.ttl".to_string()]);
    }

    #[test]
    fn flush_overwrites_previous_serialization() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = TurtleFile::new(dir.path().join("knowledge_graph.ttl"));

        file.flush(&sample_graph()).expect("first flush");

        let mut bigger = sample_graph();
        bigger.append(Statement::new(
            vocab::inspection_iri(0),
            Iri::new(vocab::RDF_TYPE),
            Iri::new(vocab::INSPECTION),
        ));
        file.flush(&bigger).expect("second flush");

        let restored = file.load().expect("load");
        assert_eq!(restored.len(), bigger.len());
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = TurtleFile::new(dir.path().join("absent.ttl"));

        assert!(matches!(file.load(), Err(KeringError::Io(_))));
    }

    #[test]
    fn load_corrupt_file_is_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("knowledge_graph.ttl");
        fs::write(&path, "this is not turtle\n").expect("write");

        let file = TurtleFile::new(path);
        assert!(matches!(
            file.load(),
            Err(KeringError::CorruptStore { line: 1, .. })
        ));
    }
}
