//! # Formats
//!
//! Pure text transformations between graphs and their durable form.
//! File I/O lives in the storage layer.

pub mod turtle;

pub use turtle::{graph_from_turtle, graph_to_turtle};
