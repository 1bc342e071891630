//! # Storage
//!
//! Disk persistence for statement graphs.

pub mod turtle_file;

pub use turtle_file::TurtleFile;
