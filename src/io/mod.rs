//! Graph I/O helpers.
//!
//! This module provides trait-based readers and writers for loading and saving the
//! [`CsrGraph`] consumed by the Louvain engine.

pub mod binary_edge_list;

use crate::partitioning::csr::CsrGraph;
use crate::partitioning::error::GraphError;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Trait for graph readers that produce a validated CSR graph.
pub trait GraphReader {
    /// Parse a graph from a reader.
    fn read<R: Read>(&self, reader: R) -> Result<CsrGraph, GraphError>;

    /// Parse a graph from a file on disk.
    fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<CsrGraph, GraphError> {
        let file = File::open(path)?;
        self.read(BufReader::new(file))
    }
}

/// Trait for graph writers that serialize a CSR graph.
pub trait GraphWriter {
    /// Write a graph to a writer.
    fn write<W: Write>(&self, writer: W, graph: &CsrGraph) -> Result<(), GraphError>;

    /// Write a graph to a file on disk, replacing any existing file.
    fn write_path<P: AsRef<Path>>(&self, path: P, graph: &CsrGraph) -> Result<(), GraphError> {
        let file = File::create(path)?;
        self.write(BufWriter::new(file), graph)
    }
}
