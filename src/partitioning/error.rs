//! Partitioning errors for flat-louvain

use thiserror::Error;

/// Errors from graph construction and edge-list loading.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Offsets array must hold `n + 1` entries starting at zero
    #[error("Edge offsets must start at 0 (found {0})")]
    OffsetsNotZeroBased(usize),
    /// Offsets decreased between two consecutive vertices
    #[error("Edge offsets decrease at vertex {vertex}: {start} > {end}")]
    OffsetsNotMonotone { vertex: usize, start: usize, end: usize },
    /// Last offset disagrees with the edge list length
    #[error("Edge offsets end at {last} but the edge list holds {edges} edges")]
    OffsetsLengthMismatch { last: usize, edges: usize },
    /// An edge points at a vertex outside `0..n`
    #[error("Edge {edge} targets vertex {tail} but the graph has {vertices} vertices")]
    TailOutOfRange { edge: usize, tail: usize, vertices: usize },
    /// An edge record in a binary edge list carries a negative endpoint
    #[error("Edge {edge} has negative endpoint {tail}")]
    NegativeTail { edge: usize, tail: i64 },
    /// Edge weights must be finite and non-negative
    #[error("Edge {edge} has invalid weight {weight}")]
    InvalidWeight { edge: usize, weight: f64 },
    /// A header count in a binary edge list was negative or does not fit in memory
    #[error("Invalid {field} in edge list header: {value}")]
    InvalidHeader { field: &'static str, value: i64 },
    /// Input ended before the declared number of records
    #[error("Edge list truncated: expected {expected} bytes of {section}, found {found}")]
    Truncated {
        section: &'static str,
        expected: usize,
        found: usize,
    },
    /// Underlying reader failure
    #[error("I/O error while reading edge list: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the Louvain engine.
#[derive(Debug, Error)]
pub enum PartitionError {
    /// A worker thread could not be created; the run is aborted without a partial result
    #[error("Failed to spawn Louvain worker {worker}: {source}")]
    ThreadSpawn {
        worker: usize,
        #[source]
        source: std::io::Error,
    },
    /// A worker thread panicked before finishing its chunk
    #[error("Louvain worker {0} panicked")]
    WorkerPanicked(usize),
    /// Configuration rejected before the first pass
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter {
        name: &'static str,
        message: &'static str,
    },
    /// Community totals drifted away from the vertex totals
    #[error("Conservation violated for {quantity}: expected {expected}, found {found}")]
    ConservationViolated {
        quantity: &'static str,
        expected: f64,
        found: f64,
    },
    /// Graph loading failed
    #[error(transparent)]
    Graph(#[from] GraphError),
}
