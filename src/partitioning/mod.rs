//! Entry-point for multi-threaded Louvain community detection.

pub mod csr;
pub mod error;
pub mod graph_traits;
pub mod louvain;
pub mod metrics;
pub mod observer;
pub mod parallel;
pub mod state;

pub use self::csr::{CsrGraph, GraphStats};
pub use self::error::{GraphError, PartitionError};
pub use self::graph_traits::{Edge, LouvainGraph};
pub use self::louvain::{Louvain, LouvainOutcome};
pub use self::metrics::*;
pub use self::observer::{NoopObserver, PassObserver, PassReport, PhaseTimings, TimingObserver};
pub use self::parallel::DeltaStrategy;

use serde::{Deserialize, Serialize};

/// Community id; always the index of one of the community's founding vertices.
pub type CommunityId = usize;

/// Parameters of a Louvain run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LouvainConfig {
    /// Worker threads per sweep (≥ 1).
    pub num_threads: usize,
    /// Minimum modularity improvement for a pass to be accepted (> 0).
    pub threshold: f64,
    /// Floor for the accepted modularity; also the initial reference value.
    pub lower_bound: f64,
    /// How workers publish community deltas.
    pub strategy: DeltaStrategy,
}

impl Default for LouvainConfig {
    fn default() -> Self {
        Self {
            num_threads: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            threshold: 1.0e-6,
            lower_bound: -1.0,
            strategy: DeltaStrategy::ThreadLocal,
        }
    }
}

impl LouvainConfig {
    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_lower_bound(mut self, lower_bound: f64) -> Self {
        self.lower_bound = lower_bound;
        self
    }

    pub fn with_strategy(mut self, strategy: DeltaStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Reject configurations the pass controller cannot run with.
    ///
    /// A zero threshold is refused: once the assignment stops changing, consecutive passes
    /// produce identical modularity and the loop would never stop.
    pub fn validate(&self) -> Result<(), PartitionError> {
        if self.num_threads == 0 {
            return Err(PartitionError::InvalidParameter {
                name: "num_threads",
                message: "must be at least 1",
            });
        }
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(PartitionError::InvalidParameter {
                name: "threshold",
                message: "must be finite and strictly positive",
            });
        }
        if self.lower_bound.is_nan() {
            return Err(PartitionError::InvalidParameter {
                name: "lower_bound",
                message: "must not be NaN",
            });
        }
        Ok(())
    }
}

/// Run single-level Louvain on `graph` and return the accepted modularity, the number of
/// passes and the committed assignment.
///
/// `lower` seeds the previous-modularity reference and floors every accepted value;
/// `threshold` is the minimum per-pass improvement; `num_threads` workers are spawned per
/// pass. Deltas are combined with [`DeltaStrategy::ThreadLocal`].
pub fn louvain_method<G>(
    graph: &G,
    lower: f64,
    threshold: f64,
    num_threads: usize,
) -> Result<LouvainOutcome, PartitionError>
where
    G: LouvainGraph + ?Sized,
{
    let cfg = LouvainConfig {
        num_threads,
        threshold,
        lower_bound: lower,
        strategy: DeltaStrategy::ThreadLocal,
    };
    Louvain::new(cfg).run(graph)
}

#[cfg(test)]
mod tests;
