//! # flat-louvain
//!
//! flat-louvain partitions a weighted graph into communities by greedily maximizing
//! Newman-Girvan modularity (the Louvain local-move phase), running every pass across a fixed
//! number of OS threads.
//!
//! ## Features
//! - Read-only CSR graph container and a [`LouvainGraph`](partitioning::LouvainGraph) trait for
//!   bringing your own adjacency
//! - Bounded 32-entry neighbor-community tables per vertex, no per-vertex allocation
//! - Deterministic tie-breaking: equal gains go to the lowest community id, whatever the edge
//!   order
//! - Thread-local or lock-shared community delta accumulation
//! - Binary edge-list reader and a `louvain` command-line driver
//!
//! ## Determinism
//!
//! Every vertex decides against a frozen snapshot of the previous pass, so the assignment
//! does not depend on the thread count. Floating-point totals may differ in the last bits
//! between thread counts when weights are not exactly representable sums.
//!
//! ## Usage
//!
//! ```rust
//! use flat_louvain::prelude::*;
//!
//! let g = CsrGraph::from_undirected(4, &[(0, 1, 1.0), (2, 3, 1.0)]).unwrap();
//! let out = louvain_method(&g, -1.0, 1e-6, 2).unwrap();
//! assert_eq!(out.communities, vec![0, 0, 2, 2]);
//! assert!((out.modularity - 0.5).abs() < 1e-12);
//! ```
//!
//! Only a single level is computed: communities are never collapsed into super-vertices.

pub mod debug_invariants;
pub mod io;
pub mod partitioning;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::io::binary_edge_list::BinaryEdgeList;
    pub use crate::io::GraphReader;
    pub use crate::partitioning::louvain_method;
    pub use crate::partitioning::{
        CsrGraph, DeltaStrategy, Edge, GraphError, GraphStats, Louvain, LouvainConfig,
        LouvainGraph, LouvainOutcome, NoopObserver, PartitionError, PassObserver, PassReport,
        PhaseTimings, TimingObserver,
    };
}
