//! Single-level Louvain modularity optimization.
//!
//! ## Objective (Newman-Girvan modularity)
//!
//! Let `k_i` be the weighted degree of vertex `i` (sum of its stored edge weights) and
//! `c = 1 / Σ_i k_i`. For a partition with per-community degree sums `deg_x` and per-vertex
//! same-community weights `w_i`,
//!
//! ```text
//! Q = c · Σ_i w_i − c² · Σ_x deg_x²
//! ```
//!
//! ## Passes
//!
//! Every vertex starts in its own community (`id = vertex index`). One pass:
//!
//! 1. zero the cluster weights and the pending community deltas;
//! 2. sweep all vertices in parallel against a frozen snapshot of the assignment and the
//!    community aggregates ([`crate::partitioning::parallel`]);
//! 3. fold the pending deltas into the aggregates;
//! 4. evaluate `Q`;
//! 5. stop if `Q − Q_prev < threshold`, returning `Q_prev`; otherwise accept
//!    `Q_prev = max(Q, lower_bound)` and rotate `past ← curr ← target`.
//!
//! The stopping pass is discarded from the reported score and assignment, although its deltas
//! have already been merged into the aggregates. There is no iteration cap; termination rests
//! on the threshold and on modularity being bounded.
//!
//! Communities are never renumbered and the graph is never coarsened.

use crate::debug_invariants::DebugInvariants;
use crate::partitioning::LouvainConfig;
use crate::partitioning::error::PartitionError;
use crate::partitioning::graph_traits::LouvainGraph;
use crate::partitioning::metrics::{self, community_count};
use crate::partitioning::observer::{NoopObserver, PassObserver, PassReport, PhaseTimings};
use crate::partitioning::parallel::VertexSweep;
use crate::partitioning::state::CommunityStore;
use log::{debug, info, warn};
use rayon::prelude::*;
use std::time::Instant;

pub mod counters;
pub mod decision;
pub mod neighbors;

/// Result of a Louvain run.
#[derive(Debug, Clone, PartialEq)]
pub struct LouvainOutcome {
    /// Last accepted modularity.
    pub modularity: f64,
    /// Number of passes executed, the discarded stopping pass included.
    pub iterations: usize,
    /// Committed community id of every vertex.
    pub communities: Vec<usize>,
}

impl LouvainOutcome {
    /// Number of distinct communities in the committed assignment.
    pub fn community_count(&self) -> usize {
        community_count(&self.communities)
    }
}

/// Louvain runner bound to one configuration.
#[derive(Debug, Clone, Default)]
pub struct Louvain {
    cfg: LouvainConfig,
}

/// Per-run state owned by the pass controller.
struct PassState {
    vertex_degrees: Vec<f64>,
    past_comm: Vec<usize>,
    curr_comm: Vec<usize>,
    target_comm: Vec<usize>,
    cluster_weight: Vec<f64>,
    store: CommunityStore,
    constant: f64,
}

impl PassState {
    fn init<G: LouvainGraph + ?Sized>(graph: &G) -> Self {
        let n = graph.vertex_count();
        let vertex_degrees: Vec<f64> = (0..n)
            .into_par_iter()
            .map(|v| graph.weighted_degree(v))
            .collect();
        let store = CommunityStore::from_degrees(&vertex_degrees);
        let total: f64 = vertex_degrees.iter().sum();
        Self {
            vertex_degrees,
            past_comm: (0..n).collect(),
            curr_comm: (0..n).collect(),
            target_comm: vec![0; n],
            cluster_weight: vec![0.0; n],
            store,
            constant: 1.0 / total,
        }
    }

    fn clear(&mut self) {
        self.cluster_weight.fill(0.0);
        self.store.clear_pending();
    }

    /// `past ← curr`, `curr ← target`; the old `past` becomes next pass's scratch.
    fn commit(&mut self) {
        std::mem::swap(&mut self.past_comm, &mut self.curr_comm);
        std::mem::swap(&mut self.curr_comm, &mut self.target_comm);
    }
}

impl Louvain {
    pub fn new(cfg: LouvainConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &LouvainConfig {
        &self.cfg
    }

    /// Run to convergence.
    pub fn run<G: LouvainGraph + ?Sized>(&self, graph: &G) -> Result<LouvainOutcome, PartitionError> {
        self.run_with_observer(graph, &mut NoopObserver)
    }

    /// Run to convergence, reporting every pass to `observer`.
    ///
    /// # Errors
    /// - [`PartitionError::InvalidParameter`] if the configuration does not validate.
    /// - [`PartitionError::ThreadSpawn`] / [`PartitionError::WorkerPanicked`] if a sweep
    ///   cannot complete; no partial result is returned.
    pub fn run_with_observer<G, O>(
        &self,
        graph: &G,
        observer: &mut O,
    ) -> Result<LouvainOutcome, PartitionError>
    where
        G: LouvainGraph + ?Sized,
        O: PassObserver + ?Sized,
    {
        self.cfg.validate()?;
        let cfg = &self.cfg;

        let t_init = Instant::now();
        let mut state = PassState::init(graph);
        let n = state.curr_comm.len();
        debug!(
            "louvain init: {n} vertices, constant {:e}, threshold {:e}, {} threads, {:?} ({:?})",
            state.constant,
            cfg.threshold,
            cfg.num_threads,
            cfg.strategy,
            t_init.elapsed()
        );

        if !state.constant.is_finite() {
            warn!("graph has no edge weight; every vertex stays in its own community");
            return Ok(LouvainOutcome {
                modularity: 0.0,
                iterations: 0,
                communities: state.curr_comm,
            });
        }

        let mut prev_mod = cfg.lower_bound;
        let mut iterations = 0;

        loop {
            iterations += 1;
            let mut timings = PhaseTimings::default();

            let t = Instant::now();
            state.clear();
            timings.clear = t.elapsed();

            let t = Instant::now();
            let sweep = VertexSweep {
                graph,
                vertex_degrees: &state.vertex_degrees,
                curr_comm: &state.curr_comm,
                constant: state.constant,
                num_threads: cfg.num_threads,
                strategy: cfg.strategy,
            };
            let stats = sweep.run(
                &mut state.target_comm,
                &mut state.cluster_weight,
                &mut state.store,
            )?;
            timings.sweep = t.elapsed();

            let t = Instant::now();
            state.store.merge_pending();
            timings.merge = t.elapsed();
            state.store.debug_assert_invariants();

            let t = Instant::now();
            let curr_mod = metrics::modularity(&state.store, &state.cluster_weight, state.constant);
            timings.modularity = t.elapsed();

            let converged = curr_mod - prev_mod < cfg.threshold;
            if !converged {
                let t = Instant::now();
                state.commit();
                timings.commit = t.elapsed();
            }

            let report = PassReport {
                iteration: iterations,
                modularity: curr_mod,
                previous_modularity: prev_mod,
                moved_vertices: stats.moved,
                dropped_edges: stats.dropped_edges,
                converged,
                timings,
            };
            debug!(
                "pass {iterations}: modularity {curr_mod:.6} (prev {prev_mod:.6}), {} moved, {:?}",
                stats.moved,
                timings.total()
            );
            observer.on_pass(&report, &state.store);

            if converged {
                break;
            }
            prev_mod = curr_mod.max(cfg.lower_bound);
        }

        info!("louvain converged after {iterations} passes, modularity {prev_mod:.6}");
        Ok(LouvainOutcome {
            modularity: prev_mod,
            iterations,
            communities: state.curr_comm,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partitioning::csr::CsrGraph;
    use crate::partitioning::observer::TimingObserver;
    use crate::partitioning::parallel::DeltaStrategy;

    fn cfg(threads: usize) -> LouvainConfig {
        LouvainConfig::default().with_threads(threads)
    }

    #[test]
    fn test_two_disjoint_edges() {
        let g = CsrGraph::from_undirected(4, &[(0, 1, 1.0), (2, 3, 1.0)]).unwrap();
        let mut obs = TimingObserver::default();
        let out = Louvain::new(cfg(2)).run_with_observer(&g, &mut obs).unwrap();
        assert_eq!(out.communities, vec![0, 0, 2, 2]);
        assert!((out.modularity - 0.5).abs() < 1e-12);
        // every move happens in the first pass
        assert_eq!(obs.moved_trace[0], 2);
        assert!(obs.moved_trace[1..].iter().all(|&m| m == 0));
        assert_eq!(out.iterations, obs.passes);
    }

    #[test]
    fn test_modularity_trace_and_stop() {
        let g = CsrGraph::from_undirected(4, &[(0, 1, 1.0), (2, 3, 1.0)]).unwrap();
        let mut obs = TimingObserver::default();
        let out = Louvain::new(cfg(1)).run_with_observer(&g, &mut obs).unwrap();
        assert_eq!(out.iterations, 3);
        let expected = [-0.5, 0.5, 0.5];
        for (q, e) in obs.modularity_trace.iter().zip(expected) {
            assert!((q - e).abs() < 1e-12, "trace {:?}", obs.modularity_trace);
        }
    }

    #[test]
    fn test_two_triangles_with_bridge() {
        let edges = [
            (0, 1, 1.0),
            (1, 2, 1.0),
            (0, 2, 1.0),
            (3, 4, 1.0),
            (4, 5, 1.0),
            (3, 5, 1.0),
            (2, 3, 1.0),
        ];
        let g = CsrGraph::from_undirected(6, &edges).unwrap();
        for strategy in [DeltaStrategy::ThreadLocal, DeltaStrategy::SharedLock] {
            let out = Louvain::new(cfg(3).with_strategy(strategy)).run(&g).unwrap();
            let c = &out.communities;
            assert_eq!(c[0], c[1]);
            assert_eq!(c[1], c[2]);
            assert_eq!(c[3], c[4]);
            assert_eq!(c[4], c[5]);
            assert_ne!(c[0], c[3]);
            assert!(out.modularity > 0.3);
        }
    }

    #[test]
    fn test_edgeless_graph_identity() {
        let g = CsrGraph::from_undirected(4, &[]).unwrap();
        let out = Louvain::new(cfg(2)).run(&g).unwrap();
        assert_eq!(out.communities, vec![0, 1, 2, 3]);
        assert_eq!(out.iterations, 0);
        assert_eq!(out.modularity, 0.0);
    }

    #[test]
    fn test_isolated_vertex_never_moves() {
        let g = CsrGraph::from_undirected(5, &[(0, 1, 1.0), (1, 2, 1.0), (0, 2, 1.0), (3, 3, 0.0)])
            .unwrap();
        let out = Louvain::new(cfg(4)).run(&g).unwrap();
        assert_eq!(out.communities[3], 3);
        assert_eq!(out.communities[4], 4);
    }

    #[test]
    fn test_rejects_zero_threads() {
        let g = CsrGraph::from_undirected(2, &[(0, 1, 1.0)]).unwrap();
        let err = Louvain::new(cfg(0)).run(&g).unwrap_err();
        assert!(matches!(
            err,
            PartitionError::InvalidParameter { name: "num_threads", .. }
        ));
    }

    #[test]
    fn test_commit_rotates_arrays() {
        let g = CsrGraph::from_undirected(3, &[]).unwrap();
        let mut s = PassState::init(&g);
        s.target_comm = vec![7, 8, 9];
        s.commit();
        assert_eq!(s.curr_comm, vec![7, 8, 9]);
        assert_eq!(s.past_comm, vec![0, 1, 2]);
        assert_eq!(s.target_comm, vec![0, 1, 2]);
    }
}
