//! Parallel vertex sweep for the Louvain engine.
//!
//! One sweep runs the move decision for every vertex exactly once. The vertex range is cut
//! into `num_threads` contiguous chunks (the first `n % num_threads` chunks get one extra
//! vertex) and each non-empty chunk is handed to a freshly spawned scoped OS thread; the
//! sweep returns only after every worker has joined.
//!
//! Inputs shared by all workers (graph, weighted degrees, current assignment and the live
//! community aggregates) are borrowed read-only. `target_comm` and the cluster weights are
//! split into disjoint sub-slices matching each worker's chunk. Community deltas are the only
//! state several workers can touch at once; [`DeltaStrategy`] selects how they are combined.

use crate::partitioning::error::PartitionError;
use crate::partitioning::graph_traits::LouvainGraph;
use crate::partitioning::louvain::decision::{MoveContext, best_community};
use crate::partitioning::louvain::neighbors::NeighborCommunities;
use crate::partitioning::state::{
    Community, CommunityDelta, CommunityStore, DeltaSink, DeltaTable,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::thread;

/// How workers publish community size/degree deltas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeltaStrategy {
    /// Each worker fills a private sparse table; tables are folded in worker order after join.
    #[default]
    ThreadLocal,
    /// Workers write straight into the store's pending buffer under one global lock.
    SharedLock,
}

/// Counters gathered by one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Vertices whose target differs from their current community.
    pub moved: usize,
    /// Edges ignored because their vertex's neighbor table was full.
    pub dropped_edges: usize,
}

impl std::ops::AddAssign for SweepStats {
    fn add_assign(&mut self, rhs: Self) {
        self.moved += rhs.moved;
        self.dropped_edges += rhs.dropped_edges;
    }
}

/// Split `0..n` into `parts` contiguous, near-equal ranges.
pub fn chunk_bounds(n: usize, parts: usize) -> Vec<Range<usize>> {
    let parts = parts.max(1);
    let chunk = n / parts;
    let remainder = n % parts;
    let mut start = 0;
    (0..parts)
        .map(|i| {
            let end = start + chunk + usize::from(i < remainder);
            let r = start..end;
            start = end;
            r
        })
        .collect()
}

/// Read-only view of one pass, shared by every worker.
pub struct VertexSweep<'a, G: ?Sized> {
    pub graph: &'a G,
    pub vertex_degrees: &'a [f64],
    pub curr_comm: &'a [usize],
    pub constant: f64,
    pub num_threads: usize,
    pub strategy: DeltaStrategy,
}

struct WorkerOutput {
    deltas: DeltaTable,
    stats: SweepStats,
}

impl<'a, G: LouvainGraph + ?Sized> VertexSweep<'a, G> {
    /// Decide a target for every vertex, writing `target_comm`, accumulating `cluster_weight`
    /// and filling `store`'s pending deltas.
    ///
    /// # Errors
    /// [`PartitionError::ThreadSpawn`] if a worker cannot be created; workers already started
    /// are joined before returning and their output is discarded.
    pub fn run(
        &self,
        target_comm: &mut [usize],
        cluster_weight: &mut [f64],
        store: &mut CommunityStore,
    ) -> Result<SweepStats, PartitionError> {
        let n = self.graph.vertex_count();
        debug_assert_eq!(target_comm.len(), n);
        debug_assert_eq!(cluster_weight.len(), n);

        let (communities, pending) = store.split_pending_mut();
        let shared = Mutex::new(pending);

        let outputs = thread::scope(|scope| -> Result<Vec<WorkerOutput>, PartitionError> {
            let mut targets_rest = target_comm;
            let mut weights_rest = cluster_weight;
            let mut handles = Vec::with_capacity(self.num_threads);

            for (worker, range) in chunk_bounds(n, self.num_threads).into_iter().enumerate() {
                if range.is_empty() {
                    continue;
                }
                let (targets, t_rest) = std::mem::take(&mut targets_rest).split_at_mut(range.len());
                let (weights, w_rest) = std::mem::take(&mut weights_rest).split_at_mut(range.len());
                targets_rest = t_rest;
                weights_rest = w_rest;

                let shared = &shared;
                let handle = thread::Builder::new()
                    .name(format!("louvain-{worker}"))
                    .spawn_scoped(scope, move || {
                        self.sweep_chunk(range, targets, weights, communities, shared)
                    })
                    .map_err(|source| PartitionError::ThreadSpawn { worker, source })?;
                handles.push((worker, handle));
            }

            handles
                .into_iter()
                .map(|(worker, h)| h.join().map_err(|_| PartitionError::WorkerPanicked(worker)))
                .collect()
        })?;
        drop(shared);

        let mut stats = SweepStats::default();
        for out in &outputs {
            store.absorb(&out.deltas);
            stats += out.stats;
        }
        Ok(stats)
    }

    fn sweep_chunk(
        &self,
        range: Range<usize>,
        targets: &mut [usize],
        weights: &mut [f64],
        communities: &[Community],
        shared: &Mutex<&mut [CommunityDelta]>,
    ) -> WorkerOutput {
        let mut table = NeighborCommunities::new();
        let mut deltas = DeltaTable::new();
        let mut stats = SweepStats::default();

        for (offset, v) in range.enumerate() {
            let current = self.curr_comm[v];
            let vertex_degree = self.vertex_degrees[v];

            let target = if table.build(self.graph, v, self.curr_comm) {
                weights[offset] += table.own_weight();
                if table.dropped_edges() > 0 {
                    log::trace!(
                        "vertex {v}: neighbor table full, dropped {} edges",
                        table.dropped_edges()
                    );
                    stats.dropped_edges += table.dropped_edges();
                }
                let ctx = MoveContext {
                    vertex_degree,
                    current,
                    current_info: communities[current],
                    constant: self.constant,
                };
                best_community(&table, communities, &ctx)
            } else {
                current
            };

            if target != current {
                stats.moved += 1;
                match self.strategy {
                    DeltaStrategy::ThreadLocal => {
                        deltas.record_move(current, target, vertex_degree)
                    }
                    DeltaStrategy::SharedLock => {
                        let mut guard = shared.lock();
                        guard.record_move(current, target, vertex_degree);
                    }
                }
            }
            targets[offset] = target;
        }

        WorkerOutput { deltas, stats }
    }
}
