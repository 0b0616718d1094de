//! Community aggregate bookkeeping for the Louvain engine.
//!
//! [`CommunityStore`] owns the persistent per-community totals (vertex count and summed
//! weighted degree) and the pending delta buffer filled during one pass. Community ids are
//! vertex indices, so both arrays are indexed `0..n`; communities that lose every member
//! simply keep a zero aggregate.
//!
//! During a sweep the aggregates are read concurrently by every worker and never written;
//! deltas land in the pending buffer (or in per-thread [`DeltaTable`]s) and are folded in by
//! [`CommunityStore::merge_pending`] once all workers have joined.

use crate::debug_invariants::{
    DebugInvariants, ensure_count_conserved, ensure_weight_conserved,
};
use crate::partitioning::error::PartitionError;
use hashbrown::HashMap;

/// Persistent aggregate of one community.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Community {
    /// Number of member vertices.
    pub size: usize,
    /// Sum of the members' weighted degrees.
    pub degree: f64,
}

/// Pending change to a [`Community`] accumulated during a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CommunityDelta {
    pub size: isize,
    pub degree: f64,
}

impl CommunityDelta {
    #[inline]
    fn join(&mut self, vertex_degree: f64) {
        self.size += 1;
        self.degree += vertex_degree;
    }

    #[inline]
    fn leave(&mut self, vertex_degree: f64) {
        self.size -= 1;
        self.degree -= vertex_degree;
    }
}

/// Sparse per-thread delta accumulator, folded into the store after a sweep.
pub type DeltaTable = HashMap<usize, CommunityDelta>;

/// Anything that can record vertex moves between communities.
pub trait DeltaSink {
    fn delta_mut(&mut self, community: usize) -> &mut CommunityDelta;

    /// Record a vertex of weighted degree `vertex_degree` moving from `from` to `to`.
    #[inline]
    fn record_move(&mut self, from: usize, to: usize, vertex_degree: f64) {
        self.delta_mut(to).join(vertex_degree);
        self.delta_mut(from).leave(vertex_degree);
    }
}

impl DeltaSink for [CommunityDelta] {
    #[inline]
    fn delta_mut(&mut self, community: usize) -> &mut CommunityDelta {
        &mut self[community]
    }
}

impl DeltaSink for DeltaTable {
    #[inline]
    fn delta_mut(&mut self, community: usize) -> &mut CommunityDelta {
        self.entry(community).or_default()
    }
}

/// Persistent community aggregates plus the pending delta buffer of the current pass.
#[derive(Debug, Clone)]
pub struct CommunityStore {
    info: Vec<Community>,
    pending: Vec<CommunityDelta>,
    /// Σ vDegree, fixed at construction.
    total_degree: f64,
}

impl CommunityStore {
    /// One singleton community per vertex, carrying that vertex's weighted degree.
    pub fn from_degrees(vertex_degrees: &[f64]) -> Self {
        let info = vertex_degrees
            .iter()
            .map(|&degree| Community { size: 1, degree })
            .collect();
        Self {
            info,
            pending: vec![CommunityDelta::default(); vertex_degrees.len()],
            total_degree: vertex_degrees.iter().sum(),
        }
    }

    #[inline]
    pub fn get(&self, community: usize) -> Community {
        self.info[community]
    }

    /// Live aggregates, indexed by community id.
    pub fn communities(&self) -> &[Community] {
        &self.info
    }

    /// Pending deltas of the current pass.
    pub fn pending(&self) -> &[CommunityDelta] {
        &self.pending
    }

    /// Split borrow: read-only aggregates alongside the mutable pending buffer.
    pub fn split_pending_mut(&mut self) -> (&[Community], &mut [CommunityDelta]) {
        (&self.info, &mut self.pending)
    }

    /// Zero the pending buffer at the start of a pass.
    pub fn clear_pending(&mut self) {
        self.pending.fill(CommunityDelta::default());
    }

    /// Fold a sparse per-thread table into the pending buffer.
    pub fn absorb(&mut self, table: &DeltaTable) {
        for (&community, delta) in table {
            let slot = &mut self.pending[community];
            slot.size += delta.size;
            slot.degree += delta.degree;
        }
    }

    /// Add every pending delta into the persistent aggregates (sequential).
    pub fn merge_pending(&mut self) {
        for (c, d) in self.info.iter_mut().zip(&self.pending) {
            c.size = c.size.saturating_add_signed(d.size);
            c.degree += d.degree;
        }
    }

    /// Σ size over all communities.
    pub fn total_size(&self) -> usize {
        self.info.iter().map(|c| c.size).sum()
    }

    /// Σ degree over all communities.
    pub fn total_degree(&self) -> f64 {
        self.info.iter().map(|c| c.degree).sum()
    }

    /// Σ degree² over all communities (second modularity term before scaling).
    pub fn sum_squared_degrees(&self) -> f64 {
        self.info.iter().map(|c| c.degree * c.degree).sum()
    }

    /// Number of communities with at least one member.
    pub fn community_count(&self) -> usize {
        self.info.iter().filter(|c| c.size > 0).count()
    }
}

impl DebugInvariants for CommunityStore {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "CommunityStore");
    }

    fn validate_invariants(&self) -> Result<(), PartitionError> {
        ensure_count_conserved("community size", self.info.len(), self.total_size())?;
        ensure_weight_conserved("community degree", self.total_degree, self.total_degree())
    }
}
