//! Bounded per-vertex table of neighboring communities.
//!
//! For one vertex, [`NeighborCommunities::build`] walks its edges once and accumulates the
//! edge weight reaching each distinct community of the current assignment. Lookup is a
//! linear scan over at most [`MAX_NEIGHBOR_COMMUNITIES`] entries.
//!
//! Entry 0 is always the vertex's own community (seeded with weight 0.0 before the scan), so
//! the weight the vertex keeps inside its community is available even when no neighbor shares
//! it. Once the table is full, edges reaching a community not yet recorded are dropped, so a
//! vertex touching more than 32 communities only considers the first 32 seen in edge order.

use crate::partitioning::graph_traits::LouvainGraph;

/// Capacity of the per-vertex table, including the vertex's own community.
pub const MAX_NEIGHBOR_COMMUNITIES: usize = 32;

/// Scratch table reused by a worker for every vertex of its chunk.
#[derive(Debug, Clone)]
pub struct NeighborCommunities {
    communities: [usize; MAX_NEIGHBOR_COMMUNITIES],
    weights: [f64; MAX_NEIGHBOR_COMMUNITIES],
    len: usize,
    self_loop: f64,
    dropped: usize,
}

impl Default for NeighborCommunities {
    fn default() -> Self {
        Self::new()
    }
}

impl NeighborCommunities {
    pub fn new() -> Self {
        Self {
            communities: [0; MAX_NEIGHBOR_COMMUNITIES],
            weights: [0.0; MAX_NEIGHBOR_COMMUNITIES],
            len: 0,
            self_loop: 0.0,
            dropped: 0,
        }
    }

    /// Rebuild the table for `vertex` against the assignment `curr_comm`.
    ///
    /// Returns `false` (and leaves the table empty) when the vertex has no edges.
    pub fn build<G: LouvainGraph + ?Sized>(
        &mut self,
        graph: &G,
        vertex: usize,
        curr_comm: &[usize],
    ) -> bool {
        self.len = 0;
        self.self_loop = 0.0;
        self.dropped = 0;

        let range = graph.edge_range(vertex);
        if range.is_empty() {
            return false;
        }

        self.communities[0] = curr_comm[vertex];
        self.weights[0] = 0.0;
        self.len = 1;

        for e in range {
            let edge = graph.edge(e);
            if edge.tail == vertex {
                self.self_loop += edge.weight;
            }
            self.accumulate(curr_comm[edge.tail], edge.weight);
        }
        true
    }

    #[inline]
    fn accumulate(&mut self, community: usize, weight: f64) {
        match self.communities[..self.len]
            .iter()
            .position(|&c| c == community)
        {
            Some(slot) => self.weights[slot] += weight,
            None if self.len < MAX_NEIGHBOR_COMMUNITIES => {
                self.communities[self.len] = community;
                self.weights[self.len] = weight;
                self.len += 1;
            }
            None => self.dropped += 1,
        }
    }

    /// Number of distinct communities recorded (0 for an isolated vertex).
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Community recorded in entry 0, i.e. the vertex's current community.
    #[inline]
    pub fn own_community(&self) -> Option<usize> {
        (self.len > 0).then(|| self.communities[0])
    }

    /// Weight from the vertex into its own community, self-loops included.
    #[inline]
    pub fn own_weight(&self) -> f64 {
        if self.len > 0 { self.weights[0] } else { 0.0 }
    }

    /// Sum of the weights of edges from the vertex to itself.
    #[inline]
    pub fn self_loop(&self) -> f64 {
        self.self_loop
    }

    /// Edges whose community did not fit in the table.
    #[inline]
    pub fn dropped_edges(&self) -> usize {
        self.dropped
    }

    /// `(community, accumulated weight)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.communities[..self.len]
            .iter()
            .copied()
            .zip(self.weights[..self.len].iter().copied())
    }

    /// Build a table directly from entries; entry 0 is taken as the vertex's own community.
    #[cfg(test)]
    pub(crate) fn from_entries(entries: &[(usize, f64)], self_loop: f64) -> Self {
        let mut t = Self::new();
        for &(c, w) in entries.iter().take(MAX_NEIGHBOR_COMMUNITIES) {
            t.communities[t.len] = c;
            t.weights[t.len] = w;
            t.len += 1;
        }
        t.self_loop = self_loop;
        t
    }
}
