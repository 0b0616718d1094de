// Graph trait abstraction for the Louvain engine
use std::ops::Range;

/// One directed half of an adjacency entry: the endpoint reached and the edge weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Vertex at the far end of the edge.
    pub tail: usize,
    /// Non-negative edge weight.
    pub weight: f64,
}

impl Edge {
    #[inline]
    pub fn new(tail: usize, weight: f64) -> Self {
        Self { tail, weight }
    }
}

/// Trait for graphs the Louvain engine can sweep.
///
/// All methods are read-only and must be safe to call from many worker threads at once.
/// Implementors guarantee that vertex ids are dense (`0..vertex_count()`), that edge ranges
/// are half-open and index into one shared edge list, and that weights are finite and
/// non-negative. The engine itself performs no validation.
pub trait LouvainGraph: Sync {
    /// Number of vertices.
    fn vertex_count(&self) -> usize;

    /// Half-open range of edge-list positions owned by `v`.
    fn edge_range(&self, v: usize) -> Range<usize>;

    /// Edge stored at position `e` of the edge list.
    fn edge(&self, e: usize) -> Edge;

    /// Number of stored (directed) edges.
    fn edge_count(&self) -> usize {
        match self.vertex_count() {
            0 => 0,
            n => self.edge_range(n - 1).end,
        }
    }

    /// Iterator over the edges leaving `v`, in storage order.
    fn edges_of(&self, v: usize) -> impl Iterator<Item = Edge> + '_ {
        self.edge_range(v).map(move |e| self.edge(e))
    }

    /// Sum of the weights of the edges leaving `v`.
    fn weighted_degree(&self, v: usize) -> f64 {
        self.edges_of(v).map(|e| e.weight).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Adjacency-list graph that lays its edges out back to back.
    struct TestGraph {
        offsets: Vec<usize>,
        edges: Vec<Edge>,
    }

    impl TestGraph {
        fn from_adj(adj: &[Vec<(usize, f64)>]) -> Self {
            let mut offsets = vec![0];
            let mut edges = Vec::new();
            for nbrs in adj {
                edges.extend(nbrs.iter().map(|&(t, w)| Edge::new(t, w)));
                offsets.push(edges.len());
            }
            Self { offsets, edges }
        }
    }

    impl LouvainGraph for TestGraph {
        fn vertex_count(&self) -> usize {
            self.offsets.len() - 1
        }
        fn edge_range(&self, v: usize) -> Range<usize> {
            self.offsets[v]..self.offsets[v + 1]
        }
        fn edge(&self, e: usize) -> Edge {
            self.edges[e]
        }
    }

    #[test]
    fn test_edges_of_path() {
        // 3-node path: 0-1-2
        let g = TestGraph::from_adj(&[
            vec![(1, 1.0)],
            vec![(0, 1.0), (2, 2.5)],
            vec![(1, 2.5)],
        ]);
        let tails: Vec<_> = g.edges_of(1).map(|e| e.tail).collect();
        assert_eq!(tails, vec![0, 2]);
        assert_eq!(g.edge_count(), 4);
        assert_eq!(g.weighted_degree(1), 3.5);
    }

    #[test]
    fn test_isolated_vertex_has_empty_range() {
        let g = TestGraph::from_adj(&[vec![], vec![(1, 1.0)]]);
        assert!(g.edge_range(0).is_empty());
        assert_eq!(g.edges_of(0).count(), 0);
        assert_eq!(g.weighted_degree(0), 0.0);
    }
}
