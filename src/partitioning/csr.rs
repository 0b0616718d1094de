//! Compressed sparse row graph container consumed by the Louvain engine.
//!
//! A [`CsrGraph`] stores, for every vertex `v`, the half-open slice
//! `edge_list[edge_indices[v]..edge_indices[v + 1]]` of its outgoing edges. Undirected graphs
//! store each edge twice (once per endpoint) and each self-loop once, so the sum of all
//! weighted degrees equals twice the undirected edge mass.
//!
//! All validation happens at construction; once built, the graph is immutable and can be
//! shared across worker threads by reference.

use crate::partitioning::error::GraphError;
use crate::partitioning::graph_traits::{Edge, LouvainGraph};
use itertools::{Itertools, MinMaxResult};
use rayon::prelude::*;
use std::ops::Range;

/// Read-only CSR adjacency.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrGraph {
    edge_indices: Vec<usize>,
    edge_list: Vec<Edge>,
}

/// Summary statistics reported by drivers after loading a graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphStats {
    pub vertices: usize,
    pub edges: usize,
    pub min_degree: usize,
    pub max_degree: usize,
    pub mean_degree: f64,
    pub stddev_degree: f64,
    pub total_weight: f64,
}

impl CsrGraph {
    /// Build a graph from raw CSR arrays, validating offsets, tails and weights.
    pub fn new(edge_indices: Vec<usize>, edge_list: Vec<Edge>) -> Result<Self, GraphError> {
        let first = edge_indices.first().copied().unwrap_or(0);
        if first != 0 {
            return Err(GraphError::OffsetsNotZeroBased(first));
        }
        for (vertex, w) in edge_indices.windows(2).enumerate() {
            if w[0] > w[1] {
                return Err(GraphError::OffsetsNotMonotone {
                    vertex,
                    start: w[0],
                    end: w[1],
                });
            }
        }
        let last = edge_indices.last().copied().unwrap_or(0);
        if last != edge_list.len() {
            return Err(GraphError::OffsetsLengthMismatch {
                last,
                edges: edge_list.len(),
            });
        }
        let vertices = edge_indices.len().saturating_sub(1);
        for (edge, e) in edge_list.iter().enumerate() {
            if e.tail >= vertices {
                return Err(GraphError::TailOutOfRange {
                    edge,
                    tail: e.tail,
                    vertices,
                });
            }
            if !e.weight.is_finite() || e.weight < 0.0 {
                return Err(GraphError::InvalidWeight {
                    edge,
                    weight: e.weight,
                });
            }
        }
        let edge_indices = if edge_indices.is_empty() {
            vec![0]
        } else {
            edge_indices
        };
        Ok(Self {
            edge_indices,
            edge_list,
        })
    }

    /// Build a symmetric graph on `n` vertices from undirected `(u, v, w)` triples.
    ///
    /// Every edge is stored once per endpoint; a self-loop `(u, u, w)` is stored once.
    /// Neighbor order within a vertex follows input order.
    pub fn from_undirected(n: usize, edges: &[(usize, usize, f64)]) -> Result<Self, GraphError> {
        let mut counts = vec![0usize; n];
        for (i, &(u, v, _)) in edges.iter().enumerate() {
            for x in [u, v] {
                if x >= n {
                    return Err(GraphError::TailOutOfRange {
                        edge: i,
                        tail: x,
                        vertices: n,
                    });
                }
            }
            counts[u] += 1;
            if u != v {
                counts[v] += 1;
            }
        }

        let mut edge_indices = Vec::with_capacity(n + 1);
        edge_indices.push(0);
        for c in &counts {
            let prev = *edge_indices.last().unwrap_or(&0);
            edge_indices.push(prev + c);
        }

        let mut cursor: Vec<usize> = edge_indices[..n].to_vec();
        let mut edge_list = vec![Edge::new(0, 0.0); edge_indices[n]];
        for &(u, v, w) in edges {
            edge_list[cursor[u]] = Edge::new(v, w);
            cursor[u] += 1;
            if u != v {
                edge_list[cursor[v]] = Edge::new(u, w);
                cursor[v] += 1;
            }
        }

        Self::new(edge_indices, edge_list)
    }

    /// Replace every edge weight with `1.0`.
    pub fn set_unit_weights(&mut self) {
        self.edge_list
            .par_iter_mut()
            .for_each(|e| e.weight = 1.0);
    }

    /// CSR offsets (`n + 1` entries).
    pub fn edge_indices(&self) -> &[usize] {
        &self.edge_indices
    }

    /// Flat edge list.
    pub fn edge_list(&self) -> &[Edge] {
        &self.edge_list
    }

    /// Neighbor slice of vertex `v`.
    #[inline]
    pub fn neighbors(&self, v: usize) -> &[Edge] {
        &self.edge_list[self.edge_indices[v]..self.edge_indices[v + 1]]
    }

    /// Degree distribution and weight totals.
    pub fn stats(&self) -> GraphStats {
        let n = self.vertex_count();
        let degrees: Vec<usize> = self.edge_indices.windows(2).map(|w| w[1] - w[0]).collect();
        let (min_degree, max_degree) = match degrees.iter().copied().minmax() {
            MinMaxResult::NoElements => (0, 0),
            MinMaxResult::OneElement(d) => (d, d),
            MinMaxResult::MinMax(lo, hi) => (lo, hi),
        };
        let (mean_degree, stddev_degree) = if n == 0 {
            (0.0, 0.0)
        } else {
            let mean = self.edge_list.len() as f64 / n as f64;
            let var = degrees
                .iter()
                .map(|&d| (d as f64 - mean).powi(2))
                .sum::<f64>()
                / n as f64;
            (mean, var.sqrt())
        };
        GraphStats {
            vertices: n,
            edges: self.edge_list.len(),
            min_degree,
            max_degree,
            mean_degree,
            stddev_degree,
            total_weight: self.edge_list.par_iter().map(|e| e.weight).sum(),
        }
    }
}

impl LouvainGraph for CsrGraph {
    #[inline]
    fn vertex_count(&self) -> usize {
        self.edge_indices.len() - 1
    }

    #[inline]
    fn edge_range(&self, v: usize) -> Range<usize> {
        self.edge_indices[v]..self.edge_indices[v + 1]
    }

    #[inline]
    fn edge(&self, e: usize) -> Edge {
        self.edge_list[e]
    }

    fn edge_count(&self) -> usize {
        self.edge_list.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_undirected_stores_both_directions() {
        let g = CsrGraph::from_undirected(3, &[(0, 1, 1.0), (1, 2, 2.0)]).unwrap();
        assert_eq!(g.edge_indices(), &[0, 1, 3, 4]);
        assert_eq!(g.neighbors(1), &[Edge::new(0, 1.0), Edge::new(2, 2.0)]);
        assert_eq!(g.weighted_degree(2), 2.0);
    }

    #[test]
    fn self_loop_is_stored_once() {
        let g = CsrGraph::from_undirected(2, &[(0, 0, 3.0), (0, 1, 1.0)]).unwrap();
        assert_eq!(g.neighbors(0), &[Edge::new(0, 3.0), Edge::new(1, 1.0)]);
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn rejects_out_of_range_endpoint() {
        let err = CsrGraph::from_undirected(2, &[(0, 2, 1.0)]).unwrap_err();
        assert!(matches!(err, GraphError::TailOutOfRange { tail: 2, .. }));
    }

    #[test]
    fn rejects_bad_offsets_and_weights() {
        let e = vec![Edge::new(0, 1.0)];
        assert!(matches!(
            CsrGraph::new(vec![1, 1], e.clone()),
            Err(GraphError::OffsetsNotZeroBased(1))
        ));
        assert!(matches!(
            CsrGraph::new(vec![0, 1, 0], e.clone()),
            Err(GraphError::OffsetsNotMonotone { vertex: 1, .. })
        ));
        assert!(matches!(
            CsrGraph::new(vec![0, 0], e),
            Err(GraphError::OffsetsLengthMismatch { last: 0, edges: 1 })
        ));
        assert!(matches!(
            CsrGraph::new(vec![0, 1], vec![Edge::new(0, -1.0)]),
            Err(GraphError::InvalidWeight { edge: 0, .. })
        ));
        assert!(matches!(
            CsrGraph::new(vec![0, 1], vec![Edge::new(0, f64::NAN)]),
            Err(GraphError::InvalidWeight { edge: 0, .. })
        ));
    }

    #[test]
    fn empty_offsets_mean_empty_graph() {
        let g = CsrGraph::new(Vec::new(), Vec::new()).unwrap();
        assert_eq!(g.vertex_count(), 0);
        assert_eq!(g.stats().vertices, 0);
    }

    #[test]
    fn unit_weights_override() {
        let mut g = CsrGraph::from_undirected(2, &[(0, 1, 7.5)]).unwrap();
        g.set_unit_weights();
        assert!(g.edge_list().iter().all(|e| e.weight == 1.0));
    }

    #[test]
    fn stats_on_star() {
        // star centered at 0 with three leaves
        let g = CsrGraph::from_undirected(4, &[(0, 1, 1.0), (0, 2, 1.0), (0, 3, 2.0)]).unwrap();
        let s = g.stats();
        assert_eq!(s.vertices, 4);
        assert_eq!(s.edges, 6);
        assert_eq!((s.min_degree, s.max_degree), (1, 3));
        assert!((s.mean_degree - 1.5).abs() < 1e-12);
        assert!((s.stddev_degree - 0.75f64.sqrt()).abs() < 1e-12);
        assert_eq!(s.total_weight, 8.0);
    }
}
