use crate::partitioning::graph_traits::LouvainGraph;
use hashbrown::HashMap;

/// Brute-force community counters for modularity verification.
#[derive(Debug, Clone)]
pub struct ClusterCounters {
    /// Σ vDegree over the whole graph.
    pub total_degree: f64,
    /// Σ vDegree per community.
    pub degree: HashMap<usize, f64>,
    /// Stored edge weight with both endpoints in the community.
    pub inner: HashMap<usize, f64>,
}

/// Compute cluster counters for a graph and an assignment.
pub fn compute_counters<G>(g: &G, communities: &[usize]) -> ClusterCounters
where
    G: LouvainGraph + ?Sized,
{
    let mut degree: HashMap<usize, f64> = HashMap::new();
    let mut inner: HashMap<usize, f64> = HashMap::new();
    let mut total_degree = 0.0;

    for (v, &c) in communities.iter().enumerate() {
        for e in g.edges_of(v) {
            *degree.entry(c).or_insert(0.0) += e.weight;
            total_degree += e.weight;
            if communities[e.tail] == c {
                *inner.entry(c).or_insert(0.0) += e.weight;
            }
        }
    }

    ClusterCounters {
        total_degree,
        degree,
        inner,
    }
}

impl ClusterCounters {
    /// Modularity recomputed from scratch; 0.0 for a weightless graph.
    pub fn modularity(&self) -> f64 {
        if self.total_degree == 0.0 {
            return 0.0;
        }
        let c = 1.0 / self.total_degree;
        let inner: f64 = self.inner.values().sum();
        let squares: f64 = self.degree.values().map(|d| d * d).sum();
        inner * c - squares * c * c
    }
}
