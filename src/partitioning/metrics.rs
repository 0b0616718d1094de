//! Partition quality metrics.
//!
//! [`modularity`] is the evaluator used by the pass controller; it reads the merged
//! community aggregates and the per-vertex cluster weights of the pass. The remaining
//! helpers summarize a final assignment for drivers and tests.

use crate::partitioning::state::CommunityStore;
use hashbrown::HashMap;

/// Newman-Girvan modularity from aggregates:
///
/// `Q = Σ cluster_weight · c − Σ_c degree_c² · c²`, with `c = 1 / Σ vDegree`.
///
/// Pure and O(n).
pub fn modularity(store: &CommunityStore, cluster_weight: &[f64], constant: f64) -> f64 {
    let le_xx: f64 = cluster_weight.iter().sum();
    let la2_x = store.sum_squared_degrees();
    le_xx * constant - la2_x * constant * constant
}

/// Member count of every non-empty community in `assignment`.
pub fn community_sizes(assignment: &[usize]) -> HashMap<usize, usize> {
    let mut sizes = HashMap::new();
    for &c in assignment {
        *sizes.entry(c).or_insert(0) += 1;
    }
    sizes
}

/// Number of distinct communities in `assignment`.
pub fn community_count(assignment: &[usize]) -> usize {
    community_sizes(assignment).len()
}

/// Members of each community, sorted by community id then vertex id.
pub fn community_members(assignment: &[usize]) -> Vec<(usize, Vec<usize>)> {
    let mut groups: HashMap<usize, Vec<usize>> = HashMap::new();
    for (v, &c) in assignment.iter().enumerate() {
        groups.entry(c).or_default().push(v);
    }
    let mut out: Vec<_> = groups.into_iter().collect();
    out.sort_unstable_by_key(|(c, _)| *c);
    out
}
