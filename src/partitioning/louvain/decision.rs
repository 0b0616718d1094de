//! Target-community selection for a single vertex.
//!
//! For vertex `i` currently in community `x` and a candidate community `y`, the predicted
//! modularity gain of moving `i` from `x` to `y` is
//!
//! ```text
//! e_ix = w(i → x) - selfloop(i)
//! a_x  = deg(x) - k_i
//! gain = 2 (e_iy - e_ix) - 2 k_i (deg(y) - a_x) / Σk
//! ```
//!
//! where `k_i` is the weighted degree of `i` and `1 / Σk` is the constant of the second
//! modularity term. Only strictly positive gains move a vertex. Ties between nonzero gains go
//! to the numerically smaller community id, so the result does not depend on edge order.

use crate::partitioning::louvain::neighbors::NeighborCommunities;
use crate::partitioning::state::Community;

/// Per-vertex inputs of the decision that do not come from the neighbor table.
#[derive(Debug, Clone, Copy)]
pub struct MoveContext {
    /// Weighted degree of the vertex.
    pub vertex_degree: f64,
    /// Current community id.
    pub current: usize,
    /// Live aggregate of the current community.
    pub current_info: Community,
    /// `1 / Σ vDegree`.
    pub constant: f64,
}

/// Pick the community `ctx.current`'s vertex should join.
///
/// Returns `ctx.current` when the table is empty or nothing beats staying put.
pub fn best_community(
    table: &NeighborCommunities,
    communities: &[Community],
    ctx: &MoveContext,
) -> usize {
    let e_ix = table.own_weight() - table.self_loop();
    let a_x = ctx.current_info.degree - ctx.vertex_degree;

    let mut max_index = ctx.current;
    let mut max_gain = 0.0;
    let mut max_size = ctx.current_info.size;

    for (community, e_iy) in table.iter() {
        if community == ctx.current {
            continue;
        }
        let candidate = communities[community];
        let gain = 2.0 * (e_iy - e_ix)
            - 2.0 * ctx.vertex_degree * (candidate.degree - a_x) * ctx.constant;

        if gain > max_gain || (gain == max_gain && gain != 0.0 && community < max_index) {
            max_gain = gain;
            max_index = community;
            max_size = candidate.size;
        }
    }

    // two singletons would otherwise trade labels forever; only the higher id may move
    if max_size == 1 && ctx.current_info.size == 1 && max_index > ctx.current {
        max_index = ctx.current;
    }

    max_index
}
