//! Per-pass observability hook.
//!
//! The pass controller hands every finished pass to a [`PassObserver`] together with the
//! community store as it stands after the merge step. Timings are measured by the controller
//! and are not part of the engine's result.

use crate::partitioning::state::CommunityStore;
use std::ops::AddAssign;
use std::time::Duration;

/// Wall-clock time spent in each phase of one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseTimings {
    /// Zeroing cluster weights and pending deltas.
    pub clear: Duration,
    /// Parallel vertex sweep, including thread spawn and join.
    pub sweep: Duration,
    /// Folding pending deltas into the aggregates.
    pub merge: Duration,
    /// Modularity evaluation.
    pub modularity: Duration,
    /// Assignment rotation (zero for the final, discarded pass).
    pub commit: Duration,
}

impl PhaseTimings {
    pub fn total(&self) -> Duration {
        self.clear + self.sweep + self.merge + self.modularity + self.commit
    }
}

impl AddAssign for PhaseTimings {
    fn add_assign(&mut self, rhs: Self) {
        self.clear += rhs.clear;
        self.sweep += rhs.sweep;
        self.merge += rhs.merge;
        self.modularity += rhs.modularity;
        self.commit += rhs.commit;
    }
}

/// Outcome of one pass as seen by observers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassReport {
    /// 1-based pass number.
    pub iteration: usize,
    /// Modularity computed by this pass.
    pub modularity: f64,
    /// Accepted modularity this pass was compared against.
    pub previous_modularity: f64,
    /// Vertices whose target differed from their current community.
    pub moved_vertices: usize,
    /// Edges skipped because a neighbor table was full.
    pub dropped_edges: usize,
    /// `true` for the last pass, whose assignment is not committed.
    pub converged: bool,
    pub timings: PhaseTimings,
}

/// Receives a report after every pass.
pub trait PassObserver {
    fn on_pass(&mut self, report: &PassReport, store: &CommunityStore);
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PassObserver for NoopObserver {
    fn on_pass(&mut self, _report: &PassReport, _store: &CommunityStore) {}
}

/// Accumulates phase timings and the modularity trace across passes.
#[derive(Debug, Clone, Default)]
pub struct TimingObserver {
    pub totals: PhaseTimings,
    pub passes: usize,
    pub modularity_trace: Vec<f64>,
    pub moved_trace: Vec<usize>,
}

impl PassObserver for TimingObserver {
    fn on_pass(&mut self, report: &PassReport, _store: &CommunityStore) {
        self.totals += report.timings;
        self.passes += 1;
        self.modularity_trace.push(report.modularity);
        self.moved_trace.push(report.moved_vertices);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_observer_accumulates() {
        let store = CommunityStore::from_degrees(&[1.0]);
        let mut obs = TimingObserver::default();
        let mut report = PassReport {
            iteration: 1,
            modularity: -0.5,
            previous_modularity: -1.0,
            moved_vertices: 3,
            dropped_edges: 0,
            converged: false,
            timings: PhaseTimings {
                sweep: Duration::from_millis(4),
                merge: Duration::from_millis(1),
                ..Default::default()
            },
        };
        obs.on_pass(&report, &store);
        report.iteration = 2;
        report.moved_vertices = 0;
        obs.on_pass(&report, &store);
        assert_eq!(obs.passes, 2);
        assert_eq!(obs.totals.sweep, Duration::from_millis(8));
        assert_eq!(obs.totals.total(), Duration::from_millis(10));
        assert_eq!(obs.moved_trace, vec![3, 0]);
    }
}
