use serde::{Deserialize, Serialize};

use crate::walk_billiard::BilliardReport;

/// Counters collected while a chain runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkStats {
    /// Walk steps executed, including the bootstrap step.
    pub steps: usize,
    /// Accepted ball-walk proposals.
    pub ball_accepted: usize,
    /// Rejected ball-walk proposals.
    pub ball_rejected: usize,
    /// Reflections performed by billiard trajectories.
    pub reflections: usize,
    /// Billiard trajectories stopped by the reflection cap.
    pub capped_trajectories: usize,
    /// Candidate samples produced by the chain.
    pub generated: usize,
    /// Samples handed back to the caller.
    pub retained: usize,
}

impl WalkStats {
    /// Creates an empty set of counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome of a ball-walk proposal.
    pub fn note_ball(&mut self, accepted: bool) {
        if accepted {
            self.ball_accepted += 1;
        } else {
            self.ball_rejected += 1;
        }
    }

    /// Records a billiard trajectory.
    pub fn note_billiard(&mut self, report: &BilliardReport) {
        self.reflections += report.reflections;
        if report.capped {
            self.capped_trajectories += 1;
        }
    }

    /// Fraction of accepted ball-walk proposals, if any were made.
    pub fn ball_acceptance_rate(&self) -> Option<f64> {
        let total = self.ball_accepted + self.ball_rejected;
        if total == 0 {
            None
        } else {
            Some(self.ball_accepted as f64 / total as f64)
        }
    }

    /// Fraction of generated samples that were retained, if any were generated.
    pub fn retention_rate(&self) -> Option<f64> {
        if self.generated == 0 {
            None
        } else {
            Some(self.retained as f64 / self.generated as f64)
        }
    }
}
