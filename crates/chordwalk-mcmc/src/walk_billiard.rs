use chordwalk_core::ReflectiveOracle;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::BilliardTuning;
use crate::direction::isotropic_direction;
use crate::state::{BilliardPhase, BilliardState};

/// Parameters of one billiard trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BilliardParams {
    /// Travel budget; the path length is drawn uniformly from `[0, diameter)`.
    pub diameter: f64,
    /// Fraction of the distance to a facet travelled before reflecting.
    pub safety_margin: f64,
    /// Reflections allowed per trajectory, as a multiple of the dimension.
    pub reflection_factor: usize,
}

impl BilliardParams {
    /// Parameters with the default margin (`0.995`) and reflection factor (`3`).
    pub fn new(diameter: f64) -> Self {
        Self::with_tuning(diameter, &BilliardTuning::default())
    }

    /// Parameters with explicit numerical tuning.
    pub fn with_tuning(diameter: f64, tuning: &BilliardTuning) -> Self {
        Self {
            diameter,
            safety_margin: tuning.safety_margin,
            reflection_factor: tuning.reflection_factor,
        }
    }

    /// Reflection cap for a body of dimension `dim`.
    pub fn max_reflections(&self, dim: usize) -> usize {
        self.reflection_factor * dim
    }
}

/// What happened during one billiard trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BilliardReport {
    /// Path length drawn for the trajectory.
    pub requested: f64,
    /// Sum of the segment lengths actually travelled.
    pub traveled: f64,
    /// Number of reflections performed.
    pub reflections: usize,
    /// `true` if the reflection cap stopped the trajectory early.
    pub capped: bool,
}

/// Runs one billiard trajectory from the state's current point.
///
/// Draws a path length `T` uniform in `[0, diameter)` and a uniform
/// direction, then follows the straight line, reflecting specularly off each
/// facet that would be crossed. Before every reflection the trajectory stops
/// at `safety_margin` times the distance to the facet, which keeps the point
/// strictly inside despite round-off. When the reflection cap is reached
/// before `T` is used up, the current point is kept as the result; callers
/// that need exact trajectories can check [`BilliardReport::capped`].
///
/// The facet cache and the last segment length carry over to the next call,
/// so only the first call after [`BilliardState::new`] or
/// [`BilliardState::restart`] recomputes slacks from scratch.
pub fn billiard_step<B, R>(
    state: &mut BilliardState,
    body: &B,
    params: &BilliardParams,
    rng: &mut R,
) -> BilliardReport
where
    B: ReflectiveOracle + ?Sized,
    R: Rng + ?Sized,
{
    let dim = body.dimension();
    let max_reflections = params.max_reflections(dim);
    let requested = rng.gen::<f64>() * params.diameter;
    state.direction = isotropic_direction(dim, rng);

    let mut remaining = requested;
    let mut traveled = 0.0;
    let mut reflections = 0usize;
    let mut lambda_prev = match state.phase {
        BilliardPhase::Bootstrap => None,
        BilliardPhase::Steady => Some(state.lambda_prev),
    };
    state.phase = BilliardPhase::Steady;

    while reflections < max_reflections {
        let hit = body.line_positive_intersect(
            &state.point,
            &state.direction,
            &mut state.cache,
            lambda_prev,
        );
        if remaining <= hit.distance {
            state.point.axpy(remaining, &state.direction);
            state.lambda_prev = remaining;
            traveled += remaining;
            return BilliardReport {
                requested,
                traveled,
                reflections,
                capped: false,
            };
        }

        let step = params.safety_margin * hit.distance;
        state.point.axpy(step, &state.direction);
        state.lambda_prev = step;
        lambda_prev = Some(step);
        remaining -= step;
        traveled += step;
        body.compute_reflection(&mut state.direction, &state.point, hit.facet);
        reflections += 1;
    }

    log::debug!(
        "billiard trajectory stopped after {} reflections with {:.3e} of {:.3e} left",
        reflections,
        remaining,
        requested
    );
    BilliardReport {
        requested,
        traveled,
        reflections,
        capped: true,
    }
}
