use chordwalk_core::{CoordinateOracle, FacetCache, Point, ReflectiveOracle};
use serde::{Deserialize, Serialize};

use crate::config::{SamplerConfig, WalkKind};
use crate::walk_billiard::BilliardParams;

/// Chain state of coordinate-direction hit-and-run.
///
/// `slacks` describes `prev_point`, which differs from `point` in at most
/// the coordinate `prev_coord`. Every step first rolls the slacks forward to
/// `point`, so a chord is never computed from stale values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateState {
    pub(crate) point: Point,
    pub(crate) prev_point: Point,
    pub(crate) prev_coord: Option<usize>,
    pub(crate) slacks: Vec<f64>,
}

impl CoordinateState {
    /// Starts a chain at `start`; the first step computes slacks from scratch.
    pub fn new<B: CoordinateOracle + ?Sized>(start: Point, body: &B) -> Self {
        Self {
            prev_point: start.clone(),
            point: start,
            prev_coord: None,
            slacks: vec![0.0; body.num_hyperplanes()],
        }
    }

    /// Current point of the chain.
    pub fn point(&self) -> &Point {
        &self.point
    }

    /// Coordinate moved by the last step, if any step has run.
    pub fn prev_coord(&self) -> Option<usize> {
        self.prev_coord
    }

    /// Slacks of the point held before the last step.
    ///
    /// The cache lags one step behind [`CoordinateState::point`]; the next
    /// step rolls it forward before computing any chord.
    pub fn prev_slacks(&self) -> &[f64] {
        &self.slacks
    }

    /// Consumes the state and returns the current point.
    pub fn into_point(self) -> Point {
        self.point
    }
}

/// Whether the next billiard call starts a fresh trajectory cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BilliardPhase {
    /// No valid cache yet; the first ray query rebuilds it.
    Bootstrap,
    /// The cache matches the last segment of the previous call.
    Steady,
}

/// Chain state of the billiard walk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BilliardState {
    pub(crate) point: Point,
    pub(crate) direction: Point,
    pub(crate) lambda_prev: f64,
    pub(crate) cache: FacetCache,
    pub(crate) phase: BilliardPhase,
}

impl BilliardState {
    /// Starts a chain at `start` in the bootstrap phase.
    pub fn new<B: ReflectiveOracle + ?Sized>(start: Point, body: &B) -> Self {
        let dim = start.dimension();
        Self {
            point: start,
            direction: Point::new(dim),
            lambda_prev: 0.0,
            cache: FacetCache::new(body.num_hyperplanes()),
            phase: BilliardPhase::Bootstrap,
        }
    }

    /// Moves the chain to `point` and drops the trajectory cache.
    pub fn restart(&mut self, point: Point) {
        self.point = point;
        self.lambda_prev = 0.0;
        self.phase = BilliardPhase::Bootstrap;
    }

    /// Current point of the chain.
    pub fn point(&self) -> &Point {
        &self.point
    }

    /// Direction of the last travelled segment (after any final reflection).
    pub fn direction(&self) -> &Point {
        &self.direction
    }

    /// Current phase.
    pub fn phase(&self) -> BilliardPhase {
        self.phase
    }

    /// Consumes the state and returns the current point.
    pub fn into_point(self) -> Point {
        self.point
    }
}

/// Per-chain state for any of the polytope walks, together with the walk's
/// parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WalkState {
    /// Ball walk: the point and the proposal radius.
    Ball {
        /// Current point.
        point: Point,
        /// Proposal radius.
        delta: f64,
    },
    /// Random-direction hit-and-run: the point is the whole state.
    HitAndRun(Point),
    /// Coordinate hit-and-run with its slack cache.
    Coordinate(CoordinateState),
    /// Billiard walk with its trajectory cache.
    Billiard {
        /// Trajectory state carried between calls.
        state: BilliardState,
        /// Travel budget and numerical tuning.
        params: BilliardParams,
    },
}

impl WalkState {
    /// Builds the state for the walk selected in `config`, starting at `start`.
    pub fn new<B>(config: &SamplerConfig, start: Point, body: &B) -> Self
    where
        B: CoordinateOracle + ReflectiveOracle + ?Sized,
    {
        match config.walk {
            WalkKind::Ball { delta } => WalkState::Ball {
                point: start,
                delta,
            },
            WalkKind::HitAndRun => WalkState::HitAndRun(start),
            WalkKind::CoordinateHitAndRun => {
                WalkState::Coordinate(CoordinateState::new(start, body))
            }
            WalkKind::Billiard { diameter } => WalkState::Billiard {
                state: BilliardState::new(start, body),
                params: BilliardParams::with_tuning(diameter, &config.billiard),
            },
        }
    }

    /// Current point of the chain.
    pub fn point(&self) -> &Point {
        match self {
            WalkState::Ball { point, .. } | WalkState::HitAndRun(point) => point,
            WalkState::Coordinate(state) => state.point(),
            WalkState::Billiard { state, .. } => state.point(),
        }
    }

    /// Consumes the state and returns the current point.
    pub fn into_point(self) -> Point {
        match self {
            WalkState::Ball { point, .. } | WalkState::HitAndRun(point) => point,
            WalkState::Coordinate(state) => state.into_point(),
            WalkState::Billiard { state, .. } => state.into_point(),
        }
    }
}
