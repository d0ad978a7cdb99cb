//! Drivers that chain walk steps into sample sequences.
//!
//! Every driver runs `walk_len` steps per emitted point. Points are returned
//! in generation order, which downstream autocorrelation diagnostics rely on.

use chordwalk_core::errors::ErrorInfo;
use chordwalk_core::{
    ConvexBody, CoordinateOracle, Halfspace, Point, ReflectiveOracle, SamplerError,
    SemidefiniteOracle,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::SamplerConfig;
use crate::state::WalkState;
use crate::stats::WalkStats;
use crate::walk_ball::ball_step;
use crate::walk_billiard::billiard_step;
use crate::walk_boltzmann::{boltzmann_step, BoltzmannTarget};
use crate::walk_coord::coordinate_step;
use crate::walk_hnr::{hit_and_run, hit_and_run_semidefinite};

/// Output of a driver: the sample sequence and the chain's counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRun {
    /// Samples in generation order.
    pub points: Vec<Point>,
    /// Counters collected while the chain ran.
    pub stats: WalkStats,
}

fn check_start(body_dim: usize, start: &Point) -> Result<(), SamplerError> {
    if start.dimension() != body_dim {
        return Err(SamplerError::dimension_mismatch(
            "start point",
            body_dim,
            start.dimension(),
        ));
    }
    Ok(())
}

fn check_walk_len(walk_len: usize) -> Result<(), SamplerError> {
    if walk_len == 0 {
        return Err(SamplerError::Config(
            ErrorInfo::new("invalid-parameter", "walk_len must be at least 1")
                .with_context("field", "walk_len")
                .with_context("value", "0"),
        ));
    }
    Ok(())
}

/// Advances `state` by one step of its walk.
fn advance<B, R>(state: &mut WalkState, body: &B, rng: &mut R, stats: &mut WalkStats)
where
    B: CoordinateOracle + ReflectiveOracle + ?Sized,
    R: Rng + ?Sized,
{
    stats.steps += 1;
    match state {
        WalkState::Ball { point, delta } => {
            let accepted = ball_step(point, body, *delta, rng);
            stats.note_ball(accepted);
        }
        WalkState::HitAndRun(point) => hit_and_run(point, body, rng),
        WalkState::Coordinate(coord) => coordinate_step(coord, body, rng),
        WalkState::Billiard {
            state: billiard,
            params,
        } => {
            let report = billiard_step(billiard, body, params, rng);
            stats.note_billiard(&report);
        }
    }
}

/// Runs one chain on `body` and keeps the points accepted by `keep`.
fn run_chain<B, R, F>(
    body: &B,
    start: &Point,
    rnum: usize,
    config: &SamplerConfig,
    rng: &mut R,
    mut keep: F,
) -> Result<SampleRun, SamplerError>
where
    B: CoordinateOracle + ReflectiveOracle + ?Sized,
    R: Rng + ?Sized,
    F: FnMut(&Point) -> bool,
{
    config.validate()?;
    check_start(body.dimension(), start)?;
    log::debug!(
        "sampling {} points in dimension {} with {:?}, walk_len {}",
        rnum,
        body.dimension(),
        config.walk,
        config.walk_len
    );

    let mut stats = WalkStats::new();
    let mut state = WalkState::new(config, start.clone(), body);
    // Bootstrap step: for coordinate hit-and-run this fills the slack cache.
    advance(&mut state, body, rng, &mut stats);

    let mut points = Vec::with_capacity(rnum);
    for sample in 0..rnum {
        for _ in 0..config.walk_len {
            advance(&mut state, body, rng, &mut stats);
        }
        stats.generated += 1;
        if keep(state.point()) {
            points.push(state.point().clone());
            stats.retained += 1;
        }
        log::trace!("sample {} of {} done", sample + 1, rnum);
    }
    log::debug!("chain finished: {:?}", stats);
    Ok(SampleRun { points, stats })
}

/// Samples `rnum` points from a polytope-like body with the walk in `config`.
///
/// One extra bootstrap step runs before the first sample.
pub fn sample_polytope<B, R>(
    body: &B,
    start: &Point,
    rnum: usize,
    config: &SamplerConfig,
    rng: &mut R,
) -> Result<SampleRun, SamplerError>
where
    B: CoordinateOracle + ReflectiveOracle + ?Sized,
    R: Rng + ?Sized,
{
    run_chain(body, start, rnum, config, rng, |_| true)
}

/// Runs a chain on `large` and keeps only the points strictly inside `small`.
///
/// `rnum` candidates are generated; `stats.retained` (equal to the number of
/// returned points) counts those inside the smaller body. Telescoping volume
/// estimators use the ratio of the two.
pub fn sample_nested<L, S, R>(
    large: &L,
    small: &S,
    start: &Point,
    rnum: usize,
    config: &SamplerConfig,
    rng: &mut R,
) -> Result<SampleRun, SamplerError>
where
    L: CoordinateOracle + ReflectiveOracle + ?Sized,
    S: ConvexBody + ?Sized,
    R: Rng + ?Sized,
{
    if small.dimension() != large.dimension() {
        return Err(SamplerError::dimension_mismatch(
            "inner body",
            large.dimension(),
            small.dimension(),
        ));
    }
    run_chain(large, start, rnum, config, rng, |point| {
        small.is_in(point).is_interior()
    })
}

/// Samples `rnum` points from a spectrahedron with random-direction hit-and-run.
pub fn sample_spectrahedron<B, R>(
    body: &B,
    start: &Point,
    rnum: usize,
    walk_len: usize,
    rng: &mut R,
) -> Result<SampleRun, SamplerError>
where
    B: SemidefiniteOracle + ?Sized,
    R: Rng + ?Sized,
{
    run_semidefinite(body, start, rnum, walk_len, None, rng)
}

/// Like [`sample_spectrahedron`], restricted to the halfspace `extra`.
pub fn sample_spectrahedron_constrained<B, R>(
    body: &B,
    start: &Point,
    rnum: usize,
    walk_len: usize,
    extra: &Halfspace,
    rng: &mut R,
) -> Result<SampleRun, SamplerError>
where
    B: SemidefiniteOracle + ?Sized,
    R: Rng + ?Sized,
{
    if extra.normal.dimension() != body.dimension() {
        return Err(SamplerError::dimension_mismatch(
            "halfspace normal",
            body.dimension(),
            extra.normal.dimension(),
        ));
    }
    run_semidefinite(body, start, rnum, walk_len, Some(extra), rng)
}

fn run_semidefinite<B, R>(
    body: &B,
    start: &Point,
    rnum: usize,
    walk_len: usize,
    extra: Option<&Halfspace>,
    rng: &mut R,
) -> Result<SampleRun, SamplerError>
where
    B: SemidefiniteOracle + ?Sized,
    R: Rng + ?Sized,
{
    check_walk_len(walk_len)?;
    check_start(body.dimension(), start)?;
    log::debug!(
        "sampling {} spectrahedron points in dimension {}, walk_len {}, constrained {}",
        rnum,
        body.dimension(),
        walk_len,
        extra.is_some()
    );

    let mut stats = WalkStats::new();
    let mut point = start.clone();
    let mut points = Vec::with_capacity(rnum);
    for _ in 0..rnum {
        for _ in 0..walk_len {
            hit_and_run_semidefinite(&mut point, body, extra, None, rng);
            stats.steps += 1;
        }
        points.push(point.clone());
        stats.generated += 1;
        stats.retained += 1;
    }
    Ok(SampleRun { points, stats })
}

/// Advances `point` by `walk_len` Boltzmann hit-and-run steps.
pub fn boltzmann_walk<B, R>(
    body: &B,
    target: &BoltzmannTarget,
    point: &mut Point,
    walk_len: usize,
    rng: &mut R,
) -> Result<(), SamplerError>
where
    B: ConvexBody + ?Sized,
    R: Rng + ?Sized,
{
    target.check(body.dimension())?;
    check_start(body.dimension(), point)?;
    for _ in 0..walk_len {
        boltzmann_step(point, body, target, rng);
    }
    Ok(())
}

/// Draws `count` Boltzmann samples, each from its own chain of `walk_len`
/// steps restarted at `start`.
///
/// The returned points come from independent chains, not one continued
/// chain. The generator is shared and keeps advancing, so each chain sees a
/// different stretch of the stream.
pub fn sample_boltzmann<B, R>(
    body: &B,
    target: &BoltzmannTarget,
    start: &Point,
    count: usize,
    walk_len: usize,
    rng: &mut R,
) -> Result<SampleRun, SamplerError>
where
    B: ConvexBody + ?Sized,
    R: Rng + ?Sized,
{
    check_walk_len(walk_len)?;
    target.check(body.dimension())?;
    check_start(body.dimension(), start)?;
    log::debug!(
        "drawing {} Boltzmann samples at temperature {}, walk_len {}",
        count,
        target.temperature,
        walk_len
    );

    let mut stats = WalkStats::new();
    let mut points = Vec::with_capacity(count);
    for _ in 0..count {
        let mut point = start.clone();
        for _ in 0..walk_len {
            boltzmann_step(&mut point, body, target, rng);
        }
        stats.steps += walk_len;
        stats.generated += 1;
        stats.retained += 1;
        points.push(point);
    }
    Ok(SampleRun { points, stats })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_len_must_be_positive() {
        assert!(check_walk_len(1).is_ok());
        let err = check_walk_len(0).unwrap_err();
        assert_eq!(err.info().context.get("field").map(String::as_str), Some("walk_len"));
    }
}
