use chordwalk_core::{ConvexBody, Point};
use rand::Rng;

use crate::direction::point_in_ball;

/// One ball-walk step: propose `point + u` with `u` uniform in the ball of
/// radius `delta`, and move only if the proposal is strictly interior.
///
/// The proposal is symmetric, so the chain is stationary for the uniform
/// distribution on the body. Returns whether the proposal was accepted.
pub fn ball_step<B, R>(point: &mut Point, body: &B, delta: f64, rng: &mut R) -> bool
where
    B: ConvexBody + ?Sized,
    R: Rng + ?Sized,
{
    let mut proposal = point_in_ball(point.dimension(), delta, rng);
    proposal += &*point;
    if body.is_in(&proposal).is_interior() {
        *point = proposal;
        true
    } else {
        false
    }
}
