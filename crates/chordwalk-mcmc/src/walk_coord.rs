use chordwalk_core::CoordinateOracle;
use rand::Rng;

use crate::state::CoordinateState;

/// One coordinate-direction hit-and-run step.
///
/// Picks a coordinate `k` and a fraction uniformly, then moves coordinate
/// `k` to that fraction of the chord along `e_k`. The first step of a chain
/// asks the oracle for slacks from scratch; later steps update them from the
/// single coordinate changed by the previous step, at `O(hyperplanes)`
/// instead of `O(hyperplanes · dim)`.
pub fn coordinate_step<B, R>(state: &mut CoordinateState, body: &B, rng: &mut R)
where
    B: CoordinateOracle + ?Sized,
    R: Rng + ?Sized,
{
    let coord = rng.gen_range(0..body.dimension());
    let fraction: f64 = rng.gen();
    let chord = match state.prev_coord {
        None => body.line_intersect_coord(&state.point, coord, &mut state.slacks),
        Some(prev_coord) => {
            let chord = body.line_intersect_coord_update(
                &state.point,
                &state.prev_point,
                coord,
                prev_coord,
                &mut state.slacks,
            );
            state
                .prev_point
                .set_coord(prev_coord, state.point.coord(prev_coord));
            chord
        }
    };
    let current = state.point.coord(coord);
    state
        .point
        .set_coord(coord, current + chord.backward + fraction * chord.length());
    state.prev_coord = Some(coord);
}
