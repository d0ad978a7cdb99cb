use chordwalk_core::{Chord, ConvexBody, Halfspace, Point, SemidefiniteOracle};
use nalgebra::DMatrix;
use rand::Rng;

use crate::direction::{anisotropic_direction, isotropic_direction};

/// Replaces `point` with `λ·b1 + (1-λ)·b2` for the chord endpoints `b1, b2`
/// and returns the endpoints.
fn land_on_chord<R: Rng + ?Sized>(
    point: &mut Point,
    direction: &Point,
    chord: Chord,
    rng: &mut R,
) -> (Point, Point) {
    let (b1, b2) = chord.endpoints(point, direction);
    let lambda: f64 = rng.gen();
    *point = lambda * &b1;
    point.axpy(1.0 - lambda, &b2);
    (b1, b2)
}

/// One hit-and-run step along a uniform random direction.
pub fn hit_and_run<B, R>(point: &mut Point, body: &B, rng: &mut R)
where
    B: ConvexBody + ?Sized,
    R: Rng + ?Sized,
{
    hit_and_run_with_chord(point, body, rng);
}

/// Hit-and-run step that also returns the chord endpoints `(b1, b2)`.
pub fn hit_and_run_with_chord<B, R>(point: &mut Point, body: &B, rng: &mut R) -> (Point, Point)
where
    B: ConvexBody + ?Sized,
    R: Rng + ?Sized,
{
    let direction = isotropic_direction(body.dimension(), rng);
    let chord = body.line_intersect(point, &direction);
    land_on_chord(point, &direction, chord, rng)
}

/// Hit-and-run step along `M·u` for a uniform unit `u`, with a uniform
/// position on the chord.
pub fn hit_and_run_covariance<B, R>(
    point: &mut Point,
    body: &B,
    factor: &DMatrix<f64>,
    rng: &mut R,
) -> (Point, Point)
where
    B: ConvexBody + ?Sized,
    R: Rng + ?Sized,
{
    let direction = anisotropic_direction(factor, rng);
    let chord = body.line_intersect(point, &direction);
    land_on_chord(point, &direction, chord, rng)
}

/// Hit-and-run step against a semidefinite body, optionally clipped by an
/// extra halfspace and optionally along covariance-shaped directions.
pub fn hit_and_run_semidefinite<B, R>(
    point: &mut Point,
    body: &B,
    extra: Option<&Halfspace>,
    factor: Option<&DMatrix<f64>>,
    rng: &mut R,
) -> (Point, Point)
where
    B: SemidefiniteOracle + ?Sized,
    R: Rng + ?Sized,
{
    let direction = match factor {
        Some(factor) => anisotropic_direction(factor, rng),
        None => isotropic_direction(body.dimension(), rng),
    };
    let chord = body.boundary_oracle(point, &direction, extra);
    land_on_chord(point, &direction, chord, rng)
}
