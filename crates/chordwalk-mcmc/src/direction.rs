//! Random directions and points on or inside Euclidean balls.
//!
//! A vector of i.i.d. standard normals is rotation invariant, so normalising
//! it gives a uniform point on the unit sphere. Degenerate inputs (`dim = 0`,
//! a singular or non-square factor) are the caller's responsibility.

use chordwalk_core::Point;
use nalgebra::DMatrix;
use rand::Rng;
use rand_distr::StandardNormal;

/// Uniform unit vector in `R^dim`.
pub fn isotropic_direction<R: Rng + ?Sized>(dim: usize, rng: &mut R) -> Point {
    let mut coords: Vec<f64> = (0..dim).map(|_| rng.sample(StandardNormal)).collect();
    let norm = coords.iter().map(|x| x * x).sum::<f64>().sqrt();
    let inv = 1.0 / norm;
    for value in &mut coords {
        *value *= inv;
    }
    Point::from_vec(coords)
}

/// Image `L·u` of an isotropic unit vector `u` under the factor `L`.
///
/// With `L` a Cholesky-type factor of `Σ = L Lᵗ`, the draw follows the
/// direction distribution of `N(0, Σ)`.
pub fn anisotropic_direction<R: Rng + ?Sized>(factor: &DMatrix<f64>, rng: &mut R) -> Point {
    let unit = isotropic_direction(factor.ncols(), rng);
    Point::from_dvector(&(factor * unit.to_dvector()))
}

/// Uniform point on the sphere of `radius` around the origin.
pub fn point_on_sphere<R: Rng + ?Sized>(dim: usize, radius: f64, rng: &mut R) -> Point {
    let mut p = isotropic_direction(dim, rng);
    p.scale(radius);
    p
}

/// Uniform point in the ball of `radius` around the origin.
///
/// The radial part is `radius · U^(1/dim)`, which makes the density uniform
/// in volume rather than concentrated near the center.
pub fn point_in_ball<R: Rng + ?Sized>(dim: usize, radius: f64, rng: &mut R) -> Point {
    let mut p = isotropic_direction(dim, rng);
    let u: f64 = rng.gen();
    p.scale(radius * u.powf(1.0 / dim as f64));
    p
}
