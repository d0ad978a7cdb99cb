#![deny(missing_docs)]

//! Reference convex bodies implementing the chordwalk oracle traits.

/// Euclidean balls.
pub mod ball;
/// Intersection of a ball with an H-polytope.
pub mod ball_polytope;
/// H-represented polytopes `A x <= b`.
pub mod hpolytope;
/// Spectrahedra `A0 + sum x_i A_i > 0`.
pub mod spectrahedron;

pub use ball::Ball;
pub use ball_polytope::BallPolytope;
pub use hpolytope::HPolytope;
pub use spectrahedron::Spectrahedron;

/// Width of the band treated as the boundary by membership tests.
pub const BOUNDARY_TOLERANCE: f64 = 1e-10;
