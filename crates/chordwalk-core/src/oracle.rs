//! Capability traits implemented by convex-body oracles.
//!
//! Each walk asks only for the capabilities it uses: plain hit-and-run and the
//! ball walk need [`ConvexBody`], coordinate hit-and-run needs
//! [`CoordinateOracle`], the billiard walk needs [`ReflectiveOracle`], and the
//! semidefinite samplers need [`SemidefiniteOracle`]. Oracles must be
//! deterministic for a fixed `(point, direction)` pair.

use serde::{Deserialize, Serialize};

use crate::point::Point;

/// Tri-state membership answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Membership {
    /// Strictly inside the body.
    Interior,
    /// On the boundary, within the oracle's tolerance.
    Boundary,
    /// Outside the body.
    Exterior,
}

impl Membership {
    /// Returns `true` for [`Membership::Interior`].
    pub fn is_interior(self) -> bool {
        matches!(self, Membership::Interior)
    }
}

/// Signed parametric distances from a point to the boundary along a line.
///
/// For the line `p + t·v`, the body is crossed for `t` in
/// `[backward, forward]`, with `backward <= 0 <= forward` whenever `p` lies
/// inside the body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Chord {
    /// Smallest positive crossing parameter (`min⁺`).
    pub forward: f64,
    /// Largest negative crossing parameter (`max⁻`).
    pub backward: f64,
}

impl Chord {
    /// Creates a chord from its two crossing parameters.
    pub fn new(forward: f64, backward: f64) -> Self {
        Self { forward, backward }
    }

    /// Parametric length `forward - backward`.
    pub fn length(&self) -> f64 {
        self.forward - self.backward
    }

    /// Intersection of two chords along the same line.
    pub fn intersect(&self, other: &Chord) -> Chord {
        Chord {
            forward: self.forward.min(other.forward),
            backward: self.backward.max(other.backward),
        }
    }

    /// Boundary points `(p + forward·v, p + backward·v)`.
    pub fn endpoints(&self, point: &Point, direction: &Point) -> (Point, Point) {
        let mut b1 = point.clone();
        b1.axpy(self.forward, direction);
        let mut b2 = point.clone();
        b2.axpy(self.backward, direction);
        (b1, b2)
    }
}

/// Per-hyperplane arrays reused by forward ray queries.
///
/// `slacks[i]` holds `b_i - <a_i, p>` for the current point and `rates[i]`
/// holds `<a_i, v>` for the direction of the most recent query.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FacetCache {
    /// Distance-like slack of every hyperplane at the current point.
    pub slacks: Vec<f64>,
    /// Rate of change of every slack along the last queried direction.
    pub rates: Vec<f64>,
}

impl FacetCache {
    /// Allocates a zeroed cache for `num_hyperplanes` constraints.
    pub fn new(num_hyperplanes: usize) -> Self {
        Self {
            slacks: vec![0.0; num_hyperplanes],
            rates: vec![0.0; num_hyperplanes],
        }
    }
}

/// Result of a forward-only ray query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FacetHit {
    /// Distance (in units of the direction) to the first boundary crossing.
    pub distance: f64,
    /// Index of the facet that is hit.
    pub facet: usize,
}

/// Extra linear constraint `<normal, x> <= offset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Halfspace {
    /// Outward normal.
    pub normal: Point,
    /// Right-hand side.
    pub offset: f64,
}

impl Halfspace {
    /// Creates the halfspace `<normal, x> <= offset`.
    pub fn new(normal: Point, offset: f64) -> Self {
        Self { normal, offset }
    }

    /// Returns `offset - <normal, point>`; positive strictly inside.
    pub fn slack(&self, point: &Point) -> f64 {
        self.offset - self.normal.dot(point)
    }

    /// Crossing parameters of the line `point + t·direction`.
    ///
    /// A direction parallel to the hyperplane yields an unbounded chord.
    pub fn chord(&self, point: &Point, direction: &Point) -> Chord {
        let rate = self.normal.dot(direction);
        let slack = self.slack(point);
        if rate > 0.0 {
            Chord::new(slack / rate, f64::NEG_INFINITY)
        } else if rate < 0.0 {
            Chord::new(f64::INFINITY, slack / rate)
        } else {
            Chord::new(f64::INFINITY, f64::NEG_INFINITY)
        }
    }
}

/// Membership and chord queries every sampled body must answer.
pub trait ConvexBody {
    /// Ambient dimension of the body.
    fn dimension(&self) -> usize;

    /// Classifies `point` against the body.
    fn is_in(&self, point: &Point) -> Membership;

    /// Returns the chord of the line `point + t·direction` through the body.
    fn line_intersect(&self, point: &Point, direction: &Point) -> Chord;

    /// Number of linear constraints, i.e. the length of slack caches.
    ///
    /// Facet indices at or above this count address curved boundary parts.
    /// Bodies without linear constraints report zero.
    fn num_hyperplanes(&self) -> usize {
        0
    }
}

/// Axis-aligned chord queries backed by cached hyperplane slacks.
pub trait CoordinateOracle: ConvexBody {
    /// Chord along the basis vector `e_coord`, computed from scratch.
    ///
    /// Overwrites `slacks` so that it describes `point`.
    fn line_intersect_coord(&self, point: &Point, coord: usize, slacks: &mut [f64]) -> Chord;

    /// Chord along `e_coord`, updating `slacks` incrementally.
    ///
    /// On entry `slacks` describes `prev_point`, which differs from `point`
    /// only in coordinate `prev_coord`. On exit it describes `point`.
    fn line_intersect_coord_update(
        &self,
        point: &Point,
        prev_point: &Point,
        coord: usize,
        prev_coord: usize,
        slacks: &mut [f64],
    ) -> Chord;
}

/// Forward ray queries and specular reflection for billiard trajectories.
pub trait ReflectiveOracle: ConvexBody {
    /// Distance to the first boundary crossing along `direction`.
    ///
    /// Without `lambda_prev` the cache is rebuilt for `point`. With it, the
    /// cache is assumed to describe the point `point - lambda_prev·v_prev`
    /// where `v_prev` is the direction of the previous query, and is rolled
    /// forward. Either way the cache describes `point` and `direction` on
    /// exit.
    fn line_positive_intersect(
        &self,
        point: &Point,
        direction: &Point,
        cache: &mut FacetCache,
        lambda_prev: Option<f64>,
    ) -> FacetHit;

    /// Reflects `direction` off `facet` at the boundary point `point`.
    fn compute_reflection(&self, direction: &mut Point, point: &Point, facet: usize);
}

/// Boundary oracle for semidefinite-representable bodies.
pub trait SemidefiniteOracle: ConvexBody {
    /// Chord of `point + t·direction`, optionally clipped by `extra`.
    fn boundary_oracle(
        &self,
        point: &Point,
        direction: &Point,
        extra: Option<&Halfspace>,
    ) -> Chord;
}
