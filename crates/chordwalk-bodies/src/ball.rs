use chordwalk_core::errors::ErrorInfo;
use chordwalk_core::{
    Chord, ConvexBody, FacetCache, FacetHit, Membership, Point, ReflectiveOracle, SamplerError,
};

use crate::BOUNDARY_TOLERANCE;

/// Closed Euclidean ball.
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    center: Point,
    radius: f64,
}

impl Ball {
    /// Ball of `radius` around `center`.
    pub fn new(center: Point, radius: f64) -> Result<Self, SamplerError> {
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(SamplerError::Body(
                ErrorInfo::new("ball-radius", "ball radius must be positive and finite")
                    .with_context("radius", radius.to_string()),
            ));
        }
        Ok(Self { center, radius })
    }

    /// Ball of `radius` around the origin of `R^dim`.
    pub fn centered(dim: usize, radius: f64) -> Result<Self, SamplerError> {
        Self::new(Point::new(dim), radius)
    }

    /// Center of the ball.
    pub fn center(&self) -> &Point {
        &self.center
    }

    /// Radius of the ball.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Roots of `|point - center + t·direction|^2 = radius^2`, larger first.
    fn roots(&self, point: &Point, direction: &Point) -> Chord {
        let offset = point - &self.center;
        let a = direction.norm_squared();
        let half_b = offset.dot(direction);
        let c = offset.norm_squared() - self.radius * self.radius;
        let disc = (half_b * half_b - a * c).max(0.0).sqrt();
        Chord::new((-half_b + disc) / a, (-half_b - disc) / a)
    }

    /// Chord along the basis vector `e_coord`.
    pub fn coord_chord(&self, point: &Point, coord: usize) -> Chord {
        let offset = point - &self.center;
        let half_b = offset.coord(coord);
        let c = offset.norm_squared() - self.radius * self.radius;
        let disc = (half_b * half_b - c).max(0.0).sqrt();
        Chord::new(-half_b + disc, -half_b - disc)
    }
}

impl ConvexBody for Ball {
    fn dimension(&self) -> usize {
        self.center.dimension()
    }

    fn is_in(&self, point: &Point) -> Membership {
        let gap = self.radius * self.radius - (point - &self.center).norm_squared();
        if gap > BOUNDARY_TOLERANCE {
            Membership::Interior
        } else if gap >= -BOUNDARY_TOLERANCE {
            Membership::Boundary
        } else {
            Membership::Exterior
        }
    }

    fn line_intersect(&self, point: &Point, direction: &Point) -> Chord {
        self.roots(point, direction)
    }
}

/// The sphere is facet 0, the first index past the (absent) hyperplanes.
impl ReflectiveOracle for Ball {
    fn line_positive_intersect(
        &self,
        point: &Point,
        direction: &Point,
        _cache: &mut FacetCache,
        _lambda_prev: Option<f64>,
    ) -> FacetHit {
        FacetHit {
            distance: self.roots(point, direction).forward,
            facet: 0,
        }
    }

    fn compute_reflection(&self, direction: &mut Point, point: &Point, _facet: usize) {
        let normal = point - &self.center;
        let norm_sq = normal.norm_squared();
        if norm_sq > 0.0 {
            let along = direction.dot(&normal);
            direction.axpy(-2.0 * along / norm_sq, &normal);
        }
    }
}
