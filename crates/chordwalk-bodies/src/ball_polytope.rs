use chordwalk_core::{
    Chord, ConvexBody, CoordinateOracle, FacetCache, FacetHit, Membership, Point,
    ReflectiveOracle, SamplerError,
};

use crate::{Ball, HPolytope};

/// Intersection of an H-polytope with a Euclidean ball.
///
/// The slack caches cover the polytope's hyperplanes only. In forward ray
/// queries the ball boundary is reported as facet `num_hyperplanes()`.
#[derive(Debug, Clone, PartialEq)]
pub struct BallPolytope {
    polytope: HPolytope,
    ball: Ball,
}

impl BallPolytope {
    /// Intersects `polytope` with `ball`.
    pub fn new(polytope: HPolytope, ball: Ball) -> Result<Self, SamplerError> {
        if polytope.dimension() != ball.dimension() {
            return Err(SamplerError::dimension_mismatch(
                "ball",
                polytope.dimension(),
                ball.dimension(),
            ));
        }
        Ok(Self { polytope, ball })
    }

    /// Polytope component.
    pub fn polytope(&self) -> &HPolytope {
        &self.polytope
    }

    /// Ball component.
    pub fn ball(&self) -> &Ball {
        &self.ball
    }
}

impl ConvexBody for BallPolytope {
    fn dimension(&self) -> usize {
        self.polytope.dimension()
    }

    fn is_in(&self, point: &Point) -> Membership {
        match (self.polytope.is_in(point), self.ball.is_in(point)) {
            (Membership::Exterior, _) | (_, Membership::Exterior) => Membership::Exterior,
            (Membership::Interior, Membership::Interior) => Membership::Interior,
            _ => Membership::Boundary,
        }
    }

    fn line_intersect(&self, point: &Point, direction: &Point) -> Chord {
        self.polytope
            .line_intersect(point, direction)
            .intersect(&self.ball.line_intersect(point, direction))
    }

    fn num_hyperplanes(&self) -> usize {
        self.polytope.num_hyperplanes()
    }
}

impl CoordinateOracle for BallPolytope {
    fn line_intersect_coord(&self, point: &Point, coord: usize, slacks: &mut [f64]) -> Chord {
        self.polytope
            .line_intersect_coord(point, coord, slacks)
            .intersect(&self.ball.coord_chord(point, coord))
    }

    fn line_intersect_coord_update(
        &self,
        point: &Point,
        prev_point: &Point,
        coord: usize,
        prev_coord: usize,
        slacks: &mut [f64],
    ) -> Chord {
        self.polytope
            .line_intersect_coord_update(point, prev_point, coord, prev_coord, slacks)
            .intersect(&self.ball.coord_chord(point, coord))
    }
}

impl ReflectiveOracle for BallPolytope {
    fn line_positive_intersect(
        &self,
        point: &Point,
        direction: &Point,
        cache: &mut FacetCache,
        lambda_prev: Option<f64>,
    ) -> FacetHit {
        self.polytope.refresh_cache(point, direction, cache, lambda_prev);
        let hit = self.polytope.first_facet(cache);
        let ball_distance = self.ball.line_intersect(point, direction).forward;
        if ball_distance < hit.distance {
            FacetHit {
                distance: ball_distance,
                facet: self.polytope.num_hyperplanes(),
            }
        } else {
            hit
        }
    }

    fn compute_reflection(&self, direction: &mut Point, point: &Point, facet: usize) {
        if facet < self.polytope.num_hyperplanes() {
            self.polytope.compute_reflection(direction, point, facet);
        } else {
            self.ball.compute_reflection(direction, point, 0);
        }
    }
}
