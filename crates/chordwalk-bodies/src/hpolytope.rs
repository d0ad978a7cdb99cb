use chordwalk_core::errors::ErrorInfo;
use chordwalk_core::{
    Chord, ConvexBody, CoordinateOracle, FacetCache, FacetHit, Membership, Point,
    ReflectiveOracle, SamplerError,
};
use nalgebra::DMatrix;

use crate::BOUNDARY_TOLERANCE;

/// Polytope given by the inequalities `A x <= b`.
///
/// Rows of `A` are not required to be normalised.
#[derive(Debug, Clone, PartialEq)]
pub struct HPolytope {
    a: DMatrix<f64>,
    b: Vec<f64>,
}

impl HPolytope {
    /// Builds the polytope `{x : A x <= b}`.
    pub fn new(a: DMatrix<f64>, b: Vec<f64>) -> Result<Self, SamplerError> {
        if a.nrows() != b.len() {
            return Err(SamplerError::Body(
                ErrorInfo::new("hpolytope-shape", "row count of A must match length of b")
                    .with_context("rows", a.nrows().to_string())
                    .with_context("b_len", b.len().to_string()),
            ));
        }
        if a.ncols() == 0 {
            return Err(SamplerError::Body(ErrorInfo::new(
                "hpolytope-empty",
                "polytope must have positive dimension",
            )));
        }
        Ok(Self { a, b })
    }

    /// The cube `[-radius, radius]^dim`.
    pub fn cube(dim: usize, radius: f64) -> Self {
        let mut a = DMatrix::<f64>::zeros(2 * dim, dim);
        for i in 0..dim {
            a[(i, i)] = 1.0;
            a[(dim + i, i)] = -1.0;
        }
        Self {
            a,
            b: vec![radius; 2 * dim],
        }
    }

    /// The one-dimensional interval `[lo, hi]`.
    pub fn interval(lo: f64, hi: f64) -> Self {
        Self {
            a: DMatrix::from_row_slice(2, 1, &[1.0, -1.0]),
            b: vec![hi, -lo],
        }
    }

    /// The standard simplex `{x >= 0, sum x <= 1}`.
    pub fn simplex(dim: usize) -> Self {
        let mut a = DMatrix::<f64>::zeros(dim + 1, dim);
        for i in 0..dim {
            a[(i, i)] = -1.0;
            a[(dim, i)] = 1.0;
        }
        let mut b = vec![0.0; dim + 1];
        b[dim] = 1.0;
        Self { a, b }
    }

    /// Constraint matrix `A`.
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.a
    }

    /// Right-hand side `b`.
    pub fn rhs(&self) -> &[f64] {
        &self.b
    }

    fn row_dot(&self, row: usize, x: &Point) -> f64 {
        self.a
            .row(row)
            .iter()
            .zip(x.coords())
            .map(|(a, x)| a * x)
            .sum()
    }

    fn slack(&self, row: usize, x: &Point) -> f64 {
        self.b[row] - self.row_dot(row, x)
    }

    /// Chord along `e_coord` from slacks that describe the current point.
    fn coord_chord(&self, coord: usize, slacks: &[f64]) -> Chord {
        let mut chord = Chord::new(f64::INFINITY, f64::NEG_INFINITY);
        for (row, &slack) in slacks.iter().enumerate() {
            let rate = self.a[(row, coord)];
            if rate > 0.0 {
                chord.forward = chord.forward.min(slack / rate);
            } else if rate < 0.0 {
                chord.backward = chord.backward.max(slack / rate);
            }
        }
        chord
    }

    /// Forward hit along the direction whose rates are stored in `cache`.
    pub(crate) fn first_facet(&self, cache: &FacetCache) -> FacetHit {
        let mut hit = FacetHit {
            distance: f64::INFINITY,
            facet: self.b.len(),
        };
        for (row, (&slack, &rate)) in cache.slacks.iter().zip(cache.rates.iter()).enumerate() {
            if rate > 0.0 {
                let distance = slack / rate;
                if distance < hit.distance {
                    hit = FacetHit {
                        distance,
                        facet: row,
                    };
                }
            }
        }
        hit
    }

    /// Rolls `cache` forward to `point` and refreshes the rates for `direction`.
    pub(crate) fn refresh_cache(
        &self,
        point: &Point,
        direction: &Point,
        cache: &mut FacetCache,
        lambda_prev: Option<f64>,
    ) {
        let m = self.b.len();
        if cache.slacks.len() != m || cache.rates.len() != m {
            *cache = FacetCache::new(m);
        }
        match lambda_prev {
            Some(lambda) => {
                for (slack, rate) in cache.slacks.iter_mut().zip(cache.rates.iter()) {
                    *slack -= lambda * rate;
                }
            }
            None => {
                for row in 0..m {
                    cache.slacks[row] = self.slack(row, point);
                }
            }
        }
        for row in 0..m {
            cache.rates[row] = self.row_dot(row, direction);
        }
    }
}

impl ConvexBody for HPolytope {
    fn dimension(&self) -> usize {
        self.a.ncols()
    }

    fn is_in(&self, point: &Point) -> Membership {
        let mut on_boundary = false;
        for row in 0..self.b.len() {
            let slack = self.slack(row, point);
            if slack < -BOUNDARY_TOLERANCE {
                return Membership::Exterior;
            }
            if slack <= BOUNDARY_TOLERANCE {
                on_boundary = true;
            }
        }
        if on_boundary {
            Membership::Boundary
        } else {
            Membership::Interior
        }
    }

    fn line_intersect(&self, point: &Point, direction: &Point) -> Chord {
        let mut chord = Chord::new(f64::INFINITY, f64::NEG_INFINITY);
        for row in 0..self.b.len() {
            let rate = self.row_dot(row, direction);
            let slack = self.slack(row, point);
            if rate > 0.0 {
                chord.forward = chord.forward.min(slack / rate);
            } else if rate < 0.0 {
                chord.backward = chord.backward.max(slack / rate);
            }
        }
        chord
    }

    fn num_hyperplanes(&self) -> usize {
        self.b.len()
    }
}

impl CoordinateOracle for HPolytope {
    fn line_intersect_coord(&self, point: &Point, coord: usize, slacks: &mut [f64]) -> Chord {
        for (row, slack) in slacks.iter_mut().enumerate() {
            *slack = self.slack(row, point);
        }
        self.coord_chord(coord, slacks)
    }

    fn line_intersect_coord_update(
        &self,
        point: &Point,
        prev_point: &Point,
        coord: usize,
        prev_coord: usize,
        slacks: &mut [f64],
    ) -> Chord {
        let shift = point.coord(prev_coord) - prev_point.coord(prev_coord);
        for (row, slack) in slacks.iter_mut().enumerate() {
            *slack -= self.a[(row, prev_coord)] * shift;
        }
        self.coord_chord(coord, slacks)
    }
}

impl ReflectiveOracle for HPolytope {
    fn line_positive_intersect(
        &self,
        point: &Point,
        direction: &Point,
        cache: &mut FacetCache,
        lambda_prev: Option<f64>,
    ) -> FacetHit {
        self.refresh_cache(point, direction, cache, lambda_prev);
        self.first_facet(cache)
    }

    fn compute_reflection(&self, direction: &mut Point, _point: &Point, facet: usize) {
        let normal = Point::from_vec(self.a.row(facet).iter().copied().collect());
        let norm_sq = normal.norm_squared();
        if norm_sq > 0.0 {
            let along = direction.dot(&normal);
            direction.axpy(-2.0 * along / norm_sq, &normal);
        }
    }
}
