use chordwalk_core::errors::ErrorInfo;
use chordwalk_core::{
    Chord, ConvexBody, Halfspace, Membership, Point, SamplerError, SemidefiniteOracle,
};
use nalgebra::{DMatrix, SymmetricEigen};

use crate::BOUNDARY_TOLERANCE;

/// Feasible region of the linear matrix inequality `A0 + sum_i x_i A_i > 0`.
///
/// All matrices must be symmetric and share the same size; the dimension of
/// the body is the number of `A_i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrahedron {
    a0: DMatrix<f64>,
    a: Vec<DMatrix<f64>>,
}

impl Spectrahedron {
    /// Builds the spectrahedron of the pencil `(A0, A_1, .., A_n)`.
    pub fn new(a0: DMatrix<f64>, a: Vec<DMatrix<f64>>) -> Result<Self, SamplerError> {
        let size = a0.nrows();
        if size == 0 || a0.ncols() != size {
            return Err(SamplerError::Body(
                ErrorInfo::new("lmi-shape", "A0 must be a non-empty square matrix")
                    .with_context("rows", a0.nrows().to_string())
                    .with_context("cols", a0.ncols().to_string()),
            ));
        }
        if a.is_empty() {
            return Err(SamplerError::Body(ErrorInfo::new(
                "lmi-empty",
                "spectrahedron needs at least one coefficient matrix",
            )));
        }
        if let Some(index) = a
            .iter()
            .position(|m| m.nrows() != size || m.ncols() != size)
        {
            return Err(SamplerError::Body(
                ErrorInfo::new("lmi-shape", "coefficient matrix size differs from A0")
                    .with_context("index", index.to_string())
                    .with_context("expected", size.to_string()),
            ));
        }
        Ok(Self { a0, a })
    }

    /// Unit ball of `R^dim` written as the arrow-shaped LMI
    /// `[[1, x^T], [x, I]] > 0`.
    pub fn unit_ball(dim: usize) -> Self {
        let size = dim + 1;
        let a = (0..dim)
            .map(|i| {
                let mut m = DMatrix::<f64>::zeros(size, size);
                m[(0, i + 1)] = 1.0;
                m[(i + 1, 0)] = 1.0;
                m
            })
            .collect();
        Self {
            a0: DMatrix::identity(size, size),
            a,
        }
    }

    /// Size of the matrices in the pencil.
    pub fn matrix_size(&self) -> usize {
        self.a0.nrows()
    }

    /// Evaluates `A0 + sum_i x_i A_i`.
    pub fn lmi(&self, x: &Point) -> DMatrix<f64> {
        let mut m = self.a0.clone();
        for (ai, &xi) in self.a.iter().zip(x.coords()) {
            m += ai * xi;
        }
        m
    }

    fn pencil_direction(&self, direction: &Point) -> DMatrix<f64> {
        let size = self.matrix_size();
        let mut m = DMatrix::<f64>::zeros(size, size);
        for (ai, &vi) in self.a.iter().zip(direction.coords()) {
            m += ai * vi;
        }
        m
    }
}

impl ConvexBody for Spectrahedron {
    fn dimension(&self) -> usize {
        self.a.len()
    }

    fn is_in(&self, point: &Point) -> Membership {
        let eigen = SymmetricEigen::new(self.lmi(point));
        let smallest = eigen
            .eigenvalues
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min);
        if smallest > BOUNDARY_TOLERANCE {
            Membership::Interior
        } else if smallest >= -BOUNDARY_TOLERANCE {
            Membership::Boundary
        } else {
            Membership::Exterior
        }
    }

    fn line_intersect(&self, point: &Point, direction: &Point) -> Chord {
        self.boundary_oracle(point, direction, None)
    }
}

impl SemidefiniteOracle for Spectrahedron {
    /// With `A(p) = L L^T`, the pencil along the line is
    /// `L (I + t C) L^T` where `C = L^-1 B L^-T` and `B = sum_i v_i A_i`,
    /// so the chord ends where `1 + t mu` vanishes for an eigenvalue `mu` of `C`.
    fn boundary_oracle(
        &self,
        point: &Point,
        direction: &Point,
        extra: Option<&Halfspace>,
    ) -> Chord {
        // A non-interior point has no meaningful chord.
        let degenerate = Chord::new(0.0, 0.0);
        let Some(cholesky) = self.lmi(point).cholesky() else {
            return degenerate;
        };
        let l = cholesky.l();
        let b = self.pencil_direction(direction);
        let Some(half) = l.solve_lower_triangular(&b) else {
            return degenerate;
        };
        let Some(c) = l.solve_lower_triangular(&half.transpose()) else {
            return degenerate;
        };
        let symmetric = 0.5 * (&c + c.transpose());
        let eigen = SymmetricEigen::new(symmetric);

        let mut chord = Chord::new(f64::INFINITY, f64::NEG_INFINITY);
        for &mu in eigen.eigenvalues.iter() {
            if mu < 0.0 {
                chord.forward = chord.forward.min(-1.0 / mu);
            } else if mu > 0.0 {
                chord.backward = chord.backward.max(-1.0 / mu);
            }
        }
        match extra {
            Some(halfspace) => chord.intersect(&halfspace.chord(point, direction)),
            None => chord,
        }
    }
}
