use chordwalk_core::errors::ErrorInfo;
use chordwalk_core::{ConvexBody, Point, SamplerError};
use nalgebra::DMatrix;
use rand::Rng;

use crate::direction::anisotropic_direction;

/// Below this potential drop across a chord the truncated exponential is
/// indistinguishable from a uniform draw.
const FLAT_POTENTIAL: f64 = 1e-12;

/// Target density `exp(-<objective, x> / temperature)` on a body, with the
/// factor used to shape proposal directions.
#[derive(Debug, Clone, PartialEq)]
pub struct BoltzmannTarget {
    /// Linear functional `c` of the potential.
    pub objective: Point,
    /// Temperature `T > 0`.
    pub temperature: f64,
    /// Direction factor `L`; directions follow `N(0, L Lᵗ)`.
    pub factor: DMatrix<f64>,
}

impl BoltzmannTarget {
    /// Target with isotropic proposal directions.
    pub fn isotropic(objective: Point, temperature: f64) -> Self {
        let dim = objective.dimension();
        Self {
            objective,
            temperature,
            factor: DMatrix::identity(dim, dim),
        }
    }

    /// Target with directions shaped by the factor `factor`.
    pub fn with_factor(objective: Point, temperature: f64, factor: DMatrix<f64>) -> Self {
        Self {
            objective,
            temperature,
            factor,
        }
    }

    /// Checks shapes against `dim` and that the temperature is positive.
    pub fn check(&self, dim: usize) -> Result<(), SamplerError> {
        if self.objective.dimension() != dim {
            return Err(SamplerError::dimension_mismatch(
                "objective",
                dim,
                self.objective.dimension(),
            ));
        }
        if self.factor.nrows() != dim || self.factor.ncols() != dim {
            return Err(SamplerError::Dimension(
                ErrorInfo::new("factor-shape", "direction factor must be square of body dimension")
                    .with_context("expected", dim.to_string())
                    .with_context("rows", self.factor.nrows().to_string())
                    .with_context("cols", self.factor.ncols().to_string()),
            ));
        }
        if !(self.temperature > 0.0) {
            return Err(SamplerError::Config(
                ErrorInfo::new("invalid-parameter", "temperature must be positive")
                    .with_context("field", "temperature")
                    .with_context("value", self.temperature.to_string()),
            ));
        }
        Ok(())
    }
}

/// Draws `x` in `[0, upper]` with density proportional to `exp(-rate·x)`.
///
/// Uses inversion of the truncated CDF. A negligible `rate·upper` falls back
/// to a uniform draw.
pub fn truncated_exponential<R: Rng + ?Sized>(rate: f64, upper: f64, rng: &mut R) -> f64 {
    let u: f64 = rng.gen();
    let scaled = rate * upper;
    if !(scaled > FLAT_POTENTIAL) {
        return u * upper;
    }
    let x = -(u * (-scaled).exp_m1()).ln_1p() / rate;
    x.clamp(0.0, upper)
}

/// One hit-and-run step whose position on the chord follows the Boltzmann
/// density restricted to the chord.
///
/// The draw is anchored at the endpoint with the lower potential `<c, x>`
/// (the larger density) and measured towards the other endpoint, so the
/// exponential never has to be evaluated far from its maximum.
pub fn boltzmann_step<B, R>(point: &mut Point, body: &B, target: &BoltzmannTarget, rng: &mut R)
where
    B: ConvexBody + ?Sized,
    R: Rng + ?Sized,
{
    let direction = anisotropic_direction(&target.factor, rng);
    let chord = body.line_intersect(point, &direction);
    let (b1, b2) = chord.endpoints(point, &direction);
    let c1 = target.objective.dot(&b1);
    let c2 = target.objective.dot(&b2);
    let length = chord.length();

    // Potential drop across the chord, in units of the temperature.
    let drop = (c1 - c2).abs() / target.temperature;
    let offset = truncated_exponential(drop, 1.0, rng) * length;

    if c1 > c2 {
        *point = b2;
        point.axpy(offset, &direction);
    } else {
        *point = b1;
        point.axpy(-offset, &direction);
    }
}
