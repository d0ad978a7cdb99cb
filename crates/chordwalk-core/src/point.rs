//! Coordinate vectors in `R^n`.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// A point (or direction) in `R^n`.
///
/// Points are plain values: cloning copies the coordinates and arithmetic
/// returns fresh points. In-place helpers such as [`Point::axpy`] exist for
/// the hot paths of the walks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Point {
    coords: Vec<f64>,
}

impl Point {
    /// Returns the origin of `R^dim`.
    pub fn new(dim: usize) -> Self {
        Self {
            coords: vec![0.0; dim],
        }
    }

    /// Wraps an owned coordinate vector.
    pub fn from_vec(coords: Vec<f64>) -> Self {
        Self { coords }
    }

    /// Copies a nalgebra column vector.
    pub fn from_dvector(vector: &DVector<f64>) -> Self {
        Self {
            coords: vector.iter().copied().collect(),
        }
    }

    /// Copies the coordinates into a nalgebra column vector.
    pub fn to_dvector(&self) -> DVector<f64> {
        DVector::from_column_slice(&self.coords)
    }

    /// Ambient dimension.
    pub fn dimension(&self) -> usize {
        self.coords.len()
    }

    /// Coordinate `i`.
    pub fn coord(&self, i: usize) -> f64 {
        self.coords[i]
    }

    /// Overwrites coordinate `i`.
    pub fn set_coord(&mut self, i: usize, value: f64) {
        self.coords[i] = value;
    }

    /// Read-only view of the coordinates.
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    /// Consumes the point and returns its coordinates.
    pub fn into_vec(self) -> Vec<f64> {
        self.coords
    }

    /// Euclidean inner product.
    pub fn dot(&self, other: &Point) -> f64 {
        debug_assert_eq!(self.dimension(), other.dimension());
        self.coords
            .iter()
            .zip(other.coords.iter())
            .map(|(a, b)| a * b)
            .sum()
    }

    /// Squared Euclidean norm.
    pub fn norm_squared(&self) -> f64 {
        self.dot(self)
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.norm_squared().sqrt()
    }

    /// Multiplies every coordinate by `factor` in place.
    pub fn scale(&mut self, factor: f64) {
        for value in &mut self.coords {
            *value *= factor;
        }
    }

    /// In-place `self += alpha * other`.
    pub fn axpy(&mut self, alpha: f64, other: &Point) {
        debug_assert_eq!(self.dimension(), other.dimension());
        for (value, delta) in self.coords.iter_mut().zip(other.coords.iter()) {
            *value += alpha * delta;
        }
    }
}

impl From<Vec<f64>> for Point {
    fn from(coords: Vec<f64>) -> Self {
        Self::from_vec(coords)
    }
}

impl Add<&Point> for &Point {
    type Output = Point;

    fn add(self, rhs: &Point) -> Point {
        let mut out = self.clone();
        out.axpy(1.0, rhs);
        out
    }
}

impl Add for Point {
    type Output = Point;

    fn add(mut self, rhs: Point) -> Point {
        self.axpy(1.0, &rhs);
        self
    }
}

impl AddAssign<&Point> for Point {
    fn add_assign(&mut self, rhs: &Point) {
        self.axpy(1.0, rhs);
    }
}

impl Sub<&Point> for &Point {
    type Output = Point;

    fn sub(self, rhs: &Point) -> Point {
        let mut out = self.clone();
        out.axpy(-1.0, rhs);
        out
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(mut self, rhs: Point) -> Point {
        self.axpy(-1.0, &rhs);
        self
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(mut self) -> Point {
        self.scale(-1.0);
        self
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(mut self, rhs: f64) -> Point {
        self.scale(rhs);
        self
    }
}

impl Mul<f64> for &Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        let mut out = self.clone();
        out.scale(rhs);
        out
    }
}

impl Mul<&Point> for f64 {
    type Output = Point;

    fn mul(self, rhs: &Point) -> Point {
        rhs * self
    }
}

impl Mul<Point> for f64 {
    type Output = Point;

    fn mul(self, rhs: Point) -> Point {
        rhs * self
    }
}
