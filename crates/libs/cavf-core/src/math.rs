//! Math utilities.

use serde::{Deserialize, Serialize};
use std::{
    fmt::{Debug, Formatter},
    ops::{Index, IndexMut},
};

pub use glam::{DQuat, DVec3};

/// Returns the reciprocal of the given value.
#[inline(always)]
pub fn rcp_f64(x: f64) -> f64 { 1.0 / x }

/// Returns the square of the given value.
#[inline(always)]
pub fn sqr(x: f64) -> f64 { x * x }

/// Solution of a quadratic equation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuadraticSolution {
    /// No real solutions.
    None,
    /// One real solution.
    One(f64),
    /// Two real solutions, in ascending order.
    Two(f64, f64),
}

impl QuadraticSolution {
    /// Returns the real solutions in ascending order.
    pub fn roots(&self) -> impl Iterator<Item = f64> {
        let (a, b) = match *self {
            QuadraticSolution::None => (None, None),
            QuadraticSolution::One(x) => (Some(x), None),
            QuadraticSolution::Two(x0, x1) => (Some(x0), Some(x1)),
        };
        a.into_iter().chain(b)
    }
}

/// Solves the quadratic equation `a * x^2 + b * x + c = 0`.
///
/// Uses the cancellation-free form of the roots; degenerates to the linear
/// equation `b * x + c = 0` when `a` is exactly zero.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> QuadraticSolution {
    if a == 0.0 {
        return if b == 0.0 {
            QuadraticSolution::None
        } else {
            QuadraticSolution::One(-c / b)
        };
    }
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        QuadraticSolution::None
    } else if discriminant == 0.0 {
        QuadraticSolution::One(-0.5 * b * rcp_f64(a))
    } else {
        let q = -0.5 * (b + b.signum() * discriminant.sqrt());
        let x0 = q / a;
        let x1 = c / q;
        QuadraticSolution::Two(x0.min(x1), x0.max(x1))
    }
}

/// Builds an orthonormal basis `(t, b)` around the unit vector `n`.
///
/// Branchless construction from Duff et al. 2017, "Building an Orthonormal
/// Basis, Revisited".
pub fn orthonormal_basis(n: DVec3) -> (DVec3, DVec3) {
    let sign = 1.0f64.copysign(n.z);
    let a = -1.0 / (sign + n.z);
    let b = n.x * n.y * a;
    let t = DVec3::new(1.0 + sign * n.x * n.x * a, sign * b, -sign * n.x);
    let bt = DVec3::new(b, sign + n.y * n.y * a, -n.y);
    (t, bt)
}

/// Dense square matrix stored in row-major order.
///
/// Serialised as a sequence of rows.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<Vec<T>>",
    into = "Vec<Vec<T>>",
    bound(serialize = "T: Clone + Serialize", deserialize = "T: Deserialize<'de>")
)]
pub struct SquareMatrix<T> {
    n: usize,
    data: Vec<T>,
}

impl<T: Clone> SquareMatrix<T> {
    /// Creates a new `n` by `n` matrix filled with `value`.
    pub fn splat(n: usize, value: T) -> Self {
        Self {
            n,
            data: vec![value; n * n],
        }
    }
}

impl<T> SquareMatrix<T> {
    /// Returns the number of rows (and columns).
    pub const fn n(&self) -> usize { self.n }

    /// Returns the entries in row-major order.
    pub fn as_slice(&self) -> &[T] { &self.data }

    /// Returns the `i`-th row.
    pub fn row(&self, i: usize) -> &[T] { &self.data[i * self.n..(i + 1) * self.n] }

    /// Returns the mutable `i`-th row.
    pub fn row_mut(&mut self, i: usize) -> &mut [T] {
        &mut self.data[i * self.n..(i + 1) * self.n]
    }

    /// Iterates over the rows of the matrix.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[T]> {
        // `chunks_exact(0)` panics, an empty matrix has no rows anyway.
        self.data.chunks_exact(self.n.max(1))
    }
}

impl<T> Index<(usize, usize)> for SquareMatrix<T> {
    type Output = T;

    fn index(&self, (i, j): (usize, usize)) -> &Self::Output { &self.data[i * self.n + j] }
}

impl<T> IndexMut<(usize, usize)> for SquareMatrix<T> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Self::Output {
        &mut self.data[i * self.n + j]
    }
}

impl<T: Debug> Debug for SquareMatrix<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.rows()).finish()
    }
}

impl<T: Clone> From<SquareMatrix<T>> for Vec<Vec<T>> {
    fn from(value: SquareMatrix<T>) -> Self { value.rows().map(|r| r.to_vec()).collect() }
}

impl<T> TryFrom<Vec<Vec<T>>> for SquareMatrix<T> {
    type Error = String;

    fn try_from(rows: Vec<Vec<T>>) -> Result<Self, Self::Error> {
        let n = rows.len();
        if let Some(bad) = rows.iter().position(|r| r.len() != n) {
            return Err(format!(
                "row {} has {} entries, expected {}",
                bad,
                rows[bad].len(),
                n
            ));
        }
        Ok(Self {
            n,
            data: rows.into_iter().flatten().collect(),
        })
    }
}
