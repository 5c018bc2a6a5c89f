//! Running statistics of the view factor estimate and the stopping
//! criterion.
//!
//! After every pass the per-pass matrix is folded into a running expectation
//! with a Welford-style accumulator of the squared deviations. An entry is
//! converged when both its own deviation and the deviation of the
//! reciprocity relation `A_i F_ij = A_j F_ji` are within the precision
//! target.

use crate::params::WeightingScheme;
use base::math::{sqr, SquareMatrix};

/// Expectations at or below this value are considered exactly zero.
pub const ZERO_VIEW_FACTOR: f64 = 1e-12;

/// Thresholds of the convergence test.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ConvergenceCriteria {
    /// Relative precision target.
    pub precision: f64,
    /// Number of passes before any entry may converge.
    pub min_passes: u32,
    /// Number of rays a row needs before its zero entries converge.
    pub min_samples: u64,
}

/// Running statistics of the view factor matrix.
#[derive(Debug, Clone)]
pub struct SamplingState {
    samples: Vec<u64>,
    passes: u32,
    expectation: SquareMatrix<f64>,
    qsum: SquareMatrix<f64>,
    stdev: SquareMatrix<f64>,
    stdev_reciprocity: SquareMatrix<f64>,
    progress: SquareMatrix<bool>,
    reported_non_finite: bool,
}

impl SamplingState {
    /// Creates the state of an `n` by `n` matrix; every entry starts
    /// unconverged.
    pub fn new(n: usize) -> Self {
        Self {
            samples: vec![0; n],
            passes: 0,
            expectation: SquareMatrix::splat(n, 0.0),
            qsum: SquareMatrix::splat(n, 0.0),
            stdev: SquareMatrix::splat(n, 0.0),
            stdev_reciprocity: SquareMatrix::splat(n, 0.0),
            progress: SquareMatrix::splat(n, true),
            reported_non_finite: false,
        }
    }

    /// Returns the size of the matrix.
    pub fn n(&self) -> usize { self.samples.len() }

    /// Returns the cumulative number of rays fired by each row.
    pub fn samples(&self) -> &[u64] { &self.samples }

    /// Returns the number of passes folded in.
    pub fn passes(&self) -> u32 { self.passes }

    /// Returns the running expectation of the view factors.
    pub fn expectation(&self) -> &SquareMatrix<f64> { &self.expectation }

    /// Returns the standard deviation of the estimate.
    pub fn stdev(&self) -> &SquareMatrix<f64> { &self.stdev }

    /// Returns the area-normalised deviation from reciprocity.
    pub fn stdev_reciprocity(&self) -> &SquareMatrix<f64> { &self.stdev_reciprocity }

    /// Returns the entries still short of the precision target.
    pub fn progress(&self) -> &SquareMatrix<bool> { &self.progress }

    /// Returns the number of unconverged entries.
    pub fn num_unconverged(&self) -> usize { self.progress.as_slice().iter().filter(|p| **p).count() }

    /// Whether every entry is converged.
    pub fn is_converged(&self) -> bool { !self.progress.as_slice().iter().any(|p| *p) }

    /// Whether an entry in the row or in the column of element `i` is still
    /// unconverged.
    pub fn needs_samples(&self, i: usize) -> bool {
        self.progress.row(i).iter().any(|p| *p) || (0..self.n()).any(|k| self.progress[(k, i)])
    }

    /// Folds the matrix of one pass into the running statistics.
    ///
    /// `counts[i]` is the number of rays row `i` fired during the pass; rows
    /// that did not fire are left untouched.
    pub fn fold(&mut self, vf_pass: &SquareMatrix<f64>, counts: &[u64], weighting: WeightingScheme) {
        debug_assert_eq!(vf_pass.n(), self.n(), "matrix size mismatch");
        debug_assert_eq!(counts.len(), self.n(), "counts length mismatch");
        let total_old = self.samples.iter().sum::<u64>() as f64;
        let total_new = counts.iter().sum::<u64>() as f64;
        for (i, &count) in counts.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let (s_old, s_new) = match weighting {
                WeightingScheme::PerRow => (self.samples[i] as f64, count as f64),
                WeightingScheme::Aggregate => (total_old, total_new),
            };
            let s_total = s_old + s_new;
            let w_old = s_old / s_total;
            let pass_row = vf_pass.row(i);
            let qsum_row = self.qsum.row_mut(i);
            for (j, e) in self.expectation.row_mut(i).iter_mut().enumerate() {
                let old = *e;
                *e = (old * s_old + pass_row[j] * s_new) / s_total;
                qsum_row[j] += w_old * sqr(*e - old);
            }
            self.samples[i] += count;
        }
        self.passes += 1;
    }

    /// Recomputes the deviations and the progress mask, returns the number of
    /// unconverged entries.
    pub fn test_precision(&mut self, areas: &[f64], criteria: &ConvergenceCriteria) -> usize {
        debug_assert_eq!(areas.len(), self.n(), "areas length mismatch");
        let n = self.n();
        let mut non_finite = 0usize;
        for i in 0..n {
            let p = self.samples[i] as f64;
            for j in 0..n {
                let e = self.expectation[(i, j)];
                let stdev = (self.qsum[(i, j)] / p).sqrt();
                let rec_ij = areas[i] * e;
                let rec_ji = areas[j] * self.expectation[(j, i)];
                let stdev_rec = (rec_ij - rec_ji).abs() / ((areas[i] + areas[j]) / 2.0);
                self.stdev[(i, j)] = stdev;
                self.stdev_reciprocity[(i, j)] = stdev_rec;

                let converged = if self.passes < criteria.min_passes {
                    false
                } else if !(e.is_finite() && stdev.is_finite() && stdev_rec.is_finite()) {
                    non_finite += 1;
                    true
                } else if e.abs() <= ZERO_VIEW_FACTOR {
                    self.samples[i] >= criteria.min_samples
                } else {
                    stdev <= criteria.precision * e / 3.0
                        && stdev_rec <= 2.0 * criteria.precision
                };
                self.progress[(i, j)] = !converged;
            }
        }
        if non_finite > 0 && !self.reported_non_finite {
            log::debug!(
                "[Convergence] {} entries with non-finite statistics are not tested",
                non_finite
            );
            self.reported_non_finite = true;
        }
        self.num_unconverged()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const CRITERIA: ConvergenceCriteria = ConvergenceCriteria {
        precision: 0.01,
        min_passes: 2,
        min_samples: 1,
    };

    #[test]
    fn test_stdev_is_non_increasing() {
        let mut state = SamplingState::new(1);
        let mut previous = f64::INFINITY;
        for pass in 0..50 {
            let value = if pass % 2 == 0 { 0.4 } else { 0.6 };
            state.fold(
                &SquareMatrix::splat(1, value),
                &[1],
                WeightingScheme::PerRow,
            );
            state.test_precision(&[1.0], &CRITERIA);
            if pass >= 1 {
                let stdev = state.stdev()[(0, 0)];
                assert!(stdev <= previous, "pass {}: {} > {}", pass, stdev, previous);
                previous = stdev;
            }
        }
        assert_eq!(state.samples(), &[50]);
        assert_relative_eq!(state.expectation()[(0, 0)], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_welford_update() {
        let mut state = SamplingState::new(1);
        state.fold(&SquareMatrix::splat(1, 0.4), &[1], WeightingScheme::PerRow);
        state.fold(&SquareMatrix::splat(1, 0.6), &[1], WeightingScheme::PerRow);
        state.test_precision(&[1.0], &CRITERIA);
        assert_relative_eq!(state.expectation()[(0, 0)], 0.5, epsilon = 1e-12);
        assert_relative_eq!(state.stdev()[(0, 0)], 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_pass_floor_and_convergence() {
        let vf = SquareMatrix::try_from(vec![vec![0.0, 0.5], vec![0.5, 0.0]]).unwrap();
        let mut state = SamplingState::new(2);
        state.fold(&vf, &[1000, 1000], WeightingScheme::PerRow);
        assert_eq!(state.test_precision(&[1.0, 1.0], &CRITERIA), 4);
        assert!(state.needs_samples(0));
        state.fold(&vf, &[1000, 1000], WeightingScheme::PerRow);
        assert_eq!(state.test_precision(&[1.0, 1.0], &CRITERIA), 0);
        assert!(state.is_converged());
        assert!(!state.needs_samples(1));
        assert_eq!(state.passes(), 2);
    }

    #[test]
    fn test_reciprocity_violation() {
        let vf = SquareMatrix::try_from(vec![vec![0.0, 0.5], vec![0.5, 0.0]]).unwrap();
        let mut state = SamplingState::new(2);
        for _ in 0..3 {
            state.fold(&vf, &[1000, 1000], WeightingScheme::PerRow);
        }
        // A_0 F_01 = 0.5 and A_1 F_10 = 1.0.
        assert_eq!(state.test_precision(&[1.0, 2.0], &CRITERIA), 2);
        assert_relative_eq!(state.stdev_reciprocity()[(0, 1)], 0.5 / 1.5);
        assert!(state.progress()[(0, 1)] && state.progress()[(1, 0)]);
        assert!(!state.progress()[(0, 0)]);
    }

    #[test]
    fn test_zero_entries_wait_for_min_samples() {
        let vf = SquareMatrix::try_from(vec![vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        let criteria = ConvergenceCriteria {
            min_samples: 300,
            ..CRITERIA
        };
        let mut state = SamplingState::new(2);
        state.fold(&vf, &[100, 100], WeightingScheme::PerRow);
        state.fold(&vf, &[100, 100], WeightingScheme::PerRow);
        assert_eq!(state.test_precision(&[1.0, 1.0], &criteria), 2);
        assert!(state.progress()[(0, 0)] && !state.progress()[(0, 1)]);
        state.fold(&vf, &[100, 100], WeightingScheme::PerRow);
        assert_eq!(state.test_precision(&[1.0, 1.0], &criteria), 0);
    }

    #[test]
    fn test_rows_without_samples_are_untouched() {
        let vf = SquareMatrix::splat(2, 0.5);
        let mut state = SamplingState::new(2);
        state.fold(&vf, &[10, 0], WeightingScheme::PerRow);
        assert_eq!(state.samples(), &[10, 0]);
        assert_eq!(state.expectation().row(0), &[0.5, 0.5]);
        assert_eq!(state.expectation().row(1), &[0.0, 0.0]);
    }

    #[test]
    fn test_non_finite_entries_are_converged() {
        // A zero-area element makes its diagonal reciprocity deviation 0 / 0.
        let vf = SquareMatrix::try_from(vec![vec![0.0, 1.0], vec![0.0, 0.0]]).unwrap();
        let mut state = SamplingState::new(2);
        state.fold(&vf, &[100, 100], WeightingScheme::PerRow);
        state.fold(&vf, &[100, 100], WeightingScheme::PerRow);
        state.test_precision(&[1.0, 0.0], &CRITERIA);
        assert!(state.stdev_reciprocity()[(1, 1)].is_nan());
        assert!(!state.progress()[(1, 1)]);
    }

    #[test]
    fn test_weighting_schemes() {
        let first = SquareMatrix::splat(2, 0.2);
        let second = SquareMatrix::splat(2, 0.5);
        let mut per_row = SamplingState::new(2);
        let mut aggregate = SamplingState::new(2);
        for (state, scheme) in [
            (&mut per_row, WeightingScheme::PerRow),
            (&mut aggregate, WeightingScheme::Aggregate),
        ] {
            state.fold(&first, &[10, 30], scheme);
            state.fold(&second, &[10, 10], scheme);
        }
        assert_relative_eq!(per_row.expectation()[(0, 0)], 0.35, epsilon = 1e-12);
        assert_relative_eq!(aggregate.expectation()[(0, 0)], 0.3, epsilon = 1e-12);
        assert_eq!(per_row.samples(), aggregate.samples());
    }
}
