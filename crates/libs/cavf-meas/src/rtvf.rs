//! Adaptive Monte Carlo estimation of the view factors of a cavity.

use crate::{
    binning::bin_hits,
    convergence::{ConvergenceCriteria, SamplingState},
    discretize::{areas, build_scene, discretize},
    element::{Element, ElementKind},
    params::{RtvfParams, ShutoffPolicy},
    profile::CavityProfile,
};
use base::{error::CavfError, math::SquareMatrix, utils::iso_timestamp};
use rt::{AnalyticTracer, LambertianSource, RaySource, Scene, TraceParams, Tracer};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Why the pass loop stopped.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Termination {
    /// Every entry met the precision target.
    Converged,
    /// The maximum number of passes was reached.
    PassLimit,
    /// The time limit was reached.
    TimeLimit,
}

/// Result of a view factor estimation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ViewFactors {
    /// Time at which the estimation finished.
    pub timestamp: String,
    /// Kind of every element.
    pub kinds: Vec<ElementKind>,
    /// Area of every element.
    pub areas: Vec<f64>,
    /// Estimated view factors; entry `(i, j)` is the fraction of the power
    /// leaving element `i` absorbed by element `j`.
    pub view_factors: SquareMatrix<f64>,
    /// Standard deviation of the estimate.
    pub stdev: SquareMatrix<f64>,
    /// Area-normalised deviation from reciprocity.
    pub stdev_reciprocity: SquareMatrix<f64>,
    /// Cumulative number of rays fired by each element.
    pub samples: Vec<u64>,
    /// Number of passes.
    pub passes: u32,
    /// Why the estimation stopped.
    pub termination: Termination,
    /// Duration of the estimation in seconds.
    pub elapsed_secs: f64,
}

impl ViewFactors {
    /// Returns the number of elements.
    pub fn n(&self) -> usize { self.areas.len() }

    /// Returns the view factor from element `i` to element `j`.
    pub fn get(&self, i: usize, j: usize) -> f64 { self.view_factors[(i, j)] }

    /// Returns the sum of every row; close to one for a closed cavity.
    pub fn row_sums(&self) -> Vec<f64> { self.view_factors.rows().map(|r| r.iter().sum()).collect() }

    /// Returns `|A_i F_ij - A_j F_ji|` normalised by the mean area of the two
    /// elements.
    pub fn reciprocity_error(&self, i: usize, j: usize) -> f64 {
        (self.areas[i] * self.get(i, j) - self.areas[j] * self.get(j, i)).abs()
            / ((self.areas[i] + self.areas[j]) / 2.0)
    }

    /// Whether the estimation met the precision target.
    pub fn is_converged(&self) -> bool { self.termination == Termination::Converged }
}

/// View factor estimation of an axisymmetric cavity made of an aperture, a
/// chain of frusta and a terminal cone or disk.
///
/// The cavity is discretised once at construction; [`CavityRtvf::run`] then
/// fires every element in turn, pass after pass, until the estimate meets the
/// precision target or a ceiling is reached.
#[derive(Debug, Clone)]
pub struct CavityRtvf {
    profile: CavityProfile,
    params: RtvfParams,
    elements: Vec<Element>,
    areas: Vec<f64>,
    scene: Scene,
    allocation: u32,
}

impl CavityRtvf {
    /// Creates the estimation of the cavity described by `profile`.
    pub fn new(profile: CavityProfile, params: RtvfParams) -> Result<Self, CavfError> {
        profile.validate()?;
        let params = params.validate()?;
        let allocation = params.allocation(profile.num_elements())?;
        let elements = discretize(&profile);
        let areas = areas(&elements);
        let scene = build_scene(&profile);
        log::info!(
            "[RTVF] {} elements, {} rays per element and pass, precision {}",
            elements.len(),
            allocation,
            params.precision
        );
        Ok(Self {
            profile,
            params,
            elements,
            areas,
            scene,
            allocation,
        })
    }

    /// Creates the estimation of a 2N-parameter cavity.
    ///
    /// # Arguments
    ///
    /// * `aperture_radius` - Radius of the aperture.
    /// * `frusta_radii` - Successive radii of the frusta, from the aperture
    ///   following the profile.
    /// * `frusta_depths` - Depths of the frusta in the same order.
    /// * `cone_depth` - Depth of the cone closing the cavity; zero for a flat
    ///   disk, negative for a cone pointing to the aperture.
    /// * `frusta_elements` - Number of elements of equal depth of each frustum.
    /// * `cone_elements` - Number of elements of the cone or disk.
    /// * `params` - Ray budget, precision target and the other parameters.
    pub fn two_n_parameters(
        aperture_radius: f64,
        frusta_radii: &[f64],
        frusta_depths: &[f64],
        cone_depth: f64,
        frusta_elements: &[u32],
        cone_elements: u32,
        params: RtvfParams,
    ) -> Result<Self, CavfError> {
        let profile = CavityProfile::from_lists(
            aperture_radius,
            frusta_radii,
            frusta_depths,
            cone_depth,
            frusta_elements,
            cone_elements,
        )?;
        Self::new(profile, params)
    }

    /// Creates the estimation of a four-parameter cavity: a single frustum of
    /// depth `aperture_depth` widening or narrowing to `cone_radius`, closed by
    /// a cone of depth `cone_depth`.
    pub fn four_parameters(
        aperture_radius: f64,
        aperture_depth: f64,
        cone_radius: f64,
        cone_depth: f64,
        frustum_elements: u32,
        cone_elements: u32,
        params: RtvfParams,
    ) -> Result<Self, CavfError> {
        Self::two_n_parameters(
            aperture_radius,
            &[cone_radius],
            &[aperture_depth],
            cone_depth,
            &[frustum_elements],
            cone_elements,
            params,
        )
    }

    /// Returns the profile of the cavity.
    pub fn profile(&self) -> &CavityProfile { &self.profile }

    /// Returns the parameters of the estimation.
    pub fn params(&self) -> &RtvfParams { &self.params }

    /// Returns the elements of the cavity.
    pub fn elements(&self) -> &[Element] { &self.elements }

    /// Returns the areas of the elements.
    pub fn areas(&self) -> &[f64] { &self.areas }

    /// Returns the number of elements.
    pub fn num_elements(&self) -> usize { self.elements.len() }

    /// Returns the number of rays an element fires in a pass.
    pub fn allocation(&self) -> u32 { self.allocation }

    /// Runs the estimation with the Lambertian source and the analytic
    /// tracer.
    pub fn run(&self) -> ViewFactors { self.run_with(&LambertianSource, &AnalyticTracer) }

    /// Runs the estimation with the given ray source and tracer.
    pub fn run_with<S, T>(&self, source: &S, tracer: &T) -> ViewFactors
    where
        S: RaySource + ?Sized,
        T: Tracer + ?Sized,
    {
        let start = Instant::now();
        let n = self.num_elements();
        let criteria = ConvergenceCriteria {
            precision: self.params.precision,
            min_passes: self.params.min_passes,
            min_samples: self
                .params
                .min_samples
                .unwrap_or(self.allocation as u64),
        };
        let mut state = SamplingState::new(n);
        let mut vf_pass = SquareMatrix::splat(n, 0.0);
        let mut counts = vec![0u64; n];

        let termination = loop {
            if state.is_converged() {
                break Termination::Converged;
            }
            if state.passes() >= self.params.max_passes {
                log::warn!(
                    "[RTVF] stopped after {} passes with {} unconverged entries",
                    state.passes(),
                    state.num_unconverged()
                );
                break Termination::PassLimit;
            }
            if let Some(limit) = self.params.time_limit_secs {
                if start.elapsed().as_secs_f64() >= limit {
                    log::warn!(
                        "[RTVF] stopped after {:.1} s with {} unconverged entries",
                        start.elapsed().as_secs_f64(),
                        state.num_unconverged()
                    );
                    break Termination::TimeLimit;
                }
            }

            let pass = state.passes();
            let t = Instant::now();
            for (i, element) in self.elements.iter().enumerate() {
                let fire = match self.params.shutoff {
                    ShutoffPolicy::Uniform => true,
                    ShutoffPolicy::PerElement => state.needs_samples(i),
                };
                if !fire {
                    counts[i] = 0;
                    continue;
                }
                let seed = stream_seed(self.params.seed, pass, i);
                let bundle = source.emit(
                    &element.shape.emitter_shape(),
                    &element.pose(),
                    self.allocation,
                    seed,
                );
                let result = tracer.trace(
                    &self.scene,
                    &bundle,
                    &TraceParams {
                        max_bounces: self.params.max_bounces,
                        min_energy: self.params.min_energy,
                        seed: !seed,
                    },
                );
                bin_hits(&self.elements, &result, vf_pass.row_mut(i));
                log::debug!(
                    "[RTVF] pass {} element #{} ({:?}): absorbed {:.4}, escaped {:.4}",
                    pass,
                    i,
                    element.kind(),
                    result.total_absorbed(),
                    result.escaped
                );
                counts[i] = bundle.len() as u64;
            }

            state.fold(&vf_pass, &counts, self.params.weighting);
            let unconverged = state.test_precision(&self.areas, &criteria);
            log::info!(
                "[RTVF] pass {}: progress {}/{}, pass duration {:.3} s",
                pass + 1,
                unconverged,
                n * n,
                t.elapsed().as_secs_f64()
            );
        };

        let elapsed_secs = start.elapsed().as_secs_f64();
        log::info!(
            "[RTVF] {:?} after {} passes in {:.3} s",
            termination,
            state.passes(),
            elapsed_secs
        );
        ViewFactors {
            timestamp: iso_timestamp(),
            kinds: self.elements.iter().map(Element::kind).collect(),
            areas: self.areas.clone(),
            view_factors: state.expectation().clone(),
            stdev: state.stdev().clone(),
            stdev_reciprocity: state.stdev_reciprocity().clone(),
            samples: state.samples().to_vec(),
            passes: state.passes(),
            termination,
            elapsed_secs,
        }
    }
}

/// Seed of the random stream of element `element` during pass `pass`.
fn stream_seed(seed: u64, pass: u32, element: usize) -> u64 {
    seed.wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(((pass as u64) << 32) | element as u64)
}
