//! Parameters of a view factor estimation.

use crate::error::ConfigError;
use base::error::CavfError;
use serde::{Deserialize, Serialize};

/// Which elements fire during a pass.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShutoffPolicy {
    /// Every element fires every pass; convergence only stops the loop.
    #[default]
    Uniform,
    /// An element fires only while an entry of its row or of its column is
    /// still unconverged.
    PerElement,
}

/// Weights used to fold a pass into the running statistics.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeightingScheme {
    /// Each row is weighted by its own sample counts.
    #[default]
    PerRow,
    /// Every row is weighted by the sample counts summed over all rows.
    Aggregate,
}

/// Parameters of a view factor estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RtvfParams {
    /// Ray budget of one pass, shared equally between the elements.
    pub num_rays: u32,
    /// Relative precision target of the view factors.
    pub precision: f64,
    /// Number of passes before any entry may be declared converged.
    pub min_passes: u32,
    /// Maximum number of passes.
    pub max_passes: u32,
    /// Wall-clock limit of the estimation in seconds.
    pub time_limit_secs: Option<f64>,
    /// Number of rays a row needs before its zero entries count as
    /// converged; one pass worth of rays when not set.
    pub min_samples: Option<u64>,
    /// Which elements fire during a pass.
    pub shutoff: ShutoffPolicy,
    /// Weights of the running statistics.
    pub weighting: WeightingScheme,
    /// Maximum number of surface interactions of a ray.
    pub max_bounces: u32,
    /// Rays carrying less energy are no longer followed.
    pub min_energy: f64,
    /// Seed of the random streams.
    pub seed: u64,
}

impl Default for RtvfParams {
    fn default() -> Self {
        Self {
            num_rays: 10_000,
            precision: 0.01,
            min_passes: 2,
            max_passes: 10_000,
            time_limit_secs: None,
            min_samples: None,
            shutoff: ShutoffPolicy::Uniform,
            weighting: WeightingScheme::PerRow,
            max_bounces: 1,
            min_energy: 1e-15,
            seed: 0,
        }
    }
}

impl RtvfParams {
    /// Whether the parameters are valid.
    pub fn validate(self) -> Result<Self, CavfError> {
        log::info!("Validating view factor parameters...");
        if !(self.precision.is_finite() && self.precision > 0.0) {
            return Err(ConfigError::InvalidPrecision(self.precision).into());
        }
        if self.max_passes < self.min_passes {
            return Err(ConfigError::InvalidPassLimits {
                min_passes: self.min_passes,
                max_passes: self.max_passes,
            }
            .into());
        }
        if let Some(limit) = self.time_limit_secs {
            if limit.is_nan() || limit <= 0.0 {
                return Err(ConfigError::InvalidTimeLimit(limit).into());
            }
        }
        if self.max_bounces < 1 {
            return Err(ConfigError::InvalidBounces(self.max_bounces).into());
        }
        Ok(self)
    }

    /// Returns the number of rays every element fires in a pass.
    pub fn allocation(&self, num_elements: usize) -> Result<u32, CavfError> {
        if num_elements == 0 || (self.num_rays as usize) < num_elements {
            return Err(ConfigError::InsufficientRays {
                num_rays: self.num_rays,
                num_elements,
            }
            .into());
        }
        Ok((self.num_rays as usize / num_elements) as u32)
    }
}
