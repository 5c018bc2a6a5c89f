//! # cavf-meas
//!
//! Monte Carlo estimation of the view factors between the ring elements of an
//! axisymmetric cavity: an aperture disk, a chain of frusta and a terminal
//! cone or disk.
//!
//! The cavity profile is discretised into elements ([`discretize`]), every
//! element fires a Lambertian ray bundle into the cavity, the hits are binned
//! back into a row of the view factor matrix ([`binning`]) and the running
//! statistics decide when the estimate is precise enough ([`convergence`]).
//! [`CavityRtvf`] drives the whole loop.
#![warn(missing_docs)]

pub mod binning;
pub mod convergence;
pub mod discretize;
pub mod element;
pub mod error;
pub mod params;
pub mod profile;
mod rtvf;

pub use element::{Element, ElementKind, ElementShape, SampleSpan};
pub use error::ConfigError;
pub use params::{RtvfParams, ShutoffPolicy, WeightingScheme};
pub use profile::{CavityProfile, ConeKind, Frustum};
pub use rtvf::{CavityRtvf, Termination, ViewFactors};

use serde::{Deserialize, Serialize};

/// Description of an estimation: the cavity and the parameters, as read from
/// a YAML or TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CavityDesc {
    /// Profile of the cavity.
    pub profile: CavityProfile,
    /// Parameters of the estimation.
    #[serde(default)]
    pub params: RtvfParams,
}

impl CavityDesc {
    /// Creates the estimation described.
    pub fn into_rtvf(self) -> Result<CavityRtvf, base::error::CavfError> {
        CavityRtvf::new(self.profile, self.params)
    }
}
