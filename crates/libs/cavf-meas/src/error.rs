//! Configuration errors of a view factor estimation.

use std::fmt::{Display, Formatter};

/// Reason why a cavity description or the estimation parameters are rejected.
///
/// Carried as the source of a [`base::error::CavfError`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The aperture radius is negative or not finite.
    InvalidApertureRadius(f64),
    /// The radius of a frustum is negative or not finite.
    InvalidFrustumRadius {
        /// Index of the frustum in the profile.
        index: usize,
        /// Offending radius.
        radius: f64,
    },
    /// The depth of a frustum is zero or not finite.
    InvalidFrustumDepth {
        /// Index of the frustum in the profile.
        index: usize,
        /// Offending depth.
        depth: f64,
    },
    /// The depth of the terminal cone is not finite.
    InvalidConeDepth(f64),
    /// The lists describing the frusta have different lengths.
    LengthMismatch {
        /// Number of radii.
        radii: usize,
        /// Number of depths.
        depths: usize,
        /// Number of discretisation counts.
        counts: usize,
    },
    /// The profile has no frustum.
    NoFrustum,
    /// A frustum is split into zero elements.
    ZeroFrustumElements(usize),
    /// The terminal cone or disk is split into zero elements.
    ZeroConeElements,
    /// The precision target is not strictly positive.
    InvalidPrecision(f64),
    /// The ray budget cannot give one ray to every element.
    InsufficientRays {
        /// Ray budget of one pass.
        num_rays: u32,
        /// Number of elements of the cavity.
        num_elements: usize,
    },
    /// The pass ceiling is lower than the pass floor.
    InvalidPassLimits {
        /// Minimum number of passes.
        min_passes: u32,
        /// Maximum number of passes.
        max_passes: u32,
    },
    /// The time limit is not strictly positive.
    InvalidTimeLimit(f64),
    /// A ray must be allowed at least one surface interaction.
    InvalidBounces(u32),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidApertureRadius(r) => write!(f, "Invalid aperture radius {}", r),
            Self::InvalidFrustumRadius { index, radius } => {
                write!(f, "Invalid radius {} of frustum #{}", radius, index)
            },
            Self::InvalidFrustumDepth { index, depth } => {
                write!(f, "Invalid depth {} of frustum #{}", depth, index)
            },
            Self::InvalidConeDepth(d) => write!(f, "Invalid cone depth {}", d),
            Self::LengthMismatch {
                radii,
                depths,
                counts,
            } => write!(
                f,
                "Mismatched frusta lists: {} radii, {} depths, {} discretisation counts",
                radii, depths, counts
            ),
            Self::NoFrustum => write!(f, "The profile needs at least one frustum"),
            Self::ZeroFrustumElements(i) => write!(f, "Frustum #{} is split into zero elements", i),
            Self::ZeroConeElements => write!(f, "The cone is split into zero elements"),
            Self::InvalidPrecision(p) => write!(f, "Invalid precision target {}", p),
            Self::InsufficientRays {
                num_rays,
                num_elements,
            } => write!(
                f,
                "A budget of {} rays cannot cover {} elements",
                num_rays, num_elements
            ),
            Self::InvalidPassLimits {
                min_passes,
                max_passes,
            } => write!(
                f,
                "Maximum number of passes {} is lower than the minimum {}",
                max_passes, min_passes
            ),
            Self::InvalidTimeLimit(t) => write!(f, "Invalid time limit {} s", t),
            Self::InvalidBounces(n) => {
                write!(f, "Invalid number of bounces {}, at least 1 is needed", n)
            },
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for base::error::CavfError {
    fn from(err: ConfigError) -> Self {
        Self::new("Invalid cavity configuration", Some(Box::new(err)))
    }
}
