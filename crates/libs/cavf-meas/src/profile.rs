//! Revolve profile of an axisymmetric cavity.
//!
//! The symmetry axis is z, the aperture lies in the plane `z = 0` and the
//! cavity extends towards +z: aperture disk, then a chain of frusta, then a
//! terminal cone (or a flat disk when the cone has no depth).

use crate::error::ConfigError;
use base::math::sqr;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// One band of the profile, starting at the radius where the previous part
/// ends.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Frustum {
    /// Radius at the end of the band.
    pub radius: f64,
    /// Axial length of the band; negative when the profile folds back
    /// towards the aperture.
    pub depth: f64,
    /// Number of sub-elements of equal depth the band is split into.
    pub elements: u32,
}

/// Shape closing the cavity, derived from the sign of the cone depth.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConeKind {
    /// Apex pointing away from the aperture.
    Outgoing,
    /// Flat terminal disk.
    Flat,
    /// Apex pointing towards the aperture.
    Inward,
}

/// Immutable description of an axisymmetric cavity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CavityProfile {
    /// Radius of the aperture disk.
    pub aperture_radius: f64,
    /// Bands of the profile, from the aperture to the back of the cavity.
    pub frusta: Vec<Frustum>,
    /// Depth of the terminal cone; see [`ConeKind`].
    pub cone_depth: f64,
    /// Number of sub-elements of the terminal cone (of equal depth) or disk
    /// (of equal radial width).
    pub cone_elements: u32,
}

impl CavityProfile {
    /// Creates a profile from the frusta given as parallel lists, the way the
    /// 2N-parameter cavity is usually described.
    pub fn from_lists(
        aperture_radius: f64,
        radii: &[f64],
        depths: &[f64],
        cone_depth: f64,
        frusta_elements: &[u32],
        cone_elements: u32,
    ) -> Result<Self, ConfigError> {
        if radii.len() != depths.len() || radii.len() != frusta_elements.len() {
            return Err(ConfigError::LengthMismatch {
                radii: radii.len(),
                depths: depths.len(),
                counts: frusta_elements.len(),
            });
        }
        let profile = Self {
            aperture_radius,
            frusta: radii
                .iter()
                .zip(depths)
                .zip(frusta_elements)
                .map(|((&radius, &depth), &elements)| Frustum {
                    radius,
                    depth,
                    elements,
                })
                .collect(),
            cone_depth,
            cone_elements,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Creates the four-parameter cavity: a single band of depth
    /// `aperture_depth` going from the aperture to `cone_radius`, closed by a
    /// cone of depth `cone_depth`.
    ///
    /// See "Open cavity receiver geometry influence on radiative losses"
    /// (DOI:10.13140/2.1.3845.5048).
    pub fn four_parameters(
        aperture_radius: f64,
        aperture_depth: f64,
        cone_radius: f64,
        cone_depth: f64,
        frustum_elements: u32,
        cone_elements: u32,
    ) -> Result<Self, ConfigError> {
        Self::from_lists(
            aperture_radius,
            &[cone_radius],
            &[aperture_depth],
            cone_depth,
            &[frustum_elements],
            cone_elements,
        )
    }

    /// Checks that the profile describes a valid cavity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.aperture_radius.is_finite() || self.aperture_radius < 0.0 {
            return Err(ConfigError::InvalidApertureRadius(self.aperture_radius));
        }
        if self.frusta.is_empty() {
            return Err(ConfigError::NoFrustum);
        }
        for (index, frustum) in self.frusta.iter().enumerate() {
            if !frustum.radius.is_finite() || frustum.radius < 0.0 {
                return Err(ConfigError::InvalidFrustumRadius {
                    index,
                    radius: frustum.radius,
                });
            }
            if !frustum.depth.is_finite() || frustum.depth == 0.0 {
                return Err(ConfigError::InvalidFrustumDepth {
                    index,
                    depth: frustum.depth,
                });
            }
            if frustum.elements == 0 {
                return Err(ConfigError::ZeroFrustumElements(index));
            }
        }
        if !self.cone_depth.is_finite() {
            return Err(ConfigError::InvalidConeDepth(self.cone_depth));
        }
        if self.cone_elements == 0 {
            return Err(ConfigError::ZeroConeElements);
        }
        Ok(())
    }

    /// Returns the number of elements of the discretised cavity.
    pub fn num_elements(&self) -> usize {
        1 + self
            .frusta
            .iter()
            .map(|f| f.elements as usize)
            .sum::<usize>()
            + self.cone_elements as usize
    }

    /// Returns the radius and the axial position where the `k`-th frustum
    /// starts.
    pub fn frustum_start(&self, k: usize) -> (f64, f64) {
        let radius = match k {
            0 => self.aperture_radius,
            _ => self.frusta[k - 1].radius,
        };
        (radius, self.frusta[..k].iter().map(|f| f.depth).sum())
    }

    /// Returns the axial position where the terminal cone starts.
    pub fn max_depth(&self) -> f64 { self.frusta.iter().map(|f| f.depth).sum() }

    /// Returns the radius of the base of the terminal cone.
    pub fn cone_radius(&self) -> f64 {
        self.frusta
            .last()
            .map_or(self.aperture_radius, |f| f.radius)
    }

    /// Returns the kind of the terminal part.
    pub fn cone_kind(&self) -> ConeKind {
        if self.cone_depth > 0.0 {
            ConeKind::Outgoing
        } else if self.cone_depth < 0.0 {
            ConeKind::Inward
        } else {
            ConeKind::Flat
        }
    }

    /// Returns the total area of the cavity walls and aperture computed from
    /// the closed-form area of each part.
    pub fn total_area(&self) -> f64 {
        let aperture = PI * sqr(self.aperture_radius);
        let frusta = self
            .frusta
            .iter()
            .enumerate()
            .map(|(k, f)| {
                let (r0, _) = self.frustum_start(k);
                PI * (r0 + f.radius) * (sqr(f.depth) + sqr(f.radius - r0)).sqrt()
            })
            .sum::<f64>();
        let r = self.cone_radius();
        let cone = match self.cone_kind() {
            ConeKind::Flat => PI * sqr(r),
            _ => PI * r * (sqr(self.cone_depth) + sqr(r)).sqrt(),
        };
        aperture + frusta + cone
    }
}
