//! Ring elements of a discretised cavity.

use base::math::{sqr, DVec3};
use rt::{EmitterShape, Pose};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Kind of an element, used for reporting.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    /// The aperture disk.
    ApertureDisk,
    /// Band of a frustum with equal radii.
    CylinderBand,
    /// Band of a frustum with different radii.
    FrustumBand,
    /// Band of the terminal cone.
    ConeBand,
    /// Ring of the flat terminal disk.
    TerminalDisk,
}

/// Geometry of one element.
///
/// Bands are given by their two profile points in the order the profile is
/// walked from the aperture, so `z1 < z0` for a band built backwards.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum ElementShape {
    /// The aperture disk at `z = 0`.
    ApertureDisk {
        /// Radius of the aperture.
        radius: f64,
    },
    /// Band with constant radius.
    CylinderBand {
        /// Radius of the band.
        radius: f64,
        /// Axial position of the start of the band.
        z0: f64,
        /// Axial position of the end of the band.
        z1: f64,
    },
    /// Band of a frustum.
    FrustumBand {
        /// Radius at the start of the band.
        r0: f64,
        /// Axial position at the start of the band.
        z0: f64,
        /// Radius at the end of the band.
        r1: f64,
        /// Axial position at the end of the band.
        z1: f64,
    },
    /// Band of the terminal cone.
    ConeBand {
        /// Radius at the start of the band.
        r0: f64,
        /// Axial position at the start of the band.
        z0: f64,
        /// Radius at the end of the band, the smaller one.
        r1: f64,
        /// Axial position at the end of the band.
        z1: f64,
    },
    /// Ring of the flat terminal disk, facing the aperture.
    TerminalDisk {
        /// Inner radius of the ring.
        r_inner: f64,
        /// Outer radius of the ring.
        r_outer: f64,
        /// Axial position of the disk.
        z: f64,
    },
}

/// Coordinate range used to decide which element of an object a hit belongs
/// to. Ranges are half-open: `[low, high)`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "type")]
pub enum SampleSpan {
    /// Every hit on the object.
    Whole,
    /// Range of the axial coordinate.
    Axial {
        /// Lower bound, included.
        low: f64,
        /// Upper bound, excluded.
        high: f64,
    },
    /// Range of the distance to the axis.
    Radial {
        /// Lower bound, included.
        low: f64,
        /// Upper bound, excluded.
        high: f64,
    },
}

impl SampleSpan {
    /// Whether the hit position falls into the span.
    pub fn contains(&self, p: &DVec3) -> bool {
        match *self {
            SampleSpan::Whole => true,
            SampleSpan::Axial { low, high } => p.z >= low && p.z < high,
            SampleSpan::Radial { low, high } => {
                let r = (sqr(p.x) + sqr(p.y)).sqrt();
                r >= low && r < high
            },
        }
    }
}

impl ElementShape {
    /// Returns the kind of the element.
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementShape::ApertureDisk { .. } => ElementKind::ApertureDisk,
            ElementShape::CylinderBand { .. } => ElementKind::CylinderBand,
            ElementShape::FrustumBand { .. } => ElementKind::FrustumBand,
            ElementShape::ConeBand { .. } => ElementKind::ConeBand,
            ElementShape::TerminalDisk { .. } => ElementKind::TerminalDisk,
        }
    }

    /// Returns the two profile points of a band as `(r0, z0, r1, z1)`.
    fn band(&self) -> Option<(f64, f64, f64, f64)> {
        match *self {
            ElementShape::CylinderBand { radius, z0, z1 } => Some((radius, z0, radius, z1)),
            ElementShape::FrustumBand { r0, z0, r1, z1 }
            | ElementShape::ConeBand { r0, z0, r1, z1 } => Some((r0, z0, r1, z1)),
            _ => None,
        }
    }

    /// Returns the area of the element.
    pub fn area(&self) -> f64 {
        match *self {
            ElementShape::ApertureDisk { radius } => PI * sqr(radius),
            ElementShape::CylinderBand { radius, z0, z1 } => 2.0 * PI * radius * (z1 - z0).abs(),
            ElementShape::FrustumBand { r0, z0, r1, z1 }
            | ElementShape::ConeBand { r0, z0, r1, z1 } => {
                PI * (r0 + r1) * (sqr(z1 - z0) + sqr(r1 - r0)).sqrt()
            },
            ElementShape::TerminalDisk {
                r_inner, r_outer, ..
            } => PI * (sqr(r_outer) - sqr(r_inner)),
        }
    }

    /// Whether the band is built backwards, towards the aperture.
    pub fn is_reversed(&self) -> bool { self.band().is_some_and(|(_, z0, _, z1)| z1 < z0) }

    /// Whether the rays leave the element on the axis side of its local
    /// frame; `false` for bands built backwards.
    pub fn inward(&self) -> bool { !self.is_reversed() }

    /// Returns the pose of the local frame the element emits from.
    pub fn pose(&self) -> Pose {
        match *self {
            ElementShape::ApertureDisk { .. } => Pose::on_axis(0.0, false),
            ElementShape::TerminalDisk { z, .. } => Pose::on_axis(z, true),
            _ => {
                let z0 = self.band().map_or(0.0, |(_, z0, _, _)| z0);
                Pose::on_axis(z0, self.is_reversed())
            },
        }
    }

    /// Returns the shape of the emitter in the local frame of [`Self::pose`].
    pub fn emitter_shape(&self) -> EmitterShape {
        match *self {
            ElementShape::ApertureDisk { radius } => EmitterShape::disk(radius),
            ElementShape::TerminalDisk {
                r_inner, r_outer, ..
            } => EmitterShape::annulus(r_inner, r_outer),
            ElementShape::CylinderBand { radius, z0, z1 } => {
                EmitterShape::band(radius, radius, (z1 - z0).abs(), self.inward())
            },
            ElementShape::FrustumBand { r0, z0, r1, z1 }
            | ElementShape::ConeBand { r0, z0, r1, z1 } => {
                EmitterShape::band(r0, r1, (z1 - z0).abs(), self.inward())
            },
        }
    }

    /// Returns the coordinate range of the hits belonging to the element.
    pub fn sample_span(&self) -> SampleSpan {
        match *self {
            ElementShape::ApertureDisk { .. } => SampleSpan::Whole,
            ElementShape::CylinderBand { z0, z1, .. } | ElementShape::FrustumBand { z0, z1, .. } => {
                SampleSpan::Axial {
                    low: z0.min(z1),
                    high: z0.max(z1),
                }
            },
            ElementShape::ConeBand { r0, r1, .. } => SampleSpan::Radial {
                low: r0.min(r1),
                high: r0.max(r1),
            },
            ElementShape::TerminalDisk {
                r_inner, r_outer, ..
            } => SampleSpan::Radial {
                low: r_inner,
                high: r_outer,
            },
        }
    }
}

/// One ring of the discretised cavity.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Element {
    /// Row and column of the element in the view factor matrix.
    pub index: usize,
    /// Index of the scene object the element is part of.
    pub object: usize,
    /// Geometry of the element.
    pub shape: ElementShape,
}

impl Element {
    /// Returns the kind of the element.
    pub fn kind(&self) -> ElementKind { self.shape.kind() }

    /// Returns the area of the element.
    pub fn area(&self) -> f64 { self.shape.area() }

    /// Returns the pose of the element's emitter.
    pub fn pose(&self) -> Pose { self.shape.pose() }

    /// Returns the coordinate range used to bin hits.
    pub fn sample_span(&self) -> SampleSpan { self.shape.sample_span() }

    /// Whether the element is built backwards.
    pub fn is_reversed(&self) -> bool { self.shape.is_reversed() }

    /// Ray direction convention of the element's emitter.
    pub fn inward(&self) -> bool { self.shape.inward() }

    /// Whether a hit on the element's object at `p` belongs to the element.
    pub fn contains(&self, p: &DVec3) -> bool { self.sample_span().contains(p) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cylinder_band() {
        let band = ElementShape::CylinderBand {
            radius: 1.0,
            z0: 0.5,
            z1: 1.0,
        };
        assert_eq!(band.kind(), ElementKind::CylinderBand);
        assert_relative_eq!(band.area(), PI);
        assert!(!band.is_reversed());
        assert!(band.inward());
        assert_eq!(band.pose(), Pose::on_axis(0.5, false));
        assert_eq!(band.emitter_shape(), EmitterShape::band(1.0, 1.0, 0.5, true));
        assert_eq!(
            band.sample_span(),
            SampleSpan::Axial {
                low: 0.5,
                high: 1.0
            }
        );
    }

    #[test]
    fn test_reversed_frustum_band() {
        let band = ElementShape::FrustumBand {
            r0: 2.0,
            z0: 3.0,
            r1: 1.0,
            z1: 2.0,
        };
        assert!(band.is_reversed());
        assert!(!band.inward());
        assert!(band.pose().is_reversed());
        assert_relative_eq!(band.area(), PI * 3.0 * 2.0f64.sqrt());
        assert_eq!(
            band.sample_span(),
            SampleSpan::Axial {
                low: 2.0,
                high: 3.0
            }
        );
        match band.emitter_shape() {
            EmitterShape::LateralBand {
                r0,
                r1,
                depth,
                inward,
            } => {
                assert_eq!((r0, r1, depth, inward), (2.0, 1.0, 1.0, false));
            },
            other => panic!("unexpected emitter {:?}", other),
        }
    }

    #[test]
    fn test_terminal_disk() {
        let ring = ElementShape::TerminalDisk {
            r_inner: 0.5,
            r_outer: 1.0,
            z: 2.0,
        };
        assert_relative_eq!(ring.area(), PI * 0.75);
        assert!(ring.pose().is_reversed());
        assert!(ring.inward());
        let span = ring.sample_span();
        assert!(span.contains(&DVec3::new(0.0, 0.5, 2.0)));
        assert!(span.contains(&DVec3::new(0.7, 0.0, 2.0)));
        assert!(!span.contains(&DVec3::new(1.0, 0.0, 2.0)));
        assert!(!span.contains(&DVec3::new(0.2, 0.2, 2.0)));
    }

    #[test]
    fn test_element_emits_from_its_own_side() {
        let cone = Element {
            index: 4,
            object: 3,
            shape: ElementShape::ConeBand {
                r0: 1.5,
                z0: 1.5,
                r1: 0.75,
                z1: 1.25,
            },
        };
        assert!(!cone.inward());
        assert_eq!(
            cone.shape.emitter_shape(),
            EmitterShape::band(1.5, 0.75, 0.25, false)
        );
        assert!(cone.contains(&DVec3::new(0.0, 0.75, 1.25)));
        assert!(cone.contains(&DVec3::new(1.0, 0.0, 1.33)));
        assert!(!cone.contains(&DVec3::new(1.5, 0.0, 1.5)));
    }

    #[test]
    fn test_half_open_axial_span() {
        let span = SampleSpan::Axial {
            low: 1.0,
            high: 2.0,
        };
        assert!(span.contains(&DVec3::new(1.0, 0.0, 1.0)));
        assert!(!span.contains(&DVec3::new(1.0, 0.0, 2.0)));
        assert!(SampleSpan::Whole.contains(&DVec3::splat(1e9)));
    }
}
