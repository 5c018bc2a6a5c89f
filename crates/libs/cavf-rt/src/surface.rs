//! Coaxial surfaces of revolution around the z axis.

use crate::Ray;
use base::math::{solve_quadratic, sqr, DVec3};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Side of a plate facing the interior of the cavity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    /// The interior lies towards +z.
    Forward,
    /// The interior lies towards -z.
    Backward,
}

impl Facing {
    /// Returns the unit normal pointing to the interior.
    pub fn normal(&self) -> DVec3 {
        match self {
            Facing::Forward => DVec3::Z,
            Facing::Backward => DVec3::NEG_Z,
        }
    }
}

/// Surface of revolution around the z axis.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Surface {
    /// Disk perpendicular to the axis.
    Plate {
        /// Radius of the disk.
        radius: f64,
        /// Axial position of the disk.
        z: f64,
        /// Side of the disk facing the interior.
        facing: Facing,
    },
    /// Lateral surface between two points of the revolve profile, given in the
    /// order the profile is walked. Cylinders (`r0 == r1`) and cones (one of
    /// the radii is zero) are special cases.
    ///
    /// The interior of the cavity lies on the left of the profile segment
    /// `(r0, z0) -> (r1, z1)` in the (r, z) half-plane.
    Frustum {
        /// Radius at the start of the segment.
        r0: f64,
        /// Axial position at the start of the segment.
        z0: f64,
        /// Radius at the end of the segment.
        r1: f64,
        /// Axial position at the end of the segment.
        z1: f64,
    },
}

impl Surface {
    /// Creates a lateral surface between two profile points.
    ///
    /// The two points must be at different axial positions.
    pub fn frustum(r0: f64, z0: f64, r1: f64, z1: f64) -> Self {
        debug_assert!(z0 != z1, "a lateral surface needs a non-zero depth");
        Self::Frustum { r0, z0, r1, z1 }
    }

    /// Creates a disk perpendicular to the axis.
    pub fn plate(radius: f64, z: f64, facing: Facing) -> Self { Self::Plate { radius, z, facing } }

    /// Returns the area of the surface.
    pub fn area(&self) -> f64 {
        match *self {
            Surface::Plate { radius, .. } => PI * sqr(radius),
            Surface::Frustum { r0, z0, r1, z1 } => {
                PI * (r0 + r1) * (sqr(z1 - z0) + sqr(r1 - r0)).sqrt()
            },
        }
    }

    /// Returns the largest distance from the origin to a point of the surface
    /// along one axis. Used to scale the self-intersection tolerance.
    pub fn extent(&self) -> f64 {
        match *self {
            Surface::Plate { radius, z, .. } => radius.max(z.abs()),
            Surface::Frustum { r0, z0, r1, z1 } => r0.max(r1).max(z0.abs()).max(z1.abs()),
        }
    }

    /// Returns the ray parameter of the nearest intersection beyond `t_min`.
    pub fn intersect(&self, ray: &Ray, t_min: f64) -> Option<f64> {
        match *self {
            Surface::Plate { radius, z, .. } => {
                if ray.dir.z == 0.0 {
                    return None;
                }
                let t = (z - ray.org.z) / ray.dir.z;
                if t <= t_min {
                    return None;
                }
                let p = ray.at(t);
                (sqr(p.x) + sqr(p.y) <= sqr(radius)).then_some(t)
            },
            Surface::Frustum { r0, z0, r1, z1 } => {
                // Points of the surface satisfy x^2 + y^2 = (r0 + k (z - z0))^2.
                let k = (r1 - r0) / (z1 - z0);
                let (o, d) = (ray.org, ray.dir);
                let q = r0 + k * (o.z - z0);
                let a = sqr(d.x) + sqr(d.y) - sqr(k * d.z);
                let b = 2.0 * (o.x * d.x + o.y * d.y - k * q * d.z);
                let c = sqr(o.x) + sqr(o.y) - sqr(q);
                let (z_lo, z_hi) = (z0.min(z1), z0.max(z1));
                solve_quadratic(a, b, c)
                    .roots()
                    .filter(|t| *t > t_min)
                    .find(|t| {
                        let z = o.z + t * d.z;
                        (z_lo..=z_hi).contains(&z)
                    })
            },
        }
    }

    /// Returns the unit normal at the point `p` of the surface pointing to the
    /// interior of the cavity.
    pub fn interior_normal(&self, p: DVec3) -> DVec3 {
        match *self {
            Surface::Plate { facing, .. } => facing.normal(),
            Surface::Frustum { r0, z0, r1, z1 } => {
                let rho = (sqr(p.x) + sqr(p.y)).sqrt();
                let (ux, uy) = if rho > 0.0 {
                    (p.x / rho, p.y / rho)
                } else {
                    (1.0, 0.0)
                };
                let (dr, dz) = (r1 - r0, z1 - z0);
                DVec3::new(-dz * ux, -dz * uy, dr).normalize()
            },
        }
    }
}
