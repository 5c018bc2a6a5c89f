//! Lambertian ray sources.
//!
//! Every emitter is described in its own local frame: the axis of symmetry is
//! the local z axis and the emitting ring starts at the local origin. The
//! [`Pose`] places the local frame in the cavity.

use crate::{Ray, CHUNK_SIZE};
use base::math::{orthonormal_basis, sqr, DQuat, DVec3};
use rand::{
    distributions::{Distribution, Uniform},
    Rng, SeedableRng,
};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Shape of the emitting region in the local frame of the emitter.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum EmitterShape {
    /// A disk, or an annulus when `inner_radius > 0`, in the local xy-plane
    /// emitting towards the local +z.
    Disk {
        /// Outer radius of the emitting region.
        radius: f64,
        /// Inner radius of the emitting region.
        inner_radius: f64,
        /// Maximum polar angle of the emitted directions; `FRAC_PI_2` for a
        /// full Lambertian emitter.
        max_angle: f64,
    },
    /// Lateral band of a surface of revolution going from radius `r0` at the
    /// local origin to radius `r1` at local `z = depth`.
    LateralBand {
        /// Radius at the start of the band.
        r0: f64,
        /// Radius at the end of the band.
        r1: f64,
        /// Axial length of the band, positive.
        depth: f64,
        /// Whether the rays leave the band towards the symmetry axis. The
        /// band's left normal in the (r, z) half-plane points to the axis;
        /// when `false` the opposite side emits.
        inward: bool,
    },
}

impl EmitterShape {
    /// Creates a full Lambertian disk emitter.
    pub fn disk(radius: f64) -> Self {
        Self::Disk {
            radius,
            inner_radius: 0.0,
            max_angle: FRAC_PI_2,
        }
    }

    /// Creates a full Lambertian annulus emitter.
    pub fn annulus(inner_radius: f64, radius: f64) -> Self {
        Self::Disk {
            radius,
            inner_radius,
            max_angle: FRAC_PI_2,
        }
    }

    /// Creates a lateral band emitter.
    pub fn band(r0: f64, r1: f64, depth: f64, inward: bool) -> Self {
        debug_assert!(depth > 0.0, "band depth must be positive in the local frame");
        Self::LateralBand {
            r0,
            r1,
            depth,
            inward,
        }
    }

    /// Samples a point uniformly (with respect to area) on the emitting
    /// region, returns the point and the unit emitting normal, both in the
    /// local frame.
    fn sample_point<R: Rng>(&self, rng: &mut R, unit: &Uniform<f64>) -> (DVec3, DVec3) {
        match *self {
            EmitterShape::Disk {
                radius,
                inner_radius,
                ..
            } => {
                let r = (sqr(inner_radius) + unit.sample(rng) * (sqr(radius) - sqr(inner_radius)))
                    .sqrt();
                let phi = unit.sample(rng) * TAU;
                (DVec3::new(r * phi.cos(), r * phi.sin(), 0.0), DVec3::Z)
            },
            EmitterShape::LateralBand {
                r0,
                r1,
                depth,
                inward,
            } => {
                let u = unit.sample(rng);
                // The area element grows linearly with the radius, so the
                // radius is drawn by inverting the area fraction. The depth
                // uses r - r0 = u (r1^2 - r0^2) / (r + r0) to stay exact when
                // the radii are close.
                let (r, z) = if r0 == r1 {
                    (r0, u * depth)
                } else {
                    let r = (sqr(r0) + u * (sqr(r1) - sqr(r0))).sqrt();
                    let z = if r + r0 > 0.0 {
                        (depth * u * (r0 + r1) / (r + r0)).min(depth)
                    } else {
                        0.0
                    };
                    (r, z)
                };
                let phi = unit.sample(rng) * TAU;
                let (cos_phi, sin_phi) = (phi.cos(), phi.sin());
                let slant = (sqr(depth) + sqr(r1 - r0)).sqrt();
                let left = DVec3::new(-depth * cos_phi, -depth * sin_phi, r1 - r0) / slant;
                let normal = if inward { left } else { -left };
                (DVec3::new(r * cos_phi, r * sin_phi, z), normal)
            },
        }
    }

    /// Maximum polar angle of the emitted directions around the normal.
    fn max_angle(&self) -> f64 {
        match *self {
            EmitterShape::Disk { max_angle, .. } => max_angle,
            EmitterShape::LateralBand { .. } => FRAC_PI_2,
        }
    }
}

/// Position and orientation of an emitter's local frame in the cavity.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Position of the local origin.
    pub position: DVec3,
    /// Rotation from the local frame to the cavity frame.
    pub orientation: DQuat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            orientation: DQuat::IDENTITY,
        }
    }
}

impl Pose {
    /// Creates a pose on the symmetry axis at `z`. A reversed pose is rotated
    /// by 180° about the x axis, so that the local +z points to the cavity's
    /// -z.
    pub fn on_axis(z: f64, reversed: bool) -> Self {
        Self {
            position: DVec3::new(0.0, 0.0, z),
            orientation: if reversed {
                DQuat::from_rotation_x(PI)
            } else {
                DQuat::IDENTITY
            },
        }
    }

    /// Whether the local +z points to the cavity's -z.
    pub fn is_reversed(&self) -> bool { (self.orientation * DVec3::Z).z < 0.0 }

    /// Transforms a point from the local frame to the cavity frame.
    pub fn transform_point(&self, p: DVec3) -> DVec3 { self.position + self.orientation * p }

    /// Transforms a direction from the local frame to the cavity frame.
    pub fn transform_vector(&self, v: DVec3) -> DVec3 { self.orientation * v }
}

/// Rays produced by an emitter, all carrying the same energy.
#[derive(Debug, Clone)]
pub struct RayBundle {
    /// Emitted rays.
    pub rays: Box<[Ray]>,
    /// Energy carried by each ray.
    pub energy_per_ray: f64,
}

impl RayBundle {
    /// Returns the number of rays in the bundle.
    pub fn len(&self) -> usize { self.rays.len() }

    /// Whether the bundle contains no rays.
    pub fn is_empty(&self) -> bool { self.rays.is_empty() }

    /// Returns the energy carried by the whole bundle.
    pub fn total_energy(&self) -> f64 { self.energy_per_ray * self.rays.len() as f64 }
}

/// Produces ray bundles for an emitter in a given pose.
pub trait RaySource {
    /// Emits `num_rays` rays from `shape` placed at `pose`. The bundle carries
    /// a total energy of one.
    fn emit(&self, shape: &EmitterShape, pose: &Pose, num_rays: u32, seed: u64) -> RayBundle;
}

/// Diffuse source: uniform over the emitting area, cosine-weighted in
/// direction.
#[derive(Debug, Copy, Clone, Default)]
pub struct LambertianSource;

impl RaySource for LambertianSource {
    fn emit(&self, shape: &EmitterShape, pose: &Pose, num_rays: u32, seed: u64) -> RayBundle {
        log::trace!(
            "[Emitter] emitting {} rays from {:?} at {:?}",
            num_rays,
            shape,
            pose.position
        );
        let unit = Uniform::new(0.0, 1.0);
        let sin2_max = sqr(shape.max_angle().sin());
        let mut rays = vec![Ray::default(); num_rays as usize].into_boxed_slice();
        rays.par_chunks_mut(CHUNK_SIZE)
            .enumerate()
            .for_each(|(i, chunk)| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                rng.set_stream(i as u64);
                chunk.iter_mut().for_each(|ray| {
                    let (p, n) = shape.sample_point(&mut rng, &unit);
                    let d = cosine_weighted_direction(n, sin2_max, &mut rng, &unit);
                    *ray = Ray::new(pose.transform_point(p), pose.transform_vector(d));
                });
            });

        RayBundle {
            rays,
            energy_per_ray: if num_rays == 0 {
                0.0
            } else {
                1.0 / num_rays as f64
            },
        }
    }
}

/// Samples a direction around the unit normal `n` with a density proportional
/// to the cosine of the polar angle, restricted to polar angles whose squared
/// sine does not exceed `sin2_max`.
///
/// Malley's method: a uniform point on the (scaled) unit disk is projected up
/// onto the hemisphere.
pub fn cosine_weighted_direction<R: Rng>(
    n: DVec3,
    sin2_max: f64,
    rng: &mut R,
    unit: &Uniform<f64>,
) -> DVec3 {
    let sin2 = unit.sample(rng) * sin2_max;
    let sin_theta = sin2.sqrt();
    let cos_theta = (1.0 - sin2).max(0.0).sqrt();
    let phi = unit.sample(rng) * TAU;
    let (t, b) = orthonormal_basis(n);
    t * (sin_theta * phi.cos()) + b * (sin_theta * phi.sin()) + n * cos_theta
}
