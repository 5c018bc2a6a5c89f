//! Tracing of ray bundles through a scene of coaxial surfaces.

use crate::{emitter::cosine_weighted_direction, Ray, RayBundle, Scene, CHUNK_SIZE};
use base::math::DVec3;
use rand::{distributions::Uniform, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Parameters of a trace.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TraceParams {
    /// Maximum number of surface interactions of one ray.
    pub max_bounces: u32,
    /// Rays carrying less energy than this are no longer followed.
    pub min_energy: f64,
    /// Seed of the random streams used for diffuse reflections.
    pub seed: u64,
}

impl Default for TraceParams {
    fn default() -> Self {
        Self {
            max_bounces: 1,
            min_energy: 1e-15,
            seed: 0,
        }
    }
}

/// Energy absorbed by one object together with the hit positions.
///
/// `absorbed[k]` is the energy deposited at `positions[k]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectHits {
    /// Absorbed energy of each hit.
    pub absorbed: Vec<f64>,
    /// Position of each hit.
    pub positions: Vec<DVec3>,
}

impl ObjectHits {
    /// Records a hit.
    pub fn push(&mut self, position: DVec3, energy: f64) {
        self.positions.push(position);
        self.absorbed.push(energy);
    }

    /// Returns the number of hits.
    pub fn len(&self) -> usize { self.absorbed.len() }

    /// Whether the object was not hit.
    pub fn is_empty(&self) -> bool { self.absorbed.is_empty() }

    /// Returns the total energy absorbed by the object.
    pub fn total(&self) -> f64 { self.absorbed.iter().sum() }

    /// Iterates over the hits as `(position, energy)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&DVec3, &f64)> {
        self.positions.iter().zip(self.absorbed.iter())
    }

    fn append(&mut self, other: &mut ObjectHits) {
        self.absorbed.append(&mut other.absorbed);
        self.positions.append(&mut other.positions);
    }
}

/// Outcome of tracing one bundle. Owned by the caller; every bundle starts
/// from an empty result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraceResult {
    /// Hits on every object of the scene, indexed like the scene objects.
    pub hits: Vec<ObjectHits>,
    /// Energy of the rays leaving the scene without hitting anything.
    pub escaped: f64,
    /// Energy still carried by rays when they were no longer followed.
    pub truncated: f64,
}

impl TraceResult {
    fn empty(num_objects: usize) -> Self {
        Self {
            hits: vec![ObjectHits::default(); num_objects],
            escaped: 0.0,
            truncated: 0.0,
        }
    }

    /// Returns the energy absorbed by the whole scene.
    pub fn total_absorbed(&self) -> f64 { self.hits.iter().map(ObjectHits::total).sum() }

    fn merge(&mut self, mut other: TraceResult) {
        for (mine, theirs) in self.hits.iter_mut().zip(other.hits.iter_mut()) {
            mine.append(theirs);
        }
        self.escaped += other.escaped;
        self.truncated += other.truncated;
    }
}

/// Fires ray bundles into a scene.
pub trait Tracer {
    /// Traces every ray of the bundle and reports where its energy went.
    fn trace(&self, scene: &Scene, bundle: &RayBundle, params: &TraceParams) -> TraceResult;
}

/// Closed-form tracer for coaxial plates and frusta. Objects reflect the
/// energy they do not absorb diffusely.
#[derive(Debug, Copy, Clone, Default)]
pub struct AnalyticTracer;

impl Tracer for AnalyticTracer {
    fn trace(&self, scene: &Scene, bundle: &RayBundle, params: &TraceParams) -> TraceResult {
        log::trace!(
            "[Tracer] tracing {} rays against {} objects",
            bundle.len(),
            scene.len()
        );
        let partials = bundle
            .rays
            .par_chunks(CHUNK_SIZE)
            .enumerate()
            .map(|(i, chunk)| {
                let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
                rng.set_stream(i as u64);
                let unit = Uniform::new(0.0, 1.0);
                let mut result = TraceResult::empty(scene.len());
                for ray in chunk {
                    trace_one(
                        scene,
                        *ray,
                        bundle.energy_per_ray,
                        params,
                        &mut rng,
                        &unit,
                        &mut result,
                    );
                }
                result
            })
            .collect::<Vec<_>>();

        // Merged in chunk order, independent of the scheduling.
        partials
            .into_iter()
            .fold(TraceResult::empty(scene.len()), |mut acc, partial| {
                acc.merge(partial);
                acc
            })
    }
}

fn trace_one(
    scene: &Scene,
    mut ray: Ray,
    mut energy: f64,
    params: &TraceParams,
    rng: &mut ChaCha8Rng,
    unit: &Uniform<f64>,
    result: &mut TraceResult,
) {
    let mut bounces = 0;
    loop {
        let Some((obj, t)) = scene.nearest_hit(&ray) else {
            result.escaped += energy;
            return;
        };
        bounces += 1;
        let object = &scene.objects()[obj];
        let p = ray.at(t);
        let absorbed = energy * object.absorptivity;
        result.hits[obj].push(p, absorbed);
        energy -= absorbed;
        if energy <= 0.0 {
            return;
        }
        if bounces >= params.max_bounces || energy <= params.min_energy {
            result.truncated += energy;
            return;
        }
        let n = object.surface.interior_normal(p);
        ray = Ray::new(p, cosine_weighted_direction(n, 1.0, rng, unit));
    }
}
