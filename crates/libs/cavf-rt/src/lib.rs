//! # cavf-rt
//!
//! Ray tracing collaborators of the view factor estimation: emitters producing
//! Lambertian ray bundles from rings of a surface of revolution, the coaxial
//! surfaces of a cavity assembly and a closed-form tracer returning the energy
//! absorbed by each object of the assembly.
#![warn(missing_docs)]

pub mod emitter;
mod ray;
pub mod scene;
pub mod surface;
pub mod tracing;

pub use emitter::{EmitterShape, LambertianSource, Pose, RayBundle, RaySource};
pub use ray::Ray;
pub use scene::{Scene, SceneObject};
pub use surface::{Facing, Surface};
pub use tracing::{AnalyticTracer, ObjectHits, TraceParams, TraceResult, Tracer};

/// Number of rays processed by one parallel task; each task owns its own
/// random stream so that the output does not depend on the thread count.
pub const CHUNK_SIZE: usize = 8192;
