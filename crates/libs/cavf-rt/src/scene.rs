//! Assembly of coaxial surfaces rays are traced against.

use crate::{Ray, Surface};
use serde::{Deserialize, Serialize};

/// Surface of the assembly together with its optical properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    /// Name of the object, used in logs.
    pub name: String,
    /// Geometry of the object.
    pub surface: Surface,
    /// Fraction of the incoming energy absorbed at each hit, in `[0, 1]`.
    pub absorptivity: f64,
}

impl SceneObject {
    /// Creates a black (fully absorbing) object.
    pub fn black(name: impl Into<String>, surface: Surface) -> Self {
        Self {
            name: name.into(),
            surface,
            absorptivity: 1.0,
        }
    }
}

/// Ordered list of objects; the index of an object is its identifier in the
/// trace results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    objects: Vec<SceneObject>,
    epsilon: f64,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            epsilon: 1e-9,
        }
    }

    /// Adds an object to the scene and returns its index.
    pub fn add_object(&mut self, object: SceneObject) -> usize {
        self.epsilon = self.epsilon.max(1e-9 * object.surface.extent());
        self.objects.push(object);
        self.objects.len() - 1
    }

    /// Returns the objects of the scene.
    pub fn objects(&self) -> &[SceneObject] { &self.objects }

    /// Returns the number of objects.
    pub fn len(&self) -> usize { self.objects.len() }

    /// Whether the scene contains no objects.
    pub fn is_empty(&self) -> bool { self.objects.is_empty() }

    /// Minimum ray parameter accepted as a hit; scaled with the size of the
    /// scene to avoid self-intersections at the ray origin.
    pub fn epsilon(&self) -> f64 { self.epsilon }

    /// Returns the index of the nearest object hit by the ray and the ray
    /// parameter of the hit.
    pub fn nearest_hit(&self, ray: &Ray) -> Option<(usize, f64)> {
        self.objects
            .iter()
            .enumerate()
            .filter_map(|(i, obj)| obj.surface.intersect(ray, self.epsilon).map(|t| (i, t)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}
