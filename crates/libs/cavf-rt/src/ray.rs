use base::math::DVec3;

/// A ray with an origin and a unit direction.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Ray {
    /// Origin of the ray.
    pub org: DVec3,
    /// Direction of the ray, normalised.
    pub dir: DVec3,
}

impl Ray {
    /// Creates a new ray, the direction is normalised.
    pub fn new(org: DVec3, dir: DVec3) -> Self {
        Self {
            org,
            dir: dir.normalize(),
        }
    }

    /// Returns the point on the ray at the parameter `t`.
    pub fn at(&self, t: f64) -> DVec3 { self.org + t * self.dir }
}
