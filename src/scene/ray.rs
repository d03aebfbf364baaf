use glam::{Mat4, Vec2, Vec3};

/// Half-line used for pointer hit-testing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Direction. Not necessarily unit length once transformed.
    pub direction: Vec3,
}

impl Ray {
    /// Ray from `origin` along `direction` (normalized).
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Ray from the near plane through normalized device coordinates.
    ///
    /// `inverse_view_proj` must use wgpu's `[0, 1]` depth range.
    #[must_use]
    pub fn from_ndc(inverse_view_proj: Mat4, ndc: Vec2) -> Self {
        let near = inverse_view_proj.project_point3(ndc.extend(0.0));
        let far = inverse_view_proj.project_point3(ndc.extend(1.0));
        Self::new(near, far - near)
    }

    /// The same ray expressed through `transform`. Direction is not
    /// renormalized, so parameters stay comparable across spaces.
    #[must_use]
    pub fn transformed(&self, transform: Mat4) -> Self {
        Self {
            origin: transform.transform_point3(self.origin),
            direction: transform.transform_vector3(self.direction),
        }
    }

    /// Möller–Trumbore intersection against a two-sided triangle.
    /// Returns the ray parameter of the hit.
    #[must_use]
    pub fn intersect_triangle(&self, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
        const EPS: f32 = 1e-9;
        let edge1 = b - a;
        let edge2 = c - a;
        let p = self.direction.cross(edge2);
        let det = edge1.dot(p);
        if det.abs() < EPS {
            return None;
        }
        let inv_det = det.recip();
        let s = self.origin - a;
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let q = s.cross(edge1);
        let v = self.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = edge2.dot(q) * inv_det;
        (t >= 0.0).then_some(t)
    }
}
