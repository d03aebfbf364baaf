//! View frustum planes and containment tests.
//!
//! Test support: checks that an auto-framed model actually fits the view.

use glam::{Mat4, Vec3, Vec4};

use crate::scene::Aabb;

/// Plane `normal · p + distance = 0` with a unit normal pointing inside.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Plane {
    /// Unit normal pointing into the positive half-space.
    pub(crate) normal: Vec3,
    /// Signed offset from the origin.
    pub(crate) distance: f32,
}

impl Plane {
    /// Normalize raw `(a, b, c, d)` coefficients.
    fn from_row(row: Vec4) -> Self {
        let len = row.truncate().length();
        if len > 0.0 {
            Self {
                normal: row.truncate() / len,
                distance: row.w / len,
            }
        } else {
            Self {
                normal: Vec3::ZERO,
                distance: 0.0,
            }
        }
    }

    /// Signed distance (positive = inside).
    #[inline]
    #[must_use]
    pub(crate) fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}

/// Six inward-facing planes: left, right, bottom, top, near, far.
#[derive(Debug, Clone)]
pub(crate) struct Frustum {
    /// Clipping planes.
    pub(crate) planes: [Plane; 6],
}

impl Frustum {
    /// Extract planes from a view-projection matrix (Gribb/Hartmann) using
    /// wgpu's `[0, 1]` depth range.
    #[must_use]
    pub(crate) fn from_view_projection(vp: Mat4) -> Self {
        let t = vp.transpose();
        let (r0, r1, r2, r3) = (t.x_axis, t.y_axis, t.z_axis, t.w_axis);
        Self {
            planes: [
                Plane::from_row(r3 + r0),
                Plane::from_row(r3 - r0),
                Plane::from_row(r3 + r1),
                Plane::from_row(r3 - r1),
                Plane::from_row(r2),
                Plane::from_row(r3 - r2),
            ],
        }
    }

    /// Whether `point` is inside, allowing `tolerance` outside each plane.
    #[inline]
    #[must_use]
    pub(crate) fn contains_point(&self, point: Vec3, tolerance: f32) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(point) >= -tolerance)
    }

    /// Whether all eight corners of `bounds` are inside.
    #[must_use]
    pub(crate) fn contains_aabb(&self, bounds: &Aabb, tolerance: f32) -> bool {
        bounds
            .corners()
            .iter()
            .all(|&corner| self.contains_point(corner, tolerance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn looking_at_origin_from(z: f32) -> Frustum {
        let proj = Mat4::perspective_rh(45.0_f32.to_radians(), 1.0, 0.1, 100.0);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, z), Vec3::ZERO, Vec3::Y);
        Frustum::from_view_projection(proj * view)
    }

    #[test]
    fn contains_origin_but_not_points_behind() {
        let frustum = looking_at_origin_from(10.0);
        assert!(frustum.contains_point(Vec3::ZERO, 0.0));
        assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, 20.0), 0.0));
        assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, -200.0), 0.0));
    }

    #[test]
    fn box_containment() {
        let frustum = looking_at_origin_from(10.0);
        let small = Aabb::from_center_size(Vec3::ZERO, Vec3::splat(2.0));
        let wide = Aabb::from_center_size(Vec3::ZERO, Vec3::new(20.0, 1.0, 1.0));
        assert!(frustum.contains_aabb(&small, 0.0));
        assert!(!frustum.contains_aabb(&wide, 0.0));
    }
}
