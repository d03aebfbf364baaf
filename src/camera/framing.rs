//! Auto-framing: recenter the model and back the camera off until its
//! bounding box fills the view.

use glam::Vec3;

use super::core::Camera;
use crate::options::CameraOptions;
use crate::scene::{Aabb, Model};

/// Constants controlling how tightly a model is framed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramingParams {
    /// Multiplier on the fit distance.
    pub padding: f32,
    /// Near plane as a fraction of the camera distance.
    pub near_ratio: f32,
    /// Smallest near plane.
    pub min_near: f32,
    /// Far plane as a multiple of the camera distance.
    pub far_ratio: f32,
}

impl Default for FramingParams {
    fn default() -> Self {
        Self::from(&CameraOptions::default())
    }
}

impl From<&CameraOptions> for FramingParams {
    fn from(opts: &CameraOptions) -> Self {
        Self {
            padding: opts.padding,
            near_ratio: opts.near_ratio,
            min_near: opts.min_near,
            far_ratio: opts.far_ratio,
        }
    }
}

/// Camera placement produced by a fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportFrame {
    /// Eye distance from the origin along +Z.
    pub distance: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Vertical field of view in radians.
    pub fovy: f32,
    /// Aspect ratio the fit was computed for.
    pub aspect: f32,
}

impl ViewportFrame {
    /// Eye position: straight down +Z from the origin.
    #[must_use]
    pub fn eye(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.distance)
    }

    /// Move `camera` to this frame, looking at the origin.
    pub fn apply(&self, camera: &mut Camera) {
        camera.eye = self.eye();
        camera.target = Vec3::ZERO;
        camera.up = Vec3::Y;
        camera.znear = self.near;
        camera.zfar = self.far;
    }
}

/// Distance, near and far planes that fit an origin-centered `bounds` in a
/// frustum of vertical FOV `fovy` (radians) and `aspect`.
///
/// The distance fits both the height and the width, is padded, and then
/// pushed back by half the depth so the front face stays in view.
#[must_use]
pub fn fit_bounds(
    bounds: &Aabb,
    fovy: f32,
    aspect: f32,
    params: &FramingParams,
) -> ViewportFrame {
    let size = bounds.size();
    let half_tan = (fovy * 0.5).tan();
    let aspect = aspect.max(f32::EPSILON);

    let dist_for_height = (size.y * 0.5) / half_tan;
    let dist_for_width = (size.x * 0.5) / (half_tan * aspect);
    let dist = dist_for_height.max(dist_for_width);

    let distance = dist * params.padding + size.z * 0.5;
    let near = (distance * params.near_ratio).max(params.min_near);
    // Degenerate (zero-size) models still get a non-empty depth range.
    let far = (distance * params.far_ratio).max(near * params.far_ratio);

    ViewportFrame {
        distance,
        near,
        far,
        fovy,
        aspect,
    }
}

/// Recenter `model` at the origin and fit `camera` to it.
///
/// The bounds are recomputed after recentering; the first measurement is
/// stale once the model has moved.
pub fn frame_model(
    model: &mut Model,
    camera: &mut Camera,
    params: &FramingParams,
) -> ViewportFrame {
    let bounds = model.recenter();
    let frame = fit_bounds(&bounds, camera.fovy.to_radians(), camera.aspect, params);
    frame.apply(camera);
    log::debug!(
        "framed model {:?}: distance {:.3}, near {:.5}, far {:.1}",
        bounds.size(),
        frame.distance,
        frame.near,
        frame.far
    );
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::frustum::Frustum;
    use crate::motion::Orientation;
    use crate::scene::Mesh;

    const FOV_45: f32 = std::f32::consts::FRAC_PI_4;

    #[test]
    fn two_unit_cube_at_45_degrees() {
        let cube = Aabb::from_center_size(Vec3::ZERO, Vec3::splat(2.0));
        let frame = fit_bounds(&cube, FOV_45, 1.0, &FramingParams::default());

        let before_depth = 1.0 * 1.08 / (FOV_45 / 2.0).tan();
        assert!((frame.distance - (before_depth + 1.0)).abs() < 1e-5);
        let near = (frame.distance / 1000.0).max(0.001);
        assert!((frame.near - near).abs() < 1e-7);
        assert!((frame.far - frame.distance * 1000.0).abs() < 1e-3);
    }

    #[test]
    fn wide_viewport_is_height_limited_and_narrow_is_width_limited() {
        let cube = Aabb::from_center_size(Vec3::ZERO, Vec3::splat(2.0));
        let params = FramingParams::default();
        let square = fit_bounds(&cube, FOV_45, 1.0, &params);
        let wide = fit_bounds(&cube, FOV_45, 2.0, &params);
        let narrow = fit_bounds(&cube, FOV_45, 0.5, &params);
        assert_eq!(wide.distance, square.distance);
        assert!(narrow.distance > square.distance);
    }

    #[test]
    fn tiny_models_clamp_the_near_plane() {
        let speck = Aabb::from_center_size(Vec3::ZERO, Vec3::splat(0.01));
        let frame = fit_bounds(&speck, FOV_45, 1.0, &FramingParams::default());
        assert_eq!(frame.near, 0.001);
        assert!(frame.far > frame.near);
    }

    #[test]
    fn framed_cube_is_centered_and_inside_the_frustum() {
        for (center, edge, aspect) in [
            (Vec3::new(10.0, -4.0, 3.0), 2.0, 1.0),
            (Vec3::new(-0.3, 0.2, -7.0), 0.5, 16.0 / 9.0),
            (Vec3::new(100.0, 50.0, 25.0), 40.0, 0.6),
        ] {
            let mesh = Mesh::cuboid(center, Vec3::splat(edge));
            let mut model = Model::new(mesh).unwrap();
            model.orientation = Orientation::new(0.17, 0.0, 0.0);
            let mut camera = Camera::new(45.0, aspect);

            let frame = frame_model(&mut model, &mut camera, &FramingParams::default());
            let bounds = model.world_bounds();
            assert!(
                bounds.center().abs_diff_eq(Vec3::ZERO, 1e-4 * edge.max(1.0)),
                "not centered: {:?}",
                bounds.center()
            );

            let half = bounds.size() * 0.5;
            let half_tan = (FOV_45 / 2.0).tan();
            assert!(frame.distance * half_tan >= half.y);
            assert!(frame.distance * half_tan * aspect >= half.x);

            let frustum = Frustum::from_view_projection(camera.build_matrix());
            assert!(frustum.contains_aabb(&bounds, 1e-4 * edge));
        }
    }
}
