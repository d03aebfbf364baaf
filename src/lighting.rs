//! Scene lighting: ambient fill, a fixed sun, and an area key light that
//! follows the camera.
//!
//! The key light is re-placed after every camera fit (and on resize while
//! no model is loaded) so it always sits behind and to the left of the
//! camera, at an offset proportional to the camera's distance.

use glam::Vec3;
use wgpu::util::DeviceExt;

use crate::camera::core::Camera;
use crate::options::{DebugOptions, LightingOptions};

/// Where the area key light sits and what it faces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaLightPlacement {
    /// World-space position.
    pub position: Vec3,
    /// Unit direction the emitting face points along (toward the origin).
    pub facing: Vec3,
}

/// Place the area light relative to `camera`.
///
/// The offset is `max(min_offset, distance_scale * |eye|)`; the light is
/// pushed back along the view axis by 35% of it, left by all of it, and up
/// by 15% of it, then turned to face the origin.
#[must_use]
pub fn place_area_light(
    camera: &Camera,
    distance_scale: f32,
    min_offset: f32,
) -> AreaLightPlacement {
    let forward = camera.forward();
    let up = Vec3::Y;
    let left = up.cross(forward).normalize_or_zero();
    let behind = -forward;

    let offset = min_offset.max(camera.distance_from_origin() * distance_scale);
    let position = camera.eye
        + behind * (offset * 0.35)
        + left * offset
        + up * (offset * 0.15);
    let facing = (-position).normalize_or(forward);
    AreaLightPlacement { position, facing }
}

/// Lighting uniform shared with `model.wgsl`.
/// NOTE: Must match the WGSL struct layout exactly (64 bytes)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    /// Unit direction from the surface toward the sun.
    pub sun_dir: [f32; 3],
    /// Sun intensity.
    pub sun_intensity: f32,
    /// Area light position.
    pub area_position: [f32; 3],
    /// Area light intensity.
    pub area_intensity: f32,
    /// Area light emitting direction.
    pub area_facing: [f32; 3],
    /// Area light side length.
    pub area_size: f32,
    /// Ambient intensity.
    pub ambient: f32,
    /// Non-zero shades with surface normals instead of lighting.
    pub show_normals: u32,
    _pad: [f32; 2],
}

impl LightingUniform {
    /// Uniform for the given options with the area light not yet placed.
    #[must_use]
    pub fn from_options(lighting: &LightingOptions, debug: &DebugOptions) -> Self {
        let sun_dir = Vec3::from(lighting.sun_position).normalize_or(Vec3::Y);
        Self {
            sun_dir: sun_dir.to_array(),
            sun_intensity: lighting.sun_intensity,
            area_position: [0.0; 3],
            area_intensity: lighting.area_intensity,
            area_facing: [0.0, 0.0, -1.0],
            area_size: lighting.area_size,
            ambient: lighting.ambient,
            show_normals: u32::from(debug.show_normals),
            _pad: [0.0; 2],
        }
    }

    /// Move the area light.
    pub fn set_area_light(&mut self, placement: &AreaLightPlacement) {
        self.area_position = placement.position.to_array();
        self.area_facing = placement.facing.to_array();
    }
}

/// GPU lighting state: uniform buffer and bind group.
pub struct Lighting {
    /// CPU copy of the uniform; call [`update_gpu`](Self::update_gpu)
    /// after changing it.
    pub uniform: LightingUniform,
    buffer: wgpu::Buffer,
    /// Bind group layout for group 1 of the model pipeline.
    pub layout: wgpu::BindGroupLayout,
    /// Bind group for group 1 of the model pipeline.
    pub bind_group: wgpu::BindGroup,
}

impl Lighting {
    /// Allocate the lighting uniform.
    pub fn new(device: &wgpu::Device, uniform: LightingUniform) -> Self {
        let buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Lighting Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });

        let layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Lighting Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("Lighting Bind Group"),
        });

        Self {
            uniform,
            buffer,
            layout,
            bind_group,
        }
    }

    /// Upload the CPU uniform.
    pub fn update_gpu(&self, queue: &wgpu::Queue) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn framed_camera(distance: f32) -> Camera {
        let mut camera = Camera::new(45.0, 1.0);
        camera.eye = Vec3::new(0.0, 0.0, distance);
        camera.target = Vec3::ZERO;
        camera
    }

    #[test]
    fn offset_scales_with_camera_distance() {
        let placement = place_area_light(&framed_camera(8.0), 0.25, 0.5);
        // offset = 2.0: behind 0.7, left 2.0, up 0.3
        assert!(placement
            .position
            .abs_diff_eq(Vec3::new(-2.0, 0.3, 8.7), 1e-5));
    }

    #[test]
    fn offset_has_a_floor() {
        let placement = place_area_light(&framed_camera(1.0), 0.25, 0.5);
        assert!(placement
            .position
            .abs_diff_eq(Vec3::new(-0.5, 0.075, 1.175), 1e-5));
    }

    #[test]
    fn faces_the_origin() {
        let placement = place_area_light(&framed_camera(4.0), 0.25, 0.5);
        let to_origin = (-placement.position).normalize();
        assert!(placement.facing.abs_diff_eq(to_origin, 1e-6));
    }

    #[test]
    fn unframed_camera_uses_minimum_offset() {
        // Camera at the origin looking down -Z, before any model loads.
        let placement = place_area_light(&Camera::new(45.0, 1.0), 0.25, 0.5);
        assert!(placement
            .position
            .abs_diff_eq(Vec3::new(-0.5, 0.075, 0.175), 1e-5));
    }

    #[test]
    fn uniform_is_sixty_four_bytes() {
        assert_eq!(size_of::<LightingUniform>(), 64);
    }
}
