//! Single-mesh lit render pass.

use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use super::pipeline_util;
use crate::gpu::render_context::RenderContext;
use crate::scene::Mesh;

/// Interleaved position, normal and base color vertex.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Model-space position.
    pub position: [f32; 3],
    /// Model-space unit normal.
    pub normal: [f32; 3],
    /// Linear base color.
    pub color: [f32; 3],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x3
    ];

    /// Vertex buffer layout for the model pipeline.
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Interleave a mesh for upload. Missing normals fall back to +Y and
/// missing colors to [`DEFAULT_ALBEDO`](crate::scene::DEFAULT_ALBEDO).
#[must_use]
pub fn interleave(mesh: &Mesh) -> Vec<Vertex> {
    mesh.positions
        .iter()
        .enumerate()
        .map(|(i, p)| Vertex {
            position: p.to_array(),
            normal: mesh
                .normals
                .get(i)
                .map_or([0.0, 1.0, 0.0], Vec3::to_array),
            color: mesh.color(i).to_array(),
        })
        .collect()
}

/// Model and normal matrices.
/// NOTE: Must match the WGSL `ModelTransform` layout (128 bytes)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniform {
    /// Model-to-world transform.
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of `model` for normals.
    pub normal: [[f32; 4]; 4],
}

impl ModelUniform {
    /// Uniform for `model`.
    #[must_use]
    pub fn new(model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            normal: model.inverse().transpose().to_cols_array_2d(),
        }
    }
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// Depth-tested pipeline drawing the loaded model, plus the depth buffer.
pub struct ModelRenderer {
    pipeline: wgpu::RenderPipeline,
    mesh: Option<GpuMesh>,
    transform_buffer: wgpu::Buffer,
    transform_bind_group: wgpu::BindGroup,
    format: wgpu::TextureFormat,
    msaa_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
    clear_color: wgpu::Color,
}

impl ModelRenderer {
    /// Build the pipeline. `camera_layout` and `lighting_layout` are groups
    /// 0 and 1; the model transform is group 2.
    pub fn new(
        context: &RenderContext,
        camera_layout: &wgpu::BindGroupLayout,
        lighting_layout: &wgpu::BindGroupLayout,
        background: [f32; 3],
    ) -> Self {
        let device = &context.device;
        let shader = device.create_shader_module(wgpu::include_wgsl!(
            "shaders/model.wgsl"
        ));

        let transform_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Model Transform Buffer"),
                contents: bytemuck::cast_slice(&[ModelUniform::new(
                    Mat4::IDENTITY,
                )]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let transform_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Model Transform Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });
        let transform_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Model Transform Bind Group"),
                layout: &transform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: transform_buffer.as_entire_binding(),
                }],
            });

        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Model Pipeline Layout"),
                bind_group_layouts: &[
                    camera_layout,
                    lighting_layout,
                    &transform_layout,
                ],
                push_constant_ranges: &[],
            });

        let pipeline =
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Model Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[Vertex::layout()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &pipeline_util::opaque_target(context.format()),
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    // glTF assets are not reliably wound; draw both sides.
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(pipeline_util::depth_stencil_state()),
                multisample: pipeline_util::multisample_state(),
                multiview: None,
                cache: None,
            });

        let (width, height) = context.size();
        let format = context.format();
        let [r, g, b] = background;
        Self {
            pipeline,
            mesh: None,
            transform_buffer,
            transform_bind_group,
            format,
            msaa_view: pipeline_util::create_msaa_view(
                device, format, width, height,
            ),
            depth_view: pipeline_util::create_depth_view(device, width, height),
            clear_color: wgpu::Color {
                r: f64::from(r),
                g: f64::from(g),
                b: f64::from(b),
                a: 1.0,
            },
        }
    }

    /// Upload `mesh`, replacing any previous one.
    #[allow(clippy::cast_possible_truncation)]
    pub fn upload_mesh(&mut self, device: &wgpu::Device, mesh: &Mesh) {
        let vertices = interleave(mesh);
        let vertex_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Model Vertices"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Model Indices"),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        self.mesh = Some(GpuMesh {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        });
    }

    /// Whether a mesh is uploaded.
    #[must_use]
    pub const fn has_mesh(&self) -> bool {
        self.mesh.is_some()
    }

    /// Write the model transform.
    pub fn update_transform(&self, queue: &wgpu::Queue, model: Mat4) {
        queue.write_buffer(
            &self.transform_buffer,
            0,
            bytemuck::cast_slice(&[ModelUniform::new(model)]),
        );
    }

    /// Recreate the multisampled attachments for a new backbuffer size.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.msaa_view =
            pipeline_util::create_msaa_view(device, self.format, width, height);
        self.depth_view = pipeline_util::create_depth_view(device, width, height);
    }

    /// Clear to the background and draw the model, if any, resolving the
    /// multisampled result into `target`.
    pub fn draw(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        camera: &wgpu::BindGroup,
        lighting: &wgpu::BindGroup,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Model Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.msaa_view,
                resolve_target: Some(target),
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Discard,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(
                wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                },
            ),
            ..Default::default()
        });

        let Some(mesh) = &self.mesh else {
            return;
        };
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, camera, &[]);
        pass.set_bind_group(1, lighting, &[]);
        pass.set_bind_group(2, &self.transform_bind_group, &[]);
        pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        pass.set_index_buffer(
            mesh.index_buffer.slice(..),
            wgpu::IndexFormat::Uint32,
        );
        pass.draw_indexed(0..mesh.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::DEFAULT_ALBEDO;

    #[test]
    fn interleave_pairs_positions_with_normals() {
        let mesh = Mesh::cuboid(Vec3::ZERO, Vec3::ONE);
        let vertices = interleave(&mesh);
        assert_eq!(vertices.len(), mesh.positions.len());
        assert_eq!(vertices[0].position, mesh.positions[0].to_array());
        assert_eq!(vertices[0].normal, mesh.normals[0].to_array());
        assert_eq!(vertices[0].color, DEFAULT_ALBEDO.to_array());
    }

    #[test]
    fn missing_normals_point_up_and_colors_pass_through() {
        let mesh = Mesh {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            normals: Vec::new(),
            colors: vec![Vec3::X, Vec3::Y, Vec3::Z],
            indices: vec![0, 1, 2],
        };
        let vertices = interleave(&mesh);
        assert!(vertices.iter().all(|v| v.normal == [0.0, 1.0, 0.0]));
        assert_eq!(vertices[2].color, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn normal_matrix_undoes_nonuniform_scale() {
        let uniform =
            ModelUniform::new(Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0)));
        let normal = Mat4::from_cols_array_2d(&uniform.normal);
        assert!(normal
            .transform_vector3(Vec3::X)
            .abs_diff_eq(Vec3::new(0.5, 0.0, 0.0), 1e-6));
        assert_eq!(size_of::<ModelUniform>(), 128);
        assert_eq!(size_of::<Vertex>(), 36);
        assert_eq!(Vertex::layout().array_stride, 36);
        assert_eq!(pipeline_util::multisample_state().count, 4);
    }
}
