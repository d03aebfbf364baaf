//! glTF / GLB import.
//!
//! Every triangle primitive reachable from the default scene is baked into
//! one model-space [`Mesh`]: node transforms are accumulated down the
//! hierarchy and applied to positions and normals. Strips and fans are
//! unrolled into triangle lists.

use std::path::Path;

use glam::{Mat3, Mat4, Vec3};
use gltf::mesh::Mode;

use super::model::{Mesh, Model};
use crate::error::TiltError;

/// Load the model at `path`.
///
/// # Errors
///
/// Returns [`TiltError::AssetLoad`] when the file cannot be imported or has
/// no triangle geometry.
pub fn load_model(path: impl AsRef<Path>) -> Result<Model, TiltError> {
    let path = path.as_ref();
    let (document, buffers, _images) = gltf::import(path).map_err(|e| {
        TiltError::AssetLoad(format!("{}: {e}", path.display()))
    })?;

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or_else(|| {
            TiltError::AssetLoad(format!("{}: no scene", path.display()))
        })?;

    let mut mesh = Mesh::default();
    for node in scene.nodes() {
        bake_node(&node, Mat4::IDENTITY, &buffers, &mut mesh);
    }

    log::info!(
        "loaded {}: {} vertices, {} triangles",
        path.display(),
        mesh.positions.len(),
        mesh.triangle_count()
    );

    Model::new(mesh).ok_or_else(|| {
        TiltError::AssetLoad(format!("{}: no triangle geometry", path.display()))
    })
}

fn bake_node(
    node: &gltf::Node<'_>,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    out: &mut Mesh,
) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        let normal_matrix = normal_matrix(world);
        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| {
                buffers.get(buffer.index()).map(|data| &data.0[..])
            });
            let Some(positions) = reader.read_positions() else {
                continue;
            };
            let positions: Vec<Vec3> = positions
                .map(|p| world.transform_point3(Vec3::from(p)))
                .collect();
            let vertex_count = positions.len() as u32;
            let indices: Vec<u32> = reader.read_indices().map_or_else(
                || (0..vertex_count).collect(),
                |indices| indices.into_u32().collect(),
            );
            let Some(indices) = triangle_list(primitive.mode(), &indices) else {
                log::debug!(
                    "skipping {:?} primitive in mesh {:?}",
                    primitive.mode(),
                    mesh.name()
                );
                continue;
            };

            let base = base_color(&primitive);
            let colors: Vec<Vec3> = match reader.read_colors(0) {
                Some(colors) => colors
                    .into_rgb_f32()
                    .map(|c| base * Vec3::from(c))
                    .collect(),
                None => vec![base; positions.len()],
            };
            let mut part = Mesh {
                positions,
                normals: Vec::new(),
                colors,
                indices,
            };
            match reader.read_normals() {
                Some(normals) => {
                    part.normals = normals
                        .map(|n| {
                            (normal_matrix * Vec3::from(n))
                                .try_normalize()
                                .unwrap_or(Vec3::Y)
                        })
                        .collect();
                }
                // Only this primitive; authored normals elsewhere stay.
                None => part.compute_normals(),
            }
            out.append(&part);
        }
    }

    for child in node.children() {
        bake_node(&child, world, buffers, out);
    }
}

/// Linear RGB base color factor of the primitive's material.
fn base_color(primitive: &gltf::mesh::Primitive<'_>) -> Vec3 {
    let [r, g, b, _] = primitive
        .material()
        .pbr_metallic_roughness()
        .base_color_factor();
    Vec3::new(r, g, b)
}

/// Triangle-list indices for a primitive drawn as `mode`, or `None` for
/// point and line primitives.
///
/// Odd strip triangles swap their last two corners so every triangle keeps
/// the winding of the first.
fn triangle_list(mode: Mode, indices: &[u32]) -> Option<Vec<u32>> {
    match mode {
        Mode::Triangles => {
            Some(indices.chunks_exact(3).flatten().copied().collect())
        }
        Mode::TriangleStrip => Some(
            indices
                .windows(3)
                .enumerate()
                .flat_map(|(i, w)| {
                    if i % 2 == 0 {
                        [w[0], w[1], w[2]]
                    } else {
                        [w[0], w[2], w[1]]
                    }
                })
                .collect(),
        ),
        Mode::TriangleFan => Some(match indices.split_first() {
            Some((&hub, rim)) => {
                rim.windows(2).flat_map(|w| [hub, w[0], w[1]]).collect()
            }
            None => Vec::new(),
        }),
        Mode::Points | Mode::Lines | Mode::LineLoop | Mode::LineStrip => None,
    }
}

/// Inverse-transpose of the upper 3×3, falling back to the plain 3×3 for
/// degenerate (zero-scale) transforms.
fn normal_matrix(world: Mat4) -> Mat3 {
    let linear = Mat3::from_mat4(world);
    if linear.determinant().abs() > f32::EPSILON {
        linear.inverse().transpose()
    } else {
        linear
    }
}
