use glam::{Mat4, Vec3};

use super::aabb::Aabb;
use super::ray::Ray;
use crate::motion::Orientation;

/// Linear base color for vertices without one.
pub const DEFAULT_ALBEDO: Vec3 = Vec3::new(0.82, 0.80, 0.76);

/// Flattened triangle mesh in model space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Per-vertex unit normals, same length as `positions`.
    pub normals: Vec<Vec3>,
    /// Per-vertex linear base color. Empty means [`DEFAULT_ALBEDO`]
    /// throughout.
    pub colors: Vec<Vec3>,
    /// Triangle list indices into `positions`.
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Axis-aligned box mesh with flat-shaded faces.
    #[must_use]
    pub fn cuboid(center: Vec3, size: Vec3) -> Self {
        let h = size * 0.5;
        // (normal, tangent u, tangent v) per face; u × v == normal
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];
        let mut mesh = Self::default();
        for (n, u, v) in faces {
            let base = mesh.positions.len() as u32;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]
            {
                mesh.positions.push(center + (n + u * su + v * sv) * h);
                mesh.normals.push(n);
            }
            mesh.indices
                .extend([base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        mesh
    }

    /// Whether there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.len() < 3
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate triangles as vertex triples. Triangles with out-of-range
    /// indices are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(|tri| {
            let get = |i: u32| self.positions.get(i as usize).copied();
            Some([get(tri[0])?, get(tri[1])?, get(tri[2])?])
        })
    }

    /// Model-space bounds, `None` for a mesh without vertices.
    #[must_use]
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.positions.iter().copied())
    }

    /// Recompute smooth vertex normals from triangle areas.
    pub fn compute_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize);
            let (Some(&pa), Some(&pb), Some(&pc)) = (
                self.positions.get(a),
                self.positions.get(b),
                self.positions.get(c),
            ) else {
                continue;
            };
            let face = (pb - pa).cross(pc - pa);
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }
        self.normals = normals
            .into_iter()
            .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
            .collect();
    }

    /// Base color of vertex `i`.
    #[must_use]
    pub fn color(&self, i: usize) -> Vec3 {
        self.colors.get(i).copied().unwrap_or(DEFAULT_ALBEDO)
    }

    /// Append `other`, shifting its indices. Colors are padded with
    /// [`DEFAULT_ALBEDO`] when only one side has them.
    pub fn append(&mut self, other: &Self) {
        let base = self.positions.len() as u32;
        if !self.colors.is_empty() || !other.colors.is_empty() {
            self.colors.resize(self.positions.len(), DEFAULT_ALBEDO);
            self.colors
                .extend((0..other.positions.len()).map(|i| other.color(i)));
        }
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }
}

/// The single model shown by the viewer.
///
/// The mesh never changes after load. The model's root transform is a
/// translation (`position`, set by camera framing to recenter the model)
/// followed by the current [`Orientation`].
#[derive(Debug, Clone)]
pub struct Model {
    mesh: Mesh,
    local_bounds: Aabb,
    /// Root translation in world space.
    pub position: Vec3,
    /// Root rotation.
    pub orientation: Orientation,
}

impl Model {
    /// Wrap a mesh. Returns `None` when the mesh has no triangles.
    #[must_use]
    pub fn new(mesh: Mesh) -> Option<Self> {
        if mesh.is_empty() {
            return None;
        }
        let local_bounds = mesh.bounds()?;
        Some(Self {
            mesh,
            local_bounds,
            position: Vec3::ZERO,
            orientation: Orientation::default(),
        })
    }

    /// Geometry in model space.
    #[must_use]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Bounds in model space.
    #[must_use]
    pub fn local_bounds(&self) -> Aabb {
        self.local_bounds
    }

    /// Model-to-world transform.
    #[must_use]
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation.to_quat(), self.position)
    }

    /// World-space axis-aligned bounds under the current transform.
    #[must_use]
    pub fn world_bounds(&self) -> Aabb {
        self.local_bounds.transformed(self.world_matrix())
    }

    /// Shift the model so its world bounds are centered on the origin.
    /// Returns the bounds after the shift.
    pub fn recenter(&mut self) -> Aabb {
        let center = self.world_bounds().center();
        self.position -= center;
        self.world_bounds()
    }

    /// Whether a world-space ray hits any triangle of the model.
    #[must_use]
    pub fn intersects_ray(&self, ray: &Ray) -> bool {
        let local = ray.transformed(self.world_matrix().inverse());
        if self.local_bounds.intersect_ray(&local).is_none() {
            return false;
        }
        self.mesh
            .triangles()
            .any(|[a, b, c]| local.intersect_triangle(a, b, c).is_some())
    }
}
