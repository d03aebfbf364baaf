//! The single displayed model: geometry, bounds, root transform, and
//! ray hit-testing, plus glTF import.

mod aabb;
/// glTF / GLB import into a flattened [`Mesh`].
pub mod loader;
mod model;
mod ray;

pub use aabb::Aabb;
pub use loader::load_model;
pub use model::{Mesh, Model, DEFAULT_ALBEDO};
pub use ray::Ray;
