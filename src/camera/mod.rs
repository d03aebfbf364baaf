//! Camera system for viewing the model.
//!
//! Provides a perspective camera, auto-framing of the model's bounds and
//! the GPU uniform controller.

/// GPU uniform buffer and bind group for the camera.
pub mod controller;
/// Core camera struct and ray construction.
pub mod core;
/// Bounding-box auto-framing.
pub mod framing;
#[cfg(test)]
pub(crate) mod frustum;
