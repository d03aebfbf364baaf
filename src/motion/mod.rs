//! Rotation state and the elastic return to rest.
//!
//! [`RotationState`] is the one piece of mutable state shared by pointer
//! handling and the frame loop. While a drag is active only the drag
//! controller writes it; otherwise the [`AnimationDriver`] springs every
//! axis back toward the [`RestPose`] and snaps it once settled.

/// Per-frame three-axis spring update.
pub mod driver;
/// Single-axis spring step and angle clamp.
pub mod spring;
mod state;

pub use driver::{AnimationDriver, TickOutcome};
pub use spring::{clamp_angle, SpringParams};
pub use state::{AngularVelocity, Orientation, RestPose, RotationState};
