// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Grab-to-rotate single-model 3D viewer built on wgpu.
//!
//! Tilt loads one glTF/GLB model, frames it in a perspective camera, lets
//! the user drag it within per-axis angular limits, and springs it back to
//! a rest pose on release.
//!
//! # Key entry points
//!
//! - [`stage::Stage`] - headless viewer state: framing, drag handling, and
//!   the per-frame spring return
//! - [`engine::ViewerEngine`] - a `Stage` plus the wgpu resources that draw
//!   it
//! - [`options::Options`] - runtime configuration (camera, motion,
//!   lighting, debug)
//! - `Viewer` - a standalone winit window (feature `viewer`)
//!
//! # Architecture
//!
//! Everything runs on the window thread. Pointer events flow through the
//! [`input::DragController`] into the shared [`motion::RotationState`];
//! when no drag is active the [`motion::AnimationDriver`] advances a damped
//! spring per axis each frame. [`camera::framing`] refits the camera on
//! load and on every resize.

pub mod camera;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod input;
pub mod lighting;
pub mod motion;
pub mod options;
pub mod renderer;
pub mod scene;
pub mod stage;
pub mod util;
#[cfg(feature = "viewer")]
mod viewer;

pub use error::TiltError;
#[cfg(feature = "viewer")]
pub use viewer::{StopHandle, Viewer, ViewerBuilder};
