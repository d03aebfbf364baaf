//! Shared utilities.

/// Wall-clock frame delta.
pub mod frame_timing;
