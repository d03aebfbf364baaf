//! GPU resource management.

/// wgpu device, surface, and queue initialization.
pub mod render_context;
