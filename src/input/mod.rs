//! Pointer input: platform-agnostic events and the drag state machine that
//! turns them into model rotation.

/// Grab-to-rotate state machine.
pub mod drag;
/// Platform-agnostic pointer events.
pub mod event;

pub use drag::{
    CaptureError, DragController, DragParams, DragResponse, DragState,
    HitTest, PointerHost,
};
pub use event::{
    CursorKind, PointerButton, PointerEvent, PointerId, PointerPhase,
    SurfaceRect,
};
