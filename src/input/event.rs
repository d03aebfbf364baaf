use glam::Vec2;

/// Identifies one pointer (mouse or a single touch contact) for the
/// lifetime of a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerId(pub u64);

impl PointerId {
    /// The mouse pointer.
    pub const MOUSE: Self = Self(0);

    /// Pointer for a touch contact. Offset by one so it never collides
    /// with [`MOUSE`](Self::MOUSE).
    #[must_use]
    pub const fn touch(id: u64) -> Self {
        Self(id.saturating_add(1))
    }
}

/// Platform-agnostic pointer button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Primary (left) button, or a touch contact.
    Primary,
    /// Secondary (right) button.
    Secondary,
    /// Middle button (wheel click).
    Middle,
    /// Back, forward, or any other extra button.
    Other,
}

#[cfg(feature = "viewer")]
impl From<winit::event::MouseButton> for PointerButton {
    fn from(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Left => Self::Primary,
            winit::event::MouseButton::Right => Self::Secondary,
            winit::event::MouseButton::Middle => Self::Middle,
            _ => Self::Other,
        }
    }
}

/// What happened to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    /// A button was pressed.
    Down(PointerButton),
    /// The pointer moved.
    Move,
    /// The pressed button was released.
    Up,
    /// The platform aborted the press (touch cancelled, etc.).
    Cancel,
    /// Pointer capture was taken away (window lost focus, etc.).
    LostCapture,
}

/// Platform-agnostic pointer event in surface client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Which pointer.
    pub id: PointerId,
    /// What happened.
    pub phase: PointerPhase,
    /// Horizontal client position in pixels.
    pub x: f32,
    /// Vertical client position in pixels.
    pub y: f32,
}

impl PointerEvent {
    /// Primary-button press at `(x, y)`.
    #[must_use]
    pub const fn down(id: PointerId, x: f32, y: f32) -> Self {
        Self {
            id,
            phase: PointerPhase::Down(PointerButton::Primary),
            x,
            y,
        }
    }

    /// Move to `(x, y)`.
    #[must_use]
    pub const fn moved(id: PointerId, x: f32, y: f32) -> Self {
        Self {
            id,
            phase: PointerPhase::Move,
            x,
            y,
        }
    }

    /// Release at `(x, y)`.
    #[must_use]
    pub const fn up(id: PointerId, x: f32, y: f32) -> Self {
        Self {
            id,
            phase: PointerPhase::Up,
            x,
            y,
        }
    }

    /// Capture lost. Position is irrelevant.
    #[must_use]
    pub const fn lost_capture(id: PointerId) -> Self {
        Self {
            id,
            phase: PointerPhase::LostCapture,
            x: 0.0,
            y: 0.0,
        }
    }
}

/// Cursor affordance shown over the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorKind {
    /// Platform default arrow.
    #[default]
    Default,
    /// Open hand: the model is under the pointer and can be grabbed.
    Grab,
    /// Closed hand: a drag is in progress.
    Grabbing,
}

#[cfg(feature = "viewer")]
impl From<CursorKind> for winit::window::CursorIcon {
    fn from(kind: CursorKind) -> Self {
        match kind {
            CursorKind::Default => Self::Default,
            CursorKind::Grab => Self::Grab,
            CursorKind::Grabbing => Self::Grabbing,
        }
    }
}

/// Render surface rectangle in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRect {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl SurfaceRect {
    /// Rectangle anchored at the client origin.
    #[must_use]
    pub const fn sized(width: f32, height: f32) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }

    /// Convert a client position to normalized device coordinates
    /// (`x` right, `y` up, both in `[-1, 1]` across the surface).
    ///
    /// Returns `None` for an empty surface.
    #[must_use]
    pub fn to_ndc(&self, x: f32, y: f32) -> Option<Vec2> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        let nx = ((x - self.left) / self.width) * 2.0 - 1.0;
        let ny = -(((y - self.top) / self.height) * 2.0 - 1.0);
        Some(Vec2::new(nx, ny))
    }
}
