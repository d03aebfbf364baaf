//! Grab-to-rotate drag state machine.
//!
//! A press on the model starts a session bound to that pointer; moves of
//! the same pointer rotate the model within its angular limits; release,
//! cancel, or losing capture ends the session. Every other event only
//! updates the hover cursor.

use std::fmt;

use glam::Vec2;

use super::event::{
    CursorKind, PointerButton, PointerEvent, PointerId, PointerPhase,
    SurfaceRect,
};
use crate::motion::{clamp_angle, AngularVelocity, RotationState};
use crate::options::MotionOptions;

/// Answers whether a ray through NDC hits the model.
pub trait HitTest {
    /// `true` when the ray through `ndc` hits any of the model's triangles.
    fn hit(&self, ndc: Vec2) -> bool;
}

/// Release of pointer capture failed because the pointer was not captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureError {
    /// The pointer that was being released.
    pub pointer_id: PointerId,
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pointer {} is not captured", self.pointer_id.0)
    }
}

impl std::error::Error for CaptureError {}

/// Platform services the drag controller needs from the window.
pub trait PointerHost {
    /// Show `cursor` over the surface.
    fn set_cursor(&mut self, cursor: CursorKind);
    /// Route all further events of `id` to the surface.
    fn capture_pointer(&mut self, id: PointerId);
    /// Stop routing events of `id` to the surface.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError`] if `id` was not captured.
    fn release_pointer(&mut self, id: PointerId) -> Result<(), CaptureError>;
    /// Current render surface rectangle in client coordinates.
    fn surface_rect(&self) -> SurfaceRect;
}

/// Drag session state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// A drag owned by `pointer_id`, last seen at `(last_x, last_y)`.
    Dragging {
        /// Pointer that started the drag.
        pointer_id: PointerId,
        /// Last client x.
        last_x: f32,
        /// Last client y.
        last_y: f32,
    },
}

/// What an event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragResponse {
    /// A drag session started.
    Started,
    /// The active drag rotated the model.
    Rotated,
    /// The active drag ended.
    Ended,
    /// Only the hover cursor was updated.
    Hovered,
    /// Nothing changed.
    Ignored,
}

/// Sensitivity and limits for drag rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragParams {
    /// Radians per pixel.
    pub rotate_speed: f32,
    /// Fraction of the yaw delta applied as roll.
    pub roll_coupling: f32,
    /// Largest deviation from rest on any axis, in radians.
    pub max_deviation: f32,
}

impl Default for DragParams {
    fn default() -> Self {
        Self::from(&MotionOptions::default())
    }
}

impl From<&MotionOptions> for DragParams {
    fn from(opts: &MotionOptions) -> Self {
        Self {
            rotate_speed: opts.rotate_speed,
            roll_coupling: opts.roll_coupling,
            max_deviation: opts.max_deviation(),
        }
    }
}

/// Translates pointer events into orientation changes.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
    params: DragParams,
}

impl DragController {
    /// Idle controller.
    #[must_use]
    pub const fn new(params: DragParams) -> Self {
        Self {
            state: DragState::Idle,
            params,
        }
    }

    /// Current session state.
    #[must_use]
    pub const fn state(&self) -> DragState {
        self.state
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Active sensitivity and limits.
    #[must_use]
    pub const fn params(&self) -> &DragParams {
        &self.params
    }

    /// Feed one pointer event.
    ///
    /// `target` is the loaded model's hit-test, or `None` while no model is
    /// loaded; in that case everything except
    /// [`LostCapture`](PointerPhase::LostCapture) is ignored.
    pub fn handle(
        &mut self,
        event: &PointerEvent,
        rotation: &mut RotationState,
        target: Option<&dyn HitTest>,
        host: &mut dyn PointerHost,
    ) -> DragResponse {
        if event.phase == PointerPhase::LostCapture {
            self.state = DragState::Idle;
            host.set_cursor(CursorKind::Default);
            return DragResponse::Ended;
        }
        let Some(target) = target else {
            return DragResponse::Ignored;
        };

        match event.phase {
            PointerPhase::Down(button) => {
                self.press(event, button, rotation, target, host)
            }
            PointerPhase::Move => self.moved(event, rotation, target, host),
            PointerPhase::Up | PointerPhase::Cancel => {
                self.release(event, target, host)
            }
            PointerPhase::LostCapture => DragResponse::Ignored,
        }
    }

    fn press(
        &mut self,
        event: &PointerEvent,
        button: PointerButton,
        rotation: &mut RotationState,
        target: &dyn HitTest,
        host: &mut dyn PointerHost,
    ) -> DragResponse {
        if button != PointerButton::Primary
            || self.is_dragging()
            || !hit_at(target, host, event)
        {
            return DragResponse::Ignored;
        }
        self.state = DragState::Dragging {
            pointer_id: event.id,
            last_x: event.x,
            last_y: event.y,
        };
        rotation.velocity = AngularVelocity::ZERO;
        host.capture_pointer(event.id);
        host.set_cursor(CursorKind::Grabbing);
        DragResponse::Started
    }

    fn moved(
        &mut self,
        event: &PointerEvent,
        rotation: &mut RotationState,
        target: &dyn HitTest,
        host: &mut dyn PointerHost,
    ) -> DragResponse {
        match self.state {
            DragState::Dragging {
                pointer_id,
                last_x,
                last_y,
            } if pointer_id == event.id => {
                self.state = DragState::Dragging {
                    pointer_id,
                    last_x: event.x,
                    last_y: event.y,
                };
                self.rotate(rotation, event.x - last_x, event.y - last_y);
                DragResponse::Rotated
            }
            _ => {
                let cursor = hover_cursor(target, host, event);
                host.set_cursor(cursor);
                DragResponse::Hovered
            }
        }
    }

    fn release(
        &mut self,
        event: &PointerEvent,
        target: &dyn HitTest,
        host: &mut dyn PointerHost,
    ) -> DragResponse {
        match self.state {
            DragState::Dragging { pointer_id, .. } if pointer_id == event.id => {
                self.state = DragState::Idle;
                // Capture may already be gone; nothing to recover.
                let _ = host.release_pointer(event.id);
                let cursor = hover_cursor(target, host, event);
                host.set_cursor(cursor);
                DragResponse::Ended
            }
            _ => DragResponse::Ignored,
        }
    }

    /// Horizontal motion yaws with a little coupled roll; vertical motion
    /// pitches. Each axis is clamped around its own rest angle.
    fn rotate(&self, rotation: &mut RotationState, dx: f32, dy: f32) {
        let speed = self.params.rotate_speed;
        let limit = self.params.max_deviation;
        let rest = rotation.rest().orientation();
        let o = &mut rotation.orientation;
        o.y = clamp_angle(o.y + dx * speed, rest.y, limit);
        o.x = clamp_angle(o.x + dy * speed, rest.x, limit);
        o.z = clamp_angle(
            o.z + dx * speed * self.params.roll_coupling,
            rest.z,
            limit,
        );
    }
}

fn hit_at(
    target: &dyn HitTest,
    host: &dyn PointerHost,
    event: &PointerEvent,
) -> bool {
    host.surface_rect()
        .to_ndc(event.x, event.y)
        .is_some_and(|ndc| target.hit(ndc))
}

fn hover_cursor(
    target: &dyn HitTest,
    host: &dyn PointerHost,
    event: &PointerEvent,
) -> CursorKind {
    if hit_at(target, host, event) {
        CursorKind::Grab
    } else {
        CursorKind::Default
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::Orientation;

    /// Hits anything left of the surface center.
    struct LeftHalf;

    impl HitTest for LeftHalf {
        fn hit(&self, ndc: Vec2) -> bool {
            ndc.x < 0.0
        }
    }

    #[derive(Default)]
    struct FakeHost {
        cursor: CursorKind,
        captured: Option<PointerId>,
        release_errors: usize,
    }

    impl PointerHost for FakeHost {
        fn set_cursor(&mut self, cursor: CursorKind) {
            self.cursor = cursor;
        }

        fn capture_pointer(&mut self, id: PointerId) {
            self.captured = Some(id);
        }

        fn release_pointer(&mut self, id: PointerId) -> Result<(), CaptureError> {
            if self.captured.take() == Some(id) {
                Ok(())
            } else {
                self.release_errors += 1;
                Err(CaptureError { pointer_id: id })
            }
        }

        fn surface_rect(&self) -> SurfaceRect {
            SurfaceRect::sized(200.0, 100.0)
        }
    }

    const HIT: (f32, f32) = (50.0, 50.0);
    const MISS: (f32, f32) = (150.0, 50.0);
    const A: PointerId = PointerId(1);
    const B: PointerId = PointerId(2);

    fn setup() -> (DragController, RotationState, FakeHost) {
        (
            DragController::default(),
            RotationState::default(),
            FakeHost::default(),
        )
    }

    fn start(
        drag: &mut DragController,
        rotation: &mut RotationState,
        host: &mut FakeHost,
    ) {
        let down = PointerEvent::down(A, HIT.0, HIT.1);
        assert_eq!(
            drag.handle(&down, rotation, Some(&LeftHalf), host),
            DragResponse::Started
        );
    }

    #[test]
    fn missed_press_never_drags() {
        let (mut drag, mut rotation, mut host) = setup();
        let down = PointerEvent::down(A, MISS.0, MISS.1);
        let response = drag.handle(&down, &mut rotation, Some(&LeftHalf), &mut host);
        assert_eq!(response, DragResponse::Ignored);
        assert_eq!(drag.state(), DragState::Idle);
        assert_eq!(host.captured, None);

        let before = rotation.clone();
        let mv = PointerEvent::moved(A, MISS.0 - 40.0, MISS.1 + 10.0);
        let _ = drag.handle(&mv, &mut rotation, Some(&LeftHalf), &mut host);
        assert_eq!(rotation, before);
    }

    #[test]
    fn press_requires_a_model_and_the_primary_button() {
        let (mut drag, mut rotation, mut host) = setup();
        let down = PointerEvent::down(A, HIT.0, HIT.1);
        assert_eq!(
            drag.handle(&down, &mut rotation, None, &mut host),
            DragResponse::Ignored
        );

        let right = PointerEvent {
            phase: PointerPhase::Down(PointerButton::Secondary),
            ..down
        };
        assert_eq!(
            drag.handle(&right, &mut rotation, Some(&LeftHalf), &mut host),
            DragResponse::Ignored
        );
        assert!(!drag.is_dragging());
    }

    #[test]
    fn drag_start_zeroes_velocity_and_captures() {
        let (mut drag, mut rotation, mut host) = setup();
        rotation.velocity = AngularVelocity::from_array([1.0, -2.0, 0.5]);
        start(&mut drag, &mut rotation, &mut host);

        assert_eq!(rotation.velocity, AngularVelocity::ZERO);
        assert_eq!(host.captured, Some(A));
        assert_eq!(host.cursor, CursorKind::Grabbing);
        assert_eq!(
            drag.state(),
            DragState::Dragging {
                pointer_id: A,
                last_x: HIT.0,
                last_y: HIT.1
            }
        );
    }

    #[test]
    fn second_press_during_a_drag_is_ignored() {
        let (mut drag, mut rotation, mut host) = setup();
        start(&mut drag, &mut rotation, &mut host);
        let other = PointerEvent::down(B, HIT.0, HIT.1);
        assert_eq!(
            drag.handle(&other, &mut rotation, Some(&LeftHalf), &mut host),
            DragResponse::Ignored
        );
        assert!(matches!(
            drag.state(),
            DragState::Dragging { pointer_id: A, .. }
        ));
    }

    #[test]
    fn moves_map_axes_with_coupled_roll() {
        let (mut drag, mut rotation, mut host) = setup();
        let rest = rotation.rest().orientation();
        start(&mut drag, &mut rotation, &mut host);

        let mv = PointerEvent::moved(A, HIT.0 + 10.0, HIT.1 + 4.0);
        assert_eq!(
            drag.handle(&mv, &mut rotation, Some(&LeftHalf), &mut host),
            DragResponse::Rotated
        );
        let o = rotation.orientation;
        assert!((o.y - 0.07).abs() < 1e-6);
        assert!((o.x - (rest.x + 0.028)).abs() < 1e-6);
        assert!((o.z - 0.0245).abs() < 1e-6);
    }

    #[test]
    fn long_drags_clamp_each_axis_to_its_rest() {
        let (mut drag, mut rotation, mut host) = setup();
        let rest = rotation.rest().orientation();
        let limit = 40.0_f32.to_radians();
        start(&mut drag, &mut rotation, &mut host);

        let mv = PointerEvent::moved(A, HIT.0 + 5000.0, HIT.1 - 5000.0);
        let _ = drag.handle(&mv, &mut rotation, Some(&LeftHalf), &mut host);
        let o = rotation.orientation;
        assert!((o.y - limit).abs() < 1e-6);
        assert!((o.x - (rest.x - limit)).abs() < 1e-6);
        assert!((o.z - limit).abs() < 1e-6);
    }

    #[test]
    fn other_pointers_only_hover() {
        let (mut drag, mut rotation, mut host) = setup();
        start(&mut drag, &mut rotation, &mut host);
        let before = rotation.orientation;

        let mv = PointerEvent::moved(B, MISS.0, MISS.1);
        assert_eq!(
            drag.handle(&mv, &mut rotation, Some(&LeftHalf), &mut host),
            DragResponse::Hovered
        );
        assert_eq!(rotation.orientation, before);
        assert_eq!(host.cursor, CursorKind::Default);

        let up = PointerEvent::up(B, MISS.0, MISS.1);
        assert_eq!(
            drag.handle(&up, &mut rotation, Some(&LeftHalf), &mut host),
            DragResponse::Ignored
        );
        assert!(drag.is_dragging());
    }

    #[test]
    fn hover_shows_grab_over_the_model() {
        let (mut drag, mut rotation, mut host) = setup();
        let over = PointerEvent::moved(A, HIT.0, HIT.1);
        let _ = drag.handle(&over, &mut rotation, Some(&LeftHalf), &mut host);
        assert_eq!(host.cursor, CursorKind::Grab);

        let off = PointerEvent::moved(A, MISS.0, MISS.1);
        let _ = drag.handle(&off, &mut rotation, Some(&LeftHalf), &mut host);
        assert_eq!(host.cursor, CursorKind::Default);
    }

    #[test]
    fn release_ends_the_drag_and_restores_the_hover_cursor() {
        let (mut drag, mut rotation, mut host) = setup();
        start(&mut drag, &mut rotation, &mut host);

        let up = PointerEvent::up(A, HIT.0, HIT.1);
        assert_eq!(
            drag.handle(&up, &mut rotation, Some(&LeftHalf), &mut host),
            DragResponse::Ended
        );
        assert_eq!(drag.state(), DragState::Idle);
        assert_eq!(host.captured, None);
        assert_eq!(host.cursor, CursorKind::Grab);
    }

    #[test]
    fn release_failure_is_swallowed() {
        let (mut drag, mut rotation, mut host) = setup();
        start(&mut drag, &mut rotation, &mut host);
        host.captured = None;

        let cancel = PointerEvent {
            phase: PointerPhase::Cancel,
            ..PointerEvent::up(A, MISS.0, MISS.1)
        };
        assert_eq!(
            drag.handle(&cancel, &mut rotation, Some(&LeftHalf), &mut host),
            DragResponse::Ended
        );
        assert_eq!(host.release_errors, 1);
        assert_eq!(host.cursor, CursorKind::Default);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn lost_capture_is_idempotent_and_works_without_a_model() {
        let (mut drag, mut rotation, mut host) = setup();
        start(&mut drag, &mut rotation, &mut host);
        rotation.orientation = Orientation::new(0.2, 0.3, 0.1);
        let snapshot = rotation.clone();

        for _ in 0..2 {
            let lost = PointerEvent::lost_capture(A);
            assert_eq!(
                drag.handle(&lost, &mut rotation, None, &mut host),
                DragResponse::Ended
            );
            assert_eq!(drag.state(), DragState::Idle);
            assert_eq!(host.cursor, CursorKind::Default);
            assert_eq!(rotation, snapshot);
        }
    }
}
