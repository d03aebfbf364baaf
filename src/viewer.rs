//! Standalone viewer window backed by winit.
//!
//! ```no_run
//! # use tilt::Viewer;
//! Viewer::builder()
//!     .with_model_path("assets/hed-0.glb")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use winit::{
    application::ApplicationHandler,
    event::{ElementState, Touch, TouchPhase, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{CursorIcon, Window, WindowId},
};

use crate::{
    engine::ViewerEngine,
    error::TiltError,
    input::{
        CaptureError, CursorKind, PointerButton, PointerEvent, PointerHost,
        PointerId, PointerPhase, SurfaceRect,
    },
    options::Options,
};

// ── Stop handle ──────────────────────────────────────────────────────────

/// Asks a running [`Viewer`] to close its window and tear down the engine.
///
/// Cheap to clone; any clone may be moved to another thread.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Request shutdown. The event loop exits at its next iteration.
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether shutdown was requested.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    model_path: Option<PathBuf>,
    options: Option<Options>,
    title: String,
}

impl ViewerBuilder {
    /// Create a builder with sensible defaults (title "Tilt", no model,
    /// default options).
    fn new() -> Self {
        Self {
            model_path: None,
            options: None,
            title: "Tilt".into(),
        }
    }

    /// Set the glTF/GLB model to show.
    #[must_use]
    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = Some(path.into());
        self
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            model_path: self.model_path,
            options: self.options.unwrap_or_default(),
            title: self.title,
            stop: StopHandle::default(),
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window that displays one model.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    model_path: Option<PathBuf>,
    options: Options,
    title: String,
    stop: StopHandle,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Handle that ends [`run`](Self::run) from elsewhere.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed or the [`StopHandle`] fires.
    ///
    /// A model that fails to load is logged and the window stays open
    /// without it.
    ///
    /// # Errors
    ///
    /// Returns [`TiltError::Viewer`] if the event loop cannot start,
    /// [`TiltError::Surface`] if the window cannot be created, and
    /// [`TiltError::Gpu`] if GPU initialization fails.
    pub fn run(self) -> Result<(), TiltError> {
        let event_loop =
            EventLoop::new().map_err(|e| TiltError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            engine: None,
            pointer: PointerState::default(),
            model_path: self.model_path,
            options: self.options,
            title: self.title,
            stop: self.stop,
            failure: None,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| TiltError::Viewer(e.to_string()))?;
        app.failure.map_or(Ok(()), Err)
    }
}

// ── Pointer host ─────────────────────────────────────────────────────────

/// Capture and cursor bookkeeping. winit has no pointer-capture API; the
/// window already receives drags that leave it, so capture is tracked here
/// only to honor the release contract.
#[derive(Default)]
struct PointerState {
    captured: Option<PointerId>,
    cursor: CursorKind,
    position: (f32, f32),
}

struct WindowHost<'a> {
    window: &'a Window,
    state: &'a mut PointerState,
}

impl PointerHost for WindowHost<'_> {
    fn set_cursor(&mut self, cursor: CursorKind) {
        if self.state.cursor != cursor {
            self.state.cursor = cursor;
            self.window.set_cursor(CursorIcon::from(cursor));
        }
    }

    fn capture_pointer(&mut self, id: PointerId) {
        self.state.captured = Some(id);
    }

    fn release_pointer(&mut self, id: PointerId) -> Result<(), CaptureError> {
        if self.state.captured == Some(id) {
            self.state.captured = None;
            Ok(())
        } else {
            Err(CaptureError { pointer_id: id })
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn surface_rect(&self) -> SurfaceRect {
        let inner = self.window.inner_size();
        SurfaceRect::sized(inner.width as f32, inner.height as f32)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn touch_event(touch: &Touch) -> PointerEvent {
    let phase = match touch.phase {
        TouchPhase::Started => PointerPhase::Down(PointerButton::Primary),
        TouchPhase::Moved => PointerPhase::Move,
        TouchPhase::Ended => PointerPhase::Up,
        TouchPhase::Cancelled => PointerPhase::Cancel,
    };
    PointerEvent {
        id: PointerId::touch(touch.id),
        phase,
        x: touch.location.x as f32,
        y: touch.location.y as f32,
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

/// Internal winit application handler.
struct ViewerApp {
    window: Option<Arc<Window>>,
    engine: Option<ViewerEngine>,
    pointer: PointerState,
    model_path: Option<PathBuf>,
    options: Options,
    title: String,
    stop: StopHandle,
    failure: Option<TiltError>,
}

impl ViewerApp {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: TiltError) {
        log::error!("{error}");
        self.failure = Some(error);
        event_loop.exit();
    }

    fn dispatch_pointer(&mut self, event: &PointerEvent) {
        let (Some(window), Some(engine)) = (&self.window, &mut self.engine)
        else {
            return;
        };
        let mut host = WindowHost {
            window,
            state: &mut self.pointer,
        };
        let _ = engine.handle_pointer(event, &mut host);
    }

    fn resize_to_window(&mut self) {
        if let (Some(window), Some(engine)) = (&self.window, &mut self.engine) {
            let inner = window.inner_size();
            engine.resize((inner.width, inner.height));
        }
    }

    fn redraw(&mut self) {
        let Some(engine) = &mut self.engine else {
            return;
        };
        match engine.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                self.resize_to_window();
            }
            Err(e) => log::error!("render error: {e:?}"),
        }
        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next());
        let attrs = if let Some(mon) = &monitor {
            let mon_size = mon.size();
            let scale = mon.scale_factor();
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let logical_w = (f64::from(mon_size.width) / scale * 0.6) as u32;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let logical_h = (f64::from(mon_size.height) / scale * 0.6) as u32;
            Window::default_attributes()
                .with_title(&self.title)
                .with_inner_size(winit::dpi::LogicalSize::new(
                    logical_w, logical_h,
                ))
        } else {
            Window::default_attributes().with_title(&self.title)
        };

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.fail(event_loop, TiltError::Surface(e.to_string()));
                return;
            }
        };

        let inner = window.inner_size();
        let size = (inner.width.max(1), inner.height.max(1));
        let mut engine = match pollster::block_on(ViewerEngine::new(
            window.clone(),
            size,
            window.scale_factor(),
            &self.options,
        )) {
            Ok(e) => e,
            Err(e) => {
                self.fail(event_loop, e);
                return;
            }
        };

        if let Some(path) = &self.model_path {
            match engine.load_model(path) {
                Ok(()) => log::info!("loaded {}", path.display()),
                Err(e) => {
                    log::error!("failed to load {}: {e}", path.display());
                }
            }
        }

        window.request_redraw();
        self.window = Some(window);
        self.engine = Some(engine);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            event_loop.exit();
            return;
        }

        // Guard: both window and engine must be initialised.
        if self.window.is_none() || self.engine.is_none() {
            return;
        }

        match event {
            WindowEvent::Resized(_) => self.resize_to_window(),

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let (Some(window), Some(engine)) =
                    (&self.window, &mut self.engine)
                {
                    let inner = window.inner_size();
                    engine.set_scale_factor(
                        scale_factor,
                        (inner.width, inner.height),
                    );
                }
            }

            WindowEvent::RedrawRequested => self.redraw(),

            WindowEvent::MouseInput { button, state, .. } => {
                let (x, y) = self.pointer.position;
                let button = PointerButton::from(button);
                let phase = match state {
                    ElementState::Pressed => PointerPhase::Down(button),
                    // Only the primary button drives drags.
                    ElementState::Released if button == PointerButton::Primary => {
                        PointerPhase::Up
                    }
                    ElementState::Released => return,
                };
                self.dispatch_pointer(&PointerEvent {
                    id: PointerId::MOUSE,
                    phase,
                    x,
                    y,
                });
            }

            WindowEvent::CursorMoved { position, .. } => {
                #[allow(clippy::cast_possible_truncation)]
                let (x, y) = (position.x as f32, position.y as f32);
                self.pointer.position = (x, y);
                self.dispatch_pointer(&PointerEvent::moved(
                    PointerId::MOUSE,
                    x,
                    y,
                ));
            }

            WindowEvent::Touch(touch) => {
                self.dispatch_pointer(&touch_event(&touch));
            }

            WindowEvent::Focused(false) => {
                let id = self.pointer.captured.take().unwrap_or(PointerId::MOUSE);
                self.dispatch_pointer(&PointerEvent::lost_capture(id));
            }

            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.stop.is_stopped() {
            event_loop.exit();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Engine drops before the window it renders into.
        self.engine = None;
        self.window = None;
        log::info!("viewer closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_handle_clones_share_state() {
        let viewer = Viewer::builder().build();
        let handle = viewer.stop_handle();
        let other = handle.clone();
        assert!(!viewer.stop.is_stopped());
        other.stop();
        assert!(handle.is_stopped());
        assert!(viewer.stop.is_stopped());
    }

    #[test]
    fn builder_keeps_settings() {
        let mut options = Options::default();
        options.motion.damping = 3.0;
        let viewer = Viewer::builder()
            .with_model_path("model.glb")
            .with_title("Demo")
            .with_options(options.clone())
            .build();
        assert_eq!(viewer.model_path, Some(PathBuf::from("model.glb")));
        assert_eq!(viewer.title, "Demo");
        assert_eq!(viewer.options, options);
    }
}
