//! Headless viewer state: camera, model, rotation, drag session and light
//! placement, with no GPU attached.
//!
//! [`ViewerEngine`](crate::engine::ViewerEngine) wraps a `Stage` and uploads
//! its state each frame; tests drive a `Stage` directly.

use glam::{Mat4, Vec2};

use crate::camera::core::Camera;
use crate::camera::framing::{frame_model, FramingParams, ViewportFrame};
use crate::input::{
    DragController, DragParams, DragResponse, DragState, HitTest,
    PointerEvent, PointerHost,
};
use crate::lighting::{place_area_light, AreaLightPlacement};
use crate::motion::{AnimationDriver, RotationState, TickOutcome};
use crate::options::Options;
use crate::scene::Model;

/// Ray-casts from the camera against the model's triangles.
struct ModelHit<'a> {
    camera: &'a Camera,
    model: &'a Model,
}

impl HitTest for ModelHit<'_> {
    fn hit(&self, ndc: Vec2) -> bool {
        self.model.intersects_ray(&self.camera.ray_through(ndc))
    }
}

/// Everything the viewer knows about the scene, minus the GPU.
pub struct Stage {
    camera: Camera,
    model: Option<Model>,
    rotation: RotationState,
    drag: DragController,
    driver: AnimationDriver,
    framing: FramingParams,
    frame: Option<ViewportFrame>,
    area_light: AreaLightPlacement,
    area_distance_scale: f32,
    area_min_offset: f32,
    trace_pointer: bool,
}

impl Stage {
    /// Empty stage for a surface of `width` x `height` pixels.
    #[must_use]
    pub fn new(options: &Options, width: u32, height: u32) -> Self {
        let camera = Camera::new(options.camera.fovy, aspect_of(width, height));
        let area_light = place_area_light(
            &camera,
            options.lighting.area_distance_scale,
            options.lighting.area_min_offset,
        );
        Self {
            camera,
            model: None,
            rotation: RotationState::at_rest(options.motion.rest_pose()),
            drag: DragController::new(DragParams::from(&options.motion)),
            driver: AnimationDriver::from(&options.motion),
            framing: FramingParams::from(&options.camera),
            frame: None,
            area_light,
            area_distance_scale: options.lighting.area_distance_scale,
            area_min_offset: options.lighting.area_min_offset,
            trace_pointer: options.debug.trace_pointer,
        }
    }

    /// Show `model` at the rest pose and frame the camera on it.
    pub fn set_model(&mut self, mut model: Model) -> ViewportFrame {
        self.rotation.reset();
        model.orientation = self.rotation.orientation;
        let frame = frame_model(&mut model, &mut self.camera, &self.framing);
        log::info!(
            "model ready: {} triangles, camera at {:.3}",
            model.mesh().triangle_count(),
            frame.distance
        );
        self.model = Some(model);
        self.frame = Some(frame);
        self.place_light();
        frame
    }

    /// The surface was resized: refit the model, or just move the light
    /// when there is none.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.aspect = aspect_of(width, height);
        if let Some(model) = self.model.as_mut() {
            self.frame = Some(frame_model(model, &mut self.camera, &self.framing));
        }
        self.place_light();
    }

    /// Feed one pointer event to the drag controller.
    pub fn handle_pointer(
        &mut self,
        event: &PointerEvent,
        host: &mut dyn PointerHost,
    ) -> DragResponse {
        let hit = self.model.as_ref().map(|model| ModelHit {
            camera: &self.camera,
            model,
        });
        let target: Option<&dyn HitTest> = match &hit {
            Some(hit) => Some(hit),
            None => None,
        };
        let response = self.drag.handle(event, &mut self.rotation, target, host);
        if self.trace_pointer {
            log::debug!("{:?} at ({}, {}): {response:?}", event.phase, event.x, event.y);
        }
        self.sync_model();
        response
    }

    /// Advance the spring return by `raw_dt` seconds of wall time.
    pub fn tick(&mut self, raw_dt: f32) -> TickOutcome {
        let outcome = self.driver.tick(
            &mut self.rotation,
            raw_dt,
            self.model.is_some(),
            self.drag.is_dragging(),
        );
        self.sync_model();
        outcome
    }

    /// Drop the model and any drag session.
    pub fn clear_model(&mut self) {
        self.model = None;
        self.frame = None;
        self.drag = DragController::new(*self.drag.params());
        self.rotation.reset();
    }

    /// Whether the ray through `ndc` hits the model.
    #[must_use]
    pub fn hit(&self, ndc: Vec2) -> bool {
        self.model.as_ref().is_some_and(|model| {
            ModelHit {
                camera: &self.camera,
                model,
            }
            .hit(ndc)
        })
    }

    /// Camera state.
    #[must_use]
    pub const fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The loaded model, if any.
    #[must_use]
    pub const fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    /// Model-to-world transform, if a model is loaded.
    #[must_use]
    pub fn model_matrix(&self) -> Option<Mat4> {
        self.model.as_ref().map(Model::world_matrix)
    }

    /// Orientation and spring velocity.
    #[must_use]
    pub const fn rotation(&self) -> &RotationState {
        &self.rotation
    }

    /// Drag session state.
    #[must_use]
    pub const fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    /// Camera placement from the last fit.
    #[must_use]
    pub const fn frame(&self) -> Option<ViewportFrame> {
        self.frame
    }

    /// Current area light placement.
    #[must_use]
    pub const fn area_light(&self) -> AreaLightPlacement {
        self.area_light
    }

    fn place_light(&mut self) {
        self.area_light = place_area_light(
            &self.camera,
            self.area_distance_scale,
            self.area_min_offset,
        );
    }

    fn sync_model(&mut self) {
        if let Some(model) = self.model.as_mut() {
            model.orientation = self.rotation.orientation;
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn aspect_of(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}
