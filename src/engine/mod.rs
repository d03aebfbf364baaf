//! GPU-backed viewer engine: a [`Stage`] plus the wgpu resources that draw
//! it.

use std::path::Path;

use crate::camera::controller::CameraController;
use crate::error::TiltError;
use crate::gpu::render_context::RenderContext;
use crate::input::{DragResponse, PointerEvent, PointerHost};
use crate::lighting::{Lighting, LightingUniform};
use crate::motion::TickOutcome;
use crate::options::Options;
use crate::renderer::ModelRenderer;
use crate::scene::{load_model, Model};
use crate::stage::Stage;
use crate::util::frame_timing::FrameTiming;

/// The rendering engine for the single-model viewer.
///
/// # Frame loop
///
/// Each frame, call [`render`](Self::render) to advance the spring return,
/// draw, and present. Call [`resize`](Self::resize) when the window size
/// changes. Pointer input is forwarded via
/// [`handle_pointer`](Self::handle_pointer).
pub struct ViewerEngine {
    /// Core wgpu device, queue, and surface.
    pub context: RenderContext,
    stage: Stage,
    camera_controller: CameraController,
    lighting: Lighting,
    renderer: ModelRenderer,
    frame_timing: FrameTiming,
}

impl ViewerEngine {
    /// Engine for `window`, whose client area is `physical_size` device
    /// pixels at `scale_factor`. No model is loaded yet.
    ///
    /// # Errors
    ///
    /// Returns [`TiltError::Gpu`] if GPU initialization fails.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        physical_size: (u32, u32),
        scale_factor: f64,
        options: &Options,
    ) -> Result<Self, TiltError> {
        let context = RenderContext::new(
            window,
            physical_size,
            scale_factor,
            options.camera.max_pixel_ratio,
        )
        .await?;
        Ok(Self::new_from_context(context, physical_size, options))
    }

    /// Engine from a pre-built [`RenderContext`].
    #[must_use]
    pub fn new_from_context(
        context: RenderContext,
        physical_size: (u32, u32),
        options: &Options,
    ) -> Self {
        let stage = Stage::new(options, physical_size.0, physical_size.1);
        let camera_controller =
            CameraController::new(&context.device, stage.camera());

        let mut uniform =
            LightingUniform::from_options(&options.lighting, &options.debug);
        uniform.set_area_light(&stage.area_light());
        let lighting = Lighting::new(&context.device, uniform);

        let background = if context.format().is_srgb() {
            options.lighting.background_linear()
        } else {
            options.lighting.background_rgb()
        };
        let renderer = ModelRenderer::new(
            &context,
            &camera_controller.layout,
            &lighting.layout,
            background,
        );

        Self {
            context,
            stage,
            camera_controller,
            lighting,
            renderer,
            frame_timing: FrameTiming::new(),
        }
    }

    /// Load a glTF/GLB file and show it.
    ///
    /// # Errors
    ///
    /// Returns [`TiltError::AssetLoad`] or [`TiltError::Io`] if the file
    /// cannot be imported. The engine keeps running without a model.
    pub fn load_model(&mut self, path: impl AsRef<Path>) -> Result<(), TiltError> {
        let model = load_model(path)?;
        self.set_model(model);
        Ok(())
    }

    /// Show an already-built model, framing the camera on it.
    pub fn set_model(&mut self, model: Model) {
        self.renderer.upload_mesh(&self.context.device, model.mesh());
        let _ = self.stage.set_model(model);
        self.sync_gpu();
    }

    /// Headless viewer state.
    #[must_use]
    pub const fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Forward a pointer event to the drag controller.
    pub fn handle_pointer(
        &mut self,
        event: &PointerEvent,
        host: &mut dyn PointerHost,
    ) -> DragResponse {
        self.stage.handle_pointer(event, host)
    }

    /// Resize the surface and refit the camera. `physical` is the window's
    /// client size in device pixels.
    pub fn resize(&mut self, physical: (u32, u32)) {
        if physical.0 == 0 || physical.1 == 0 {
            return;
        }
        self.context.resize(physical);
        let (width, height) = self.context.size();
        self.renderer.resize(&self.context.device, width, height);
        self.stage.resize(physical.0, physical.1);
        self.sync_gpu();
    }

    /// The window moved to a display with a different DPI.
    pub fn set_scale_factor(&mut self, scale_factor: f64, physical: (u32, u32)) {
        self.context.set_scale_factor(scale_factor);
        self.resize(physical);
    }

    /// Advance the spring return by `raw_dt` seconds and upload the result.
    pub fn update(&mut self, raw_dt: f32) -> TickOutcome {
        let outcome = self.stage.tick(raw_dt);
        self.sync_gpu();
        outcome
    }

    /// Advance one frame of wall time, draw, and present.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if no swapchain texture could be
    /// acquired.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let dt = self.frame_timing.next_frame();
        let _ = self.update(dt);

        let frame = self.context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.context.create_encoder();
        self.renderer.draw(
            &mut encoder,
            &view,
            &self.camera_controller.bind_group,
            &self.lighting.bind_group,
        );
        self.context.submit(encoder);
        frame.present();
        Ok(())
    }

    fn sync_gpu(&mut self) {
        let queue = &self.context.queue;
        self.camera_controller.update_gpu(queue, self.stage.camera());
        self.lighting.uniform.set_area_light(&self.stage.area_light());
        self.lighting.update_gpu(queue);
        if let Some(matrix) = self.stage.model_matrix() {
            self.renderer.update_transform(queue, matrix);
        }
    }
}
