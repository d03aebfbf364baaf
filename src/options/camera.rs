use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Camera projection and auto-framing parameters.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    #[schemars(title = "Field of View", range(min = 20.0, max = 90.0), extend("step" = 1.0))]
    pub fovy: f32,
    /// Multiplier applied to the fit distance so the model does not touch
    /// the viewport edges.
    #[schemars(title = "Framing Padding", range(min = 1.0, max = 2.0), extend("step" = 0.01))]
    pub padding: f32,
    /// Near plane as a fraction of the camera distance.
    #[schemars(skip)]
    pub near_ratio: f32,
    /// Lower bound for the near plane.
    #[schemars(skip)]
    pub min_near: f32,
    /// Far plane as a multiple of the camera distance.
    #[schemars(skip)]
    pub far_ratio: f32,
    /// Cap on the device pixel ratio used for the render surface.
    #[schemars(skip)]
    pub max_pixel_ratio: f64,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 45.0,
            padding: 1.08,
            near_ratio: 0.001,
            min_near: 0.001,
            far_ratio: 1000.0,
            max_pixel_ratio: 2.0,
        }
    }
}
