use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Debug visualization toggles.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[schemars(title = "Debug", inline)]
#[serde(default)]
pub struct DebugOptions {
    /// Shade the model with its surface normals as RGB.
    #[schemars(title = "Show Normals")]
    pub show_normals: bool,
    /// Log every pointer transition at debug level.
    #[schemars(title = "Trace Pointer")]
    pub trace_pointer: bool,
}
