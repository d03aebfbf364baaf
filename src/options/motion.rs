use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::motion::RestPose;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Motion", inline)]
#[serde(default)]
/// Drag sensitivity, angular limits, and spring-return constants.
pub struct MotionOptions {
    /// Spring stiffness (higher = snaps back faster).
    #[schemars(title = "Stiffness", range(min = 10.0, max = 400.0), extend("step" = 1.0))]
    pub stiffness: f32,
    /// Spring damping (lower = springier, more bounce).
    #[schemars(title = "Damping", range(min = 0.5, max = 40.0), extend("step" = 0.5))]
    pub damping: f32,
    /// Angle distance from rest below which an axis may snap.
    #[schemars(skip)]
    pub settle_angle: f32,
    /// Speed below which an axis may snap.
    #[schemars(skip)]
    pub settle_velocity: f32,
    /// Frame delta ceiling in seconds.
    #[schemars(skip)]
    pub max_dt: f32,
    /// Largest deviation from rest on any axis, in degrees.
    #[schemars(title = "Max Tilt", range(min = 0.0, max = 90.0), extend("step" = 1.0))]
    pub max_deviation_deg: f32,
    /// Radians of rotation per pixel of drag.
    #[schemars(title = "Rotate Speed", range(min = 0.001, max = 0.03), extend("step" = 0.001))]
    pub rotate_speed: f32,
    /// Fraction of the yaw delta applied as roll.
    #[schemars(title = "Roll Coupling", range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub roll_coupling: f32,
    /// Rest pose `[x, y, z]` in degrees.
    #[schemars(skip)]
    pub rest_deg: [f32; 3],
}

impl Default for MotionOptions {
    fn default() -> Self {
        Self {
            stiffness: 120.0,
            damping: 7.0,
            settle_angle: 0.0005,
            settle_velocity: 0.0005,
            max_dt: 0.033,
            max_deviation_deg: 40.0,
            rotate_speed: 0.007,
            roll_coupling: 0.35,
            rest_deg: [10.0, 0.0, 0.0],
        }
    }
}

impl MotionOptions {
    /// Angular limit around rest, in radians.
    #[must_use]
    pub fn max_deviation(&self) -> f32 {
        self.max_deviation_deg.max(0.0).to_radians()
    }

    /// Rest pose in radians.
    #[must_use]
    pub fn rest_pose(&self) -> RestPose {
        RestPose::from_degrees(self.rest_deg)
    }
}
