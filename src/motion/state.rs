use glam::{EulerRot, Quat};

/// Model orientation as three Euler angles in radians.
///
/// Angles compose as yaw (Y), then pitch (X), then roll (Z). The order is
/// part of the interaction feel: horizontal drags yaw around the world-up
/// axis no matter how far the model is pitched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    /// Pitch.
    pub x: f32,
    /// Yaw.
    pub y: f32,
    /// Roll.
    pub z: f32,
}

impl Orientation {
    /// Build from per-axis angles.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// `[x, y, z]`.
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Inverse of [`to_array`](Self::to_array).
    #[must_use]
    pub fn from_array([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }

    /// Rotation quaternion for the Y·X·Z composition.
    #[must_use]
    pub fn to_quat(self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.y, self.x, self.z)
    }
}

/// Per-axis angular velocity in radians per second.
///
/// Only the spring integrator reads it; a new drag always zeroes it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AngularVelocity {
    /// About X.
    pub x: f32,
    /// About Y.
    pub y: f32,
    /// About Z.
    pub z: f32,
}

impl AngularVelocity {
    /// All axes at rest.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// `[x, y, z]`.
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Inverse of [`to_array`](Self::to_array).
    #[must_use]
    pub fn from_array([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

/// Orientation the model springs back to. Fixed for the viewer lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestPose(Orientation);

impl RestPose {
    /// Rest pose from angles in radians.
    #[must_use]
    pub const fn new(orientation: Orientation) -> Self {
        Self(orientation)
    }

    /// Rest pose from `[x, y, z]` in degrees.
    #[must_use]
    pub fn from_degrees(deg: [f32; 3]) -> Self {
        Self(Orientation::new(
            deg[0].to_radians(),
            deg[1].to_radians(),
            deg[2].to_radians(),
        ))
    }

    /// Target angles.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.0
    }
}

impl Default for RestPose {
    /// Tipped 10° toward the viewer, no yaw or roll.
    fn default() -> Self {
        Self::from_degrees([10.0, 0.0, 0.0])
    }
}

/// Rotational state shared by the drag controller and the animation driver.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationState {
    /// Current orientation.
    pub orientation: Orientation,
    /// Current spring velocity.
    pub velocity: AngularVelocity,
    rest: RestPose,
}

impl RotationState {
    /// Start at rest with zero velocity.
    #[must_use]
    pub fn at_rest(rest: RestPose) -> Self {
        Self {
            orientation: rest.orientation(),
            velocity: AngularVelocity::ZERO,
            rest,
        }
    }

    /// The pose this state springs back to.
    #[must_use]
    pub fn rest(&self) -> RestPose {
        self.rest
    }

    /// Whether every axis sits exactly on rest with zero velocity.
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.orientation == self.rest.orientation()
            && self.velocity == AngularVelocity::ZERO
    }

    /// Put the model back at rest, discarding velocity.
    pub fn reset(&mut self) {
        self.orientation = self.rest.orientation();
        self.velocity = AngularVelocity::ZERO;
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::at_rest(RestPose::default())
    }
}
