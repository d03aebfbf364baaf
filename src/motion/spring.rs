//! Damped harmonic spring for a single rotational degree of freedom.
//!
//! The integrator is semi-implicit Euler: velocity is advanced first and the
//! new velocity moves the angle. With the default constants the oscillator
//! is under-damped (ζ ≈ 0.32), so a released model overshoots its rest pose
//! once or twice before settling.

use crate::options::MotionOptions;

/// Default stiffness (higher = snaps back faster).
pub const DEFAULT_STIFFNESS: f32 = 120.0;
/// Default damping (lower = springier).
pub const DEFAULT_DAMPING: f32 = 7.0;
/// Angle distance from the target below which an axis may snap.
pub const DEFAULT_SETTLE_ANGLE: f32 = 0.0005;
/// Speed below which an axis may snap.
pub const DEFAULT_SETTLE_VELOCITY: f32 = 0.0005;
/// Largest allowed deviation from rest on any axis (40°).
pub const DEFAULT_MAX_DEVIATION: f32 = 40.0 * std::f32::consts::PI / 180.0;

/// Bound `angle` to `[target - max_deviation, target + max_deviation]`.
///
/// Angles already inside the range come back unchanged, so clamping is
/// idempotent.
#[inline]
#[must_use]
pub fn clamp_angle(angle: f32, target: f32, max_deviation: f32) -> f32 {
    (target - max_deviation).max((target + max_deviation).min(angle))
}

/// Constants shared by all three spring axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringParams {
    /// Restoring force per radian of displacement.
    pub stiffness: f32,
    /// Opposing force per radian/second of velocity.
    pub damping: f32,
    /// Snap threshold on `|angle - target|`.
    pub settle_angle: f32,
    /// Snap threshold on `|velocity|`.
    pub settle_velocity: f32,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            stiffness: DEFAULT_STIFFNESS,
            damping: DEFAULT_DAMPING,
            settle_angle: DEFAULT_SETTLE_ANGLE,
            settle_velocity: DEFAULT_SETTLE_VELOCITY,
        }
    }
}

impl From<&MotionOptions> for SpringParams {
    fn from(opts: &MotionOptions) -> Self {
        Self {
            stiffness: opts.stiffness,
            damping: opts.damping,
            settle_angle: opts.settle_angle,
            settle_velocity: opts.settle_velocity,
        }
    }
}

impl SpringParams {
    /// Advance one axis by `dt` seconds. Returns `(angle, velocity)`.
    ///
    /// `dt` must already be clamped by the caller; large steps make the
    /// explicit integration drift.
    #[inline]
    #[must_use]
    pub fn step(
        &self,
        angle: f32,
        velocity: f32,
        target: f32,
        dt: f32,
    ) -> (f32, f32) {
        let displacement = angle - target;
        let acc = -self.stiffness * displacement - self.damping * velocity;
        let next_velocity = velocity + acc * dt;
        let next_angle = angle + next_velocity * dt;
        (next_angle, next_velocity)
    }

    /// Whether an axis is close enough to rest to be snapped.
    #[inline]
    #[must_use]
    pub fn is_settled(&self, angle: f32, velocity: f32, target: f32) -> bool {
        (angle - target).abs() < self.settle_angle
            && velocity.abs() < self.settle_velocity
    }

    /// Apply the snap rule: settled axes land exactly on `target` with zero
    /// velocity, everything else passes through.
    #[inline]
    #[must_use]
    pub fn settle(&self, angle: f32, velocity: f32, target: f32) -> (f32, f32) {
        if self.is_settled(angle, velocity, target) {
            (target, 0.0)
        } else {
            (angle, velocity)
        }
    }
}
