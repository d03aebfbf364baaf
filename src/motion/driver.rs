//! Per-frame spring update for all three rotation axes.

use super::spring::{clamp_angle, SpringParams, DEFAULT_MAX_DEVIATION};
use super::state::{AngularVelocity, Orientation, RotationState};
use crate::options::MotionOptions;

/// Frame delta ceiling in seconds.
pub const DEFAULT_MAX_DT: f32 = 0.033;

/// What the driver did on a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Springs advanced; orientation and velocity were committed.
    Advanced,
    /// A drag is active or there is no model. Velocity stays frozen.
    Skipped,
}

/// Advances the three spring axes toward the rest pose while idle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationDriver {
    spring: SpringParams,
    max_deviation: f32,
    max_dt: f32,
}

impl Default for AnimationDriver {
    fn default() -> Self {
        Self {
            spring: SpringParams::default(),
            max_deviation: DEFAULT_MAX_DEVIATION,
            max_dt: DEFAULT_MAX_DT,
        }
    }
}

impl From<&MotionOptions> for AnimationDriver {
    fn from(opts: &MotionOptions) -> Self {
        Self {
            spring: SpringParams::from(opts),
            max_deviation: opts.max_deviation(),
            max_dt: opts.max_dt,
        }
    }
}

impl AnimationDriver {
    /// Spring constants in use.
    #[must_use]
    pub fn spring(&self) -> &SpringParams {
        &self.spring
    }

    /// Clamp a raw wall-clock delta to `[0, max_dt]`.
    #[must_use]
    pub fn clamp_dt(&self, raw_dt: f32) -> f32 {
        if raw_dt.is_finite() {
            raw_dt.clamp(0.0, self.max_dt)
        } else {
            0.0
        }
    }

    /// Run one frame.
    ///
    /// `raw_dt` is the unclamped wall-clock delta. When `model_loaded` is
    /// false or `dragging` is true the state is left untouched.
    pub fn tick(
        &self,
        state: &mut RotationState,
        raw_dt: f32,
        model_loaded: bool,
        dragging: bool,
    ) -> TickOutcome {
        if !model_loaded || dragging {
            return TickOutcome::Skipped;
        }
        let dt = self.clamp_dt(raw_dt);
        let (orientation, velocity) = self.advance(state, dt);
        // All three axes are committed together.
        state.orientation = orientation;
        state.velocity = velocity;
        TickOutcome::Advanced
    }

    /// Compute the next orientation and velocity without committing them.
    #[must_use]
    pub fn advance(
        &self,
        state: &RotationState,
        dt: f32,
    ) -> (Orientation, AngularVelocity) {
        let angles = state.orientation.to_array();
        let velocities = state.velocity.to_array();
        let targets = state.rest().orientation().to_array();

        let mut next_angles = [0.0; 3];
        let mut next_velocities = [0.0; 3];
        for axis in 0..3 {
            (next_angles[axis], next_velocities[axis]) =
                self.step_axis(angles[axis], velocities[axis], targets[axis], dt);
        }
        (
            Orientation::from_array(next_angles),
            AngularVelocity::from_array(next_velocities),
        )
    }

    /// Step, clamp, then snap a single axis.
    ///
    /// An axis that already satisfies the snap rule lands on its target
    /// without integrating, which makes rest a fixed point.
    fn step_axis(
        &self,
        angle: f32,
        velocity: f32,
        target: f32,
        dt: f32,
    ) -> (f32, f32) {
        if self.spring.is_settled(angle, velocity, target) {
            return (target, 0.0);
        }
        let (angle, velocity) = self.spring.step(angle, velocity, target, dt);
        let angle = clamp_angle(angle, target, self.max_deviation);
        self.spring.settle(angle, velocity, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::state::RestPose;

    const DT: f32 = 1.0 / 60.0;

    fn displaced(y: f32, vy: f32) -> RotationState {
        let mut state = RotationState::at_rest(RestPose::default());
        state.orientation.y = y;
        state.velocity.y = vy;
        state
    }

    #[test]
    fn dt_is_clamped() {
        let driver = AnimationDriver::default();
        assert_eq!(driver.clamp_dt(0.5), DEFAULT_MAX_DT);
        assert_eq!(driver.clamp_dt(0.01), 0.01);
        assert_eq!(driver.clamp_dt(-1.0), 0.0);
        assert_eq!(driver.clamp_dt(f32::NAN), 0.0);
    }

    #[test]
    fn skipped_while_dragging_keeps_velocity_frozen() {
        let driver = AnimationDriver::default();
        let mut state = displaced(0.3, 1.5);
        let before = state.clone();
        assert_eq!(driver.tick(&mut state, DT, true, true), TickOutcome::Skipped);
        assert_eq!(state, before);
    }

    #[test]
    fn skipped_without_model() {
        let driver = AnimationDriver::default();
        let mut state = displaced(0.3, 0.0);
        let before = state.clone();
        assert_eq!(
            driver.tick(&mut state, DT, false, false),
            TickOutcome::Skipped
        );
        assert_eq!(state, before);
    }

    #[test]
    fn idle_tick_moves_toward_rest() {
        let driver = AnimationDriver::default();
        let mut state = displaced(0.3, 0.0);
        assert_eq!(
            driver.tick(&mut state, DT, true, false),
            TickOutcome::Advanced
        );
        assert!(state.orientation.y < 0.3);
        assert!(state.velocity.y < 0.0);
    }

    #[test]
    fn huge_frame_gap_is_clamped() {
        let driver = AnimationDriver::default();
        let mut clamped = displaced(0.3, 0.0);
        let mut reference = displaced(0.3, 0.0);
        let _ = driver.tick(&mut clamped, 5.0, true, false);
        let _ = driver.tick(&mut reference, DEFAULT_MAX_DT, true, false);
        assert_eq!(clamped, reference);
    }

    #[test]
    fn overshoot_is_bounded_by_max_deviation() {
        let driver = AnimationDriver::default();
        let mut state = displaced(0.0, 500.0);
        let _ = driver.tick(&mut state, DT, true, false);
        assert!(state.orientation.y <= DEFAULT_MAX_DEVIATION + 1e-6);
    }

    #[test]
    fn settled_state_snaps_in_one_tick_and_stays() {
        let driver = AnimationDriver::default();
        let rest_y = 0.0;
        let mut state = displaced(rest_y + 0.00049, -0.00049);
        let _ = driver.tick(&mut state, DT, true, false);
        assert_eq!(state.orientation.y, rest_y);
        assert_eq!(state.velocity.y, 0.0);
        assert!(state.is_at_rest());

        for _ in 0..10 {
            let _ = driver.tick(&mut state, DT, true, false);
            assert!(state.is_at_rest());
        }
    }

    #[test]
    fn released_axis_reaches_rest_exactly() {
        let driver = AnimationDriver::default();
        let mut state = displaced(DEFAULT_MAX_DEVIATION, 0.0);
        let mut frames = 0;
        while !state.is_at_rest() {
            let _ = driver.tick(&mut state, DT, true, false);
            frames += 1;
            assert!(frames < 2_000, "spring never settled");
        }
        assert_eq!(state.orientation.y, 0.0);
    }
}
