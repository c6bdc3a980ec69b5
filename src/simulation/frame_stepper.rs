use log::warn;
use crate::simulation::PhysicsWorld;
use crate::utils::{PhysicsError, SimulationConfig};

/// Fixed-timestep accumulator that turns variable frame times into whole sub-steps.
///
/// Each frame adds its (clamped) duration to the accumulator and drains it in
/// `time_step` increments, running at most `max_catch_up_steps` sub-steps. When the cap is
/// reached, whatever time is left is thrown away instead of being carried into the next
/// frame, so one slow frame cannot snowball into a run of slower ones.
///
/// # Examples
///
/// ```
/// use rs_verlet::simulation::FrameStepper;
///
/// let mut stepper = FrameStepper::new(0.01, 3, 0.25).expect("valid stepper");
/// assert_eq!(stepper.plan_substeps(0.025), 2);
/// assert!((stepper.accumulator() - 0.005).abs() < 1e-6);
///
/// // A long frame hits the cap and drops the backlog.
/// assert_eq!(stepper.plan_substeps(0.2), 3);
/// assert_eq!(stepper.accumulator(), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FrameStepper {
    accumulator: f64,
    time_step: f64,
    max_catch_up_steps: usize,
    max_frame_time: f64,
}

impl FrameStepper {
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidTimeStep`] for a non-positive `time_step` or
    /// `max_frame_time`, and [`PhysicsError::InvalidCoefficient`] if `max_catch_up_steps`
    /// is zero.
    pub fn new(time_step: f32, max_catch_up_steps: usize, max_frame_time: f32) -> Result<Self, PhysicsError> {
        if !time_step.is_finite() || time_step <= 0.0 || !max_frame_time.is_finite() || max_frame_time <= 0.0 {
            return Err(PhysicsError::InvalidTimeStep);
        }
        if max_catch_up_steps == 0 {
            return Err(PhysicsError::InvalidCoefficient("max_catch_up_steps"));
        }
        Ok(Self {
            accumulator: 0.0,
            time_step: time_step as f64,
            max_catch_up_steps,
            max_frame_time: max_frame_time as f64,
        })
    }

    pub fn from_config(config: &SimulationConfig) -> Result<Self, PhysicsError> {
        Self::new(config.time_step, config.max_catch_up_steps, config.max_frame_time)
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Preloads the accumulator, for hosts that track elapsed time themselves.
    pub fn set_accumulator(&mut self, accumulator: f64) {
        self.accumulator = accumulator.max(0.0);
    }

    pub fn time_step(&self) -> f32 {
        self.time_step as f32
    }

    /// Fraction of a sub-step left in the accumulator, for interpolating rendered positions.
    pub fn interpolation_alpha(&self) -> f32 {
        (self.accumulator / self.time_step) as f32
    }

    /// Adds `frame_time` and drains the accumulator; returns how many sub-steps to run.
    pub fn plan_substeps(&mut self, frame_time: f64) -> usize {
        if frame_time.is_finite() && frame_time > 0.0 {
            self.accumulator += frame_time.min(self.max_frame_time);
        }
        self.drain()
    }

    fn drain(&mut self) -> usize {
        let mut steps = 0;
        while self.accumulator >= self.time_step {
            if steps == self.max_catch_up_steps {
                warn!(
                    "frame stepper hit {} catch-up steps, discarding {:.4}s",
                    self.max_catch_up_steps, self.accumulator
                );
                self.accumulator = 0.0;
                break;
            }
            self.accumulator -= self.time_step;
            steps += 1;
        }
        steps
    }

    /// Adds `frame_time` and runs the resulting sub-steps on `world`; returns how many ran.
    ///
    /// # Errors
    ///
    /// Propagates the first error from [`PhysicsWorld::step`].
    pub fn advance(&mut self, world: &mut PhysicsWorld, frame_time: f64) -> Result<usize, PhysicsError> {
        let steps = self.plan_substeps(frame_time);
        let dt = self.time_step();
        for _ in 0..steps {
            world.step(dt)?;
        }
        Ok(steps)
    }
}
