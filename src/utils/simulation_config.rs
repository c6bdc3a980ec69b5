// src/utils/simulation_config.rs
use log::debug;
use crate::utils::{
    DEFAULT_SIMULATION_CONFIG,
    errors::PhysicsError
};

/// Selects how the narrow phase walks a particle's candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverMode {
    /// Resolve each pair immediately, one after the other.
    Scalar,
    /// Defer and sum the query particle's correction across a batch of candidates,
    /// using vector lanes when the CPU has them.
    Batched,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    /// Constant acceleration, +y points down the screen.
    pub gravity: (f32, f32),
    /// Velocity-proportional deceleration applied every sub-step.
    pub damping: f32,
    /// Under-relaxation of the positional collision response, in (0, 1].
    pub response_coef: f32,
    pub cell_size: f32,
    /// Fixed sub-step used by the frame stepper.
    pub time_step: f32,
    pub max_frame_time: f32,
    pub max_catch_up_steps: usize,
    pub solver_mode: SolverMode,
    pub parallel_integration: bool,
}


impl Default for SimulationConfig {
    fn default() -> Self {
        DEFAULT_SIMULATION_CONFIG
    }
}

impl SimulationConfig {
    /// Builds a config, taking every `None` from [`DEFAULT_SIMULATION_CONFIG`].
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_verlet::utils::SimulationConfig;
    ///
    /// let config = SimulationConfig::new(Some((0.0, 400.0)), None, Some(0.5), None, None)
    ///     .expect("valid config");
    /// assert_eq!(config.gravity, (0.0, 400.0));
    /// assert_eq!(config.response_coef, 0.5);
    /// assert_eq!(config.max_catch_up_steps, 3);
    /// ```
    pub fn new(
        gravity: Option<(f32, f32)>,
        damping: Option<f32>,
        response_coef: Option<f32>,
        cell_size: Option<f32>,
        time_step: Option<f32>,
    ) -> Result<Self, PhysicsError> {
        let default = DEFAULT_SIMULATION_CONFIG;
        let config = Self {
            gravity: gravity.unwrap_or(default.gravity),
            damping: damping.unwrap_or(default.damping),
            response_coef: response_coef.unwrap_or(default.response_coef),
            cell_size: cell_size.unwrap_or(default.cell_size),
            time_step: time_step.unwrap_or(default.time_step),
            ..default
        };
        config.validate()?;
        debug!("simulation config: {:?}", config);
        Ok(config)
    }

    pub fn with_solver_mode(mut self, solver_mode: SolverMode) -> Self {
        self.solver_mode = solver_mode;
        self
    }

    pub fn with_parallel_integration(mut self, enabled: bool) -> Self {
        self.parallel_integration = enabled;
        self
    }

    pub fn with_catch_up(mut self, max_catch_up_steps: usize, max_frame_time: f32) -> Self {
        self.max_catch_up_steps = max_catch_up_steps;
        self.max_frame_time = max_frame_time;
        self
    }

    /// Checks every field against the range the step pipeline can work with.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !self.gravity.0.is_finite() || !self.gravity.1.is_finite() {
            return Err(PhysicsError::InvalidCoefficient("gravity"));
        }
        if !self.damping.is_finite() || self.damping < 0.0 {
            return Err(PhysicsError::InvalidCoefficient("damping"));
        }
        if !(self.response_coef > 0.0 && self.response_coef <= 1.0) {
            return Err(PhysicsError::InvalidCoefficient("response_coef"));
        }
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(PhysicsError::InvalidCellSize);
        }
        if !self.time_step.is_finite() || self.time_step <= 0.0 {
            return Err(PhysicsError::InvalidTimeStep);
        }
        if !self.max_frame_time.is_finite() || self.max_frame_time <= 0.0 {
            return Err(PhysicsError::InvalidTimeStep);
        }
        if self.max_catch_up_steps == 0 {
            return Err(PhysicsError::InvalidCoefficient("max_catch_up_steps"));
        }
        Ok(())
    }
}
