use crate::utils::{SimulationConfig, SolverMode};

/// Guard used before dividing by a contact distance.
pub const EPSILON: f32 = 1e-6;

/// Soft boundary offset as a fraction of the particle radius.
pub const SOFT_BOUNDARY_FACTOR: f32 = 0.1;

/// Hard clamp offset as a fraction of the particle radius.
pub const HARD_BOUNDARY_FACTOR: f32 = 0.5;

pub const DEFAULT_PARTICLE_RADIUS: f32 = 1.5;
pub const MAX_PARTICLE_RADIUS: f32 = 10.0;
pub const DEFAULT_MAX_PARTICLES: usize = 100_000;

pub const DEFAULT_SIMULATION_CONFIG: SimulationConfig = SimulationConfig {
    gravity: (0.0, 500.0),
    damping: 0.0,
    response_coef: 0.75,
    cell_size: 4.0,
    time_step: 1.0 / 165.0,
    max_frame_time: 0.25,
    max_catch_up_steps: 3,
    solver_mode: SolverMode::Batched,
    parallel_integration: false,
};
