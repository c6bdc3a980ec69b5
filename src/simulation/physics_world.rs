//! The per-step physics pipeline.
//!
//! A step integrates every particle (clamping each one to the boundary as it goes),
//! rebuilds the uniform grid from the new positions, resolves the overlaps the grid
//! reports, and finally hard-clamps anything the contacts pushed through a wall.
//!
//! Once [`PhysicsWorld::step`] returns, the particle arrays are stable and can be read by
//! a renderer until the next step.
//!
//! # Example
//!
//! ```
//! use rs_verlet::simulation::PhysicsWorld;
//! use rs_verlet::utils::SimulationConfig;
//!
//! let mut world = PhysicsWorld::new(SimulationConfig::default()).expect("valid config");
//! world.set_boundary((0.0, 0.0), (320.0, 180.0)).expect("valid boundary");
//!
//! // Index 0 is the anchor; the rest fall under gravity.
//! world.add_particle((20.0, 20.0), (20.0, 20.0), 5.0).expect("anchor");
//! world.add_particle((160.0, 90.0), (160.0, 90.0), 2.0).expect("particle");
//!
//! let stats = world.step(1.0 / 165.0).expect("step");
//! assert_eq!(stats.particles, 2);
//! assert!(world.particles().positions_y()[1] > 90.0);
//! ```
use std::time::{Duration, Instant};
use log::{debug, trace};
use crate::collisions::CollisionSolver;
use crate::dynamics::{confine_particles, Boundary, VerletIntegrator};
use crate::particles::{ParticleStore, ANCHOR_INDEX};
use crate::spatial::UniformGrid;
use crate::utils::{PhysicsError, SimulationConfig};

/// Counters and timings from the most recent step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepStats {
    pub particles: usize,
    pub candidate_pairs: usize,
    pub contacts: usize,
    pub integrate_time: Duration,
    pub grid_time: Duration,
    pub collision_time: Duration,
}

impl StepStats {
    pub fn total_time(&self) -> Duration {
        self.integrate_time + self.grid_time + self.collision_time
    }
}

#[derive(Debug, Clone)]
pub struct PhysicsWorld {
    config: SimulationConfig,
    boundary: Boundary,
    particles: ParticleStore,
    grid: UniformGrid,
    integrator: VerletIntegrator,
    solver: CollisionSolver,
    last_stats: StepStats,
}

impl PhysicsWorld {
    /// Creates an empty world with a 1920x1080 boundary at the origin.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` does not validate.
    pub fn new(config: SimulationConfig) -> Result<Self, PhysicsError> {
        config.validate()?;
        Ok(Self {
            config,
            boundary: Boundary::new((0.0, 0.0), (1920.0, 1080.0))?,
            particles: ParticleStore::new(),
            grid: UniformGrid::new(config.cell_size)?,
            integrator: VerletIntegrator::from_config(&config),
            solver: CollisionSolver::new(config.response_coef, config.solver_mode)?,
            last_stats: StepStats::default(),
        })
    }

    /// Like [`PhysicsWorld::new`] with room for `capacity` particles reserved up front.
    pub fn with_capacity(config: SimulationConfig, capacity: usize) -> Result<Self, PhysicsError> {
        let mut world = Self::new(config)?;
        world.particles.reserve(capacity)?;
        Ok(world)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    /// Replaces the simulation domain. Called by the host whenever the window resizes.
    pub fn set_boundary(&mut self, min: (f32, f32), max: (f32, f32)) -> Result<(), PhysicsError> {
        let boundary = Boundary::new(min, max)?;
        if boundary != self.boundary {
            debug!("boundary set to {:?} - {:?}", min, max);
        }
        self.boundary = boundary;
        Ok(())
    }

    /// Appends a particle; the first one added becomes the anchor.
    pub fn add_particle(&mut self, pos: (f32, f32), prev_pos: (f32, f32), radius: f32) -> Result<usize, PhysicsError> {
        self.particles.add_particle(pos, prev_pos, radius)
    }

    /// Swap-removes particle `index`; indices held by the caller may now name a different
    /// particle. Out-of-range indices are ignored.
    pub fn remove_particle(&mut self, index: usize) {
        self.particles.remove_particle(index);
    }

    /// Moves the anchor to `pos` without giving it any velocity.
    pub fn set_anchor_position(&mut self, pos: (f32, f32)) {
        self.particles.set_curr_pos(ANCHOR_INDEX, pos);
        self.particles.set_prev_pos(ANCHOR_INDEX, pos);
    }

    pub fn particles(&self) -> &ParticleStore {
        &self.particles
    }

    /// Mutable access for hosts that edit particles between steps.
    pub fn particles_mut(&mut self) -> &mut ParticleStore {
        &mut self.particles
    }

    pub fn grid(&self) -> &UniformGrid {
        &self.grid
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn last_stats(&self) -> StepStats {
        self.last_stats
    }

    /// Runs one sub-step of length `dt`.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidTimeStep`] unless `dt` is positive and finite; the
    /// particles are left untouched in that case.
    pub fn step(&mut self, dt: f32) -> Result<StepStats, PhysicsError> {
        let started = clock();
        if self.config.parallel_integration {
            self.integrator.integrate_parallel(&mut self.particles, dt, &self.boundary)?;
        } else {
            self.integrator.integrate(&mut self.particles, dt, &self.boundary)?;
        }
        let integrated = clock();

        self.grid.rebuild(&self.particles);
        let gridded = clock();

        let solved = self.solver.solve(&mut self.particles, &self.grid);
        confine_particles(&mut self.particles, &self.boundary);
        let finished = clock();

        let stats = StepStats {
            particles: self.particles.len(),
            candidate_pairs: solved.candidate_pairs,
            contacts: solved.contacts,
            integrate_time: elapsed(started, integrated),
            grid_time: elapsed(integrated, gridded),
            collision_time: elapsed(gridded, finished),
        };
        trace!(
            "step: {} particles, {} candidate pairs, {} contacts, verlet {:?}, grid {:?}, collisions {:?}",
            stats.particles, stats.candidate_pairs, stats.contacts,
            stats.integrate_time, stats.grid_time, stats.collision_time
        );
        self.last_stats = stats;
        Ok(stats)
    }
}

/// `Instant::now` panics on `wasm32-unknown-unknown`, so timings read zero there.
fn clock() -> Option<Instant> {
    if cfg!(target_arch = "wasm32") {
        None
    } else {
        Some(Instant::now())
    }
}

fn elapsed(from: Option<Instant>, to: Option<Instant>) -> Duration {
    match (from, to) {
        (Some(from), Some(to)) => to.duration_since(from),
        _ => Duration::ZERO,
    }
}
