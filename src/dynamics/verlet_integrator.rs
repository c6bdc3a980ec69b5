//! Position Verlet integration for every particle in a [`ParticleStore`].
//!
//! Velocity is implicit: it is the difference between the current and previous position.
//! Each sub-step applies gravity and a velocity-proportional damping term, then clamps the
//! particle to the simulation boundary before the next particle is touched, so no particle
//! is ever left outside the domain between sub-steps.
//!
//! The anchor particle (index 0) is not integrated: the host drives it directly. It is
//! still clamped.
//!
//! With the `parallel` feature, [`VerletIntegrator::integrate_parallel`] spreads the same
//! per-particle update over the Rayon thread pool. Particles do not interact during
//! integration, so the result is identical to the sequential path.
use crate::dynamics::{clamp_position, Boundary};
use crate::particles::{ParticleStore, ANCHOR_INDEX};
use crate::utils::{PhysicsError, SimulationConfig};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerletIntegrator {
    pub gravity: (f32, f32),
    pub damping: f32,
    /// Response used for the soft boundary contact.
    pub response_coef: f32,
}

impl VerletIntegrator {
    pub fn new(gravity: (f32, f32), damping: f32, response_coef: f32) -> Self {
        Self { gravity, damping, response_coef }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.gravity, config.damping, config.response_coef)
    }

    /// Advances every non-anchor particle by one sub-step of length `dt`.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidTimeStep`] unless `dt` is positive and finite.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_verlet::dynamics::{Boundary, VerletIntegrator};
    /// use rs_verlet::particles::ParticleStore;
    ///
    /// let mut store = ParticleStore::new();
    /// store.add_particle((0.0, 0.0), (0.0, 0.0), 1.0).expect("anchor");
    /// store.add_particle((50.0, 50.0), (50.0, 50.0), 1.0).expect("particle");
    ///
    /// let boundary = Boundary::new((0.0, 0.0), (100.0, 100.0)).expect("valid boundary");
    /// let integrator = VerletIntegrator::new((0.0, 400.0), 0.0, 0.75);
    /// integrator.integrate(&mut store, 1.0 / 165.0, &boundary).expect("valid step");
    ///
    /// let (_, y) = store.curr_pos(1).expect("particle 1");
    /// assert!((y - 50.0 - 400.0 / (165.0 * 165.0)).abs() < 1e-4);
    /// ```
    pub fn integrate(&self, store: &mut ParticleStore, dt: f32, boundary: &Boundary) -> Result<(), PhysicsError> {
        validate_dt(dt)?;
        let dt2 = dt * dt;
        for index in 0..store.len() {
            let (x, y, px, py) = self.advance(
                index,
                (store.curr_x[index], store.curr_y[index]),
                (store.prev_x[index], store.prev_y[index]),
                store.radius[index],
                dt2,
                boundary,
            );
            store.curr_x[index] = x;
            store.curr_y[index] = y;
            store.prev_x[index] = px;
            store.prev_y[index] = py;
        }
        Ok(())
    }

    /// Same result as [`VerletIntegrator::integrate`], computed on the Rayon thread pool.
    ///
    /// Without the `parallel` feature this runs sequentially.
    pub fn integrate_parallel(&self, store: &mut ParticleStore, dt: f32, boundary: &Boundary) -> Result<(), PhysicsError> {
        validate_dt(dt)?;

        #[cfg(feature = "parallel")]
        {
            let dt2 = dt * dt;
            store.curr_x
                .par_iter_mut()
                .zip(store.curr_y.par_iter_mut())
                .zip(store.prev_x.par_iter_mut())
                .zip(store.prev_y.par_iter_mut())
                .zip(store.radius.par_iter())
                .enumerate()
                .for_each(|(index, ((((x, y), px), py), &radius))| {
                    let (nx, ny, npx, npy) = self.advance(index, (*x, *y), (*px, *py), radius, dt2, boundary);
                    *x = nx;
                    *y = ny;
                    *px = npx;
                    *py = npy;
                });
        }

        #[cfg(not(feature = "parallel"))]
        {
            self.integrate(store, dt, boundary)?;
        }
        Ok(())
    }

    /// One particle's update; returns `(curr_x, curr_y, prev_x, prev_y)`.
    #[inline]
    fn advance(
        &self,
        index: usize,
        curr: (f32, f32),
        prev: (f32, f32),
        radius: f32,
        dt2: f32,
        boundary: &Boundary,
    ) -> (f32, f32, f32, f32) {
        let (curr, prev) = if index == ANCHOR_INDEX {
            (curr, prev)
        } else {
            let vel = (curr.0 - prev.0, curr.1 - prev.1);
            let next = (
                curr.0 + vel.0 + (self.gravity.0 - vel.0 * self.damping) * dt2,
                curr.1 + vel.1 + (self.gravity.1 - vel.1 * self.damping) * dt2,
            );
            (next, curr)
        };
        let (x, y) = clamp_position(curr, radius, boundary, self.response_coef);
        (x, y, prev.0, prev.1)
    }
}

fn validate_dt(dt: f32) -> Result<(), PhysicsError> {
    if !dt.is_finite() || dt <= 0.0 {
        return Err(PhysicsError::InvalidTimeStep);
    }
    Ok(())
}
