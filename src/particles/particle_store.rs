//! Structure-of-arrays storage for every live particle in a simulation.
//!
//! Each particle is a current position, a previous position and a radius. Velocity is
//! never stored: the Verlet integrator derives it from the two positions. The arrays are
//! kept at identical lengths at all times and are handed to the renderer as read-only
//! slices once a step has completed.
//!
//! Index 0 is the anchor: the integrator leaves it alone and the host moves it directly
//! (for example to follow a pointer).
//!
//! # Example
//!
//! ```
//! use rs_verlet::particles::ParticleStore;
//!
//! let mut store = ParticleStore::new();
//! let a = store.add_particle((10.0, 10.0), (10.0, 10.0), 2.0).expect("valid particle");
//! let b = store.add_particle((20.0, 10.0), (20.0, 10.0), 3.0).expect("valid particle");
//! assert_eq!((a, b), (0, 1));
//!
//! // Swap-erase: the last particle takes the removed slot.
//! store.remove_particle(0);
//! assert_eq!(store.len(), 1);
//! assert_eq!(store.radius(0), Some(3.0));
//! ```
use log::debug;
use crate::utils::{PhysicsError, MAX_PARTICLE_RADIUS};

/// Smallest capacity the store grows to when the first particle is added.
const MIN_CAPACITY: usize = 16;

/// Index reserved for the externally driven anchor particle.
pub const ANCHOR_INDEX: usize = 0;

#[derive(Debug, Clone, Default)]
pub struct ParticleStore {
    pub(crate) curr_x: Vec<f32>,
    pub(crate) curr_y: Vec<f32>,
    pub(crate) prev_x: Vec<f32>,
    pub(crate) prev_y: Vec<f32>,
    pub(crate) radius: Vec<f32>,
}

impl ParticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that can hold `capacity` particles without reallocating.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::AllocationFailed`] if the buffers cannot be allocated.
    pub fn with_capacity(capacity: usize) -> Result<Self, PhysicsError> {
        let mut store = Self::new();
        store.reserve(capacity)?;
        Ok(store)
    }

    /// Number of live particles.
    pub fn len(&self) -> usize {
        self.curr_x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curr_x.is_empty()
    }

    /// Number of particles every parallel array can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.curr_x.capacity()
            .min(self.curr_y.capacity())
            .min(self.prev_x.capacity())
            .min(self.prev_y.capacity())
            .min(self.radius.capacity())
    }

    /// Grows every array so that at least `capacity` particles fit.
    ///
    /// Does nothing if the store is already large enough. Otherwise the new capacity is
    /// at least double the old one, so repeated appends stay O(1) amortized. Live
    /// particles are preserved and the store never shrinks.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::AllocationFailed`] if any array cannot grow. The caller must
    /// treat this as fatal: the arrays are left at their previous capacity, and a store
    /// that cannot hold the requested particles must not be written past its length.
    pub fn reserve(&mut self, capacity: usize) -> Result<(), PhysicsError> {
        let current = self.capacity();
        if capacity <= current {
            return Ok(());
        }
        let target = capacity.max(current.saturating_mul(2)).max(MIN_CAPACITY);
        let additional = target - self.len();
        let failed = PhysicsError::AllocationFailed { requested: target };

        for array in [
            &mut self.curr_x,
            &mut self.curr_y,
            &mut self.prev_x,
            &mut self.prev_y,
            &mut self.radius,
        ] {
            array.try_reserve_exact(additional).map_err(|_| failed.clone())?;
        }
        debug!("particle store grew from {} to {} slots", current, self.capacity());
        Ok(())
    }

    /// Appends a particle and returns its index.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidRadius`] unless `radius` is in `(0, MAX_PARTICLE_RADIUS]`,
    /// [`PhysicsError::CalculationError`] for a non-finite position, and
    /// [`PhysicsError::AllocationFailed`] if the store cannot grow.
    pub fn add_particle(
        &mut self,
        curr_pos: (f32, f32),
        prev_pos: (f32, f32),
        radius: f32,
    ) -> Result<usize, PhysicsError> {
        // The grid files a particle under every cell it covers; unbounded radii stall it.
        if !(radius > 0.0 && radius <= MAX_PARTICLE_RADIUS) {
            return Err(PhysicsError::InvalidRadius);
        }
        let coords = [curr_pos.0, curr_pos.1, prev_pos.0, prev_pos.1];
        if coords.iter().any(|c| !c.is_finite()) {
            return Err(PhysicsError::CalculationError(
                "particle position must be finite".to_string(),
            ));
        }
        if self.len() == self.capacity() {
            self.reserve(self.len() + 1)?;
        }

        self.curr_x.push(curr_pos.0);
        self.curr_y.push(curr_pos.1);
        self.prev_x.push(prev_pos.0);
        self.prev_y.push(prev_pos.1);
        self.radius.push(radius);
        Ok(self.len() - 1)
    }

    /// Removes the particle at `index` by moving the last particle into its slot.
    ///
    /// Order is not preserved: after this call the particle that used to be last answers
    /// to `index`. Out-of-range indices are ignored.
    pub fn remove_particle(&mut self, index: usize) {
        if index >= self.len() {
            return;
        }
        self.curr_x.swap_remove(index);
        self.curr_y.swap_remove(index);
        self.prev_x.swap_remove(index);
        self.prev_y.swap_remove(index);
        self.radius.swap_remove(index);
    }

    /// Removes every particle while keeping the allocated capacity.
    pub fn clear(&mut self) {
        self.curr_x.clear();
        self.curr_y.clear();
        self.prev_x.clear();
        self.prev_y.clear();
        self.radius.clear();
    }

    pub fn curr_pos(&self, index: usize) -> Option<(f32, f32)> {
        Some((*self.curr_x.get(index)?, *self.curr_y.get(index)?))
    }

    pub fn prev_pos(&self, index: usize) -> Option<(f32, f32)> {
        Some((*self.prev_x.get(index)?, *self.prev_y.get(index)?))
    }

    pub fn radius(&self, index: usize) -> Option<f32> {
        self.radius.get(index).copied()
    }

    /// Overwrites the current position of `index`; ignored when out of range.
    pub fn set_curr_pos(&mut self, index: usize, pos: (f32, f32)) {
        if index >= self.len() {
            return;
        }
        self.curr_x[index] = pos.0;
        self.curr_y[index] = pos.1;
    }

    /// Overwrites the previous position of `index`; ignored when out of range.
    pub fn set_prev_pos(&mut self, index: usize, pos: (f32, f32)) {
        if index >= self.len() {
            return;
        }
        self.prev_x[index] = pos.0;
        self.prev_y[index] = pos.1;
    }

    pub fn positions_x(&self) -> &[f32] {
        &self.curr_x
    }

    pub fn positions_y(&self) -> &[f32] {
        &self.curr_y
    }

    pub fn previous_x(&self) -> &[f32] {
        &self.prev_x
    }

    pub fn previous_y(&self) -> &[f32] {
        &self.prev_y
    }

    pub fn radii(&self) -> &[f32] {
        &self.radius
    }

    /// Largest radius in the store, or `None` when it is empty.
    pub fn max_radius(&self) -> Option<f32> {
        self.radius.iter().copied().reduce(f32::max)
    }
}
