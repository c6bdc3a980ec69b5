use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::particles::ParticleStore;
use crate::utils::{PhysicsError, MAX_PARTICLE_RADIUS};

/// Appends `count` particles at rest, scattered uniformly over the domain `[min, max]`.
///
/// Radii are drawn uniformly from `radius_range` (inclusive). Every particle is placed at
/// least one maximum radius away from the domain edges so that nothing starts inside the
/// boundary zone. The same `seed` always produces the same particles.
///
/// # Errors
///
/// Returns [`PhysicsError::InvalidRadius`] for an empty or non-positive radius range or
/// one reaching past `MAX_PARTICLE_RADIUS`,
/// [`PhysicsError::InvalidBoundary`] if the domain is too small to hold the largest
/// particle, and [`PhysicsError::AllocationFailed`] if the store cannot grow.
///
/// # Examples
///
/// ```
/// use rs_verlet::particles::{spawn_random, ParticleStore};
///
/// let mut store = ParticleStore::new();
/// spawn_random(&mut store, 100, (0.0, 0.0), (200.0, 100.0), (1.0, 3.0), 7)
///     .expect("Failed to spawn particles");
/// assert_eq!(store.len(), 100);
/// assert!(store.radii().iter().all(|&r| (1.0..=3.0).contains(&r)));
/// ```
pub fn spawn_random(
    store: &mut ParticleStore,
    count: usize,
    min: (f32, f32),
    max: (f32, f32),
    radius_range: (f32, f32),
    seed: u64,
) -> Result<(), PhysicsError> {
    let (r_min, r_max) = radius_range;
    if !(r_min > 0.0 && r_min <= r_max && r_max <= MAX_PARTICLE_RADIUS) {
        return Err(PhysicsError::InvalidRadius);
    }
    let lo = (min.0 + r_max, min.1 + r_max);
    let hi = (max.0 - r_max, max.1 - r_max);
    if !(lo.0 <= hi.0 && lo.1 <= hi.1) {
        return Err(PhysicsError::InvalidBoundary);
    }

    store.reserve(store.len() + count)?;
    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..count {
        let pos = (rng.random_range(lo.0..=hi.0), rng.random_range(lo.1..=hi.1));
        let radius = rng.random_range(r_min..=r_max);
        store.add_particle(pos, pos, radius)?;
    }
    Ok(())
}

/// Appends `count` particles of equal `radius` at rest on a square lattice.
///
/// Rows are filled left to right starting at `origin`, `columns` particles per row, with
/// `spacing` between neighbouring centers.
pub fn spawn_grid(
    store: &mut ParticleStore,
    count: usize,
    origin: (f32, f32),
    spacing: f32,
    columns: usize,
    radius: f32,
) -> Result<(), PhysicsError> {
    if columns == 0 {
        return Err(PhysicsError::CalculationError("columns must be > 0".to_string()));
    }
    if !spacing.is_finite() || spacing <= 0.0 {
        return Err(PhysicsError::CalculationError("spacing must be positive".to_string()));
    }

    store.reserve(store.len() + count)?;
    for n in 0..count {
        let col = (n % columns) as f32;
        let row = (n / columns) as f32;
        let pos = (origin.0 + col * spacing, origin.1 + row * spacing);
        store.add_particle(pos, pos, radius)?;
    }
    Ok(())
}
