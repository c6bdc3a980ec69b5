//! Real-time 2D particle physics: Verlet integration with position-based contact
//! resolution over a uniform-grid broad phase.
//!
//! The pieces, leaf first:
//! - [`particles`]: the structure-of-arrays [`particles::ParticleStore`] and spawners.
//! - [`spatial`]: the per-step [`spatial::UniformGrid`].
//! - [`dynamics`]: the Verlet integrator and the two-tier boundary clamp.
//! - [`collisions`]: the contact formula, the collision solver and its SIMD batch kernels.
//! - [`simulation`]: [`simulation::PhysicsWorld`], which runs one step, and
//!   [`simulation::FrameStepper`], which turns frame times into fixed sub-steps.
//!
//! The crate only logs through the `log` facade; installing a logger is up to the host.
pub mod utils;
pub mod particles;
pub mod spatial;
pub mod dynamics;
pub mod collisions;
pub mod simulation;

/// ### General helper function
/// - Asserts that two floating point numbers are approximately equal.
///
/// ### Arguments
///
/// * `a` - The first floating point number.
/// * `b` - The second floating point number.
/// * `epsilon` - The maximum difference between `a` and `b` for them to be considered equal.
/// * `optional_message` - An optional message to display if the assertion fails.
///
pub fn assert_float_eq(a: f32, b: f32, epsilon: f32, optional_message: Option<&str>) {
    match optional_message {
        Some(message) => assert!((a - b).abs() < epsilon, "a: {:?},\nb: {:?},\nepsilon: {:?},\n message: {:?}", a, b, epsilon, message),
        None => assert!((a - b).abs() < epsilon, "Expected {} to be approximately equal to {} (epsilon: {})", a, b, epsilon),
    }
}
