mod boundary_clamp;
mod verlet_integrator;

pub use boundary_clamp::*;
pub use verlet_integrator::*;
