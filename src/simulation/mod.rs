mod physics_world;
mod frame_stepper;

pub use physics_world::*;
pub use frame_stepper::*;
