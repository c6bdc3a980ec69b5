mod particle_store;
mod spawner;

pub use particle_store::*;
pub use spawner::*;

#[cfg(test)]
mod spawner_tests;
