mod contact;
mod batch_kernels;
mod collision_solver;

pub use contact::*;
pub use batch_kernels::*;
pub use collision_solver::*;

#[cfg(test)]
mod batch_kernels_tests;
