mod uniform_grid;

pub use uniform_grid::*;

#[cfg(test)]
mod uniform_grid_tests;
