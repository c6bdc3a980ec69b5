use crate::collisions::{resolve_pair, BatchKernel};
use crate::particles::ParticleStore;
use crate::spatial::UniformGrid;
use crate::utils::{PhysicsError, SolverMode};

/// Counters from one collision pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveStats {
    /// Unordered pairs handed to the narrow phase after deduplication.
    pub candidate_pairs: usize,
    /// Pairs that actually overlapped and were corrected.
    pub contacts: usize,
}

/// Resolves particle overlaps using a [`UniformGrid`] broad phase.
///
/// Each unordered pair is considered at most once per pass: the grid's candidates for
/// particle `i` are reduced to distinct indices `j > i`. In [`SolverMode::Scalar`] every
/// pair is corrected as soon as it is found; in [`SolverMode::Batched`] the corrections to
/// `i` are summed across its candidates and applied once through a [`BatchKernel`].
///
/// # Examples
///
/// ```
/// use rs_verlet::collisions::CollisionSolver;
/// use rs_verlet::particles::ParticleStore;
/// use rs_verlet::spatial::UniformGrid;
/// use rs_verlet::utils::SolverMode;
///
/// let mut store = ParticleStore::new();
/// store.add_particle((0.0, 0.0), (0.0, 0.0), 5.0).expect("valid particle");
/// store.add_particle((8.0, 0.0), (8.0, 0.0), 5.0).expect("valid particle");
///
/// let mut grid = UniformGrid::new(10.0).expect("valid cell size");
/// grid.rebuild(&store);
/// let mut solver = CollisionSolver::new(0.75, SolverMode::Scalar).expect("valid solver");
/// let stats = solver.solve(&mut store, &grid);
///
/// assert_eq!(stats.contacts, 1);
/// let (x0, _) = store.curr_pos(0).expect("particle 0");
/// let (x1, _) = store.curr_pos(1).expect("particle 1");
/// assert!(((x1 - x0) - 8.75).abs() < 1e-5);
/// ```
#[derive(Debug, Clone)]
pub struct CollisionSolver {
    response_coef: f32,
    mode: SolverMode,
    kernel: BatchKernel,
    neighbors: Vec<usize>,
}

impl CollisionSolver {
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidCoefficient`] unless `response_coef` is in `(0, 1]`.
    pub fn new(response_coef: f32, mode: SolverMode) -> Result<Self, PhysicsError> {
        if !(response_coef > 0.0 && response_coef <= 1.0) {
            return Err(PhysicsError::InvalidCoefficient("response_coef"));
        }
        Ok(Self {
            response_coef,
            mode,
            kernel: BatchKernel::detect(),
            neighbors: Vec::with_capacity(32),
        })
    }

    /// Replaces the kernel used in [`SolverMode::Batched`].
    pub fn with_kernel(mut self, kernel: BatchKernel) -> Self {
        self.kernel = kernel;
        self
    }

    pub fn mode(&self) -> SolverMode {
        self.mode
    }

    pub fn kernel(&self) -> BatchKernel {
        self.kernel
    }

    pub fn response_coef(&self) -> f32 {
        self.response_coef
    }

    /// Corrects every overlap the grid can see.
    ///
    /// `grid` must have been rebuilt from `store` with no particle removed since; particles
    /// that moved since the rebuild are still queried through their new bounding boxes.
    pub fn solve(&mut self, store: &mut ParticleStore, grid: &UniformGrid) -> SolveStats {
        let mut stats = SolveStats::default();
        for i in 0..store.len() {
            grid.get_neighbors(store, i, &mut self.neighbors);
            self.neighbors.retain(|&j| j > i);
            if self.neighbors.is_empty() {
                continue;
            }
            self.neighbors.sort_unstable();
            self.neighbors.dedup();
            stats.candidate_pairs += self.neighbors.len();

            stats.contacts += match self.mode {
                SolverMode::Scalar => self
                    .neighbors
                    .iter()
                    .filter(|&&j| resolve_pair(store, i, j, self.response_coef))
                    .count(),
                SolverMode::Batched => {
                    self.kernel.resolve(store, i, &self.neighbors, self.response_coef)
                }
            };
        }
        stats
    }
}
