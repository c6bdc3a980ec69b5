use std::collections::HashMap;
use crate::particles::ParticleStore;
use crate::utils::PhysicsError;

/// Integer coordinate of one grid cell.
pub type CellCoord = (i32, i32);

/// A uniform spatial hash over particle indices, rebuilt before every collision pass.
///
/// A particle is filed under every cell its bounding box (`position ± radius`) touches,
/// so a neighbour query over the same box never misses a particle that could overlap.
/// The grid holds indices into a [`ParticleStore`]; they stay meaningful only until the
/// store is next mutated by a removal.
///
/// # Examples
///
/// ```
/// use rs_verlet::particles::ParticleStore;
/// use rs_verlet::spatial::UniformGrid;
///
/// let mut store = ParticleStore::new();
/// store.add_particle((1.0, 1.0), (1.0, 1.0), 0.5).expect("valid particle");
/// store.add_particle((1.8, 1.0), (1.8, 1.0), 0.5).expect("valid particle");
/// store.add_particle((50.0, 50.0), (50.0, 50.0), 0.5).expect("valid particle");
///
/// let mut grid = UniformGrid::new(2.0).expect("valid cell size");
/// grid.rebuild(&store);
///
/// let mut neighbors = Vec::new();
/// grid.get_neighbors(&store, 0, &mut neighbors);
/// assert!(neighbors.contains(&1));
/// assert!(!neighbors.contains(&2));
/// ```
#[derive(Debug, Clone)]
pub struct UniformGrid {
    cell_size: f32,
    inv_cell_size: f32,
    cells: HashMap<CellCoord, Vec<usize>>,
}

/// Initial bucket capacity for a freshly created cell.
const CELL_CAPACITY: usize = 8;

impl UniformGrid {
    /// Creates an empty grid.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidCellSize`] unless `cell_size` is positive and finite.
    pub fn new(cell_size: f32) -> Result<Self, PhysicsError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(PhysicsError::InvalidCellSize);
        }
        Ok(Self {
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            cells: HashMap::new(),
        })
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Maps a world position to the cell containing it (`floor(position / cell_size)`).
    pub fn cell_of(&self, position: (f32, f32)) -> CellCoord {
        (
            (position.0 * self.inv_cell_size).floor() as i32,
            (position.1 * self.inv_cell_size).floor() as i32,
        )
    }

    /// Inclusive cell range covered by the bounding box of particle `index`.
    fn cell_range(&self, particles: &ParticleStore, index: usize) -> (CellCoord, CellCoord) {
        let x = particles.curr_x[index];
        let y = particles.curr_y[index];
        let r = particles.radius[index];
        (self.cell_of((x - r, y - r)), self.cell_of((x + r, y + r)))
    }

    /// Empties every bucket.
    ///
    /// Buckets that were already empty are dropped; the rest keep their allocation for
    /// the next rebuild.
    pub fn clear(&mut self) {
        self.cells.retain(|_, bucket| {
            let keep = !bucket.is_empty();
            bucket.clear();
            keep
        });
    }

    /// Files particle `index` under every cell its bounding box overlaps.
    ///
    /// Out-of-range indices are ignored.
    pub fn insert(&mut self, particles: &ParticleStore, index: usize) {
        if index >= particles.len() {
            return;
        }
        let ((min_x, min_y), (max_x, max_y)) = self.cell_range(particles, index);
        for cx in min_x..=max_x {
            for cy in min_y..=max_y {
                self.cells
                    .entry((cx, cy))
                    .or_insert_with(|| Vec::with_capacity(CELL_CAPACITY))
                    .push(index);
            }
        }
    }

    /// Clears the grid and inserts every particle of `particles`.
    pub fn rebuild(&mut self, particles: &ParticleStore) {
        self.clear();
        for index in 0..particles.len() {
            self.insert(particles, index);
        }
    }

    /// Collects into `neighbors` every index filed under a cell that particle `index`
    /// overlaps.
    ///
    /// `neighbors` is cleared first. The result is a superset of the particles that can
    /// touch `index`: it may hold duplicates and `index` itself, and callers must filter
    /// both.
    pub fn get_neighbors(&self, particles: &ParticleStore, index: usize, neighbors: &mut Vec<usize>) {
        neighbors.clear();
        if index >= particles.len() {
            return;
        }
        let ((min_x, min_y), (max_x, max_y)) = self.cell_range(particles, index);
        for cx in min_x..=max_x {
            for cy in min_y..=max_y {
                if let Some(bucket) = self.cells.get(&(cx, cy)) {
                    neighbors.extend_from_slice(bucket);
                }
            }
        }
    }

    /// Indices filed under a single cell.
    pub fn cell(&self, cell: CellCoord) -> &[usize] {
        self.cells.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of cells currently holding at least one index.
    pub fn occupied_cells(&self) -> usize {
        self.cells.values().filter(|bucket| !bucket.is_empty()).count()
    }

    /// Total number of stored entries, counting duplicates.
    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.values().all(Vec::is_empty)
    }
}
