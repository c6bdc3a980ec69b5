use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::particles::{spawn_random, ParticleStore};
use crate::spatial::UniformGrid;
use crate::utils::PhysicsError;

fn add(store: &mut ParticleStore, pos: (f32, f32), radius: f32) -> usize {
    store.add_particle(pos, pos, radius).expect("Failed to add particle")
}

#[test]
fn test_new_rejects_invalid_cell_size() {
    assert_eq!(UniformGrid::new(0.0).unwrap_err(), PhysicsError::InvalidCellSize);
    assert_eq!(UniformGrid::new(-1.0).unwrap_err(), PhysicsError::InvalidCellSize);
    assert_eq!(UniformGrid::new(f32::NAN).unwrap_err(), PhysicsError::InvalidCellSize);
}

#[test]
fn test_cell_of_floors_negative_coordinates() {
    let grid = UniformGrid::new(2.0).expect("valid cell size");
    assert_eq!(grid.cell_of((0.0, 0.0)), (0, 0));
    assert_eq!(grid.cell_of((1.99, 3.5)), (0, 1));
    assert_eq!(grid.cell_of((-0.1, -2.0)), (-1, -1));
    assert_eq!(grid.cell_of((-2.1, 4.0)), (-2, 2));
}

#[test]
fn test_insert_spanning_particle_lands_in_every_cell() {
    let mut store = ParticleStore::new();
    // Bounding box [1.5, 2.5] x [1.5, 2.5] straddles the corner shared by four cells.
    let idx = add(&mut store, (2.0, 2.0), 0.5);
    let mut grid = UniformGrid::new(2.0).expect("valid cell size");
    grid.insert(&store, idx);

    for cell in [(0, 0), (0, 1), (1, 0), (1, 1)] {
        assert_eq!(grid.cell(cell), &[idx], "Particle missing from cell {:?}", cell);
    }
    assert_eq!(grid.occupied_cells(), 4);
    assert_eq!(grid.len(), 4);
}

#[test]
fn test_insert_ignores_out_of_range_index() {
    let store = ParticleStore::new();
    let mut grid = UniformGrid::new(1.0).expect("valid cell size");
    grid.insert(&store, 3);
    assert!(grid.is_empty());
}

#[test]
fn test_get_neighbors_includes_self_and_duplicates() {
    let mut store = ParticleStore::new();
    let a = add(&mut store, (2.0, 2.0), 0.5);
    let b = add(&mut store, (2.2, 2.2), 0.5);
    let mut grid = UniformGrid::new(2.0).expect("valid cell size");
    grid.rebuild(&store);

    let mut neighbors = Vec::new();
    grid.get_neighbors(&store, a, &mut neighbors);
    assert!(neighbors.contains(&a), "Query particle is expected in its own candidates");
    let b_hits = neighbors.iter().filter(|&&j| j == b).count();
    assert!(b_hits > 1, "Shared cells should report the neighbour once per cell");
}

#[test]
fn test_clear_discards_stale_entries() {
    let mut store = ParticleStore::new();
    let a = add(&mut store, (1.0, 1.0), 0.4);
    let mut grid = UniformGrid::new(2.0).expect("valid cell size");
    grid.rebuild(&store);
    assert_eq!(grid.cell((0, 0)), &[a]);

    // Move the particle far away and rebuild: the old cell must be empty.
    store.set_curr_pos(a, (41.0, 41.0));
    grid.rebuild(&store);
    assert!(grid.cell((0, 0)).is_empty(), "Stale index survived a rebuild");
    assert_eq!(grid.cell((20, 20)), &[a]);

    grid.clear();
    assert!(grid.is_empty());
    assert_eq!(grid.occupied_cells(), 0);
}

#[test]
fn test_get_neighbors_clears_output_buffer() {
    let mut store = ParticleStore::new();
    add(&mut store, (1.0, 1.0), 0.4);
    let mut grid = UniformGrid::new(2.0).expect("valid cell size");
    grid.rebuild(&store);

    let mut neighbors = vec![99, 98];
    grid.get_neighbors(&store, 0, &mut neighbors);
    assert_eq!(neighbors, vec![0]);

    grid.get_neighbors(&store, 7, &mut neighbors);
    assert!(neighbors.is_empty());
}

#[test]
fn test_broad_phase_is_complete() {
    let mut store = ParticleStore::new();
    spawn_random(&mut store, 400, (0.0, 0.0), (60.0, 60.0), (0.5, 2.0), 11).expect("spawn");
    // Jitter a few particles to negative coordinates as well.
    let mut rng = StdRng::seed_from_u64(5);
    for i in 0..20 {
        let pos = (rng.random_range(-10.0..0.0), rng.random_range(-10.0..0.0));
        store.set_curr_pos(i, pos);
    }

    for cell_size in [1.0, 3.0, 7.5] {
        let mut grid = UniformGrid::new(cell_size).expect("valid cell size");
        grid.rebuild(&store);
        let mut neighbors = Vec::new();
        for i in 0..store.len() {
            grid.get_neighbors(&store, i, &mut neighbors);
            let (xi, yi) = store.curr_pos(i).expect("particle exists");
            let ri = store.radius(i).expect("particle exists");
            for j in 0..store.len() {
                if i == j {
                    continue;
                }
                let (xj, yj) = store.curr_pos(j).expect("particle exists");
                let rj = store.radius(j).expect("particle exists");
                let dist_sq = (xi - xj).powi(2) + (yi - yj).powi(2);
                if dist_sq < (ri + rj).powi(2) {
                    assert!(
                        neighbors.contains(&j),
                        "Overlapping pair ({}, {}) missed with cell size {}",
                        i, j, cell_size
                    );
                }
            }
        }
    }
}
