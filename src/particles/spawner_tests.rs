use crate::particles::{spawn_grid, spawn_random, ParticleStore};
use crate::utils::PhysicsError;

#[test]
fn test_spawn_random_is_deterministic() {
    let mut a = ParticleStore::new();
    let mut b = ParticleStore::new();
    spawn_random(&mut a, 50, (0.0, 0.0), (100.0, 100.0), (1.0, 2.0), 99).expect("spawn a");
    spawn_random(&mut b, 50, (0.0, 0.0), (100.0, 100.0), (1.0, 2.0), 99).expect("spawn b");
    assert_eq!(a.positions_x(), b.positions_x());
    assert_eq!(a.positions_y(), b.positions_y());
    assert_eq!(a.radii(), b.radii());
}

#[test]
fn test_spawn_random_stays_inside_domain_at_rest() {
    let mut store = ParticleStore::new();
    spawn_random(&mut store, 200, (-50.0, 10.0), (50.0, 60.0), (0.5, 2.5), 3).expect("spawn");
    for i in 0..store.len() {
        let (x, y) = store.curr_pos(i).expect("particle exists");
        let r = store.radius(i).expect("particle exists");
        assert!(x - r >= -50.0 && x + r <= 50.0, "Particle {} x out of domain", i);
        assert!(y - r >= 10.0 && y + r <= 60.0, "Particle {} y out of domain", i);
        assert_eq!(store.prev_pos(i), Some((x, y)), "Particle {} should start at rest", i);
    }
}

#[test]
fn test_spawn_random_rejects_bad_input() {
    let mut store = ParticleStore::new();
    assert_eq!(
        spawn_random(&mut store, 1, (0.0, 0.0), (10.0, 10.0), (2.0, 1.0), 0),
        Err(PhysicsError::InvalidRadius)
    );
    assert_eq!(
        spawn_random(&mut store, 1, (0.0, 0.0), (3.0, 3.0), (1.0, 2.0), 0),
        Err(PhysicsError::InvalidBoundary)
    );
    assert_eq!(
        spawn_random(&mut store, 1, (0.0, 0.0), (500.0, 500.0), (1.0, 50.0), 0),
        Err(PhysicsError::InvalidRadius)
    );
    assert!(store.is_empty());
}

#[test]
fn test_spawn_grid_layout() {
    let mut store = ParticleStore::new();
    spawn_grid(&mut store, 5, (10.0, 20.0), 3.0, 2, 1.0).expect("spawn");
    assert_eq!(store.len(), 5);
    assert_eq!(store.curr_pos(0), Some((10.0, 20.0)));
    assert_eq!(store.curr_pos(1), Some((13.0, 20.0)));
    assert_eq!(store.curr_pos(2), Some((10.0, 23.0)));
    assert_eq!(store.curr_pos(4), Some((10.0, 26.0)));
    assert!(spawn_grid(&mut store, 1, (0.0, 0.0), 1.0, 0, 1.0).is_err());
}
