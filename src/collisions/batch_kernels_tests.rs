use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::collisions::{resolve_batch, resolve_batch_scalar, resolve_pair, BatchKernel, KernelKind};
use crate::particles::ParticleStore;

/// Particle 0 sits in the middle of a crowd of `n` candidates, many of them overlapping it.
fn crowd(n: usize, seed: u64) -> ParticleStore {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut store = ParticleStore::new();
    store.add_particle((0.0, 0.0), (0.0, 0.0), 2.0).expect("Failed to add particle");
    for _ in 0..n {
        let pos = (rng.random_range(-4.0..4.0), rng.random_range(-4.0..4.0));
        let radius = rng.random_range(0.5..2.5);
        store.add_particle(pos, pos, radius).expect("Failed to add particle");
    }
    store
}

fn assert_same_positions(a: &ParticleStore, b: &ParticleStore) {
    assert_eq!(a.len(), b.len());
    for i in 0..a.len() {
        let (ax, ay) = a.curr_pos(i).expect("particle exists");
        let (bx, by) = b.curr_pos(i).expect("particle exists");
        assert_abs_diff_eq!(ax, bx, epsilon = 1e-4);
        assert_abs_diff_eq!(ay, by, epsilon = 1e-4);
    }
}

fn kernels_on_this_cpu() -> Vec<BatchKernel> {
    [KernelKind::Avx, KernelKind::Sse, KernelKind::Scalar]
        .into_iter()
        .map(BatchKernel::request)
        .filter(|kernel| kernel.kind() != KernelKind::Scalar)
        .collect()
}

#[test]
fn test_vector_kernels_match_scalar_reference() {
    // 37 candidates exercise the 8-lane, 4-lane and scalar remainder paths together.
    for (seed, n) in [(1, 37), (2, 8), (3, 4), (4, 3), (5, 64)] {
        let candidates: Vec<usize> = (1..=n).collect();
        let mut reference = crowd(n, seed);
        let expected_contacts = resolve_batch_scalar(&mut reference, 0, &candidates, 0.75);
        assert!(expected_contacts > 0, "Scenario {} should contain overlaps", seed);

        for kernel in kernels_on_this_cpu() {
            let mut store = crowd(n, seed);
            let contacts = kernel.resolve(&mut store, 0, &candidates, 0.75);
            assert_eq!(contacts, expected_contacts, "{:?} counted different contacts", kernel.kind());
            assert_same_positions(&store, &reference);
        }
    }
}

#[test]
fn test_single_pair_batch_matches_pairwise_resolution() {
    let mut batched = ParticleStore::new();
    batched.add_particle((0.0, 0.0), (0.0, 0.0), 5.0).expect("Failed to add particle");
    batched.add_particle((8.0, 0.0), (8.0, 0.0), 5.0).expect("Failed to add particle");
    let mut pairwise = batched.clone();

    assert_eq!(resolve_batch(&mut batched, 0, &[1], 0.75), 1);
    resolve_pair(&mut pairwise, 0, 1, 0.75);
    assert_same_positions(&batched, &pairwise);
    assert_abs_diff_eq!(batched.curr_pos(0).expect("particle 0").0, -0.375, epsilon = 1e-6);
}

#[test]
fn test_lanes_without_overlap_are_masked() {
    let mut store = ParticleStore::new();
    store.add_particle((0.0, 0.0), (0.0, 0.0), 1.0).expect("Failed to add particle");
    // Eight far-away candidates and one overlapping one at the end of the lane group.
    for k in 0..8 {
        let pos = (10.0 + 3.0 * k as f32, 10.0);
        store.add_particle(pos, pos, 1.0).expect("Failed to add particle");
    }
    store.add_particle((1.5, 0.0), (1.5, 0.0), 1.0).expect("Failed to add particle");
    let untouched: Vec<(f32, f32)> = (1..9).map(|j| store.curr_pos(j).expect("exists")).collect();

    let candidates: Vec<usize> = (1..10).collect();
    for kernel in kernels_on_this_cpu().into_iter().chain([BatchKernel::scalar()]) {
        let mut trial = store.clone();
        let contacts = kernel.resolve(&mut trial, 0, &candidates, 0.75);
        assert_eq!(contacts, 1, "{:?}", kernel.kind());
        for (offset, &pos) in untouched.iter().enumerate() {
            assert_eq!(trial.curr_pos(offset + 1), Some(pos), "{:?} moved a separated lane", kernel.kind());
        }
        assert!(trial.curr_pos(0).expect("particle 0").0 < 0.0);
        assert!(trial.curr_pos(9).expect("particle 9").0 > 1.5);
    }
}

#[test]
fn test_coincident_lanes_stay_finite() {
    let mut store = ParticleStore::new();
    for _ in 0..9 {
        store.add_particle((3.0, 3.0), (3.0, 3.0), 1.0).expect("Failed to add particle");
    }
    let candidates: Vec<usize> = (1..9).collect();
    let mut reference = store.clone();
    resolve_batch_scalar(&mut reference, 0, &candidates, 0.75);

    for kernel in kernels_on_this_cpu() {
        let mut trial = store.clone();
        kernel.resolve(&mut trial, 0, &candidates, 0.75);
        assert!(trial.positions_x().iter().all(|x| x.is_finite()));
        assert!(trial.positions_y().iter().all(|y| y.is_finite()));
        assert_same_positions(&trial, &reference);
    }
}

#[test]
fn test_request_falls_back_when_unsupported() {
    let kernel = BatchKernel::request(KernelKind::Scalar);
    assert_eq!(kernel.kind(), KernelKind::Scalar);

    #[cfg(not(all(feature = "simd", target_arch = "x86_64")))]
    assert_eq!(BatchKernel::request(KernelKind::Avx).kind(), KernelKind::Scalar);

    #[cfg(all(feature = "simd", target_arch = "x86_64"))]
    if std::is_x86_feature_detected!("avx") {
        assert_eq!(BatchKernel::detect().kind(), KernelKind::Avx);
    }
}

#[test]
fn test_empty_batch_is_noop() {
    let mut store = crowd(3, 9);
    let before = store.clone();
    assert_eq!(BatchKernel::detect().resolve(&mut store, 0, &[], 0.75), 0);
    assert_eq!(BatchKernel::detect().resolve(&mut store, 42, &[1, 2], 0.75), 0);
    assert_same_positions(&store, &before);
}

#[test]
fn test_invalid_candidates_are_skipped() {
    let mut store = ParticleStore::new();
    store.add_particle((0.0, 0.0), (0.0, 0.0), 5.0).expect("Failed to add particle");
    store.add_particle((8.0, 0.0), (8.0, 0.0), 5.0).expect("Failed to add particle");
    let mut expected = store.clone();
    resolve_pair(&mut expected, 0, 1, 0.75);

    let mut batched = store.clone();
    assert_eq!(resolve_batch(&mut batched, 0, &[1, 99], 0.75), 1);
    assert_same_positions(&batched, &expected);

    let mut scalar = store.clone();
    assert_eq!(resolve_batch_scalar(&mut scalar, 0, &[0, 1, usize::MAX], 0.75), 1);
    assert_same_positions(&scalar, &expected);

    // Enough bad indices to fill every vector lane width.
    let junk: Vec<usize> = (0..20).map(|n| if n % 2 == 0 { 0 } else { 100 + n }).collect();
    for kernel in kernels_on_this_cpu() {
        let mut untouched = store.clone();
        assert_eq!(kernel.resolve(&mut untouched, 0, &junk, 0.75), 0);
        assert_same_positions(&untouched, &store);
    }
}
