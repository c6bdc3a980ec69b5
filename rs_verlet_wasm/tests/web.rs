#![cfg(target_arch = "wasm32")]

use rs_verlet_wasm::WasmWorld;
use wasm_bindgen_test::*;

#[wasm_bindgen_test]
fn particles_fall_and_stay_in_the_box() {
    let mut world = WasmWorld::new(320.0, 180.0).expect("world");
    world.add_particle(20.0, 20.0, 20.0, 20.0, 4.0).expect("anchor");
    assert_eq!(world.spawn_random(200, 1.0, 2.0, 9).expect("spawn"), 200);
    assert_eq!(world.len(), 201);

    let start = world.positions_y().to_vec();
    for _ in 0..30 {
        world.advance(1.0 / 60.0).expect("advance");
    }
    let end = world.positions_y().to_vec();
    let mean = |ys: &[f32]| ys.iter().sum::<f32>() / ys.len() as f32;
    assert!(mean(&end) > mean(&start));
    assert!(end.iter().all(|&y| y <= 181.0));
}

#[wasm_bindgen_test]
fn invalid_boundary_is_an_error() {
    let mut world = WasmWorld::new(320.0, 180.0).expect("world");
    assert!(world.set_boundary(10.0, 0.0, 5.0, 100.0).is_err());
}

#[wasm_bindgen_test]
fn oversized_particles_are_rejected() {
    let mut world = WasmWorld::new(320.0, 180.0).expect("world");
    assert!(world.spawn_random(10, 1.0, 50.0, 1).is_err());
    assert_eq!(world.len(), 0);
}
