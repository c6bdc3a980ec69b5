// demos/falling_particles.rs
//
// Headless run of the full pipeline: a few thousand particles dropped into a window-sized
// box, driven by the frame stepper at a jittery 60 fps. Run with
// `RUST_LOG=debug cargo run --example falling_particles` to see the step statistics.

use log::info;
use rs_verlet::particles::spawn_random;
use rs_verlet::simulation::{FrameStepper, PhysicsWorld};
use rs_verlet::utils::{PhysicsError, SimulationConfig, DEFAULT_PARTICLE_RADIUS, MAX_PARTICLE_RADIUS};

const PARTICLES: usize = 5_000;
const FRAMES: usize = 600;

fn main() -> Result<(), PhysicsError> {
    env_logger::init();

    let config = SimulationConfig::default().with_parallel_integration(true);
    let (min, max) = ((0.0, 0.0), (800.0, 600.0));
    let mut world = PhysicsWorld::with_capacity(config, PARTICLES + 1)?;
    world.set_boundary(min, max)?;

    // The anchor sits still in the middle of the box and everything piles around it.
    world.add_particle((400.0, 450.0), (400.0, 450.0), MAX_PARTICLE_RADIUS)?;
    spawn_random(
        world.particles_mut(),
        PARTICLES,
        min,
        (max.0, max.1 * 0.5),
        (DEFAULT_PARTICLE_RADIUS, DEFAULT_PARTICLE_RADIUS * 1.5),
        2024,
    )?;
    info!("spawned {} particles", world.len());

    let mut stepper = FrameStepper::from_config(&config)?;
    let mut substeps = 0;
    for frame in 0..FRAMES {
        // Every hundredth frame stalls, as if the window were being dragged.
        let frame_time = if frame % 100 == 99 { 0.1 } else { 1.0 / 60.0 };
        substeps += stepper.advance(&mut world, frame_time)?;

        if frame % 60 == 0 {
            let stats = world.last_stats();
            info!(
                "frame {}: {} contacts among {} candidate pairs, step took {:?}",
                frame, stats.contacts, stats.candidate_pairs, stats.total_time()
            );
        }
    }

    let particles = world.particles();
    let mean_y = particles.positions_y().iter().sum::<f32>() / particles.len() as f32;
    println!("Ran {} sub-steps over {} frames", substeps, FRAMES);
    println!("Mean particle height: {:.1} (floor at {})", mean_y, max.1);
    println!("Render alpha after the last frame: {:.2}", stepper.interpolation_alpha());
    Ok(())
}
