// rs_verlet_wasm/src/lib.rs
// Browser bindings for the particle world: the page owns the render loop and calls
// `advance` once per animation frame, then uploads the position arrays.

use wasm_bindgen::prelude::*;
use js_sys::Float32Array;
use rs_verlet::particles::spawn_random;
use rs_verlet::simulation::{FrameStepper, PhysicsWorld};
use rs_verlet::utils::{PhysicsError, SimulationConfig, DEFAULT_MAX_PARTICLES, MAX_PARTICLE_RADIUS};

fn to_js(error: PhysicsError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

#[wasm_bindgen]
pub struct WasmWorld {
    world: PhysicsWorld,
    stepper: FrameStepper,
}

#[wasm_bindgen]
impl WasmWorld {
    /// A world filling `width` x `height` with the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> Result<WasmWorld, JsValue> {
        let config = SimulationConfig::default();
        let mut world = PhysicsWorld::new(config).map_err(to_js)?;
        world.set_boundary((0.0, 0.0), (width, height)).map_err(to_js)?;
        let stepper = FrameStepper::from_config(&config).map_err(to_js)?;
        web_sys::console::log_1(&JsValue::from_str(&format!("rs_verlet world {}x{}", width, height)));
        Ok(Self { world, stepper })
    }

    #[wasm_bindgen]
    pub fn set_boundary(&mut self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Result<(), JsValue> {
        self.world.set_boundary((min_x, min_y), (max_x, max_y)).map_err(to_js)
    }

    /// Adds a particle; give a previous position different from the current one to throw it.
    #[wasm_bindgen]
    pub fn add_particle(&mut self, x: f32, y: f32, prev_x: f32, prev_y: f32, radius: f32) -> Result<usize, JsValue> {
        self.world.add_particle((x, y), (prev_x, prev_y), radius).map_err(to_js)
    }

    /// Scatters up to `count` particles over the box; the page is capped at
    /// `DEFAULT_MAX_PARTICLES` particles in total. Returns how many were added.
    #[wasm_bindgen]
    pub fn spawn_random(&mut self, count: usize, min_radius: f32, max_radius: f32, seed: u64) -> Result<usize, JsValue> {
        if max_radius > MAX_PARTICLE_RADIUS {
            return Err(to_js(PhysicsError::InvalidRadius));
        }
        let count = count.min(DEFAULT_MAX_PARTICLES.saturating_sub(self.world.len()));
        let boundary = self.world.boundary();
        spawn_random(
            self.world.particles_mut(),
            count,
            boundary.min,
            boundary.max,
            (min_radius, max_radius),
            seed,
        ).map_err(to_js)?;
        Ok(count)
    }

    #[wasm_bindgen]
    pub fn remove_particle(&mut self, index: usize) {
        self.world.remove_particle(index);
    }

    /// Moves the anchor (the first particle) to follow the pointer.
    #[wasm_bindgen]
    pub fn set_anchor(&mut self, x: f32, y: f32) {
        self.world.set_anchor_position((x, y));
    }

    /// Feeds one animation frame's duration in seconds; returns the number of sub-steps run.
    #[wasm_bindgen]
    pub fn advance(&mut self, frame_time: f64) -> Result<usize, JsValue> {
        self.stepper.advance(&mut self.world, frame_time).map_err(to_js)
    }

    #[wasm_bindgen(getter)]
    pub fn interpolation_alpha(&self) -> f32 {
        self.stepper.interpolation_alpha()
    }

    #[wasm_bindgen(getter)]
    pub fn len(&self) -> usize {
        self.world.len()
    }

    #[wasm_bindgen(getter)]
    pub fn contacts(&self) -> usize {
        self.world.last_stats().contacts
    }

    #[wasm_bindgen]
    pub fn positions_x(&self) -> Float32Array {
        Float32Array::from(self.world.particles().positions_x())
    }

    #[wasm_bindgen]
    pub fn positions_y(&self) -> Float32Array {
        Float32Array::from(self.world.particles().positions_y())
    }

    #[wasm_bindgen]
    pub fn radii(&self) -> Float32Array {
        Float32Array::from(self.world.particles().radii())
    }
}
