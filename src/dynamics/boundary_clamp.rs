use crate::collisions::contact_response;
use crate::particles::ParticleStore;
use crate::utils::{PhysicsError, HARD_BOUNDARY_FACTOR, SOFT_BOUNDARY_FACTOR};

/// Axis-aligned rectangle particles are kept inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    pub min: (f32, f32),
    pub max: (f32, f32),
}

impl Boundary {
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidBoundary`] unless both corners are finite and `min` is
    /// strictly below `max` on both axes.
    pub fn new(min: (f32, f32), max: (f32, f32)) -> Result<Self, PhysicsError> {
        let finite = [min.0, min.1, max.0, max.1].iter().all(|c| c.is_finite());
        if !finite || min.0 >= max.0 || min.1 >= max.1 {
            return Err(PhysicsError::InvalidBoundary);
        }
        Ok(Self { min, max })
    }

    pub fn width(&self) -> f32 {
        self.max.0 - self.min.0
    }

    pub fn height(&self) -> f32 {
        self.max.1 - self.min.1
    }

    /// Whether a circle at `pos` lies within the hard clamp limits.
    pub fn contains(&self, pos: (f32, f32), radius: f32) -> bool {
        let hard = radius * HARD_BOUNDARY_FACTOR;
        pos.0 - radius >= self.min.0 - hard
            && pos.0 + radius <= self.max.0 + hard
            && pos.1 - radius >= self.min.1 - hard
            && pos.1 + radius <= self.max.1 + hard
    }
}

/// Pushes a circle back towards the inside of `boundary` and returns its new position.
///
/// Each wall is handled on its own. Once the circle's edge crosses the soft line
/// (`0.1 * radius` inside the wall) it is resolved against a motionless copy of itself
/// placed just beyond the wall, with the same response as a particle contact. Then the
/// position is hard-clamped so the edge never ends up more than `0.5 * radius` past a
/// wall.
///
/// # Examples
///
/// ```
/// use rs_verlet::dynamics::{clamp_position, Boundary};
///
/// let boundary = Boundary::new((0.0, 0.0), (100.0, 100.0)).expect("valid boundary");
/// // Far outside on the left: the hard clamp puts the edge 0.5 * radius past the wall.
/// let (x, y) = clamp_position((-50.0, 50.0), 2.0, &boundary, 0.75);
/// assert_eq!((x, y), (1.0, 50.0));
/// ```
pub fn clamp_position(pos: (f32, f32), radius: f32, boundary: &Boundary, response_coef: f32) -> (f32, f32) {
    let soft = radius * SOFT_BOUNDARY_FACTOR;
    let (mut x, mut y) = pos;

    let push_from = |pos: (f32, f32), wall: (f32, f32)| match contact_response(pos, wall, radius, radius, response_coef) {
        Some(contact) => (pos.0 + contact.shift_a.0, pos.1 + contact.shift_a.1),
        None => pos,
    };
    if x - radius < boundary.min.0 + soft {
        (x, y) = push_from((x, y), (boundary.min.0 - radius + soft, y));
    }
    if x + radius > boundary.max.0 - soft {
        (x, y) = push_from((x, y), (boundary.max.0 + radius - soft, y));
    }
    if y - radius < boundary.min.1 + soft {
        (x, y) = push_from((x, y), (x, boundary.min.1 - radius + soft));
    }
    if y + radius > boundary.max.1 - soft {
        (x, y) = push_from((x, y), (x, boundary.max.1 + radius - soft));
    }

    hard_clamp_position((x, y), radius, boundary)
}

/// The hard half of [`clamp_position`]: moves the circle so its edge is at most
/// `0.5 * radius` past any wall, without the soft response.
pub fn hard_clamp_position(pos: (f32, f32), radius: f32, boundary: &Boundary) -> (f32, f32) {
    let hard = radius * HARD_BOUNDARY_FACTOR;
    let (mut x, mut y) = pos;
    if x - radius < boundary.min.0 - hard {
        x = boundary.min.0 - hard + radius;
    }
    if x + radius > boundary.max.0 + hard {
        x = boundary.max.0 + hard - radius;
    }
    if y - radius < boundary.min.1 - hard {
        y = boundary.min.1 - hard + radius;
    }
    if y + radius > boundary.max.1 + hard {
        y = boundary.max.1 + hard - radius;
    }
    (x, y)
}

/// Applies [`clamp_position`] to particle `index` in place; out-of-range indices are ignored.
pub fn clamp_particle(store: &mut ParticleStore, index: usize, boundary: &Boundary, response_coef: f32) {
    if index >= store.len() {
        return;
    }
    let (x, y) = clamp_position(
        (store.curr_x[index], store.curr_y[index]),
        store.radius[index],
        boundary,
        response_coef,
    );
    store.curr_x[index] = x;
    store.curr_y[index] = y;
}

/// Hard-clamps every particle in `store`.
///
/// Contact corrections run after integration and can nudge a particle sitting on a wall
/// past the hard line; this pass puts it back.
pub fn confine_particles(store: &mut ParticleStore, boundary: &Boundary) {
    for ((x, y), &radius) in store.curr_x.iter_mut()
        .zip(store.curr_y.iter_mut())
        .zip(store.radius.iter())
    {
        (*x, *y) = hard_clamp_position((*x, *y), radius, boundary);
    }
}
