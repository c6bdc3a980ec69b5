use crate::particles::ParticleStore;
use crate::utils::EPSILON;

/// Position corrections produced by one overlapping pair of circles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Displacement to add to the first particle.
    pub shift_a: (f32, f32),
    /// Displacement to add to the second particle.
    pub shift_b: (f32, f32),
}

/// Computes the positional response between two circles, or `None` if they do not overlap.
///
/// The pair is pushed apart along the line between their centers by
/// `0.5 * response_coef * (min_dist - dist)`, split by radius so that the larger circle
/// moves proportionally less. A `response_coef` below 1 leaves some overlap behind on
/// purpose; repeated sub-steps remove the rest.
///
/// Coincident centers (distance below [`EPSILON`]) are separated along +x.
///
/// # Examples
///
/// ```
/// use rs_verlet::collisions::contact_response;
///
/// // Two radius-5 circles with centers 8 apart overlap by 2.
/// let contact = contact_response((0.0, 0.0), (8.0, 0.0), 5.0, 5.0, 0.75)
///     .expect("circles overlap");
/// assert!((contact.shift_a.0 + 0.375).abs() < 1e-6);
/// assert!((contact.shift_b.0 - 0.375).abs() < 1e-6);
///
/// assert!(contact_response((0.0, 0.0), (10.0, 0.0), 5.0, 5.0, 0.75).is_none());
/// ```
#[inline]
pub fn contact_response(
    pos_a: (f32, f32),
    pos_b: (f32, f32),
    radius_a: f32,
    radius_b: f32,
    response_coef: f32,
) -> Option<Contact> {
    let dx = pos_a.0 - pos_b.0;
    let dy = pos_a.1 - pos_b.1;
    let dist_sq = dx * dx + dy * dy;
    let min_dist = radius_a + radius_b;
    if dist_sq >= min_dist * min_dist {
        return None;
    }

    let dist = dist_sq.sqrt();
    let (nx, ny) = if dist > EPSILON {
        (dx / dist, dy / dist)
    } else {
        (1.0, 0.0)
    };
    let ratio_a = radius_a / min_dist;
    let ratio_b = radius_b / min_dist;
    let delta = 0.5 * response_coef * (dist - min_dist);

    Some(Contact {
        shift_a: (-nx * ratio_b * delta, -ny * ratio_b * delta),
        shift_b: (nx * ratio_a * delta, ny * ratio_a * delta),
    })
}

/// Resolves the pair `(i, j)` in place and reports whether they overlapped.
///
/// Both particles move immediately. Out-of-range or equal indices are ignored.
pub fn resolve_pair(store: &mut ParticleStore, i: usize, j: usize, response_coef: f32) -> bool {
    if i == j || i >= store.len() || j >= store.len() {
        return false;
    }
    let contact = contact_response(
        (store.curr_x[i], store.curr_y[i]),
        (store.curr_x[j], store.curr_y[j]),
        store.radius[i],
        store.radius[j],
        response_coef,
    );
    match contact {
        Some(Contact { shift_a, shift_b }) => {
            store.curr_x[i] += shift_a.0;
            store.curr_y[i] += shift_a.1;
            store.curr_x[j] += shift_b.0;
            store.curr_y[j] += shift_b.1;
            true
        }
        None => false,
    }
}
