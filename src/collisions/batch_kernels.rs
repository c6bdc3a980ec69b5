//! Batched narrow phase: one query particle against a list of candidates.
//!
//! A batch reads the query particle's position once, computes every pair response against
//! that fixed position, moves each candidate immediately and applies the summed
//! correction to the query particle at the end. The AVX and SSE kernels evaluate the same
//! formula as [`contact_response`] eight or four candidates at a time, masking out lanes
//! that do not overlap. Every kernel produces the same displacements as
//! [`resolve_batch_scalar`] apart from the order in which the query particle's
//! correction is summed.
//!
//! Candidates must be distinct; [`CollisionSolver`](crate::collisions::CollisionSolver)
//! guarantees this by sorting and deduplicating the grid's output. The query particle
//! itself and out-of-range indices are dropped before any lane reads them.
use log::warn;
use crate::collisions::contact_response;
use crate::particles::ParticleStore;

/// Instruction set a [`BatchKernel`] runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelKind {
    /// Eight `f32` lanes.
    Avx,
    /// Four `f32` lanes.
    Sse,
    Scalar,
}

impl KernelKind {
    /// Number of candidates evaluated together.
    pub fn lanes(self) -> usize {
        match self {
            KernelKind::Avx => 8,
            KernelKind::Sse => 4,
            KernelKind::Scalar => 1,
        }
    }

    fn is_supported(self) -> bool {
        match self {
            KernelKind::Scalar => true,
            #[cfg(all(feature = "simd", target_arch = "x86_64"))]
            KernelKind::Avx => is_x86_feature_detected!("avx"),
            #[cfg(all(feature = "simd", target_arch = "x86_64"))]
            KernelKind::Sse => is_x86_feature_detected!("sse2"),
            #[cfg(not(all(feature = "simd", target_arch = "x86_64")))]
            KernelKind::Avx | KernelKind::Sse => false,
        }
    }
}

/// A batch kernel that is known to be runnable on this CPU.
///
/// The only ways to obtain one check CPU support first, which is what makes the
/// `unsafe` vector paths sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchKernel {
    kind: KernelKind,
}

impl BatchKernel {
    /// Picks the widest kernel the running CPU supports.
    pub fn detect() -> Self {
        [KernelKind::Avx, KernelKind::Sse]
            .into_iter()
            .find(|kind| kind.is_supported())
            .map(|kind| Self { kind })
            .unwrap_or_else(Self::scalar)
    }

    pub fn scalar() -> Self {
        Self { kind: KernelKind::Scalar }
    }

    /// Uses `kind` if the CPU supports it, otherwise falls back to [`BatchKernel::detect`].
    pub fn request(kind: KernelKind) -> Self {
        if kind.is_supported() {
            Self { kind }
        } else {
            let fallback = Self::detect();
            warn!("{:?} batch kernel unavailable, using {:?}", kind, fallback.kind);
            fallback
        }
    }

    pub fn kind(&self) -> KernelKind {
        self.kind
    }

    /// Resolves particle `i` against every index in `candidates` and returns the number
    /// of overlapping pairs.
    ///
    /// Candidates equal to `i` or past the end of the store are skipped.
    pub fn resolve(
        &self,
        store: &mut ParticleStore,
        i: usize,
        candidates: &[usize],
        response_coef: f32,
    ) -> usize {
        let len = store.len();
        if i >= len || candidates.is_empty() {
            return 0;
        }
        let valid = |&j: &usize| j < len && j != i;
        let filtered: Vec<usize>;
        let candidates = if candidates.iter().all(valid) {
            candidates
        } else {
            filtered = candidates.iter().copied().filter(valid).collect();
            &filtered
        };
        let mut shift_i = (0.0, 0.0);
        let mut contacts = 0;
        #[allow(unused_mut)]
        let mut rest = candidates;

        #[cfg(all(feature = "simd", target_arch = "x86_64"))]
        {
            if self.kind == KernelKind::Avx {
                // SAFETY: `kind` is only `Avx` when the CPU reported AVX support.
                let (hits, used) = unsafe { lanes_avx(store, i, rest, response_coef, &mut shift_i) };
                contacts += hits;
                rest = &rest[used..];
            }
            if matches!(self.kind, KernelKind::Avx | KernelKind::Sse) {
                // SAFETY: AVX implies SSE2, and `Sse` is only chosen when SSE2 is present.
                let (hits, used) = unsafe { lanes_sse(store, i, rest, response_coef, &mut shift_i) };
                contacts += hits;
                rest = &rest[used..];
            }
        }

        contacts += lanes_scalar(store, i, rest, response_coef, &mut shift_i);
        store.curr_x[i] += shift_i.0;
        store.curr_y[i] += shift_i.1;
        contacts
    }
}

impl Default for BatchKernel {
    fn default() -> Self {
        Self::detect()
    }
}

/// Resolves one batch with the widest kernel this CPU supports.
///
/// Hot loops should hold on to a [`BatchKernel`] instead of detecting on every call.
pub fn resolve_batch(
    store: &mut ParticleStore,
    i: usize,
    candidates: &[usize],
    response_coef: f32,
) -> usize {
    BatchKernel::detect().resolve(store, i, candidates, response_coef)
}

/// Reference implementation of the batch contract, one candidate at a time.
pub fn resolve_batch_scalar(
    store: &mut ParticleStore,
    i: usize,
    candidates: &[usize],
    response_coef: f32,
) -> usize {
    BatchKernel::scalar().resolve(store, i, candidates, response_coef)
}

fn lanes_scalar(
    store: &mut ParticleStore,
    i: usize,
    candidates: &[usize],
    response_coef: f32,
    shift_i: &mut (f32, f32),
) -> usize {
    let pos_i = (store.curr_x[i], store.curr_y[i]);
    let r_i = store.radius[i];
    let mut contacts = 0;
    for &j in candidates {
        let pos_j = (store.curr_x[j], store.curr_y[j]);
        if let Some(contact) = contact_response(pos_i, pos_j, r_i, store.radius[j], response_coef) {
            shift_i.0 += contact.shift_a.0;
            shift_i.1 += contact.shift_a.1;
            store.curr_x[j] += contact.shift_b.0;
            store.curr_y[j] += contact.shift_b.1;
            contacts += 1;
        }
    }
    contacts
}

/// Evaluates full groups of eight candidates; returns `(contacts, candidates consumed)`.
#[cfg(all(feature = "simd", target_arch = "x86_64"))]
#[target_feature(enable = "avx")]
unsafe fn lanes_avx(
    store: &mut ParticleStore,
    i: usize,
    candidates: &[usize],
    response_coef: f32,
    shift_i: &mut (f32, f32),
) -> (usize, usize) {
    use std::arch::x86_64::*;
    use crate::utils::EPSILON;

    let p_x = _mm256_set1_ps(store.curr_x[i]);
    let p_y = _mm256_set1_ps(store.curr_y[i]);
    let r_i = _mm256_set1_ps(store.radius[i]);
    let half_coef = _mm256_set1_ps(0.5 * response_coef);
    let eps = _mm256_set1_ps(EPSILON);
    let one = _mm256_set1_ps(1.0);
    let zero = _mm256_setzero_ps();

    let mut acc_x = _mm256_setzero_ps();
    let mut acc_y = _mm256_setzero_ps();
    let mut contacts = 0;

    let chunks = candidates.chunks_exact(8);
    let used = candidates.len() - chunks.remainder().len();
    for chunk in chunks {
        // Gather candidate data into lane order.
        let mut xs = [0.0f32; 8];
        let mut ys = [0.0f32; 8];
        let mut rs = [0.0f32; 8];
        for (lane, &j) in chunk.iter().enumerate() {
            xs[lane] = store.curr_x[j];
            ys[lane] = store.curr_y[j];
            rs[lane] = store.radius[j];
        }
        let q_x = _mm256_loadu_ps(xs.as_ptr());
        let q_y = _mm256_loadu_ps(ys.as_ptr());
        let r_j = _mm256_loadu_ps(rs.as_ptr());

        let dx = _mm256_sub_ps(p_x, q_x);
        let dy = _mm256_sub_ps(p_y, q_y);
        let dist_sq = _mm256_add_ps(_mm256_mul_ps(dx, dx), _mm256_mul_ps(dy, dy));
        let min_dist = _mm256_add_ps(r_i, r_j);
        let hit = _mm256_cmp_ps(dist_sq, _mm256_mul_ps(min_dist, min_dist), _CMP_LT_OQ);
        let hit_bits = _mm256_movemask_ps(hit);
        if hit_bits == 0 {
            continue;
        }

        let dist = _mm256_sqrt_ps(dist_sq);
        let degenerate = _mm256_cmp_ps(dist, eps, _CMP_LE_OQ);
        let safe_dist = _mm256_max_ps(dist, eps);
        let n_x = _mm256_blendv_ps(_mm256_div_ps(dx, safe_dist), one, degenerate);
        let n_y = _mm256_blendv_ps(_mm256_div_ps(dy, safe_dist), zero, degenerate);

        let ratio_i = _mm256_div_ps(r_i, min_dist);
        let ratio_j = _mm256_div_ps(r_j, min_dist);
        let delta = _mm256_mul_ps(half_coef, _mm256_sub_ps(dist, min_dist));
        // Lanes without overlap contribute nothing.
        let delta = _mm256_and_ps(delta, hit);

        let k_i = _mm256_mul_ps(ratio_j, delta);
        acc_x = _mm256_sub_ps(acc_x, _mm256_mul_ps(n_x, k_i));
        acc_y = _mm256_sub_ps(acc_y, _mm256_mul_ps(n_y, k_i));

        let k_j = _mm256_mul_ps(ratio_i, delta);
        let mut sx = [0.0f32; 8];
        let mut sy = [0.0f32; 8];
        _mm256_storeu_ps(sx.as_mut_ptr(), _mm256_mul_ps(n_x, k_j));
        _mm256_storeu_ps(sy.as_mut_ptr(), _mm256_mul_ps(n_y, k_j));
        for (lane, &j) in chunk.iter().enumerate() {
            if hit_bits & (1 << lane) != 0 {
                store.curr_x[j] += sx[lane];
                store.curr_y[j] += sy[lane];
            }
        }
        contacts += hit_bits.count_ones() as usize;
    }

    let mut ax = [0.0f32; 8];
    let mut ay = [0.0f32; 8];
    _mm256_storeu_ps(ax.as_mut_ptr(), acc_x);
    _mm256_storeu_ps(ay.as_mut_ptr(), acc_y);
    shift_i.0 += ax.iter().sum::<f32>();
    shift_i.1 += ay.iter().sum::<f32>();

    (contacts, used)
}

/// Four-lane counterpart of [`lanes_avx`].
#[cfg(all(feature = "simd", target_arch = "x86_64"))]
#[target_feature(enable = "sse2")]
unsafe fn lanes_sse(
    store: &mut ParticleStore,
    i: usize,
    candidates: &[usize],
    response_coef: f32,
    shift_i: &mut (f32, f32),
) -> (usize, usize) {
    use std::arch::x86_64::*;
    use crate::utils::EPSILON;

    let p_x = _mm_set1_ps(store.curr_x[i]);
    let p_y = _mm_set1_ps(store.curr_y[i]);
    let r_i = _mm_set1_ps(store.radius[i]);
    let half_coef = _mm_set1_ps(0.5 * response_coef);
    let eps = _mm_set1_ps(EPSILON);
    let one = _mm_set1_ps(1.0);
    let zero = _mm_setzero_ps();

    let mut acc_x = _mm_setzero_ps();
    let mut acc_y = _mm_setzero_ps();
    let mut contacts = 0;

    let chunks = candidates.chunks_exact(4);
    let used = candidates.len() - chunks.remainder().len();
    for chunk in chunks {
        let mut xs = [0.0f32; 4];
        let mut ys = [0.0f32; 4];
        let mut rs = [0.0f32; 4];
        for (lane, &j) in chunk.iter().enumerate() {
            xs[lane] = store.curr_x[j];
            ys[lane] = store.curr_y[j];
            rs[lane] = store.radius[j];
        }
        let q_x = _mm_loadu_ps(xs.as_ptr());
        let q_y = _mm_loadu_ps(ys.as_ptr());
        let r_j = _mm_loadu_ps(rs.as_ptr());

        let dx = _mm_sub_ps(p_x, q_x);
        let dy = _mm_sub_ps(p_y, q_y);
        let dist_sq = _mm_add_ps(_mm_mul_ps(dx, dx), _mm_mul_ps(dy, dy));
        let min_dist = _mm_add_ps(r_i, r_j);
        let hit = _mm_cmplt_ps(dist_sq, _mm_mul_ps(min_dist, min_dist));
        let hit_bits = _mm_movemask_ps(hit);
        if hit_bits == 0 {
            continue;
        }

        let dist = _mm_sqrt_ps(dist_sq);
        // SSE2 has no blendv: select with and/andnot/or.
        let degenerate = _mm_cmple_ps(dist, eps);
        let safe_dist = _mm_max_ps(dist, eps);
        let n_x = _mm_or_ps(
            _mm_and_ps(degenerate, one),
            _mm_andnot_ps(degenerate, _mm_div_ps(dx, safe_dist)),
        );
        let n_y = _mm_or_ps(
            _mm_and_ps(degenerate, zero),
            _mm_andnot_ps(degenerate, _mm_div_ps(dy, safe_dist)),
        );

        let ratio_i = _mm_div_ps(r_i, min_dist);
        let ratio_j = _mm_div_ps(r_j, min_dist);
        let delta = _mm_and_ps(_mm_mul_ps(half_coef, _mm_sub_ps(dist, min_dist)), hit);

        let k_i = _mm_mul_ps(ratio_j, delta);
        acc_x = _mm_sub_ps(acc_x, _mm_mul_ps(n_x, k_i));
        acc_y = _mm_sub_ps(acc_y, _mm_mul_ps(n_y, k_i));

        let k_j = _mm_mul_ps(ratio_i, delta);
        let mut sx = [0.0f32; 4];
        let mut sy = [0.0f32; 4];
        _mm_storeu_ps(sx.as_mut_ptr(), _mm_mul_ps(n_x, k_j));
        _mm_storeu_ps(sy.as_mut_ptr(), _mm_mul_ps(n_y, k_j));
        for (lane, &j) in chunk.iter().enumerate() {
            if hit_bits & (1 << lane) != 0 {
                store.curr_x[j] += sx[lane];
                store.curr_y[j] += sy[lane];
            }
        }
        contacts += hit_bits.count_ones() as usize;
    }

    let mut ax = [0.0f32; 4];
    let mut ay = [0.0f32; 4];
    _mm_storeu_ps(ax.as_mut_ptr(), acc_x);
    _mm_storeu_ps(ay.as_mut_ptr(), acc_y);
    shift_i.0 += ax.iter().sum::<f32>();
    shift_i.1 += ay.iter().sum::<f32>();

    (contacts, used)
}
