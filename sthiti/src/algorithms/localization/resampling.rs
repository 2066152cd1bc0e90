//! Weight normalization and low-variance resampling.

use crate::core::RandomSource;

use super::particle_filter::Particle;

/// Convert log-weights to linear weights scaled so the best is exactly 1.
///
/// Returns the weights and the maximum log-weight, or `None` when no
/// log-weight is finite. Non-finite entries get weight 0.
pub fn normalize_log_weights(log_weights: &[f64]) -> Option<(Vec<f64>, f64)> {
    let max_log_weight = log_weights
        .iter()
        .copied()
        .filter(|lw| lw.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);

    if !max_log_weight.is_finite() {
        return None;
    }

    let weights = log_weights
        .iter()
        .map(|&lw| {
            if lw.is_finite() {
                (lw - max_log_weight).exp()
            } else {
                0.0
            }
        })
        .collect();

    Some((weights, max_log_weight))
}

/// Low-variance (systematic) resampling.
///
/// Draws a single offset in `[0, total / N)` and walks the cumulative
/// weights in steps of `total / N`, so a particle with weight `w` is copied
/// `N * w / total` times on average and the variance of the copy counts is
/// minimal. Output particles carry weight `1 / N`.
///
/// Returns `None` for an empty set or when the total weight is zero or not
/// finite.
pub fn low_variance_resample<R: RandomSource>(
    particles: &[Particle],
    rng: &mut R,
) -> Option<Vec<Particle>> {
    let n = particles.len();
    if n == 0 {
        return None;
    }

    let mut cumulative: Vec<f64> = Vec::with_capacity(n);
    let mut total = 0.0;
    for p in particles {
        total += p.weight;
        cumulative.push(total);
    }

    if !total.is_finite() || total <= 0.0 {
        return None;
    }

    let step = total / n as f64;
    let uniform_weight = 1.0 / n as f64;
    let mut r = rng.uniform(0.0, step);
    let mut idx = 0;
    let mut resampled = Vec::with_capacity(n);

    for _ in 0..n {
        while cumulative[idx] <= r && idx < n - 1 {
            idx += 1;
        }

        resampled.push(Particle::with_weight(particles[idx].pose, uniform_weight));
        r += step;
    }

    Some(resampled)
}

/// Effective number of particles, `(Σw)² / Σw²`.
///
/// Invariant to weight scale. Returns 0 when all weights are zero.
pub fn effective_sample_size(particles: &[Particle]) -> f64 {
    let (sum, sum_sq) = particles
        .iter()
        .fold((0.0, 0.0), |(s, sq), p| (s + p.weight, sq + p.weight * p.weight));

    if sum_sq > 1e-300 {
        sum * sum / sum_sq
    } else {
        0.0
    }
}
