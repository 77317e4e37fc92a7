//! Statistics kernel.
//!
//! Pure functions over `f64` slices. Sorting happens once at the call site;
//! `median` and `percentile` expect already-sorted input.

use rand::Rng;
use statrs::statistics::Statistics;
use std::f64::consts::PI;

/// Draw one normal variate with the Box–Muller transform.
///
/// Always consumes exactly two uniforms from `rng`, so a zero `std_dev`
/// keeps the stream aligned with the non-degenerate case.
pub fn sample_normal<R: Rng + ?Sized>(mean: f64, std_dev: f64, rng: &mut R) -> f64 {
    // gen() yields [0, 1); flip to (0, 1] so ln(u) is finite
    let u = 1.0 - rng.gen::<f64>();
    let v = 1.0 - rng.gen::<f64>();
    mean + std_dev * (-2.0 * u.ln()).sqrt() * (2.0 * PI * v).cos()
}

/// Arithmetic mean, 0 for an empty slice.
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().mean()
}

/// Population standard deviation (divides by N), 0 for an empty slice.
pub fn std_dev(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().population_std_dev()
}

/// Median of sorted data; averages the two middle elements on even length.
pub fn median(sorted: &[f64]) -> f64 {
    let len = sorted.len();
    if len == 0 {
        return 0.0;
    }
    if len % 2 == 0 {
        (sorted[len / 2 - 1] + sorted[len / 2]) / 2.0
    } else {
        sorted[len / 2]
    }
}

/// Index used by [`percentile`]: `floor(p·N)` clamped to `[0, N−1]`.
pub fn percentile_index(len: usize, p: f64) -> usize {
    if len == 0 {
        return 0;
    }
    let raw = (p * len as f64).floor();
    if raw <= 0.0 {
        0
    } else {
        (raw as usize).min(len - 1)
    }
}

/// Percentile lookup on sorted data using the linear `floor(p·N)` index.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    sorted[percentile_index(sorted.len(), p)]
}

/// Pearson correlation coefficient.
///
/// Returns 0 when either series has zero variance, or the series are empty
/// or of different length.
pub fn correlation(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.is_empty() || xs.len() != ys.len() {
        return 0.0;
    }

    let sd_x = std_dev(xs);
    let sd_y = std_dev(ys);
    if sd_x == 0.0 || sd_y == 0.0 || !sd_x.is_finite() || !sd_y.is_finite() {
        return 0.0;
    }

    let covariance = xs.iter().population_covariance(ys.iter());
    (covariance / (sd_x * sd_y)).clamp(-1.0, 1.0)
}

/// Sort a copy of the data ascending; NaN compares as equal.
pub fn sorted_copy(xs: &[f64]) -> Vec<f64> {
    let mut sorted = xs.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}
