//! Rescaling of backend relevance scores.
//!
//! Raw scores are only comparable within one response, so each batch is
//! min-max scaled to 0–100 and then pushed through a logistic curve centred on
//! the middle of the range. `steepness` controls how quickly scores saturate:
//! only hits well above or below the midpoint end up near 100 or 0.

use crate::models::score::Score;

/// Floor for the max-min spread so a uniform batch does not divide by zero.
const MIN_RANGE: f64 = 1e-4;

/// Normalizes every raw score in `raw` relative to the batch.
///
/// Missing or non-finite scores are treated as 0.
pub fn normalize_scores(raw: &[f64], steepness: f64) -> Vec<Score> {
    if raw.is_empty() {
        return Vec::new();
    }

    let clean: Vec<f64> = raw
        .iter()
        .map(|&s| if s.is_finite() { s } else { 0.0 })
        .collect();
    let max = clean.iter().copied().fold(f64::MIN, f64::max);
    let min = clean.iter().copied().fold(f64::MAX, f64::min);
    let range = (max - min).max(MIN_RANGE);

    clean
        .iter()
        .map(|&score| {
            let linear = (score - min) / range * 100.0;
            Score::new(compress(linear, steepness))
        })
        .collect()
}

fn compress(linear: f64, steepness: f64) -> f64 {
    100.0 / (1.0 + (-((linear / 100.0 - 0.5) * steepness)).exp())
}
