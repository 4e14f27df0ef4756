use std::fmt;

use serde::Serialize;

/// A relevance score bounded to `[0, 100]` and rounded to two decimals.
///
/// The only way to build one is through [`Score::new`], so every sub-score and
/// final score that leaves the scoring code is already in range.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Score(f64);

impl Score {
    pub const ZERO: Score = Score(0.0);
    pub const MAX: Score = Score(100.0);

    /// Clamps `value` into `[0, 100]` and rounds to two decimals. NaN becomes 0.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Score(round_to(value.clamp(0.0, 100.0), 2))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Rounds half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}
