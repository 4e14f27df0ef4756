//! Pure scoring functions comparing one candidate against extracted job requirements.
//!
//! None of these fail: malformed inputs are coerced and every score is in `[0, 100]`.

pub mod experience;
pub mod normalize;
pub mod position;
pub mod skills;
