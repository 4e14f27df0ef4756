use crate::models::score::Score;

const EXACT_TITLE_SCORE: f64 = 100.0;
const OVERLAPPING_TITLE_SCORE: f64 = 70.0;

/// Scores the job title against a candidate's past positions.
///
/// Case-insensitive equality with any position scores 100; one title
/// containing the other scores 70. The best position wins.
pub fn match_position(job_title: &str, positions: &[String]) -> Score {
    let title = job_title.trim().to_lowercase();
    if title.is_empty() {
        return Score::ZERO;
    }

    let mut best = 0.0_f64;
    for position in positions {
        let position = position.trim().to_lowercase();
        if position.is_empty() {
            continue;
        }
        if position == title {
            return Score::new(EXACT_TITLE_SCORE);
        }
        if title.contains(&position) || position.contains(&title) {
            best = best.max(OVERLAPPING_TITLE_SCORE);
        }
    }
    Score::new(best)
}
