use crate::models::score::Score;

/// Scores a candidate's years of experience against the requirement.
///
/// Meeting or exceeding the requirement scores 100; falling short scores
/// proportionally. With no stated requirement there is nothing to measure
/// against and the score is 0.
pub fn match_experience(candidate_years: f64, required_years: f64) -> Score {
    let candidate_years = sanitize_years(candidate_years);
    let required_years = sanitize_years(required_years);

    if required_years <= 0.0 {
        return Score::ZERO;
    }
    if candidate_years >= required_years {
        return Score::MAX;
    }
    Score::new(candidate_years / required_years * 100.0)
}

fn sanitize_years(years: f64) -> f64 {
    if years.is_finite() {
        years.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_requirement_scores_full() {
        assert_eq!(match_experience(5.0, 5.0), Score::MAX);
    }

    #[test]
    fn test_exceeding_requirement_scores_full() {
        assert_eq!(match_experience(12.0, 5.0), Score::MAX);
    }

    #[test]
    fn test_shortfall_is_proportional() {
        assert_eq!(match_experience(3.0, 5.0).value(), 60.0);
        assert_eq!(match_experience(1.0, 3.0).value(), 33.33);
    }

    #[test]
    fn test_zero_over_zero_is_zero() {
        assert_eq!(match_experience(0.0, 0.0), Score::ZERO);
    }

    #[test]
    fn test_no_requirement_is_zero() {
        assert_eq!(match_experience(7.0, 0.0), Score::ZERO);
    }

    #[test]
    fn test_garbage_inputs_stay_in_range() {
        assert_eq!(match_experience(f64::NAN, 5.0), Score::ZERO);
        assert_eq!(match_experience(-2.0, 4.0), Score::ZERO);
        assert_eq!(match_experience(f64::INFINITY, 4.0), Score::ZERO);
    }
}
