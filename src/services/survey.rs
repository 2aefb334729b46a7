//! When is a stress-resilience (SRI) survey due?
//!
//! Cadence: on the very first walk and every 5th finished walk after that,
//! but never twice on the same day, to avoid survey fatigue.

pub fn is_survey_due(closed_walk_count: i64, sampled_today: bool) -> bool {
    if sampled_today {
        return false;
    }
    closed_walk_count == 0 || closed_walk_count % 5 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_before_any_walk() {
        assert!(is_survey_due(0, false));
    }

    #[test]
    fn due_on_every_fifth_walk() {
        assert!(is_survey_due(5, false));
        assert!(is_survey_due(10, false));
    }

    #[test]
    fn not_due_between_multiples() {
        assert!(!is_survey_due(7, false));
        assert!(!is_survey_due(1, false));
    }

    #[test]
    fn todays_sample_overrides_the_cadence() {
        assert!(!is_survey_due(5, true));
        assert!(!is_survey_due(0, true));
    }
}
