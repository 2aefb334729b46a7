//! Calendar helpers shared by the day-bucket and report handlers.

use chrono::NaiveDate;

/// Six-digit day label used as the client-facing calendar id:
/// 2-digit year, 2-digit month, 2-digit day.
pub fn calendar_label(year: i32, month: i32, day: i32) -> String {
    format!("{:02}{:02}{:02}", year.rem_euclid(100), month, day)
}

/// Half-open date range covering one calendar month. December rolls over
/// into January of the next year.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((start, end))
}

/// Floor to one decimal place, for the report's km and hour figures.
pub fn floor1(value: f64) -> f64 {
    (value * 10.0).floor() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_pads_and_truncates() {
        assert_eq!(calendar_label(2025, 3, 7), "250307");
        assert_eq!(calendar_label(2024, 12, 31), "241231");
    }

    #[test]
    fn month_bounds_mid_year() {
        let (start, end) = month_bounds(2025, 3).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
    }

    #[test]
    fn month_bounds_december_rolls_to_january() {
        let (start, end) = month_bounds(2025, 12).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }

    #[test]
    fn month_bounds_rejects_bad_month() {
        assert!(month_bounds(2025, 13).is_none());
        assert!(month_bounds(2025, 0).is_none());
    }

    #[test]
    fn floor1_truncates_toward_zero() {
        assert_eq!(floor1(3.49), 3.4);
        assert_eq!(floor1(3.0), 3.0);
        assert_eq!(floor1(0.09), 0.0);
    }
}
