use chrono::NaiveDate;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    /// 1-based month number.
    pub fn number(self) -> u32 {
        Month::iter().position(|m| m == self).map_or(1, |i| i as u32 + 1)
    }
}

/// Number of calendar days in `month` (a month name) of `year`.
///
/// Returns `None` when either part does not parse.
pub fn days_in_month(month: &str, year: &str) -> Option<u32> {
    let month: Month = month.trim().parse().ok()?;
    let year: i32 = year.trim().parse().ok()?;

    let first = NaiveDate::from_ymd_opt(year, month.number(), 1)?;
    let next = if month == Month::December {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month.number() + 1, 1)?
    };

    Some(next.signed_duration_since(first).num_days() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month("March", "2025"), Some(31));
        assert_eq!(days_in_month("April", "2025"), Some(30));
        assert_eq!(days_in_month("December", "2025"), Some(31));
    }

    #[test]
    fn test_february_leap_years() {
        assert_eq!(days_in_month("February", "2024"), Some(29));
        assert_eq!(days_in_month("february", "2025"), Some(28));
        assert_eq!(days_in_month("FEBRUARY", "1900"), Some(28));
        assert_eq!(days_in_month("February", "2000"), Some(29));
    }

    #[test]
    fn test_unparsable_input() {
        assert_eq!(days_in_month("Smarch", "2025"), None);
        assert_eq!(days_in_month("March", "twenty"), None);
        assert_eq!(days_in_month("", ""), None);
    }

    #[test]
    fn test_month_numbers() {
        assert_eq!(Month::January.number(), 1);
        assert_eq!(Month::December.number(), 12);
        assert_eq!(Month::March.to_string(), "March");
    }
}
