use chrono::{Datelike, Month, NaiveDate};

use crate::errors::{LedgerError, Result};

/// Month filter used by the summary report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthFilter(Month);

impl MonthFilter {
    /// Accepts `1`..`12`, with or without a leading zero (`03`).
    pub fn parse(token: &str) -> Result<Self> {
        let trimmed = token.trim();
        let valid_shape =
            (1..=2).contains(&trimmed.len()) && trimmed.bytes().all(|b| b.is_ascii_digit());
        let month = valid_shape
            .then(|| trimmed.parse::<u8>().ok())
            .flatten()
            .and_then(|number| Month::try_from(number).ok());
        month.map(Self).ok_or_else(|| {
            LedgerError::validation(format!("invalid month `{}` (use 01-12)", token))
        })
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    pub fn matches(&self, date: NaiveDate) -> bool {
        date.month() == self.0.number_from_month()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_digit_tokens() {
        let march = MonthFilter::parse("03").unwrap();
        assert_eq!(march.name(), "March");
        assert!(march.matches(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()));
        assert!(!march.matches(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()));
        assert_eq!(MonthFilter::parse("12").unwrap().name(), "December");
        assert_eq!(MonthFilter::parse("7").unwrap().name(), "July");
    }

    #[test]
    fn rejects_out_of_range_tokens() {
        for token in ["00", "13", "003", "-1", "march", ""] {
            let err = MonthFilter::parse(token).unwrap_err();
            assert!(matches!(err, LedgerError::Validation(_)), "token `{token}`");
        }
    }
}
