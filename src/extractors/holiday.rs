// src/extractors/holiday.rs
use crate::utils::error::ExtractError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One holiday block parsed out of an announcement clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Weekend days turned into workdays, in the order they appear in the text.
    pub compensatory_dates: Vec<NaiveDate>,
}

impl Holiday {
    /// Builds a record, rejecting an empty name or a range running backwards.
    pub fn new(
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        compensatory_dates: Vec<NaiveDate>,
    ) -> Result<Self, ExtractError> {
        let name = name.into();

        // A record needs a name and a forward range
        if name.is_empty() {
            return Err(ExtractError::EmptyName);
        }
        if end_date < start_date {
            return Err(ExtractError::InvertedRange { name, start: start_date, end: end_date });
        }
        Ok(Self { name, start_date, end_date, compensatory_dates })
    }

    /// Number of days off, both ends included.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

impl fmt::Display for Holiday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - {}", self.name, self.start_date, self.end_date)?;
        // Compensatory workdays, only when there are any
        if !self.compensatory_dates.is_empty() {
            let dates: Vec<String> = self.compensatory_dates.iter().map(|d| d.to_string()).collect();
            write!(f, ", [{}]", dates.join(", "))?;
        }
        Ok(())
    }
}

/// All holidays found in one announcement, keyed by the announcement's year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearHolidays {
    pub year: i32,
    pub holidays: Vec<Holiday>,
}

/// Reads a run of decimal digits, ASCII or full-width ("１２").
pub fn parse_number(digits: &str) -> Option<u32> {
    digits.chars().try_fold(0u32, |acc, c| {
        let digit = match c {
            '０'..='９' => c as u32 - '０' as u32,
            _ => c.to_digit(10)?,
        };
        acc.checked_mul(10)?.checked_add(digit)
    })
}

/// Builds a calendar date, surfacing impossible month/day values as errors.
pub fn calendar_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, ExtractError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or(ExtractError::InvalidDate { year, month, day })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_rejects_backwards_range() {
        let err = Holiday::new("国庆节", d(2023, 10, 6), d(2023, 9, 29), vec![]).unwrap_err();
        assert!(matches!(err, ExtractError::InvertedRange { .. }));
    }

    #[test]
    fn test_rejects_empty_name() {
        assert_eq!(
            Holiday::new("", d(2023, 1, 1), d(2023, 1, 1), vec![]),
            Err(ExtractError::EmptyName)
        );
    }

    #[test]
    fn test_single_day_holiday() {
        let h = Holiday::new("清明节", d(2023, 4, 5), d(2023, 4, 5), vec![]).unwrap();
        assert_eq!(h.duration_days(), 1);
        assert_eq!(h.to_string(), "清明节: 2023-04-05 - 2023-04-05");
    }

    #[test]
    fn test_display_lists_compensatory_dates() {
        let h = Holiday::new(
            "春节",
            d(2022, 1, 31),
            d(2022, 2, 6),
            vec![d(2022, 1, 29), d(2022, 1, 30)],
        )
        .unwrap();
        assert_eq!(h.duration_days(), 7);
        assert_eq!(h.to_string(), "春节: 2022-01-31 - 2022-02-06, [2022-01-29, 2022-01-30]");
    }

    #[test]
    fn test_parse_ascii_and_fullwidth_digits() {
        assert_eq!(parse_number("2023"), Some(2023));
        assert_eq!(parse_number("１２"), Some(12));
        assert_eq!(parse_number("１0"), Some(10));
        assert_eq!(parse_number("99999999999"), None);
        assert_eq!(parse_number("٣"), None);
    }

    #[test]
    fn test_invalid_calendar_date() {
        assert_eq!(
            calendar_date(2023, 2, 30),
            Err(ExtractError::InvalidDate { year: 2023, month: 2, day: 30 })
        );
        assert_eq!(calendar_date(2024, 2, 29), Ok(d(2024, 2, 29)));
    }

    #[test]
    fn test_serializes_dates_as_text() {
        let h = Holiday::new("元旦", d(2022, 1, 1), d(2022, 1, 3), vec![d(2022, 1, 2)]).unwrap();
        let json = serde_json::to_value(&h).unwrap();
        assert_eq!(json["start_date"], "2022-01-01");
        assert_eq!(json["end_date"], "2022-01-03");
        assert_eq!(json["compensatory_dates"][0], "2022-01-02");
    }
}
