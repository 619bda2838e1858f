// src/extractors/line.rs

// --- Imports ---
use crate::extractors::holiday::{calendar_date, parse_number, Holiday};
use crate::utils::error::ExtractError;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

// --- Regex Patterns for Clause Matching (Lazy Static) ---
// `^` anchors to the start of the segment and `.` stops at line breaks, so the
// name can only come from the first line of a clause.

// "<name>：M月D1日至D2日放假"
static SAME_MONTH_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*)：(\d+)月(\d+)日至(\d+)日放假")
        .expect("Failed to compile SAME_MONTH_RANGE_RE")
});

// "<name>：M1月D1日至M2月D2日放假"
static CROSS_MONTH_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*)：(\d+)月(\d+)日至(\d+)月(\d+)日放假")
        .expect("Failed to compile CROSS_MONTH_RANGE_RE")
});

// "M月D日（星期X）", anywhere in the segment
static COMPENSATORY_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)月(\d+)日（星期.?）").expect("Failed to compile COMPENSATORY_DAY_RE")
});

/// A named range picked up by one of the two range patterns.
struct RangeMatch {
    name: String,
    start: NaiveDate,
    end: NaiveDate,
}

/// Tries to read one holiday out of a single announcement segment.
///
/// The three patterns are applied independently and in a fixed order:
/// 1. same-month range,
/// 2. cross-month range, which overwrites the result of (1) when both match,
/// 3. every compensatory workday annotated with its weekday.
///
/// A record comes back only when (1) or (2) produced a name. Compensatory days
/// found without a name are dropped. Impossible dates are errors, whichever
/// pattern produced them.
pub fn parse_line(year: i32, line: &str) -> Result<Option<Holiday>, ExtractError> {
    let mut range = same_month_range(year, line)?;

    if let Some(cross) = cross_month_range(year, line)? {
        if range.is_some() {
            tracing::trace!("Cross-month range overrides same-month range in '{}'", line);
        }
        range = Some(cross);
    }

    let compensatory_dates = compensatory_days(year, line)?;

    let Some(RangeMatch { name, start, end }) = range else {
        if !compensatory_dates.is_empty() {
            tracing::debug!(
                "Dropping {} compensatory day(s) without a holiday name: '{}'",
                compensatory_dates.len(),
                line.trim()
            );
        }
        return Ok(None);
    };

    let holiday = Holiday::new(name, start, end, compensatory_dates)?;
    tracing::debug!("Parsed holiday {}", holiday);
    Ok(Some(holiday))
}

fn same_month_range(year: i32, line: &str) -> Result<Option<RangeMatch>, ExtractError> {
    let Some(caps) = SAME_MONTH_RANGE_RE.captures(line) else {
        return Ok(None);
    };
    if caps[1].is_empty() {
        return Ok(None);
    }
    let month = number(&caps, 2);
    Ok(Some(RangeMatch {
        name: caps[1].to_string(),
        start: calendar_date(year, month, number(&caps, 3))?,
        end: calendar_date(year, month, number(&caps, 4))?,
    }))
}

fn cross_month_range(year: i32, line: &str) -> Result<Option<RangeMatch>, ExtractError> {
    let Some(caps) = CROSS_MONTH_RANGE_RE.captures(line) else {
        return Ok(None);
    };
    if caps[1].is_empty() {
        return Ok(None);
    }
    Ok(Some(RangeMatch {
        name: caps[1].to_string(),
        start: calendar_date(year, number(&caps, 2), number(&caps, 3))?,
        end: calendar_date(year, number(&caps, 4), number(&caps, 5))?,
    }))
}

fn compensatory_days(year: i32, line: &str) -> Result<Vec<NaiveDate>, ExtractError> {
    COMPENSATORY_DAY_RE
        .captures_iter(line)
        .map(|caps| calendar_date(year, number(&caps, 1), number(&caps, 2)))
        .collect()
}

// Unreadable or overlong digit runs saturate and are then rejected as invalid dates.
fn number(caps: &Captures, group: usize) -> u32 {
    parse_number(&caps[group]).unwrap_or(u32::MAX)
}
