// src/storage/ics.rs
use crate::extractors::holiday::{Holiday, YearHolidays};
use chrono::Days;
use icalendar::{parser, Calendar, Component, Event, EventLike, Property};
use std::collections::BTreeSet;

/// Calendar-level property listing the years already written.
pub const YEAR_MARKER: &str = "X-HOLIDAY-YEARS";
const CALENDAR_NAME: &str = "中国法定节假日";
const UID_DOMAIN: &str = "holiday.gov.cn";

/// Renders one all-day event per holiday, plus the year marker.
pub fn render_calendar(results: &[YearHolidays]) -> String {
    let years: Vec<String> = results.iter().map(|r| r.year.to_string()).collect();

    // Calendar header plus the marker read back by the next run
    let mut calendar = Calendar::new();
    calendar.name(CALENDAR_NAME);
    calendar.append_property(Property::new(YEAR_MARKER, years.join(",").as_str()));

    // One event per holiday, in announcement then clause order
    for result in results {
        for (index, holiday) in result.holidays.iter().enumerate() {
            calendar.push(holiday_event(result.year, index, holiday));
        }
    }

    calendar.done().to_string()
}

fn holiday_event(year: i32, index: usize, holiday: &Holiday) -> Event {
    // DTEND is exclusive for all-day events
    let end = holiday.end_date.checked_add_days(Days::new(1)).unwrap_or(holiday.end_date);

    // UID is stable across runs
    let mut event = Event::new();
    event
        .uid(&format!("{}-{}-{}@{}", year, index, holiday.start_date, UID_DOMAIN))
        .summary(&holiday.name)
        .starts(holiday.start_date)
        .ends(end);

    // Compensatory workdays only go in the description
    if !holiday.compensatory_dates.is_empty() {
        let days: Vec<String> = holiday.compensatory_dates.iter().map(|d| d.to_string()).collect();
        event.description(&format!("调休上班：{}", days.join("、")));
    }
    event.done()
}

/// Reads the year marker back from a previously written calendar.
///
/// Anything unreadable counts as "nothing recorded yet".
pub fn read_year_marker(raw: &str) -> BTreeSet<i32> {
    // Long lines are folded on write
    let unfolded = parser::unfold(raw);
    let calendar = match parser::read_calendar(&unfolded) {
        Ok(calendar) => calendar,
        Err(e) => {
            tracing::warn!("Ignoring unparsable calendar: {}", e);
            return BTreeSet::new();
        }
    };

    // The marker is a calendar-level property, not part of any event
    let Some(marker) = calendar.properties.iter().find(|p| p.name.as_str() == YEAR_MARKER) else {
        tracing::debug!("No {} property in existing calendar", YEAR_MARKER);
        return BTreeSet::new();
    };

    // The writer escapes commas in property values
    marker
        .val
        .as_str()
        .replace("\\,", ",")
        .split(',')
        .filter_map(|year| year.trim().parse().ok()) // skip anything that is not a year
        .collect()
}
