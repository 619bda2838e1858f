// src/extractors/announcement.rs
use crate::extractors::holiday::{parse_number, YearHolidays};
use crate::extractors::line::parse_line;
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

// "一、" through "十、", the document's own clause numbering.
static CLAUSE_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[一二三四五六七八九十]、").expect("Failed to compile CLAUSE_MARKER_RE")
});

static TITLE_YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^国务院办公厅关于(\d{4})年.*$").expect("Failed to compile TITLE_YEAR_RE")
});

/// One fetched notice, reduced to the text the pipeline needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub article_id: String,
    pub title: String,
    pub year: i32,
    pub body: String,
}

impl Announcement {
    /// Builds an announcement, reading its year from the title.
    pub fn from_parts(
        article_id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Self, ExtractError> {
        let title = title.into();
        let year = extract_year(&title)?;
        Ok(Self { article_id: article_id.into(), title, year, body: body.into() })
    }
}

/// What a pipeline run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Every announcement year is already recorded in earlier output.
    NoNewHolidays,
    Extracted(Vec<YearHolidays>),
}

/// Splits an announcement body on its numbered clause markers, dropping the markers.
pub fn segments(body: &str) -> impl Iterator<Item = &str> {
    CLAUSE_MARKER_RE.split(body)
}

/// Reads the year out of a "国务院办公厅关于YYYY年…" title.
pub fn extract_year(title: &str) -> Result<i32, ExtractError> {
    let title = title.trim();
    TITLE_YEAR_RE
        .captures(title)
        .and_then(|caps| parse_number(&caps[1]))
        .and_then(|year| i32::try_from(year).ok())
        .ok_or_else(|| ExtractError::UnexpectedTitle(title.to_string()))
}

/// Parses every clause of one announcement, keeping clause order.
pub fn parse_announcement(announcement: &Announcement) -> Result<YearHolidays, ExtractError> {
    let mut holidays = Vec::new();
    for segment in segments(&announcement.body) {
        if let Some(holiday) = parse_line(announcement.year, segment)? {
            holidays.push(holiday);
        }
    }
    tracing::info!(
        "Announcement {} '{}' ({}): {} holiday(s)",
        announcement.article_id,
        announcement.title,
        announcement.year,
        holidays.len()
    );
    Ok(YearHolidays { year: announcement.year, holidays })
}

/// Parses a batch of announcements, keeping the order they were received in.
pub fn parse_announcements(announcements: &[Announcement]) -> Result<Vec<YearHolidays>, ExtractError> {
    announcements.iter().map(parse_announcement).collect()
}

/// True when every announcement's year already appears in `recorded_years`.
pub fn all_years_recorded(announcements: &[Announcement], recorded_years: &BTreeSet<i32>) -> bool {
    announcements.iter().all(|a| recorded_years.contains(&a.year))
}

/// Runs extraction unless the years in `announcements` were all handled by an earlier run.
pub fn run_pipeline(
    announcements: &[Announcement],
    recorded_years: &BTreeSet<i32>,
) -> Result<PipelineOutcome, ExtractError> {
    if all_years_recorded(announcements, recorded_years) {
        tracing::debug!("All announcement years already recorded: {:?}", recorded_years);
        return Ok(PipelineOutcome::NoNewHolidays);
    }
    parse_announcements(announcements).map(PipelineOutcome::Extracted)
}
