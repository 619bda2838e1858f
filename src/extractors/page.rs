// src/extractors/page.rs
use crate::extractors::announcement::Announcement;
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

// --- CSS Selectors (Lazy Static) ---
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("Failed to compile TITLE_SELECTOR"));

// Region of a gov.cn policy page holding the notice text
static CONTENT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("#UCAP-CONTENT").expect("Failed to compile CONTENT_SELECTOR"));

/// Pulls the title and notice text out of a cached or freshly downloaded page.
pub fn extract_page(article_id: &str, html: &str) -> Result<Announcement, ExtractError> {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|el| el.text().collect::<String>())
        .ok_or_else(|| ExtractError::ContentNotFound(format!("<title> missing in page {}", article_id)))?;

    let body = document
        .select(&CONTENT_SELECTOR)
        .next()
        .map(|el| el.text().collect::<String>())
        .ok_or_else(|| ExtractError::ContentNotFound(format!("#UCAP-CONTENT missing in page {}", article_id)))?;

    tracing::debug!("Page {}: title '{}', {} chars of content", article_id, title.trim(), body.chars().count());
    Announcement::from_parts(article_id, title.trim(), body)
}
