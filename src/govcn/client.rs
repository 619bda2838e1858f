// src/govcn/client.rs
use crate::govcn::models::{SearchHit, SearchResponse};
use crate::storage::StorageManager;
use crate::utils::error::GovCnError;
use reqwest::header;
use std::time::Duration;

// gov.cn serves an error page to clients without a browser User-Agent
const GOVCN_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/97.0.4692.71 Safari/537.36";
const GOVCN_REFERER: &str = "http://www.gov.cn/";
const SEARCH_URL: &str = "http://xxgk.www.gov.cn/search-zhengce/";
const GOVCN_REQUEST_DELAY_MS: u64 = 150;

pub const DEFAULT_KEYWORD: &str = "节假日";
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Parameters for the policy search
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub keyword: String,
    pub page_size: u32,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self { keyword: DEFAULT_KEYWORD.to_string(), page_size: DEFAULT_PAGE_SIZE }
    }
}

impl SearchQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("mode", "smart".to_string()),
            ("sort", "relevant".to_string()),
            ("page_index", "1".to_string()),
            ("page_size", self.page_size.to_string()),
            ("title", self.keyword.clone()),
        ]
    }
}

/// Creates a reqwest client configured for gov.cn interaction.
fn build_govcn_client() -> Result<reqwest::Client, reqwest::Error> {
    let mut headers = header::HeaderMap::new();
    headers.insert(header::REFERER, header::HeaderValue::from_static(GOVCN_REFERER));

    reqwest::Client::builder()
        .user_agent(GOVCN_USER_AGENT)
        .default_headers(headers)
        .build()
}

fn check_status(status: reqwest::StatusCode, url: &str) -> Result<(), GovCnError> {
    if status.is_success() {
        return Ok(());
    }
    tracing::error!("HTTP error status: {} for URL: {}", status, url);
    Err(GovCnError::Http(status))
}

/// Asks the policy search for holiday notices.
pub async fn search_announcements(query: &SearchQuery) -> Result<Vec<SearchHit>, GovCnError> {
    let client = build_govcn_client()?;
    tracing::info!("Searching gov.cn for '{}' (page size {})", query.keyword, query.page_size);

    let response = client.get(SEARCH_URL).query(&query.params()).send().await?;
    check_status(response.status(), SEARCH_URL)?;

    let body = response.text().await?;
    let parsed: SearchResponse =
        serde_json::from_str(&body).map_err(|e| GovCnError::Parse(e.to_string()))?;

    tracing::info!("Search returned {} notice(s)", parsed.data.len());
    Ok(parsed.data)
}

/// Downloads one notice page as UTF-8 text.
pub async fn fetch_page(url: &str) -> Result<String, GovCnError> {
    let client = build_govcn_client()?;

    // --- Basic Rate Limiting ---
    tokio::time::sleep(Duration::from_millis(GOVCN_REQUEST_DELAY_MS)).await;

    tracing::info!("Downloading page from: {}", url);
    let response = client.get(url).send().await?;
    check_status(response.status(), url)?;

    let bytes = response.bytes().await?;
    let html = String::from_utf8(bytes.to_vec())
        .map_err(|e| GovCnError::Parse(format!("{} is not UTF-8: {}", url, e)))?;
    tracing::debug!("Successfully downloaded {} bytes from {}", html.len(), url);
    Ok(html)
}

/// Returns (article id, html) for every hit, reading the page cache first
/// and downloading (then caching) only the pages it does not hold.
pub async fn collect_pages(
    hits: &[SearchHit],
    storage: &StorageManager,
) -> Result<Vec<(String, String)>, GovCnError> {
    let cached = storage.cached_article_ids()?;
    let mut pages = Vec::with_capacity(hits.len());

    for hit in hits {
        let html = if cached.contains(&hit.article_id) {
            tracing::debug!("Cache hit for article {}", hit.article_id);
            storage.load_cached_page(&hit.article_id)?
        } else {
            tracing::debug!("Fetching article {} '{}'", hit.article_id, hit.title);
            let html = fetch_page(&hit.url).await?;
            storage.save_page(&hit.article_id, &html)?;
            html
        };
        pages.push((hit.article_id.clone(), html));
    }

    Ok(pages)
}
