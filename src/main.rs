// src/main.rs
mod extractors;
mod govcn;
mod storage;
mod utils;

use clap::Parser;
use extractors::{extract_page, run_pipeline, Announcement, PipelineOutcome};
use govcn::{client, SearchQuery};
use std::collections::BTreeSet;
use storage::StorageManager;
use utils::AppError;

/// Builds a calendar of Chinese public holidays from State Council notices
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory receiving china.holiday.ics and china.holiday.json
    #[arg(short, long, default_value = ".")]
    output_dir: String,

    /// Directory caching the downloaded notice pages
    #[arg(short, long, default_value = "./holidays")]
    cache_dir: String,

    /// Title keyword for the gov.cn policy search
    #[arg(short, long, default_value = client::DEFAULT_KEYWORD)]
    keyword: String,

    /// Number of search results to fetch
    #[arg(long, default_value_t = client::DEFAULT_PAGE_SIZE)]
    page_size: u32,

    /// Skip the search and process every page already in the cache
    #[arg(long)]
    offline: bool,

    /// Rewrite the outputs even if every year is already recorded
    #[arg(short, long)]
    force: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    // 3. Initialize storage
    let storage = StorageManager::new(&args.output_dir, &args.cache_dir)?;

    // 4. Gather notice pages
    let pages = if args.offline {
        tracing::info!("Offline mode: reading cached pages from {}", args.cache_dir);
        storage.cached_pages()?
    } else {
        let query = SearchQuery { keyword: args.keyword.clone(), page_size: args.page_size };
        let hits = client::search_announcements(&query).await?;
        client::collect_pages(&hits, &storage).await?
    };
    tracing::info!("Collected {} notice page(s)", pages.len());

    // 5. Extract and write, unless an earlier run already covered these years
    process_pages(&storage, &pages, args.force)?;

    Ok(())
}

/// Turns (article id, html) pages into the calendar and JSON outputs.
/// Returns false when every year was already recorded and nothing was written.
fn process_pages(storage: &StorageManager, pages: &[(String, String)], force: bool) -> Result<bool, AppError> {
    let announcements = pages
        .iter()
        .map(|(article_id, html)| extract_page(article_id, html))
        .collect::<Result<Vec<Announcement>, _>>()?;

    let recorded_years = if force { BTreeSet::new() } else { storage.recorded_years() };
    tracing::debug!("Previously recorded years: {:?}", recorded_years);

    match run_pipeline(&announcements, &recorded_years)? {
        PipelineOutcome::NoNewHolidays => {
            tracing::info!("无新增节假日 (no new holidays)");
            Ok(false)
        }
        PipelineOutcome::Extracted(results) => {
            for result in &results {
                for holiday in &result.holidays {
                    tracing::info!("{}: {} ({} days)", result.year, holiday, holiday.duration_days());
                }
            }
            let total: usize = results.iter().map(|r| r.holidays.len()).sum();
            storage.write_outputs(&results)?;
            tracing::info!("Processing finished. {} holiday(s) across {} notice(s)", total, results.len());
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn page(year: i32, clauses: &str) -> String {
        format!(
            r#"<html><head><title>国务院办公厅关于{year}年部分节假日安排的通知</title></head>
            <body><div id="UCAP-CONTENT"><p>现将{year}年安排通知如下。</p>{clauses}</div></body></html>"#
        )
    }

    fn scratch_storage(name: &str) -> (std::path::PathBuf, StorageManager) {
        let dir = std::env::temp_dir().join(format!("holiday_extractor_main_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        let storage = StorageManager::new(dir.join("out"), dir.join("holidays")).unwrap();
        (dir, storage)
    }

    #[test]
    fn test_second_run_with_known_years_writes_nothing() {
        let (dir, storage) = scratch_storage("incremental");
        let pages = vec![
            ("2".to_string(), page(2023, "<p>一、春节：1月21日至27日放假调休，共7天。1月28日（星期六）、1月29日（星期日）上班。</p>")),
            ("1".to_string(), page(2022, "<p>一、元旦：1月1日至3日放假，共3天。</p>")),
        ];

        assert!(process_pages(&storage, &pages, false).unwrap());
        let json = fs::read_to_string(storage.json_path()).unwrap();
        assert!(json.contains("春节") && json.contains("元旦"));

        // Remove the JSON so a second write would be visible.
        fs::remove_file(storage.json_path()).unwrap();
        assert!(!process_pages(&storage, &pages[..1], false).unwrap());
        assert!(!storage.json_path().exists());

        assert!(process_pages(&storage, &pages[..1], true).unwrap());
        assert!(storage.json_path().exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_new_year_triggers_rewrite() {
        let (dir, storage) = scratch_storage("new_year");
        let first = vec![("1".to_string(), page(2022, "<p>一、元旦：1月1日至3日放假。</p>"))];
        assert!(process_pages(&storage, &first, false).unwrap());

        let second = vec![
            ("2".to_string(), page(2023, "<p>一、清明节：4月5日至5日放假。</p>")),
            first[0].clone(),
        ];
        assert!(process_pages(&storage, &second, false).unwrap());
        let years: Vec<i32> = storage.recorded_years().into_iter().collect();
        assert_eq!(years, vec![2022, 2023]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_bad_title_aborts_run() {
        let (dir, storage) = scratch_storage("bad_title");
        let pages = vec![(
            "9".to_string(),
            r#"<html><head><title>通知</title></head><body><div id="UCAP-CONTENT">一、元旦：1月1日至3日放假。</div></body></html>"#.to_string(),
        )];
        assert!(matches!(process_pages(&storage, &pages, false), Err(AppError::Extraction(_))));
        assert!(!storage.ics_path().exists());
        fs::remove_dir_all(&dir).unwrap();
    }
}
