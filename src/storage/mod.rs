// src/storage/mod.rs
pub mod ics;
pub mod json;

use crate::extractors::holiday::YearHolidays;
use crate::utils::error::StorageError;
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

pub const ICS_FILE_NAME: &str = "china.holiday.ics";
pub const JSON_FILE_NAME: &str = "china.holiday.json";
const PAGE_EXTENSION: &str = "html";

pub struct StorageManager {
    output_dir: PathBuf,
    cache_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager, creating the output and page cache directories if needed
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(output_dir: P, cache_dir: Q) -> Result<Self, StorageError> {
        let output_dir = output_dir.as_ref().to_path_buf();
        let cache_dir = cache_dir.as_ref().to_path_buf();

        for dir in [&output_dir, &cache_dir] {
            if !dir.exists() {
                fs::create_dir_all(dir).map_err(StorageError::IoError)?;
            }
        }

        Ok(Self { output_dir, cache_dir })
    }

    pub fn ics_path(&self) -> PathBuf {
        self.output_dir.join(ICS_FILE_NAME)
    }

    pub fn json_path(&self) -> PathBuf {
        self.output_dir.join(JSON_FILE_NAME)
    }

    fn page_path(&self, article_id: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.{}", article_id, PAGE_EXTENSION))
    }

    /// Article ids of every page in the cache directory
    pub fn cached_article_ids(&self) -> Result<HashSet<String>, StorageError> {
        let mut ids = HashSet::new();
        for entry in fs::read_dir(&self.cache_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(PAGE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.insert(stem.to_string());
            }
        }
        Ok(ids)
    }

    pub fn load_cached_page(&self, article_id: &str) -> Result<String, StorageError> {
        let path = self.page_path(article_id);
        tracing::debug!("Reading cached page {}", path.display());
        Ok(fs::read_to_string(path)?)
    }

    pub fn save_page(&self, article_id: &str, html: &str) -> Result<PathBuf, StorageError> {
        let path = self.page_path(article_id);
        fs::write(&path, html)?;
        tracing::debug!("Cached page to {}", path.display());
        Ok(path)
    }

    /// Every cached page as (article id, html), ordered by id
    pub fn cached_pages(&self) -> Result<Vec<(String, String)>, StorageError> {
        let mut ids: Vec<String> = self.cached_article_ids()?.into_iter().collect();
        ids.sort();
        ids.into_iter()
            .map(|id| -> Result<(String, String), StorageError> {
                let html = self.load_cached_page(&id)?;
                Ok((id, html))
            })
            .collect()
    }

    /// Years recorded in the calendar written by an earlier run.
    /// A missing or unreadable file means nothing is recorded.
    pub fn recorded_years(&self) -> BTreeSet<i32> {
        match fs::read_to_string(self.ics_path()) {
            Ok(raw) => ics::read_year_marker(&raw),
            Err(e) => {
                tracing::debug!("No previous calendar at {}: {}", self.ics_path().display(), e);
                BTreeSet::new()
            }
        }
    }

    /// Writes the JSON file and the calendar, returning their paths.
    /// The calendar carries the year marker, so it only lands once the JSON is in place.
    pub fn write_outputs(&self, results: &[YearHolidays]) -> Result<(PathBuf, PathBuf), StorageError> {
        let ics_path = self.ics_path();
        let json_path = self.json_path();

        // Render both before touching disk
        let json_content = json::render_json(results)?;
        let ics_content = ics::render_calendar(results);

        atomic_write(&json_path, json_content)?;
        tracing::info!("Saved holiday data to {}", json_path.display());

        // Commit the year marker last
        atomic_write(&ics_path, ics_content)?;
        tracing::info!("Saved calendar to {}", ics_path.display());

        Ok((ics_path, json_path))
    }
}

/// Write to a "<name>.tmp" sibling then rename over the target
fn atomic_write<C: AsRef<[u8]>>(path: &Path, contents: C) -> Result<(), StorageError> {
    let tmp_path = tmp_path_for(path);
    fs::write(&tmp_path, contents)?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}

// china.holiday.ics -> china.holiday.ics.tmp, so each output has its own temp file
fn tmp_path_for(path: &Path) -> PathBuf {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => path.with_extension(format!("{}.tmp", ext)),
        None => path.with_extension("tmp"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::holiday::Holiday;
    use chrono::NaiveDate;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("holiday_extractor_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_page_cache() {
        let dir = scratch_dir("page_cache");
        let storage = StorageManager::new(dir.join("out"), dir.join("holidays")).unwrap();
        assert!(storage.cached_article_ids().unwrap().is_empty());

        storage.save_page("5734106", "<html>b</html>").unwrap();
        storage.save_page("5652840", "<html>a</html>").unwrap();
        fs::write(dir.join("holidays").join("notes.txt"), "ignored").unwrap();

        let ids = storage.cached_article_ids().unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("5734106"));
        assert_eq!(storage.load_cached_page("5652840").unwrap(), "<html>a</html>");

        let pages = storage.cached_pages().unwrap();
        assert_eq!(pages[0].0, "5652840");
        assert_eq!(pages[1], ("5734106".to_string(), "<html>b</html>".to_string()));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_outputs_and_recorded_years() {
        let dir = scratch_dir("outputs");
        let storage = StorageManager::new(dir.join("out"), dir.join("holidays")).unwrap();
        assert!(storage.recorded_years().is_empty());

        let d = |m, day| NaiveDate::from_ymd_opt(2023, m, day).unwrap();
        let results = vec![YearHolidays {
            year: 2023,
            holidays: vec![Holiday::new("春节", d(1, 21), d(1, 27), vec![d(1, 28), d(1, 29)]).unwrap()],
        }];

        let (ics_path, json_path) = storage.write_outputs(&results).unwrap();
        assert!(ics_path.ends_with(ICS_FILE_NAME));
        assert!(fs::read_to_string(&json_path).unwrap().contains("\"2023-01-21\""));
        assert!(!dir.join("out").join("china.holiday.ics.tmp").exists());
        assert!(!dir.join("out").join("china.holiday.json.tmp").exists());
        assert_eq!(storage.recorded_years().into_iter().collect::<Vec<_>>(), vec![2023]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_failed_json_write_leaves_no_year_marker() {
        let dir = scratch_dir("json_fails");
        let storage = StorageManager::new(dir.join("out"), dir.join("holidays")).unwrap();
        // A directory at the JSON path makes the rename fail.
        fs::create_dir_all(storage.json_path()).unwrap();

        let d = |m, day| NaiveDate::from_ymd_opt(2023, m, day).unwrap();
        let results = vec![YearHolidays {
            year: 2023,
            holidays: vec![Holiday::new("清明节", d(4, 5), d(4, 5), vec![]).unwrap()],
        }];

        assert!(storage.write_outputs(&results).is_err());
        assert!(!storage.ics_path().exists());
        assert!(storage.recorded_years().is_empty());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_tmp_paths_are_distinct() {
        assert_eq!(tmp_path_for(Path::new("out/china.holiday.ics")), Path::new("out/china.holiday.ics.tmp"));
        assert_eq!(tmp_path_for(Path::new("out/china.holiday.json")), Path::new("out/china.holiday.json.tmp"));
        assert_eq!(tmp_path_for(Path::new("out/marker")), Path::new("out/marker.tmp"));
    }

    #[test]
    fn test_garbage_calendar_means_nothing_recorded() {
        let dir = scratch_dir("garbage");
        let storage = StorageManager::new(dir.join("out"), dir.join("holidays")).unwrap();
        fs::write(storage.ics_path(), "\u{0}\u{1} not ics").unwrap();
        assert!(storage.recorded_years().is_empty());
        fs::remove_dir_all(&dir).unwrap();
    }
}
