// src/storage/json.rs
use crate::extractors::holiday::YearHolidays;
use crate::utils::error::StorageError;

/// Renders `[{year, holidays: [{name, start_date, end_date, compensatory_dates}]}]`.
pub fn render_json(results: &[YearHolidays]) -> Result<String, StorageError> {
    serde_json::to_string_pretty(results).map_err(|e| StorageError::SerializationError(e.to_string()))
}
