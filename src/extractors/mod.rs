// src/extractors/mod.rs
pub mod announcement;
pub mod holiday;
pub mod line;
pub mod page;

// Re-export key extraction types for convenience
#[allow(unused_imports)]
pub use announcement::{run_pipeline, Announcement, PipelineOutcome};
#[allow(unused_imports)]
pub use holiday::{Holiday, YearHolidays};
pub use page::extract_page;
