// src/govcn/mod.rs
pub mod client;
pub mod models;

#[allow(unused_imports)]
pub use client::SearchQuery;
#[allow(unused_imports)]
pub use models::SearchHit;
