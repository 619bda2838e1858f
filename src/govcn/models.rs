// src/govcn/models.rs
use serde::{Deserialize, Deserializer, Serialize};

/// Response of the gov.cn policy search endpoint
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub data: Vec<SearchHit>,
}

/// One notice returned by the search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "articleid", deserialize_with = "string_or_number")]
    pub article_id: String,
    #[serde(default)]
    pub title: String,
    pub url: String,
}

// The API is not consistent about quoting article ids.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("unexpected articleid: {}", other))),
    }
}
