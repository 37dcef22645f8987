//! Document search index client.
//!
//! Thin HTTP client posting structured boolean query documents to an
//! Elasticsearch-compatible `_search` endpoint. The `DocumentIndex` trait is
//! the seam the orchestrator is tested against.

use super::dsl::SearchBody;
use crate::config::IndexConfig;
use crate::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use std::time::Duration;

#[async_trait]
pub trait DocumentIndex {
    async fn search(&self, body: &SearchBody) -> Result<IndexResponse>;
}

/// One ranked hit: stored fields plus per-field highlight spans.
#[derive(Debug, Clone)]
pub struct Hit {
    pub source: Map<String, JsonValue>,
    /// Field name to highlight fragments, in response order.
    pub highlight: Map<String, JsonValue>,
}

#[derive(Debug, Clone)]
pub struct IndexResponse {
    pub hits: Vec<Hit>,
    pub total: u64,
}

pub struct IndexClient {
    http: reqwest::Client,
    base_url: String,
    index: String,
}

impl IndexClient {
    pub fn new(config: &IndexConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(crate::Error::Index)?;
        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            index: config.index.clone(),
        })
    }
}

#[async_trait]
impl DocumentIndex for IndexClient {
    async fn search(&self, body: &SearchBody) -> Result<IndexResponse> {
        let url = format!("{}/{}/_search", self.base_url, self.index);
        tracing::debug!(url = %url, "executing index search");

        let response = self
            .http
            .post(&url)
            .json(&body.to_json())
            .send()
            .await?
            .error_for_status()?;

        let raw: RawResponse = response.json().await?;
        Ok(raw.into())
    }
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    hits: RawHits,
}

#[derive(Debug, Deserialize)]
struct RawHits {
    total: RawTotal,
    hits: Vec<RawHit>,
}

/// Older index versions report a bare count, newer ones an object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTotal {
    Count(u64),
    Object { value: u64 },
}

impl RawTotal {
    fn value(&self) -> u64 {
        match self {
            Self::Count(n) => *n,
            Self::Object { value } => *value,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_source", default)]
    source: Map<String, JsonValue>,
    #[serde(default)]
    highlight: Map<String, JsonValue>,
}

impl From<RawResponse> for IndexResponse {
    fn from(raw: RawResponse) -> Self {
        Self {
            total: raw.hits.total.value(),
            hits: raw
                .hits
                .hits
                .into_iter()
                .map(|h| Hit {
                    source: h.source,
                    highlight: h.highlight,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_object_style_total() {
        let raw: RawResponse = serde_json::from_value(json!({
            "hits": {
                "total": { "value": 7, "relation": "eq" },
                "hits": [
                    {
                        "_source": { "no": "2014-01", "name": "Some Opinion" },
                        "highlight": { "text": ["a <em>match</em>"] }
                    }
                ]
            }
        }))
        .unwrap();
        let response = IndexResponse::from(raw);
        assert_eq!(response.total, 7);
        assert_eq!(response.hits.len(), 1);
        assert_eq!(response.hits[0].source["no"], json!("2014-01"));
        assert_eq!(response.hits[0].highlight["text"], json!(["a <em>match</em>"]));
    }

    #[test]
    fn parses_bare_count_total_and_missing_highlight() {
        let raw: RawResponse = serde_json::from_value(json!({
            "hits": {
                "total": 3,
                "hits": [{ "_source": { "no": "100" } }]
            }
        }))
        .unwrap();
        let response = IndexResponse::from(raw);
        assert_eq!(response.total, 3);
        assert!(response.hits[0].highlight.is_empty());
    }
}
