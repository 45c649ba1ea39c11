use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::payload::RawScorecard;
use super::source::{get_json, FetchError, ScorecardSource};

/// Primary scorecard source: the ECB NV Play scorecard API.
pub struct NvSource {
    http: Client,
    base_url: String,
    customer_id: String,
}

impl NvSource {
    pub fn new(base_url: &str, customer_id: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0")
            .build()
            .context("Failed to build HTTP client")?;
        Ok(NvSource {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            customer_id: customer_id.to_string(),
        })
    }
}

/// The primary response only counts if it names the fixture and has at least
/// one innings; anything less sends the match to the fallback.
pub fn validate_nv(body: Value) -> Result<RawScorecard, FetchError> {
    if body.get("Match").is_none() {
        return Err(FetchError::Invalid("missing 'Match' key".into()));
    }
    let has_innings = body
        .get("Innings")
        .and_then(Value::as_array)
        .is_some_and(|a| !a.is_empty());
    if !has_innings {
        return Err(FetchError::Invalid("empty 'Innings'".into()));
    }
    Ok(RawScorecard::classify(body))
}

#[async_trait]
impl ScorecardSource for NvSource {
    fn name(&self) -> &str {
        "NV Play"
    }

    async fn fetch(
        &self,
        match_id: &str,
        _auth_header: Option<&str>,
    ) -> Result<RawScorecard, FetchError> {
        let url = format!("{}/{}", self.base_url, match_id);
        debug!("Fetching NV scorecard from {}", url);

        let req = self.http.get(&url).query(&[
            ("idType", "play-cricket"),
            ("customerId", self.customer_id.as_str()),
            ("playerids", "true"),
            ("stats", "true"),
            ("commentary", "true"),
        ]);
        validate_nv(get_json(req).await?)
    }
}
