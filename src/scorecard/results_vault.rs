use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use super::payload::{key_of, RawScorecard};
use super::source::{get_json, FetchError, ScorecardSource};

/// Header the Results Vault API insists on; its value is scraped from a
/// browser session by an [`AuthHeaderProvider`](crate::auth::AuthHeaderProvider).
pub const AUTH_HEADER_NAME: &str = "x-ias-api-request";

const API_ID: &str = "1002";
const BROWSER_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/136.0.0.0 Safari/537.36";

/// Fallback scorecard source: Results Vault, the store behind the
/// play-cricket club sites.
///
/// Needs two calls per match: a mapping lookup turning the play-cricket id
/// into a Results Vault id, then the scorecard itself.
pub struct ResultsVaultSource {
    http: Client,
    mapping_url: String,
    namespace: String,
    api_url: String,
    /// Club site the browser requests originate from
    origin: String,
}

impl ResultsVaultSource {
    pub fn new(
        mapping_url: &str,
        namespace: &str,
        api_url: &str,
        origin: &str,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ResultsVaultSource {
            http,
            mapping_url: mapping_url.trim_end_matches('/').to_string(),
            namespace: namespace.trim_matches('/').to_string(),
            api_url: api_url.trim_end_matches('/').to_string(),
            origin: origin.trim_end_matches('/').to_string(),
        })
    }

    async fn resolve_match_id(&self, match_id: &str, auth: &str) -> Result<String, FetchError> {
        let url = format!("{}/{}/{}/", self.mapping_url, self.namespace, match_id);
        debug!("Resolving Results Vault id from {}", url);

        let req = self
            .http
            .get(&url)
            .query(&[("apiid", API_ID), ("sportid", "1")])
            .header("User-Agent", "Mozilla/5.0")
            .header("Accept", "application/json")
            .header(AUTH_HEADER_NAME, auth);
        let body = get_json(req).await?;
        mapped_id(&body).ok_or_else(|| FetchError::MissingMapping(match_id.to_string()))
    }
}

fn mapped_id(body: &Value) -> Option<String> {
    key_of(&body["object_id1"])
}

/// A fallback response is usable as soon as it carries the teams block.
pub fn validate_results_vault(body: Value) -> Result<RawScorecard, FetchError> {
    if body.get("MatchTeams").is_none() {
        return Err(FetchError::Invalid("missing 'MatchTeams' key".into()));
    }
    Ok(RawScorecard::ResultsVault(body))
}

#[async_trait]
impl ScorecardSource for ResultsVaultSource {
    fn name(&self) -> &str {
        "Results Vault"
    }

    async fn fetch(
        &self,
        match_id: &str,
        auth_header: Option<&str>,
    ) -> Result<RawScorecard, FetchError> {
        let auth = auth_header
            .filter(|h| !h.trim().is_empty())
            .ok_or(FetchError::MissingAuthHeader)?;

        let rv_id = self.resolve_match_id(match_id, auth).await?;
        info!("Match {} maps to Results Vault match {}", match_id, rv_id);

        let url = format!("{}/matches/{}/", self.api_url, rv_id);
        let req = self
            .http
            .get(&url)
            .query(&[("apiid", API_ID), ("strmflg", "3")])
            .header("accept", "application/json, text/plain, */*")
            .header("accept-language", "en-GB,en-US;q=0.9,en;q=0.8")
            .header("origin", self.origin.as_str())
            .header("referer", format!("{}/", self.origin))
            .header("user-agent", BROWSER_UA)
            .header(AUTH_HEADER_NAME, auth);
        validate_results_vault(get_json(req).await?)
    }
}
