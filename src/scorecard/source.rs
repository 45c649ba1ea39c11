use async_trait::async_trait;
use thiserror::Error;

use super::payload::RawScorecard;

/// Why a single source could not produce a usable scorecard.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response rejected: {0}")]
    Invalid(String),

    #[error("no x-ias-api-request header available")]
    MissingAuthHeader,

    #[error("no Results Vault id mapped for match {0}")]
    MissingMapping(String),
}

/// Every source in the fallback chain implements this.
#[async_trait]
pub trait ScorecardSource: Send + Sync {
    /// Fetch and validate one match's scorecard.
    async fn fetch(
        &self,
        match_id: &str,
        auth_header: Option<&str>,
    ) -> Result<RawScorecard, FetchError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// Send a prepared GET and decode the body as JSON, mapping every failure
/// mode onto [`FetchError`].
pub(crate) async fn get_json(
    req: reqwest::RequestBuilder,
) -> Result<serde_json::Value, FetchError> {
    let resp = req.send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status,
            url: resp.url().to_string(),
        });
    }
    let body = resp.text().await?;
    Ok(serde_json::from_str(&body)?)
}
