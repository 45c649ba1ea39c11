pub mod normalize;
pub mod nv;
pub mod payload;
pub mod results_vault;
pub mod source;

pub use normalize::normalize;
pub use nv::NvSource;
pub use payload::RawScorecard;
pub use results_vault::ResultsVaultSource;
pub use source::{FetchError, ScorecardSource};

use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

/// A scorecard together with the source that produced it.
#[derive(Debug, Clone)]
pub struct FetchedScorecard {
    pub match_id: String,
    pub source: String,
    pub payload: RawScorecard,
}

/// Every source in the chain failed for one match.
#[derive(Debug)]
pub struct FetchFailure {
    pub match_id: String,
    /// (source name, error) in the order the sources were tried
    pub attempts: Vec<(String, FetchError)>,
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no scorecard for match {}", self.match_id)?;
        for (source, err) in &self.attempts {
            write!(f, "; {}: {}", source, err)?;
        }
        Ok(())
    }
}

impl std::error::Error for FetchFailure {}

/// Try each source in order and return the first scorecard that passes that
/// source's validation.
///
/// Each source gets exactly one attempt; a failure (HTTP error, timeout,
/// malformed or incomplete JSON) moves on to the next one.
pub async fn fetch_scorecard(
    sources: &[Arc<dyn ScorecardSource>],
    match_id: &str,
    auth_header: Option<&str>,
) -> Result<FetchedScorecard, FetchFailure> {
    let mut attempts = Vec::new();

    for source in sources {
        if !attempts.is_empty() {
            info!("Match {}: falling back to {}", match_id, source.name());
        }
        match source.fetch(match_id, auth_header).await {
            Ok(payload) => {
                info!(
                    "Match {}: scorecard from {} ({})",
                    match_id,
                    source.name(),
                    payload.kind()
                );
                return Ok(FetchedScorecard {
                    match_id: match_id.to_string(),
                    source: source.name().to_string(),
                    payload,
                });
            }
            Err(e) => {
                warn!("Match {}: {} failed: {}", match_id, source.name(), e);
                attempts.push((source.name().to_string(), e));
            }
        }
    }

    Err(FetchFailure {
        match_id: match_id.to_string(),
        attempts,
    })
}
