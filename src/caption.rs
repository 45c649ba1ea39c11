use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::debug;

use crate::models::{RankedBatter, RankedBowler};
use crate::render::{batting_balls_text, batting_score_text, bowling_figures_text};

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// One line per selected performer, e.g. "R Smith 80* (55) vs Elland CC 1st XI".
pub fn performance_summary(batters: &[RankedBatter], bowlers: &[RankedBowler]) -> String {
    let mut lines = Vec::with_capacity(batters.len() + bowlers.len());
    for b in batters {
        lines.push(format!(
            "{} {} {} vs {}",
            b.record.player_name,
            batting_score_text(b),
            batting_balls_text(b),
            b.record.opposition_team_name
        ));
    }
    for b in bowlers {
        lines.push(format!(
            "{} {} vs {}",
            b.record.player_name,
            bowling_figures_text(b),
            b.record.opposition_team_name
        ));
    }
    lines.join("\n")
}

fn caption_prompt(summary: &str) -> String {
    format!(
        "Write a fun, informal and engaging cricket match summary caption for social media \
         based on the following performance summary:\n\n{}\n\nKeep it under 280 characters.",
        summary
    )
}

/// Writes the weekly social-media caption through the OpenAI chat API.
pub struct CaptionClient {
    http: Client,
    api_key: String,
    model: String,
}

impl CaptionClient {
    pub fn new(api_key: &str, model: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(CaptionClient {
            http,
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    pub async fn weekly_caption(&self, summary: &str) -> Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": caption_prompt(summary)}],
            "temperature": 0.9,
            "max_tokens": 100,
        });

        debug!("Requesting caption from {}", self.model);
        let resp = self
            .http
            .post(OPENAI_CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("Caption request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Caption request error {}: {}", status, body);
        }

        let raw: serde_json::Value = resp.json().await.context("Failed to parse caption response")?;
        extract_caption(&raw)
    }
}

fn extract_caption(raw: &serde_json::Value) -> Result<String> {
    raw["choices"][0]["message"]["content"]
        .as_str()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .context("caption missing from response")
}
