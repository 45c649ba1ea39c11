use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::models::SponsorEntry;

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "Player Name", default)]
    player_name: Option<String>,
    #[serde(rename = "Sponsor Name", default)]
    sponsor_name: Option<String>,
}

/// Player name → sponsor name, loaded fresh every run.
#[derive(Debug, Clone, Default)]
pub struct SponsorRoster {
    by_player: HashMap<String, String>,
}

impl SponsorRoster {
    pub fn from_entries(entries: impl IntoIterator<Item = SponsorEntry>) -> Self {
        let mut by_player = HashMap::new();
        for e in entries {
            by_player.entry(e.player_name).or_insert(e.sponsor_name);
        }
        SponsorRoster { by_player }
    }

    /// Load the roster from an `http(s)` URL (e.g. a spreadsheet CSV export)
    /// or a local file path.
    pub async fn load(location: &str, timeout: Duration) -> Result<Self> {
        let raw = if location.starts_with("http://") || location.starts_with("https://") {
            let http = Client::builder()
                .timeout(timeout)
                .build()
                .context("Failed to build HTTP client")?;
            debug!("Fetching sponsor roster from {}", location);
            let resp = http
                .get(location)
                .send()
                .await
                .context("Sponsor roster request failed")?;
            if !resp.status().is_success() {
                anyhow::bail!("Sponsor roster error: {}", resp.status());
            }
            resp.text().await.context("Failed to read sponsor roster")?
        } else {
            tokio::fs::read_to_string(location)
                .await
                .with_context(|| format!("Failed to read sponsor roster {}", location))?
        };

        let roster = Self::from_entries(parse_roster(&raw)?);
        info!("Loaded sponsors for {} player(s)", roster.len());
        Ok(roster)
    }

    pub fn sponsor_for(&self, player_name: &str) -> Option<&str> {
        self.by_player.get(player_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_player.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_player.is_empty()
    }
}

/// Parse the roster CSV. Extra columns are ignored; rows missing either a
/// player or a sponsor are dropped.
pub fn parse_roster(raw: &str) -> Result<Vec<SponsorEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(raw.as_bytes());

    let headers = reader.headers().context("Sponsor roster has no header row")?;
    for column in ["Player Name", "Sponsor Name"] {
        if !headers.iter().any(|h| h == column) {
            anyhow::bail!("Sponsor roster is missing the '{}' column", column);
        }
    }

    let mut entries = Vec::new();
    for row in reader.deserialize::<RosterRow>() {
        let row = row.context("Malformed sponsor roster row")?;
        let player = row.player_name.filter(|s| !s.is_empty());
        let sponsor = row.sponsor_name.filter(|s| !s.is_empty());
        if let (Some(player_name), Some(sponsor_name)) = (player, sponsor) {
            entries.push(SponsorEntry {
                player_name,
                sponsor_name,
            });
        }
    }
    Ok(entries)
}
