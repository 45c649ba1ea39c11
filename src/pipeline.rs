use std::sync::Arc;

use anyhow::Result;
use chrono::Local;
use tracing::{error, info, warn};

use crate::auth::{resolve_auth_header, AuthHeaderProvider, CommandAuthHeader, StaticAuthHeader};
use crate::caption::{performance_summary, CaptionClient};
use crate::config::Config;
use crate::match_list::fetch_match_ids;
use crate::models::{MatchRecords, RankedBatter, RankedBowler};
use crate::ranking::{top_batters, top_bowlers};
use crate::render::calendar::{date_label, game_week, last_saturday, parse_season_start};
use crate::render::{CardHeader, Fonts, Renderer};
use crate::scorecard::{
    fetch_scorecard, normalize, FetchFailure, NvSource, ResultsVaultSource, ScorecardSource,
};
use crate::sponsors::SponsorRoster;

/// Result of walking every match id once.
#[derive(Debug, Default)]
pub struct SeasonTables {
    pub records: MatchRecords,
    pub matches_used: usize,
    pub skipped: Vec<FetchFailure>,
}

/// Fetch and normalize each match in turn. A match whose sources all fail is
/// skipped; it never stops the rest.
pub async fn collect_season(
    sources: &[Arc<dyn ScorecardSource>],
    match_ids: &[String],
    auth_header: Option<&str>,
    club_name: &str,
) -> SeasonTables {
    let mut tables = SeasonTables::default();

    for match_id in match_ids {
        match fetch_scorecard(sources, match_id, auth_header).await {
            Ok(fetched) => {
                let records = normalize(&fetched.payload, club_name);
                if records.is_empty() {
                    warn!(
                        "Match {} ({}): no rows for {}",
                        fetched.match_id, fetched.source, club_name
                    );
                }
                info!(
                    "Match {} ({}): {} batting, {} bowling rows",
                    fetched.match_id,
                    fetched.source,
                    records.batting.len(),
                    records.bowling.len()
                );
                tables.records.extend(records);
                tables.matches_used += 1;
            }
            Err(failure) => {
                warn!("Skipping match: {}", failure);
                tables.skipped.push(failure);
            }
        }
    }

    tables
}

/// The weekly run, wired from [`Config`].
pub struct Pipeline {
    config: Config,
    sources: Vec<Arc<dyn ScorecardSource>>,
    auth_providers: Vec<Box<dyn AuthHeaderProvider>>,
}

impl Pipeline {
    pub fn from_config(config: Config) -> Result<Self> {
        let timeout = config.request_timeout();

        // Order matters: primary first, fallback second.
        let sources: Vec<Arc<dyn ScorecardSource>> = vec![
            Arc::new(NvSource::new(
                &config.nv_api_url,
                &config.nv_customer_id,
                timeout,
            )?),
            Arc::new(ResultsVaultSource::new(
                &config.rv_mapping_url,
                &config.rv_namespace,
                &config.rv_api_url,
                &config.rv_origin,
                timeout,
            )?),
        ];

        let mut auth_providers: Vec<Box<dyn AuthHeaderProvider>> =
            vec![Box::new(StaticAuthHeader::new(config.rv_api_header.clone()))];
        if let Some(cmd) = config.auth_header_command.as_deref() {
            auth_providers.push(Box::new(CommandAuthHeader::new(
                cmd,
                &config.match_page_url,
                config.auth_header_timeout(),
            )?));
        }

        Ok(Pipeline {
            config,
            sources,
            auth_providers,
        })
    }

    async fn match_ids(&self) -> Result<Vec<String>> {
        if !self.config.match_ids.is_empty() {
            info!("Using {} match id(s) from config", self.config.match_ids.len());
            return Ok(self.config.match_ids.clone());
        }
        fetch_match_ids(
            &self.config.match_list_url,
            &self.config.match_list_keyword,
            self.config.request_timeout(),
        )
        .await
    }

    pub async fn run(&self) -> Result<()> {
        let match_ids = self.match_ids().await?;
        let Some(first) = match_ids.first() else {
            warn!("No matches found for '{}'; nothing to do", self.config.match_list_keyword);
            return Ok(());
        };

        let auth_header = resolve_auth_header(&self.auth_providers, first).await;
        let tables = collect_season(
            &self.sources,
            &match_ids,
            auth_header.as_deref(),
            &self.config.club_name,
        )
        .await;
        info!(
            "Season tables: {} batting, {} bowling rows from {}/{} match(es)",
            tables.records.batting.len(),
            tables.records.bowling.len(),
            tables.matches_used,
            match_ids.len()
        );
        if !tables.skipped.is_empty() {
            let skipped: Vec<&str> = tables.skipped.iter().map(|f| f.match_id.as_str()).collect();
            warn!("Skipped {} match(es): {}", skipped.len(), skipped.join(", "));
        }

        let roster = SponsorRoster::load(&self.config.sponsor_csv, self.config.request_timeout()).await?;
        if roster.is_empty() {
            warn!("Sponsor roster is empty; every performer gets the placeholder");
        }
        let batters = top_batters(&tables.records.batting, &roster, self.config.top_n);
        let bowlers = top_bowlers(&tables.records.bowling, &roster, self.config.top_n);
        log_selection(&batters, &bowlers);

        let today = Local::now().date_naive();
        let saturday = last_saturday(today);
        let header = CardHeader {
            game_week: game_week(parse_season_start(&self.config.season_start)?, saturday),
            date_label: date_label(saturday),
        };
        self.render(&header, &batters, &bowlers);

        if let Some(key) = self.config.openai_api_key.as_deref() {
            self.write_caption(key, &header, &batters, &bowlers).await;
        }
        Ok(())
    }

    fn render(&self, header: &CardHeader, batters: &[RankedBatter], bowlers: &[RankedBowler]) {
        let fonts = match Fonts::load(&self.config.bold_font, &self.config.light_font) {
            Ok(f) => f,
            Err(e) => {
                error!("Cannot render graphics: {:#}", e);
                return;
            }
        };
        let renderer = Renderer::new(fonts, &self.config.output_dir);

        if let Err(e) = renderer.render_batting(&self.config.batting_template, header, batters) {
            error!("Batting graphic failed: {:#}", e);
        }
        if let Err(e) = renderer.render_bowling(&self.config.bowling_template, header, bowlers) {
            error!("Bowling graphic failed: {:#}", e);
        }
    }

    async fn write_caption(
        &self,
        api_key: &str,
        header: &CardHeader,
        batters: &[RankedBatter],
        bowlers: &[RankedBowler],
    ) {
        let summary = performance_summary(batters, bowlers);
        let result = async {
            let client = CaptionClient::new(
                api_key,
                &self.config.openai_model,
                self.config.request_timeout(),
            )?;
            let caption = client.weekly_caption(&summary).await?;
            let path = self
                .config
                .output_dir
                .join(format!("Caption_{}.txt", header.date_label));
            tokio::fs::write(&path, &caption).await?;
            info!("Caption saved as {}: {}", path.display(), caption);
            anyhow::Ok(())
        }
        .await;
        if let Err(e) = result {
            warn!("Caption generation failed: {:#}", e);
        }
    }
}

fn log_selection(batters: &[RankedBatter], bowlers: &[RankedBowler]) {
    for (i, b) in batters.iter().enumerate() {
        info!(
            "Batting #{}: {} {} ({:?} balls) vs {} [{}]",
            i + 1,
            b.record.player_name,
            b.record.runs,
            b.record.balls,
            b.record.opposition_team_name,
            b.sponsor_name
        );
    }
    for (i, b) in bowlers.iter().enumerate() {
        info!(
            "Bowling #{}: {} {:?}-{:?} vs {} [{}]",
            i + 1,
            b.record.player_name,
            b.record.wickets,
            b.record.runs,
            b.record.opposition_team_name,
            b.sponsor_name
        );
    }
}
