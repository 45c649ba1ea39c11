//! Top-N selection over the season tables.
//!
//! Ranking is per single-innings record, never per-player season totals: a
//! player with two big scores can take two places.

use std::cmp::Ordering;

use crate::models::{
    BattingRecord, BowlingRecord, Ranked, RankedBatter, RankedBowler,
    BATTING_PLACEHOLDER_SPONSOR, BOWLING_PLACEHOLDER_SPONSOR,
};
use crate::sponsors::SponsorRoster;

/// Scorecard rows that are not players.
const NON_PLAYER_ROWS: [&str; 2] = ["Extras", "Total"];

/// Scorecard spellings mapped to the name the sponsor roster uses.
const NAME_ALIASES: [(&str, &str); 1] = [("T Stead", "Ted Stead")];

/// Strip not-out / wicketkeeper glyphs and apply the alias table.
pub fn normalize_player_name(raw: &str) -> String {
    let stripped: String = raw.chars().filter(|c| !matches!(c, '*' | '†')).collect();
    let stripped = stripped.trim();
    NAME_ALIASES
        .iter()
        .find(|(from, _)| *from == stripped)
        .map(|(_, to)| to.to_string())
        .unwrap_or_else(|| stripped.to_string())
}

fn is_player(name: &str) -> bool {
    !NON_PLAYER_ROWS.contains(&name)
}

/// NaN sorts as missing so the ordering stays total.
fn sort_key(v: Option<f64>) -> Option<f64> {
    v.filter(|x| !x.is_nan())
}

/// Descending with missing values last.
fn desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (sort_key(a), sort_key(b)) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Ascending with missing values last.
fn asc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (sort_key(a), sort_key(b)) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Highest runs first; equal runs go to whoever faced fewer balls.
pub fn top_batters(
    records: &[BattingRecord],
    roster: &SponsorRoster,
    limit: usize,
) -> Vec<RankedBatter> {
    let mut rows: Vec<BattingRecord> = records
        .iter()
        .cloned()
        .map(|mut r| {
            r.player_name = normalize_player_name(&r.player_name);
            r
        })
        .filter(|r| is_player(&r.player_name))
        .collect();

    rows.sort_by(|a, b| desc(Some(a.runs), Some(b.runs)).then_with(|| asc(a.balls, b.balls)));
    rows.truncate(limit);

    rows.into_iter()
        .map(|record| {
            let sponsor_name = sponsor_or(roster, &record.player_name, BATTING_PLACEHOLDER_SPONSOR);
            Ranked {
                record,
                sponsor_name,
            }
        })
        .collect()
}

/// Most wickets first; equal wickets go to whoever conceded fewer runs.
pub fn top_bowlers(
    records: &[BowlingRecord],
    roster: &SponsorRoster,
    limit: usize,
) -> Vec<RankedBowler> {
    let mut rows: Vec<BowlingRecord> = records
        .iter()
        .cloned()
        .map(|mut r| {
            r.player_name = normalize_player_name(&r.player_name);
            r
        })
        .filter(|r| is_player(&r.player_name))
        .collect();

    rows.sort_by(|a, b| desc(a.wickets, b.wickets).then_with(|| asc(a.runs, b.runs)));
    rows.truncate(limit);

    rows.into_iter()
        .map(|record| {
            let sponsor_name = sponsor_or(roster, &record.player_name, BOWLING_PLACEHOLDER_SPONSOR);
            Ranked {
                record,
                sponsor_name,
            }
        })
        .collect()
}

fn sponsor_or(roster: &SponsorRoster, player_name: &str, placeholder: &str) -> String {
    roster
        .sponsor_for(player_name)
        .unwrap_or(placeholder)
        .to_string()
}
