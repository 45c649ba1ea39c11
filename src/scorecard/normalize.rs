//! Scorecard → season-table rows.
//!
//! Both upstream schemas are reduced to the same [`BattingRecord`] /
//! [`BowlingRecord`] rows for the club. Normalization never fails: an
//! unrecognised payload, or a field that is missing, yields fewer rows or
//! `None` values rather than an error, so one odd scorecard cannot sink the
//! weekly run.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use super::payload::{key_of, num, round2, RawScorecard};
use crate::models::{BattingRecord, BowlingRecord, MatchRecords};

/// Dismissal texts the fallback source uses for "did not get out".
const NOT_OUT_DISMISSALS: [&str; 3] = ["", "dnb", "no"];

pub fn normalize(payload: &RawScorecard, club_name: &str) -> MatchRecords {
    match payload {
        RawScorecard::Nv(body) => normalize_nv(body, club_name),
        RawScorecard::ResultsVault(body) => normalize_results_vault(body, club_name),
        RawScorecard::Unrecognized(_) => MatchRecords::default(),
    }
}

/// How the two sides of a fixture look from the club's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Sides {
    /// Club label with the club name removed ("Lightcliffe CC 2nd XI" → "2nd XI")
    team_number: String,
    /// The other side's full label
    opposition: String,
}

impl Sides {
    fn resolve(club_name: &str, team1: &str, team2: &str) -> Self {
        let (own, other) = if team1.contains(club_name) {
            (team1, team2)
        } else {
            (team2, team1)
        };
        Sides {
            team_number: own.replace(club_name, "").trim().to_string(),
            opposition: other.to_string(),
        }
    }

    /// The label the primary source uses for the club's batting innings.
    fn batting_label(&self, club_name: &str) -> String {
        format!("{} {}", club_name, self.team_number)
            .trim_end()
            .to_string()
    }
}

fn text(v: &Value) -> String {
    v.as_str().unwrap_or_default().to_string()
}

fn entries(v: &Value) -> &[Value] {
    v.as_array().map(Vec::as_slice).unwrap_or(&[])
}

// ── Primary (NV Play) shape ───────────────────────────────────────────────────

fn normalize_nv(body: &Value, club_name: &str) -> MatchRecords {
    let fixture = &body["Match"];
    let sides = Sides::resolve(
        club_name,
        fixture["Team1Name"].as_str().unwrap_or_default(),
        fixture["Team2Name"].as_str().unwrap_or_default(),
    );
    let own_label = sides.batting_label(club_name);

    let mut out = MatchRecords::default();
    for innings in entries(&body["Innings"]) {
        if innings["BattingTeamName"].as_str() == Some(own_label.as_str()) {
            out.batting.extend(
                entries(&innings["BattingCard"])
                    .iter()
                    .map(|b| nv_batting(b, &sides)),
            );
        } else {
            out.bowling.extend(
                entries(&innings["BowlingCard"])
                    .iter()
                    .map(|b| nv_bowling(b, &sides)),
            );
        }
    }

    debug!(
        "NV scorecard for '{}': {} batting, {} bowling rows",
        own_label,
        out.batting.len(),
        out.bowling.len()
    );
    out
}

fn nv_batting(b: &Value, sides: &Sides) -> BattingRecord {
    BattingRecord {
        player_team_name: sides.team_number.clone(),
        opposition_team_name: sides.opposition.clone(),
        player_name: text(&b["PlayerName"]),
        runs: round2(num(&b["Runs"]).unwrap_or(0.0)),
        balls: num(&b["Balls"]),
        minutes: num(&b["Minutes"]),
        fours: num(&b["Fours"]),
        sixes: num(&b["Sixes"]),
        strike_rate: num(&b["StrikeRate"]),
        how_out: b["HowOut"].as_str().map(str::to_string),
        is_dismissed: b["IsDismissed"].as_bool().unwrap_or(false),
    }
}

fn nv_bowling(b: &Value, sides: &Sides) -> BowlingRecord {
    BowlingRecord {
        player_team_name: sides.team_number.clone(),
        opposition_team_name: sides.opposition.clone(),
        player_name: text(&b["PlayerName"]),
        overs: num(&b["Overs"]),
        maidens: num(&b["Maidens"]),
        runs: num(&b["Runs"]),
        wickets: num(&b["Wickets"]),
        economy: num(&b["Economy"]),
        dots: num(&b["Dots"]),
        fours: num(&b["Fours"]),
        sixes: num(&b["Sixes"]),
        no_balls: num(&b["NoBalls"]),
        wides: num(&b["Wides"]),
    }
}

// ── Fallback (Results Vault) shape ────────────────────────────────────────────

fn normalize_results_vault(body: &Value, club_name: &str) -> MatchRecords {
    let sides = Sides::resolve(
        club_name,
        body["home_name"].as_str().unwrap_or_default(),
        body["away_name"].as_str().unwrap_or_default(),
    );
    let teams = entries(&body["MatchTeams"]);

    // Performances reference players by id only, and a player may appear in
    // another team's roster block, so the whole map is built first.
    let mut names: HashMap<String, String> = HashMap::new();
    for team in teams {
        for member in entries(&team["TeamMembers"]) {
            if let Some(id) = key_of(&member["player_id"]) {
                names.insert(id, text(&member["player_name2"]));
            }
        }
    }

    let mut out = MatchRecords::default();
    let mut dropped = 0usize;
    for team in teams {
        let is_club = team["team_name"]
            .as_str()
            .is_some_and(|n| n.contains(club_name));

        for innings in entries(&team["Innings"]) {
            for perf in entries(&innings["PlayerPerfs"]) {
                let player_name = key_of(&perf["player_id"])
                    .and_then(|id| names.get(&id).cloned())
                    .unwrap_or_else(|| text(&perf["player_name"]));
                let tag = perf["__type"].as_str().unwrap_or_default();

                if tag.starts_with("Batting") && is_club {
                    out.batting.push(rv_batting(perf, player_name, &sides));
                } else if tag.starts_with("Bowling") && !is_club {
                    out.bowling.push(rv_bowling(perf, player_name, &sides));
                } else {
                    // Opposition batting and club bowling rows are not part
                    // of the weekly graphics.
                    dropped += 1;
                }
            }
        }
    }

    debug!(
        "Results Vault scorecard: {} batting, {} bowling rows ({} perfs not used)",
        out.batting.len(),
        out.bowling.len(),
        dropped
    );
    out
}

fn rv_batting(perf: &Value, player_name: String, sides: &Sides) -> BattingRecord {
    let how_out = perf["dismissal_text"].as_str().map(str::to_string);
    let is_dismissed = how_out
        .as_deref()
        .is_some_and(|d| !NOT_OUT_DISMISSALS.contains(&d));
    BattingRecord {
        player_team_name: sides.team_number.clone(),
        opposition_team_name: sides.opposition.clone(),
        player_name,
        runs: num(&perf["runs"]).unwrap_or(0.0),
        balls: num(&perf["balls"]),
        minutes: num(&perf["minutes"]),
        fours: num(&perf["fours"]),
        sixes: num(&perf["sixes"]),
        strike_rate: num(&perf["strike_rate"]),
        how_out,
        is_dismissed,
    }
}

fn rv_bowling(perf: &Value, player_name: String, sides: &Sides) -> BowlingRecord {
    let overs = num(&perf["overs"]).unwrap_or(0.0);
    let runs = num(&perf["runs"]).unwrap_or(0.0);
    let economy = if overs > 0.0 {
        Some(round2(runs / overs))
    } else {
        None
    };
    BowlingRecord {
        player_team_name: sides.team_number.clone(),
        opposition_team_name: sides.opposition.clone(),
        player_name,
        overs: Some(overs),
        maidens: num(&perf["maidens"]),
        runs: Some(runs),
        wickets: num(&perf["wickets"]),
        economy,
        dots: num(&perf["dot_balls"]),
        fours: None,
        sixes: None,
        no_balls: num(&perf["no_balls"]),
        wides: num(&perf["wides"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    const CLUB: &str = "Lightcliffe CC";

    fn nv_payload() -> RawScorecard {
        RawScorecard::classify(json!({
            "Match": {
                "Team1Name": "Northowram Fields CC 2nd XI",
                "Team2Name": "Lightcliffe CC 2nd XI"
            },
            "Innings": [
                {
                    "BattingTeamName": "Northowram Fields CC 2nd XI",
                    "BattingCard": [{"PlayerName": "Opp Bat", "Runs": 12}],
                    "BowlingCard": [
                        {"PlayerName": "J Farr", "Overs": 8, "Maidens": 1, "Runs": 29,
                         "Wickets": 5, "Economy": 3.63, "Dots": 30, "Fours": 2,
                         "Sixes": 0, "NoBalls": 0, "Wides": 3},
                        {"PlayerName": "Q Ali", "Overs": "6", "Runs": 20, "Wickets": 4}
                    ]
                },
                {
                    "BattingTeamName": "Lightcliffe CC 2nd XI",
                    "BattingCard": [
                        {"PlayerName": "R Smith*", "Runs": 80.456, "Balls": 55,
                         "Minutes": 70, "Fours": 9, "Sixes": 2, "StrikeRate": 145.45,
                         "HowOut": "not out", "IsDismissed": false},
                        {"PlayerName": "T Stead", "Runs": 4, "Balls": 10,
                         "HowOut": "b Jones", "IsDismissed": true},
                        {"PlayerName": "Extras", "Runs": 11}
                    ],
                    "BowlingCard": [{"PlayerName": "Opp Bowler", "Wickets": 2}]
                }
            ]
        }))
    }

    fn rv_payload(perfs_club: Value, perfs_opp: Value) -> RawScorecard {
        RawScorecard::classify(json!({
            "home_name": "Lightcliffe CC 3rd XI",
            "away_name": "Brighouse CC 3rd XI",
            "MatchTeams": [
                {
                    "team_name": "Lightcliffe CC 3rd XI",
                    "TeamMembers": [
                        {"player_id": 1, "player_name2": "Robert Smith"},
                        {"player_id": 2, "player_name2": "Ted Stead"}
                    ],
                    "Innings": [{"PlayerPerfs": perfs_club}]
                },
                {
                    "team_name": "Brighouse CC 3rd XI",
                    "TeamMembers": [{"player_id": "9", "player_name2": "Sam Jones"}],
                    "Innings": [{"PlayerPerfs": perfs_opp}]
                }
            ]
        }))
    }

    #[test]
    fn test_unrecognized_payload_is_empty() {
        let out = normalize(&RawScorecard::classify(json!({"status": "ok"})), CLUB);
        assert!(out.is_empty());
        let out = normalize(&RawScorecard::classify(json!([])), CLUB);
        assert!(out.is_empty());
    }

    #[test]
    fn test_sides_from_either_team_slot() {
        let s = Sides::resolve(CLUB, "Lightcliffe CC 1st XI", "Elland CC 1st XI");
        assert_eq!(s.team_number, "1st XI");
        assert_eq!(s.opposition, "Elland CC 1st XI");
        let s = Sides::resolve(CLUB, "Elland CC 1st XI", "Lightcliffe CC 1st XI");
        assert_eq!(s.team_number, "1st XI");
        assert_eq!(s.opposition, "Elland CC 1st XI");
        assert_eq!(s.batting_label(CLUB), "Lightcliffe CC 1st XI");
    }

    #[test]
    fn test_batting_label_without_suffix() {
        let s = Sides::resolve(CLUB, "Lightcliffe CC", "Elland CC");
        assert_eq!(s.team_number, "");
        assert_eq!(s.batting_label(CLUB), "Lightcliffe CC");
    }

    #[test]
    fn test_nv_splits_innings_by_batting_team() {
        let out = normalize(&nv_payload(), CLUB);
        // Club innings batting card (3) + other innings bowling card (2); nothing dropped.
        assert_eq!(out.batting.len(), 3);
        assert_eq!(out.bowling.len(), 2);
        assert!(out.batting.iter().all(|b| b.player_team_name == "2nd XI"));
        assert!(out
            .bowling
            .iter()
            .all(|b| b.opposition_team_name == "Northowram Fields CC 2nd XI"));
        assert_eq!(out.bowling[0].player_name, "J Farr");
        assert_eq!(out.bowling[1].overs, Some(6.0));
    }

    #[test]
    fn test_nv_rounds_runs_only() {
        let out = normalize(&nv_payload(), CLUB);
        let smith = &out.batting[0];
        assert_relative_eq!(smith.runs, 80.46);
        assert_eq!(smith.strike_rate, Some(145.45));
        assert_eq!(smith.balls, Some(55.0));
        assert!(!smith.is_dismissed);
        assert!(out.batting[1].is_dismissed);
        assert_eq!(out.batting[1].how_out.as_deref(), Some("b Jones"));
        // Economy passes through from the source
        assert_eq!(out.bowling[0].economy, Some(3.63));
        assert_eq!(out.bowling[1].economy, None);
    }

    #[test]
    fn test_nv_missing_innings_gives_no_rows() {
        let raw = RawScorecard::classify(json!({"Match": {"Team1Name": "Lightcliffe CC 1st XI"}}));
        assert!(normalize(&raw, CLUB).is_empty());
    }

    #[test]
    fn test_rv_batting_for_club_bowling_for_opposition() {
        let raw = rv_payload(
            json!([
                {"__type": "BattingPerf:#RV", "player_id": 1, "runs": 45, "balls": 30,
                 "fours": 6, "sixes": 1, "strike_rate": 150.0, "dismissal_text": "c Jones b Hill"},
                {"__type": "BowlingPerf:#RV", "player_id": 2, "overs": 4, "runs": 18, "wickets": 1}
            ]),
            json!([
                {"__type": "BattingPerf:#RV", "player_id": "9", "runs": 77},
                {"__type": "BowlingPerf:#RV", "player_id": "9", "overs": 7, "maidens": 2,
                 "runs": 31, "wickets": 3, "dot_balls": 28, "no_balls": 1, "wides": 2}
            ]),
        );
        let out = normalize(&raw, CLUB);
        assert_eq!(out.batting.len(), 1);
        assert_eq!(out.bowling.len(), 1);

        let bat = &out.batting[0];
        assert_eq!(bat.player_name, "Robert Smith");
        assert_eq!(bat.player_team_name, "3rd XI");
        assert_eq!(bat.opposition_team_name, "Brighouse CC 3rd XI");
        assert!(bat.is_dismissed);

        let bowl = &out.bowling[0];
        assert_eq!(bowl.player_name, "Sam Jones");
        assert_relative_eq!(bowl.economy.unwrap(), 4.43);
        assert_eq!(bowl.dots, Some(28.0));
        assert_eq!(bowl.fours, None);
        assert_eq!(bowl.sixes, None);
    }

    #[test]
    fn test_rv_type_tag_is_prefix_matched() {
        let raw = rv_payload(
            json!([
                {"__type": "BattingCard", "player_id": 1, "runs": 10},
                {"__type": "PlayerBatting", "player_id": 2, "runs": 20},
                {"__type": "FieldingPerf", "player_id": 2}
            ]),
            json!([]),
        );
        let out = normalize(&raw, CLUB);
        assert_eq!(out.batting.len(), 1);
        assert_eq!(out.batting[0].runs, 10.0);
    }

    #[test]
    fn test_rv_zero_overs_has_no_economy() {
        let raw = rv_payload(
            json!([]),
            json!([{"__type": "BowlingPerf", "player_id": "9", "runs": 6, "wickets": 0}]),
        );
        let out = normalize(&raw, CLUB);
        assert_eq!(out.bowling[0].overs, Some(0.0));
        assert_eq!(out.bowling[0].economy, None);
    }

    #[test]
    fn test_rv_not_out_dismissal_texts() {
        let perfs: Vec<Value> = [Value::Null, json!(""), json!("dnb"), json!("no"), json!("lbw b X")]
            .into_iter()
            .map(|d| json!({"__type": "BattingPerf", "player_id": 1, "runs": 1, "dismissal_text": d}))
            .collect();
        let out = normalize(&rv_payload(Value::Array(perfs), json!([])), CLUB);
        let flags: Vec<bool> = out.batting.iter().map(|b| b.is_dismissed).collect();
        assert_eq!(flags, vec![false, false, false, false, true]);
    }

    #[test]
    fn test_rv_unknown_player_id_uses_perf_name() {
        let raw = rv_payload(
            json!([{"__type": "BattingPerf", "player_id": 404, "player_name": "A Guest", "runs": 3}]),
            json!([]),
        );
        let out = normalize(&raw, CLUB);
        assert_eq!(out.batting[0].player_name, "A Guest");
    }
}
