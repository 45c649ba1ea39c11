/// Sponsor text for a batter with no roster entry.
pub const BATTING_PLACEHOLDER_SPONSOR: &str = "Available To Sponsor";
/// Sponsor text for a bowler with no roster entry (lower-case "to" is what the
/// bowling graphic has always shown).
pub const BOWLING_PLACEHOLDER_SPONSOR: &str = "Available to Sponsor";

/// One batter's innings for the club.
#[derive(Debug, Clone, PartialEq)]
pub struct BattingRecord {
    /// Club side suffix, e.g. "1st XI"
    pub player_team_name: String,
    /// Full label of the other side
    pub opposition_team_name: String,
    pub player_name: String,
    pub runs: f64,
    pub balls: Option<f64>,
    pub minutes: Option<f64>,
    pub fours: Option<f64>,
    pub sixes: Option<f64>,
    pub strike_rate: Option<f64>,
    /// Dismissal description, `None` when the source had nothing
    pub how_out: Option<String>,
    pub is_dismissed: bool,
}

/// One bowler's figures in an innings the club batted in (or, for the
/// primary source, any innings the club did not bat in).
#[derive(Debug, Clone, PartialEq)]
pub struct BowlingRecord {
    pub player_team_name: String,
    pub opposition_team_name: String,
    pub player_name: String,
    pub overs: Option<f64>,
    pub maidens: Option<f64>,
    pub runs: Option<f64>,
    pub wickets: Option<f64>,
    /// Runs per over; `None` when no overs were bowled
    pub economy: Option<f64>,
    pub dots: Option<f64>,
    /// Boundaries conceded. The fallback source never reports these.
    pub fours: Option<f64>,
    pub sixes: Option<f64>,
    pub no_balls: Option<f64>,
    pub wides: Option<f64>,
}

/// Everything a single scorecard contributes to the season tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchRecords {
    pub batting: Vec<BattingRecord>,
    pub bowling: Vec<BowlingRecord>,
}

impl MatchRecords {
    pub fn is_empty(&self) -> bool {
        self.batting.is_empty() && self.bowling.is_empty()
    }

    /// Append another match's rows, keeping arrival order.
    pub fn extend(&mut self, other: MatchRecords) {
        self.batting.extend(other.batting);
        self.bowling.extend(other.bowling);
    }
}

/// A row from the sponsorship roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SponsorEntry {
    pub player_name: String,
    pub sponsor_name: String,
}

/// A selected record with its resolved sponsor.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked<T> {
    pub record: T,
    pub sponsor_name: String,
}

pub type RankedBatter = Ranked<BattingRecord>;
pub type RankedBowler = Ranked<BowlingRecord>;
