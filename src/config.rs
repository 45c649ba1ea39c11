use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::render::calendar::parse_season_start;

/// Weekly top-performer graphics for a club cricket side
#[derive(Parser, Debug, Clone)]
#[command(name = "cricket-performers", version, about)]
pub struct Config {
    /// Club name as it appears in team labels ("<club> 1st XI")
    #[arg(long, env = "CLUB_NAME", default_value = "Lightcliffe CC")]
    pub club_name: String,

    /// Text a match-list row must contain to count as one of the club's fixtures
    #[arg(long, env = "MATCH_LIST_KEYWORD", default_value = "Lightcliffe")]
    pub match_list_keyword: String,

    /// Club site results listing to scrape for match ids
    #[arg(
        long,
        env = "MATCH_LIST_URL",
        default_value = "https://lightcliffe.play-cricket.com/Matches?tab=WeeklyResult&team_id=&view_by=month&team_id=&search_in=&q%5Bcategory_id%5D=1&q%5Bgender_id%5D=all&home_or_away=both&commit=Apply"
    )]
    pub match_list_url: String,

    /// Match page URL template handed to the auth header probe
    #[arg(
        long,
        env = "MATCH_PAGE_URL",
        default_value = "https://lightcliffe.play-cricket.com/website/results/{match_id}"
    )]
    pub match_page_url: String,

    /// Process these match ids instead of scraping the listing (comma separated)
    #[arg(long = "match-id", env = "MATCH_IDS", value_delimiter = ',')]
    pub match_ids: Vec<String>,

    /// Primary scorecard API base URL (match id is appended)
    #[arg(
        long,
        env = "NV_API_URL",
        default_value = "https://w-api2.ecb.nvplay.net/api/scorecard"
    )]
    pub nv_api_url: String,

    /// Customer id the primary API expects
    #[arg(
        long,
        env = "NV_CUSTOMER_ID",
        default_value = "5e401d65-10ec-4a28-a0f6-1c084ce30445"
    )]
    pub nv_customer_id: String,

    /// Results Vault id-mapping API base URL
    #[arg(
        long,
        env = "RV_MAPPING_URL",
        default_value = "https://api-alb.resultsvault.co.uk/rv/mappings"
    )]
    pub rv_mapping_url: String,

    /// Mapping namespace between play-cricket and Results Vault ids
    #[arg(long, env = "RV_NAMESPACE", default_value = "4/12")]
    pub rv_namespace: String,

    /// Results Vault scorecard API base URL
    #[arg(
        long,
        env = "RV_API_URL",
        default_value = "https://api-alb.resultsvault.co.uk/rv/130000"
    )]
    pub rv_api_url: String,

    /// Origin sent with Results Vault requests
    #[arg(
        long,
        env = "RV_ORIGIN",
        default_value = "https://lightcliffe.play-cricket.com"
    )]
    pub rv_origin: String,

    /// Known x-ias-api-request header value (skips the probe)
    #[arg(long, env = "RV_API_HEADER")]
    pub rv_api_header: Option<String>,

    /// Command that loads a match page and prints the x-ias-api-request header
    #[arg(long, env = "AUTH_HEADER_COMMAND")]
    pub auth_header_command: Option<String>,

    /// Seconds to wait for the auth header probe
    #[arg(long, env = "AUTH_HEADER_TIMEOUT_SECS", default_value = "60")]
    pub auth_header_timeout_secs: u64,

    /// Sponsor roster CSV (URL or local path)
    #[arg(
        long,
        env = "SPONSOR_CSV",
        default_value = "https://docs.google.com/spreadsheets/d/1JaSsetNLUGFFwfDrzLu-dcT6OL2E-8Hs2yZNwlOBu5E/export?format=csv&gid=2071860895"
    )]
    pub sponsor_csv: String,

    /// First day of the season (dd/mm/yyyy), game week 1
    #[arg(long, env = "SEASON_START", default_value = "25/04/2025")]
    pub season_start: String,

    /// Number of performers per graphic
    #[arg(long, env = "TOP_N", default_value = "6")]
    pub top_n: usize,

    #[arg(
        long,
        env = "BATTING_TEMPLATE",
        default_value = "Batting Performances Blank Template.png"
    )]
    pub batting_template: PathBuf,

    #[arg(
        long,
        env = "BOWLING_TEMPLATE",
        default_value = "Bowling Performances Blank Template.png"
    )]
    pub bowling_template: PathBuf,

    #[arg(long, env = "BOLD_FONT", default_value = "Outfit-Bold.ttf")]
    pub bold_font: PathBuf,

    #[arg(long, env = "LIGHT_FONT", default_value = "Outfit-Light.ttf")]
    pub light_font: PathBuf,

    /// Where finished graphics are written
    #[arg(long, env = "OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Per-request HTTP timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "20")]
    pub request_timeout_secs: u64,

    /// OpenAI API key; enables the weekly caption
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    #[arg(long, env = "OPENAI_MODEL", default_value = "gpt-4")]
    pub openai_model: String,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.club_name.trim().is_empty() {
            anyhow::bail!("club_name must not be empty");
        }
        if self.match_list_keyword.trim().is_empty() {
            anyhow::bail!("match_list_keyword must not be empty");
        }
        if self.top_n == 0 {
            anyhow::bail!("top_n must be at least 1");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be positive");
        }
        if self.auth_header_timeout_secs == 0 {
            anyhow::bail!("auth_header_timeout_secs must be positive");
        }
        parse_season_start(&self.season_start)?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn auth_header_timeout(&self) -> Duration {
        Duration::from_secs(self.auth_header_timeout_secs)
    }
}
