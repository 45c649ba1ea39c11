//! Weekly performance graphics.
//!
//! Text is drawn at fixed positions onto a blank club template. Entries are
//! spread evenly down the card between [`START_Y`] and [`END_Y`].

pub mod calendar;

use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use tracing::info;

use crate::models::{RankedBatter, RankedBowler, BATTING_PLACEHOLDER_SPONSOR};

const X_BASE: i32 = 143;
const START_Y: i32 = 374;
const END_Y: i32 = 1289;

const HEADLINE_PX: f32 = 50.0;
const DETAIL_PX: f32 = 30.0;
const GAME_WEEK_PX: f32 = 40.0;
const GAME_WEEK_POS: (i32, i32) = (143, 280);

const TEXT_COLOUR: Rgba<u8> = Rgba([255, 255, 255, 255]);
const GAME_WEEK_COLOUR: Rgba<u8> = Rgba([203, 144, 14, 255]);

/// Vertical position of each of `count` entries. A single entry sits at the
/// top of the range.
pub fn y_positions(count: usize) -> Vec<i32> {
    if count <= 1 {
        return vec![START_Y; count];
    }
    let step = (END_Y - START_Y) as f64 / (count - 1) as f64;
    (0..count)
        .map(|i| (START_Y as f64 + i as f64 * step) as i32)
        .collect()
}

/// Whole-number stats print without a decimal point.
fn fmt_stat(v: Option<f64>) -> String {
    match v {
        Some(x) if x.fract() == 0.0 => format!("{}", x as i64),
        Some(x) => format!("{}", x),
        None => "-".to_string(),
    }
}

pub fn batting_score_text(b: &RankedBatter) -> String {
    let not_out = if b.record.is_dismissed { "" } else { "*" };
    format!("{}{}", b.record.runs.round() as i64, not_out)
}

pub fn batting_balls_text(b: &RankedBatter) -> String {
    format!("({})", fmt_stat(b.record.balls.map(f64::round)))
}

pub fn bowling_figures_text(b: &RankedBowler) -> String {
    format!("{}-{}", fmt_stat(b.record.wickets), fmt_stat(b.record.runs))
}

fn fixture_text(team: &str, opposition: &str) -> String {
    format!("{} vs {}", team, opposition)
}

fn is_placeholder(sponsor: &str) -> bool {
    sponsor.eq_ignore_ascii_case(BATTING_PLACEHOLDER_SPONSOR)
}

pub struct Fonts {
    bold: FontVec,
    light: FontVec,
}

impl Fonts {
    pub fn load(bold: &Path, light: &Path) -> Result<Self> {
        Ok(Fonts {
            bold: load_font(bold)?,
            light: load_font(light)?,
        })
    }
}

fn load_font(path: &Path) -> Result<FontVec> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read font {}", path.display()))?;
    FontVec::try_from_vec(bytes)
        .map_err(|e| anyhow::anyhow!("Invalid font {}: {}", path.display(), e))
}

/// What goes at the top of every card.
#[derive(Debug, Clone)]
pub struct CardHeader {
    pub game_week: i64,
    /// Date used in output file names, e.g. "07 Jun 2025"
    pub date_label: String,
}

pub struct Renderer {
    fonts: Fonts,
    output_dir: PathBuf,
}

impl Renderer {
    pub fn new(fonts: Fonts, output_dir: &Path) -> Self {
        Renderer {
            fonts,
            output_dir: output_dir.to_path_buf(),
        }
    }

    fn open_template(&self, template: &Path) -> Result<RgbaImage> {
        let img = image::open(template)
            .with_context(|| format!("Failed to open template {}", template.display()))?;
        Ok(img.to_rgba8())
    }

    fn width(&self, px: f32, text: &str) -> i32 {
        text_size(PxScale::from(px), &self.fonts.bold, text).0 as i32
    }

    fn draw(&self, img: &mut RgbaImage, font: &FontVec, px: f32, pos: (i32, i32), text: &str) {
        draw_text_mut(img, TEXT_COLOUR, pos.0, pos.1, PxScale::from(px), font, text);
    }

    fn draw_header(&self, img: &mut RgbaImage, header: &CardHeader) {
        draw_text_mut(
            img,
            GAME_WEEK_COLOUR,
            GAME_WEEK_POS.0,
            GAME_WEEK_POS.1,
            PxScale::from(GAME_WEEK_PX),
            &self.fonts.bold,
            &format!("Game Week {}", header.game_week),
        );
    }

    /// Sponsor and fixture lines shared by both cards.
    fn draw_footer(
        &self,
        img: &mut RgbaImage,
        y: i32,
        sponsor_x: i32,
        sponsor: &str,
        fixture: &str,
    ) {
        let sponsor_font = if is_placeholder(sponsor) {
            &self.fonts.light
        } else {
            &self.fonts.bold
        };
        self.draw(img, sponsor_font, DETAIL_PX, (sponsor_x, y + 20), &format!(" - {}", sponsor));
        self.draw(img, &self.fonts.light, DETAIL_PX, (X_BASE, y + 70), fixture);
    }

    fn save(&self, img: &RgbaImage, discipline: &str, header: &CardHeader) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("Failed to create output dir {}", self.output_dir.display())
        })?;
        let path = self
            .output_dir
            .join(format!("{}_Performances_{}.png", discipline, header.date_label));
        img.save(&path)
            .with_context(|| format!("Failed to save {}", path.display()))?;
        info!("Image saved as {}", path.display());
        Ok(path)
    }

    pub fn render_batting(
        &self,
        template: &Path,
        header: &CardHeader,
        batters: &[RankedBatter],
    ) -> Result<PathBuf> {
        let mut img = self.open_template(template)?;
        self.draw_header(&mut img, header);

        for (b, y) in batters.iter().zip(y_positions(batters.len())) {
            let score = batting_score_text(b);
            let balls = batting_balls_text(b);
            let name = format!(" |  {}", b.record.player_name);

            self.draw(&mut img, &self.fonts.bold, HEADLINE_PX, (X_BASE, y), &score);
            let balls_x = X_BASE + self.width(HEADLINE_PX, &score) + 20;
            self.draw(&mut img, &self.fonts.bold, DETAIL_PX, (balls_x, y + 20), &balls);
            // Ball count is measured at headline size on purpose.
            let name_x = balls_x + self.width(HEADLINE_PX, &balls) - 20;
            self.draw(&mut img, &self.fonts.bold, HEADLINE_PX, (name_x, y), &name);
            let sponsor_x = name_x + self.width(HEADLINE_PX, &name);

            self.draw_footer(
                &mut img,
                y,
                sponsor_x,
                &b.sponsor_name,
                &fixture_text(&b.record.player_team_name, &b.record.opposition_team_name),
            );
        }

        self.save(&img, "Batting", header)
    }

    pub fn render_bowling(
        &self,
        template: &Path,
        header: &CardHeader,
        bowlers: &[RankedBowler],
    ) -> Result<PathBuf> {
        let mut img = self.open_template(template)?;
        self.draw_header(&mut img, header);

        for (b, y) in bowlers.iter().zip(y_positions(bowlers.len())) {
            let figures = bowling_figures_text(b);
            let name = format!(" |  {}", b.record.player_name);

            self.draw(&mut img, &self.fonts.bold, HEADLINE_PX, (X_BASE, y), &figures);
            let name_x = X_BASE + self.width(HEADLINE_PX, &figures);
            self.draw(&mut img, &self.fonts.bold, HEADLINE_PX, (name_x, y), &name);
            let sponsor_x = name_x + self.width(HEADLINE_PX, &name);

            self.draw_footer(
                &mut img,
                y,
                sponsor_x,
                &b.sponsor_name,
                &fixture_text(&b.record.player_team_name, &b.record.opposition_team_name),
            );
        }

        self.save(&img, "Bowling", header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BattingRecord, BowlingRecord, Ranked};

    fn batter(runs: f64, balls: Option<f64>, dismissed: bool) -> RankedBatter {
        Ranked {
            record: BattingRecord {
                player_team_name: "1st XI".into(),
                opposition_team_name: "Elland CC 1st XI".into(),
                player_name: "R Smith".into(),
                runs,
                balls,
                minutes: None,
                fours: None,
                sixes: None,
                strike_rate: None,
                how_out: None,
                is_dismissed: dismissed,
            },
            sponsor_name: "Available To Sponsor".into(),
        }
    }

    #[test]
    fn test_y_positions_spread_evenly() {
        assert_eq!(y_positions(6), vec![374, 557, 740, 923, 1106, 1289]);
        assert_eq!(y_positions(2), vec![374, 1289]);
    }

    #[test]
    fn test_y_positions_single_and_empty() {
        assert_eq!(y_positions(1), vec![374]);
        assert!(y_positions(0).is_empty());
    }

    #[test]
    fn test_batting_texts() {
        let b = batter(80.46, Some(55.0), false);
        assert_eq!(batting_score_text(&b), "80*");
        assert_eq!(batting_balls_text(&b), "(55)");
        let b = batter(12.0, None, true);
        assert_eq!(batting_score_text(&b), "12");
        assert_eq!(batting_balls_text(&b), "(-)");
    }

    #[test]
    fn test_bowling_figures_text() {
        let b = Ranked {
            record: BowlingRecord {
                player_team_name: "3rd XI".into(),
                opposition_team_name: "Brighouse CC 3rd XI".into(),
                player_name: "J Farr".into(),
                overs: Some(8.0),
                maidens: None,
                runs: Some(29.0),
                wickets: Some(5.0),
                economy: None,
                dots: None,
                fours: None,
                sixes: None,
                no_balls: None,
                wides: None,
            },
            sponsor_name: "Available to Sponsor".into(),
        };
        assert_eq!(bowling_figures_text(&b), "5-29");
        assert!(is_placeholder(&b.sponsor_name));
        assert!(!is_placeholder("The Red Lion"));
    }

    #[test]
    fn test_missing_font_is_an_error() {
        let missing = Path::new("/nonexistent/Outfit-Bold.ttf");
        assert!(Fonts::load(missing, missing).is_err());
    }
}
