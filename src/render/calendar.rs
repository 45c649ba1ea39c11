use chrono::{Datelike, NaiveDate};

/// Most recent Saturday on or before `today`.
pub fn last_saturday(today: NaiveDate) -> NaiveDate {
    let days_since = (today.weekday().num_days_from_monday() as i64 - 5).rem_euclid(7);
    today - chrono::Duration::days(days_since)
}

/// 1-based week index of `saturday` counted from `season_start`.
pub fn game_week(season_start: NaiveDate, saturday: NaiveDate) -> i64 {
    (saturday - season_start).num_days().div_euclid(7) + 1
}

/// Output file-name date, e.g. "07 Jun 2025".
pub fn date_label(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}

/// Parse the `dd/mm/yyyy` season start from config.
pub fn parse_season_start(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%d/%m/%Y")
        .map_err(|e| anyhow::anyhow!("invalid season start '{}': {}", raw, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_last_saturday() {
        // 2025-06-07 is a Saturday
        assert_eq!(last_saturday(d(2025, 6, 7)), d(2025, 6, 7));
        assert_eq!(last_saturday(d(2025, 6, 8)), d(2025, 6, 7));
        assert_eq!(last_saturday(d(2025, 6, 13)), d(2025, 6, 7));
        assert_eq!(last_saturday(d(2025, 6, 9)), d(2025, 6, 7));
    }

    #[test]
    fn test_game_week() {
        let start = parse_season_start("25/04/2025").unwrap();
        // Saturday 26 April is the first weekend
        assert_eq!(game_week(start, d(2025, 4, 26)), 1);
        assert_eq!(game_week(start, d(2025, 5, 3)), 2);
        assert_eq!(game_week(start, d(2025, 6, 7)), 7);
    }

    #[test]
    fn test_date_label() {
        assert_eq!(date_label(d(2025, 6, 7)), "07 Jun 2025");
    }

    #[test]
    fn test_bad_season_start() {
        assert!(parse_season_start("2025-04-25").is_err());
    }
}
