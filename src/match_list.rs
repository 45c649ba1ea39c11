use std::collections::HashSet;
use std::time::Duration;

use anyhow::{Context, Result};
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, info};

/// Fetch the club's weekly results page and pull out the play-cricket match
/// ids of every fixture mentioning `keyword`.
pub async fn fetch_match_ids(url: &str, keyword: &str, timeout: Duration) -> Result<Vec<String>> {
    let http = Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to build HTTP client")?;

    debug!("Fetching match list from {}", url);
    let resp = http
        .get(url)
        .header("User-Agent", "Mozilla/5.0")
        .header("Accept", "text/html")
        .send()
        .await
        .context("Match list request failed")?;

    if !resp.status().is_success() {
        anyhow::bail!("Match list error: {}", resp.status());
    }

    let html = resp.text().await.context("Failed to read match list body")?;
    let ids = extract_match_ids(&html, keyword)?;
    info!("Found {} match(es) for '{}'", ids.len(), keyword);
    Ok(ids)
}

/// Scan `div.row` result rows for a scorecard link. Rows not mentioning
/// `keyword` are other clubs' fixtures. First occurrence order is kept and
/// repeated ids are dropped.
pub fn extract_match_ids(html: &str, keyword: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let row_selector = Selector::parse("div.row")
        .map_err(|e| anyhow::anyhow!("bad row selector: {}", e))?;
    let link_selector = Selector::parse("a.link-scorecard[href]")
        .map_err(|e| anyhow::anyhow!("bad link selector: {}", e))?;
    let id_pattern = Regex::new(r"/website/results/(\d+)")?;

    let mut seen = HashSet::new();
    let mut ids = Vec::new();

    for row in document.select(&row_selector) {
        if !row.text().collect::<String>().contains(keyword) {
            continue;
        }
        let Some(href) = row
            .select(&link_selector)
            .next()
            .and_then(|a| a.value().attr("href"))
        else {
            continue;
        };
        if let Some(caps) = id_pattern.captures(href) {
            let id = caps[1].to_string();
            if seen.insert(id.clone()) {
                ids.push(id);
            }
        }
    }

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <div class="row">
            <span>Lightcliffe CC - 1st XI</span> v <span>Elland CC - 1st XI</span>
            <a class="link-scorecard" href="/website/results/7126243">Scorecard</a>
          </div>
          <div class="row">
            <span>Brighouse CC - 2nd XI</span> v <span>Halifax CC</span>
            <a class="link-scorecard" href="/website/results/7000001">Scorecard</a>
          </div>
          <div class="row">
            <span>Lightcliffe CC - 3rd XI</span> v <span>Sowerby Bridge</span>
            <a class="link-other" href="/website/results/7999999">Report</a>
            <a class="link-scorecard" href="https://lightcliffe.play-cricket.com/website/results/7126250?tab=1">Scorecard</a>
          </div>
          <div class="row">
            <span>Lightcliffe CC - 2nd XI</span> (no result yet)
          </div>
          <div class="row">
            <span>Lightcliffe CC - 1st XI</span>
            <a class="link-scorecard" href="/website/results/7126243">Scorecard</a>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_extract_keeps_only_club_rows() {
        let ids = extract_match_ids(PAGE, "Lightcliffe").unwrap();
        assert_eq!(ids, vec!["7126243", "7126250"]);
    }

    #[test]
    fn test_extract_no_matches() {
        assert!(extract_match_ids(PAGE, "Todmorden").unwrap().is_empty());
        assert!(extract_match_ids("", "Lightcliffe").unwrap().is_empty());
    }
}
