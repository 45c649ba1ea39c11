//! Sources of the `x-ias-api-request` token the Results Vault API requires.
//!
//! The token is minted by the club site's JavaScript, so the only reliable way
//! to get one is to load a match page in a real browser and watch its XHR
//! traffic. That part lives outside this crate: a probe command (typically a
//! small headless-browser script) prints the header value on stdout.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

#[async_trait]
pub trait AuthHeaderProvider: Send + Sync {
    /// Return the header value observed while loading `match_id`'s page, or
    /// `None` if no such request was seen.
    async fn auth_header(&self, match_id: &str) -> Result<Option<String>>;

    fn name(&self) -> &str;
}

/// A header value supplied up front (config or environment).
pub struct StaticAuthHeader {
    value: Option<String>,
}

impl StaticAuthHeader {
    pub fn new(value: Option<String>) -> Self {
        StaticAuthHeader {
            value: value.filter(|v| !v.trim().is_empty()),
        }
    }
}

#[async_trait]
impl AuthHeaderProvider for StaticAuthHeader {
    fn name(&self) -> &str {
        "static"
    }

    async fn auth_header(&self, _match_id: &str) -> Result<Option<String>> {
        Ok(self.value.clone())
    }
}

/// Runs an external probe with the match page URL as its final argument and
/// takes the first non-empty line of its stdout as the header value.
pub struct CommandAuthHeader {
    program: String,
    args: Vec<String>,
    /// Match page URL template containing `{match_id}`
    page_url: String,
    timeout: Duration,
}

impl CommandAuthHeader {
    /// `command_line` is split on whitespace: program first, then arguments.
    pub fn new(command_line: &str, page_url: &str, timeout: Duration) -> Result<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next().context("auth header command is empty")?;
        Ok(CommandAuthHeader {
            program,
            args: parts.collect(),
            page_url: page_url.to_string(),
            timeout,
        })
    }
}

#[async_trait]
impl AuthHeaderProvider for CommandAuthHeader {
    fn name(&self) -> &str {
        &self.program
    }

    async fn auth_header(&self, match_id: &str) -> Result<Option<String>> {
        let url = self.page_url.replace("{match_id}", match_id);
        debug!("Probing {} with {}", url, self.program);

        let output = tokio::time::timeout(
            self.timeout,
            Command::new(&self.program)
                .args(&self.args)
                .arg(&url)
                .kill_on_drop(true)
                .output(),
        )
        .await
        .with_context(|| format!("{} timed out after {:?}", self.program, self.timeout))?
        .with_context(|| format!("failed to run {}", self.program))?;

        if !output.status.success() {
            anyhow::bail!("{} exited with {}", self.program, output.status);
        }
        Ok(first_line(&String::from_utf8_lossy(&output.stdout)))
    }
}

fn first_line(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

/// Ask each provider in turn; the first to produce a value wins. Provider
/// errors are logged and treated as "no header", which only disables the
/// fallback source.
pub async fn resolve_auth_header(
    providers: &[Box<dyn AuthHeaderProvider>],
    match_id: &str,
) -> Option<String> {
    for provider in providers {
        match provider.auth_header(match_id).await {
            Ok(Some(value)) => {
                info!("Results Vault auth header obtained via {}", provider.name());
                return Some(value);
            }
            Ok(None) => debug!("{} produced no auth header", provider.name()),
            Err(e) => warn!("Auth header probe {} failed: {:#}", provider.name(), e),
        }
    }
    warn!("No Results Vault auth header; fallback scorecards are unavailable this run");
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    #[async_trait]
    impl AuthHeaderProvider for Broken {
        fn name(&self) -> &str {
            "broken"
        }
        async fn auth_header(&self, _match_id: &str) -> Result<Option<String>> {
            anyhow::bail!("browser crashed")
        }
    }

    #[test]
    fn test_first_line_skips_blanks() {
        assert_eq!(first_line("\n  \n abc123 \nxyz\n"), Some("abc123".into()));
        assert_eq!(first_line(""), None);
    }

    #[test]
    fn test_command_line_split() {
        let probe = CommandAuthHeader::new(
            "node sniff.js --wait 8",
            "https://x/{match_id}",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(probe.program, "node");
        assert_eq!(probe.args, vec!["sniff.js", "--wait", "8"]);
        assert!(CommandAuthHeader::new("   ", "", Duration::from_secs(1)).is_err());
    }

    #[tokio::test]
    async fn test_static_blank_is_none() {
        let p = StaticAuthHeader::new(Some("  ".into()));
        assert_eq!(p.auth_header("1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_resolve_skips_failing_providers() {
        let providers: Vec<Box<dyn AuthHeaderProvider>> = vec![
            Box::new(Broken),
            Box::new(StaticAuthHeader::new(None)),
            Box::new(StaticAuthHeader::new(Some("tok".into()))),
        ];
        assert_eq!(resolve_auth_header(&providers, "1").await, Some("tok".into()));
    }

    #[tokio::test]
    async fn test_resolve_none_when_nothing_available() {
        let providers: Vec<Box<dyn AuthHeaderProvider>> = vec![Box::new(Broken)];
        assert_eq!(resolve_auth_header(&providers, "1").await, None);
    }
}
