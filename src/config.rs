// src/config.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::filter::KeywordFilter;
use crate::ingest::providers::ListingSelectors;
use crate::notify::MessageStyle;
use crate::store::DEFAULT_STATE_PATH;

pub const ENV_CONFIG_PATH: &str = "PAPER_ALERT_CONFIG";
pub const DEFAULT_CONFIG_TOML: &str = "config/paper_alert.toml";
pub const DEFAULT_CONFIG_JSON: &str = "config/paper_alert.json";
pub const DEFAULT_SEND_INTERVAL_MS: u64 = 1_000;

const DEFAULT_KEYWORDS: &[&str] = &[
    " transformer ",
    " object detection ",
    " single shot detection ",
    " image segmentation ",
    " semantic segmentation ",
    " instance segmentation ",
    " scene understanding ",
    " image classification ",
    " image recognition ",
    " feature extraction ",
    " keypoint detection ",
    " anomaly detection ",
    " remote sensing ",
    " satellite image ",
    " aerial imagery ",
    " few-shot learning ",
    " zero-shot learning ",
];

/// An HTML page listing papers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListingSource {
    pub url: String,
    #[serde(default)]
    pub selectors: ListingSelectors,
}

/// Everything one run needs, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Flat file with one posted title per line.
    pub state_path: PathBuf,
    /// Pause after every send attempt.
    pub send_interval_ms: u64,
    pub message_style: MessageStyle,
    /// Lowercase phrases; padding spaces are significant. Empty = match everything.
    pub keywords: Vec<String>,
    pub listings: Vec<ListingSource>,
    pub feeds: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            send_interval_ms: DEFAULT_SEND_INTERVAL_MS,
            message_style: MessageStyle::Tags,
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            listings: vec![ListingSource {
                url: "https://huggingface.co/papers".to_string(),
                selectors: ListingSelectors::default(),
            }],
            feeds: vec!["https://export.arxiv.org/rss/cs.LG".to_string()],
        }
    }
}

impl AppConfig {
    pub fn keyword_filter(&self) -> KeywordFilter {
        KeywordFilter::new(&self.keywords)
    }

    pub fn send_interval(&self) -> Duration {
        Duration::from_millis(self.send_interval_ms)
    }

    /// Load from an explicit path. Supports TOML or JSON formats.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        parse_config(&content, ext.as_str())
            .with_context(|| format!("parsing config {}", path.display()))
    }

    /// Load using env var + fallbacks:
    /// 1) $PAPER_ALERT_CONFIG
    /// 2) config/paper_alert.toml
    /// 3) config/paper_alert.json
    /// 4) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            } else {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
        }
        let toml_p = PathBuf::from(DEFAULT_CONFIG_TOML);
        if toml_p.exists() {
            return Self::load_from(&toml_p);
        }
        let json_p = PathBuf::from(DEFAULT_CONFIG_JSON);
        if json_p.exists() {
            return Self::load_from(&json_p);
        }
        Ok(Self::default())
    }
}

fn parse_config(s: &str, hint_ext: &str) -> Result<AppConfig> {
    if hint_ext == "json" {
        return Ok(serde_json::from_str(s)?);
    }
    if hint_ext == "toml" {
        return Ok(toml::from_str(s)?);
    }
    // Unknown extension: JSON documents start with a brace.
    if s.trim_start().starts_with('{') {
        Ok(serde_json::from_str(s)?)
    } else {
        Ok(toml::from_str(s)?)
    }
}
