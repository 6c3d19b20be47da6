// src/pipeline.rs
//! One full pass: load posted titles, fetch, filter, notify, record.

use anyhow::Result;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::config::AppConfig;
use crate::filter::{render_tags, KeywordFilter};
use crate::ingest::collect_candidates;
use crate::ingest::providers::{FeedProvider, ListingProvider};
use crate::ingest::types::{CandidateItem, SourceProvider};
use crate::notify::{compose_message, MessageStyle, Notifier};
use crate::store::TitleStore;

/// Per-run settings taken from `AppConfig`.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub filter: KeywordFilter,
    pub style: MessageStyle,
    pub send_interval: Duration,
}

impl RunSettings {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            filter: cfg.keyword_filter(),
            style: cfg.message_style,
            send_interval: cfg.send_interval(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub fetched: usize,
    /// Untitled or already in the posted set.
    pub already_posted: usize,
    pub unmatched: usize,
    pub sent: usize,
    pub failed: usize,
}

/// Listings first, then feeds, each in configuration order.
pub fn providers_from_config(
    cfg: &AppConfig,
    client: &reqwest::Client,
) -> Vec<Box<dyn SourceProvider>> {
    let mut out: Vec<Box<dyn SourceProvider>> = Vec::new();
    for l in &cfg.listings {
        out.push(Box::new(ListingProvider::from_url(
            l.url.clone(),
            l.selectors.clone(),
            client.clone(),
        )));
    }
    for f in &cfg.feeds {
        out.push(Box::new(FeedProvider::from_url(f.clone(), client.clone())));
    }
    out
}

/// Why a candidate is not sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    Untitled,
    AlreadyPosted,
    Unmatched,
}

/// Matched tags for an item, or the reason it must not be sent.
pub fn eligible_tags<'a>(
    item: &CandidateItem,
    posted: &HashSet<String>,
    filter: &'a KeywordFilter,
) -> Result<Vec<&'a str>, Skip> {
    if item.title.is_empty() {
        return Err(Skip::Untitled);
    }
    if posted.contains(&item.title) {
        return Err(Skip::AlreadyPosted);
    }
    filter.tags_for(&item.match_text()).ok_or(Skip::Unmatched)
}

/// Run the pipeline once.
///
/// Only an unreadable title store is an error; source and send failures are
/// logged and the run carries on.
pub async fn run_once(
    settings: &RunSettings,
    providers: &[Box<dyn SourceProvider>],
    notifier: &dyn Notifier,
    store: &TitleStore,
) -> Result<RunSummary> {
    let mut posted = store.load()?;
    info!(posted = posted.len(), path = %store.path().display(), "loaded posted titles");

    let candidates = collect_candidates(providers).await;
    let mut summary = RunSummary {
        fetched: candidates.len(),
        ..RunSummary::default()
    };

    for item in candidates {
        let matched = match eligible_tags(&item, &posted, &settings.filter) {
            Ok(m) => m,
            Err(Skip::Untitled | Skip::AlreadyPosted) => {
                summary.already_posted += 1;
                continue;
            }
            Err(Skip::Unmatched) => {
                debug!(title = %item.title, "no keyword match");
                summary.unmatched += 1;
                continue;
            }
        };

        let tags = render_tags(&matched);
        let message = compose_message(&item, &tags, settings.style);
        info!(title = %item.title, %tags, "posting to webhook");

        match notifier.send(&message).await {
            Ok(()) => summary.sent += 1,
            Err(e) => {
                warn!(error = %format!("{e:#}"), title = %item.title, "webhook send failed");
                summary.failed += 1;
            }
        }

        if let Err(e) = store.append(&item.title) {
            error!(error = ?e, title = %item.title, "could not record posted title");
        }
        posted.insert(item.title);

        tokio::time::sleep(settings.send_interval).await;
    }

    Ok(summary)
}
