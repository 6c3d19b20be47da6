// src/ingest/mod.rs
pub mod providers;
pub mod types;

use crate::ingest::types::{CandidateItem, SourceProvider};

/// Normalize scraped text: decode entities, strip tags, collapse whitespace, trim.
///
/// Titles come out on a single line, so they are safe to store one per line.
pub fn clean_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Collapse whitespace
    static RE_WS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();

    out.trim().to_string()
}

/// Feed summaries: entities decoded and trimmed, nothing else.
///
/// Line breaks and markup stay in place; the keyword filter sees the text as published.
pub fn clean_summary(s: &str) -> String {
    html_escape::decode_html_entities(s).trim().to_string()
}

/// Pull candidates from every provider in order.
///
/// A failing provider is logged and contributes nothing; it never stops the others.
pub async fn collect_candidates(providers: &[Box<dyn SourceProvider>]) -> Vec<CandidateItem> {
    let mut raw = Vec::new();
    for p in providers {
        match p.fetch_latest().await {
            Ok(mut v) => {
                tracing::debug!(provider = p.name(), items = v.len(), "provider fetched");
                raw.append(&mut v);
            }
            Err(e) => {
                tracing::warn!(error = ?e, provider = p.name(), "provider error");
            }
        }
    }
    raw
}
