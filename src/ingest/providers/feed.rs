// src/ingest/providers/feed.rs
//! Syndication feeds (RSS 2.0 and Atom) deserialized with quick-xml.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::ingest::{clean_summary, clean_text};
use crate::ingest::types::{CandidateItem, SourceProvider, UNKNOWN_AUTHOR, UNKNOWN_JOURNAL};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    title: Option<String>,
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    author: Option<String>,
    #[serde(rename = "dc:creator", alias = "creator", default)]
    creator: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AtomFeed {
    title: Option<AtomText>,
    #[serde(rename = "entry", default)]
    entry: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    title: Option<AtomText>,
    summary: Option<AtomText>,
    content: Option<AtomText>,
    #[serde(rename = "link", default)]
    link: Vec<AtomLink>,
    #[serde(rename = "author", default)]
    author: Vec<AtomPerson>,
}

#[derive(Debug, Deserialize)]
struct AtomText {
    #[serde(rename = "$text", default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href", default)]
    href: String,
    #[serde(rename = "@rel")]
    rel: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomPerson {
    name: Option<String>,
}

/// First author from a free-form author field.
///
/// `"A, B, C"` and `"A and B"` both give `"A"`; an empty field gives `UNKNOWN_AUTHOR`.
pub fn first_author(raw: Option<&str>) -> String {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return UNKNOWN_AUTHOR.to_string();
    }
    let first = if raw.contains(", ") {
        raw.split(", ").next()
    } else if raw.contains(" and ") {
        raw.split(" and ").next()
    } else {
        Some(raw)
    };
    match first.map(str::trim) {
        Some(a) if !a.is_empty() => a.to_string(),
        _ => UNKNOWN_AUTHOR.to_string(),
    }
}

fn journal_or_unknown(title: Option<&str>) -> String {
    let t = clean_text(title.unwrap_or_default());
    if t.is_empty() {
        UNKNOWN_JOURNAL.to_string()
    } else {
        t
    }
}

pub struct FeedProvider {
    name: String,
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

impl FeedProvider {
    pub fn from_url(url: impl Into<String>, client: reqwest::Client) -> Self {
        let url = url.into();
        Self {
            name: url.clone(),
            mode: Mode::Http { url, client },
        }
    }

    /// Serve a fixed document instead of fetching; used by tests and dry runs.
    pub fn from_fixture(name: impl Into<String>, xml: &str) -> Self {
        Self {
            name: name.into(),
            mode: Mode::Fixture(xml.to_string()),
        }
    }

    pub fn parse_items_from_str(s: &str) -> Result<Vec<CandidateItem>> {
        let xml_clean = scrub_html_entities_for_xml(s);
        if looks_like_atom(&xml_clean) {
            let feed: AtomFeed = from_str(&xml_clean).context("parsing atom xml")?;
            Ok(atom_items(feed))
        } else {
            let rss: Rss = from_str(&xml_clean).context("parsing rss xml")?;
            Ok(rss_items(rss))
        }
    }
}

fn looks_like_atom(s: &str) -> bool {
    // Root element name decides; skip the prolog and comments.
    s.find("<feed").is_some_and(|i| s.find("<rss").map_or(true, |j| i < j))
}

fn rss_items(rss: Rss) -> Vec<CandidateItem> {
    let journal = journal_or_unknown(rss.channel.title.as_deref());
    let mut out = Vec::with_capacity(rss.channel.item.len());
    for it in rss.channel.item {
        let title = clean_text(it.title.as_deref().unwrap_or_default());
        if title.is_empty() {
            continue;
        }
        let raw_author = it.author.as_deref().or(it.creator.first().map(String::as_str));
        out.push(CandidateItem {
            title,
            summary: clean_summary(it.description.as_deref().unwrap_or_default()),
            link: it.link.unwrap_or_default().trim().to_string(),
            author: first_author(raw_author),
            journal: journal.clone(),
        });
    }
    out
}

fn atom_items(feed: AtomFeed) -> Vec<CandidateItem> {
    let journal = journal_or_unknown(feed.title.as_ref().map(|t| t.value.as_str()));
    let mut out = Vec::with_capacity(feed.entry.len());
    for en in feed.entry {
        let title = clean_text(en.title.as_ref().map(|t| t.value.as_str()).unwrap_or_default());
        if title.is_empty() {
            continue;
        }
        let summary = en
            .summary
            .as_ref()
            .or(en.content.as_ref())
            .map(|t| clean_summary(&t.value))
            .unwrap_or_default();
        let link = en
            .link
            .iter()
            .find(|l| l.rel.as_deref().map_or(true, |r| r == "alternate"))
            .or(en.link.first())
            .map(|l| l.href.trim().to_string())
            .unwrap_or_default();
        let names: Vec<&str> = en.author.iter().filter_map(|a| a.name.as_deref()).collect();
        let raw_author = if names.is_empty() {
            None
        } else {
            Some(names.join(", "))
        };
        out.push(CandidateItem {
            title,
            summary,
            link,
            author: first_author(raw_author.as_deref()),
            journal: journal.clone(),
        });
    }
    out
}

#[async_trait]
impl SourceProvider for FeedProvider {
    async fn fetch_latest(&self) -> Result<Vec<CandidateItem>> {
        match &self.mode {
            Mode::Fixture(s) => Self::parse_items_from_str(s),
            Mode::Http { url, client } => {
                let resp = client
                    .get(url.as_str())
                    .send()
                    .await
                    .with_context(|| format!("feed http get {url}"))?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(anyhow!("feed {url} returned {status}"));
                }
                let body = resp.text().await.context("feed http .text()")?;
                Self::parse_items_from_str(&body).with_context(|| format!("feed {url}"))
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_author_prefers_comma_split() {
        assert_eq!(first_author(Some("Ada Lovelace, Alan Turing")), "Ada Lovelace");
        assert_eq!(
            first_author(Some("Ada Lovelace, Alan Turing and Grace Hopper")),
            "Ada Lovelace"
        );
    }

    #[test]
    fn first_author_falls_back_to_and_split() {
        assert_eq!(first_author(Some("Ada Lovelace and Alan Turing")), "Ada Lovelace");
    }

    #[test]
    fn first_author_whole_field_or_unknown() {
        assert_eq!(first_author(Some("  Ada Lovelace ")), "Ada Lovelace");
        assert_eq!(first_author(Some("   ")), UNKNOWN_AUTHOR);
        assert_eq!(first_author(None), UNKNOWN_AUTHOR);
    }

    #[test]
    fn rss_items_without_title_are_dropped() {
        let xml = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>Test feed</title>
  <item><title>  Kept paper </title><link>https://x.test/1</link></item>
  <item><title></title><link>https://x.test/2</link></item>
  <item><link>https://x.test/3</link></item>
</channel></rss>"#;
        let items = FeedProvider::parse_items_from_str(xml).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Kept paper");
        assert_eq!(items[0].summary, "");
        assert_eq!(items[0].author, UNKNOWN_AUTHOR);
        assert_eq!(items[0].journal, "Test feed");
    }

    #[test]
    fn summary_line_breaks_do_not_become_keyword_padding() {
        let xml = r#"<rss version="2.0"><channel><title>T</title>
  <item><title>Dogs</title><description>we train a
cnn
on dogs</description></item>
  <item><title>Bold</title><description>a &lt;b&gt;yolo&lt;/b&gt; model</description></item>
</channel></rss>"#;
        let items = FeedProvider::parse_items_from_str(xml).unwrap();
        assert_eq!(items[0].summary, "we train a\ncnn\non dogs");
        assert_eq!(items[1].summary, "a <b>yolo</b> model");

        let filter = crate::filter::KeywordFilter::new([" cnn ", " yolo "]);
        assert!(filter.matches(&items[0].match_text()).is_empty());
        assert!(filter.matches(&items[1].match_text()).is_empty());
    }

    #[test]
    fn empty_channel_yields_nothing() {
        let xml = r#"<rss version="2.0"><channel><title>Quiet</title></channel></rss>"#;
        let items = FeedProvider::parse_items_from_str(xml).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(FeedProvider::parse_items_from_str("<html><body>oops").is_err());
    }
}
