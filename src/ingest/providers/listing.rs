// src/ingest/providers/listing.rs
//! HTML listing pages (e.g. a daily papers page) scraped with CSS selectors.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;

use crate::ingest::clean_text;
use crate::ingest::types::{CandidateItem, SourceProvider, UNKNOWN_AUTHOR, UNKNOWN_JOURNAL};

/// CSS selectors locating one paper on a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListingSelectors {
    /// One block per paper.
    pub item: String,
    /// Heading link inside the block: text is the title, `href` the link.
    pub title: String,
    /// Optional descriptive paragraph inside the block.
    pub summary: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            item: "article".to_string(),
            title: "h3 a".to_string(),
            summary: "p".to_string(),
        }
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| anyhow!("invalid css selector {s:?}: {e}"))
}

fn element_text(el: ElementRef<'_>) -> String {
    clean_text(&el.text().collect::<String>())
}

/// Resolve `href` against the page URL; absolute links pass through untouched.
fn resolve_link(base: &str, href: &str) -> String {
    match Url::parse(base).and_then(|b| b.join(href)) {
        Ok(u) => u.to_string(),
        Err(_) => href.to_string(),
    }
}

pub struct ListingProvider {
    page_url: String,
    selectors: ListingSelectors,
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { client: reqwest::Client },
}

impl ListingProvider {
    pub fn from_url(
        url: impl Into<String>,
        selectors: ListingSelectors,
        client: reqwest::Client,
    ) -> Self {
        Self {
            page_url: url.into(),
            selectors,
            mode: Mode::Http { client },
        }
    }

    /// Serve a fixed page; `page_url` is still used to resolve relative links.
    pub fn from_fixture(
        page_url: impl Into<String>,
        selectors: ListingSelectors,
        html: &str,
    ) -> Self {
        Self {
            page_url: page_url.into(),
            selectors,
            mode: Mode::Fixture(html.to_string()),
        }
    }

    pub fn parse_items_from_str(
        page_url: &str,
        selectors: &ListingSelectors,
        html: &str,
    ) -> Result<Vec<CandidateItem>> {
        let item_sel = parse_selector(&selectors.item)?;
        let title_sel = parse_selector(&selectors.title)?;
        let summary_sel = parse_selector(&selectors.summary)?;
        let page_title_sel = parse_selector("head > title")?;

        let document = Html::parse_document(html);
        let journal = document
            .select(&page_title_sel)
            .next()
            .map(element_text)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNKNOWN_JOURNAL.to_string());

        let mut out = Vec::new();
        for block in document.select(&item_sel) {
            let Some(a) = block.select(&title_sel).next() else {
                continue;
            };
            let title = element_text(a);
            if title.is_empty() {
                continue;
            }

            let link = match a.value().attr("href").map(str::trim) {
                Some(href) if !href.is_empty() => resolve_link(page_url, href),
                _ => page_url.to_string(),
            };
            let summary = block
                .select(&summary_sel)
                .next()
                .map(element_text)
                .unwrap_or_default();

            out.push(CandidateItem {
                title,
                summary,
                link,
                author: UNKNOWN_AUTHOR.to_string(),
                journal: journal.clone(),
            });
        }
        Ok(out)
    }
}

#[async_trait]
impl SourceProvider for ListingProvider {
    async fn fetch_latest(&self) -> Result<Vec<CandidateItem>> {
        match &self.mode {
            Mode::Fixture(html) => {
                Self::parse_items_from_str(&self.page_url, &self.selectors, html)
            }
            Mode::Http { client } => {
                let url = &self.page_url;
                let body = client
                    .get(url.as_str())
                    .send()
                    .await
                    .with_context(|| format!("listing http get {url}"))?
                    .error_for_status()
                    .with_context(|| format!("listing {url} non-2xx"))?
                    .text()
                    .await
                    .context("listing http .text()")?;
                Self::parse_items_from_str(url, &self.selectors, &body)
            }
        }
    }

    fn name(&self) -> &str {
        &self.page_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head><title>Daily Papers</title></head><body>
<article><h3><a href="/papers/2501.00001">  Segment   Anything Again </a></h3><p>We study segmentation.</p></article>
<article><h3><a href="https://other.test/abs/2">Absolute Link</a></h3></article>
<article><h3>No link here</h3><p>dropped</p></article>
<article><h3><a href="/papers/3"></a></h3></article>
</body></html>"#;

    #[test]
    fn extracts_title_summary_and_resolves_links() {
        let items = ListingProvider::parse_items_from_str(
            "https://huggingface.co/papers",
            &ListingSelectors::default(),
            PAGE,
        )
        .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Segment Anything Again");
        assert_eq!(items[0].summary, "We study segmentation.");
        assert_eq!(items[0].link, "https://huggingface.co/papers/2501.00001");
        assert_eq!(items[0].journal, "Daily Papers");
        assert_eq!(items[1].title, "Absolute Link");
        assert_eq!(items[1].summary, "");
        assert_eq!(items[1].link, "https://other.test/abs/2");
    }

    #[test]
    fn custom_selectors_are_honoured() {
        let html = r#"<ul><li class="paper"><a class="t" href="x/1">One</a><span class="abs">Abs</span></li></ul>"#;
        let sel = ListingSelectors {
            item: "li.paper".into(),
            title: "a.t".into(),
            summary: "span.abs".into(),
        };
        let items =
            ListingProvider::parse_items_from_str("https://site.test/list/", &sel, html).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].link, "https://site.test/list/x/1");
        assert_eq!(items[0].summary, "Abs");
        assert_eq!(items[0].journal, UNKNOWN_JOURNAL);
    }

    #[test]
    fn bad_selector_is_an_error() {
        let sel = ListingSelectors {
            item: "[[".into(),
            ..ListingSelectors::default()
        };
        assert!(ListingProvider::parse_items_from_str("https://x.test", &sel, "<p></p>").is_err());
    }
}
