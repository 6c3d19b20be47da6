// src/ingest/types.rs
use anyhow::Result;

pub const UNKNOWN_AUTHOR: &str = "Unknown author";
pub const UNKNOWN_JOURNAL: &str = "Unknown journal";

/// A paper pulled from a listing page or feed, before filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateItem {
    pub title: String,   // dedup key
    pub summary: String, // may be empty
    pub link: String,
    pub author: String,  // first author or UNKNOWN_AUTHOR
    pub journal: String, // feed/page title or UNKNOWN_JOURNAL
}

impl CandidateItem {
    pub fn new(
        title: impl Into<String>,
        summary: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            link: link.into(),
            author: UNKNOWN_AUTHOR.to_string(),
            journal: UNKNOWN_JOURNAL.to_string(),
        }
    }

    /// Text the keyword filter runs against.
    pub fn match_text(&self) -> String {
        format!("{} {}", self.title, self.summary)
    }
}

#[async_trait::async_trait]
pub trait SourceProvider: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<CandidateItem>>;
    fn name(&self) -> &str;
}
