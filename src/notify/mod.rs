pub mod webhook;

use anyhow::Result;
use serde::Deserialize;

use crate::ingest::types::CandidateItem;

pub use webhook::WebhookNotifier;

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &str) -> Result<()>;
}

/// How a paper is rendered into a chat message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStyle {
    /// `title`, `link`, `tags` on three lines.
    #[default]
    Tags,
    /// `title`, then `author, journal, link`.
    Citation,
}

pub fn compose_message(item: &CandidateItem, tags: &str, style: MessageStyle) -> String {
    match style {
        MessageStyle::Tags => format!("{}\n{}\n{}", item.title, item.link, tags),
        MessageStyle::Citation => format!(
            "{}\n{}, {}, {}",
            item.title, item.author, item.journal, item.link
        ),
    }
}
