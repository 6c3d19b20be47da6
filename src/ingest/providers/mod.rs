// src/ingest/providers/mod.rs
pub mod feed;
pub mod listing;

pub use feed::FeedProvider;
pub use listing::{ListingProvider, ListingSelectors};
