use std::fmt;

use async_trait::async_trait;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::types::NewsPage;

/// Which feed to page through.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    /// Newest items first.
    #[default]
    Latest,
    /// Trending items.
    Top,
}

impl FeedKind {
    /// Path segment under `/feed/`.
    pub fn path(self) -> &'static str {
        match self {
            FeedKind::Latest => "latest",
            FeedKind::Top => "top",
        }
    }
}

/// Errors that can occur while fetching a feed page.
#[derive(Debug)]
pub enum FeedError {
    /// Provider misconfigured (missing endpoint, bad URL). Not retryable.
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused). Retryable.
    Network(String),
    /// API returned an error response. Retryable if status >= 500 or 429.
    Api { status: u16, message: String },
    /// Failed to decode the response body. Not retryable.
    Parse(String),
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::Config(msg) => write!(f, "config error: {msg}"),
            FeedError::Network(msg) => write!(f, "network error: {msg}"),
            FeedError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            FeedError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for FeedError {}

/// Everything a provider needs to fetch one page.
pub struct FeedQuery<'a> {
    pub kind: FeedKind,
    pub country: &'a str,
    pub language: &'a str,
    /// Cursor returned with the previous page, if any.
    pub page_key: Option<&'a str>,
}

#[async_trait]
pub trait FeedProvider: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    /// Fetches one page of the requested feed.
    async fn fetch(&self, query: FeedQuery<'_>) -> Result<NewsPage, FeedError>;
}
