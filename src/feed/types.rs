use serde::{Deserialize, Serialize};

/// Engagement counters attached to every feed item.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Metrics {
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub shares: u64,
    #[serde(default)]
    pub bookmarks: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Media {
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

/// A single article as served by the feed API.
///
/// `published` is kept as the raw string the backend sent. Parsing happens
/// in the filter engine, which treats unparsable values as always-recent.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct NewsItem {
    pub pk: String,
    pub sk: String,
    pub item_hash: String,
    pub ttl: String,
    pub source_name: String,
    pub source_id: String,
    pub country: String,
    pub language: String,
    pub news_url: String,
    pub headline: String,
    pub published: String,
    pub summary: String,
    pub media: Media,
    pub categories: Vec<String>,
    pub metrics: Metrics,
}

/// One page of a feed. `page_key` is the opaque cursor for the next page;
/// `None` means the feed is exhausted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewsPage {
    pub news: Vec<NewsItem>,
    pub page_key: Option<String>,
}

/// The API wraps every payload in a `body` envelope.
#[derive(Deserialize, Debug, Default)]
pub(crate) struct FeedEnvelope {
    #[serde(default)]
    pub body: Option<FeedBody>,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct FeedBody {
    #[serde(default)]
    pub news: Option<Vec<NewsItem>>,
    #[serde(default)]
    pub page_key: Option<String>,
}

impl From<FeedEnvelope> for NewsPage {
    fn from(envelope: FeedEnvelope) -> Self {
        match envelope.body {
            Some(body) => NewsPage {
                news: body.news.unwrap_or_default(),
                page_key: body.page_key.filter(|k| !k.is_empty()),
            },
            None => NewsPage::default(),
        }
    }
}
