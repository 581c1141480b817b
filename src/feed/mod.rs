pub mod provider;
pub mod providers;
pub mod types;

pub use provider::{FeedError, FeedKind, FeedProvider, FeedQuery};
pub use providers::HttpFeedProvider;
pub use types::{Media, Metrics, NewsItem, NewsPage};
