pub mod http;

pub use http::HttpFeedProvider;
