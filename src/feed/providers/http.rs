//! HTTP feed provider for the news API.
//!
//! ```text
//! GET {endpoint}/feed/{latest|top}?country=IN&language=EN[&page_key=...]
//!
//! { "body": { "news": [ ... ], "page_key": "..." } }
//! ```
//!
//! A response without `body` or `news` is an empty page, not an error.

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use crate::feed::provider::{FeedError, FeedProvider, FeedQuery};
use crate::feed::types::{FeedEnvelope, NewsPage};

pub struct HttpFeedProvider {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpFeedProvider {
    /// Builds a provider for `endpoint`. A trailing slash is ignored.
    pub fn new(endpoint: Option<String>) -> Result<Self, FeedError> {
        let endpoint = endpoint
            .map(|e| e.trim().trim_end_matches('/').to_string())
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                FeedError::Config(
                    "no API endpoint configured (set FEEDLENS_API_ENDPOINT or [feed].api_endpoint)"
                        .to_string(),
                )
            })?;

        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(FeedError::Config(format!("endpoint is not an http(s) URL: {endpoint}")));
        }

        Ok(Self {
            endpoint,
            client: reqwest::Client::new(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl FeedProvider for HttpFeedProvider {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, query: FeedQuery<'_>) -> Result<NewsPage, FeedError> {
        let url = format!("{}/feed/{}", self.endpoint, query.kind.path());

        let mut params = vec![("country", query.country), ("language", query.language)];
        if let Some(page_key) = query.page_key {
            params.push(("page_key", page_key));
        }

        info!(
            "Feed request: kind={:?}, country={}, language={}, page_key={:?}",
            query.kind, query.country, query.language, query.page_key
        );

        let response = self
            .client
            .get(&url)
            .query(&params)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))?;

        debug!("Feed response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Feed API error: {} - {}", status, err_body);
            return Err(FeedError::Api {
                status,
                message: err_body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))?;
        let envelope: FeedEnvelope =
            serde_json::from_str(&body).map_err(|e| FeedError::Parse(e.to_string()))?;
        let page = NewsPage::from(envelope);

        info!(
            "Feed page: {} items, more={}",
            page.news.len(),
            page.page_key.is_some()
        );
        Ok(page)
    }
}
