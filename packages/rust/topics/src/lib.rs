//! Trending topic discovery from news search results.
//!
//! The finder issues a single news-search request for the configured query
//! and hands the returned HTML to a [`TopicExtractor`]. Zero topics is fatal
//! for the run; there is no retry and no fallback query.

mod extract;

use std::time::Duration;

use blogfactory_shared::{BlogFactoryError, FinderConfig, Result, Topic};
use reqwest::Client;
use tracing::{debug, info, instrument};

pub use extract::{HEADLINE_SELECTOR, NewsResultsExtractor, TopicExtractor, extract_link};

/// Maximum number of redirects to follow on the search request.
const MAX_REDIRECTS: usize = 3;

/// User-Agent string for search requests.
const USER_AGENT: &str = concat!("BlogFactory/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// TopicFinder
// ---------------------------------------------------------------------------

/// Finds candidate blog topics for a query.
pub struct TopicFinder {
    config: FinderConfig,
    client: Client,
    extractor: Box<dyn TopicExtractor>,
}

impl TopicFinder {
    /// Create a finder using the built-in [`NewsResultsExtractor`].
    pub fn new(config: FinderConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                BlogFactoryError::upstream("search", format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            config,
            client,
            extractor: Box::new(NewsResultsExtractor),
        })
    }

    /// Swap in a different extractor (e.g. for a newer results markup).
    pub fn with_extractor(mut self, extractor: Box<dyn TopicExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Search the news vertical for `query` and extract topics in result order.
    #[instrument(skip_all, fields(query = %query))]
    pub async fn find(&self, query: &str) -> Result<Vec<Topic>> {
        info!(endpoint = %self.config.endpoint, "searching news for topics");

        let html = self.fetch_results(query).await?;
        let topics = self.extractor.extract_topics(&html)?;

        if topics.is_empty() {
            return Err(BlogFactoryError::NoTopicsFound {
                query: query.to_string(),
            });
        }

        for topic in &topics {
            debug!(title = %topic.title, link = %topic.link, "topic found");
        }
        info!(
            count = topics.len(),
            extractor = self.extractor.name(),
            "topics extracted"
        );

        Ok(topics)
    }

    /// GET the news results page for `query`.
    async fn fetch_results(&self, query: &str) -> Result<String> {
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[("q", query), ("tbm", "nws")])
            .send()
            .await
            .map_err(|e| BlogFactoryError::upstream("search", e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BlogFactoryError::upstream(
                "search",
                format!("{}: HTTP {status}", self.config.endpoint),
            ));
        }

        response.text().await.map_err(|e| {
            BlogFactoryError::upstream("search", format!("failed to read body: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn finder_for(server: &MockServer) -> TopicFinder {
        TopicFinder::new(FinderConfig {
            endpoint: format!("{}/search", server.uri()),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_find_with_mock_server() {
        let server = MockServer::start().await;

        let html = std::fs::read_to_string("../../../fixtures/html/news_results.html")
            .expect("read news fixture");

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "rust language"))
            .and(query_param("tbm", "nws"))
            .respond_with(ResponseTemplate::new(200).set_body_string(html))
            .expect(1)
            .mount(&server)
            .await;

        let topics = finder_for(&server).find("rust language").await.unwrap();

        assert_eq!(topics.len(), 3);
        assert_eq!(topics[1].title, "Breaking: News!");
        assert_eq!(
            topics[1].link.as_str(),
            "https://news.example.com/world/breaking-news"
        );
    }

    #[tokio::test]
    async fn test_no_topics_carries_query() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<html><body>No results</body></html>"),
            )
            .mount(&server)
            .await;

        let err = finder_for(&server).find("zzqx nothing").await.unwrap_err();
        match err {
            BlogFactoryError::NoTopicsFound { query } => assert_eq!(query, "zzqx nothing"),
            other => panic!("expected NoTopicsFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_http_error_is_upstream_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = finder_for(&server).find("rust").await.unwrap_err();
        assert!(matches!(err, BlogFactoryError::UpstreamRequest { .. }));
        assert!(err.to_string().contains("429"));
    }

    struct FixedExtractor;

    impl TopicExtractor for FixedExtractor {
        fn extract_topics(&self, _html: &str) -> Result<Vec<Topic>> {
            Ok(vec![Topic {
                title: "Injected".into(),
                link: url::Url::parse("https://example.com/injected").unwrap(),
            }])
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_custom_extractor() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let finder = finder_for(&server).with_extractor(Box::new(FixedExtractor));
        let topics = finder.find("anything").await.unwrap();
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].title, "Injected");
    }
}
