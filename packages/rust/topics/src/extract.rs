//! Topic extraction from news-search result markup.
//!
//! Extractors turn a search results page into [`Topic`]s. The markup they
//! target is owned by the search provider and changes without notice, so the
//! selector lives here and nowhere else.

use std::sync::LazyLock;

use blogfactory_shared::{BlogFactoryError, Result, Topic};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Trait for pulling topics out of a search results page.
pub trait TopicExtractor: Send + Sync {
    /// Extract topics in document order. An empty result is not an error here;
    /// the finder decides what zero topics means.
    fn extract_topics(&self, html: &str) -> Result<Vec<Topic>>;

    /// Human-readable extractor name for tracing.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// News results extractor
// ---------------------------------------------------------------------------

/// Class list of the headline `div` in the basic-HTML news results page.
///
/// Tied to one version of the provider's markup.
pub const HEADLINE_SELECTOR: &str = "div.BNeawe.vvjwJb.AP7Wnd";

static HEADLINE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(HEADLINE_SELECTOR).expect("valid selector"));

/// First absolute URL inside an href, up to the next `&` (drops redirect
/// wrappers like `/url?q=` and trailing tracking parameters).
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^&\s]+").expect("valid regex"));

/// Extractor for the headline blocks of a news search results page.
pub struct NewsResultsExtractor;

impl TopicExtractor for NewsResultsExtractor {
    fn extract_topics(&self, html: &str) -> Result<Vec<Topic>> {
        let doc = Html::parse_document(html);
        let mut topics = Vec::new();

        for headline in doc.select(&HEADLINE_SEL) {
            let title = headline.text().collect::<String>();

            let href = enclosing_href(headline).ok_or_else(|| {
                BlogFactoryError::parse(format!("headline '{title}' has no enclosing link"))
            })?;

            let link = extract_link(href)?;
            topics.push(Topic { title, link });
        }

        Ok(topics)
    }

    fn name(&self) -> &str {
        "news-results"
    }
}

/// `href` of the nearest `<a>` ancestor of `el`.
fn enclosing_href<'a>(el: ElementRef<'a>) -> Option<&'a str> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name() == "a")
        .and_then(|anchor| anchor.value().attr("href"))
}

/// Pull the first absolute URL out of a (possibly wrapped) href.
pub fn extract_link(href: &str) -> Result<Url> {
    let raw = LINK_RE
        .find(href)
        .ok_or_else(|| BlogFactoryError::parse(format!("no URL found in href '{href}'")))?
        .as_str();

    let url = Url::parse(raw)
        .map_err(|e| BlogFactoryError::parse(format!("invalid URL '{raw}': {e}")))?;

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(BlogFactoryError::parse(format!("URL has no host: {raw}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_fixture(name: &str) -> String {
        let path = format!("../../../fixtures/html/{name}");
        std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("missing fixture: {path}"))
    }

    #[test]
    fn extracts_topics_in_document_order() {
        let html = load_fixture("news_results.html");
        let topics = NewsResultsExtractor.extract_topics(&html).unwrap();

        let titles: Vec<&str> = topics.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Rust 1.85 stabilizes the 2024 edition",
                "Breaking: News!",
                "Why memory safety matters for infrastructure",
            ]
        );
        assert_eq!(
            topics[0].link.as_str(),
            "https://blog.rust-lang.org/2025/02/20/Rust-1.85.0.html"
        );
    }

    #[test]
    fn every_link_has_scheme_and_host() {
        let html = load_fixture("news_results.html");
        let topics = NewsResultsExtractor.extract_topics(&html).unwrap();

        assert!(!topics.is_empty());
        for topic in &topics {
            assert!(matches!(topic.link.scheme(), "http" | "https"));
            assert!(topic.link.host_str().is_some_and(|h| !h.is_empty()));
        }
    }

    #[test]
    fn ignores_non_headline_markup() {
        let html = load_fixture("news_results.html");
        let topics = NewsResultsExtractor.extract_topics(&html).unwrap();
        assert!(!topics.iter().any(|t| t.title.contains("Sponsored")));
    }

    #[test]
    fn empty_page_yields_no_topics() {
        let html = "<html><body><p>Your search did not match any documents.</p></body></html>";
        let topics = NewsResultsExtractor.extract_topics(html).unwrap();
        assert!(topics.is_empty());
    }

    #[test]
    fn headline_without_anchor_is_an_error() {
        let html = r#"<html><body><div class="BNeawe vvjwJb AP7Wnd">Orphan</div></body></html>"#;
        let err = NewsResultsExtractor.extract_topics(html).unwrap_err();
        assert!(matches!(err, BlogFactoryError::Parse { .. }));
        assert!(err.to_string().contains("Orphan"));
    }

    #[test]
    fn extract_link_strips_redirect_wrapper() {
        let href = "/url?q=https://www.example.com/story/42&sa=U&ved=2ahUKE&usg=AOvVaw";
        let url = extract_link(href).unwrap();
        assert_eq!(url.as_str(), "https://www.example.com/story/42");
    }

    #[test]
    fn extract_link_accepts_plain_url() {
        let url = extract_link("http://news.example.org/a?b=c").unwrap();
        assert_eq!(url.host_str(), Some("news.example.org"));
    }

    #[test]
    fn extract_link_without_url_fails() {
        let err = extract_link("/search?q=rust&tbm=nws").unwrap_err();
        assert!(err.to_string().contains("no URL found"));
    }
}
