//! Core domain types passed between pipeline stages.

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// Prefix under which every published record is stored.
pub const STORAGE_PREFIX: &str = "automated_blog";

// ---------------------------------------------------------------------------
// RunId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper identifying one pipeline invocation (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Generate a new time-sortable run identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Topic / ContentRecord
// ---------------------------------------------------------------------------

/// A candidate subject scraped from news search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Headline text of the search result.
    pub title: String,
    /// Absolute link to the original article.
    pub link: Url,
}

/// A topic paired with generated long-form text, ready for publication.
///
/// Serializes to exactly `{"title", "link", "content"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub title: String,
    pub link: Url,
    /// Generated text, trimmed to end on a complete sentence.
    pub content: String,
}

impl ContentRecord {
    /// Pair a topic with its generated content.
    pub fn new(topic: &Topic, content: String) -> Self {
        Self {
            title: topic.title.clone(),
            link: topic.link.clone(),
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_record_json_shape() {
        let topic = Topic {
            title: "Rust 2024 ships".into(),
            link: Url::parse("https://blog.example.com/rust-2024").unwrap(),
        };
        let record = ContentRecord::new(&topic, "It shipped.".into());
        let json: serde_json::Value = serde_json::to_value(&record).unwrap();

        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert_eq!(obj["title"], "Rust 2024 ships");
        assert_eq!(obj["link"], "https://blog.example.com/rust-2024");
        assert_eq!(obj["content"], "It shipped.");
    }

    #[test]
    fn run_ids_are_unique() {
        assert_ne!(RunId::new(), RunId::new());
    }
}
