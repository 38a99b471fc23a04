//! Long-form content generation on top of a chunked text generator.
//!
//! A single model call returns at most `max_seq_length` tokens, so each post
//! is grown chunk by chunk: the tail of what exists so far becomes the next
//! prompt, and only the tail of each response is appended (the model echoes
//! its prompt). Once long enough, the text is cut back to its last complete
//! sentence.

mod client;
mod sentence;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use blogfactory_shared::{BlogFactoryError, ContentRecord, GeneratorConfig, Result, Topic};

pub use client::HttpTextGenerator;
pub use sentence::{char_len, complete_prefix, tail_chars};

/// Minimum token length requested for every chunk.
pub const MIN_LENGTH: usize = 64;

// ---------------------------------------------------------------------------
// Generator trait
// ---------------------------------------------------------------------------

/// Parameters for one call to the generation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub do_sample: bool,
    pub min_length: usize,
    pub max_length: usize,
}

/// A text-generation model. The returned text includes the prompt as a prefix.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Produce one chunk of text continuing `request.prompt`.
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;

    /// Human-readable generator name for tracing.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Progress trait
// ---------------------------------------------------------------------------

/// Progress callback for content generation.
pub trait GenerationProgress: Send + Sync {
    /// Called before generating content for a topic.
    fn topic_started(&self, current: usize, total: usize, title: &str);
    /// Called after a record is complete.
    fn topic_generated(&self, record: &ContentRecord);
}

/// No-op generation progress.
pub struct SilentGenerationProgress;

impl GenerationProgress for SilentGenerationProgress {
    fn topic_started(&self, _current: usize, _total: usize, _title: &str) {}
    fn topic_generated(&self, _record: &ContentRecord) {}
}

// ---------------------------------------------------------------------------
// ContentGenerator
// ---------------------------------------------------------------------------

/// Turns topics into [`ContentRecord`]s, one topic at a time.
pub struct ContentGenerator {
    config: GeneratorConfig,
    generator: Arc<dyn TextGenerator>,
}

impl ContentGenerator {
    pub fn new(config: GeneratorConfig, generator: Arc<dyn TextGenerator>) -> Self {
        Self { config, generator }
    }

    /// Generate a record for each of the first `post_count` topics, in order.
    ///
    /// The first failure aborts the whole batch.
    #[instrument(skip_all, fields(topics = topics.len(), post_count = self.config.post_count))]
    pub async fn generate_all(
        &self,
        topics: &[Topic],
        progress: &dyn GenerationProgress,
    ) -> Result<Vec<ContentRecord>> {
        let selected = &topics[..topics.len().min(self.config.post_count)];
        let mut records = Vec::with_capacity(selected.len());

        for (i, topic) in selected.iter().enumerate() {
            progress.topic_started(i + 1, selected.len(), &topic.title);
            let record = self.generate_record(topic).await?;
            progress.topic_generated(&record);
            records.push(record);
        }

        Ok(records)
    }

    /// Grow content for one topic until it is at least `desired_length`
    /// characters and ends on a complete sentence.
    #[instrument(skip_all, fields(title = %topic.title))]
    pub async fn generate_record(&self, topic: &Topic) -> Result<ContentRecord> {
        let desired = self.config.desired_length;
        let chunk = self.config.max_seq_length;

        let mut content = self.request(&topic.title).await?;
        let mut continuations = 0;

        loop {
            if char_len(&content) >= desired {
                match complete_prefix(&content) {
                    None => {
                        return Err(BlogFactoryError::NoSentenceBoundary {
                            title: topic.title.clone(),
                        });
                    }
                    Some(prefix) if char_len(prefix) >= desired => {
                        let record = ContentRecord::new(topic, prefix.to_string());
                        info!(
                            title = %record.title,
                            link = %record.link,
                            chars = char_len(&record.content),
                            continuations,
                            "content generated"
                        );
                        debug!(content = %record.content, "generated content");
                        return Ok(record);
                    }
                    Some(prefix) => {
                        debug!(
                            chars = char_len(prefix),
                            desired, "trimmed content below desired length, continuing"
                        );
                    }
                }
            }

            if continuations >= self.config.max_iterations {
                return Err(BlogFactoryError::GenerationLimit {
                    title: topic.title.clone(),
                    iterations: continuations,
                });
            }

            let prompt = tail_chars(&content, chunk).to_string();
            let generated = self.request(&prompt).await?;
            content.push_str(tail_chars(&generated, chunk));
            continuations += 1;

            debug!(chars = char_len(&content), continuations, "chunk appended");
        }
    }

    /// One sampled call to the generator.
    async fn request(&self, prompt: &str) -> Result<String> {
        let request = GenerationRequest {
            prompt: prompt.to_string(),
            do_sample: true,
            min_length: MIN_LENGTH,
            max_length: self.config.max_seq_length,
        };
        self.generator.generate(&request).await
    }
}
