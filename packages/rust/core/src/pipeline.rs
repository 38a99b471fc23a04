//! End-to-end pipeline: query → topics → generated content → published JSON.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, instrument};

use blogfactory_generation::{ContentGenerator, GenerationProgress, TextGenerator};
use blogfactory_shared::{
    AppConfig, ContentRecord, FinderConfig, GeneratorConfig, Result, RunId,
};
use blogfactory_storage::{ObjectStore, PublishProgress, PublishedRecord, Publisher};
use blogfactory_topics::TopicFinder;

/// Result of one pipeline run.
#[derive(Debug)]
pub struct RunSummary {
    /// Identifier tagging this run's log output.
    pub run_id: RunId,
    /// Query the topics were found for.
    pub query: String,
    /// Number of topics the finder returned (before `post_count` truncation).
    pub topics_found: usize,
    /// Records written, in order.
    pub published: Vec<PublishedRecord>,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called before content is generated for a topic.
    fn topic_started(&self, current: usize, total: usize, title: &str);
    /// Called when a topic's content is complete.
    fn topic_generated(&self, record: &ContentRecord);
    /// Called when a record has been written.
    fn record_published(&self, current: usize, total: usize, key: &str);
    /// Called when the pipeline completes.
    fn done(&self, summary: &RunSummary);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn topic_started(&self, _current: usize, _total: usize, _title: &str) {}
    fn topic_generated(&self, _record: &ContentRecord) {}
    fn record_published(&self, _current: usize, _total: usize, _key: &str) {}
    fn done(&self, _summary: &RunSummary) {}
}

/// Forwards stage-level callbacks to the pipeline reporter.
struct StageProgress<'a>(&'a dyn ProgressReporter);

impl GenerationProgress for StageProgress<'_> {
    fn topic_started(&self, current: usize, total: usize, title: &str) {
        self.0.topic_started(current, total, title);
    }

    fn topic_generated(&self, record: &ContentRecord) {
        self.0.topic_generated(record);
    }
}

impl PublishProgress for StageProgress<'_> {
    fn record_published(&self, current: usize, total: usize, key: &str) {
        self.0.record_published(current, total, key);
    }
}

/// The three pipeline stages wired together for one query.
pub struct BlogFactory {
    query: String,
    finder: TopicFinder,
    generator: ContentGenerator,
    publisher: Publisher,
}

impl BlogFactory {
    pub fn new(
        query: impl Into<String>,
        finder: TopicFinder,
        generator: ContentGenerator,
        publisher: Publisher,
    ) -> Self {
        Self {
            query: query.into(),
            finder,
            generator,
            publisher,
        }
    }

    /// Build every stage from `config`, using the given model and store.
    pub fn from_config(
        config: &AppConfig,
        text_generator: Arc<dyn TextGenerator>,
        store: Arc<dyn ObjectStore>,
    ) -> Result<Self> {
        let finder = TopicFinder::new(FinderConfig::from(config))?;
        let generator = ContentGenerator::new(GeneratorConfig::from(config), text_generator);
        let publisher = Publisher::new(store);

        Ok(Self::new(
            config.general.topic_query.clone(),
            finder,
            generator,
            publisher,
        ))
    }

    /// Run the full pipeline once.
    ///
    /// 1. Find topics for the configured query
    /// 2. Generate content for the first `post_count` topics
    /// 3. Publish each record as JSON
    ///
    /// Any failure aborts the run; records published before it stay published.
    pub async fn create_blog_post(&self, progress: &dyn ProgressReporter) -> Result<RunSummary> {
        self.run(RunId::new(), progress).await
    }

    #[instrument(skip_all, fields(run_id = %run_id, query = %self.query))]
    async fn run(&self, run_id: RunId, progress: &dyn ProgressReporter) -> Result<RunSummary> {
        let start = Instant::now();
        let stages = StageProgress(progress);

        info!("starting blog pipeline");

        // --- Phase 1: Topics ---
        progress.phase("Finding topics");
        let topics = self.finder.find(&self.query).await?;

        // --- Phase 2: Generation ---
        progress.phase("Generating content");
        let records = self.generator.generate_all(&topics, &stages).await?;

        // --- Phase 3: Publishing ---
        progress.phase("Publishing content");
        let published = self.publisher.publish(&records, &stages).await?;

        let summary = RunSummary {
            run_id,
            query: self.query.clone(),
            topics_found: topics.len(),
            published,
            elapsed: start.elapsed(),
        };

        info!(
            topics_found = summary.topics_found,
            published = summary.published.len(),
            elapsed_ms = summary.elapsed.as_millis(),
            "blog pipeline complete"
        );
        progress.done(&summary);

        Ok(summary)
    }
}
