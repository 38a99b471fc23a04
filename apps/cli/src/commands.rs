//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use blogfactory_core::{BlogFactory, ProgressReporter, RunSummary};
use blogfactory_generation::HttpTextGenerator;
use blogfactory_shared::{
    AppConfig, ContentRecord, FinderConfig, generation_api_key, init_config, load_config,
    load_config_from, validate_bucket, validate_config,
};
use blogfactory_storage::{GcsStore, LocalStore, ObjectStore};
use blogfactory_topics::TopicFinder;
use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// BlogFactory — turn trending news topics into published blog posts.
#[derive(Parser)]
#[command(
    name = "blogfactory",
    version,
    about = "Generate blog posts from trending news topics and publish them as JSON.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file to use instead of ~/.blogfactory/blogfactory.toml.
    #[arg(short, long, global = true, env = "BLOGFACTORY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Find topics, generate content, and publish it.
    Run {
        /// Write JSON files under this directory instead of the storage bucket.
        #[arg(long)]
        local_dir: Option<PathBuf>,
    },

    /// Only search for topics and print them.
    Topics {
        /// Query to search for (defaults to general.topic_query).
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "blogfactory=info",
        1 => "blogfactory=debug",
        _ => "blogfactory=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Run { local_dir } => cmd_run(config_path, local_dir.as_deref()).await,
        Command::Topics { query } => cmd_topics(config_path, query.as_deref()).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show(config_path).await,
        },
    }
}

/// Load the config from `--config` if given, else the default location.
fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_run(config_path: Option<&Path>, local_dir: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    validate_config(&config)?;

    let store: Arc<dyn ObjectStore> = match local_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "writing to local directory");
            Arc::new(LocalStore::new(dir))
        }
        None => {
            validate_bucket(&config)?;
            Arc::new(GcsStore::connect(config.general.bucket_id.clone()).await?)
        }
    };

    let text_generator = Arc::new(HttpTextGenerator::new(
        config.generation.endpoint.clone(),
        generation_api_key(&config),
        config.generation.timeout_secs,
    )?);

    let factory = BlogFactory::from_config(&config, text_generator, store)?;

    info!(
        query = %config.general.topic_query,
        post_count = config.general.post_count,
        desired_length = config.general.desired_length,
        "creating blog posts"
    );

    let reporter = CliProgress::new();
    let summary = match factory.create_blog_post(&reporter).await {
        Ok(summary) => summary,
        Err(e) => {
            reporter.spinner.abandon_with_message("Run failed");
            return Err(e.into());
        }
    };

    println!();
    println!("  Blog posts published!");
    println!("  Run:    {}", summary.run_id);
    println!("  Query:  {}", summary.query);
    println!("  Topics: {} found, {} published", summary.topics_found, summary.published.len());
    for record in &summary.published {
        println!("    - {}", record.key);
    }
    println!("  Time:   {:.1}s", summary.elapsed.as_secs_f64());
    println!();

    Ok(())
}

async fn cmd_topics(config_path: Option<&Path>, query: Option<&str>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let query = query.unwrap_or(&config.general.topic_query);

    let finder = TopicFinder::new(FinderConfig::from(&config))?;
    let topics = finder.find(query).await?;

    println!();
    for (i, topic) in topics.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, topic.title);
        println!("      {}", topic.link);
    }
    println!();

    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn topic_started(&self, current: usize, total: usize, title: &str) {
        self.spinner
            .set_message(format!("Generating [{current}/{total}] {title}"));
    }

    fn topic_generated(&self, record: &ContentRecord) {
        self.spinner.println(format!(
            "  ✓ {} ({} chars)",
            record.title,
            record.content.chars().count()
        ));
    }

    fn record_published(&self, current: usize, total: usize, key: &str) {
        self.spinner
            .set_message(format!("Publishing [{current}/{total}] {key}"));
    }

    fn done(&self, _summary: &RunSummary) {
        self.spinner.finish_and_clear();
    }
}
