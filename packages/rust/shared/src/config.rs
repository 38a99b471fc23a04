//! Application configuration for BlogFactory.
//!
//! User config lives at `~/.blogfactory/blogfactory.toml`.
//! A `--config` path on the CLI overrides the default location; missing keys
//! fall back to defaults. The loaded value is read-only for the whole run and
//! is handed to each stage through the runtime views below.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BlogFactoryError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "blogfactory.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".blogfactory";

// ---------------------------------------------------------------------------
// Config structs (matching blogfactory.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Pipeline settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// News search settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// Generation service settings.
    #[serde(default)]
    pub generation: GenerationConfig,
}

/// `[general]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Query string sent to the news search.
    #[serde(default = "default_topic_query")]
    pub topic_query: String,

    /// Minimum content length in characters.
    #[serde(default = "default_desired_length")]
    pub desired_length: usize,

    /// Maximum number of topics turned into posts.
    #[serde(default = "default_post_count")]
    pub post_count: usize,

    /// Generation chunk size, in model tokens for requests and characters for tails.
    #[serde(default = "default_max_seq_length")]
    pub max_seq_length: usize,

    /// Target storage bucket.
    #[serde(default)]
    pub bucket_id: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            topic_query: default_topic_query(),
            desired_length: default_desired_length(),
            post_count: default_post_count(),
            max_seq_length: default_max_seq_length(),
            bucket_id: String::new(),
        }
    }
}

fn default_topic_query() -> String {
    "technology".into()
}
fn default_desired_length() -> usize {
    5000
}
fn default_post_count() -> usize {
    1
}
fn default_max_seq_length() -> usize {
    200
}

/// `[search]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// News search endpoint; receives `q` and `tbm=nws` query parameters.
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds.
    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: default_search_endpoint(),
            timeout_secs: default_search_timeout(),
        }
    }
}

fn default_search_endpoint() -> String {
    "https://www.google.com/search".into()
}
fn default_search_timeout() -> u64 {
    30
}

/// `[generation]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Text-generation inference endpoint.
    #[serde(default = "default_generation_endpoint")]
    pub endpoint: String,

    /// Name of the env var holding the API token (never store the token itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Cap on continuation calls per topic.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Request timeout in seconds.
    #[serde(default = "default_generation_timeout")]
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_generation_endpoint(),
            api_key_env: default_api_key_env(),
            max_iterations: default_max_iterations(),
            timeout_secs: default_generation_timeout(),
        }
    }
}

fn default_generation_endpoint() -> String {
    "https://api-inference.huggingface.co/models/EleutherAI/gpt-j-6B".into()
}
fn default_api_key_env() -> String {
    "HF_API_TOKEN".into()
}
fn default_max_iterations() -> usize {
    100
}
fn default_generation_timeout() -> u64 {
    120
}

// ---------------------------------------------------------------------------
// Runtime views (one per stage)
// ---------------------------------------------------------------------------

/// Runtime settings for the topic finder.
#[derive(Debug, Clone)]
pub struct FinderConfig {
    /// News search endpoint.
    pub endpoint: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl From<&AppConfig> for FinderConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            endpoint: config.search.endpoint.clone(),
            timeout_secs: config.search.timeout_secs,
        }
    }
}

/// Runtime settings for the content generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Minimum content length in characters.
    pub desired_length: usize,
    /// Number of topics to process.
    pub post_count: usize,
    /// Chunk size requested from the model and kept from each response.
    pub max_seq_length: usize,
    /// Cap on continuation calls per topic.
    pub max_iterations: usize,
}

impl From<&AppConfig> for GeneratorConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            desired_length: config.general.desired_length,
            post_count: config.general.post_count,
            max_seq_length: config.general.max_seq_length,
            max_iterations: config.generation.max_iterations,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.blogfactory/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| BlogFactoryError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.blogfactory/blogfactory.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| BlogFactoryError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        BlogFactoryError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| BlogFactoryError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| BlogFactoryError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| BlogFactoryError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Reject settings that would make the pipeline meaningless or unbounded.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    let general = &config.general;
    if general.topic_query.trim().is_empty() {
        return Err(BlogFactoryError::config("general.topic_query must not be empty"));
    }
    if general.desired_length == 0 {
        return Err(BlogFactoryError::config("general.desired_length must be positive"));
    }
    if general.post_count == 0 {
        return Err(BlogFactoryError::config("general.post_count must be positive"));
    }
    if general.max_seq_length == 0 {
        return Err(BlogFactoryError::config("general.max_seq_length must be positive"));
    }
    if config.generation.max_iterations == 0 {
        return Err(BlogFactoryError::config(
            "generation.max_iterations must be positive",
        ));
    }
    Ok(())
}

/// Check that a bucket is configured before publishing to cloud storage.
pub fn validate_bucket(config: &AppConfig) -> Result<()> {
    if config.general.bucket_id.trim().is_empty() {
        return Err(BlogFactoryError::config(
            "general.bucket_id is not set. Add it to the config file or pass --local-dir for a dry run.",
        ));
    }
    Ok(())
}

/// Read the generation API token from the configured env var, if set and non-empty.
pub fn generation_api_key(config: &AppConfig) -> Option<String> {
    std::env::var(&config.generation.api_key_env)
        .ok()
        .filter(|val| !val.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("topic_query"));
        assert!(toml_str.contains("HF_API_TOKEN"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.general.desired_length, 5000);
        assert_eq!(parsed.generation.max_iterations, 100);
    }

    #[test]
    fn chunk_minimum_is_not_configurable() {
        let toml_str = r#"
[generation]
min_length = 10
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        let toml_out = toml::to_string_pretty(&config).expect("serialize");
        assert!(!toml_out.contains("min_length"));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[general]
topic_query = "open source"
post_count = 3
bucket_id = "my-blog-bucket"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.general.topic_query, "open source");
        assert_eq!(config.general.post_count, 3);
        assert_eq!(config.general.bucket_id, "my-blog-bucket");
        assert_eq!(config.general.max_seq_length, 200);
        assert_eq!(config.search.endpoint, "https://www.google.com/search");
        assert_eq!(config.generation.max_iterations, 100);
    }

    #[test]
    fn runtime_views_from_app_config() {
        let mut app = AppConfig::default();
        app.general.max_seq_length = 10;

        let finder = FinderConfig::from(&app);
        assert_eq!(finder.endpoint, "https://www.google.com/search");
        assert_eq!(finder.timeout_secs, 30);

        let generator = GeneratorConfig::from(&app);
        assert_eq!(generator.max_seq_length, 10);
        assert_eq!(generator.max_iterations, 100);
        assert_eq!(generator.post_count, 1);
    }

    #[test]
    fn validation_rejects_zero_lengths() {
        let mut config = AppConfig::default();
        assert!(validate_config(&config).is_ok());

        config.general.max_seq_length = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("max_seq_length"));

        config.general.max_seq_length = 200;
        config.general.topic_query = "   ".into();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn bucket_validation() {
        let mut config = AppConfig::default();
        assert!(validate_bucket(&config).is_err());
        config.general.bucket_id = "blog-content".into();
        assert!(validate_bucket(&config).is_ok());
    }

    #[test]
    fn api_key_lookup() {
        let mut config = AppConfig::default();
        // Use a unique env var name to avoid interfering with other tests
        config.generation.api_key_env = "BF_TEST_NONEXISTENT_KEY_12345".into();
        assert!(generation_api_key(&config).is_none());
    }
}
