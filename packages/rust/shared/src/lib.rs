//! Shared types, error model, and configuration for BlogFactory.
//!
//! This crate is the foundation depended on by all other BlogFactory crates.
//! It provides:
//! - [`BlogFactoryError`] — the unified error type
//! - Domain types ([`Topic`], [`ContentRecord`], [`RunId`])
//! - Configuration ([`AppConfig`], per-stage runtime views, config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, FinderConfig, GeneralConfig, GenerationConfig, GeneratorConfig, SearchConfig,
    config_dir, config_file_path, generation_api_key, init_config, load_config, load_config_from,
    validate_bucket, validate_config,
};
pub use error::{BlogFactoryError, Result};
pub use types::{ContentRecord, RunId, STORAGE_PREFIX, Topic};
