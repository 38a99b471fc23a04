//! BlogFactory CLI — automated blog content from trending news topics.
//!
//! Finds topics in news search results, grows long-form text for each with a
//! generative model, and publishes the results as JSON to object storage.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
