//! Pipeline orchestration for BlogFactory.
//!
//! This crate wires topic discovery, content generation, and publishing into
//! a single sequential run (`BlogFactory::create_blog_post`).

pub mod pipeline;

pub use pipeline::{BlogFactory, ProgressReporter, RunSummary, SilentProgress};
