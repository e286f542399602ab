//! pypfmt - sort and format pyproject.toml files
//!
//! This crate normalizes the structure of a pyproject.toml document:
//! deterministic table and key ordering, deterministic array sorting, and
//! external whitespace styling, while preserving every key, value, and
//! comment. The pipeline is validate → reorder → style and the whole
//! transformation is idempotent.

pub mod config;
pub mod diff;
pub mod pipeline;
pub mod sort;
pub mod style;

pub use config::{ConfigError, MergedConfig, UserConfig};
pub use pipeline::{format_pyproject, Pipeline, PipelineError, PipelineResult};
pub use style::ExternalToolError;
