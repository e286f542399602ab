//! Pipeline orchestration: validate → reorder → style
//!
//! One linear string → string transformation per document. Each stage is a
//! pure function of its input and the merged configuration; the text
//! emitted between reorder and style is itself valid TOML, so a failure
//! always isolates to one stage. Nothing is retried and nothing is
//! partially written.

use thiserror::Error;
use toml_edit::DocumentMut;

use crate::config::{ConfigError, MergedConfig};
use crate::sort::Sorter;
use crate::style::{self, ExternalToolError};

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML parse error: {0}")]
    Document(#[from] toml_edit::TomlError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("styling failed: {0}")]
    Style(#[from] ExternalToolError),
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// The validate → reorder → style pipeline over one merged configuration.
///
/// The configuration is read-only, so one pipeline can process any number
/// of documents without cross-document interference.
pub struct Pipeline {
    config: MergedConfig,
}

impl Pipeline {
    pub fn new(config: MergedConfig) -> Self {
        Self { config }
    }

    /// Pipeline over the built-in defaults.
    pub fn with_defaults() -> PipelineResult<Self> {
        Ok(Self::new(MergedConfig::resolve(None)?))
    }

    pub fn config(&self) -> &MergedConfig {
        &self.config
    }

    /// Validate and reorder without styling. The result is valid TOML with
    /// every key, value, and comment of the input.
    pub fn reorder(&self, text: &str) -> PipelineResult<String> {
        toml::from_str::<toml::Table>(text)?;
        let mut doc: DocumentMut = text.parse()?;
        Sorter::new(&self.config).sort(&mut doc);
        Ok(doc.to_string())
    }

    /// The full contract: validate, reorder, then hand off to the styling
    /// collaborator.
    pub fn process(&self, text: &str) -> PipelineResult<String> {
        let reordered = self.reorder(text)?;
        let styled = style::format(&reordered, &style::style_args(&self.config))?;
        Ok(styled)
    }
}

/// Format a pyproject.toml string with the built-in defaults.
pub fn format_pyproject(text: &str) -> PipelineResult<String> {
    Pipeline::with_defaults()?.process(text)
}
