//! Sort and format configuration
//!
//! Two layers merged into one immutable bundle:
//! 1. Built-in defaults
//! 2. Optional `[tool.pypfmt]` section of the document being formatted
//!
//! Override pattern modeled on ruff: `extend-*` adds to defaults, a plain
//! key replaces them.

mod defaults;
mod merge;
mod user;

pub use defaults::{
    default_overrides, CommentConfig, FormatConfig, SortConfig, SortOverride, STYLE_OPTIONS,
};
pub use merge::MergedConfig;
pub use user::{
    has_conflicting_sections, load_user_config, ConfigError, Directive, UserConfig,
    CONFIG_SECTION, CONFLICT_SECTION,
};
