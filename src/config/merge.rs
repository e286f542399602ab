//! Configuration merge
//!
//! Layers the optional `[tool.pypfmt]` user document over the built-in
//! defaults and produces one immutable [`MergedConfig`]. Defaults are never
//! mutated in place; every resolution builds fresh values, so resolving per
//! document is safe.

use std::collections::BTreeSet;

use super::defaults::{self, CommentConfig, FormatConfig, SortConfig};
use super::user::{ConfigError, Directive, UserConfig};
use crate::sort::OverrideMap;

/// The merged configuration bundle consumed by the pipeline.
///
/// Constructed once per invocation, never mutated afterward.
#[derive(Debug, Clone)]
pub struct MergedConfig {
    /// Global sort configuration
    pub sort: SortConfig,

    /// Precompiled per-table-pattern overrides
    pub overrides: OverrideMap,

    /// Comment retention configuration
    pub comments: CommentConfig,

    /// Style knobs forwarded to the styling collaborator
    pub formatting: FormatConfig,

    /// taplo `-o key=value` pairs
    pub style_options: Vec<String>,
}

impl MergedConfig {
    /// Merge user overrides with the hardcoded defaults.
    ///
    /// `None` resolves the pure defaults. Validation (unique `first`
    /// entries, a single `"*"`, well-formed patterns) happens here so the
    /// sorter can rely on a well-formed bundle.
    pub fn resolve(user: Option<&UserConfig>) -> Result<Self, ConfigError> {
        let mut sort = SortConfig::default();
        let mut overrides = defaults::default_overrides();
        let mut comments = CommentConfig::default();
        let mut formatting = FormatConfig::default();
        let mut style_options: Vec<String> =
            defaults::STYLE_OPTIONS.iter().map(|s| s.to_string()).collect();

        if let Some(user) = user {
            match user.first_directive()? {
                Directive::Inherit => {}
                Directive::Replace(first) => sort.first = first,
                Directive::Extend(first) => sort.first.extend(first),
            }
            if let Some(tables) = user.sort_tables {
                sort.tables = tables;
            }
            if let Some(table_keys) = user.sort_table_keys {
                sort.table_keys = table_keys;
            }
            if let Some(inline_tables) = user.sort_inline_tables {
                sort.inline_tables = inline_tables;
            }
            if let Some(inline_arrays) = user.sort_inline_arrays {
                sort.inline_arrays = inline_arrays;
            }
            if let Some(ignore_case) = user.ignore_case {
                sort.ignore_case = ignore_case;
            }

            match user.overrides_directive()? {
                Directive::Inherit => {}
                Directive::Replace(map) => overrides = map,
                Directive::Extend(map) => overrides.extend(map),
            }

            if let Some(header) = user.comments_header {
                comments.header = header;
            }
            if let Some(footer) = user.comments_footer {
                comments.footer = footer;
            }
            if let Some(inline) = user.comments_inline {
                comments.inline = inline;
            }
            if let Some(block) = user.comments_block {
                comments.block = block;
            }

            if let Some(spaces) = user.spaces_before_inline_comment {
                formatting.spaces_before_inline_comment = spaces;
            }
            if let Some(spaces) = user.spaces_indent_inline_array {
                formatting.spaces_indent_inline_array = spaces;
            }
            if let Some(comma) = user.trailing_comma_inline_array {
                formatting.trailing_comma_inline_array = comma;
            }

            match user.style_directive()? {
                Directive::Inherit => {}
                Directive::Replace(options) => style_options = options,
                Directive::Extend(options) => style_options.extend(options),
            }
        }

        validate_first(&sort.first)?;
        for entry in overrides.values() {
            if let Some(first) = &entry.first {
                validate_first(first)?;
            }
        }
        let overrides = OverrideMap::compile(overrides)?;

        Ok(Self {
            sort,
            overrides,
            comments,
            formatting,
            style_options,
        })
    }
}

fn validate_first(first: &[String]) -> Result<(), ConfigError> {
    let mut seen = BTreeSet::new();
    let mut wildcards = 0;
    for entry in first {
        if entry == "*" {
            wildcards += 1;
            if wildcards > 1 {
                return Err(ConfigError::MultipleWildcards);
            }
        }
        if !seen.insert(entry.as_str()) {
            return Err(ConfigError::DuplicateFirst(entry.clone()));
        }
    }
    Ok(())
}
