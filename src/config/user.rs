//! User configuration from `[tool.pypfmt]`
//!
//! The override document lives in a known section of the input itself, not
//! in a separate file. Plain keys replace the corresponding default,
//! `extend-*` keys append to it. Nothing a user writes is silently
//! dropped: unknown keys and contradictory key pairs are configuration
//! errors.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::defaults::SortOverride;

/// Name of the configuration section under `[tool]`.
pub const CONFIG_SECTION: &str = "pypfmt";

/// Section whose presence alongside ours signals a tooling conflict.
pub const CONFLICT_SECTION: &str = "tomlsort";

/// Error types for configuration loading and merging
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid [tool.pypfmt] section: {0}")]
    Shape(#[from] toml::de::Error),

    #[error("'{replace}' and '{extend}' cannot both be set")]
    ReplaceExtendConflict {
        replace: &'static str,
        extend: &'static str,
    },

    #[error("invalid table path pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("duplicate 'first' entry '{0}'")]
    DuplicateFirst(String),

    #[error("'first' may contain at most one \"*\" placeholder")]
    MultipleWildcards,
}

/// A replace-vs-extend decision for one configurable collection.
///
/// Modeled as an explicit three-way value so the resolver is exhaustive:
/// absent keys inherit, a plain key replaces, an `extend-` key appends.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive<C> {
    Inherit,
    Replace(C),
    Extend(C),
}

fn directive<C>(
    replace: Option<C>,
    extend: Option<C>,
    names: (&'static str, &'static str),
) -> Result<Directive<C>, ConfigError> {
    match (replace, extend) {
        (Some(_), Some(_)) => Err(ConfigError::ReplaceExtendConflict {
            replace: names.0,
            extend: names.1,
        }),
        (Some(value), None) => Ok(Directive::Replace(value)),
        (None, Some(value)) => Ok(Directive::Extend(value)),
        (None, None) => Ok(Directive::Inherit),
    }
}

/// Typed image of the `[tool.pypfmt]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct UserConfig {
    pub sort_first: Option<Vec<String>>,
    pub extend_sort_first: Option<Vec<String>>,
    pub sort_tables: Option<bool>,
    pub sort_table_keys: Option<bool>,
    pub sort_inline_tables: Option<bool>,
    pub sort_inline_arrays: Option<bool>,
    pub ignore_case: Option<bool>,

    pub overrides: Option<BTreeMap<String, SortOverride>>,
    pub extend_overrides: Option<BTreeMap<String, SortOverride>>,

    pub comments_header: Option<bool>,
    pub comments_footer: Option<bool>,
    pub comments_inline: Option<bool>,
    pub comments_block: Option<bool>,

    pub spaces_before_inline_comment: Option<usize>,
    pub spaces_indent_inline_array: Option<usize>,
    pub trailing_comma_inline_array: Option<bool>,

    pub taplo_options: Option<Vec<String>>,
    pub extend_taplo_options: Option<Vec<String>>,
}

impl UserConfig {
    /// Replace/extend decision for the `first` list.
    pub fn first_directive(&self) -> Result<Directive<Vec<String>>, ConfigError> {
        directive(
            self.sort_first.clone(),
            self.extend_sort_first.clone(),
            ("sort-first", "extend-sort-first"),
        )
    }

    /// Replace/extend decision for the per-table override map.
    pub fn overrides_directive(
        &self,
    ) -> Result<Directive<BTreeMap<String, SortOverride>>, ConfigError> {
        directive(
            self.overrides.clone(),
            self.extend_overrides.clone(),
            ("overrides", "extend-overrides"),
        )
    }

    /// Replace/extend decision for the styling option list.
    pub fn style_directive(&self) -> Result<Directive<Vec<String>>, ConfigError> {
        directive(
            self.taplo_options.clone(),
            self.extend_taplo_options.clone(),
            ("taplo-options", "extend-taplo-options"),
        )
    }
}

/// Extract `[tool.pypfmt]` from TOML text.
///
/// Returns `Ok(None)` when the section is absent or when the text is not
/// valid TOML at all; the pipeline's own validation stage reports the
/// parse error with position information. A present section with the
/// wrong shape is a [`ConfigError`].
pub fn load_user_config(text: &str) -> Result<Option<UserConfig>, ConfigError> {
    let Ok(document) = toml::from_str::<toml::Table>(text) else {
        return Ok(None);
    };
    let section = document
        .get("tool")
        .and_then(toml::Value::as_table)
        .and_then(|tool| tool.get(CONFIG_SECTION))
        .cloned();
    match section {
        Some(value) => Ok(Some(value.try_into()?)),
        None => Ok(None),
    }
}

/// True when `[tool.tomlsort]` and `[tool.pypfmt]` are both present.
///
/// Pure query; whether and how to warn is the caller's concern.
pub fn has_conflicting_sections(text: &str) -> bool {
    let Ok(document) = toml::from_str::<toml::Table>(text) else {
        return false;
    };
    document
        .get("tool")
        .and_then(toml::Value::as_table)
        .is_some_and(|tool| {
            tool.contains_key(CONFIG_SECTION) && tool.contains_key(CONFLICT_SECTION)
        })
}
