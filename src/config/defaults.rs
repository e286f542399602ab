//! Built-in sort and format defaults
//!
//! Hardcoded defaults for every configuration value. User overrides from
//! `[tool.pypfmt]` are layered on top by the merge module.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Global sort configuration.
///
/// `inline_arrays` here controls whether array *values* are alphabetized;
/// rendering (expanded vs collapsed) belongs to the styling options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortConfig {
    /// Sort sub-tables within their parent table
    pub tables: bool,

    /// Sort keys within a table
    pub table_keys: bool,

    /// Sort keys within inline tables
    pub inline_tables: bool,

    /// Sort array values alphabetically
    pub inline_arrays: bool,

    /// Compare keys and array values case-insensitively
    pub ignore_case: bool,

    /// Priority key order; a single `"*"` entry marks where unlisted
    /// keys are inserted
    pub first: Vec<String>,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            tables: true,
            table_keys: false,
            inline_tables: false,
            inline_arrays: false,
            ignore_case: false,
            first: vec![
                "build-system".to_string(),
                "project".to_string(),
                "dependency-groups".to_string(),
            ],
        }
    }
}

/// Per-table-pattern sort override.
///
/// Every field is optional: `None` means "inherit from the enclosing
/// scope's effective configuration", not "use the global default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SortOverride {
    pub tables: Option<bool>,
    pub table_keys: Option<bool>,
    pub inline_tables: Option<bool>,
    pub inline_arrays: Option<bool>,
    pub ignore_case: Option<bool>,
    pub first: Option<Vec<String>>,
}

/// Comment retention configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentConfig {
    /// Keep the comment block at the top of the document
    pub header: bool,

    /// Keep trailing trivia after the last item
    pub footer: bool,

    /// Keep inline comments after values
    pub inline: bool,

    /// Keep comment blocks anchored above keys and table headers
    pub block: bool,
}

impl Default for CommentConfig {
    fn default() -> Self {
        Self {
            header: true,
            footer: true,
            inline: true,
            block: true,
        }
    }
}

/// Style knobs consumed by the styling collaborator, not by ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatConfig {
    /// Spaces between a value and its inline comment
    pub spaces_before_inline_comment: usize,

    /// Indent width inside multiline arrays (taplo `indent_string`)
    pub spaces_indent_inline_array: usize,

    /// Trailing comma in multiline arrays (taplo `array_trailing_comma`)
    pub trailing_comma_inline_array: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            spaces_before_inline_comment: 2,
            spaces_indent_inline_array: 4,
            trailing_comma_inline_array: true,
        }
    }
}

/// taplo `-o key=value` pairs always passed to the styling collaborator.
///
/// `indent_string` and `array_trailing_comma` are not listed here; they are
/// derived from [`FormatConfig`] when the command line is built.
pub const STYLE_OPTIONS: &[&str] = &[
    "reorder_keys=false",
    "array_auto_collapse=false",
    "array_auto_expand=true",
    "align_comments=true",
    "column_width=80",
    "allowed_blank_lines=2",
];

fn first_override(first: &[&str]) -> SortOverride {
    SortOverride {
        first: Some(first.iter().map(|s| s.to_string()).collect()),
        ..SortOverride::default()
    }
}

fn sorted_arrays_override() -> SortOverride {
    SortOverride {
        inline_arrays: Some(true),
        ..SortOverride::default()
    }
}

/// Built-in per-table sort overrides.
///
/// The global defaults preserve declaration order (`table_keys=false`,
/// `inline_arrays=false`); overrides selectively enable sorting where the
/// normalized layout wants it. The `first` list on a parent override
/// controls the ordering of its sub-tables.
pub fn default_overrides() -> BTreeMap<String, SortOverride> {
    let mut overrides = BTreeMap::new();

    // Tables whose keys follow a first list (table_keys must be switched
    // on for the first list to take effect under the global default).
    overrides.insert(
        "build-system".to_string(),
        SortOverride {
            table_keys: Some(true),
            ..first_override(&["requires", "build-backend"])
        },
    );
    overrides.insert(
        "project".to_string(),
        SortOverride {
            table_keys: Some(true),
            ..first_override(&[
                "name",
                "dynamic",
                "description",
                "readme",
                "authors",
                "maintainers",
                "license",
                "classifiers",
                "keywords",
                "requires-python",
                "dependencies",
                "*",
            ])
        },
    );

    // Tool sub-table ordering; unlisted tools land at the "*" slot,
    // tomlsort stays last.
    overrides.insert(
        "tool".to_string(),
        first_override(&[
            "git-cliff",
            "pypis_delivery_service",
            "ty",
            "uv",
            "ruff",
            "mypy",
            "pyright",
            "basedpyright",
            "pylint",
            "isort",
            "black",
            "pytest",
            "coverage",
            "semantic_release",
            "hatch",
            "*",
            "tomlsort",
        ]),
    );
    overrides.insert(
        "tool.ruff.lint".to_string(),
        first_override(&["per-file-ignores", "pycodestyle", "pydocstyle", "mccabe"]),
    );
    overrides.insert("tool.coverage".to_string(), first_override(&["run", "report"]));
    overrides.insert("tool.hatch".to_string(), first_override(&["version", "build"]));

    // Arrays sorted alphabetically.
    overrides.insert("project.classifiers".to_string(), sorted_arrays_override());
    overrides.insert(
        "tool.ruff.lint.extend-select".to_string(),
        sorted_arrays_override(),
    );
    overrides.insert("tool.ruff.lint.ignore".to_string(), sorted_arrays_override());
    overrides.insert("dependency-groups.*".to_string(), sorted_arrays_override());

    // The tomlsort section is preserved as-is.
    overrides.insert(
        "tool.tomlsort".to_string(),
        SortOverride {
            table_keys: Some(false),
            inline_arrays: Some(false),
            first: Some(vec!["*".to_string()]),
            ..SortOverride::default()
        },
    );
    overrides.insert(
        "tool.tomlsort.*".to_string(),
        SortOverride {
            table_keys: Some(false),
            inline_arrays: Some(false),
            ..SortOverride::default()
        },
    );

    overrides
}
