//! Reorder-stage behavior
//!
//! Exercises the ordering engine end-to-end through `Pipeline::reorder`,
//! which is deterministic and needs no external binary: section and key
//! ordering, array sorting, override specificity, comment survival, and
//! the no-data-loss guarantee.

use std::collections::BTreeMap;

use pypfmt::config::{load_user_config, MergedConfig};
use pypfmt::Pipeline;

const SAMPLE: &str = r#"# sample project
# managed by pypfmt

[tool.mypy]
strict = true
warn_unused_ignores = true

[tool.tomlsort]
zebra = true
all = false

[tool.ruff]
line-length = 100

[tool.ruff.lint]
mccabe = { max-complexity = 10 }
ignore = ["E501", "D203"]
extend-select = ["UP", "B", "A"]

[dependency-groups]
dev = [
    "pytest",  # runner
    "mypy",
]

[project]
requires-python = ">=3.11"
dependencies = ["b-lib", "a-lib"]
name = "sample"
classifiers = [
    "Programming Language :: Python :: 3.12",
    "Programming Language :: Python :: 3.11",
]
description = "a sample"

[build-system]
build-backend = "hatchling.build"
requires = ["hatchling"]
"#;

fn reorder(text: &str) -> String {
    Pipeline::with_defaults().unwrap().reorder(text).unwrap()
}

fn reorder_with(text: &str, config_toml: &str) -> String {
    let user = load_user_config(config_toml).unwrap().unwrap();
    let merged = MergedConfig::resolve(Some(&user)).unwrap();
    Pipeline::new(merged).reorder(text).unwrap()
}

fn section_order(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.starts_with('['))
        .collect()
}

// -- ordering conformance ----------------------------------------------------

#[test]
fn test_root_sections_ordered_by_first_list() {
    let out = reorder(SAMPLE);
    let sections = section_order(&out);
    assert_eq!(sections[0], "[build-system]");
    assert_eq!(sections[1], "[project]");
    assert_eq!(sections[2], "[dependency-groups]");
}

#[test]
fn test_tool_subtables_ordered_tomlsort_last() {
    let out = reorder(SAMPLE);
    let sections = section_order(&out);
    let tools: Vec<&&str> = sections
        .iter()
        .filter(|s| s.starts_with("[tool."))
        .collect();
    assert_eq!(
        tools,
        [
            &"[tool.ruff]",
            &"[tool.ruff.lint]",
            &"[tool.mypy]",
            &"[tool.tomlsort]"
        ]
    );
}

#[test]
fn test_project_keys_follow_first_list() {
    let out = reorder(SAMPLE);
    let name = out.find("name = \"sample\"").unwrap();
    let description = out.find("description = ").unwrap();
    let classifiers = out.find("classifiers = ").unwrap();
    let requires_python = out.find("requires-python = ").unwrap();
    let dependencies = out.find("\ndependencies = ").unwrap();
    assert!(name < description);
    assert!(description < classifiers);
    assert!(classifiers < requires_python);
    assert!(requires_python < dependencies);
}

#[test]
fn test_first_list_with_star_orders_remainder_alphabetically() {
    let out = reorder_with(
        "[thing]\nc = 1\na = 2\nd = 3\nb = 4\n",
        "[tool.pypfmt.overrides.thing]\ntable_keys = true\nfirst = [\"a\", \"b\", \"*\"]\n",
    );
    let body: Vec<&str> = out
        .lines()
        .filter(|line| line.contains('='))
        .map(|line| line.split('=').next().unwrap().trim())
        .collect();
    assert_eq!(body, ["a", "b", "c", "d"]);
}

// -- array sorting -----------------------------------------------------------

#[test]
fn test_classifiers_sorted_alphabetically() {
    let out = reorder(SAMPLE);
    let py311 = out.find("Python :: 3.11").unwrap();
    let py312 = out.find("Python :: 3.12").unwrap();
    assert!(py311 < py312);
}

#[test]
fn test_ruff_lint_arrays_sorted() {
    let out = reorder(SAMPLE);
    assert!(out.contains("ignore = [\"D203\", \"E501\"]"));
    assert!(out.contains("extend-select = [\"A\", \"B\", \"UP\"]"));
}

#[test]
fn test_dependency_group_values_sorted_comment_attached() {
    let out = reorder(SAMPLE);
    assert!(out.find("\"mypy\"").unwrap() < out.find("\"pytest\"").unwrap());
    let pytest_line = out
        .lines()
        .find(|line| line.contains("\"pytest\""))
        .unwrap();
    assert!(pytest_line.contains("# runner"), "got {pytest_line}");
}

#[test]
fn test_project_dependencies_not_sorted() {
    let out = reorder(SAMPLE);
    assert!(out.contains("dependencies = [\"b-lib\", \"a-lib\"]"));
}

#[test]
fn test_tomlsort_section_preserved_verbatim() {
    let out = reorder(SAMPLE);
    assert!(out.contains("zebra = true\nall = false"));
}

// -- override specificity and inheritance ------------------------------------

#[test]
fn test_exact_override_beats_parent_wildcard_inheritance() {
    let config = r#"
[tool.pypfmt.overrides.tool]
table_keys = true

[tool.pypfmt.overrides."tool.ruff"]
table_keys = false
"#;
    let input = "[tool.ruff]\nzeta = 1\nalpha = 2\n\n[tool.mypy]\nzeta = 1\nalpha = 2\n";
    let out = reorder_with(input, config);
    // tool.ruff resolves its own override: declaration order kept
    assert!(out.contains("[tool.ruff]\nzeta = 1\nalpha = 2\n"));
    // tool.mypy has no override of its own and inherits table_keys = true
    // from tool's effective configuration
    assert!(out.contains("[tool.mypy]\nalpha = 2\nzeta = 1\n"));
}

#[test]
fn test_wildcard_matches_descendants_by_segment() {
    let config = r#"
[tool.pypfmt.overrides."tool.a.*"]
inline_arrays = true
"#;
    let input = "[tool.a.x]\nitems = [\"b\", \"a\"]\n\n[tool.ab]\nitems = [\"b\", \"a\"]\n";
    let out = reorder_with(input, config);
    assert!(out.contains("[tool.a.x]\nitems = [\"a\", \"b\"]\n"));
    // `tool.ab` is not a child of `tool.a`
    assert!(out.contains("[tool.ab]\nitems = [\"b\", \"a\"]\n"));
}

#[test]
fn test_user_first_list_changes_root_order() {
    let input = "[project]\nname = \"x\"\n\n[build-system]\nrequires = [\"hatchling\"]\n";
    let default_out = reorder(input);
    assert!(default_out.find("[build-system]").unwrap() < default_out.find("[project]").unwrap());

    let custom = reorder_with(
        input,
        "[tool.pypfmt]\nsort-first = [\"project\", \"build-system\"]\n",
    );
    assert!(custom.find("[project]").unwrap() < custom.find("[build-system]").unwrap());
}

// -- comment survival --------------------------------------------------------

#[test]
fn test_every_comment_survives() {
    let out = reorder(SAMPLE);
    for comment in ["# sample project", "# managed by pypfmt", "# runner"] {
        assert!(out.contains(comment), "lost comment {comment}");
    }
}

#[test]
fn test_comment_positions_stable_on_rerun() {
    let once = reorder(SAMPLE);
    let twice = reorder(&once);
    let positions = |text: &str| -> Vec<usize> {
        text.lines()
            .enumerate()
            .filter(|(_, line)| line.contains('#'))
            .map(|(index, _)| index)
            .collect()
    };
    assert_eq!(positions(&once), positions(&twice));
}

#[test]
fn test_header_stays_on_top() {
    let out = reorder(SAMPLE);
    assert!(out.starts_with("# sample project\n# managed by pypfmt\n"));
}

// -- idempotence and data preservation ---------------------------------------

#[test]
fn test_reorder_idempotent() {
    let once = reorder(SAMPLE);
    let twice = reorder(&once);
    assert_eq!(once, twice);
}

fn flatten(prefix: &str, value: &toml::Value, into: &mut BTreeMap<String, String>) {
    match value {
        toml::Value::Table(table) => {
            for (key, child) in table {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, child, into);
            }
        }
        toml::Value::Array(items) if items.iter().any(|item| item.as_table().is_some()) => {
            for (index, child) in items.iter().enumerate() {
                flatten(&format!("{prefix}[{index}]"), child, into);
            }
        }
        toml::Value::Array(items) => {
            // scopes may reorder array values; compare as a multiset
            let mut rendered: Vec<String> = items.iter().map(|v| v.to_string()).collect();
            rendered.sort();
            into.insert(prefix.to_string(), rendered.join(","));
        }
        other => {
            into.insert(prefix.to_string(), other.to_string());
        }
    }
}

#[test]
fn test_no_data_loss() {
    let out = reorder(SAMPLE);
    let before: toml::Value = toml::from_str(SAMPLE).unwrap();
    let after: toml::Value = toml::from_str(&out).unwrap();

    let mut before_flat = BTreeMap::new();
    let mut after_flat = BTreeMap::new();
    flatten("", &before, &mut before_flat);
    flatten("", &after, &mut after_flat);
    assert_eq!(before_flat, after_flat);
}

#[test]
fn test_arrays_of_tables_keep_order() {
    let input = "[[run]]\nname = \"second\"\n\n[[run]]\nname = \"first\"\n";
    let out = reorder(input);
    assert!(out.find("\"second\"").unwrap() < out.find("\"first\"").unwrap());
}
