//! Unified diff rendering for `--diff` output
//!
//! Line-oriented diff between the original and formatted text, printed in
//! the `a/<name>` / `b/<name>` unified format with three lines of context.
//! Coloring is the caller's choice (it is tied to whether stdout is a
//! terminal, which only the CLI knows).

use imara_diff::{Algorithm, Diff, Hunk, IndentHeuristic, IndentLevel, InternedInput, Token};

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

const CONTEXT: u32 = 3;

/// Render the unified diff between `before` and `after`. Empty when the
/// inputs are identical.
pub fn unified(before: &str, after: &str, name: &str, color: bool) -> String {
    let input = InternedInput::new(before, after);
    let mut diff = Diff::compute(Algorithm::Histogram, &input);
    diff.postprocess_with_heuristic(
        &input,
        IndentHeuristic::new(|token| {
            IndentLevel::for_ascii_line(input.interner[token].bytes(), 4)
        }),
    );

    let groups = group_hunks(diff.hunks());
    if groups.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    push_line(&mut out, &format!("--- a/{name}"), CYAN, color);
    push_line(&mut out, &format!("+++ b/{name}"), CYAN, color);

    let before_len = input.before.len() as u32;
    for group in &groups {
        let Some(first) = group.first() else { continue };
        let Some(last) = group.last() else { continue };

        let lead = first.before.start.min(CONTEXT);
        let trail = CONTEXT.min(before_len - last.before.end);
        let b_start = first.before.start - lead;
        let b_end = last.before.end + trail;
        let a_start = first.after.start - lead;
        let a_end = last.after.end + trail;

        push_line(
            &mut out,
            &format!(
                "@@ -{} +{} @@",
                range_marker(b_start, b_end),
                range_marker(a_start, a_end)
            ),
            CYAN,
            color,
        );

        let mut cursor = b_start;
        for hunk in group {
            for index in cursor..hunk.before.start {
                push_token(&mut out, " ", line(&input, &input.before, index), "", color);
            }
            for index in hunk.before.clone() {
                push_token(&mut out, "-", line(&input, &input.before, index), RED, color);
            }
            for index in hunk.after.clone() {
                push_token(&mut out, "+", line(&input, &input.after, index), GREEN, color);
            }
            cursor = hunk.before.end;
        }
        for index in cursor..b_end {
            push_token(&mut out, " ", line(&input, &input.before, index), "", color);
        }
    }
    out
}

/// Merge hunks whose context windows touch into display groups.
fn group_hunks(hunks: impl Iterator<Item = Hunk>) -> Vec<Vec<Hunk>> {
    let mut groups: Vec<Vec<Hunk>> = Vec::new();
    let mut current: Vec<Hunk> = Vec::new();
    for hunk in hunks {
        let split = current
            .last()
            .map(|previous| hunk.before.start.saturating_sub(previous.before.end) > 2 * CONTEXT)
            .unwrap_or(false);
        if split {
            groups.push(std::mem::take(&mut current));
        }
        current.push(hunk);
    }
    if !current.is_empty() {
        groups.push(current);
    }
    groups
}

fn range_marker(start: u32, end: u32) -> String {
    let count = end - start;
    if count == 0 {
        format!("{start},0")
    } else {
        format!("{},{}", start + 1, count)
    }
}

fn line<'a>(input: &'a InternedInput<&str>, side: &[Token], index: u32) -> &'a str {
    input.interner[side[index as usize]]
}

fn push_line(out: &mut String, text: &str, paint: &str, color: bool) {
    if color {
        out.push_str(paint);
        out.push_str(text);
        out.push_str(RESET);
    } else {
        out.push_str(text);
    }
    out.push('\n');
}

fn push_token(out: &mut String, prefix: &str, text: &str, paint: &str, color: bool) {
    let text = text.strip_suffix('\n').unwrap_or(text);
    if color && !paint.is_empty() {
        out.push_str(paint);
        out.push_str(prefix);
        out.push_str(text);
        out.push_str(RESET);
    } else {
        out.push_str(prefix);
        out.push_str(text);
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_inputs_render_nothing() {
        assert_eq!(unified("a = 1\n", "a = 1\n", "pyproject.toml", false), "");
    }

    #[test]
    fn test_change_renders_minus_and_plus() {
        let out = unified("a = 1\nb = 2\n", "a = 1\nb = 3\n", "pyproject.toml", false);
        assert!(out.starts_with("--- a/pyproject.toml\n+++ b/pyproject.toml\n"));
        assert!(out.contains("-b = 2\n"));
        assert!(out.contains("+b = 3\n"));
        assert!(out.contains(" a = 1\n"));
    }

    #[test]
    fn test_hunk_header_line_numbers() {
        let before = "1\n2\n3\n4\n5\n6\n7\n8\n9\n";
        let after = "1\n2\n3\n4\nx\n6\n7\n8\n9\n";
        let out = unified(before, after, "f", false);
        assert!(out.contains("@@ -2,7 +2,7 @@"), "got:\n{out}");
    }

    #[test]
    fn test_distant_changes_make_two_groups() {
        let before: String = (1..=30).map(|i| format!("line {i}\n")).collect();
        let after: String = (1..=30)
            .map(|i| match i {
                2 => "changed 2\n".to_string(),
                29 => "changed 29\n".to_string(),
                _ => format!("line {i}\n"),
            })
            .collect();
        let out = unified(&before, &after, "f", false);
        assert_eq!(out.matches("@@ -").count(), 2);
    }

    #[test]
    fn test_color_wraps_changed_lines() {
        let out = unified("a = 1\n", "a = 2\n", "f", true);
        assert!(out.contains(RED));
        assert!(out.contains(GREEN));
        assert!(out.contains(CYAN));
    }
}
