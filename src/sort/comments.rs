//! Comment retention and inline-comment spacing
//!
//! Comments live in decor attached to keys, values, and table headers, so
//! they move with their anchor when the document is reordered. The
//! document header is the exception: it is parsed as the first item's
//! prefix, so it is detached before the walk and reattached to whichever
//! item ends up first. This module also strips the comment categories the
//! configuration disables and normalizes the gap between a value and its
//! inline comment.

use toml_edit::{Decor, DocumentMut, Item, RawString, Table, Value};

use crate::config::{CommentConfig, FormatConfig};

/// Strip disabled comment categories and pull the document header off the
/// first item. The returned header, if any, must be reattached with
/// [`reattach_header`] after reordering; `None` also means "nothing to
/// reattach" when header retention is off.
pub fn apply(
    doc: &mut DocumentMut,
    comments: &CommentConfig,
    formatting: &FormatConfig,
) -> Option<String> {
    if !comments.footer {
        doc.set_trailing("");
    }

    let header = detach_header(doc);

    let scrub = Scrub {
        block: !comments.block,
        inline: !comments.inline,
        gap: formatting.spaces_before_inline_comment,
    };
    scrub.table(doc.as_table_mut());

    if comments.header {
        header
    } else {
        None
    }
}

/// Prepend the detached header to the document's current first item.
pub fn reattach_header(doc: &mut DocumentMut, header: &str) {
    let _ = with_first_prefix(doc.as_table_mut(), |decor| {
        let rest = decor_text(decor.prefix());
        decor.set_prefix(format!("{header}{rest}"));
    });
}

fn detach_header(doc: &mut DocumentMut) -> Option<String> {
    with_first_prefix(doc.as_table_mut(), |decor| {
        let raw = decor_text(decor.prefix());
        split_header(&raw).map(|(header, rest)| {
            decor.set_prefix(rest);
            header
        })
    })
    .flatten()
}

fn with_first_prefix<T>(root: &mut Table, action: impl FnOnce(&mut Decor) -> T) -> Option<T> {
    let (mut key, item) = root.iter_mut().next()?;
    Some(match item {
        Item::Table(table) => action(table.decor_mut()),
        Item::ArrayOfTables(tables) => action(tables.iter_mut().next()?.decor_mut()),
        _ => action(key.leaf_decor_mut()),
    })
}

/// Split a decor prefix into (header, remainder). The header is the
/// leading run of blank and comment lines up to and including the first
/// blank line after a comment; with no such blank line the entire comment
/// run is the header. `None` when the prefix holds no comments.
fn split_header(raw: &str) -> Option<(String, String)> {
    if !raw.contains('#') {
        return None;
    }
    let mut end = 0;
    let mut offset = 0;
    let mut seen_comment = false;
    for line in raw.split_inclusive('\n') {
        offset += line.len();
        let trimmed = line.trim();
        if trimmed.is_empty() {
            end = offset;
            if seen_comment {
                break;
            }
        } else if trimmed.starts_with('#') {
            seen_comment = true;
            end = offset;
        } else {
            break;
        }
    }
    if !seen_comment {
        return None;
    }
    Some((raw[..end].to_string(), raw[end..].to_string()))
}

fn decor_text(raw: Option<&RawString>) -> String {
    raw.and_then(RawString::as_str).unwrap_or("").to_string()
}

struct Scrub {
    block: bool,
    inline: bool,
    gap: usize,
}

impl Scrub {
    fn table(&self, table: &mut Table) {
        for (mut key, item) in table.iter_mut() {
            match item {
                Item::Value(value) => {
                    if self.block {
                        key.leaf_decor_mut().set_prefix("");
                    }
                    self.value(value);
                }
                Item::Table(child) => {
                    if self.block {
                        child.decor_mut().set_prefix("");
                    }
                    self.header_suffix(child.decor_mut());
                    self.table(child);
                }
                Item::ArrayOfTables(children) => {
                    for child in children.iter_mut() {
                        if self.block {
                            child.decor_mut().set_prefix("");
                        }
                        self.header_suffix(child.decor_mut());
                        self.table(child);
                    }
                }
                Item::None => {}
            }
        }
    }

    fn value(&self, value: &mut Value) {
        match value {
            Value::Array(array) => {
                for element in array.iter_mut() {
                    self.value(element);
                }
            }
            Value::InlineTable(table) => {
                for (_, element) in table.iter_mut() {
                    self.value(element);
                }
            }
            _ => {}
        }
        if self.inline {
            value.decor_mut().set_suffix("");
        } else {
            normalize_inline_gap(value.decor_mut(), self.gap);
        }
    }

    fn header_suffix(&self, decor: &mut Decor) {
        if self.inline {
            decor.set_suffix("");
        } else {
            normalize_inline_gap(decor, self.gap);
        }
    }
}

/// Rewrite `value   # note` spacing to the configured gap. Suffixes that
/// are not a plain run of blanks before `#` are left alone.
fn normalize_inline_gap(decor: &mut Decor, gap: usize) {
    let Some(suffix) = decor.suffix().and_then(|raw| raw.as_str()) else {
        return;
    };
    let Some(hash) = suffix.find('#') else {
        return;
    };
    let head = &suffix[..hash];
    if !head.chars().all(|c| c == ' ' || c == '\t') {
        return;
    }
    let normalized = format!("{}{}", " ".repeat(gap), &suffix[hash..]);
    if normalized != suffix {
        decor.set_suffix(normalized);
    }
}
