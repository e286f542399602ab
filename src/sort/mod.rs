//! Deterministic table and key ordering
//!
//! The sorter walks a parsed document top-down. At every table it resolves
//! the effective scope (overrides matched by path, unset fields inherited
//! from the parent's effective scope), computes the emission order of the
//! table's immediate keys and sub-tables, and recurses. Key/value order is
//! driven through the table's map order; section order through document
//! positions assigned depth-first.

mod arrays;
mod comments;
mod order;
mod path;
mod scope;

pub use path::{OverrideMap, PathPattern};
pub use scope::ScopeConfig;

use std::collections::HashMap;

use toml_edit::{DocumentMut, Item, Table, Value};

use crate::config::MergedConfig;

/// One-document sorter over a merged configuration.
pub struct Sorter<'a> {
    config: &'a MergedConfig,
    position: usize,
}

impl<'a> Sorter<'a> {
    pub fn new(config: &'a MergedConfig) -> Self {
        Self {
            config,
            position: 0,
        }
    }

    /// Reorder the document in place: comment retention first (anchors are
    /// still at their declared positions), then the recursive scope walk.
    /// The document header is held aside during the walk and reattached to
    /// whichever item ends up first.
    pub fn sort(mut self, doc: &mut DocumentMut) {
        let header = comments::apply(doc, &self.config.comments, &self.config.formatting);
        let root = ScopeConfig::root(&self.config.sort);
        let mut path = Vec::new();
        self.sort_table(doc.as_table_mut(), &mut path, &root);
        if let Some(header) = header {
            comments::reattach_header(doc, &header);
        }
    }

    fn effective_scope(&self, path: &[String], parent: &ScopeConfig) -> ScopeConfig {
        match self.config.overrides.lookup(path) {
            Some(overrides) => parent.apply(overrides),
            None => parent.clone(),
        }
    }

    fn sort_table(&mut self, table: &mut Table, path: &mut Vec<String>, parent: &ScopeConfig) {
        let scope = self.effective_scope(path, parent);

        // Partition immediate entries: value keys render in the table
        // body, table keys render as sections after it.
        let mut value_keys = Vec::new();
        let mut table_keys = Vec::new();
        for (key, item) in table.iter() {
            match item {
                Item::Table(_) | Item::ArrayOfTables(_) => table_keys.push(key.to_string()),
                _ => value_keys.push(key.to_string()),
            }
        }

        let ordered_values =
            order::order_category(&value_keys, scope.table_keys, &scope.first, scope.ignore_case);
        let ordered_tables =
            order::order_category(&table_keys, scope.tables, &scope.first, scope.ignore_case);

        let mut rank: HashMap<&str, usize> = HashMap::with_capacity(table.len());
        for (index, key) in ordered_values.iter().chain(ordered_tables.iter()).enumerate() {
            rank.insert(key.as_str(), index);
        }
        table.sort_values_by(|left, _, right, _| {
            let left = rank.get(left.get()).copied().unwrap_or(usize::MAX);
            let right = rank.get(right.get()).copied().unwrap_or(usize::MAX);
            left.cmp(&right)
        });

        for (key, item) in table.iter_mut() {
            if let Item::Value(value) = item {
                path.push(key.get().to_string());
                self.sort_value(value, path, &scope);
                path.pop();
            }
        }

        // Recurse in emitted order so depth-first position assignment
        // mirrors the final document layout.
        for key in ordered_tables {
            let Some(item) = table.get_mut(&key) else {
                continue;
            };
            path.push(key);
            match item {
                Item::Table(child) => {
                    if !child.is_implicit() && !child.is_dotted() {
                        child.set_position(self.position);
                        self.position += 1;
                    }
                    self.sort_table(child, path, &scope);
                }
                Item::ArrayOfTables(children) => {
                    for child in children.iter_mut() {
                        child.set_position(self.position);
                        self.position += 1;
                        self.sort_table(child, path, &scope);
                    }
                }
                _ => {}
            }
            path.pop();
        }
    }

    /// Values get their own scope resolution at `table_path + [key]`, so an
    /// override can target a single array without touching its table.
    fn sort_value(&self, value: &mut Value, path: &mut Vec<String>, parent: &ScopeConfig) {
        let scope = self.effective_scope(path, parent);
        match value {
            Value::Array(array) => {
                if scope.inline_arrays {
                    arrays::sort_values(array, scope.ignore_case);
                }
            }
            Value::InlineTable(inline) => {
                if scope.inline_tables {
                    let ignore_case = scope.ignore_case;
                    inline.sort_values_by(|left, _, right, _| {
                        sortable(left.get(), ignore_case).cmp(&sortable(right.get(), ignore_case))
                    });
                }
                for (key, element) in inline.iter_mut() {
                    path.push(key.get().to_string());
                    self.sort_value(element, path, &scope);
                    path.pop();
                }
            }
            _ => {}
        }
    }
}

fn sortable(key: &str, ignore_case: bool) -> String {
    if ignore_case {
        key.to_lowercase()
    } else {
        key.to_string()
    }
}
