//! Effective per-table configuration scopes
//!
//! Override resolution is scope-inherited, not flat: a field left unset in
//! a matched override inherits the *parent's* effective value, not the
//! global default. Scopes are immutable snapshots handed down the
//! recursive walk, so each table's effective policy is independently
//! inspectable.

use crate::config::{SortConfig, SortOverride};

/// The effective sort configuration for one table scope.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeConfig {
    pub tables: bool,
    pub table_keys: bool,
    pub inline_tables: bool,
    pub inline_arrays: bool,
    pub ignore_case: bool,
    pub first: Vec<String>,
}

impl ScopeConfig {
    /// Root scope: the global configuration verbatim.
    pub fn root(global: &SortConfig) -> Self {
        Self {
            tables: global.tables,
            table_keys: global.table_keys,
            inline_tables: global.inline_tables,
            inline_arrays: global.inline_arrays,
            ignore_case: global.ignore_case,
            first: global.first.clone(),
        }
    }

    /// A child scope with an override's set fields applied on top of this
    /// one.
    pub fn apply(&self, overrides: &SortOverride) -> Self {
        Self {
            tables: overrides.tables.unwrap_or(self.tables),
            table_keys: overrides.table_keys.unwrap_or(self.table_keys),
            inline_tables: overrides.inline_tables.unwrap_or(self.inline_tables),
            inline_arrays: overrides.inline_arrays.unwrap_or(self.inline_arrays),
            ignore_case: overrides.ignore_case.unwrap_or(self.ignore_case),
            first: overrides
                .first
                .clone()
                .unwrap_or_else(|| self.first.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_copies_global() {
        let global = SortConfig::default();
        let scope = ScopeConfig::root(&global);
        assert_eq!(scope.tables, global.tables);
        assert_eq!(scope.table_keys, global.table_keys);
        assert_eq!(scope.first, global.first);
    }

    #[test]
    fn test_apply_set_fields_only() {
        let scope = ScopeConfig::root(&SortConfig::default());
        let child = scope.apply(&SortOverride {
            table_keys: Some(true),
            first: Some(vec!["name".to_string()]),
            ..SortOverride::default()
        });
        assert!(child.table_keys);
        assert_eq!(child.first, ["name"]);
        // unset fields inherit
        assert_eq!(child.tables, scope.tables);
        assert_eq!(child.inline_arrays, scope.inline_arrays);
    }

    #[test]
    fn test_apply_inherits_parent_effective_not_global() {
        let root = ScopeConfig::root(&SortConfig::default());
        let parent = root.apply(&SortOverride {
            inline_arrays: Some(true),
            ..SortOverride::default()
        });
        let child = parent.apply(&SortOverride::default());
        assert!(child.inline_arrays);
    }
}
