//! Table path patterns and override lookup
//!
//! Patterns are dot-separated literal segments with an optional trailing
//! `*`. Matching works on precompiled segment sequences, never on the raw
//! dotted string, so `tool.ab` cannot accidentally match a `tool.a`
//! prefix. Lookup picks the most specific applicable pattern: an exact
//! match beats any wildcard, a longer literal prefix beats a shorter one.

use std::collections::BTreeMap;

use crate::config::{ConfigError, SortOverride};

/// A compiled table path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<String>,
    wildcard: bool,
}

impl PathPattern {
    /// Compile a dotted pattern string.
    pub fn parse(pattern: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };
        if pattern.is_empty() {
            return Err(invalid("pattern is empty"));
        }

        let raw: Vec<&str> = pattern.split('.').collect();
        let mut segments = Vec::with_capacity(raw.len());
        let mut wildcard = false;
        for (index, segment) in raw.iter().enumerate() {
            if segment.is_empty() {
                return Err(invalid("empty path segment"));
            }
            if *segment == "*" {
                if index + 1 != raw.len() {
                    return Err(invalid("\"*\" is only allowed as the final segment"));
                }
                wildcard = true;
            } else if segment.contains('*') {
                return Err(invalid("\"*\" must be a whole segment"));
            } else {
                segments.push(segment.to_string());
            }
        }

        Ok(Self { segments, wildcard })
    }

    /// Whether this pattern applies to `path`.
    ///
    /// Exact patterns match the path exactly; wildcard patterns match
    /// their literal prefix and any descendant of it.
    pub fn matches(&self, path: &[String]) -> bool {
        if self.wildcard {
            path.len() >= self.segments.len()
                && path[..self.segments.len()] == self.segments[..]
        } else {
            self.segments == path
        }
    }

    /// Ranking key: exact matches beat wildcards, longer literal prefixes
    /// beat shorter ones.
    fn specificity(&self) -> (bool, usize) {
        (!self.wildcard, self.segments.len())
    }
}

#[derive(Debug, Clone)]
struct Entry {
    pattern: String,
    compiled: PathPattern,
    config: SortOverride,
}

/// Precompiled pattern → override lookup table.
#[derive(Debug, Clone, Default)]
pub struct OverrideMap {
    entries: Vec<Entry>,
}

impl OverrideMap {
    /// Compile every pattern in the map; any malformed pattern fails the
    /// whole resolution.
    pub fn compile(map: BTreeMap<String, SortOverride>) -> Result<Self, ConfigError> {
        let mut entries = Vec::with_capacity(map.len());
        for (pattern, config) in map {
            let compiled = PathPattern::parse(&pattern)?;
            entries.push(Entry {
                pattern,
                compiled,
                config,
            });
        }
        Ok(Self { entries })
    }

    /// The most specific override applicable to `path`, if any.
    pub fn lookup(&self, path: &[String]) -> Option<&SortOverride> {
        self.entries
            .iter()
            .filter(|entry| entry.compiled.matches(path))
            .max_by_key(|entry| entry.compiled.specificity())
            .map(|entry| &entry.config)
    }

    /// Override registered under an exact pattern string.
    pub fn get(&self, pattern: &str) -> Option<&SortOverride> {
        self.entries
            .iter()
            .find(|entry| entry.pattern == pattern)
            .map(|entry| &entry.config)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
