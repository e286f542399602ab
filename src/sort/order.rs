//! Key ordering within one table scope
//!
//! The same policy is applied to two independent categories: value keys
//! (the table body) and sub-table keys (the sections that follow). A
//! category whose sort flag is off keeps its declaration order and the
//! `first` list is inert for it.

/// Compute the emission order for one category of keys.
///
/// `keys` is the category's declaration order. When `enabled`, keys listed
/// in `first` come first in list order (absent entries are skipped; the
/// list states a preference, not a requirement); everything else is
/// alphabetized and inserted at the `"*"` placeholder, or appended when
/// the list has none.
pub fn order_category(
    keys: &[String],
    enabled: bool,
    first: &[String],
    ignore_case: bool,
) -> Vec<String> {
    if !enabled {
        return keys.to_vec();
    }

    let mut rest: Vec<String> = keys
        .iter()
        .filter(|key| !first.contains(key))
        .cloned()
        .collect();
    rest.sort_by_key(|key| sort_key(key, ignore_case));

    let mut ordered = Vec::with_capacity(keys.len());
    let mut rest_placed = false;
    for entry in first {
        if entry == "*" {
            if !rest_placed {
                ordered.append(&mut rest);
                rest_placed = true;
            }
        } else if keys.contains(entry) {
            ordered.push(entry.clone());
        }
    }
    if !rest_placed {
        ordered.append(&mut rest);
    }
    ordered
}

fn sort_key(key: &str, ignore_case: bool) -> String {
    if ignore_case {
        key.to_lowercase()
    } else {
        key.to_string()
    }
}
