//! Array value sorting
//!
//! Only scalar-valued arrays are eligible: arrays holding inline tables or
//! nested arrays keep their order, and arrays of tables never reach this
//! module. Comments stay anchored to the value they annotate: an inline
//! comment after `"value",` is parsed into the head of the *next*
//! element's prefix decor (or the array trailing), so it is peeled off and
//! reattached around the sorted order.

use toml_edit::{Array, RawString, Value};

fn is_scalar_array(array: &Array) -> bool {
    array
        .iter()
        .all(|value| !matches!(value, Value::Array(_) | Value::InlineTable(_)))
}

fn element_key(value: &Value, ignore_case: bool) -> String {
    let repr = match value {
        Value::String(formatted) => formatted.value().clone(),
        Value::Integer(formatted) => formatted.value().to_string(),
        Value::Float(formatted) => formatted.value().to_string(),
        Value::Boolean(formatted) => formatted.value().to_string(),
        Value::Datetime(formatted) => formatted.value().to_string(),
        Value::Array(_) | Value::InlineTable(_) => String::new(),
    };
    if ignore_case {
        repr.to_lowercase()
    } else {
        repr
    }
}

fn decor_text(raw: Option<&RawString>) -> String {
    raw.and_then(RawString::as_str).unwrap_or("").to_string()
}

/// Split a leading same-line comment (`  # note`) off a decor string,
/// returning the comment and the remainder starting at the newline.
fn split_tail_comment(raw: &str) -> Option<(String, String)> {
    let line_end = raw.find('\n').unwrap_or(raw.len());
    let head = &raw[..line_end];
    if head.trim_start_matches([' ', '\t']).starts_with('#') {
        Some((head.to_string(), raw[line_end..].to_string()))
    } else {
        None
    }
}

/// Sort a scalar array's values in place, lexicographically on their
/// string representation. Equal values keep their relative order.
pub fn sort_values(array: &mut Array, ignore_case: bool) {
    if array.len() < 2 || !is_scalar_array(array) {
        return;
    }

    let mut values: Vec<Value> = array.iter().cloned().collect();
    let count = values.len();
    let mut tails: Vec<Option<String>> = vec![None; count];

    for index in 1..count {
        let prefix = decor_text(values[index].decor().prefix());
        if let Some((comment, rest)) = split_tail_comment(&prefix) {
            tails[index - 1] = Some(comment);
            values[index].decor_mut().set_prefix(rest);
        }
    }
    let mut trailing = decor_text(Some(array.trailing()));
    if let Some((comment, rest)) = split_tail_comment(&trailing) {
        tails[count - 1] = Some(comment);
        trailing = rest;
    }

    let mut elements: Vec<(Value, Option<String>)> = values.into_iter().zip(tails).collect();
    elements.sort_by_key(|(value, _)| element_key(value, ignore_case));

    // Single-line spacing is positional, not tied to the value that moved
    // here; multiline prefixes (indentation, block comments) travel as-is.
    for (index, (value, _)) in elements.iter_mut().enumerate() {
        let prefix = decor_text(value.decor().prefix());
        if !prefix.contains('\n') && !prefix.contains('#') {
            value.decor_mut().set_prefix(if index == 0 { "" } else { " " });
        }
    }

    for index in 1..count {
        if let Some(comment) = elements[index - 1].1.clone() {
            let prefix = decor_text(elements[index].0.decor().prefix());
            elements[index]
                .0
                .decor_mut()
                .set_prefix(format!("{comment}{prefix}"));
        }
    }
    if let Some(comment) = &elements[count - 1].1 {
        trailing = format!("{comment}{trailing}");
    }

    array.clear();
    for (value, _) in elements {
        array.push_formatted(value);
    }
    array.set_trailing(trailing);
}
