//! Lenient serde adapters for JSON written by other systems: the search
//! index, language model replies, and request bodies built from earlier
//! responses. Nulls and mistyped scalars decode to empty values instead of
//! failing the whole document.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Strings as-is, null as empty, anything else as its JSON text.
pub fn string_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// A list, or a single scalar treated as a one-item list. Blank entries drop.
pub fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        scalar => vec![scalar],
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) if !s.trim().is_empty() => Some(s),
            Value::String(_) | Value::Null => None,
            other => Some(other.to_string()),
        })
        .collect())
}

pub fn values_or_empty<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        scalar => vec![scalar],
    })
}

pub fn years_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let years = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(if years.is_finite() { years.max(0.0) } else { 0.0 })
}

/// Null, a list, or one comma-separated string ("Spark, SQL"). Entries are
/// trimmed and blanks dropped.
pub fn skills_from_any<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        Value::String(s) => s.split(',').map(|part| Value::String(part.to_string())).collect(),
        scalar => vec![scalar],
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect())
}

pub fn text_from_any<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        // A list of degrees or titles collapses to the first usable entry.
        Value::Array(items) => items.into_iter().find_map(|item| match item {
            Value::String(s) if !s.trim().is_empty() => Some(s),
            _ => None,
        }),
        _ => None,
    })
}

/// First non-negative number in a number or string ("5+", "3-5 years", "82.5").
pub fn number_from_any<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s
            .trim()
            .split(|c: char| !c.is_ascii_digit() && c != '.')
            .find(|part| !part.is_empty())
            .and_then(|part| part.parse().ok()),
        _ => None,
    }
    .filter(|n: &f64| n.is_finite() && *n >= 0.0))
}
