//! Semantic comparison of IAM policy documents.
//!
//! SeaweedFS hands back policy documents reformatted: keys reordered,
//! whitespace changed. Comparing the raw text would report drift on every
//! refresh, so documents are compared by their parsed JSON value instead.

use serde_json::Value;

/// Parses `raw` and re-serializes it compactly with object keys sorted.
///
/// Every number is rewritten as a 64-bit float, so `3600` and `3600.0`
/// normalize to the same text.
pub fn normalize_json(raw: &str) -> Result<String, serde_json::Error> {
    let mut value: Value = serde_json::from_str(raw)?;
    numbers_as_f64(&mut value);
    serde_json::to_string(&value)
}

fn numbers_as_f64(value: &mut Value) {
    match value {
        Value::Number(n) => {
            if let Some(f) = n.as_f64() {
                *value = Value::from(f);
            }
        },
        Value::Array(items) => items.iter_mut().for_each(numbers_as_f64),
        Value::Object(map) => map.values_mut().for_each(numbers_as_f64),
        _ => {},
    }
}

/// Returns `true` if two policy documents are equal as JSON values.
///
/// When either side fails to parse, falls back to comparing the trimmed
/// strings. Never fails.
///
/// ```rust
/// use seaweedfs_provider::policies_semantically_equal;
///
/// assert!(policies_semantically_equal(
///     r#"{"Version":"2012-10-17","Statement":[]}"#,
///     "{\n  \"Statement\": [],\n  \"Version\": \"2012-10-17\"\n}",
/// ));
/// assert!(policies_semantically_equal("  x  ", "x"));
/// ```
pub fn policies_semantically_equal(a: &str, b: &str) -> bool {
    match (normalize_json(a), normalize_json(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a.trim() == b.trim(),
    }
}
