//! JSON serialization helpers for the segment model.

/// Serialize a value to pretty-printed JSON.
///
/// Model types contain only maps, sequences, strings, and numbers, so
/// serialization cannot fail; an error would indicate a bug and is mapped
/// to an empty object rather than propagated.
pub fn to_pretty_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}
