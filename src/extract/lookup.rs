use serde_json::Value;
use std::borrow::Cow;

/// Follow `path` through nested objects.
///
/// Returns None as soon as a key is missing, a value along the way is not an
/// object, or the final value is null.
pub fn lookup<'a>(record: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(record, |value, key| value.as_object()?.get(*key))
        .filter(|value| !value.is_null())
}

/// Like [`lookup`], rendered as a scalar string.
pub fn lookup_str<'a>(record: &'a Value, path: &[&str]) -> Option<Cow<'a, str>> {
    lookup(record, path).map(scalar_to_string)
}

/// Render a JSON value the way it is shown to the host: strings verbatim,
/// everything else as compact JSON.
pub fn scalar_to_string(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}
