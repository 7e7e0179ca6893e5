use crate::extract::fields::FieldId;
use crate::extract::lookup::{lookup, lookup_str};
use serde_json::Value;

const AWS_DOMAIN_SUFFIX: &str = ".amazonaws.com";

/// Shown for a top-level field that is not in the record
pub const MISSING: &str = "<missing>";

/// Returned for a field id this source does not know
pub const NOT_AVAILABLE: &str = "<NA>";

pub const UNKNOWN_USER_TYPE: &str = "<unknown user type>";

/// Result of a field lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    Value(String),
    Absent,
}

impl Extracted {
    pub fn is_absent(&self) -> bool {
        matches!(self, Extracted::Absent)
    }
}

/// Extract a field by its numeric id.
pub fn extract(record: &Value, field_id: u32) -> Extracted {
    match FieldId::from_u32(field_id) {
        Some(field) => extract_field(record, field),
        None => Extracted::Value(NOT_AVAILABLE.to_string()),
    }
}

pub fn extract_field(record: &Value, field: FieldId) -> Extracted {
    match field {
        FieldId::Src => Extracted::Value(event_source(record)),
        FieldId::Name => Extracted::Value(top_level(record, "eventName")),
        FieldId::User => nested(record, &["userIdentity", "userName"]),
        FieldId::Region => Extracted::Value(top_level(record, "awsRegion")),
        FieldId::BucketName => nested(record, &["requestParameters", "bucketName"]),
    }
}

/// `eventSource` without its `.amazonaws.com` trailer
pub fn event_source(record: &Value) -> String {
    let src = top_level(record, "eventSource");
    strip_aws_suffix(&src).to_string()
}

/// Strip a trailing `.amazonaws.com`, leaving a bare suffix untouched.
pub fn strip_aws_suffix(src: &str) -> &str {
    match src.strip_suffix(AWS_DOMAIN_SUFFIX) {
        Some(service) if !service.is_empty() => service,
        _ => src,
    }
}

/// String value of a top-level key, `<missing>` when absent
pub(crate) fn top_level(record: &Value, key: &str) -> String {
    lookup_str(record, &[key])
        .map(|v| v.into_owned())
        .unwrap_or_else(|| MISSING.to_string())
}

fn nested(record: &Value, path: &[&str]) -> Extracted {
    match lookup_str(record, path) {
        Some(value) => Extracted::Value(value.into_owned()),
        None => Extracted::Absent,
    }
}

/// Resolve who performed the action recorded in `record`.
///
/// The identity shape depends on `userIdentity.type`. An assumed role with no
/// session issuer still reports "AssumedRole" rather than nothing. Returns an
/// empty string when the record has no `userIdentity` at all.
pub fn derive_actor(record: &Value) -> String {
    let Some(identity) = lookup(record, &["userIdentity"]) else {
        return String::new();
    };

    match identity.get("type").and_then(Value::as_str) {
        Some("Root") | Some("IAMUser") => string_at(identity, &["userName"]).unwrap_or_default(),
        Some("AWSService") => string_at(identity, &["invokedBy"]).unwrap_or_default(),
        Some("AssumedRole") => {
            string_at(identity, &["sessionContext", "sessionIssuer", "userName"])
                .unwrap_or_else(|| "AssumedRole".to_string())
        }
        Some("AWSAccount") => "AWSAccount".to_string(),
        Some("FederatedUser") => "FederatedUser".to_string(),
        _ => UNKNOWN_USER_TYPE.to_string(),
    }
}

fn string_at(value: &Value, path: &[&str]) -> Option<String> {
    lookup_str(value, path).map(|v| v.into_owned())
}
