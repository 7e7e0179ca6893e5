pub mod extractor;
pub mod fields;
pub mod lookup;
pub mod render;

use serde_json::Value;

pub use extractor::{derive_actor, extract, extract_field, Extracted};
pub use fields::{fields_json, FieldDescriptor, FieldId, FIELDS};
pub use render::{render, render_bytes};

/// Decode event bytes back into a record.
///
/// Input is read up to the first NUL, the way a C string would be, so the
/// NUL-terminated wire form can be passed in unchanged.
pub fn decode_event(data: &[u8]) -> Result<Value, serde_json::Error> {
    let end = data.iter().position(|b| *b == 0).unwrap_or(data.len());
    serde_json::from_slice(&data[..end])
}

/// Extract a field straight from event bytes. Undecodable input is Absent.
pub fn extract_from_bytes(data: &[u8], field_id: u32) -> Extracted {
    match decode_event(data) {
        Ok(record) => extract(&record, field_id),
        Err(_) => Extracted::Absent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_stops_at_nul() {
        let record = decode_event(b"{\"a\":1}\0{\"b\":2}").unwrap();
        assert_eq!(record["a"], 1);
        assert!(record.get("b").is_none());
    }

    #[test]
    fn test_extract_from_invalid_bytes_is_absent() {
        assert!(extract_from_bytes(b"not json", 0).is_absent());
        assert!(extract_from_bytes(b"", 1).is_absent());
    }

    #[test]
    fn test_extract_from_bytes() {
        let data = b"{\"eventName\":\"ListBuckets\"}\0";
        assert_eq!(
            extract_from_bytes(data, FieldId::Name as u32),
            Extracted::Value("ListBuckets".to_string())
        );
    }
}
