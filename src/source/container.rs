use flate2::read::GzDecoder;
use serde_json::Value;
use std::io::{self, Read};
use thiserror::Error;

/// Key under which export tools batch many records into one document
pub const RECORDS_KEY: &str = "Records";

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("gzip decompression failed: {0}")]
    Decompress(#[source] io::Error),

    #[error("invalid json: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The ordered records decoded from one container file
pub type RecordBatch = Vec<Value>;

/// Decode the contents of one container file into its records.
///
/// A document shaped `{"Records": [...]}` (and nothing else) is unwrapped into
/// its array. Any other document is a batch of one, objects or not.
pub fn decode(bytes: &[u8], is_compressed: bool) -> Result<RecordBatch, DecodeError> {
    let value: Value = if is_compressed {
        let mut json = Vec::new();
        GzDecoder::new(bytes)
            .read_to_end(&mut json)
            .map_err(DecodeError::Decompress)?;
        serde_json::from_slice(&json)?
    } else {
        serde_json::from_slice(bytes)?
    };

    Ok(unwrap_records(value))
}

fn unwrap_records(value: Value) -> RecordBatch {
    match value {
        Value::Object(mut map) if map.len() == 1 => match map.remove(RECORDS_KEY) {
            Some(Value::Array(records)) => records,
            Some(other) => {
                map.insert(RECORDS_KEY.to_string(), other);
                vec![Value::Object(map)]
            }
            None => vec![Value::Object(map)],
        },
        other => vec![other],
    }
}
