use crate::extract::extractor::{derive_actor, event_source, top_level};
use serde_json::Value;

/// Shown in place of an actor that could not be resolved
pub const NO_ACTOR: &str = "<NAZ>";

/// One-line summary of a record.
pub fn render(record: &Value) -> String {
    let mut user = derive_actor(record);
    if user.is_empty() {
        user = NO_ACTOR.to_string();
    }

    format!(
        "[cloudtrail] src:{} name:{} user:{} reg:{}",
        event_source(record),
        top_level(record, "eventName"),
        user,
        top_level(record, "awsRegion")
    )
}

/// Render event bytes as emitted by the cursor. Never fails: bytes that do not
/// decode produce a diagnostic line instead.
pub fn render_bytes(data: &[u8]) -> String {
    match crate::extract::decode_event(data) {
        Ok(record) => render(&record),
        Err(e) => format!("<invalid JSON: {}>", e),
    }
}
