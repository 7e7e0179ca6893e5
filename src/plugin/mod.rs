//! Host-facing surface of the source: metadata, the open/next/close
//! lifecycle, and the rendering and extraction callbacks.
//!
//! Everything the host reads back is NUL-terminated and borrowed from a
//! buffer owned by the plugin or by the stream, valid until the next call on
//! that object.

pub mod buffer;
pub mod stream;

use crate::config::{ConfigError, OpenParams};
use crate::extract::{decode_event, extract, fields, render, Extracted};
use crate::source::{CatalogError, CursorError, DecodeError, FileCatalog, RecordCursor};
use buffer::OutputBuffer;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

pub use stream::{EventView, SourceStream};

pub const PLUGIN_ID: u32 = 2;
pub const PLUGIN_NAME: &str = "cloudtrail_file";
pub const PLUGIN_DESCRIPTION: &str =
    "reads cloudtrail JSON data saved to file in the directory specified in the settings";

/// Host code for a plugin that produces events
pub const PLUGIN_TYPE_SOURCE: u32 = 1;

/// Size of the buffer used for rendered lines and extracted values
pub const OUT_BUF_LEN: usize = 4096;

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("cloudtrail_file plugin error: {0}")]
    Config(#[from] ConfigError),

    #[error("cloudtrail_file plugin error: {0}")]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Cursor(#[from] CursorError),

    #[error("failed to serialize field table: {0}")]
    Fields(#[source] serde_json::Error),
}

/// Failure classes reported to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Io,
    Decompress,
    Parse,
    Timestamp,
    RecordTooLarge,
    Internal,
}

impl PluginError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PluginError::Config(_) => ErrorKind::Config,
            PluginError::Catalog(CatalogError::Io { .. }) => ErrorKind::Io,
            PluginError::Catalog(_) => ErrorKind::Config,
            PluginError::Cursor(e) => match e {
                CursorError::Io { .. } => ErrorKind::Io,
                CursorError::Decode {
                    source: DecodeError::Decompress(_),
                    ..
                } => ErrorKind::Decompress,
                CursorError::Decode {
                    source: DecodeError::Parse(_),
                    ..
                } => ErrorKind::Parse,
                CursorError::Timestamp(_) => ErrorKind::Timestamp,
                CursorError::RecordTooLarge { .. } => ErrorKind::RecordTooLarge,
                CursorError::Serialize(_) => ErrorKind::Internal,
            },
            PluginError::Fields(_) => ErrorKind::Internal,
        }
    }
}

/// Host status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Status {
    Success = 0,
    Failure = 1,
    /// Part of the host's code set. Never returned here: reads either deliver
    /// or fail, there is no "try again later" outcome.
    Timeout = -1,
    Eof = 6,
}

impl Status {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Status of a lifecycle call that has no end-of-stream outcome
pub fn status_of<T>(result: &Result<T, PluginError>) -> Status {
    match result {
        Ok(_) => Status::Success,
        Err(_) => Status::Failure,
    }
}

/// Status of a `next` call
pub fn next_status<T>(result: &Result<Option<T>, PluginError>) -> Status {
    match result {
        Ok(Some(_)) => Status::Success,
        Ok(None) => Status::Eof,
        Err(_) => Status::Failure,
    }
}

/// Plugin-wide context shared by every stream the host opens.
///
/// Holds the last error message and the output buffer for rendered lines and
/// extracted values.
pub struct SourcePlugin {
    last_error: String,
    out_buf: OutputBuffer,
}

impl Default for SourcePlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl SourcePlugin {
    pub fn new() -> Self {
        debug!(plugin = PLUGIN_NAME, "init");
        Self {
            last_error: String::new(),
            out_buf: OutputBuffer::with_capacity(OUT_BUF_LEN),
        }
    }

    pub fn id(&self) -> u32 {
        PLUGIN_ID
    }

    pub fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    pub fn description(&self) -> &'static str {
        PLUGIN_DESCRIPTION
    }

    pub fn plugin_type(&self) -> u32 {
        PLUGIN_TYPE_SOURCE
    }

    /// Message of the most recent failure, empty if nothing has failed yet
    pub fn last_error(&self) -> &str {
        &self.last_error
    }

    /// The field table as a JSON array of `{type, name, desc}`
    pub fn fields_json(&mut self) -> Result<String, PluginError> {
        let result = fields::fields_json().map_err(PluginError::Fields);
        self.record(result)
    }

    /// Open a stream over every container file under the directory in `params`.
    pub fn open(&mut self, params: &str) -> Result<SourceStream, PluginError> {
        let result = OpenParams::parse(params)
            .map_err(PluginError::from)
            .and_then(|params| open_catalog(&params.root));
        self.record(result)
    }

    /// Open a stream over an already resolved root. The path is used as is,
    /// with no trimming or `$env{}`/`~` expansion.
    pub fn open_root(&mut self, root: &Path) -> Result<SourceStream, PluginError> {
        let result = open_catalog(root);
        self.record(result)
    }

    /// Pull the next event from `stream`; `Ok(None)` at end of stream.
    pub fn next<'s>(
        &mut self,
        stream: &'s mut SourceStream,
    ) -> Result<Option<EventView<'s>>, PluginError> {
        let result = stream.advance();
        self.record(result)
    }

    /// Render event bytes as a one-line summary, NUL-terminated.
    ///
    /// Undecodable input yields a diagnostic line and sets the last error.
    pub fn event_to_string(&mut self, data: &[u8]) -> &[u8] {
        let line = match decode_event(data) {
            Ok(record) => render(&record),
            Err(e) => {
                self.last_error = e.to_string();
                format!("<invalid JSON: {}>", e)
            }
        };
        self.out_buf.write_str(&line)
    }

    /// Extract one field from event bytes. `None` means the field is not
    /// present or the bytes are not a record.
    pub fn extract_str(&mut self, field_id: u32, data: &[u8]) -> Option<&[u8]> {
        let record = decode_event(data).ok()?;
        match extract(&record, field_id) {
            Extracted::Value(value) => Some(self.out_buf.write_str(&value)),
            Extracted::Absent => None,
        }
    }

    fn record<T>(&mut self, result: Result<T, PluginError>) -> Result<T, PluginError> {
        if let Err(e) = &result {
            warn!(kind = ?e.kind(), error = %e, "Plugin call failed");
            self.last_error = e.to_string();
        }
        result
    }
}

fn open_catalog(root: &Path) -> Result<SourceStream, PluginError> {
    let catalog = FileCatalog::build(root)?;

    info!(
        root = %catalog.root().display(),
        files = catalog.len(),
        "Opened stream"
    );

    Ok(SourceStream::new(RecordCursor::new(catalog.into_files())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_metadata() {
        let plugin = SourcePlugin::new();
        assert_eq!(plugin.id(), 2);
        assert_eq!(plugin.name(), "cloudtrail_file");
        assert_eq!(plugin.plugin_type(), PLUGIN_TYPE_SOURCE);
        assert!(plugin.description().contains("cloudtrail"));
        assert_eq!(plugin.last_error(), "");
    }

    #[test]
    fn test_open_empty_params_sets_last_error() {
        let mut plugin = SourcePlugin::new();
        let result = plugin.open("");
        assert_eq!(status_of(&result), Status::Failure);
        let err = result.err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert_eq!(
            plugin.last_error(),
            "cloudtrail_file plugin error: missing input directory argument"
        );
    }

    #[test]
    fn test_open_dir_without_json() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("readme.txt"), "hi").unwrap();

        let mut plugin = SourcePlugin::new();
        let err = plugin.open(dir.path().to_str().unwrap()).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(plugin.last_error().contains("no json files found"));
    }

    #[test]
    fn test_catalog_io_error_kind() {
        let err = PluginError::from(CatalogError::Io {
            path: "/data/locked".into(),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        });
        assert_eq!(err.kind(), ErrorKind::Io);

        let err = PluginError::from(CatalogError::Empty("/data".into()));
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_open_root_uses_path_verbatim() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("$env{CT_ROOT_NEVER_SET} ");
        fs::create_dir_all(&root).unwrap();
        fs::write(
            root.join("a.json"),
            r#"{"eventTime":"2023-01-01T00:00:00Z","eventName":"x"}"#,
        )
        .unwrap();

        let mut plugin = SourcePlugin::new();
        let mut stream = plugin.open_root(&root).unwrap();
        assert!(plugin.next(&mut stream).unwrap().is_some());
        assert!(plugin.next(&mut stream).unwrap().is_none());

        // the string form goes through expansion and rejects the unset variable
        assert!(plugin.open(root.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_extract_str_buffer() {
        let mut plugin = SourcePlugin::new();
        let data = b"{\"eventSource\":\"s3.amazonaws.com\"}\0";
        assert_eq!(plugin.extract_str(0, data), Some(&b"s3\0"[..]));
        assert_eq!(plugin.extract_str(2, data), None);
        assert_eq!(plugin.extract_str(42, data), Some(&b"<NA>\0"[..]));
        assert_eq!(plugin.extract_str(0, b"garbage"), None);
    }

    #[test]
    fn test_event_to_string_invalid_sets_last_error() {
        let mut plugin = SourcePlugin::new();
        let line = plugin.event_to_string(b"{oops").to_vec();
        assert!(line.starts_with(b"<invalid JSON: "));
        assert_eq!(line.last(), Some(&0));
        assert!(!plugin.last_error().is_empty());
    }

    #[test]
    fn test_event_to_string_truncated_to_buffer() {
        let mut plugin = SourcePlugin::new();
        let record = serde_json::json!({"eventName": "x".repeat(10_000)});
        let line = plugin.event_to_string(record.to_string().as_bytes());
        assert_eq!(line.len(), OUT_BUF_LEN);
        assert_eq!(line.last(), Some(&0));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(Status::Success.code(), 0);
        assert_eq!(Status::Failure.code(), 1);
        assert_eq!(Status::Eof.code(), 6);
        assert_eq!(Status::Timeout.code(), -1);
        let eof: Result<Option<()>, PluginError> = Ok(None);
        assert_eq!(next_status(&eof), Status::Eof);
    }
}
