use crate::config::{load_config, Config, ConfigError, OutputConfig, OutputFormat};
use crate::plugin::{PluginError, SourcePlugin};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Plugin(#[from] PluginError),

    #[error("no root directory given and no config file found")]
    NoRoot,

    #[error("unknown field '{0}' (run `cloudtrail-file fields` for the list)")]
    UnknownField(String),

    #[error("output error: {0}")]
    Output(#[from] io::Error),
}

/// What to read and how to print it, after merging CLI flags over the config file
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub root: PathBuf,
    pub output: OutputConfig,
}

impl RunSettings {
    /// Merge command line values over an optional config file. A root given on
    /// the command line wins over `source.root`.
    pub fn resolve(
        root: Option<PathBuf>,
        config_path: Option<&Path>,
    ) -> Result<Self, RunError> {
        let config: Option<Config> = match config_path {
            Some(path) => {
                info!(config_path = %path.display(), "Loading configuration");
                Some(load_config(path)?)
            }
            None => None,
        };

        let output = config
            .as_ref()
            .map(|c| c.output.clone())
            .unwrap_or_default();

        let root = root
            .or_else(|| config.map(|c| c.source.root))
            .ok_or(RunError::NoRoot)?;

        Ok(Self { root, output })
    }
}

/// Print every event under the configured root.
pub fn dump(settings: &RunSettings, out: &mut impl Write) -> Result<u64, RunError> {
    let mut plugin = SourcePlugin::new();
    let mut stream = plugin.open_root(&settings.root)?;

    let mut count = 0u64;
    while settings.output.limit.map_or(true, |limit| count < limit) {
        let Some(event) = plugin.next(&mut stream)? else {
            break;
        };

        match settings.output.format {
            OutputFormat::Line => {
                let line = crate::extract::render_bytes(event.json());
                writeln!(out, "{}", line)?;
            }
            OutputFormat::Json => {
                write!(out, "{}\t", event.timestamp_ns)?;
                out.write_all(event.json())?;
                writeln!(out)?;
            }
        }
        count += 1;
    }

    stream.close();
    info!(events = count, "Done");
    Ok(count)
}

/// Print one field per event, resolving the field name through the
/// published field table the way a host does.
pub fn extract(
    settings: &RunSettings,
    field_name: &str,
    out: &mut impl Write,
) -> Result<u64, RunError> {
    let field_id = resolve_field(field_name)?;

    let mut plugin = SourcePlugin::new();
    let mut stream = plugin.open_root(&settings.root)?;

    let mut count = 0u64;
    while settings.output.limit.map_or(true, |limit| count < limit) {
        let event = match plugin.next(&mut stream)? {
            Some(event) => event.data.to_vec(),
            None => break,
        };

        match plugin.extract_str(field_id, &event) {
            Some(value) => {
                out.write_all(&value[..value.len() - 1])?;
                writeln!(out)?;
            }
            None => writeln!(out, "<absent>")?,
        }
        count += 1;
    }

    stream.close();
    Ok(count)
}

pub fn fields(out: &mut impl Write) -> Result<(), RunError> {
    let mut plugin = SourcePlugin::new();
    let json = plugin.fields_json()?;
    writeln!(out, "{}", json)?;
    Ok(())
}

fn resolve_field(name: &str) -> Result<u32, RunError> {
    let mut plugin = SourcePlugin::new();
    let table: Vec<serde_json::Value> = serde_json::from_str(&plugin.fields_json()?)
        .map_err(|e| RunError::Output(io::Error::new(io::ErrorKind::InvalidData, e)))?;

    let position = table
        .iter()
        .position(|row| row["name"] == name)
        .ok_or_else(|| RunError::UnknownField(name.to_string()))?;

    // The host numbers fields by their position in the table
    Ok(position as u32)
}
