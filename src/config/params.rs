use crate::config::parse::ConfigError;
use crate::config::{expand_env_vars, expand_tilde, unexpanded_env_vars};
use std::path::{Path, PathBuf};

/// Settings passed by the host when a stream is opened.
///
/// The host hands over a single string: the root directory to scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenParams {
    pub root: PathBuf,
}

impl OpenParams {
    pub fn parse(params: &str) -> Result<Self, ConfigError> {
        let trimmed = params.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::MissingRoot);
        }

        let expanded = expand_env_vars(trimmed);
        let unset = unexpanded_env_vars(&expanded);
        if !unset.is_empty() {
            return Err(ConfigError::Validation(format!(
                "environment variables are not set: {}",
                unset.join(", ")
            )));
        }

        Ok(Self {
            root: expand_tilde(Path::new(&expanded)),
        })
    }
}
