use super::types::*;
use crate::config::{expand_env_vars, expand_tilde, unexpanded_env_vars};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("missing input directory argument")]
    MissingRoot,

    #[error("validation failed:\n{}", .0.join("\n"))]
    ValidationList(Vec<String>),

    #[error("validation failed: {0}")]
    Validation(String),
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let yaml_string = fs::read_to_string(path).map_err(|e| {
        ConfigError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to read config file '{}': {}", path.display(), e),
        ))
    })?;

    parse_config(&yaml_string)
}

/// Parse and validate config from a YAML string
pub fn parse_config(yaml: &str) -> Result<Config, ConfigError> {
    // Expand environment variables in the YAML string before parsing
    let yaml_string = expand_env_vars(yaml);
    check_unexpanded_vars(&yaml_string)?;

    let mut config: Config = serde_yaml::from_str(&yaml_string)?;

    config.source.root = expand_tilde(&config.source.root);

    validate_config(&config)?;

    Ok(config)
}

/// Reject `$env{VAR}` references left in the config after expansion, naming
/// the key each one appears under.
fn check_unexpanded_vars(yaml_string: &str) -> Result<(), ConfigError> {
    let unexpanded_vars = unexpanded_env_vars(yaml_string);

    if unexpanded_vars.is_empty() {
        return Ok(());
    }

    let errors = unexpanded_vars
        .iter()
        .map(|var| {
            let token = format!("$env{{{}}}", var);
            let key = yaml_string
                .lines()
                .find(|line| line.contains(&token))
                .and_then(|line| line.split_once(':'))
                .map(|(key, _)| key.trim())
                .unwrap_or("config");
            format!(
                "{} refers to {} but {} is not set; export it or write the directory out in full",
                key, token, var
            )
        })
        .collect();

    Err(ConfigError::ValidationList(errors))
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if config.source.root.as_os_str().is_empty() {
        errors.push("source.root must not be empty".to_string());
    }

    if config.output.limit == Some(0) {
        errors.push("output.limit must be greater than 0 (omit it for no limit)".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationList(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_minimal_config() {
        let config = parse_config("source:\n  root: /var/log/cloudtrail\n").unwrap();
        assert_eq!(config.source.root, PathBuf::from("/var/log/cloudtrail"));
        assert_eq!(config.output.format, OutputFormat::Line);
        assert_eq!(config.output.limit, None);
    }

    #[test]
    fn test_output_section() {
        let config =
            parse_config("source:\n  root: /data\noutput:\n  format: json\n  limit: 10\n").unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.output.limit, Some(10));
    }

    #[test]
    fn test_unknown_format_rejected() {
        let result = parse_config("source:\n  root: /data\noutput:\n  format: xml\n");
        assert!(matches!(result, Err(ConfigError::YamlParse(_))));
    }

    #[test]
    fn test_empty_root_and_zero_limit() {
        let result = parse_config("source:\n  root: ''\noutput:\n  limit: 0\n");
        match result {
            Err(ConfigError::ValidationList(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation errors, got {:?}", other),
        }
    }

    #[test]
    fn test_unset_env_var() {
        let result = parse_config("source:\n  root: $env{CT_CONFIG_UNSET_VAR}/trails\n");
        match result {
            Err(ConfigError::ValidationList(errors)) => assert_eq!(
                errors,
                vec![
                    "root refers to $env{CT_CONFIG_UNSET_VAR} but CT_CONFIG_UNSET_VAR is not set; \
                     export it or write the directory out in full"
                ]
            ),
            other => panic!("expected validation errors, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let result = load_config(Path::new("/nonexistent/cloudtrail-file/config.yml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
