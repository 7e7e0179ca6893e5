pub fn generate_starter_config() -> String {
    r#"# =============================================================================
# CLOUDTRAIL-FILE CONFIGURATION
# =============================================================================
# Config file locations (in order of precedence):
#   1. Path specified via --config argument
#   2. ~/.config/cloudtrail-file/config.yml
#   3. /etc/cloudtrail-file/config.yml
#
# Values may reference environment variables with $env{NAME}.

source:
  # Directory scanned recursively for .json and .json.gz CloudTrail exports.
  # A root given on the command line overrides this value.
  root: ~/cloudtrail

output:
  # 'line' prints a one-line summary per event,
  # 'json' prints "<timestamp_ns><TAB><event json>" per event.
  format: line
  # Stop after this many events. Omit to read everything.
  # limit: 100
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse::parse_config;
    use crate::config::types::OutputFormat;

    #[test]
    fn test_starter_config_parses() {
        let config = parse_config(&generate_starter_config()).unwrap();
        assert_eq!(config.output.format, OutputFormat::Line);
        assert!(config.source.root.ends_with("cloudtrail"));
    }
}
