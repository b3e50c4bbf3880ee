//! YAML configuration: the poll interval and one entry per vendor input.
//!
//! ```yaml
//! interval: 60s
//! inputs:
//!   - vendor: imonnit
//!     token: "..."
//!     serial_numbers: ["501", "502"]
//! ```
//!
//! Durations use humantime syntax (`500ms`, `5s`, `1m`). Everything except
//! `vendor` has a default; validation runs as part of loading.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::tags::DEFAULT_DELIMITER;
use crate::{ConfigError, DeviceId, ValidationError, VendorId};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// Annotated configuration printed by `sensorbridge sample-config`.
pub const SAMPLE_CONFIG: &str = r#"# How often every input is polled.
interval: 60s

inputs:
  # HOBOlink REST API. Each serial number is queried for the last hour.
  - vendor: hobolink
    # server: https://webservice.hobolink.com/restv2/data/json
    user: ""
    password: ""
    token: ""
    # An empty list queries every logger of the account.
    serial_numbers: []
    http_timeout: 5s

  # iMonnit JSON API. Only the JSON API is supported.
  - vendor: imonnit
    # server: https://www.imonnit.com/json
    token: "change-me"
    # When non-empty, only these sensor ids are reported.
    serial_numbers: []
    http_timeout: 5s
    # Separator of the 9-part sensor naming scheme.
    name_delimiter: "|"
"#;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_interval", with = "humantime_serde")]
    pub interval: Duration,
    pub inputs: Vec<InputConfig>,
}

/// One vendor input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputConfig {
    pub vendor: VendorId,
    /// Base URL; falls back to the vendor default.
    #[serde(default)]
    pub server: Option<String>,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub serial_numbers: Vec<String>,
    #[serde(default = "default_http_timeout", with = "humantime_serde")]
    pub http_timeout: Duration,
    #[serde(default = "default_delimiter")]
    pub name_delimiter: String,
}

fn default_interval() -> Duration {
    DEFAULT_INTERVAL
}

fn default_http_timeout() -> Duration {
    DEFAULT_HTTP_TIMEOUT
}

fn default_delimiter() -> String {
    DEFAULT_DELIMITER.to_owned()
}

impl Config {
    /// Parses and validates configuration text.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.interval.is_zero() {
            return Err(ValidationError::ZeroInterval);
        }
        if self.inputs.is_empty() {
            return Err(ValidationError::NoInputs);
        }

        self.inputs.iter().try_for_each(InputConfig::validate)
    }
}

impl InputConfig {
    /// Input with every optional setting at its default.
    pub fn new(vendor: VendorId) -> Self {
        Self {
            vendor,
            server: None,
            user: String::new(),
            password: String::new(),
            token: String::new(),
            serial_numbers: Vec::new(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            name_delimiter: default_delimiter(),
        }
    }

    pub fn server(&self) -> &str {
        self.server
            .as_deref()
            .unwrap_or_else(|| self.vendor.default_server())
    }

    /// Configured devices; blank entries are dropped.
    pub fn devices(&self) -> Vec<DeviceId> {
        DeviceId::parse_list(&self.serial_numbers)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let vendor = self.vendor.as_str();
        let server = self.server().trim();

        if server.is_empty() {
            return Err(ValidationError::EmptyServer { vendor });
        }
        if !server.starts_with("http://") && !server.starts_with("https://") {
            return Err(ValidationError::InvalidServer {
                vendor,
                value: server.to_owned(),
            });
        }
        if self.vendor == VendorId::Imonnit && self.token.trim().is_empty() {
            return Err(ValidationError::MissingToken { vendor });
        }
        if self.http_timeout.is_zero() {
            return Err(ValidationError::ZeroTimeout { vendor });
        }
        if self.name_delimiter.is_empty() {
            return Err(ValidationError::EmptyDelimiter { vendor });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn sample_config_is_valid() {
        let config = Config::from_yaml(SAMPLE_CONFIG).expect("sample config must load");

        assert_eq!(config.interval, Duration::from_secs(60));
        assert_eq!(config.inputs.len(), 2);
        assert_eq!(config.inputs[0].vendor, VendorId::Hobolink);
        assert_eq!(config.inputs[1].name_delimiter, "|");
    }

    #[test]
    fn applies_defaults() {
        let config = Config::from_yaml("inputs:\n  - vendor: hobolink\n").expect("valid config");
        let input = &config.inputs[0];

        assert_eq!(config.interval, DEFAULT_INTERVAL);
        assert_eq!(input.http_timeout, DEFAULT_HTTP_TIMEOUT);
        assert_eq!(input.name_delimiter, "|");
        assert_eq!(input.server(), "https://webservice.hobolink.com/restv2/data/json");
        assert!(input.devices().is_empty());
    }

    #[test]
    fn parses_humantime_durations() {
        let yaml = "interval: 2m\ninputs:\n  - vendor: imonnit\n    token: t\n    http_timeout: 750ms\n";
        let config = Config::from_yaml(yaml).expect("valid config");

        assert_eq!(config.interval, Duration::from_secs(120));
        assert_eq!(config.inputs[0].http_timeout, Duration::from_millis(750));
    }

    #[test]
    fn blank_serial_numbers_are_ignored() {
        let mut input = InputConfig::new(VendorId::Hobolink);
        input.serial_numbers = vec![String::new(), String::from(" 20581912 ")];

        let devices = input.devices();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].as_str(), "20581912");
    }

    #[test]
    fn imonnit_without_token_is_rejected() {
        let err = Config::from_yaml("inputs:\n  - vendor: imonnit\n").expect_err("must fail");
        assert!(matches!(
            err,
            ConfigError::Validation(ValidationError::MissingToken { vendor: "imonnit" })
        ));
    }

    #[test]
    fn rejects_invalid_inputs() {
        let mut input = InputConfig::new(VendorId::Hobolink);
        input.http_timeout = Duration::ZERO;
        assert_eq!(
            input.validate(),
            Err(ValidationError::ZeroTimeout { vendor: "hobolink" })
        );

        let mut input = InputConfig::new(VendorId::Hobolink);
        input.server = Some(String::from("ftp://example.com"));
        assert!(matches!(input.validate(), Err(ValidationError::InvalidServer { .. })));

        let mut input = InputConfig::new(VendorId::Hobolink);
        input.name_delimiter = String::new();
        assert_eq!(
            input.validate(),
            Err(ValidationError::EmptyDelimiter { vendor: "hobolink" })
        );
    }

    #[test]
    fn empty_input_list_is_rejected() {
        let err = Config::from_yaml("inputs: []\n").expect_err("must fail");
        assert!(matches!(err, ConfigError::Validation(ValidationError::NoInputs)));
    }

    #[test]
    fn unknown_vendor_is_a_parse_error() {
        let err = Config::from_yaml("inputs:\n  - vendor: acme\n").expect_err("must fail");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(SAMPLE_CONFIG.as_bytes()).expect("write config");

        let config = Config::load(file.path()).expect("config loads");
        assert_eq!(config.inputs.len(), 2);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = Config::load(Path::new("/nonexistent/sensorbridge.yaml")).expect_err("must fail");
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
