use thiserror::Error;

/// Validation and contract errors exposed by `sensorbridge-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("device identifier cannot be empty")]
    EmptyDeviceId,

    #[error("invalid vendor '{value}', expected one of hobolink, imonnit")]
    InvalidVendor { value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("{vendor}: server URL cannot be empty")]
    EmptyServer { vendor: &'static str },
    #[error("{vendor}: server URL must start with http:// or https://: '{value}'")]
    InvalidServer { vendor: &'static str, value: String },
    #[error("{vendor}: token required for the {vendor} API")]
    MissingToken { vendor: &'static str },
    #[error("{vendor}: http_timeout must be greater than zero")]
    ZeroTimeout { vendor: &'static str },
    #[error("{vendor}: name_delimiter cannot be empty")]
    EmptyDelimiter { vendor: &'static str },

    #[error("poll interval must be greater than zero")]
    ZeroInterval,
    #[error("configuration must declare at least one input")]
    NoInputs,
}

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}
