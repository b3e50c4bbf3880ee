use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] sensorbridge_core::ConfigError),

    #[error("command error: {0}")]
    Command(String),

    #[error("failed to build http client: {0}")]
    Client(#[from] sensorbridge_core::HttpError),

    #[error(transparent)]
    Collect(#[from] sensorbridge_core::CollectError),

    #[error(transparent)]
    Vendor(#[from] sensorbridge_core::VendorError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Command(_) => 2,
            Self::Client(_) => 2,
            Self::Collect(_) => 3,
            Self::Vendor(_) => 3,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use sensorbridge_core::{ConfigError, ValidationError, VendorError, VendorId};

    use super::*;

    #[test]
    fn maps_errors_to_exit_codes() {
        assert_eq!(CliError::from(ConfigError::from(ValidationError::NoInputs)).exit_code(), 2);
        assert_eq!(
            CliError::from(VendorError::status(VendorId::Imonnit, 500, 200)).exit_code(),
            3
        );
        assert_eq!(
            CliError::from(std::io::Error::other("closed")).exit_code(),
            10
        );
    }
}
