use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Canonical vendor identifiers. The identifier doubles as the measurement name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorId {
    Hobolink,
    Imonnit,
}

impl VendorId {
    pub const ALL: [Self; 2] = [Self::Hobolink, Self::Imonnit];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hobolink => "hobolink",
            Self::Imonnit => "imonnit",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Hobolink => "Read stats from the HOBOlink API for a given user account",
            Self::Imonnit => "Read stats from the iMonnit API for a given user account",
        }
    }

    pub const fn default_server(self) -> &'static str {
        match self {
            Self::Hobolink => "https://webservice.hobolink.com/restv2/data/json",
            Self::Imonnit => "https://www.imonnit.com/json",
        }
    }
}

impl Display for VendorId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VendorId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "hobolink" => Ok(Self::Hobolink),
            "imonnit" => Ok(Self::Imonnit),
            other => Err(ValidationError::InvalidVendor {
                value: other.to_owned(),
            }),
        }
    }
}
