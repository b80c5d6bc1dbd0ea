//! Seller API endpoint version definitions.
//!
//! Ozon versions each endpoint independently, so the version is a per-call
//! path segment (`/v3/posting/fbs/get`) rather than a client-wide setting.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Version segment of a Seller API endpoint path.
///
/// # Example
///
/// ```rust
/// use ozon_seller_api::ApiVersion;
///
/// let version: ApiVersion = "v3".parse().unwrap();
/// assert_eq!(version, ApiVersion::V3);
/// assert_eq!(version.to_string(), "v3");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ApiVersion {
    /// `v1`
    V1,
    /// `v2`
    V2,
    /// `v3`
    V3,
    /// `v4`
    V4,
    /// `v5`
    V5,
    /// Any later version not yet covered by a named variant.
    Other(u8),
}

impl ApiVersion {
    /// Returns the numeric version.
    #[must_use]
    pub const fn number(&self) -> u8 {
        match self {
            Self::V1 => 1,
            Self::V2 => 2,
            Self::V3 => 3,
            Self::V4 => 4,
            Self::V5 => 5,
            Self::Other(n) => *n,
        }
    }

    const fn from_number(n: u8) -> Self {
        match n {
            1 => Self::V1,
            2 => Self::V2,
            3 => Self::V3,
            4 => Self::V4,
            5 => Self::V5,
            n => Self::Other(n),
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.number())
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let invalid = || ConfigError::UnparsableValue {
            key: "api_version".to_string(),
            value: s.to_string(),
        };

        let digits = normalized.strip_prefix('v').ok_or_else(invalid)?;
        match digits.parse::<u8>() {
            Ok(n) if n > 0 => Ok(Self::from_number(n)),
            _ => Err(invalid()),
        }
    }
}
