//! Environment and dotenv configuration layers.
//!
//! Both layers are normalized the same way: keys are matched
//! case-insensitively, must carry the `OZON_SELLER_` prefix, and are stored
//! without it. Empty values are treated as unset.

use std::collections::HashMap;
use std::path::Path;

use crate::error::ConfigError;

/// Prefix shared by every configuration variable.
pub const ENV_PREFIX: &str = "OZON_SELLER_";

/// A normalized set of `key -> value` pairs from one configuration source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct EnvLayer {
    values: HashMap<String, String>,
}

impl EnvLayer {
    /// Builds a layer from raw `(name, value)` pairs, keeping only prefixed names.
    pub(crate) fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let prefix = ENV_PREFIX.to_lowercase();
        let values = vars
            .into_iter()
            .filter_map(|(key, value)| {
                let key = key.as_ref().to_lowercase();
                let field = key.strip_prefix(&prefix)?.to_string();
                let value = value.into();
                if value.trim().is_empty() {
                    None
                } else {
                    Some((field, value.trim().to_string()))
                }
            })
            .collect();
        Self { values }
    }

    /// Reads a dotenv-style file without touching the process environment.
    pub(crate) fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let to_error = |reason: String| ConfigError::EnvFile {
            path: path.display().to_string(),
            reason,
        };

        let iter = dotenvy::from_path_iter(path).map_err(|e| to_error(e.to_string()))?;
        let mut pairs = Vec::new();
        for item in iter {
            let (key, value) = item.map_err(|e| to_error(e.to_string()))?;
            pairs.push((key, value));
        }
        Ok(Self::from_vars(pairs))
    }

    /// Returns the raw value for a field name such as `client_id`.
    pub(crate) fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// Returns the parsed value for a field, if present.
    pub(crate) fn parse<T: std::str::FromStr>(&self, field: &str) -> Result<Option<T>, ConfigError> {
        self.get(field)
            .map(|raw| {
                raw.parse::<T>().map_err(|_| ConfigError::UnparsableValue {
                    key: format!("{ENV_PREFIX}{}", field.to_uppercase()),
                    value: raw.to_string(),
                })
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_vars_is_case_insensitive() {
        let layer = EnvLayer::from_vars([
            ("ozon_seller_client_id", "lowercase_client"),
            ("OZON_SELLER_API_KEY", "uppercase_key"),
        ]);
        assert_eq!(layer.get("client_id"), Some("lowercase_client"));
        assert_eq!(layer.get("api_key"), Some("uppercase_key"));
    }

    #[test]
    fn test_from_vars_ignores_unprefixed_and_empty() {
        let layer = EnvLayer::from_vars([
            ("PATH", "/usr/bin"),
            ("OZON_SELLER_TOKEN", "  "),
            ("CLIENT_ID", "nope"),
        ]);
        assert_eq!(layer, EnvLayer::default());
    }

    #[test]
    fn test_parse_reports_key_and_value() {
        let layer = EnvLayer::from_vars([("OZON_SELLER_MAX_RETRIES", "many")]);
        let result = layer.parse::<u32>("max_retries");
        assert!(matches!(
            result,
            Err(ConfigError::UnparsableValue { ref key, ref value })
                if key == "OZON_SELLER_MAX_RETRIES" && value == "many"
        ));
    }

    #[test]
    fn test_from_file_reads_dotenv() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "OZON_SELLER_CLIENT_ID=file_client").unwrap();
        writeln!(file, "OZON_SELLER_MAX_REQUESTS_PER_SECOND=40").unwrap();
        writeln!(file, "UNRELATED=1").unwrap();

        let layer = EnvLayer::from_file(file.path()).unwrap();
        assert_eq!(layer.get("client_id"), Some("file_client"));
        assert_eq!(layer.parse::<u32>("max_requests_per_second").unwrap(), Some(40));
        assert_eq!(layer.get("unrelated"), None);
    }

    #[test]
    fn test_from_file_missing_path() {
        let result = EnvLayer::from_file(Path::new("/definitely/not/here/.env"));
        assert!(matches!(result, Err(ConfigError::EnvFile { .. })));
    }
}
