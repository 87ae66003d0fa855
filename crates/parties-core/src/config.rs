//! Party configuration
//!
//! Loaded from TOML, then overridden from the environment, then validated:
//!
//! ```toml
//! capacity = 4
//! ```

use crate::error::ConfigError;
use crate::party::PARTY_CAPACITY;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding [`PartyConfig::capacity`].
pub const CAPACITY_ENV: &str = "PARTIES_CAPACITY";

/// Tunables for a party directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartyConfig {
    /// Maximum members per party, owner included
    pub capacity: usize,
}

impl Default for PartyConfig {
    fn default() -> Self {
        Self {
            capacity: PARTY_CAPACITY,
        }
    }
}

impl PartyConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Apply overrides from the environment.
    ///
    /// Only [`CAPACITY_ENV`] is read; other variables are never inspected.
    pub fn merge_with_env(&mut self) -> Result<(), ConfigError> {
        match std::env::var(CAPACITY_ENV) {
            Ok(value) => self.merge_with_vars([(CAPACITY_ENV.to_string(), value)]),
            Err(std::env::VarError::NotPresent) => self.validate(),
            Err(std::env::VarError::NotUnicode(_)) => Err(ConfigError::invalid(format!(
                "{CAPACITY_ENV} is not valid unicode"
            ))),
        }
    }

    /// Apply overrides from an explicit set of variables.
    pub fn merge_with_vars(
        &mut self,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<(), ConfigError> {
        for (key, value) in vars {
            if key == CAPACITY_ENV {
                self.capacity = value.trim().parse().map_err(|e| {
                    ConfigError::invalid(format!("{CAPACITY_ENV}={value}: {e}"))
                })?;
            }
        }
        self.validate()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::invalid("capacity must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = PartyConfig::default();
        assert_eq!(config.capacity, PARTY_CAPACITY);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml() {
        let config = PartyConfig::from_toml("capacity = 8").unwrap();
        assert_eq!(config.capacity, 8);

        let config = PartyConfig::from_toml("").unwrap();
        assert_eq!(config, PartyConfig::default());
    }

    #[test]
    fn test_rejects_bad_toml() {
        assert_matches!(
            PartyConfig::from_toml("capacity = 0"),
            Err(ConfigError::Invalid(_))
        );
        assert_matches!(
            PartyConfig::from_toml("capacity = \"four\""),
            Err(ConfigError::Parse(_))
        );
        assert_matches!(
            PartyConfig::from_toml("size = 4"),
            Err(ConfigError::Parse(_))
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "capacity = 6").unwrap();

        let config = PartyConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.capacity, 6);

        let missing = file.path().with_extension("missing");
        assert_matches!(
            PartyConfig::load_from_file(&missing),
            Err(ConfigError::Io(_))
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_merge_with_env_ignores_non_unicode_neighbours() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        std::env::set_var("PARTIES_TEST_UNRELATED", OsStr::from_bytes(&[0xff, 0xfe]));
        let mut config = PartyConfig::default();
        let merged = config.merge_with_env();
        std::env::remove_var("PARTIES_TEST_UNRELATED");

        assert!(merged.is_ok());
        assert_eq!(config.capacity, PARTY_CAPACITY);
    }

    #[test]
    fn test_merge_with_vars() {
        let mut config = PartyConfig::default();
        config
            .merge_with_vars([
                ("UNRELATED".to_string(), "x".to_string()),
                (CAPACITY_ENV.to_string(), " 2 ".to_string()),
            ])
            .unwrap();
        assert_eq!(config.capacity, 2);

        assert_matches!(
            config.merge_with_vars([(CAPACITY_ENV.to_string(), "lots".to_string())]),
            Err(ConfigError::Invalid(_))
        );
        assert_matches!(
            config.merge_with_vars([(CAPACITY_ENV.to_string(), "0".to_string())]),
            Err(ConfigError::Invalid(_))
        );
    }
}
