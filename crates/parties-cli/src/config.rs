//! Configuration loading for the shell.

use crate::CliError;
use parties_core::PartyConfig;
use std::path::Path;
use tracing::{info, warn};

/// Load the party configuration.
///
/// A missing file falls back to defaults. Environment overrides apply next,
/// then `capacity` from the command line.
pub fn load_config(path: &Path, capacity: Option<usize>) -> Result<PartyConfig, CliError> {
    let wrap = |source| CliError::Config {
        path: path.to_path_buf(),
        source,
    };

    let mut config = if path.exists() {
        info!(path = %path.display(), "loading configuration");
        PartyConfig::load_from_file(path).map_err(wrap)?
    } else {
        warn!(path = %path.display(), "configuration file not found, using defaults");
        PartyConfig::default()
    };

    config.merge_with_env().map_err(wrap)?;
    if let Some(capacity) = capacity {
        config.capacity = capacity;
    }
    config.validate().map_err(wrap)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml"), Some(6)).unwrap();
        assert_eq!(config.capacity, 6);
    }

    #[test]
    fn test_file_and_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "capacity = 3").unwrap();

        let config = load_config(file.path(), None).unwrap();
        assert_eq!(config.capacity, 3);

        let err = load_config(file.path(), Some(0)).unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
    }
}
