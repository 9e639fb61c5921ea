//! Dashboard configuration, read from a JSON file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::color::ColorMode;
use crate::data::aggregate::DEFAULT_TOP_N;
use crate::error::ConfigurationError;

/// Environment variable pointing the viewer at a config file.
pub const CONFIG_ENV_VAR: &str = "RUSTY_PLAY_CONFIG";

/// Settings for the query pipeline and the viewer.
///
/// ```json
/// { "top_n": 10, "color_mode": { "mode": "random", "seed": 42 }, "data_path": "apps.json" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// How many apps the top-N views show.
    pub top_n: usize,

    /// Where series colours come from.
    pub color_mode: ColorMode,

    /// Dataset loaded at startup (None = wait for File → Open).
    pub data_path: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            color_mode: ColorMode::default(),
            data_path: None,
        }
    }
}

impl DashboardConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: DashboardConfig = serde_json::from_str(&text).context("parsing config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `$RUSTY_PLAY_CONFIG` if set, defaults otherwise.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.top_n == 0 {
            return Err(ConfigurationError::InvalidTopN(self.top_n));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.top_n, 10);
        assert_eq!(config.color_mode, ColorMode::Palette);
        assert!(config.data_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"color_mode": {{"mode": "random", "seed": 9}}}}"#).unwrap();
        let config = DashboardConfig::load(file.path()).unwrap();
        assert_eq!(config.top_n, 10);
        assert_eq!(config.color_mode, ColorMode::Random { seed: Some(9) });
    }

    #[test]
    fn zero_top_n_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"top_n": 0}}"#).unwrap();
        let err = DashboardConfig::load(file.path()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigurationError>(),
            Some(&ConfigurationError::InvalidTopN(0))
        );
    }
}
