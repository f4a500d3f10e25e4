use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FinderError, Result};
use crate::source::DEFAULT_MAX_FILE_BYTES;

/// Top-level configuration from `.cmsfinder.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Files larger than this are skipped by every rule.
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
    /// Signature names never evaluated.
    #[serde(default)]
    pub ignore: Vec<String>,
}

fn default_max_file_bytes() -> u64 {
    DEFAULT_MAX_FILE_BYTES
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            ignore: Vec::new(),
        }
    }
}

impl Config {
    /// Load config from a TOML file. Returns default if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.scan.max_file_bytes == 0 {
            return Err(FinderError::Config(
                "scan.max_file_bytes must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Generate a starter config file.
    pub fn starter_toml() -> &'static str {
        r#"# cmsfinder configuration

[scan]
# Files larger than this many bytes are skipped by every rule.
max_file_bytes = 16777216

# Signature names to skip entirely.
# ignore = ["Joomla"]
"#
    }
}
