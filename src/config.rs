use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Settings for a convolution run.
///
/// Read from an optional JSON file; command-line flags override individual
/// fields.
///
/// ```json
/// { "reference_dir": "srf", "output_dir": "out", "threads": 4 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Directory holding the SRF and bandpass CSV files.
    pub reference_dir: Option<PathBuf>,
    /// Where to persist output tables; nothing is written when unset.
    pub output_dir: Option<PathBuf>,
    /// Worker threads for the per-observation pool (rayon default when unset).
    pub threads: Option<usize>,
}

impl RunConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Fields set in `other` win.
    pub fn merge(self, other: RunConfig) -> RunConfig {
        RunConfig {
            reference_dir: other.reference_dir.or(self.reference_dir),
            output_dir: other.output_dir.or(self.output_dir),
            threads: other.threads.or(self.threads),
        }
    }

    /// Check the settings and return the reference directory.
    pub fn validate(&self) -> Result<&Path> {
        let Some(dir) = self.reference_dir.as_deref() else {
            bail!("no reference directory given (use --reference-dir or the config file)");
        };
        if !dir.is_dir() {
            bail!("reference directory {} does not exist", dir.display());
        }
        if self.threads == Some(0) {
            bail!("threads must be at least 1");
        }
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_file_values() {
        let file = RunConfig {
            reference_dir: Some("srf".into()),
            output_dir: Some("out".into()),
            threads: Some(2),
        };
        let flags = RunConfig {
            output_dir: Some("elsewhere".into()),
            ..Default::default()
        };
        let merged = file.merge(flags);
        assert_eq!(merged.reference_dir, Some(PathBuf::from("srf")));
        assert_eq!(merged.output_dir, Some(PathBuf::from("elsewhere")));
        assert_eq!(merged.threads, Some(2));
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: RunConfig = serde_json::from_str(r#"{"threads": 8}"#).unwrap();
        assert_eq!(config.threads, Some(8));
        assert!(config.reference_dir.is_none());
        assert!(serde_json::from_str::<RunConfig>(r#"{"thread": 8}"#).is_err());
    }

    #[test]
    fn validate_requires_existing_reference_dir() {
        assert!(RunConfig::default().validate().is_err());
        let dir = tempfile::TempDir::new().unwrap();
        let config = RunConfig {
            reference_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap(), dir.path());
    }
}
