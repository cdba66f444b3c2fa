//! Host configuration.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use smash_analysis::{AnalysisConfig, ReferenceProfile};

/// Prefix for environment overrides, e.g. `SMASHFORM_WORKERS=8` or
/// `SMASHFORM_ANALYSIS__SEGMENTATION__MIN_FRAMES=20`
pub const ENV_PREFIX: &str = "SMASHFORM";

/// Complete host configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Pipeline parameters
    pub analysis: AnalysisConfig,

    /// JSON reference profile; the built-in elite profile when unset
    pub reference_profile: Option<PathBuf>,

    /// Maximum clips analysed concurrently
    pub workers: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            reference_profile: None,
            workers: 4,
        }
    }
}

impl AppConfig {
    /// Load from an optional file, then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.workers == 0 {
            anyhow::bail!("workers must be at least 1");
        }
        self.analysis.validate()?;
        Ok(())
    }

    /// The configured reference profile, loaded once per process
    pub fn load_profile(&self) -> anyhow::Result<ReferenceProfile> {
        match &self.reference_profile {
            Some(path) => {
                let json = std::fs::read_to_string(path).with_context(|| {
                    format!("cannot read reference profile {}", path.display())
                })?;
                let profile = ReferenceProfile::from_json(&json)
                    .with_context(|| format!("invalid reference profile {}", path.display()))?;
                tracing::info!(path = %path.display(), entries = profile.entries().len(), "loaded reference profile");
                Ok(profile)
            }
            None => Ok(ReferenceProfile::elite_default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("smash-cli-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.workers, 4);
        assert!(config.reference_profile.is_none());
    }

    #[test]
    fn test_file_and_environment_layers() {
        let path = scratch_file(
            "config.toml",
            "workers = 2\n\n[analysis.segmentation]\nmin_frames = 20\n",
        );

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.analysis.segmentation.min_frames, 20);
        assert_eq!(config.analysis.smoothing.window_size, 7);

        std::env::set_var("SMASHFORM_ANALYSIS__VISIBILITY_THRESHOLD", "0.6");
        let config = AppConfig::load(Some(&path)).unwrap();
        std::env::remove_var("SMASHFORM_ANALYSIS__VISIBILITY_THRESHOLD");

        assert_eq!(config.analysis.visibility_threshold, 0.6);
        assert_eq!(config.analysis.segmentation.min_frames, 20);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_profile_from_file() {
        let profile = ReferenceProfile::elite_default();
        let path = scratch_file("profile.json", &profile.to_json().unwrap());
        let config = AppConfig {
            reference_profile: Some(path.clone()),
            ..Default::default()
        };
        assert_eq!(config.load_profile().unwrap(), profile);

        std::fs::write(&path, "[]").unwrap();
        assert!(config.load_profile().is_err());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config = AppConfig {
            workers: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
