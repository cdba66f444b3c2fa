//! Analysis pipeline configuration.

use serde::{Deserialize, Serialize};
use smash_core::{Error, Result};
use smash_signal::SmoothingConfig;

/// Complete pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Keypoints with lower visibility are treated as missing
    pub visibility_threshold: f64,

    /// Trajectory smoothing
    pub smoothing: SmoothingConfig,

    /// Swing detection
    pub segmentation: SegmentationConfig,

    /// A required joint visible in fewer frames is insufficient
    pub min_visible_frames: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Shortest clip that can contain a swing
    pub min_frames: usize,

    /// Wrist angular velocity a swing must reach (deg/s)
    pub min_wrist_velocity_dps: f64,

    /// Follow-through window after contact (ms)
    pub follow_through_ms: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            visibility_threshold: 0.5,
            smoothing: SmoothingConfig::default(),
            segmentation: SegmentationConfig::default(),
            min_visible_frames: 3,
        }
    }
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            min_frames: 15,
            min_wrist_velocity_dps: 150.0,
            follow_through_ms: 100.0,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.visibility_threshold) {
            return Err(Error::Config(format!(
                "visibility_threshold must be in [0, 1], got {}",
                self.visibility_threshold
            )));
        }
        if self.min_visible_frames == 0 {
            return Err(Error::Config("min_visible_frames must be at least 1".into()));
        }
        self.smoothing.validate()?;
        self.segmentation.validate()
    }
}

impl SegmentationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_frames < 3 {
            return Err(Error::Config(format!(
                "segmentation.min_frames must be at least 3, got {}",
                self.min_frames
            )));
        }
        if !self.min_wrist_velocity_dps.is_finite() || self.min_wrist_velocity_dps < 0.0 {
            return Err(Error::Config(format!(
                "segmentation.min_wrist_velocity_dps must be a non-negative number, got {}",
                self.min_wrist_velocity_dps
            )));
        }
        if !self.follow_through_ms.is_finite() || self.follow_through_ms < 0.0 {
            return Err(Error::Config(format!(
                "segmentation.follow_through_ms must be a non-negative number, got {}",
                self.follow_through_ms
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.smoothing.window_size, 7);
        assert_eq!(config.segmentation.min_frames, 15);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"segmentation": {"min_wrist_velocity_dps": 300.0}}"#).unwrap();
        assert_eq!(config.segmentation.min_wrist_velocity_dps, 300.0);
        assert_eq!(config.segmentation.min_frames, 15);
        assert_eq!(config.visibility_threshold, 0.5);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let config = AnalysisConfig {
            visibility_threshold: 1.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = AnalysisConfig::default();
        config.smoothing.window_size = 4;
        assert!(config.validate().is_err());
    }
}
