//! Scalar feature extraction over the swing window.

use serde::{Deserialize, Serialize};
use smash_core::{Error, FeatureName, ScalarFeature, ShotSegment};

use crate::kinetic_chain::ChainTiming;
use crate::signals::KinematicSignals;

/// A feature that could not be computed for this clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingMetric {
    pub name: FeatureName,
    pub reason: String,
}

impl MissingMetric {
    fn new(name: FeatureName, reason: impl Into<String>) -> Self {
        Self {
            name,
            reason: reason.into(),
        }
    }

    pub fn to_error(&self) -> Error {
        Error::FeatureComputation {
            feature: self.name.as_str().to_string(),
            reason: self.reason.clone(),
        }
    }
}

/// Extracted features plus the ones that had to be omitted
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureSet {
    pub features: Vec<ScalarFeature>,
    pub omitted: Vec<MissingMetric>,
}

impl FeatureSet {
    pub fn get(&self, name: FeatureName) -> Option<f64> {
        self.features.iter().find(|f| f.name == name).map(|f| f.value)
    }

    fn record(&mut self, name: FeatureName, value: Result<f64, String>) {
        match value {
            Ok(v) if v.is_finite() => self.features.push(ScalarFeature::new(name, v)),
            Ok(v) => self.omitted.push(MissingMetric::new(name, format!("non-finite value {}", v))),
            Err(reason) => self.omitted.push(MissingMetric::new(name, reason)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor;

impl FeatureExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Compute every scalar feature in canonical order. Features whose
    /// joints have no valid value inside the window are omitted, never
    /// defaulted.
    pub fn extract(
        &self,
        signals: &KinematicSignals,
        segment: &ShotSegment,
        timing: &ChainTiming,
    ) -> FeatureSet {
        let window = segment.window();
        let mut set = FeatureSet::default();

        for name in FeatureName::ALL {
            let value = match name {
                FeatureName::ShoulderRotationMaxDeg => signals
                    .shoulder_rotation
                    .series
                    .peak_in(window.clone())
                    .map(|(_, v)| v)
                    .ok_or_else(|| "shoulders not visible in the swing window".to_string()),
                FeatureName::ShoulderAngularVelocityPeak => signals
                    .shoulder_velocity
                    .abs()
                    .peak_in(window.clone())
                    .map(|(_, v)| v)
                    .ok_or_else(|| "shoulder angular velocity undefined in the swing window".to_string()),
                FeatureName::HipShoulderSeparationMaxDeg => signals
                    .separation
                    .abs()
                    .peak_in(window.clone())
                    .map(|(_, v)| v)
                    .ok_or_else(|| "hip and shoulder lines not both visible".to_string()),
                FeatureName::ElbowExtensionAtContactDeg => signals
                    .elbow_angle
                    .series
                    .last_valid_at_or_before(segment.contact_index, segment.start_index)
                    .map(|(_, v)| v)
                    .ok_or_else(|| "elbow angle undefined up to contact".to_string()),
                FeatureName::ElbowAngularVelocityPeak => signals
                    .elbow_velocity
                    .abs()
                    .peak_in(window.clone())
                    .map(|(_, v)| v)
                    .ok_or_else(|| "elbow angular velocity undefined in the swing window".to_string()),
                FeatureName::WristSnapTimingOffsetPct => wrist_snap_offset(segment, timing),
                FeatureName::KneeFlexionMinDeg => signals
                    .knee_angle
                    .series
                    .trough_in(window.clone())
                    .map(|(_, v)| v)
                    .ok_or_else(|| "knee angle undefined in the swing window".to_string()),
                FeatureName::VerticalDisplacementPx => vertical_displacement(signals, segment),
                FeatureName::HipToShoulderDelayMs => timing
                    .hip_to_shoulder_delay_ms
                    .ok_or_else(|| "hip or shoulder velocity peak missing".to_string()),
                FeatureName::ShoulderToElbowDelayMs => timing
                    .shoulder_to_elbow_delay_ms
                    .ok_or_else(|| "shoulder or elbow velocity peak missing".to_string()),
                FeatureName::ElbowToWristDelayMs => timing
                    .elbow_to_wrist_delay_ms
                    .ok_or_else(|| "elbow or wrist velocity peak missing".to_string()),
                FeatureName::SwingDurationMs => Ok(segment.duration_ms),
            };
            set.record(name, value);
        }

        for missing in &set.omitted {
            tracing::warn!(error = %missing.to_error(), "feature omitted");
        }
        tracing::debug!(
            computed = set.features.len(),
            omitted = set.omitted.len(),
            "extracted features"
        );

        set
    }
}

/// Wrist peak minus elbow peak, as a share of the swing; positive when the wrist peaks later
fn wrist_snap_offset(segment: &ShotSegment, timing: &ChainTiming) -> Result<f64, String> {
    let (Some(elbow), Some(wrist)) = (timing.elbow, timing.wrist) else {
        return Err("elbow or wrist velocity peak missing".into());
    };
    if segment.total_frames == 0 {
        return Err("swing has zero length".into());
    }
    Ok((wrist.frame_number as f64 - elbow.frame_number as f64) / segment.total_frames as f64 * 100.0)
}

/// Rise of the hip midpoint above its position at the first valid window frame
fn vertical_displacement(signals: &KinematicSignals, segment: &ShotSegment) -> Result<f64, String> {
    let series = &signals.hip_center_y;
    let baseline = segment
        .window()
        .find_map(|i| series.get(i))
        .ok_or_else(|| "hips not visible in the swing window".to_string())?;
    let (_, highest) = series
        .trough_in(segment.window())
        .ok_or_else(|| "hips not visible in the swing window".to_string())?;
    // pixel y grows downward
    Ok((baseline - highest).max(0.0))
}
