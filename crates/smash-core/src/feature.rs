//! Scalar biomechanical features and their fixed metadata.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Measurement unit, fixed per feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "degrees")]
    Degrees,
    #[serde(rename = "deg/s")]
    DegreesPerSecond,
    #[serde(rename = "ms")]
    Milliseconds,
    #[serde(rename = "pixels")]
    Pixels,
    #[serde(rename = "%")]
    Percent,
}

impl Unit {
    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Degrees => "degrees",
            Unit::DegreesPerSecond => "deg/s",
            Unit::Milliseconds => "ms",
            Unit::Pixels => "pixels",
            Unit::Percent => "%",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation grouping of metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricCategory {
    RotationPower,
    ArmMechanics,
    LowerBody,
    Timing,
}

/// The twelve scalar features computed per run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureName {
    ShoulderRotationMaxDeg,
    ShoulderAngularVelocityPeak,
    HipShoulderSeparationMaxDeg,
    ElbowExtensionAtContactDeg,
    ElbowAngularVelocityPeak,
    WristSnapTimingOffsetPct,
    KneeFlexionMinDeg,
    VerticalDisplacementPx,
    HipToShoulderDelayMs,
    ShoulderToElbowDelayMs,
    ElbowToWristDelayMs,
    SwingDurationMs,
}

impl FeatureName {
    /// Canonical order: grouped by category
    pub const ALL: [FeatureName; 12] = [
        FeatureName::ShoulderRotationMaxDeg,
        FeatureName::ShoulderAngularVelocityPeak,
        FeatureName::HipShoulderSeparationMaxDeg,
        FeatureName::ElbowExtensionAtContactDeg,
        FeatureName::ElbowAngularVelocityPeak,
        FeatureName::WristSnapTimingOffsetPct,
        FeatureName::KneeFlexionMinDeg,
        FeatureName::VerticalDisplacementPx,
        FeatureName::HipToShoulderDelayMs,
        FeatureName::ShoulderToElbowDelayMs,
        FeatureName::ElbowToWristDelayMs,
        FeatureName::SwingDurationMs,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FeatureName::ShoulderRotationMaxDeg => "shoulder_rotation_max_deg",
            FeatureName::ShoulderAngularVelocityPeak => "shoulder_angular_velocity_peak",
            FeatureName::HipShoulderSeparationMaxDeg => "hip_shoulder_separation_max_deg",
            FeatureName::ElbowExtensionAtContactDeg => "elbow_extension_at_contact_deg",
            FeatureName::ElbowAngularVelocityPeak => "elbow_angular_velocity_peak",
            FeatureName::WristSnapTimingOffsetPct => "wrist_snap_timing_offset_pct",
            FeatureName::KneeFlexionMinDeg => "knee_flexion_min_deg",
            FeatureName::VerticalDisplacementPx => "vertical_displacement_px",
            FeatureName::HipToShoulderDelayMs => "hip_to_shoulder_delay_ms",
            FeatureName::ShoulderToElbowDelayMs => "shoulder_to_elbow_delay_ms",
            FeatureName::ElbowToWristDelayMs => "elbow_to_wrist_delay_ms",
            FeatureName::SwingDurationMs => "swing_duration_ms",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.as_str() == name)
    }

    pub fn unit(self) -> Unit {
        match self {
            FeatureName::ShoulderRotationMaxDeg
            | FeatureName::HipShoulderSeparationMaxDeg
            | FeatureName::ElbowExtensionAtContactDeg
            | FeatureName::KneeFlexionMinDeg => Unit::Degrees,
            FeatureName::ShoulderAngularVelocityPeak | FeatureName::ElbowAngularVelocityPeak => {
                Unit::DegreesPerSecond
            }
            FeatureName::WristSnapTimingOffsetPct => Unit::Percent,
            FeatureName::VerticalDisplacementPx => Unit::Pixels,
            FeatureName::HipToShoulderDelayMs
            | FeatureName::ShoulderToElbowDelayMs
            | FeatureName::ElbowToWristDelayMs
            | FeatureName::SwingDurationMs => Unit::Milliseconds,
        }
    }

    pub fn category(self) -> MetricCategory {
        match self {
            FeatureName::ShoulderRotationMaxDeg
            | FeatureName::ShoulderAngularVelocityPeak
            | FeatureName::HipShoulderSeparationMaxDeg => MetricCategory::RotationPower,
            FeatureName::ElbowExtensionAtContactDeg
            | FeatureName::ElbowAngularVelocityPeak
            | FeatureName::WristSnapTimingOffsetPct => MetricCategory::ArmMechanics,
            FeatureName::KneeFlexionMinDeg | FeatureName::VerticalDisplacementPx => {
                MetricCategory::LowerBody
            }
            FeatureName::HipToShoulderDelayMs
            | FeatureName::ShoulderToElbowDelayMs
            | FeatureName::ElbowToWristDelayMs
            | FeatureName::SwingDurationMs => MetricCategory::Timing,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            FeatureName::ShoulderRotationMaxDeg => "Shoulder Rotation",
            FeatureName::ShoulderAngularVelocityPeak => "Shoulder Angular Velocity",
            FeatureName::HipShoulderSeparationMaxDeg => "Hip-Shoulder Separation",
            FeatureName::ElbowExtensionAtContactDeg => "Elbow Extension",
            FeatureName::ElbowAngularVelocityPeak => "Elbow Angular Velocity",
            FeatureName::WristSnapTimingOffsetPct => "Wrist Snap Timing",
            FeatureName::KneeFlexionMinDeg => "Knee Flexion",
            FeatureName::VerticalDisplacementPx => "Vertical Displacement",
            FeatureName::HipToShoulderDelayMs => "Hip-Shoulder Delay",
            FeatureName::ShoulderToElbowDelayMs => "Shoulder-Elbow Delay",
            FeatureName::ElbowToWristDelayMs => "Elbow-Wrist Delay",
            FeatureName::SwingDurationMs => "Swing Duration",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            FeatureName::ShoulderRotationMaxDeg => {
                "Maximum shoulder rotation during the swing. Greater rotation stores more energy."
            }
            FeatureName::ShoulderAngularVelocityPeak => {
                "Peak rotational speed of the shoulders during the swing."
            }
            FeatureName::HipShoulderSeparationMaxDeg => {
                "Angular difference between the hip and shoulder lines. More separation means more power potential."
            }
            FeatureName::ElbowExtensionAtContactDeg => {
                "Elbow angle at contact. Should be nearly extended but not locked."
            }
            FeatureName::ElbowAngularVelocityPeak => {
                "Speed of elbow extension. Higher means more power."
            }
            FeatureName::WristSnapTimingOffsetPct => {
                "When the wrist peaks relative to the elbow, as a share of the swing. Positive means after the elbow."
            }
            FeatureName::KneeFlexionMinDeg => {
                "Deepest knee bend during loading. Around 120 degrees gives power without losing stability."
            }
            FeatureName::VerticalDisplacementPx => {
                "How far the hips rise during the swing (jump smash component)."
            }
            FeatureName::HipToShoulderDelayMs => {
                "Time between hip and shoulder peak rotation speed. Proper sequencing is 20-30 ms."
            }
            FeatureName::ShoulderToElbowDelayMs => {
                "Time between shoulder and elbow peak velocity."
            }
            FeatureName::ElbowToWristDelayMs => "Time between elbow and wrist peak velocity.",
            FeatureName::SwingDurationMs => {
                "Time from deepest knee bend to contact. Too fast loses power, too slow telegraphs the shot."
            }
        }
    }
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One computed biomechanical quantity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalarFeature {
    pub name: FeatureName,
    pub value: f64,
    pub unit: Unit,
}

impl ScalarFeature {
    /// Unit is taken from the feature's fixed metadata.
    pub fn new(name: FeatureName, value: f64) -> Self {
        Self {
            name,
            value,
            unit: name.unit(),
        }
    }
}
