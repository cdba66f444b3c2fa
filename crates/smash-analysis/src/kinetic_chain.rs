//! Kinetic chain timing: hip → shoulder → elbow → wrist peak-velocity delays.

use serde::{Deserialize, Serialize};
use smash_core::{ShotSegment, TimeSeries};

use crate::signals::KinematicSignals;

/// Peak angular speed of one body segment inside the swing window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityPeak {
    #[serde(skip)]
    pub index: usize,
    pub frame_number: u64,
    /// |ω| at the peak, deg/s
    pub speed_dps: f64,
}

/// Per-segment peaks and the signed delays between neighbours
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainTiming {
    pub hip: Option<VelocityPeak>,
    pub shoulder: Option<VelocityPeak>,
    pub elbow: Option<VelocityPeak>,
    pub wrist: Option<VelocityPeak>,
    pub hip_to_shoulder_delay_ms: Option<f64>,
    pub shoulder_to_elbow_delay_ms: Option<f64>,
    pub elbow_to_wrist_delay_ms: Option<f64>,
}

impl ChainTiming {
    /// True when every delay is known and non-negative
    pub fn is_proximal_to_distal(&self) -> bool {
        [
            self.hip_to_shoulder_delay_ms,
            self.shoulder_to_elbow_delay_ms,
            self.elbow_to_wrist_delay_ms,
        ]
        .iter()
        .all(|d| d.is_some_and(|d| d >= 0.0))
    }
}

#[derive(Debug, Clone, Default)]
pub struct KineticChainAnalyzer;

impl KineticChainAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Locate each segment's peak independently within `[start, contact]`.
    /// Negative delays are reported as-is.
    pub fn analyze(&self, signals: &KinematicSignals, segment: &ShotSegment) -> ChainTiming {
        let peak = |velocity: &TimeSeries| {
            velocity
                .abs()
                .peak_in(segment.window())
                .map(|(index, speed_dps)| VelocityPeak {
                    index,
                    frame_number: signals.frame_number(index),
                    speed_dps,
                })
        };

        let hip = peak(&signals.hip_velocity);
        let shoulder = peak(&signals.shoulder_velocity);
        let elbow = peak(&signals.elbow_velocity);
        let wrist = peak(&signals.wrist_velocity);

        let delay = |earlier: Option<VelocityPeak>, later: Option<VelocityPeak>| {
            Some(
                (later?.frame_number as f64 - earlier?.frame_number as f64) / signals.fps * 1000.0,
            )
        };

        let timing = ChainTiming {
            hip,
            shoulder,
            elbow,
            wrist,
            hip_to_shoulder_delay_ms: delay(hip, shoulder),
            shoulder_to_elbow_delay_ms: delay(shoulder, elbow),
            elbow_to_wrist_delay_ms: delay(elbow, wrist),
        };

        if timing.is_proximal_to_distal() {
            tracing::debug!(
                hip_to_shoulder_ms = ?timing.hip_to_shoulder_delay_ms,
                shoulder_to_elbow_ms = ?timing.shoulder_to_elbow_delay_ms,
                elbow_to_wrist_ms = ?timing.elbow_to_wrist_delay_ms,
                "kinetic chain timing"
            );
        } else {
            tracing::warn!(
                hip_to_shoulder_ms = ?timing.hip_to_shoulder_delay_ms,
                shoulder_to_elbow_ms = ?timing.shoulder_to_elbow_delay_ms,
                elbow_to_wrist_ms = ?timing.elbow_to_wrist_delay_ms,
                "kinetic chain is not proximal-to-distal"
            );
        }

        timing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smash_core::{AngleSignal, PoseSequence, SkeletalFrame};

    /// Velocity spike of height 100 at `at`, zero elsewhere
    fn spike(n: usize, at: usize) -> TimeSeries {
        TimeSeries::new((0..n).map(|i| Some(if i == at { 100.0 } else { 0.0 })).collect())
    }

    fn signals_with_peaks(hip: usize, shoulder: usize, elbow: usize, wrist: usize) -> KinematicSignals {
        let n = 40;
        let empty = AngleSignal::bounded(vec![None; n]);
        KinematicSignals {
            fps: 30.0,
            frame_numbers: (0..n as u64).collect(),
            knee_angle: empty.clone(),
            elbow_angle: empty.clone(),
            shoulder_rotation: empty.clone(),
            hip_line: empty.clone(),
            shoulder_line: empty.clone(),
            forearm: empty,
            separation: TimeSeries::new(vec![None; n]),
            hip_center_y: TimeSeries::new(vec![None; n]),
            hip_velocity: spike(n, hip),
            shoulder_velocity: spike(n, shoulder),
            elbow_velocity: spike(n, elbow),
            wrist_velocity: spike(n, wrist),
        }
    }

    fn segment(start: usize, contact: usize) -> ShotSegment {
        let frames = (0..40).map(SkeletalFrame::new).collect();
        let seq = PoseSequence::new(frames, 30.0).unwrap();
        ShotSegment::from_indices(&seq, start, contact, 100.0)
    }

    #[test]
    fn test_proximal_to_distal_delays() {
        let signals = signals_with_peaks(10, 13, 16, 18);
        let timing = KineticChainAnalyzer::new().analyze(&signals, &segment(5, 20));

        assert!((timing.hip_to_shoulder_delay_ms.unwrap() - 100.0).abs() < 1e-9);
        assert!((timing.shoulder_to_elbow_delay_ms.unwrap() - 100.0).abs() < 1e-9);
        assert!((timing.elbow_to_wrist_delay_ms.unwrap() - 2000.0 / 30.0).abs() < 1e-9);
        assert!(timing.is_proximal_to_distal());
    }

    #[test]
    fn test_negative_delay_reported() {
        let signals = signals_with_peaks(10, 13, 17, 15);
        let timing = KineticChainAnalyzer::new().analyze(&signals, &segment(5, 20));

        assert!((timing.elbow_to_wrist_delay_ms.unwrap() + 2000.0 / 30.0).abs() < 1e-9);
        assert!(!timing.is_proximal_to_distal());
    }

    #[test]
    fn test_peaks_outside_window_ignored() {
        // hip peak before the window: the in-window maximum is an earliest zero
        let signals = signals_with_peaks(2, 13, 16, 18);
        let timing = KineticChainAnalyzer::new().analyze(&signals, &segment(5, 20));
        assert_eq!(timing.hip.unwrap().frame_number, 5);
        assert_eq!(timing.hip.unwrap().speed_dps, 0.0);
    }

    #[test]
    fn test_missing_segment_gives_no_delay() {
        let mut signals = signals_with_peaks(10, 13, 16, 18);
        signals.elbow_velocity = TimeSeries::new(vec![None; 40]);
        let timing = KineticChainAnalyzer::new().analyze(&signals, &segment(5, 20));

        assert!(timing.elbow.is_none());
        assert!(timing.shoulder_to_elbow_delay_ms.is_none());
        assert!(timing.elbow_to_wrist_delay_ms.is_none());
        assert!(timing.hip_to_shoulder_delay_ms.is_some());
    }
}
