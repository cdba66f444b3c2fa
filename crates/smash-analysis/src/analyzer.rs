//! End-to-end smash analysis.
//!
//! Stages run in a fixed order: input validation, visibility check,
//! smoothing, kinematic signals, segmentation, kinetic chain timing, feature
//! extraction and scoring. Any fatal error aborts the run without a partial
//! result; omitted features are reported alongside the result instead.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smash_core::{DominantHand, Error, Joint, PoseFrame, PoseSequence, Result, ShotSegment};
use smash_signal::TrajectoryPreprocessor;

use crate::config::AnalysisConfig;
use crate::features::{FeatureExtractor, MissingMetric};
use crate::kinetic_chain::KineticChainAnalyzer;
use crate::reference::ReferenceProfile;
use crate::scoring::{Metric, ReferenceComparator};
use crate::segmenter::ShotSegmenter;
use crate::signals::KinematicSignals;

/// One clip to analyse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub pose_data: Vec<PoseFrame>,
    #[serde(default)]
    pub dominant_hand: DominantHand,
    pub fps: f64,
}

/// Final output of one successful run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub technique_similarity_score: f64,
    pub shot_segment: ShotSegment,
    pub metrics: Vec<Metric>,
    pub missing_metrics: Vec<MissingMetric>,
    /// The raw input frames, unchanged
    pub pose_data: Vec<PoseFrame>,
    pub dominant_hand: DominantHand,
}

/// Runs the full pipeline against a shared reference profile
#[derive(Debug, Clone)]
pub struct SmashAnalyzer {
    config: AnalysisConfig,
    profile: Arc<ReferenceProfile>,
    preprocessor: TrajectoryPreprocessor,
    segmenter: ShotSegmenter,
    chain: KineticChainAnalyzer,
    extractor: FeatureExtractor,
    comparator: ReferenceComparator,
}

impl SmashAnalyzer {
    pub fn new(config: AnalysisConfig, profile: Arc<ReferenceProfile>) -> Result<Self> {
        config.validate()?;
        let preprocessor =
            TrajectoryPreprocessor::new(config.smoothing.clone(), config.visibility_threshold)?;
        let segmenter = ShotSegmenter::new(config.segmentation.clone());

        Ok(Self {
            config,
            profile,
            preprocessor,
            segmenter,
            chain: KineticChainAnalyzer::new(),
            extractor: FeatureExtractor::new(),
            comparator: ReferenceComparator::new(),
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn profile(&self) -> &ReferenceProfile {
        &self.profile
    }

    pub fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        let hand = request.dominant_hand;
        tracing::info!(
            frames = request.pose_data.len(),
            fps = request.fps,
            dominant_hand = %hand,
            "starting smash analysis"
        );

        let raw = PoseSequence::from_pose_frames(&request.pose_data, request.fps)?;
        self.check_visibility(&raw, hand)?;

        let smoothed = self.preprocessor.smooth(&raw);
        let signals = KinematicSignals::compute(&smoothed, hand);
        let segment = self.segmenter.segment_signals(&smoothed, &signals)?;
        let timing = self.chain.analyze(&signals, &segment);
        let feature_set = self.extractor.extract(&signals, &segment, &timing);
        let report = self.comparator.score(&feature_set.features, &self.profile)?;

        tracing::info!(
            score = report.technique_similarity_score,
            start_frame = segment.start_frame,
            contact_frame = segment.contact_frame,
            missing = feature_set.omitted.len(),
            "smash analysis complete"
        );

        Ok(AnalysisResult {
            technique_similarity_score: report.technique_similarity_score,
            shot_segment: segment,
            metrics: report.metrics,
            missing_metrics: feature_set.omitted,
            pose_data: request.pose_data.clone(),
            dominant_hand: hand,
        })
    }

    /// Joints the segmenter cannot work without
    fn required_joints(hand: DominantHand) -> [Joint; 5] {
        [hand.hip(), hand.knee(), hand.ankle(), hand.elbow(), hand.wrist()]
    }

    fn check_visibility(&self, sequence: &PoseSequence, hand: DominantHand) -> Result<()> {
        let insufficient: Vec<Joint> = Self::required_joints(hand)
            .into_iter()
            .filter(|&joint| {
                sequence.visible_count(joint, self.config.visibility_threshold)
                    < self.config.min_visible_frames
            })
            .collect();

        if insufficient.is_empty() {
            Ok(())
        } else {
            Err(Error::InsufficientVisibility {
                joints: insufficient,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Severity;
    use crate::synthetic::SmashClip;
    use smash_core::{ErrorKind, FeatureName, Unit};
    use smash_signal::SmoothingConfig;

    fn analyzer() -> SmashAnalyzer {
        SmashAnalyzer::new(
            AnalysisConfig::default(),
            Arc::new(ReferenceProfile::elite_default()),
        )
        .unwrap()
    }

    #[test]
    fn test_full_run_on_synthetic_swing() {
        let request = SmashClip::default().request();
        let result = analyzer().analyze(&request).unwrap();

        assert_eq!(result.shot_segment.start_frame, 45);
        assert_eq!(result.shot_segment.contact_frame, 78);
        assert!((result.shot_segment.duration_ms - 1100.0).abs() < 1e-6);
        assert!((0.0..=100.0).contains(&result.technique_similarity_score));
        assert_eq!(result.metrics.len(), 12);
        assert!(result.missing_metrics.is_empty());
        assert_eq!(result.pose_data, request.pose_data);
        assert_eq!(result.dominant_hand, DominantHand::Right);

        for metric in &result.metrics {
            assert_eq!(
                metric.severity,
                Severity::from_difference_percent(metric.difference_percent)
            );
        }
    }

    #[test]
    fn test_runs_are_deterministic() {
        let request = SmashClip::default().request();
        let analyzer = analyzer();
        let first = analyzer.analyze(&request).unwrap();
        let second = analyzer.analyze(&request).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_still_clip_fails_segmentation() {
        let err = analyzer().analyze(&SmashClip::still().request()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Segmentation);
    }

    #[test]
    fn test_invisible_clip_fails_visibility_first() {
        let clip = SmashClip {
            visibility: 0.1,
            ..Default::default()
        };
        let err = analyzer().analyze(&clip.request()).unwrap_err();
        match err {
            Error::InsufficientVisibility { joints } => {
                assert!(joints.contains(&Joint::RightWrist));
                assert!(joints.contains(&Joint::RightKnee));
            }
            other => panic!("expected visibility error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_input_rejected() {
        let mut request = SmashClip::default().request();
        request.pose_data.swap(3, 4);
        let err = analyzer().analyze(&request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputShape);

        request.pose_data.clear();
        assert_eq!(
            analyzer().analyze(&request).unwrap_err().kind(),
            ErrorKind::InputShape
        );
    }

    #[test]
    fn test_omitted_metric_reported_and_score_renormalised() {
        let mut request = SmashClip::default().request();
        for frame in &mut request.pose_data {
            frame.keypoints.remove("left_hip");
        }
        let result = analyzer().analyze(&request).unwrap();

        let missing: Vec<FeatureName> = result.missing_metrics.iter().map(|m| m.name).collect();
        assert!(missing.contains(&FeatureName::HipShoulderSeparationMaxDeg));
        assert!(missing.contains(&FeatureName::VerticalDisplacementPx));
        assert!(missing.contains(&FeatureName::HipToShoulderDelayMs));
        assert_eq!(result.metrics.len() + result.missing_metrics.len(), 12);
        assert!((0.0..=100.0).contains(&result.technique_similarity_score));
    }

    #[test]
    fn test_smoothing_preserves_features_of_smooth_motion() {
        // slow, noise-free motion: the filter should leave features unchanged
        let clip = SmashClip {
            tempo: 8.0,
            ..Default::default()
        };
        let hand = clip.dominant_hand;
        let raw = PoseSequence::from_pose_frames(&clip.frames(), clip.fps).unwrap();
        let mut config = AnalysisConfig::default();
        config.segmentation.min_wrist_velocity_dps = 50.0;

        let run = |sequence: &PoseSequence| {
            let signals = KinematicSignals::compute(sequence, hand);
            let segment = ShotSegmenter::new(config.segmentation.clone())
                .segment_signals(sequence, &signals)
                .unwrap();
            let timing = KineticChainAnalyzer::new().analyze(&signals, &segment);
            (segment.clone(), FeatureExtractor::new().extract(&signals, &segment, &timing))
        };

        let smoothed = TrajectoryPreprocessor::new(SmoothingConfig::default(), 0.5)
            .unwrap()
            .smooth(&raw);
        let (raw_segment, raw_set) = run(&raw);
        let (smooth_segment, smooth_set) = run(&smoothed);

        assert_eq!(raw_segment, smooth_segment);
        assert_eq!(raw_set.features.len(), smooth_set.features.len());

        let frame_ms = 1000.0 / clip.fps;
        let frame_pct = 100.0 / raw_segment.total_frames as f64;
        for (a, b) in raw_set.features.iter().zip(&smooth_set.features) {
            assert_eq!(a.name, b.name);
            let tolerance = match a.unit {
                Unit::Milliseconds => frame_ms + 1e-6,
                Unit::Percent => frame_pct + 1e-6,
                _ => 0.5 + 0.01 * a.value.abs(),
            };
            assert!(
                (a.value - b.value).abs() <= tolerance,
                "{}: raw {} vs smoothed {}",
                a.name,
                a.value,
                b.value
            );
        }
    }

    #[test]
    fn test_result_serialises_with_wire_names() {
        let result = analyzer().analyze(&SmashClip::default().request()).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert!(json["technique_similarity_score"].is_number());
        assert_eq!(json["shot_segment"]["start_frame"], 45);
        assert_eq!(json["dominant_hand"], "right");
        let metric = &json["metrics"][0];
        assert_eq!(metric["name"], "shoulder_rotation_max_deg");
        assert!(["low", "medium", "high"].contains(&metric["severity"].as_str().unwrap()));
        assert!(json["pose_data"][0]["keypoints"]["right_wrist"]["visibility"].is_number());
    }
}
