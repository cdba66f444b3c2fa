//! Shot segmentation: loading start and racket contact.

use smash_core::{DominantHand, Error, PoseSequence, Result, ShotSegment};

use crate::config::SegmentationConfig;
use crate::signals::KinematicSignals;

/// Smallest knee-angle drop, in degrees, that counts as a bend
const KNEE_DIP_TOLERANCE_DEG: f64 = 1e-6;

/// Locates the single swing in a clip
#[derive(Debug, Clone)]
pub struct ShotSegmenter {
    config: SegmentationConfig,
}

impl ShotSegmenter {
    pub fn new(config: SegmentationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// Segment a smoothed sequence from scratch.
    pub fn segment(&self, sequence: &PoseSequence, hand: DominantHand) -> Result<ShotSegment> {
        let signals = KinematicSignals::compute(sequence, hand);
        self.segment_signals(sequence, &signals)
    }

    /// Contact is the global peak of |wrist angular velocity|; start is the
    /// deepest local minimum of the knee angle before it. Only one swing per
    /// clip is considered.
    pub fn segment_signals(
        &self,
        sequence: &PoseSequence,
        signals: &KinematicSignals,
    ) -> Result<ShotSegment> {
        if sequence.len() < self.config.min_frames {
            return Err(Error::Segmentation(format!(
                "clip has {} frames, at least {} are required",
                sequence.len(),
                self.config.min_frames
            )));
        }

        let (contact_index, peak_velocity) =
            signals.wrist_velocity.abs().peak().ok_or_else(|| {
                Error::Segmentation("no swing detected: wrist velocity undefined".into())
            })?;

        if peak_velocity <= self.config.min_wrist_velocity_dps {
            return Err(Error::Segmentation(format!(
                "no swing detected: peak wrist velocity {:.1} deg/s does not exceed {:.1} deg/s",
                peak_velocity, self.config.min_wrist_velocity_dps
            )));
        }

        let (start_index, knee_min) = contact_index
            .checked_sub(1)
            .and_then(|last| {
                signals
                    .knee_angle
                    .series
                    .local_trough_in(0..=last, KNEE_DIP_TOLERANCE_DEG)
            })
            .ok_or_else(|| {
                Error::Segmentation("no swing detected: no loading bend before contact".into())
            })?;

        if start_index >= contact_index {
            return Err(Error::Segmentation(format!(
                "start frame {} is not before contact frame {}",
                sequence.frame_number(start_index),
                sequence.frame_number(contact_index)
            )));
        }

        let segment = ShotSegment::from_indices(
            sequence,
            start_index,
            contact_index,
            self.config.follow_through_ms,
        );

        tracing::debug!(
            start_frame = segment.start_frame,
            contact_frame = segment.contact_frame,
            knee_min_deg = knee_min,
            peak_wrist_dps = peak_velocity,
            duration_ms = segment.duration_ms,
            "segmented swing"
        );

        Ok(segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::SmashClip;
    use smash_signal::{SmoothingConfig, TrajectoryPreprocessor};

    fn smoothed(clip: &SmashClip) -> PoseSequence {
        let raw = PoseSequence::from_pose_frames(&clip.frames(), clip.fps).unwrap();
        TrajectoryPreprocessor::new(SmoothingConfig::default(), 0.5)
            .unwrap()
            .smooth(&raw)
    }

    #[test]
    fn test_segments_known_swing() {
        let clip = SmashClip::default();
        let seq = smoothed(&clip);
        let segment = ShotSegmenter::new(SegmentationConfig::default())
            .segment(&seq, clip.dominant_hand)
            .unwrap();

        assert_eq!(segment.start_frame, 45);
        assert_eq!(segment.contact_frame, 78);
        assert!((segment.duration_ms - 1100.0).abs() < 1e-6);
        assert_eq!(segment.end_frame, 81);
    }

    #[test]
    fn test_left_handed_swing() {
        let clip = SmashClip {
            dominant_hand: DominantHand::Left,
            ..Default::default()
        };
        let seq = smoothed(&clip);
        let segment = ShotSegmenter::new(SegmentationConfig::default())
            .segment(&seq, DominantHand::Left)
            .unwrap();

        assert_eq!((segment.start_frame, segment.contact_frame), (45, 78));
    }

    #[test]
    fn test_still_clip_has_no_swing() {
        let seq = smoothed(&SmashClip::still());
        let result =
            ShotSegmenter::new(SegmentationConfig::default()).segment(&seq, DominantHand::Right);
        assert!(matches!(result, Err(Error::Segmentation(_))));
    }

    #[test]
    fn test_short_clip_rejected() {
        let clip = SmashClip {
            frame_count: 10,
            ..Default::default()
        };
        let seq = smoothed(&clip);
        let err = ShotSegmenter::new(SegmentationConfig::default())
            .segment(&seq, DominantHand::Right)
            .unwrap_err();
        assert!(err.to_string().contains("10 frames"));
    }

    #[test]
    fn test_knee_still_bending_at_contact_has_no_start() {
        let clip = SmashClip {
            load_frame: 95.0,
            ..Default::default()
        };
        let seq = smoothed(&clip);
        let err = ShotSegmenter::new(SegmentationConfig::default())
            .segment(&seq, clip.dominant_hand)
            .unwrap_err();
        assert!(matches!(err, Error::Segmentation(_)));
        assert!(err.to_string().contains("loading bend"));
    }

    #[test]
    fn test_start_is_local_knee_minimum() {
        let clip = SmashClip::default();
        let seq = smoothed(&clip);
        let signals = KinematicSignals::compute(&seq, clip.dominant_hand);
        let segment = ShotSegmenter::new(SegmentationConfig::default())
            .segment_signals(&seq, &signals)
            .unwrap();

        let knee = &signals.knee_angle.series;
        let i = segment.start_index;
        assert!(knee.get(i - 1).unwrap() >= knee.get(i).unwrap());
        assert!(knee.get(i + 1).unwrap() >= knee.get(i).unwrap());
    }

    #[test]
    fn test_segment_ordering_within_bounds() {
        for contact in [40.0, 60.0, 90.0] {
            let clip = SmashClip {
                load_frame: contact - 30.0,
                contact_frame: contact,
                ..Default::default()
            };
            let seq = smoothed(&clip);
            let segment = ShotSegmenter::new(SegmentationConfig::default())
                .segment(&seq, clip.dominant_hand)
                .unwrap();
            assert!(segment.start_frame < segment.contact_frame);
            assert!(segment.contact_frame <= seq.last_frame_number());
        }
    }
}
