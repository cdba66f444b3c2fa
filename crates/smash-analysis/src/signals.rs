//! Per-frame kinematic signals derived from a smoothed pose sequence.
//!
//! Signals cover the whole clip, not only the swing window, so the segmenter
//! and the feature extractor can share them.

use nalgebra::Point2;
use smash_core::{
    angle_between, forward_axis, joint_angle, line_orientation, midpoint, wrap_degrees,
    AngleSignal, DominantHand, Joint, PoseSequence, TimeSeries,
};

/// Angle, angular-velocity and displacement series for one clip
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicSignals {
    pub fps: f64,
    pub frame_numbers: Vec<u64>,

    /// Dominant hip-knee-ankle angle
    pub knee_angle: AngleSignal,
    /// Dominant shoulder-elbow-wrist angle
    pub elbow_angle: AngleSignal,
    /// Shoulder line (left to right) against the forward axis, in [0°, 180°]
    pub shoulder_rotation: AngleSignal,
    /// Orientation of the left-to-right hip line
    pub hip_line: AngleSignal,
    /// Orientation of the left-to-right shoulder line
    pub shoulder_line: AngleSignal,
    /// Orientation of the dominant elbow-to-wrist segment
    pub forearm: AngleSignal,
    /// Signed shoulder-line minus hip-line orientation
    pub separation: TimeSeries,
    /// Vertical pixel position of the hip midpoint
    pub hip_center_y: TimeSeries,

    pub hip_velocity: TimeSeries,
    pub shoulder_velocity: TimeSeries,
    pub elbow_velocity: TimeSeries,
    pub wrist_velocity: TimeSeries,
}

impl KinematicSignals {
    pub fn compute(sequence: &PoseSequence, hand: DominantHand) -> Self {
        let fps = sequence.fps();
        let frame_numbers = sequence.frame_numbers();
        let n = sequence.len();

        let point = |i: usize, joint: Joint| sequence.point(i, joint);
        let angle_at = |a: Joint, vertex: Joint, c: Joint| -> Vec<Option<f64>> {
            (0..n)
                .map(|i| match (point(i, a), point(i, vertex), point(i, c)) {
                    (Some(a), Some(v), Some(c)) => joint_angle(&a, &v, &c),
                    _ => None,
                })
                .collect()
        };
        let orientation = |from: Joint, to: Joint| -> Vec<Option<f64>> {
            (0..n)
                .map(|i| match (point(i, from), point(i, to)) {
                    (Some(f), Some(t)) => line_orientation(&f, &t),
                    _ => None,
                })
                .collect()
        };

        let knee_angle = AngleSignal::bounded(angle_at(hand.hip(), hand.knee(), hand.ankle()));
        let elbow_angle =
            AngleSignal::bounded(angle_at(hand.shoulder(), hand.elbow(), hand.wrist()));

        let shoulder_rotation = AngleSignal::bounded(
            (0..n)
                .map(|i| match (point(i, Joint::LeftShoulder), point(i, Joint::RightShoulder)) {
                    (Some(l), Some(r)) => angle_between(&(r - l), &forward_axis()),
                    _ => None,
                })
                .collect(),
        );

        let hip_line = AngleSignal::orientation(orientation(Joint::LeftHip, Joint::RightHip));
        let shoulder_line =
            AngleSignal::orientation(orientation(Joint::LeftShoulder, Joint::RightShoulder));
        let forearm = AngleSignal::orientation(orientation(hand.elbow(), hand.wrist()));

        let separation = TimeSeries::new(
            (0..n)
                .map(|i| match (shoulder_line.get(i), hip_line.get(i)) {
                    (Some(s), Some(h)) => Some(wrap_degrees(s - h)),
                    _ => None,
                })
                .collect(),
        );

        let hip_center_y = TimeSeries::new(
            (0..n)
                .map(|i| match (point(i, Joint::LeftHip), point(i, Joint::RightHip)) {
                    (Some(l), Some(r)) => Some(hip_center(&l, &r).y),
                    _ => None,
                })
                .collect(),
        );

        let hip_velocity = hip_line.angular_velocity(&frame_numbers, fps);
        let shoulder_velocity = shoulder_line.angular_velocity(&frame_numbers, fps);
        let elbow_velocity = elbow_angle.angular_velocity(&frame_numbers, fps);
        let wrist_velocity = forearm.angular_velocity(&frame_numbers, fps);

        tracing::debug!(
            frames = n,
            knee_valid = knee_angle.series.valid_count(),
            wrist_velocity_valid = wrist_velocity.valid_count(),
            "computed kinematic signals"
        );

        Self {
            fps,
            frame_numbers,
            knee_angle,
            elbow_angle,
            shoulder_rotation,
            hip_line,
            shoulder_line,
            forearm,
            separation,
            hip_center_y,
            hip_velocity,
            shoulder_velocity,
            elbow_velocity,
            wrist_velocity,
        }
    }

    pub fn len(&self) -> usize {
        self.frame_numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame_numbers.is_empty()
    }

    pub fn frame_number(&self, index: usize) -> u64 {
        self.frame_numbers[index]
    }
}

/// Centre-of-mass proxy
fn hip_center(left: &Point2<f64>, right: &Point2<f64>) -> Point2<f64> {
    midpoint(left, right)
}
