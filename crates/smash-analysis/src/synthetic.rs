//! Synthetic side-view smash clips.
//!
//! Trajectories are built from closed-form curves so the loading bend, the
//! kinetic-chain peaks and the contact frame sit at known frames. Used by the
//! test suites of this workspace and by the benchmarks.

use std::collections::BTreeMap;

use nalgebra::{Point2, Vector2};
use smash_core::{DominantHand, Joint, Keypoint, PoseFrame};

use crate::analyzer::AnalysisRequest;

/// Parameters of a generated clip
#[derive(Debug, Clone, PartialEq)]
pub struct SmashClip {
    pub frame_count: u64,
    pub fps: f64,
    pub dominant_hand: DominantHand,
    /// Visibility assigned to every keypoint
    pub visibility: f64,
    /// Frame of the deepest knee bend
    pub load_frame: f64,
    /// Frame of peak forearm angular velocity
    pub contact_frame: f64,
    /// Time scale of the rotations, in frames; larger is slower
    pub tempo: f64,
    /// No motion at all
    pub still: bool,
}

impl Default for SmashClip {
    fn default() -> Self {
        Self {
            frame_count: 100,
            fps: 30.0,
            dominant_hand: DominantHand::Right,
            visibility: 0.95,
            load_frame: 45.0,
            contact_frame: 78.0,
            tempo: 3.0,
            still: false,
        }
    }
}

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn direction(degrees: f64) -> Vector2<f64> {
    let r = degrees.to_radians();
    Vector2::new(r.cos(), r.sin())
}

impl SmashClip {
    pub fn still() -> Self {
        Self {
            still: true,
            ..Default::default()
        }
    }

    /// Logistic step from 0 to 1 centred on `centre`
    fn ramp(&self, t: f64, centre: f64) -> f64 {
        if self.still {
            0.0
        } else {
            logistic((t - centre) / self.tempo)
        }
    }

    fn pose_at(&self, t: f64) -> Vec<(Joint, Point2<f64>)> {
        let hand = self.dominant_hand;
        let contact = self.contact_frame;

        let knee_angle = if self.still {
            170.0
        } else {
            170.0 - 40.0 * (-((t - self.load_frame) / 8.0).powi(2)).exp()
        };
        let hip_line = 140.0 - 100.0 * self.ramp(t, contact - 11.0);
        let shoulder_line = 150.0 - 120.0 * self.ramp(t, contact - 8.0);
        let elbow_angle = 70.0 + 100.0 * self.ramp(t, contact - 4.0);
        let forearm = -90.0 + 180.0 * self.ramp(t, contact);
        let upper_arm = forearm + elbow_angle - 180.0;
        let lift = 30.0 * self.ramp(t, contact - 6.0);

        let alpha = knee_angle.to_radians();
        let knee = Point2::new(300.0, 400.0 - lift);
        let ankle = knee + Vector2::new(0.0, 100.0);
        let hip = knee + 100.0 * Vector2::new(alpha.sin(), alpha.cos());

        let hip_vec = 30.0 * direction(hip_line);
        let (left_hip, right_hip) = match hand {
            DominantHand::Right => (hip - hip_vec, hip),
            DominantHand::Left => (hip, hip + hip_vec),
        };
        let hip_mid = nalgebra::center(&left_hip, &right_hip);

        let shoulder_mid = hip_mid + Vector2::new(0.0, -160.0);
        let shoulder_half = 20.0 * direction(shoulder_line);
        let left_shoulder = shoulder_mid - shoulder_half;
        let right_shoulder = shoulder_mid + shoulder_half;
        let (shoulder, off_shoulder) = match hand {
            DominantHand::Right => (right_shoulder, left_shoulder),
            DominantHand::Left => (left_shoulder, right_shoulder),
        };

        let elbow = shoulder + 70.0 * direction(upper_arm);
        let wrist = elbow + 60.0 * direction(forearm);
        let off_elbow = off_shoulder + Vector2::new(0.0, 70.0);
        let off_wrist = off_elbow + Vector2::new(0.0, 60.0);
        let off_knee = knee + Vector2::new(-25.0, 0.0);
        let off_ankle = ankle + Vector2::new(-25.0, 0.0);

        let off = hand.opposite();
        vec![
            (Joint::LeftShoulder, left_shoulder),
            (Joint::RightShoulder, right_shoulder),
            (Joint::LeftHip, left_hip),
            (Joint::RightHip, right_hip),
            (hand.elbow(), elbow),
            (hand.wrist(), wrist),
            (hand.knee(), knee),
            (hand.ankle(), ankle),
            (off.elbow(), off_elbow),
            (off.wrist(), off_wrist),
            (off.knee(), off_knee),
            (off.ankle(), off_ankle),
        ]
    }

    pub fn frames(&self) -> Vec<PoseFrame> {
        (0..self.frame_count)
            .map(|n| {
                let keypoints: BTreeMap<String, Keypoint> = self
                    .pose_at(n as f64)
                    .into_iter()
                    .map(|(joint, p)| {
                        (joint.name().to_string(), Keypoint::new(p.x, p.y, self.visibility))
                    })
                    .collect();
                PoseFrame {
                    frame_number: n,
                    keypoints,
                }
            })
            .collect()
    }

    pub fn request(&self) -> AnalysisRequest {
        AnalysisRequest {
            pose_data: self.frames(),
            dominant_hand: self.dominant_hand,
            fps: self.fps,
        }
    }
}
