//! Fundamental pose types for side-view smash analysis.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The 12 tracked joints (left/right shoulders, elbows, wrists, hips, knees, ankles)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Joint {
    LeftShoulder = 0,
    RightShoulder = 1,
    LeftElbow = 2,
    RightElbow = 3,
    LeftWrist = 4,
    RightWrist = 5,
    LeftHip = 6,
    RightHip = 7,
    LeftKnee = 8,
    RightKnee = 9,
    LeftAnkle = 10,
    RightAnkle = 11,
}

impl Joint {
    pub const COUNT: usize = 12;

    pub const ALL: [Joint; Joint::COUNT] = [
        Joint::LeftShoulder,
        Joint::RightShoulder,
        Joint::LeftElbow,
        Joint::RightElbow,
        Joint::LeftWrist,
        Joint::RightWrist,
        Joint::LeftHip,
        Joint::RightHip,
        Joint::LeftKnee,
        Joint::RightKnee,
        Joint::LeftAnkle,
        Joint::RightAnkle,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Joint::LeftShoulder => "left_shoulder",
            Joint::RightShoulder => "right_shoulder",
            Joint::LeftElbow => "left_elbow",
            Joint::RightElbow => "right_elbow",
            Joint::LeftWrist => "left_wrist",
            Joint::RightWrist => "right_wrist",
            Joint::LeftHip => "left_hip",
            Joint::RightHip => "right_hip",
            Joint::LeftKnee => "left_knee",
            Joint::RightKnee => "right_knee",
            Joint::LeftAnkle => "left_ankle",
            Joint::RightAnkle => "right_ankle",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|j| j.name() == name)
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Racket hand; selects which body side the side-specific features use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DominantHand {
    Left,
    #[default]
    Right,
}

impl DominantHand {
    pub fn as_str(self) -> &'static str {
        match self {
            DominantHand::Left => "left",
            DominantHand::Right => "right",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            DominantHand::Left => DominantHand::Right,
            DominantHand::Right => DominantHand::Left,
        }
    }

    pub fn shoulder(self) -> Joint {
        self.pick(Joint::LeftShoulder, Joint::RightShoulder)
    }

    pub fn elbow(self) -> Joint {
        self.pick(Joint::LeftElbow, Joint::RightElbow)
    }

    pub fn wrist(self) -> Joint {
        self.pick(Joint::LeftWrist, Joint::RightWrist)
    }

    pub fn hip(self) -> Joint {
        self.pick(Joint::LeftHip, Joint::RightHip)
    }

    pub fn knee(self) -> Joint {
        self.pick(Joint::LeftKnee, Joint::RightKnee)
    }

    pub fn ankle(self) -> Joint {
        self.pick(Joint::LeftAnkle, Joint::RightAnkle)
    }

    fn pick(self, left: Joint, right: Joint) -> Joint {
        match self {
            DominantHand::Left => left,
            DominantHand::Right => right,
        }
    }
}

impl FromStr for DominantHand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(DominantHand::Left),
            "right" => Ok(DominantHand::Right),
            other => Err(Error::InputShape(format!(
                "dominant_hand must be 'left' or 'right', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for DominantHand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One joint detection in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f64,
    pub y: f64,
    /// Detection confidence in [0, 1]
    pub visibility: f64,
}

impl Keypoint {
    pub fn new(x: f64, y: f64, visibility: f64) -> Self {
        Self { x, y, visibility }
    }

    pub fn position(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    pub fn is_visible(&self, threshold: f64) -> bool {
        self.visibility >= threshold
    }
}

/// Wire shape of a single frame as produced by the pose estimator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseFrame {
    pub frame_number: u64,
    pub keypoints: BTreeMap<String, Keypoint>,
}

/// Validated frame with a slot per known joint
#[derive(Debug, Clone, PartialEq)]
pub struct SkeletalFrame {
    pub frame_number: u64,
    pub joints: [Option<Keypoint>; Joint::COUNT],
}

impl SkeletalFrame {
    pub fn new(frame_number: u64) -> Self {
        Self {
            frame_number,
            joints: [None; Joint::COUNT],
        }
    }

    pub fn with(mut self, joint: Joint, keypoint: Keypoint) -> Self {
        self.joints[joint.index()] = Some(keypoint);
        self
    }

    pub fn get(&self, joint: Joint) -> Option<&Keypoint> {
        self.joints[joint.index()].as_ref()
    }

    fn to_pose_frame(&self) -> PoseFrame {
        let keypoints = Joint::ALL
            .iter()
            .filter_map(|&j| self.get(j).map(|kp| (j.name().to_string(), *kp)))
            .collect();
        PoseFrame {
            frame_number: self.frame_number,
            keypoints,
        }
    }
}

/// Ordered per-frame trajectory of one clip at a fixed frame rate
#[derive(Debug, Clone, PartialEq)]
pub struct PoseSequence {
    fps: f64,
    frames: Vec<SkeletalFrame>,
}

impl PoseSequence {
    /// Validate wire frames: non-empty, strictly increasing frame numbers,
    /// known joint names, finite coordinates and visibility in [0, 1].
    pub fn from_pose_frames(frames: &[PoseFrame], fps: f64) -> Result<Self> {
        let mut skeletal = Vec::with_capacity(frames.len());

        for frame in frames {
            let mut out = SkeletalFrame::new(frame.frame_number);
            for (name, kp) in &frame.keypoints {
                let joint = Joint::from_name(name).ok_or_else(|| {
                    Error::InputShape(format!(
                        "unknown joint '{}' in frame {}",
                        name, frame.frame_number
                    ))
                })?;
                if !kp.x.is_finite() || !kp.y.is_finite() {
                    return Err(Error::InputShape(format!(
                        "non-finite position for {} in frame {}",
                        name, frame.frame_number
                    )));
                }
                if !(0.0..=1.0).contains(&kp.visibility) {
                    return Err(Error::InputShape(format!(
                        "visibility {} for {} in frame {} is outside [0, 1]",
                        kp.visibility, name, frame.frame_number
                    )));
                }
                out.joints[joint.index()] = Some(*kp);
            }
            skeletal.push(out);
        }

        Self::new(skeletal, fps)
    }

    pub fn new(frames: Vec<SkeletalFrame>, fps: f64) -> Result<Self> {
        if frames.is_empty() {
            return Err(Error::InputShape("pose sequence is empty".into()));
        }
        if !fps.is_finite() || fps <= 0.0 {
            return Err(Error::InputShape(format!("invalid frame rate {}", fps)));
        }
        if let Some(w) = frames
            .windows(2)
            .find(|w| w[1].frame_number <= w[0].frame_number)
        {
            return Err(Error::InputShape(format!(
                "frame numbers must be strictly increasing: {} followed by {}",
                w[0].frame_number, w[1].frame_number
            )));
        }

        Ok(Self { fps, frames })
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[SkeletalFrame] {
        &self.frames
    }

    pub fn frame_number(&self, index: usize) -> u64 {
        self.frames[index].frame_number
    }

    pub fn frame_numbers(&self) -> Vec<u64> {
        self.frames.iter().map(|f| f.frame_number).collect()
    }

    pub fn last_frame_number(&self) -> u64 {
        self.frames.last().map(|f| f.frame_number).unwrap_or(0)
    }

    /// Position of a joint, if present in that frame
    pub fn point(&self, index: usize, joint: Joint) -> Option<Point2<f64>> {
        self.frames
            .get(index)
            .and_then(|f| f.get(joint))
            .map(Keypoint::position)
    }

    /// Per-frame positions of one joint
    pub fn track(&self, joint: Joint) -> Vec<Option<Point2<f64>>> {
        (0..self.frames.len()).map(|i| self.point(i, joint)).collect()
    }

    /// Number of frames in which the joint meets the visibility threshold
    pub fn visible_count(&self, joint: Joint, threshold: f64) -> usize {
        self.frames
            .iter()
            .filter(|f| f.get(joint).is_some_and(|kp| kp.is_visible(threshold)))
            .count()
    }

    /// Copy with every keypoint below the threshold removed
    pub fn masked(&self, threshold: f64) -> Self {
        self.map_keypoints(|_, _, kp| kp.filter(|kp| kp.is_visible(threshold)))
    }

    /// New sequence with the same frame numbers and rate, keypoints rewritten
    /// by `f(frame_index, joint, keypoint)`.
    pub fn map_keypoints<F>(&self, mut f: F) -> Self
    where
        F: FnMut(usize, Joint, Option<Keypoint>) -> Option<Keypoint>,
    {
        let frames = self
            .frames
            .iter()
            .enumerate()
            .map(|(i, frame)| {
                let mut out = SkeletalFrame::new(frame.frame_number);
                for joint in Joint::ALL {
                    out.joints[joint.index()] = f(i, joint, frame.joints[joint.index()]);
                }
                out
            })
            .collect();
        Self {
            fps: self.fps,
            frames,
        }
    }

    /// Index ranges of consecutive frame numbers, split at discontinuities
    pub fn contiguous_runs(&self) -> Vec<std::ops::Range<usize>> {
        let mut runs = Vec::new();
        let mut start = 0;
        for i in 1..self.frames.len() {
            if self.frames[i].frame_number != self.frames[i - 1].frame_number + 1 {
                runs.push(start..i);
                start = i;
            }
        }
        runs.push(start..self.frames.len());
        runs
    }

    pub fn to_pose_frames(&self) -> Vec<PoseFrame> {
        self.frames.iter().map(SkeletalFrame::to_pose_frame).collect()
    }
}

/// Detected swing, from loading start to racket contact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotSegment {
    pub start_frame: u64,
    pub contact_frame: u64,
    /// Last frame of the follow-through window after contact
    pub end_frame: u64,
    pub total_frames: u64,
    pub duration_ms: f64,
    #[serde(skip)]
    pub start_index: usize,
    #[serde(skip)]
    pub contact_index: usize,
}

impl ShotSegment {
    /// Build a segment from sequence indices. Callers guarantee `start_index < contact_index`.
    pub fn from_indices(
        sequence: &PoseSequence,
        start_index: usize,
        contact_index: usize,
        follow_through_ms: f64,
    ) -> Self {
        let fps = sequence.fps();
        let start_frame = sequence.frame_number(start_index);
        let contact_frame = sequence.frame_number(contact_index);
        let total_frames = contact_frame - start_frame;
        let follow_frames = (fps * follow_through_ms / 1000.0).round().max(0.0) as u64;
        let end_frame = contact_frame
            .saturating_add(follow_frames)
            .min(sequence.last_frame_number());

        Self {
            start_frame,
            contact_frame,
            end_frame,
            total_frames,
            duration_ms: total_frames as f64 / fps * 1000.0,
            start_index,
            contact_index,
        }
    }

    /// Sequence indices covering start..=contact
    pub fn window(&self) -> std::ops::RangeInclusive<usize> {
        self.start_index..=self.contact_index
    }

    /// Map a frame onto the swing timeline: 0 at start, 100 at contact.
    pub fn normalized_position(&self, frame: u64) -> f64 {
        if self.contact_frame == self.start_frame {
            return 0.0;
        }
        (frame as f64 - self.start_frame as f64)
            / (self.contact_frame as f64 - self.start_frame as f64)
            * 100.0
    }
}
