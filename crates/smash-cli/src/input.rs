//! Pose input files.
//!
//! A file is either a bare array of frames or an object carrying the frame
//! rate and racket hand next to the frames.

use std::path::Path;

use serde::Deserialize;
use smash_analysis::AnalysisRequest;
use smash_core::{DominantHand, Error, PoseFrame, Result};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PoseInput {
    Wrapped {
        #[serde(default)]
        fps: Option<f64>,
        #[serde(default)]
        dominant_hand: Option<DominantHand>,
        pose_data: Vec<PoseFrame>,
    },
    Bare(Vec<PoseFrame>),
}

/// Build a request from file contents; flags take precedence over file values.
pub fn parse_request(
    json: &str,
    hand: Option<DominantHand>,
    fps: Option<f64>,
) -> Result<AnalysisRequest> {
    let (file_fps, file_hand, pose_data) = match serde_json::from_str::<PoseInput>(json)? {
        PoseInput::Wrapped {
            fps,
            dominant_hand,
            pose_data,
        } => (fps, dominant_hand, pose_data),
        PoseInput::Bare(frames) => (None, None, frames),
    };

    let fps = fps.or(file_fps).ok_or_else(|| {
        Error::InputShape("frame rate missing: pass --fps or set \"fps\" in the file".into())
    })?;

    Ok(AnalysisRequest {
        pose_data,
        dominant_hand: hand.or(file_hand).unwrap_or_default(),
        fps,
    })
}

pub async fn load_request(
    path: &Path,
    hand: Option<DominantHand>,
    fps: Option<f64>,
) -> Result<AnalysisRequest> {
    let json = tokio::fs::read_to_string(path).await.map_err(|e| {
        Error::InputShape(format!("cannot read {}: {}", path.display(), e))
    })?;
    parse_request(&json, hand, fps)
}
