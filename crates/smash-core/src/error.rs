//! Error types for the smash analysis pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Joint;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid pose input: {0}")]
    InputShape(String),

    #[error("Insufficient visibility for joints: {}", joint_list(.joints))]
    InsufficientVisibility { joints: Vec<Joint> },

    #[error("Segmentation failed: {0}")]
    Segmentation(String),

    #[error("Feature {feature} could not be computed: {reason}")]
    FeatureComputation { feature: String, reason: String },

    #[error("Reference comparison error: {0}")]
    Comparison(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

fn joint_list(joints: &[Joint]) -> String {
    joints
        .iter()
        .map(|j| j.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error taxonomy surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InputShape,
    InsufficientVisibility,
    Segmentation,
    FeatureComputation,
    Comparison,
    Config,
    Serialization,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InputShape(_) => ErrorKind::InputShape,
            Error::InsufficientVisibility { .. } => ErrorKind::InsufficientVisibility,
            Error::Segmentation(_) => ErrorKind::Segmentation,
            Error::FeatureComputation { .. } => ErrorKind::FeatureComputation,
            Error::Comparison(_) => ErrorKind::Comparison,
            Error::Config(_) => ErrorKind::Config,
            Error::Serialization(_) => ErrorKind::Serialization,
        }
    }

    /// Only feature computation failures leave the run standing.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::FeatureComputation { .. })
    }

    /// Actionable message for the person who recorded the clip
    pub fn user_message(&self) -> String {
        match self {
            Error::InputShape(_) => {
                "The pose data could not be read. Re-run pose extraction on the clip.".to_string()
            }
            Error::InsufficientVisibility { joints } => format!(
                "Some joints were not visible enough ({}). Film from the side with the full body in frame.",
                joint_list(joints)
            ),
            Error::Segmentation(_) => {
                "Swing not detected. Ensure the full body and the complete swing are visible."
                    .to_string()
            }
            Error::FeatureComputation { feature, .. } => {
                format!("The {} measurement is unavailable for this clip.", feature)
            }
            Error::Comparison(_) | Error::Config(_) => {
                "The analysis service is misconfigured. Please contact support.".to_string()
            }
            Error::Serialization(_) => {
                "The request payload was malformed.".to_string()
            }
        }
    }
}

/// Structured failure returned instead of a result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisFailure {
    pub kind: ErrorKind,
    pub message: String,
    pub user_message: String,
}

impl From<&Error> for AnalysisFailure {
    fn from(e: &Error) -> Self {
        Self {
            kind: e.kind(),
            message: e.to_string(),
            user_message: e.user_message(),
        }
    }
}
