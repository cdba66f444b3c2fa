//! # Smash-Core
//!
//! Core types and utilities for SmashForm, the side-view overhead-smash
//! technique analyser.
//!
//! Joint positions arrive from an external pose estimator as pixel
//! coordinates with a visibility score. This crate validates them into a
//! [`PoseSequence`], provides the planar geometry used for joint angles, and
//! defines the error taxonomy shared by every pipeline stage.

pub mod error;
pub mod feature;
pub mod geometry;
pub mod kinematics;
pub mod types;

pub use error::{AnalysisFailure, Error, ErrorKind, Result};
pub use feature::*;
pub use geometry::*;
pub use kinematics::*;
pub use types::*;
