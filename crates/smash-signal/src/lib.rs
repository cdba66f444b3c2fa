//! # Smash-Signal
//!
//! Trajectory preprocessing for pose sequences.
//!
//! ## Pipeline Stages
//!
//! 1. **Masking**: Drop keypoints below the visibility threshold
//! 2. **Interpolation**: Fill short interior gaps per joint and channel
//! 3. **Smoothing**: Savitzky-Golay filter over each contiguous run of frames

pub mod filtering;
pub mod preprocess;

pub use filtering::*;
pub use preprocess::*;
