//! # Smash-Analysis
//!
//! Biomechanical analysis of a side-view overhead smash.
//!
//! ## Pipeline Stages
//!
//! 1. **Preprocessing**: Mask low-confidence joints and smooth trajectories
//! 2. **Signals**: Joint angles, line orientations and angular velocities
//! 3. **Segmentation**: Deepest knee bend to peak wrist velocity
//! 4. **Kinetic Chain**: Hip, shoulder, elbow and wrist peak-velocity delays
//! 5. **Features**: Twelve scalar measurements over the swing window
//! 6. **Scoring**: Per-metric deviation and a weighted similarity score
//!
//! The reference profile is built once and shared read-only between runs;
//! [`SmashAnalyzer`] holds it behind an `Arc`.

pub mod analyzer;
pub mod config;
pub mod features;
pub mod kinetic_chain;
pub mod reference;
pub mod scoring;
pub mod segmenter;
pub mod signals;
pub mod synthetic;

pub use analyzer::*;
pub use config::*;
pub use features::*;
pub use kinetic_chain::*;
pub use reference::*;
pub use scoring::*;
pub use segmenter::*;
pub use signals::*;
