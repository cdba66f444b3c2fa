//! Trajectory preprocessing: visibility masking, short-gap interpolation and
//! per-channel Savitzky-Golay smoothing.
//!
//! The preprocessor never mutates its input. It returns a new sequence so the
//! raw trajectory stays available for diagnostics and for echoing back to the
//! caller.

use serde::{Deserialize, Serialize};
use smash_core::{Error, Joint, Keypoint, PoseSequence, Result};

use crate::filtering::SavitzkyGolayFilter;

/// Smoothing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Odd window length, at least 5
    pub window_size: usize,
    /// Must be smaller than `window_size`
    pub poly_order: usize,
    /// Longest interior run of missing frames that is filled by interpolation
    pub max_interpolation_gap: usize,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            window_size: 7,
            poly_order: 2,
            max_interpolation_gap: 3,
        }
    }
}

impl SmoothingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.window_size < 5 || self.window_size % 2 == 0 {
            return Err(Error::Config(format!(
                "smoothing.window_size must be an odd integer >= 5, got {}",
                self.window_size
            )));
        }
        if self.poly_order >= self.window_size {
            return Err(Error::Config(format!(
                "smoothing.poly_order ({}) must be smaller than window_size ({})",
                self.poly_order, self.window_size
            )));
        }
        Ok(())
    }
}

/// Cleans and smooths raw pose trajectories
#[derive(Debug, Clone)]
pub struct TrajectoryPreprocessor {
    config: SmoothingConfig,
    visibility_threshold: f64,
    filter: SavitzkyGolayFilter,
}

impl TrajectoryPreprocessor {
    pub fn new(config: SmoothingConfig, visibility_threshold: f64) -> Result<Self> {
        config.validate()?;
        let filter = SavitzkyGolayFilter::new(config.window_size, config.poly_order)?;
        Ok(Self {
            config,
            visibility_threshold,
            filter,
        })
    }

    pub fn config(&self) -> &SmoothingConfig {
        &self.config
    }

    /// Smooth every joint's x and y channel independently.
    ///
    /// Keypoints below the visibility threshold are dropped first. Interior
    /// gaps up to `max_interpolation_gap` frames are filled linearly; longer
    /// gaps and leading/trailing runs stay missing. Neither interpolation nor
    /// smoothing crosses a frame-number discontinuity.
    pub fn smooth(&self, sequence: &PoseSequence) -> PoseSequence {
        let masked = sequence.masked(self.visibility_threshold);
        let runs = masked.contiguous_runs();

        let mut tracks: Vec<Vec<Option<Keypoint>>> = Vec::with_capacity(Joint::COUNT);
        let mut filled_total = 0usize;

        for joint in Joint::ALL {
            let mut track = vec![None; masked.len()];
            for run in &runs {
                let raw: Vec<Option<Keypoint>> = masked.frames()[run.clone()]
                    .iter()
                    .map(|f| f.get(joint).copied())
                    .collect();
                let (smoothed, filled) = self.smooth_track(&raw);
                filled_total += filled;
                track[run.clone()].copy_from_slice(&smoothed);
            }
            tracks.push(track);
        }

        tracing::debug!(
            frames = masked.len(),
            runs = runs.len(),
            interpolated = filled_total,
            "smoothed pose trajectories"
        );

        masked.map_keypoints(|i, joint, _| tracks[joint.index()][i])
    }

    /// Returns the smoothed track and the number of interpolated samples.
    fn smooth_track(&self, raw: &[Option<Keypoint>]) -> (Vec<Option<Keypoint>>, usize) {
        let max_gap = self.config.max_interpolation_gap;

        let xs = interpolate_gaps(&raw.iter().map(|k| k.map(|k| k.x)).collect::<Vec<_>>(), max_gap);
        let ys = interpolate_gaps(&raw.iter().map(|k| k.map(|k| k.y)).collect::<Vec<_>>(), max_gap);
        let vis = interpolate_gaps(
            &raw.iter().map(|k| k.map(|k| k.visibility)).collect::<Vec<_>>(),
            max_gap,
        );

        let filled = raw
            .iter()
            .zip(&xs)
            .filter(|(r, x)| r.is_none() && x.is_some())
            .count();

        let xs = self.filter.filter_sparse(&xs);
        let ys = self.filter.filter_sparse(&ys);

        let track = xs
            .into_iter()
            .zip(ys)
            .zip(vis)
            .map(|((x, y), v)| match (x, y, v) {
                (Some(x), Some(y), Some(v)) => Some(Keypoint::new(x, y, v)),
                _ => None,
            })
            .collect();

        (track, filled)
    }
}

/// Linearly fill interior runs of `None` no longer than `max_gap`.
/// Leading and trailing runs are left missing.
pub fn interpolate_gaps(values: &[Option<f64>], max_gap: usize) -> Vec<Option<f64>> {
    let mut result = values.to_vec();
    let mut last_valid: Option<usize> = None;

    for i in 0..values.len() {
        let Some(current) = values[i] else {
            continue;
        };

        if let Some(prev) = last_valid {
            let gap = i - prev - 1;
            if gap > 0 && gap <= max_gap {
                // values[prev] is Some by construction of last_valid
                let start = values[prev].unwrap_or(current);
                let span = (i - prev) as f64;
                for (k, slot) in result.iter_mut().enumerate().take(i).skip(prev + 1) {
                    let t = (k - prev) as f64 / span;
                    *slot = Some(start + (current - start) * t);
                }
            }
        }
        last_valid = Some(i);
    }

    result
}
