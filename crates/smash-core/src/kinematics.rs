//! Per-frame angle signals and their angular velocities.
//!
//! Every signal is index-aligned with the pose sequence it was computed from.
//! A `None` sample means "no value in that frame" and is never treated as zero.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::geometry::wrap_degrees;

/// Sparse, frame-aligned scalar time series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub values: Vec<Option<f64>>,
}

impl TimeSeries {
    pub fn new(values: Vec<Option<f64>>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    pub fn valid_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn abs(&self) -> Self {
        Self::new(self.values.iter().map(|v| v.map(f64::abs)).collect())
    }

    fn clamp_range(&self, range: RangeInclusive<usize>) -> Option<RangeInclusive<usize>> {
        if self.values.is_empty() {
            return None;
        }
        let end = (*range.end()).min(self.values.len() - 1);
        let start = *range.start();
        (start <= end).then_some(start..=end)
    }

    /// Largest value in the range; earliest index wins ties.
    pub fn peak_in(&self, range: RangeInclusive<usize>) -> Option<(usize, f64)> {
        let range = self.clamp_range(range)?;
        let mut best: Option<(usize, f64)> = None;
        for i in range {
            if let Some(v) = self.values[i] {
                if best.map_or(true, |(_, b)| v > b) {
                    best = Some((i, v));
                }
            }
        }
        best
    }

    /// Smallest value in the range; earliest index wins ties.
    pub fn trough_in(&self, range: RangeInclusive<usize>) -> Option<(usize, f64)> {
        let range = self.clamp_range(range)?;
        let mut best: Option<(usize, f64)> = None;
        for i in range {
            if let Some(v) = self.values[i] {
                if best.map_or(true, |(_, b)| v < b) {
                    best = Some((i, v));
                }
            }
        }
        best
    }

    /// Deepest interior local minimum whose index lies in `range`; earliest
    /// index wins ties.
    ///
    /// Both neighbours must be present and neither may be lower. The sample
    /// must also sit more than `tolerance` below at least one neighbour, so
    /// flat stretches do not count.
    pub fn local_trough_in(
        &self,
        range: RangeInclusive<usize>,
        tolerance: f64,
    ) -> Option<(usize, f64)> {
        let last = self.values.len().checked_sub(2)?;
        let start = (*range.start()).max(1);
        let end = (*range.end()).min(last);
        let mut best: Option<(usize, f64)> = None;
        for i in start..=end {
            let (Some(prev), Some(v), Some(next)) =
                (self.values[i - 1], self.values[i], self.values[i + 1])
            else {
                continue;
            };
            let is_minimum = prev >= v && next >= v;
            let is_dip = prev - v > tolerance || next - v > tolerance;
            if is_minimum && is_dip && best.map_or(true, |(_, b)| v < b) {
                best = Some((i, v));
            }
        }
        best
    }

    pub fn peak(&self) -> Option<(usize, f64)> {
        self.peak_in(0..=self.values.len().saturating_sub(1))
    }

    /// Latest valid sample at or before `index`, not earlier than `floor`
    pub fn last_valid_at_or_before(&self, index: usize, floor: usize) -> Option<(usize, f64)> {
        let index = index.min(self.values.len().checked_sub(1)?);
        (floor..=index)
            .rev()
            .find_map(|i| self.values[i].map(|v| (i, v)))
    }
}

/// How consecutive angle samples relate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AngleKind {
    /// Joint angle in [0°, 180°]; differences are taken as-is
    Bounded,
    /// Line orientation on the circle; differences are wrapped to (-180°, 180°]
    Orientation,
}

/// Angle time series in degrees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngleSignal {
    pub kind: AngleKind,
    pub series: TimeSeries,
}

impl AngleSignal {
    pub fn bounded(values: Vec<Option<f64>>) -> Self {
        Self {
            kind: AngleKind::Bounded,
            series: TimeSeries::new(values),
        }
    }

    pub fn orientation(values: Vec<Option<f64>>) -> Self {
        Self {
            kind: AngleKind::Orientation,
            series: TimeSeries::new(values),
        }
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.series.get(index)
    }

    /// Central-difference angular velocity in deg/s:
    /// `(angle[t+1] - angle[t-1]) / (2 / fps)`.
    ///
    /// Undefined at the first and last sample, next to a missing sample,
    /// and across a frame-number discontinuity.
    pub fn angular_velocity(&self, frame_numbers: &[u64], fps: f64) -> TimeSeries {
        let values = &self.series.values;
        let n = values.len().min(frame_numbers.len());
        let dt2 = 2.0 / fps;

        let mut velocity = vec![None; values.len()];
        for i in 1..n.saturating_sub(1) {
            if frame_numbers[i + 1] != frame_numbers[i - 1] + 2 {
                continue;
            }
            if let (Some(prev), Some(next)) = (values[i - 1], values[i + 1]) {
                let delta = match self.kind {
                    AngleKind::Bounded => next - prev,
                    AngleKind::Orientation => wrap_degrees(next - prev),
                };
                velocity[i] = Some(delta / dt2);
            }
        }

        TimeSeries::new(velocity)
    }
}
