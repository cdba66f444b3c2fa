//! Polynomial smoothing for joint trajectories.

use nalgebra::DMatrix;
use smash_core::{Error, Result};

/// Savitzky-Golay filter for smoothing while preserving peaks
///
/// Each output sample is the value, at that sample, of the least-squares
/// polynomial fitted over the surrounding window. Interior samples use the
/// centred window (equal look-behind and look-ahead); the first and last
/// `window_size / 2` samples evaluate the fit of the first/last full window
/// at their own offset instead of being left raw.
#[derive(Debug, Clone)]
pub struct SavitzkyGolayFilter {
    window_size: usize,
    poly_order: usize,
    /// `window_size × window_size` hat matrix; row k evaluates the fit at offset k
    projection: DMatrix<f64>,
}

impl SavitzkyGolayFilter {
    /// Create new Savitzky-Golay filter
    ///
    /// # Arguments
    /// * `window_size` - Must be odd and > poly_order
    /// * `poly_order` - Polynomial order (typically 2 or 3)
    pub fn new(window_size: usize, poly_order: usize) -> Result<Self> {
        if window_size % 2 == 0 || window_size < 3 {
            return Err(Error::Config(format!(
                "Savitzky-Golay window must be odd and at least 3, got {}",
                window_size
            )));
        }
        if poly_order >= window_size {
            return Err(Error::Config(format!(
                "polynomial order {} must be smaller than window {}",
                poly_order, window_size
            )));
        }

        let projection = Self::compute_projection(window_size, poly_order)?;

        Ok(Self {
            window_size,
            poly_order,
            projection,
        })
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn poly_order(&self) -> usize {
        self.poly_order
    }

    /// H = A (AᵀA)⁻¹ Aᵀ for the Vandermonde matrix A over offsets -half..=half
    fn compute_projection(window_size: usize, poly_order: usize) -> Result<DMatrix<f64>> {
        let half = (window_size / 2) as i32;
        let m = poly_order + 1;

        let a = DMatrix::from_fn(window_size, m, |i, j| {
            let x = (i as i32 - half) as f64;
            x.powi(j as i32)
        });

        let normal = a.transpose() * &a;
        let normal_inv = normal.try_inverse().ok_or_else(|| {
            Error::Config(format!(
                "singular Savitzky-Golay system for window {} order {}",
                window_size, poly_order
            ))
        })?;

        Ok(&a * normal_inv * a.transpose())
    }

    /// Convolution weights for the centred sample
    pub fn coefficients(&self) -> Vec<f64> {
        let half = self.window_size / 2;
        self.projection.row(half).iter().copied().collect()
    }

    /// Filter a dense signal. Signals shorter than the window are returned unchanged.
    pub fn filter_signal(&self, signal: &[f64]) -> Vec<f64> {
        let n = signal.len();
        let w = self.window_size;
        if n < w {
            return signal.to_vec();
        }

        let half = w / 2;
        let mut result = Vec::with_capacity(n);

        // Leading edge: fit of the first window evaluated at offsets 0..half
        for row in 0..half {
            result.push(self.apply_row(row, &signal[..w]));
        }

        // Main convolution
        for i in half..(n - half) {
            result.push(self.apply_row(half, &signal[i - half..=i + half]));
        }

        // Trailing edge: fit of the last window
        for row in (half + 1)..w {
            result.push(self.apply_row(row, &signal[n - w..]));
        }

        result
    }

    /// Filter each contiguous run of present samples independently.
    /// Missing samples stay missing; runs shorter than the window pass through.
    pub fn filter_sparse(&self, signal: &[Option<f64>]) -> Vec<Option<f64>> {
        let mut result = signal.to_vec();
        let mut i = 0;

        while i < signal.len() {
            if signal[i].is_none() {
                i += 1;
                continue;
            }
            let start = i;
            let mut run = Vec::new();
            while let Some(Some(v)) = signal.get(i) {
                run.push(*v);
                i += 1;
            }
            for (offset, v) in self.filter_signal(&run).into_iter().enumerate() {
                result[start + offset] = Some(v);
            }
        }

        result
    }

    fn apply_row(&self, row: usize, window: &[f64]) -> f64 {
        self.projection
            .row(row)
            .iter()
            .zip(window)
            .map(|(c, x)| c * x)
            .sum()
    }
}
