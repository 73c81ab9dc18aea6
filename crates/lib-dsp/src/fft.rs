//! FFT/IFFT operations using rustfft.
//!
//! This module provides a thin wrapper around rustfft with:
//! - Planner caching for repeated transforms
//! - Normalized inverse transforms
//! - Zero-padding helpers

use crate::error::{DspError, DspResult};
use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// FFT engine with a cached planner.
pub struct FftEngine {
    planner: FftPlanner<f64>,
}

impl FftEngine {
    /// Create a new FFT engine.
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
        }
    }

    /// Perform forward FFT on complex data in-place.
    pub fn fft_inplace(&mut self, data: &mut [Complex64]) -> DspResult<()> {
        let len = data.len();
        if !len.is_power_of_two() {
            return Err(DspError::InvalidFftSize(len));
        }

        let fft = self.planner.plan_fft_forward(len);
        fft.process(data);
        Ok(())
    }

    /// Perform inverse FFT on complex data in-place.
    ///
    /// The output is scaled by `1/N`, so `ifft(fft(x)) == x`.
    pub fn ifft_inplace(&mut self, data: &mut [Complex64]) -> DspResult<()> {
        let len = data.len();
        if !len.is_power_of_two() {
            return Err(DspError::InvalidFftSize(len));
        }

        let fft = self.planner.plan_fft_inverse(len);
        fft.process(data);

        // Normalize
        let scale = 1.0 / len as f64;
        for x in data.iter_mut() {
            *x *= scale;
        }

        Ok(())
    }

    /// Perform forward FFT on complex data, returning new buffer.
    pub fn fft(&mut self, data: &[Complex64]) -> DspResult<Vec<Complex64>> {
        let mut result = data.to_vec();
        self.fft_inplace(&mut result)?;
        Ok(result)
    }

    /// Perform inverse FFT on complex data, returning new buffer.
    pub fn ifft(&mut self, data: &[Complex64]) -> DspResult<Vec<Complex64>> {
        let mut result = data.to_vec();
        self.ifft_inplace(&mut result)?;
        Ok(result)
    }

    /// Get a cached forward FFT plan.
    pub fn get_fft_forward(&mut self, len: usize) -> Arc<dyn Fft<f64>> {
        self.planner.plan_fft_forward(len)
    }

    /// Get a cached inverse FFT plan (unnormalized).
    pub fn get_fft_inverse(&mut self, len: usize) -> Arc<dyn Fft<f64>> {
        self.planner.plan_fft_inverse(len)
    }
}

impl Default for FftEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Zero-pad a sequence to a specific length.
///
/// Sequences already at least `new_len` long are returned unchanged.
pub fn zero_pad(data: &[Complex64], new_len: usize) -> Vec<Complex64> {
    let mut result = data.to_vec();
    if new_len > data.len() {
        result.resize(new_len, Complex64::new(0.0, 0.0));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_fft_ifft_roundtrip() {
        let mut engine = FftEngine::new();

        let n = 64;
        let signal: Vec<Complex64> = (0..n)
            .map(|i| {
                let t = i as f64 / n as f64;
                Complex64::new((2.0 * PI * 4.0 * t).sin(), (2.0 * PI * 3.0 * t).cos())
            })
            .collect();

        let spectrum = engine.fft(&signal).unwrap();
        let recovered = engine.ifft(&spectrum).unwrap();

        for (orig, rec) in signal.iter().zip(recovered.iter()) {
            assert!((orig.re - rec.re).abs() < 1e-10);
            assert!((orig.im - rec.im).abs() < 1e-10);
        }
    }

    #[test]
    fn test_fft_of_delta_is_flat() {
        let mut engine = FftEngine::new();
        let mut data = zero_pad(&[Complex64::new(1.0, 0.0)], 8);

        engine.fft_inplace(&mut data).unwrap();

        for bin in &data {
            assert!((bin.re - 1.0).abs() < 1e-12);
            assert!(bin.im.abs() < 1e-12);
        }
    }

    #[test]
    fn test_invalid_fft_size() {
        let mut engine = FftEngine::new();
        let data: Vec<Complex64> = vec![Complex64::new(1.0, 0.0); 100]; // Not power of 2

        let result = engine.fft(&data);
        assert!(matches!(result, Err(DspError::InvalidFftSize(100))));
    }

    #[test]
    fn test_zero_pad() {
        let data = vec![Complex64::new(1.0, 2.0); 3];
        let padded = zero_pad(&data, 8);
        assert_eq!(padded.len(), 8);
        assert_eq!(padded[2], Complex64::new(1.0, 2.0));
        assert_eq!(padded[3], Complex64::new(0.0, 0.0));

        // Never truncates
        assert_eq!(zero_pad(&data, 2).len(), 3);
    }
}
