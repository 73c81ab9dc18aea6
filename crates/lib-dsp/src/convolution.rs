//! Linear convolution of complex sequences.
//!
//! For a signal `x` of length `N` and a kernel `h` of length `M`, the full
//! linear convolution has `N + M - 1` lags:
//!
//! ```text
//! y[k] = Σ x[i] · h[k - i],   max(0, k - M + 1) ≤ i ≤ min(k, N - 1)
//! ```
//!
//! Three ways of computing it are provided, all producing the same values
//! up to floating-point rounding:
//!
//! - [`direct_convolve`]: the sum above, O(N·M). Exact for short inputs.
//! - [`fft_convolve`]: one zero-padded FFT block, O((N+M) log(N+M)).
//! - [`ConvolutionEngine`]: overlap-save with a pre-computed kernel FFT,
//!   for convolving many or long signals against one kernel. Long inputs
//!   are split across threads with Rayon.
//!
//! [`convolve`] is the general entry point: full mode, method chosen by
//! input size.

use crate::error::{DspError, DspResult};
use crate::fft::{zero_pad, FftEngine};
use lib_types::{ComplexSequence, ConvolutionMode, ConvolutionResult};
use num_complex::Complex64;
use rayon::prelude::*;
use rustfft::Fft;
use std::sync::Arc;

/// Largest `N·M` product for which [`ConvolutionMethod::Auto`] sums directly.
pub const DIRECT_THRESHOLD: usize = 4096;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);

/// Algorithm used to compute a convolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConvolutionMethod {
    /// Direct summation for small inputs, FFT otherwise.
    #[default]
    Auto,
    /// Direct O(N·M) summation.
    Direct,
    /// Single-block FFT convolution.
    Fft,
}

impl ConvolutionMethod {
    /// Resolve `Auto` to a concrete method for inputs of length `n` and `m`.
    pub fn resolve(self, n: usize, m: usize) -> ConvolutionMethod {
        match self {
            ConvolutionMethod::Auto => {
                if n.saturating_mul(m) <= DIRECT_THRESHOLD {
                    ConvolutionMethod::Direct
                } else {
                    ConvolutionMethod::Fft
                }
            }
            other => other,
        }
    }
}

/// FFT sizing strategy for [`ConvolutionEngine`].
#[derive(Clone, Debug, Default)]
pub enum FftSizeStrategy {
    /// 4x kernel length rounded up to a power of 2, minimum 64.
    #[default]
    Auto,

    /// User-specified fixed size.
    ///
    /// Must be a power of 2 and at least the kernel length.
    Fixed { size: usize },
}

fn ensure_non_empty(signal: &[Complex64], kernel: &[Complex64]) -> DspResult<()> {
    if signal.is_empty() {
        return Err(DspError::InvalidArgument("signal is empty".into()));
    }
    if kernel.is_empty() {
        return Err(DspError::InvalidArgument("kernel is empty".into()));
    }
    Ok(())
}

/// Direct convolution, O(N·M).
///
/// Returns the full result of length `N + M - 1`.
pub fn direct_convolve(signal: &[Complex64], kernel: &[Complex64]) -> DspResult<Vec<Complex64>> {
    ensure_non_empty(signal, kernel)?;

    let output_len = signal.len() + kernel.len() - 1;
    let mut output = vec![ZERO; output_len];

    for (i, &s) in signal.iter().enumerate() {
        for (j, &k) in kernel.iter().enumerate() {
            output[i + j] += s * k;
        }
    }

    Ok(output)
}

/// Simple FFT-based convolution (single block).
///
/// Both inputs are zero-padded to the next power of 2 at or above
/// `N + M - 1`, multiplied in the frequency domain, and transformed back.
pub fn fft_convolve(signal: &[Complex64], kernel: &[Complex64]) -> DspResult<Vec<Complex64>> {
    ensure_non_empty(signal, kernel)?;

    let output_len = signal.len() + kernel.len() - 1;
    let fft_size = output_len.next_power_of_two();

    let mut engine = FftEngine::new();

    let mut signal_fft = zero_pad(signal, fft_size);
    let mut kernel_fft = zero_pad(kernel, fft_size);

    engine.fft_inplace(&mut signal_fft)?;
    engine.fft_inplace(&mut kernel_fft)?;

    for (s, k) in signal_fft.iter_mut().zip(kernel_fft.iter()) {
        *s *= *k;
    }

    engine.ifft_inplace(&mut signal_fft)?;

    signal_fft.truncate(output_len);
    Ok(signal_fft)
}

/// Full linear convolution of `signal` with `kernel`.
///
/// Returns `N + M - 1` values. Fails with [`DspError::InvalidArgument`]
/// if either input is empty.
pub fn convolve(signal: &[Complex64], kernel: &[Complex64]) -> DspResult<ConvolutionResult> {
    convolve_with(signal, kernel, ConvolutionMode::Full, ConvolutionMethod::Auto)
}

/// Convolution with an explicit output mode and method.
///
/// The full result is computed first and the window for `mode` is cut
/// from it.
pub fn convolve_with(
    signal: &[Complex64],
    kernel: &[Complex64],
    mode: ConvolutionMode,
    method: ConvolutionMethod,
) -> DspResult<ConvolutionResult> {
    ensure_non_empty(signal, kernel)?;

    let (n, m) = (signal.len(), kernel.len());
    let resolved = method.resolve(n, m);
    tracing::trace!("convolve: n={}, m={}, mode={}, method={:?}", n, m, mode, resolved);

    let full = match resolved {
        ConvolutionMethod::Fft => fft_convolve(signal, kernel)?,
        _ => direct_convolve(signal, kernel)?,
    };

    let offset = mode.offset(n, m);
    let len = mode.output_len(n, m);
    let values = if offset == 0 && len == full.len() {
        full
    } else {
        full[offset..offset + len].to_vec()
    };

    Ok(ConvolutionResult::new(values, mode))
}

/// Convolve two validated sequences.
///
/// Sequences are non-empty by construction, so this only fails on
/// internal FFT errors.
pub fn convolve_sequences(
    signal: &ComplexSequence,
    kernel: &ComplexSequence,
    mode: ConvolutionMode,
    method: ConvolutionMethod,
) -> DspResult<ConvolutionResult> {
    convolve_with(signal.as_slice(), kernel.as_slice(), mode, method)
}

/// Reusable convolution engine for a fixed kernel.
///
/// Uses the overlap-save method with a pre-computed kernel FFT. Each block
/// of `fft_size` input samples yields `fft_size - (kernel_len - 1)` valid
/// output samples; the first `kernel_len - 1` samples of every block are
/// wrapped by the circular convolution and discarded.
pub struct ConvolutionEngine {
    /// Pre-computed FFT of the kernel.
    kernel_fft: Vec<Complex64>,

    /// FFT size (power of 2).
    fft_size: usize,

    /// Overlap size (kernel length - 1).
    overlap: usize,

    /// Valid output size per block.
    valid_size: usize,

    kernel_len: usize,

    /// Cached FFT plans.
    fft_forward: Arc<dyn Fft<f64>>,
    fft_inverse: Arc<dyn Fft<f64>>,
}

impl ConvolutionEngine {
    /// Create an engine for `kernel` with automatic FFT sizing.
    pub fn new(kernel: &[Complex64]) -> DspResult<Self> {
        Self::with_strategy(kernel, FftSizeStrategy::Auto)
    }

    /// Create an engine with a custom FFT sizing strategy.
    pub fn with_strategy(kernel: &[Complex64], strategy: FftSizeStrategy) -> DspResult<Self> {
        let kernel_len = kernel.len();
        if kernel_len == 0 {
            return Err(DspError::InvalidArgument("kernel is empty".into()));
        }

        let fft_size = match strategy {
            FftSizeStrategy::Auto => (kernel_len * 4).next_power_of_two().max(64),
            FftSizeStrategy::Fixed { size } => {
                if !size.is_power_of_two() || size < kernel_len {
                    return Err(DspError::InvalidFftSize(size));
                }
                size
            }
        };
        let overlap = kernel_len - 1;
        let valid_size = fft_size - overlap;

        tracing::debug!(
            "ConvolutionEngine: FFT size={}, kernel_len={}, valid per block={}",
            fft_size,
            kernel_len,
            valid_size
        );

        let mut engine = FftEngine::new();
        let fft_forward = engine.get_fft_forward(fft_size);
        let fft_inverse = engine.get_fft_inverse(fft_size);

        let mut kernel_fft = zero_pad(kernel, fft_size);
        fft_forward.process(&mut kernel_fft);

        Ok(Self {
            kernel_fft,
            fft_size,
            overlap,
            valid_size,
            kernel_len,
            fft_forward,
            fft_inverse,
        })
    }

    /// Create an engine from a validated sequence.
    pub fn from_sequence(kernel: &ComplexSequence) -> DspResult<Self> {
        Self::new(kernel.as_slice())
    }

    /// Full convolution of `signal` with the engine's kernel.
    ///
    /// Inputs spanning more than two blocks are processed in parallel.
    pub fn convolve(&self, signal: &[Complex64]) -> DspResult<Vec<Complex64>> {
        if signal.is_empty() {
            return Err(DspError::InvalidArgument("signal is empty".into()));
        }

        let output_len = signal.len() + self.kernel_len - 1;
        let num_blocks = (output_len + self.valid_size - 1) / self.valid_size;

        let blocks: Vec<Vec<Complex64>> = if num_blocks <= 2 {
            (0..num_blocks)
                .map(|block_idx| self.process_block(signal, block_idx))
                .collect()
        } else {
            (0..num_blocks)
                .into_par_iter()
                .map(|block_idx| self.process_block(signal, block_idx))
                .collect()
        };

        let mut output: Vec<Complex64> = blocks.into_iter().flatten().collect();
        output.truncate(output_len);
        Ok(output)
    }

    /// Convolve and wrap the result with an output mode applied.
    pub fn convolve_mode(
        &self,
        signal: &[Complex64],
        mode: ConvolutionMode,
    ) -> DspResult<ConvolutionResult> {
        let full = self.convolve(signal)?;
        let offset = mode.offset(signal.len(), self.kernel_len);
        let len = mode.output_len(signal.len(), self.kernel_len);
        Ok(ConvolutionResult::new(full[offset..offset + len].to_vec(), mode))
    }

    /// Compute the valid samples of one overlap-save block.
    ///
    /// Block `b` starts `overlap` samples before output index
    /// `b * valid_size`; samples outside the signal are zero.
    fn process_block(&self, signal: &[Complex64], block_idx: usize) -> Vec<Complex64> {
        let input_pos = (block_idx * self.valid_size) as isize - self.overlap as isize;

        let mut block = vec![ZERO; self.fft_size];
        for (i, slot) in block.iter_mut().enumerate() {
            let src_idx = input_pos + i as isize;
            if src_idx >= 0 && (src_idx as usize) < signal.len() {
                *slot = signal[src_idx as usize];
            }
        }

        self.fft_forward.process(&mut block);

        for (b, h) in block.iter_mut().zip(self.kernel_fft.iter()) {
            *b *= *h;
        }

        self.fft_inverse.process(&mut block);

        let scale = 1.0 / self.fft_size as f64;
        block[self.overlap..].iter().map(|&c| c * scale).collect()
    }

    /// Kernel length `M`.
    pub fn kernel_len(&self) -> usize {
        self.kernel_len
    }

    /// Get the FFT size being used.
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn assert_close(a: &[Complex64], b: &[Complex64], tol: f64) {
        assert_eq!(a.len(), b.len());
        for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
            assert!(
                (x.re - y.re).abs() < tol && (x.im - y.im).abs() < tol,
                "Mismatch at index {}: {} vs {}",
                i, x, y
            );
        }
    }

    fn reference_signal() -> Vec<Complex64> {
        vec![c(0.25, 2.0), c(1.125, -1.0), c(0.0, -0.75)]
    }

    fn reference_kernel() -> Vec<Complex64> {
        vec![c(1.0625, -2.0), c(-0.375, 1.25), c(2.5, -0.25)]
    }

    /// Lag-by-lag evaluation of the convolution sum, independent of
    /// `direct_convolve`'s scatter loop.
    fn summed_by_lag(signal: &[Complex64], kernel: &[Complex64]) -> Vec<Complex64> {
        let (n, m) = (signal.len(), kernel.len());
        (0..n + m - 1)
            .map(|k| {
                let lo = k.saturating_sub(m - 1);
                let hi = k.min(n - 1);
                (lo..=hi).map(|i| signal[i] * kernel[k - i]).sum::<Complex64>()
            })
            .collect()
    }

    #[test]
    fn test_reference_scenario() {
        let result = convolve(&reference_signal(), &reference_kernel()).unwrap();

        assert_eq!(result.len(), 5);
        assert_eq!(result.mode(), ConvolutionMode::Full);

        let expected = summed_by_lag(&reference_signal(), &reference_kernel());
        assert_close(result.as_slice(), &expected, 1e-9);

        // Hand-evaluated values; every input is a dyadic rational so these are exact.
        let by_hand = [
            c(4.265625, 1.625),
            c(-3.3984375, -3.75),
            c(0.453125, 5.921875),
            c(3.5, -2.5),
            c(-0.1875, -1.875),
        ];
        assert_close(result.as_slice(), &by_hand, 1e-9);
    }

    #[test]
    fn test_direct_convolve_impulse() {
        let signal = vec![c(1.0, 1.0), c(2.0, -1.0), c(3.0, 0.5)];
        let kernel = vec![c(1.0, 0.0)];

        let result = direct_convolve(&signal, &kernel).unwrap();
        assert_eq!(result, signal);
    }

    #[test]
    fn test_direct_convolve_shift() {
        // Convolving with [0, 1] should delay by one sample
        let signal = vec![c(1.0, 0.0), c(2.0, 1.0), c(3.0, 0.0)];
        let kernel = vec![c(0.0, 0.0), c(1.0, 0.0)];

        let result = direct_convolve(&signal, &kernel).unwrap();
        assert_eq!(result, vec![c(0.0, 0.0), c(1.0, 0.0), c(2.0, 1.0), c(3.0, 0.0)]);
    }

    #[test]
    fn test_imaginary_unit_rotates() {
        // Multiplying by i maps (a + bi) to (-b + ai)
        let signal = vec![c(1.0, 2.0), c(-3.0, 0.5)];
        let result = direct_convolve(&signal, &[c(0.0, 1.0)]).unwrap();
        assert_eq!(result, vec![c(-2.0, 1.0), c(-0.5, -3.0)]);
    }

    #[test]
    fn test_fft_convolve_matches_direct() {
        let signal: Vec<Complex64> = (0..37)
            .map(|i| c((i as f64 * 0.3).sin(), (i as f64 * 0.7).cos()))
            .collect();
        let kernel = vec![c(1.0, -0.5), c(0.5, 0.25), c(0.25, 0.0), c(-0.125, 1.0)];

        let direct = direct_convolve(&signal, &kernel).unwrap();
        let fft = fft_convolve(&signal, &kernel).unwrap();

        assert_close(&direct, &fft, 1e-10);
    }

    #[test]
    fn test_empty_input_rejected() {
        let kernel = reference_kernel();
        assert!(matches!(convolve(&[], &kernel), Err(DspError::InvalidArgument(_))));
        assert!(matches!(convolve(&kernel, &[]), Err(DspError::InvalidArgument(_))));
        assert!(matches!(fft_convolve(&[], &kernel), Err(DspError::InvalidArgument(_))));
        assert!(ConvolutionEngine::new(&[]).is_err());
    }

    #[test]
    fn test_same_and_valid_modes() {
        let signal = reference_signal();
        let kernel = reference_kernel();
        let full = convolve(&signal, &kernel).unwrap();

        let same = convolve_with(&signal, &kernel, ConvolutionMode::Same, ConvolutionMethod::Direct)
            .unwrap();
        assert_eq!(same.len(), 3);
        assert_close(same.as_slice(), &full.as_slice()[1..4], 1e-12);

        let valid = convolve_with(&signal, &kernel[..2], ConvolutionMode::Valid, ConvolutionMethod::Fft)
            .unwrap();
        assert_close(valid.as_slice(), &[c(-3.3984375, -3.75), c(-0.671875, 0.984375)], 1e-9);
    }

    #[test]
    fn test_auto_method_resolution() {
        assert_eq!(ConvolutionMethod::Auto.resolve(3, 3), ConvolutionMethod::Direct);
        assert_eq!(ConvolutionMethod::Auto.resolve(4096, 2), ConvolutionMethod::Fft);
        assert_eq!(ConvolutionMethod::Direct.resolve(4096, 4096), ConvolutionMethod::Direct);
    }

    #[test]
    fn test_convolution_engine() {
        let signal: Vec<Complex64> = (0..10_000)
            .map(|i| c(1.0, (i % 7) as f64 * 0.1))
            .collect();
        let kernel = vec![c(1.0, 0.0), c(0.5, -0.5), c(0.25, 0.25), c(0.125, 0.0)];

        let engine = ConvolutionEngine::new(&kernel).unwrap();
        let result = engine.convolve(&signal).unwrap();

        assert_eq!(result.len(), signal.len() + kernel.len() - 1);

        let direct = direct_convolve(&signal, &kernel).unwrap();
        assert_close(&result, &direct, 1e-9);
    }

    #[test]
    fn test_engine_short_signal() {
        let engine = ConvolutionEngine::new(&reference_kernel()).unwrap();
        let result = engine.convolve(&reference_signal()).unwrap();

        let expected = summed_by_lag(&reference_signal(), &reference_kernel());
        assert_close(&result, &expected, 1e-9);
    }

    #[test]
    fn test_engine_fixed_strategy() {
        let kernel = reference_kernel();

        assert!(matches!(
            ConvolutionEngine::with_strategy(&kernel, FftSizeStrategy::Fixed { size: 6 }),
            Err(DspError::InvalidFftSize(6))
        ));
        assert!(matches!(
            ConvolutionEngine::with_strategy(&kernel, FftSizeStrategy::Fixed { size: 2 }),
            Err(DspError::InvalidFftSize(2))
        ));

        // Smallest legal block for a 3-tap kernel: two valid samples per block.
        let engine = ConvolutionEngine::with_strategy(&kernel, FftSizeStrategy::Fixed { size: 4 })
            .unwrap();
        assert_eq!(engine.fft_size(), 4);
        assert_eq!(engine.kernel_len(), 3);

        let signal: Vec<Complex64> = (0..50).map(|i| c(i as f64, -(i as f64) * 0.5)).collect();
        let result = engine.convolve(&signal).unwrap();
        assert_close(&result, &direct_convolve(&signal, &kernel).unwrap(), 1e-8);
    }

    #[test]
    fn test_engine_mode_window() {
        let engine = ConvolutionEngine::new(&reference_kernel()).unwrap();
        let same = engine.convolve_mode(&reference_signal(), ConvolutionMode::Same).unwrap();
        let expected = summed_by_lag(&reference_signal(), &reference_kernel());
        assert_close(same.as_slice(), &expected[1..4], 1e-9);
    }
}
