//! Cross-correlation of complex sequences.
//!
//! Correlation here is convolution against the time-reversed kernel,
//! without conjugation:
//!
//! ```text
//! r[k] = Σ x[i] · h[M - 1 - (k - i)]
//! ```
//!
//! It shares output modes and methods with [`crate::convolution`].
//! Reversing twice is the identity, so `correlate(x, reverse(h))` equals
//! `convolve(x, h)`.

use crate::convolution::{convolve_with, ConvolutionMethod};
use crate::error::DspResult;
use lib_types::{ComplexSequence, ConvolutionMode, ConvolutionResult};
use num_complex::Complex64;

/// Reverse the order of a sequence.
pub fn reverse(data: &[Complex64]) -> Vec<Complex64> {
    data.iter().rev().copied().collect()
}

/// Correlate `signal` with `kernel`.
pub fn correlate(
    signal: &[Complex64],
    kernel: &[Complex64],
    mode: ConvolutionMode,
    method: ConvolutionMethod,
) -> DspResult<ConvolutionResult> {
    let flipped = reverse(kernel);
    convolve_with(signal, &flipped, mode, method)
}

/// Correlate two validated sequences.
pub fn correlate_sequences(
    signal: &ComplexSequence,
    kernel: &ComplexSequence,
    mode: ConvolutionMode,
    method: ConvolutionMethod,
) -> DspResult<ConvolutionResult> {
    let flipped = kernel.reversed();
    convolve_with(signal.as_slice(), flipped.as_slice(), mode, method)
}
