//! Convolution output modes and results.
//!
//! # Output Modes
//!
//! For a signal of length `N` and kernel of length `M`, the full linear
//! convolution has `N + M - 1` lags. The narrower modes are windows cut
//! from it:
//!
//! ```text
//! Full:  len = N + M - 1,               offset = 0
//! Same:  len = max(N, M),               offset = (min(N, M) - 1) / 2
//! Valid: len = max(N, M) - min(N, M) + 1, offset = min(N, M) - 1
//! ```
//!
//! Every mode depends only on `min(N, M)` and `max(N, M)`, so swapping the
//! two inputs never changes the window.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output-length convention of a convolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvolutionMode {
    /// Every lag, `N + M - 1` values.
    #[default]
    Full,
    /// Centre of the full result, `max(N, M)` values.
    Same,
    /// Lags where the shorter input fully overlaps the longer one.
    Valid,
}

impl ConvolutionMode {
    /// Number of output values for inputs of length `n` and `m`.
    ///
    /// Returns 0 if either input is empty.
    pub fn output_len(self, n: usize, m: usize) -> usize {
        if n == 0 || m == 0 {
            return 0;
        }
        let (short, long) = (n.min(m), n.max(m));
        match self {
            ConvolutionMode::Full => n + m - 1,
            ConvolutionMode::Same => long,
            ConvolutionMode::Valid => long - short + 1,
        }
    }

    /// Index into the full result of the first value kept by this mode.
    pub fn offset(self, n: usize, m: usize) -> usize {
        if n == 0 || m == 0 {
            return 0;
        }
        let short = n.min(m);
        match self {
            ConvolutionMode::Full => 0,
            ConvolutionMode::Same => (short - 1) / 2,
            ConvolutionMode::Valid => short - 1,
        }
    }
}

impl fmt::Display for ConvolutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConvolutionMode::Full => "full",
            ConvolutionMode::Same => "same",
            ConvolutionMode::Valid => "valid",
        };
        f.write_str(name)
    }
}

/// The output of a convolution or correlation.
///
/// Index `k` holds the sum at lag `k + mode.offset(n, m)` of the full
/// convolution. Results are created once and never mutated.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConvolutionResult {
    values: Vec<Complex64>,
    mode: ConvolutionMode,
}

impl ConvolutionResult {
    pub fn new(values: Vec<Complex64>, mode: ConvolutionMode) -> Self {
        Self { values, mode }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn mode(&self) -> ConvolutionMode {
        self.mode
    }

    #[inline]
    pub fn as_slice(&self) -> &[Complex64] {
        &self.values
    }

    /// Value at output index `k`.
    #[inline]
    pub fn get(&self, k: usize) -> Option<Complex64> {
        self.values.get(k).copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Complex64> {
        self.values.iter()
    }

    pub fn into_inner(self) -> Vec<Complex64> {
        self.values
    }
}

impl<'a> IntoIterator for &'a ConvolutionResult {
    type Item = &'a Complex64;
    type IntoIter = std::slice::Iter<'a, Complex64>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
