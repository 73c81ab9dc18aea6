//! Complex-valued input sequences.
//!
//! A `ComplexSequence` is an ordered, zero-indexed list of double-precision
//! complex numbers. Sequences are never empty and are immutable once built:
//! there are no `&mut` accessors, and every transformation returns a new
//! sequence.
//!
//! On the wire (TOML/JSON) a sequence is an array of `[re, im]` pairs:
//!
//! ```text
//! signal = [[0.25, 2.0], [1.125, -1.0], [0.0, -0.75]]
//! ```

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Errors raised while constructing a sequence.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
    /// The sequence has no elements.
    #[error("sequence must contain at least one element")]
    Empty,
}

/// A non-empty, immutable sequence of complex numbers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Complex64>", into = "Vec<Complex64>")]
pub struct ComplexSequence {
    values: Vec<Complex64>,
}

impl ComplexSequence {
    /// Create a sequence, rejecting empty input.
    pub fn new(values: Vec<Complex64>) -> Result<Self, SequenceError> {
        if values.is_empty() {
            return Err(SequenceError::Empty);
        }
        Ok(Self { values })
    }

    /// Build a sequence from `(re, im)` pairs.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self, SequenceError> {
        Self::new(pairs.iter().map(|&(re, im)| Complex64::new(re, im)).collect())
    }

    /// Number of elements. Always at least one.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`; provided for API symmetry with slices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Complex64] {
        &self.values
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<Complex64> {
        self.values.get(index).copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Complex64> {
        self.values.iter()
    }

    /// A new sequence with the element order flipped.
    pub fn reversed(&self) -> Self {
        Self {
            values: self.values.iter().rev().copied().collect(),
        }
    }

    pub fn into_inner(self) -> Vec<Complex64> {
        self.values
    }
}

impl Index<usize> for ComplexSequence {
    type Output = Complex64;

    fn index(&self, index: usize) -> &Complex64 {
        &self.values[index]
    }
}

impl AsRef<[Complex64]> for ComplexSequence {
    fn as_ref(&self) -> &[Complex64] {
        &self.values
    }
}

impl TryFrom<Vec<Complex64>> for ComplexSequence {
    type Error = SequenceError;

    fn try_from(values: Vec<Complex64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<ComplexSequence> for Vec<Complex64> {
    fn from(seq: ComplexSequence) -> Self {
        seq.values
    }
}

impl<'a> IntoIterator for &'a ComplexSequence {
    type Item = &'a Complex64;
    type IntoIter = std::slice::Iter<'a, Complex64>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
