//! # lib-dsp
//!
//! Numerical core for complex sequence convolution.
//!
//! - **FFT/IFFT**: Planner-cached transforms over `Complex64`
//! - **Convolution**: Direct, single-block FFT, and overlap-save engine with Rayon
//! - **Correlation**: Convolution against the reversed kernel

pub mod error;
pub mod fft;
pub mod convolution;
pub mod correlation;

pub use error::{DspError, DspResult};
pub use fft::FftEngine;
pub use convolution::{
    convolve, convolve_sequences, convolve_with, ConvolutionEngine, ConvolutionMethod,
    FftSizeStrategy,
};
pub use correlation::{correlate, correlate_sequences};
