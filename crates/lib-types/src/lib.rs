//! # lib-types
//!
//! Core type definitions for complex sequence convolution.
//!
//! This crate provides the value types shared across the workspace:
//! - Non-empty, immutable complex sequences used as convolution inputs
//! - Convolution output modes and the result container

pub mod sequence;
pub mod result;

pub use sequence::*;
pub use result::*;

/// Re-export num_complex for convenience
pub use num_complex::Complex64;
