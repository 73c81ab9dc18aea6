//! Job configuration loading and validation.

use anyhow::{Context, Result};
use lib_dsp::ConvolutionMethod;
use lib_types::{Complex64, ComplexSequence, ConvolutionMode};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A single convolution or correlation job.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JobConfig {
    /// Job name, echoed in structured output.
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default)]
    pub operation: Operation,

    /// Output-length convention.
    #[serde(default)]
    pub mode: ConvolutionMode,

    #[serde(default)]
    pub method: Method,

    /// Input signal as `[re, im]` pairs.
    pub signal: Vec<Complex64>,

    /// Kernel as `[re, im]` pairs.
    pub kernel: Vec<Complex64>,
}

fn default_name() -> String {
    "convolution".to_string()
}

/// What to compute from the two sequences.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    #[default]
    Convolve,
    /// Convolve with the reversed kernel.
    Correlate,
}

/// Algorithm selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    #[default]
    Auto,
    Direct,
    Fft,
}

impl From<Method> for ConvolutionMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Auto => ConvolutionMethod::Auto,
            Method::Direct => ConvolutionMethod::Direct,
            Method::Fft => ConvolutionMethod::Fft,
        }
    }
}

impl JobConfig {
    /// The built-in three-by-three example.
    pub fn reference() -> Self {
        Self {
            name: "reference".to_string(),
            operation: Operation::Convolve,
            mode: ConvolutionMode::Full,
            method: Method::Auto,
            signal: vec![
                Complex64::new(0.25, 2.0),
                Complex64::new(1.125, -1.0),
                Complex64::new(0.0, -0.75),
            ],
            kernel: vec![
                Complex64::new(1.0625, -2.0),
                Complex64::new(-0.375, 1.25),
                Complex64::new(2.5, -0.25),
            ],
        }
    }

    /// Signal and kernel as validated sequences.
    pub fn sequences(&self) -> Result<(ComplexSequence, ComplexSequence)> {
        let signal = ComplexSequence::new(self.signal.clone()).context("Invalid signal")?;
        let kernel = ComplexSequence::new(self.kernel.clone()).context("Invalid kernel")?;
        Ok((signal, kernel))
    }
}

/// Load configuration from a file.
pub fn load_config(path: &Path) -> Result<JobConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config = parse_config(&content, path.extension().map_or(false, |e| e == "json"))?;
    validate_config(&config)?;

    Ok(config)
}

fn parse_config(content: &str, is_json: bool) -> Result<JobConfig> {
    let config: JobConfig = if is_json {
        serde_json::from_str(content).with_context(|| "Failed to parse config as JSON")?
    } else {
        // Assume TOML
        toml::from_str(content).with_context(|| "Failed to parse config as TOML")?
    };
    Ok(config)
}

/// Validate configuration.
fn validate_config(config: &JobConfig) -> Result<()> {
    if config.signal.is_empty() {
        anyhow::bail!("Job '{}': signal must contain at least one value", config.name);
    }
    if config.kernel.is_empty() {
        anyhow::bail!("Job '{}': kernel must contain at least one value", config.name);
    }
    Ok(())
}
