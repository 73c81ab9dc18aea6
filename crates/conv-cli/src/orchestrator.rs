//! Job orchestration.

use crate::config::{JobConfig, Operation};
use anyhow::{Context, Result};
use lib_dsp::{convolve_sequences, correlate_sequences, ConvolutionMethod};
use lib_types::ConvolutionResult;

/// Outcome of one job.
#[derive(Clone, Debug)]
pub struct JobResults {
    pub name: String,
    pub operation: Operation,
    pub result: ConvolutionResult,
}

/// Job orchestrator.
pub struct Orchestrator {
    config: JobConfig,
}

impl Orchestrator {
    pub fn new(config: JobConfig) -> Self {
        Self { config }
    }

    /// Run the configured operation.
    pub fn run(&self) -> Result<JobResults> {
        let (signal, kernel) = self.config.sequences()?;
        let method: ConvolutionMethod = self.config.method.into();

        tracing::info!(
            "Running job '{}': {:?} of {} x {} samples, mode={}, method={:?}",
            self.config.name,
            self.config.operation,
            signal.len(),
            kernel.len(),
            self.config.mode,
            method
        );

        let result = match self.config.operation {
            Operation::Convolve => convolve_sequences(&signal, &kernel, self.config.mode, method),
            Operation::Correlate => correlate_sequences(&signal, &kernel, self.config.mode, method),
        }
        .with_context(|| format!("Job '{}' failed", self.config.name))?;

        tracing::info!("Job '{}' produced {} values", self.config.name, result.len());

        Ok(JobResults {
            name: self.config.name.clone(),
            operation: self.config.operation,
            result,
        })
    }
}
