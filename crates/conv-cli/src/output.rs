//! Result output formatting and writing.

use crate::config::Operation;
use crate::orchestrator::JobResults;
use crate::OutputFormat;
use anyhow::Result;
use lib_types::Complex64;
use std::fmt::Write as _;
use std::path::Path;

/// Heading printed above the text listing.
pub const TEXT_HEADING: &str = "Complex Convolution Result:";

/// One line of the text listing.
pub fn format_line(index: usize, value: Complex64) -> String {
    format!("Index {}: {:.2} + {:.2}j", index, value.re, value.im)
}

/// Render results in the requested format.
pub fn render(results: &JobResults, format: OutputFormat) -> Result<String> {
    let mut out = String::new();

    match format {
        OutputFormat::Text => {
            writeln!(out, "{}", TEXT_HEADING)?;
            for (k, &value) in results.result.iter().enumerate() {
                writeln!(out, "{}", format_line(k, value))?;
            }
        }
        OutputFormat::Json => {
            let values: Vec<_> = results
                .result
                .iter()
                .enumerate()
                .map(|(k, v)| serde_json::json!({ "index": k, "re": v.re, "im": v.im }))
                .collect();
            let json = serde_json::json!({
                "name": results.name,
                "operation": match results.operation {
                    Operation::Convolve => "convolve",
                    Operation::Correlate => "correlate",
                },
                "mode": results.result.mode().to_string(),
                "values": values,
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&json)?)?;
        }
        OutputFormat::Csv => {
            writeln!(out, "index,re,im")?;
            for (k, v) in results.result.iter().enumerate() {
                writeln!(out, "{},{},{}", k, v.re, v.im)?;
            }
        }
    }

    Ok(out)
}

/// Write rendered results to a file.
pub fn write_results(results: &JobResults, path: &Path, format: OutputFormat) -> Result<()> {
    let rendered = render(results, format)?;
    std::fs::write(path, rendered)?;

    tracing::info!("Wrote {} values to {:?}", results.result.len(), path);
    Ok(())
}

/// Print rendered results to stdout.
pub fn print_results(results: &JobResults, format: OutputFormat) -> Result<()> {
    print!("{}", render(results, format)?);
    Ok(())
}
