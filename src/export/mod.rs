//! Export Component
//!
//! Encodes the aggregated scan results as JSON, CSV, TSV or Markdown. The
//! orchestrator hands every successful result to one [`Exporter`] exactly once.

pub mod csv;
pub mod error;
pub mod json;
pub mod markdown;
pub mod traits;

#[cfg(test)]
mod tests;

pub use error::{ExportError, ExportResult};
pub use traits::{ExportFormat, Exporter};

use std::io::Write;

/// Build the exporter for `format` writing to `writer`
pub fn new_exporter(format: ExportFormat, writer: Box<dyn Write + Send>) -> Box<dyn Exporter> {
    match format {
        ExportFormat::Json => Box::new(json::JsonExporter::new(writer)),
        ExportFormat::Csv => Box::new(csv::TableExporter::new_csv(writer)),
        ExportFormat::Tsv => Box::new(csv::TableExporter::new_tsv(writer)),
        ExportFormat::Markdown => Box::new(markdown::MarkdownExporter::new(writer)),
    }
}
