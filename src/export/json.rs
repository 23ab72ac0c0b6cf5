//! JSON exporter

use crate::analyzer::types::AnalyzeResult;
use crate::core::sync::handle_mutex_poison;
use crate::export::error::{ExportError, ExportResult};
use crate::export::traits::Exporter;
use std::io::Write;
use std::sync::Mutex;

/// Writes results as one indented JSON array followed by a newline
pub struct JsonExporter<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonExporter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Recover the writer, e.g. to inspect a buffer
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> Exporter for JsonExporter<W> {
    fn export(&self, results: &[AnalyzeResult]) -> ExportResult<()> {
        let data = serde_json::to_string_pretty(results)?;

        let mut writer = handle_mutex_poison(self.writer.lock(), |message| ExportError::Writer {
            message,
        })?;
        writer.write_all(data.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}
