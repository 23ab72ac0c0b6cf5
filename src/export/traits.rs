//! Exporter trait and format definitions

use crate::analyzer::types::AnalyzeResult;
use crate::export::error::ExportResult;
use std::fmt;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

/// Report encodings
#[derive(EnumIter, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Pretty-printed JSON array
    #[default]
    Json,
    /// Comma separated values
    Csv,
    /// Tab separated values
    Tsv,
    /// Markdown report
    Markdown,
}

impl ExportFormat {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Markdown => "md",
        }
    }

    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Json => &[],
            Self::Csv => &[],
            Self::Tsv => &["tab"],
            Self::Markdown => &["markdown"],
        }
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        ExportFormat::iter().map(|fmt| fmt.name())
    }

    /// Look up a format by name or alias, ignoring case
    pub fn parse(s: &str) -> Option<Self> {
        let lowercase = s.trim().to_lowercase();
        let name = lowercase.as_str();
        ExportFormat::iter().find(|fmt| fmt.name() == name || fmt.aliases().contains(&name))
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExportFormat::parse(s).ok_or_else(|| {
            format!(
                "unknown output format '{}' (allowed: {})",
                s,
                ExportFormat::names().collect::<Vec<_>>().join(", ")
            )
        })
    }
}

/// Writes the aggregated results somewhere
///
/// Called once per scan with every successful result. An empty slice is
/// valid input.
pub trait Exporter: Send + Sync {
    fn export(&self, results: &[AnalyzeResult]) -> ExportResult<()>;
}
