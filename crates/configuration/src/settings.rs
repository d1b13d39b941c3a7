use crate::error::ConfigError;
use core_types::DEFAULT_DATE_FORMATS;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceSettings,
    pub ingest: IngestSettings,
    pub reports: ReportSettings,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

/// Where the sales table is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// A delimited text export with a header row.
    #[default]
    Csv,
    /// A PostgreSQL table reached through `DATABASE_URL`.
    Postgres,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    pub kind: SourceKind,
    /// Path of the export when `kind` is `csv`.
    pub csv_path: PathBuf,
    /// Field separator of the export. A single character.
    pub delimiter: String,
    /// Table holding the records when `kind` is `postgres`.
    pub table: String,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            kind: SourceKind::Csv,
            csv_path: PathBuf::from("data/sales.csv"),
            delimiter: ",".to_string(),
            table: "sales".to_string(),
        }
    }
}

impl SourceSettings {
    /// The delimiter as a char. `\t` is accepted for tab-separated files.
    pub fn delimiter_char(&self) -> Option<char> {
        if self.delimiter == "\\t" {
            return Some('\t');
        }
        let mut chars = self.delimiter.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

/// How raw cells are turned into typed values.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    /// `chrono` layouts tried in order for the date columns.
    pub date_formats: Vec<String>,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Size of the most-profitable-customers ranking.
    pub top_customers: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self { top_customers: 10 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable tables.
    #[default]
    Table,
    /// Pretty-printed JSON.
    Json,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    /// When set, logs are also written to a daily rolling file here.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

impl Config {
    /// Checks the values serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reports.top_customers == 0 {
            return Err(ConfigError::ValidationError(
                "reports.top_customers must be greater than zero".to_string(),
            ));
        }
        if self.source.delimiter_char().is_none() {
            return Err(ConfigError::ValidationError(format!(
                "source.delimiter must be a single character, got '{}'",
                self.source.delimiter
            )));
        }
        if self.ingest.date_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "ingest.date_formats must list at least one layout".to_string(),
            ));
        }
        if !is_table_name(&self.source.table) {
            return Err(ConfigError::ValidationError(format!(
                "source.table '{}' is not a valid table name",
                self.source.table
            )));
        }
        Ok(())
    }
}

/// `table` or `schema.table`, each part a plain SQL identifier.
fn is_table_name(name: &str) -> bool {
    let parts: Vec<&str> = name.split('.').collect();
    parts.len() <= 2
        && parts.iter().all(|part| {
            let mut chars = part.chars();
            chars
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}
