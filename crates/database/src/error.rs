use core_types::Column;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to load environment variables for database connection: {0}")]
    ConnectionConfigError(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("The source has no header row")]
    MissingHeader,

    #[error("Required columns are missing from the source: {}", format_columns(.0))]
    MissingColumns(Vec<Column>),

    #[error("Invalid source settings: {0}")]
    InvalidSettings(String),
}

fn format_columns(columns: &[Column]) -> String {
    columns
        .iter()
        .map(|c| c.header())
        .collect::<Vec<_>>()
        .join(", ")
}
