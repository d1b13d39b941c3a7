//! # Sales Data Sources
//!
//! This crate is the boundary between the outside world and the reporting
//! engine. It reads the sales table from a PostgreSQL database or from a
//! delimited file export and hands back a typed `Dataset`.
//!
//! ## Architectural Principles
//!
//! - **Layer 2 Adapter:** All source-specific logic lives here. The reporting
//!   engine never sees SQL or file handling.
//! - **Validate Once:** The required columns are checked when a source is
//!   opened. A source missing any of them yields `SourceError::MissingColumns`
//!   and no records at all.
//! - **One Parser:** Both sources feed raw text cells through the same
//!   `core_types::DatasetBuilder`, so dates and numbers are interpreted
//!   identically whichever source is used.
//!
//! ## Public API
//!
//! - `load_csv`: Loads a file export.
//! - `connect`: Opens the database pool.
//! - `DbRepository`: Reads the table and runs the one-off date normalization.
//! - `SourceError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod file_source;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::connect;
pub use error::SourceError;
pub use file_source::load_csv;
pub use repository::{DateNormalization, DbRepository};
