//! # Core Types
//!
//! Layer 0 of the workspace: the fixed shape of a sales-table row and the
//! boundary parsing that turns raw text cells into typed values.
//!
//! - `Column`: the known schema, iterated statically by every consumer.
//! - `OrderRecord`: one typed line item. Every field is optional because the
//!   source table is not trusted to be complete.
//! - `Dataset`: the immutable collection handed to the reporting engine,
//!   together with the `LoadIssues` found while parsing it.
//! - `DatasetBuilder`: converts `RawOrderRow`s into records.

pub mod enums;
pub mod error;
pub mod parse;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::Column;
pub use error::CoreError;
pub use parse::{DEFAULT_DATE_FORMATS, DatasetBuilder, FieldParser, RawOrderRow};
pub use structs::{Dataset, LoadIssues, OrderRecord};
