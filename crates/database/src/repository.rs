use crate::SourceError;
use configuration::IngestSettings;
use core_types::{Column, Dataset, DatasetBuilder, FieldParser, RawOrderRow};
use serde::Serialize;
use sqlx::postgres::{PgPool, Postgres};
use sqlx::{Row, Transaction};
use std::collections::HashMap;

/// Outcome of rewriting one date column into ISO form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateNormalization {
    pub column: Column,
    pub rewritten_rows: u64,
    pub already_iso_rows: u64,
    pub unparseable_rows: u64,
    /// Set when the column is not text, so there was nothing to rewrite.
    pub skipped: bool,
}

/// The `DbRepository` reads the sales table. It encapsulates all SQL.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
    schema: Option<String>,
    table: String,
}

impl DbRepository {
    /// Creates a repository over `table`, written as `table` or `schema.table`.
    pub fn new(pool: PgPool, table: &str) -> Result<Self, SourceError> {
        let (schema, table) = match table.split_once('.') {
            Some((schema, table)) => (Some(schema.to_string()), table.to_string()),
            None => (None, table.to_string()),
        };
        let valid = |ident: &str| {
            !ident.is_empty() && ident.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        };
        if !valid(&table) || !schema.as_deref().is_none_or(valid) {
            return Err(SourceError::InvalidSettings(format!(
                "'{table}' is not a valid table name"
            )));
        }
        Ok(Self { pool, schema, table })
    }

    /// The quoted, possibly schema-qualified table name.
    fn qualified_table(&self) -> String {
        match &self.schema {
            Some(schema) => format!("\"{schema}\".\"{}\"", self.table),
            None => format!("\"{}\"", self.table),
        }
    }

    /// Data type of every column of the table, keyed by column name.
    async fn column_types(&self) -> Result<HashMap<String, String>, SourceError> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            r#"
            SELECT column_name::text, data_type::text
            FROM information_schema.columns
            WHERE table_schema::text = COALESCE($1::text, current_schema()::text)
              AND table_name::text = $2
            "#,
        )
        .bind(self.schema.as_deref())
        .bind(&self.table)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    /// Fails with `MissingColumns` unless every schema column exists.
    /// Returns the column types on success.
    pub async fn check_columns(&self) -> Result<HashMap<String, String>, SourceError> {
        let types = self.column_types().await?;
        let missing = missing_columns(&types);
        if missing.is_empty() {
            Ok(types)
        } else {
            tracing::error!(table = %self.qualified_table(), missing = missing.len(), "Sales table is missing columns");
            Err(SourceError::MissingColumns(missing))
        }
    }

    /// Reads the whole table into a `Dataset`.
    ///
    /// Every column is read as text and parsed by the same boundary parser the
    /// file source uses.
    pub async fn fetch_dataset(&self, ingest: &IngestSettings) -> Result<Dataset, SourceError> {
        self.check_columns().await?;

        let select_list = Column::ALL
            .iter()
            .map(|c| format!("{0}::text AS {0}", c.db_name()))
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!("SELECT {select_list} FROM {}", self.qualified_table());

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        tracing::info!(table = %self.qualified_table(), rows = rows.len(), "Fetched sales records");

        let mut builder = DatasetBuilder::new(FieldParser::new(ingest.date_formats.clone()));
        for row in rows {
            let mut raw = RawOrderRow::new();
            for column in Column::ALL {
                if let Some(value) = row.try_get::<Option<String>, _>(column.db_name())? {
                    raw.set(column, value);
                }
            }
            builder.push(&raw);
        }

        Ok(builder.finish())
    }

    /// One-off cleanup: rewrites every parseable order and ship date to
    /// `YYYY-MM-DD`, inside a single transaction.
    ///
    /// Values that match none of the configured layouts are left untouched and
    /// counted. Columns that are not text are skipped.
    pub async fn normalize_dates(
        &self,
        ingest: &IngestSettings,
    ) -> Result<Vec<DateNormalization>, SourceError> {
        let types = self.check_columns().await?;
        let parser = FieldParser::new(ingest.date_formats.clone());
        let table = self.qualified_table();

        let mut tx: Transaction<'_, Postgres> = self.pool.begin().await?;
        let mut results = Vec::new();

        for column in [Column::OrderDate, Column::ShipDate] {
            let name = column.db_name();
            let mut outcome = DateNormalization {
                column,
                rewritten_rows: 0,
                already_iso_rows: 0,
                unparseable_rows: 0,
                skipped: false,
            };

            let is_text = types
                .get(name)
                .is_some_and(|t| matches!(t.as_str(), "text" | "character varying" | "character"));
            if !is_text {
                tracing::info!(column = name, "Column is not text, nothing to normalize");
                outcome.skipped = true;
                results.push(outcome);
                continue;
            }

            let select = format!(
                "SELECT {name}, COUNT(*) FROM {table} WHERE {name} IS NOT NULL GROUP BY {name}"
            );
            let values: Vec<(String, i64)> = sqlx::query_as(&select).fetch_all(&mut *tx).await?;
            let update = format!("UPDATE {table} SET {name} = $1 WHERE {name} = $2");

            for (raw, count) in values {
                let count = u64::try_from(count).unwrap_or_default();
                let Some(date) = parser.parse_date(&raw) else {
                    outcome.unparseable_rows += count;
                    continue;
                };
                let iso = date.format("%Y-%m-%d").to_string();
                if iso == raw {
                    outcome.already_iso_rows += count;
                    continue;
                }
                let result = sqlx::query(&update)
                    .bind(&iso)
                    .bind(&raw)
                    .execute(&mut *tx)
                    .await?;
                outcome.rewritten_rows += result.rows_affected();
            }

            if outcome.unparseable_rows > 0 {
                tracing::warn!(column = name, rows = outcome.unparseable_rows, "Dates left unparsed");
            }
            results.push(outcome);
        }

        tx.commit().await?;
        tracing::info!(table = %table, "Date columns normalized");
        Ok(results)
    }
}

/// Schema columns absent from `types`, in schema order.
fn missing_columns(types: &HashMap<String, String>) -> Vec<Column> {
    Column::ALL
        .into_iter()
        .filter(|c| !types.contains_key(c.db_name()))
        .collect()
}
