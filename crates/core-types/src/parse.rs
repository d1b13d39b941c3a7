use crate::enums::Column;
use crate::structs::{Dataset, LoadIssues, OrderRecord};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::str::FromStr;

/// Date layouts tried, in order, when no formats are configured.
pub const DEFAULT_DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%m/%d/%Y", "%d-%m-%Y", "%Y/%m/%d", "%d %b %Y"];

/// One untyped row as read from a source, with cells aligned to `Column::ALL`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOrderRow {
    cells: [Option<String>; Column::COUNT],
}

impl RawOrderRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: Column, value: impl Into<String>) {
        self.cells[column.index()] = Some(value.into());
    }

    pub fn with(mut self, column: Column, value: impl Into<String>) -> Self {
        self.set(column, value);
        self
    }

    /// The trimmed cell, or `None` when it is absent or blank.
    pub fn get(&self, column: Column) -> Option<&str> {
        self.cells[column.index()]
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}

/// Parses individual cells. Holds the accepted date layouts.
#[derive(Debug, Clone)]
pub struct FieldParser {
    date_formats: Vec<String>,
}

impl Default for FieldParser {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect())
    }
}

impl FieldParser {
    pub fn new(date_formats: Vec<String>) -> Self {
        Self { date_formats }
    }

    pub fn date_formats(&self) -> &[String] {
        &self.date_formats
    }

    /// Tries every configured layout; a trailing time of day is ignored.
    pub fn parse_date(&self, value: &str) -> Option<NaiveDate> {
        let value = value.trim();
        if let Some(date) = self.parse_date_exact(value) {
            return Some(date);
        }
        if !value.contains(':') {
            return None;
        }
        // "2023-01-05T10:00:00" or "01/05/2023 10:00"
        let date_part = match value.split_once('T') {
            Some((date, _)) if !date.contains(' ') => date,
            _ => value.rsplit_once(' ').map(|(date, _)| date.trim_end())?,
        };
        self.parse_date_exact(date_part)
    }

    fn parse_date_exact(&self, value: &str) -> Option<NaiveDate> {
        self.date_formats
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
    }

    /// Accepts plain decimals, a leading currency sign and thousands separators.
    pub fn parse_decimal(&self, value: &str) -> Option<Decimal> {
        let (negative, rest) = match value.trim().strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, value.trim()),
        };
        let cleaned: String = rest
            .trim_start_matches('$')
            .chars()
            .filter(|c| *c != ',')
            .collect();
        let parsed = Decimal::from_str(&cleaned)
            .or_else(|_| Decimal::from_scientific(&cleaned))
            .ok()?;
        Some(if negative { -parsed } else { parsed })
    }

    /// A discount is a fraction in `[0, 1]`.
    pub fn parse_discount(&self, value: &str) -> Option<Decimal> {
        self.parse_decimal(value)
            .filter(|d| *d >= Decimal::ZERO && *d <= Decimal::ONE)
    }

    /// Integer counts; `3.0` is tolerated, `3.5` is not.
    pub fn parse_quantity(&self, value: &str) -> Option<i64> {
        let value = value.trim();
        value.parse::<i64>().ok().or_else(|| {
            self.parse_decimal(value)
                .filter(|d| d.fract().is_zero())
                .and_then(|d| d.to_i64())
        })
    }
}

/// Accumulates typed records and the issues found while converting them.
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    parser: FieldParser,
    records: Vec<OrderRecord>,
    issues: LoadIssues,
}

impl DatasetBuilder {
    pub fn new(parser: FieldParser) -> Self {
        Self {
            parser,
            records: Vec::new(),
            issues: LoadIssues::default(),
        }
    }

    pub fn push(&mut self, row: &RawOrderRow) {
        let record = OrderRecord {
            order_id: text(row, Column::OrderId),
            order_date: self.typed(row, Column::OrderDate, FieldParser::parse_date),
            ship_date: self.typed(row, Column::ShipDate, FieldParser::parse_date),
            customer_id: text(row, Column::CustomerId),
            customer_name: text(row, Column::CustomerName),
            category: text(row, Column::Category),
            sub_category: text(row, Column::SubCategory),
            state: text(row, Column::State),
            sales: self.typed(row, Column::Sales, FieldParser::parse_decimal),
            profit: self.typed(row, Column::Profit, FieldParser::parse_decimal),
            discount: self.typed(row, Column::Discount, FieldParser::parse_discount),
            quantity: self.typed(row, Column::Quantity, FieldParser::parse_quantity),
        };
        self.records.push(record);
    }

    fn typed<T>(
        &mut self,
        row: &RawOrderRow,
        column: Column,
        parse: fn(&FieldParser, &str) -> Option<T>,
    ) -> Option<T> {
        let raw = row.get(column)?;
        let parsed = parse(&self.parser, raw);
        if parsed.is_none() {
            tracing::debug!(column = %column, value = raw, "Unparseable value treated as missing");
            self.issues.record_unparseable(column);
        }
        parsed
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn finish(self) -> Dataset {
        if self.issues.total() > 0 {
            tracing::warn!(
                records = self.records.len(),
                unparseable = self.issues.total(),
                "Some values could not be parsed and were excluded"
            );
        }
        Dataset::new(self.records, self.issues)
    }
}

fn text(row: &RawOrderRow, column: Column) -> Option<String> {
    row.get(column).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_common_date_layouts() {
        let parser = FieldParser::default();
        assert_eq!(parser.parse_date("2023-01-05"), Some(date(2023, 1, 5)));
        assert_eq!(parser.parse_date("11/8/2016"), Some(date(2016, 11, 8)));
        assert_eq!(parser.parse_date("08-11-2016"), Some(date(2016, 11, 8)));
        assert_eq!(parser.parse_date("5 Jan 2023"), Some(date(2023, 1, 5)));
        assert_eq!(parser.parse_date("2023-01-05 00:00:00"), Some(date(2023, 1, 5)));
        assert_eq!(parser.parse_date("2023-01-05T08:30:00"), Some(date(2023, 1, 5)));
        assert_eq!(parser.parse_date("not a date"), None);
        assert_eq!(parser.parse_date("2023-02-30"), None);
    }

    #[test]
    fn configured_layouts_take_precedence_in_order() {
        let parser = FieldParser::new(vec!["%d/%m/%Y".to_string()]);
        assert_eq!(parser.parse_date("03/04/2022"), Some(date(2022, 4, 3)));
        assert_eq!(parser.parse_date("2022-04-03"), None);
    }

    #[test]
    fn parses_currency_amounts() {
        let parser = FieldParser::default();
        assert_eq!(parser.parse_decimal("261.96"), Some(dec!(261.96)));
        assert_eq!(parser.parse_decimal("$1,044.63"), Some(dec!(1044.63)));
        assert_eq!(parser.parse_decimal("-383.031"), Some(dec!(-383.031)));
        assert_eq!(parser.parse_decimal("-$12.50"), Some(dec!(-12.50)));
        assert_eq!(parser.parse_decimal("abc"), None);
    }

    #[test]
    fn discount_must_be_a_fraction() {
        let parser = FieldParser::default();
        assert_eq!(parser.parse_discount("0.2"), Some(dec!(0.2)));
        assert_eq!(parser.parse_discount("1"), Some(dec!(1)));
        assert_eq!(parser.parse_discount("1.5"), None);
        assert_eq!(parser.parse_discount("-0.1"), None);
    }

    #[test]
    fn quantity_accepts_whole_decimals_only() {
        let parser = FieldParser::default();
        assert_eq!(parser.parse_quantity("3"), Some(3));
        assert_eq!(parser.parse_quantity("3.0"), Some(3));
        assert_eq!(parser.parse_quantity("3.5"), None);
    }

    #[test]
    fn builder_separates_missing_from_unparseable() {
        let mut builder = DatasetBuilder::new(FieldParser::default());
        let row = RawOrderRow::new()
            .with(Column::OrderId, "CA-1")
            .with(Column::OrderDate, "31/31/2020")
            .with(Column::ShipDate, "  ")
            .with(Column::Sales, "10.5")
            .with(Column::Quantity, "two");
        builder.push(&row);
        let dataset = builder.finish();

        let record = &dataset.records()[0];
        assert_eq!(record.order_id.as_deref(), Some("CA-1"));
        assert_eq!(record.order_date, None);
        assert_eq!(record.ship_date, None);
        assert_eq!(record.sales, Some(dec!(10.5)));
        assert_eq!(record.quantity, None);

        let issues = dataset.issues();
        assert_eq!(issues.unparseable(Column::OrderDate), 1);
        assert_eq!(issues.unparseable(Column::ShipDate), 0);
        assert_eq!(issues.unparseable(Column::Quantity), 1);
        assert_eq!(issues.total(), 2);
    }
}
