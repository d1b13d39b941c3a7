use crate::error::SourceError;
use configuration::{IngestSettings, SourceSettings};
use core_types::{Column, Dataset, DatasetBuilder, FieldParser, RawOrderRow};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Loads a delimited export of the sales table.
///
/// The first non-blank line is the header. Every column of the schema must
/// appear in it, otherwise nothing is loaded. Columns the schema does not know
/// are ignored; short rows leave the trailing columns missing.
pub fn load_csv(
    path: &Path,
    source: &SourceSettings,
    ingest: &IngestSettings,
) -> Result<Dataset, SourceError> {
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    let delimiter = source.delimiter_char().ok_or_else(|| {
        SourceError::InvalidSettings(format!("delimiter '{}' is not a single character", source.delimiter))
    })?;

    tracing::info!(path = %path.display(), "Loading sales records from file");
    let dataset = read_records(BufReader::new(file), delimiter, ingest)
        .map_err(|e| match e {
            SourceError::Io { source, .. } => io_error(path, source),
            other => other,
        })?;
    tracing::info!(records = dataset.len(), "Sales records loaded");
    Ok(dataset)
}

fn io_error(path: &Path, source: std::io::Error) -> SourceError {
    SourceError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Parses an already opened export. Split out of `load_csv` for testing.
pub fn read_records<R: BufRead>(
    reader: R,
    delimiter: char,
    ingest: &IngestSettings,
) -> Result<Dataset, SourceError> {
    let mut records = RecordReader::new(reader, delimiter);
    let header = records.next_record()?.ok_or(SourceError::MissingHeader)?;

    let missing = Column::missing_from(header.iter().map(String::as_str));
    if !missing.is_empty() {
        return Err(SourceError::MissingColumns(missing));
    }

    // Map every field position to the schema column it feeds, first match wins.
    let mut seen = [false; Column::COUNT];
    let positions: Vec<Option<Column>> = header
        .iter()
        .map(|h| {
            let column = Column::from_header(h)?;
            if std::mem::replace(&mut seen[column.index()], true) {
                None
            } else {
                Some(column)
            }
        })
        .collect();

    let mut builder = DatasetBuilder::new(FieldParser::new(ingest.date_formats.clone()));
    while let Some(fields) = records.next_record()? {
        let mut row = RawOrderRow::new();
        for (field, column) in fields.into_iter().zip(&positions) {
            if let Some(column) = column {
                row.set(*column, field);
            }
        }
        builder.push(&row);
    }

    Ok(builder.finish())
}

/// Yields records, joining physical lines while a quoted field is still open.
struct RecordReader<R> {
    reader: R,
    delimiter: char,
    buf: Vec<u8>,
}

impl<R: BufRead> RecordReader<R> {
    fn new(reader: R, delimiter: char) -> Self {
        Self {
            reader,
            delimiter,
            buf: Vec::new(),
        }
    }

    fn next_physical(&mut self) -> Result<Option<String>, SourceError> {
        self.buf.clear();
        let read = self
            .reader
            .read_until(b'\n', &mut self.buf)
            .map_err(|source| SourceError::Io {
                path: String::new(),
                source,
            })?;
        if read == 0 {
            return Ok(None);
        }
        // Exports from spreadsheet tools are not always UTF-8.
        let line = String::from_utf8_lossy(&self.buf);
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    /// The fields of the next non-blank record, or `None` at end of input.
    fn next_record(&mut self) -> Result<Option<Vec<String>>, SourceError> {
        let mut line = loop {
            match self.next_physical()? {
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => break line,
                None => return Ok(None),
            }
        };
        loop {
            let split = split_fields(&line, self.delimiter);
            if !split.open_quote {
                return Ok(Some(split.fields));
            }
            match self.next_physical()? {
                Some(next) => {
                    line.push('\n');
                    line.push_str(&next);
                }
                // An unterminated quote runs to the end of the input.
                None => return Ok(Some(split.fields)),
            }
        }
    }
}

/// Result of splitting one logical line.
struct SplitLine {
    fields: Vec<String>,
    /// The line ended inside a quoted field.
    open_quote: bool,
}

/// Splits one record on `delimiter`.
///
/// A field is quoted only when `"` is its first non-blank character; inside
/// it `""` is a literal quote. A `"` anywhere else is kept as text.
fn split_fields(line: &str, delimiter: char) -> SplitLine {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut started = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c != '"' {
                current.push(c);
            } else if chars.peek() == Some(&'"') {
                chars.next();
                current.push('"');
            } else {
                in_quotes = false;
            }
            continue;
        }
        if c == delimiter {
            fields.push(current.trim().to_string());
            current.clear();
            started = false;
        } else if c == '"' && !started {
            current.clear();
            in_quotes = true;
            started = true;
        } else {
            if !c.is_whitespace() {
                started = true;
            }
            current.push(c);
        }
    }
    fields.push(current.trim().to_string());

    SplitLine {
        fields,
        open_quote: in_quotes,
    }
}

/// Splits a single physical line into trimmed fields.
pub fn parse_line(line: &str, delimiter: char) -> Vec<String> {
    split_fields(line, delimiter).fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    const HEADER: &str = "Row ID,Order ID,Order Date,Ship Date,Customer ID,Customer Name,Category,Sub-Category,State,Sales,Quantity,Discount,Profit";

    fn read(contents: &str) -> Result<Dataset, SourceError> {
        read_records(Cursor::new(contents.as_bytes().to_vec()), ',', &IngestSettings::default())
    }

    #[test]
    fn splits_quoted_fields() {
        assert_eq!(parse_line(r#"a,"b, c",d"#, ','), vec!["a", "b, c", "d"]);
        assert_eq!(parse_line(r#""say ""hi""",x"#, ','), vec![r#"say "hi""#, "x"]);
        assert_eq!(parse_line("a;;b", ';'), vec!["a", "", "b"]);
    }

    #[test]
    fn quotes_inside_unquoted_fields_are_literal() {
        assert_eq!(parse_line(r#"O1,Ann 19" Rack,x"#, ','), vec!["O1", r#"Ann 19" Rack"#, "x"]);
        assert_eq!(parse_line(r#"a, "b,c" ,d"#, ','), vec!["a", "b,c", "d"]);
        assert!(!split_fields(r#"5" screen,1"#, ',').open_quote);
        assert!(split_fields(r#"a,"open"#, ',').open_quote);
    }

    #[test]
    fn stray_quote_does_not_swallow_following_rows() {
        let data = format!(
            "{HEADER}\n\
             1,O1,2020-01-01,2020-01-02,C1,Ann 19\" Rack,Furniture,Tables,Ohio,10,1,0,2\n\
             2,O2,2020-01-03,2020-01-04,C2,Bob,Technology,Phones,Utah,20,2,0,4\n\
             3,O3,2020-01-05,2020-01-05,C3,Cy,Furniture,Chairs,Texas,30,3,0,6\n"
        );
        let dataset = read(&data).unwrap();
        assert_eq!(dataset.len(), 3);

        let first = &dataset.records()[0];
        assert_eq!(first.customer_name.as_deref(), Some("Ann 19\" Rack"));
        assert_eq!(first.sales.map(|s| s.to_string()), Some("10".to_string()));
        assert_eq!(dataset.records()[2].order_id.as_deref(), Some("O3"));
        assert_eq!(dataset.issues().total(), 0);
    }

    #[test]
    fn loads_rows_into_typed_records() {
        let data = format!(
            "{HEADER}\r\n\
             1,CA-2016-152156,11/8/2016,11/11/2016,CG-12520,Claire Gute,Furniture,Bookcases,Kentucky,261.96,2,0,41.9136\r\n\
             \r\n\
             2,CA-2016-152156,11/8/2016,11/11/2016,CG-12520,Claire Gute,Furniture,\"Chairs, Office\",Kentucky,731.94,3,0,219.582\r\n"
        );
        let dataset = read(&data).unwrap();
        assert_eq!(dataset.len(), 2);

        let first = &dataset.records()[0];
        assert_eq!(first.order_id.as_deref(), Some("CA-2016-152156"));
        assert_eq!(first.delay_days(), Some(3));
        assert_eq!(first.quantity, Some(2));
        assert_eq!(first.profit.map(|p| p.to_string()), Some("41.9136".to_string()));
        assert_eq!(dataset.records()[1].sub_category.as_deref(), Some("Chairs, Office"));
        assert_eq!(dataset.issues().total(), 0);
    }

    #[test]
    fn quoted_newlines_stay_in_one_record() {
        let data = format!("{HEADER}\n1,A,2020-01-01,2020-01-02,C1,\"Multi\nLine\",Tech,Phones,Ohio,1,1,0,1\n");
        let dataset = read(&data).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records()[0].customer_name.as_deref(), Some("Multi\nLine"));
    }

    #[test]
    fn short_rows_and_bad_cells_become_missing() {
        let data = format!("{HEADER}\n1,A,not-a-date,2020-01-02,C1,Ann,Tech\n");
        let dataset = read(&data).unwrap();
        let record = &dataset.records()[0];
        assert_eq!(record.order_date, None);
        assert_eq!(record.state, None);
        assert_eq!(dataset.issues().unparseable(Column::OrderDate), 1);
    }

    #[test]
    fn missing_columns_fail_the_load() {
        let err = read("Order ID,Order Date,Sales\nA,2020-01-01,5\n").unwrap_err();
        match err {
            SourceError::MissingColumns(columns) => {
                assert!(columns.contains(&Column::ShipDate));
                assert!(columns.contains(&Column::Profit));
                assert!(!columns.contains(&Column::Sales));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_input_has_no_header() {
        assert!(matches!(read("\n\n"), Err(SourceError::MissingHeader)));
    }

    #[test]
    fn loads_from_disk_with_configured_delimiter() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", HEADER.replace(',', ";")).unwrap();
        writeln!(file, "1;A;2021-03-01;2021-03-01;C1;Ann;Tech;Phones;Utah;10.5;1;0.1;2").unwrap();

        let source = SourceSettings {
            delimiter: ";".to_string(),
            ..Default::default()
        };
        let dataset = load_csv(file.path(), &source, &IngestSettings::default()).unwrap();
        let record = &dataset.records()[0];
        assert_eq!(record.valid_delay_days(), Some(0));
        assert_eq!(record.sales.map(|s| s.to_string()), Some("10.5".to_string()));
        assert_eq!(record.discount.map(|d| d.to_string()), Some("0.1".to_string()));
    }

    #[test]
    fn unreadable_path_reports_the_path() {
        let err = load_csv(
            Path::new("/no/such/export.csv"),
            &SourceSettings::default(),
            &IngestSettings::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("/no/such/export.csv"));
    }
}
