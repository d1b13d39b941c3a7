use crate::report::{ColumnAudit, CompletenessAudit};
use core_types::{Column, Dataset};

/// Counts absent values for every column of the schema.
pub fn completeness(dataset: &Dataset) -> CompletenessAudit {
    let records = dataset.records();
    let columns = Column::ALL
        .into_iter()
        .map(|column| ColumnAudit {
            column,
            missing: records.iter().filter(|r| r.is_missing(column)).count(),
            unparseable: dataset.issues().unparseable(column),
        })
        .collect();

    let negative_delays = records
        .iter()
        .filter(|r| r.delay_days().is_some_and(|d| d < 0))
        .count();
    if negative_delays > 0 {
        tracing::warn!(negative_delays, "Records shipped before they were ordered");
    }

    CompletenessAudit {
        total_records: records.len(),
        columns,
        negative_delays,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::{DatasetBuilder, FieldParser, OrderRecord, RawOrderRow};

    #[test]
    fn counts_missing_and_unparseable_per_column() {
        let mut builder = DatasetBuilder::new(FieldParser::default());
        builder.push(
            &RawOrderRow::new()
                .with(Column::OrderId, "A")
                .with(Column::OrderDate, "2023-01-01")
                .with(Column::ShipDate, "garbage"),
        );
        builder.push(&RawOrderRow::new().with(Column::OrderId, "B"));
        let audit = completeness(&builder.finish());

        assert_eq!(audit.total_records, 2);
        assert_eq!(audit.columns.len(), Column::COUNT);
        let ship = audit.columns.iter().find(|c| c.column == Column::ShipDate).unwrap();
        assert_eq!((ship.missing, ship.unparseable), (2, 1));
        let order_id = audit.columns.iter().find(|c| c.column == Column::OrderId).unwrap();
        assert_eq!((order_id.missing, order_id.unparseable), (0, 0));
        let order_date = &audit.columns[Column::OrderDate.index()];
        assert_eq!(order_date.missing, 1);
    }

    #[test]
    fn flags_shipments_before_orders() {
        let record = OrderRecord {
            order_date: NaiveDate::from_ymd_opt(2023, 5, 2),
            ship_date: NaiveDate::from_ymd_opt(2023, 5, 1),
            ..Default::default()
        };
        let audit = completeness(&Dataset::from_records(vec![record]));
        assert_eq!(audit.negative_delays, 1);
    }

    #[test]
    fn empty_dataset_has_zero_counts() {
        let audit = completeness(&Dataset::default());
        assert_eq!(audit.total_records, 0);
        assert!(audit.columns.iter().all(|c| c.missing == 0 && c.unparseable == 0));
    }
}
