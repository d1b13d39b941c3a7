use crate::enums::Column;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the sales table: a single line item within an order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: Option<String>,
    pub order_date: Option<NaiveDate>,
    pub ship_date: Option<NaiveDate>,
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub state: Option<String>,
    pub sales: Option<Decimal>,
    pub profit: Option<Decimal>,
    pub discount: Option<Decimal>,
    pub quantity: Option<i64>,
}

impl OrderRecord {
    /// Days between order and shipment. Negative when the ship date precedes
    /// the order date; `None` when either date is absent.
    pub fn delay_days(&self) -> Option<i64> {
        match (self.order_date, self.ship_date) {
            (Some(ordered), Some(shipped)) => Some((shipped - ordered).num_days()),
            _ => None,
        }
    }

    /// The delay, only when it is a valid (non-negative) shipping delay.
    pub fn valid_delay_days(&self) -> Option<i64> {
        self.delay_days().filter(|d| *d >= 0)
    }

    pub fn order_year(&self) -> Option<i32> {
        self.order_date.map(|d| d.year())
    }

    /// Whether the value of `column` is absent on this record.
    pub fn is_missing(&self, column: Column) -> bool {
        match column {
            Column::OrderId => self.order_id.is_none(),
            Column::OrderDate => self.order_date.is_none(),
            Column::ShipDate => self.ship_date.is_none(),
            Column::CustomerId => self.customer_id.is_none(),
            Column::CustomerName => self.customer_name.is_none(),
            Column::Category => self.category.is_none(),
            Column::SubCategory => self.sub_category.is_none(),
            Column::State => self.state.is_none(),
            Column::Sales => self.sales.is_none(),
            Column::Profit => self.profit.is_none(),
            Column::Discount => self.discount.is_none(),
            Column::Quantity => self.quantity.is_none(),
        }
    }
}

/// Values that were present in the source but could not be parsed, per column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadIssues {
    unparseable: [usize; Column::COUNT],
}

impl LoadIssues {
    pub fn record_unparseable(&mut self, column: Column) {
        self.unparseable[column.index()] += 1;
    }

    pub fn unparseable(&self, column: Column) -> usize {
        self.unparseable[column.index()]
    }

    pub fn total(&self) -> usize {
        self.unparseable.iter().sum()
    }
}

/// The immutable input of every report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<OrderRecord>,
    issues: LoadIssues,
}

impl Dataset {
    pub fn new(records: Vec<OrderRecord>, issues: LoadIssues) -> Self {
        Self { records, issues }
    }

    /// A dataset built in memory, with no parsing history.
    pub fn from_records(records: Vec<OrderRecord>) -> Self {
        Self::new(records, LoadIssues::default())
    }

    pub fn records(&self) -> &[OrderRecord] {
        &self.records
    }

    pub fn issues(&self) -> &LoadIssues {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
