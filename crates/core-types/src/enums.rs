use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every column of the sales table the reports know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Column {
    OrderId,
    OrderDate,
    ShipDate,
    CustomerId,
    CustomerName,
    Category,
    SubCategory,
    State,
    Sales,
    Profit,
    Discount,
    Quantity,
}

impl Column {
    pub const COUNT: usize = 12;

    /// The full schema in table order.
    pub const ALL: [Column; Column::COUNT] = [
        Column::OrderId,
        Column::OrderDate,
        Column::ShipDate,
        Column::CustomerId,
        Column::CustomerName,
        Column::Category,
        Column::SubCategory,
        Column::State,
        Column::Sales,
        Column::Profit,
        Column::Discount,
        Column::Quantity,
    ];

    /// Position of the column inside `ALL`.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The header used by the exported spreadsheet files.
    pub fn header(self) -> &'static str {
        match self {
            Column::OrderId => "Order ID",
            Column::OrderDate => "Order Date",
            Column::ShipDate => "Ship Date",
            Column::CustomerId => "Customer ID",
            Column::CustomerName => "Customer Name",
            Column::Category => "Category",
            Column::SubCategory => "Sub-Category",
            Column::State => "State",
            Column::Sales => "Sales",
            Column::Profit => "Profit",
            Column::Discount => "Discount",
            Column::Quantity => "Quantity",
        }
    }

    /// The column name in the database table.
    pub fn db_name(self) -> &'static str {
        match self {
            Column::OrderId => "order_id",
            Column::OrderDate => "order_date",
            Column::ShipDate => "ship_date",
            Column::CustomerId => "customer_id",
            Column::CustomerName => "customer_name",
            Column::Category => "category",
            Column::SubCategory => "sub_category",
            Column::State => "state",
            Column::Sales => "sales",
            Column::Profit => "profit",
            Column::Discount => "discount",
            Column::Quantity => "quantity",
        }
    }

    /// Resolves a header loosely: case, spaces, `-` and `_` are ignored.
    pub fn from_header(header: &str) -> Option<Column> {
        let wanted = normalize_header(header);
        Column::ALL
            .into_iter()
            .find(|c| normalize_header(c.db_name()) == wanted)
    }

    /// Returns the columns of the schema that none of `headers` resolve to.
    pub fn missing_from<'a, I>(headers: I) -> Vec<Column>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut present = [false; Column::COUNT];
        for column in headers.into_iter().filter_map(Column::from_header) {
            present[column.index()] = true;
        }
        Column::ALL
            .into_iter()
            .filter(|c| !present[c.index()])
            .collect()
    }
}

fn normalize_header(header: &str) -> String {
    header
        .trim()
        .trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

impl FromStr for Column {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::from_header(s).ok_or_else(|| CoreError::UnknownColumn(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_position_in_all() {
        for (i, column) in Column::ALL.iter().enumerate() {
            assert_eq!(column.index(), i);
        }
    }

    #[test]
    fn headers_resolve_loosely() {
        assert_eq!(Column::from_header("Order ID"), Some(Column::OrderId));
        assert_eq!(Column::from_header("order_id"), Some(Column::OrderId));
        assert_eq!(Column::from_header("SUB-CATEGORY"), Some(Column::SubCategory));
        assert_eq!(Column::from_header("\u{feff}Order Date"), Some(Column::OrderDate));
        assert_eq!(Column::from_header("Row ID"), None);
    }

    #[test]
    fn missing_columns_are_reported_in_schema_order() {
        let headers = ["Order ID", "Order Date", "Ship Date", "Customer ID", "Sales", "Region"];
        let missing = Column::missing_from(headers);
        assert_eq!(
            missing,
            vec![
                Column::CustomerName,
                Column::Category,
                Column::SubCategory,
                Column::State,
                Column::Profit,
                Column::Discount,
                Column::Quantity,
            ]
        );
    }

    #[test]
    fn unknown_column_fails_to_parse() {
        assert!("Postal Code".parse::<Column>().is_err());
        assert_eq!("profit".parse::<Column>().unwrap(), Column::Profit);
    }
}
