use crate::math;
use crate::report::{CustomerMetrics, CustomerProfit, RepeatCustomer};
use core_types::OrderRecord;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Everything known about one customer ID.
#[derive(Debug, Default)]
struct CustomerTotals<'a> {
    name: Option<&'a str>,
    active_years: BTreeSet<i32>,
    orders: HashSet<&'a str>,
    profit: Decimal,
    sales: Decimal,
}

impl<'a> CustomerTotals<'a> {
    fn add(&mut self, record: &'a OrderRecord) {
        // Keep the smallest name so the choice does not depend on row order.
        if let Some(name) = record.customer_name.as_deref() {
            self.name = Some(self.name.map_or(name, |current| current.min(name)));
        }
        if let Some(year) = record.order_year() {
            self.active_years.insert(year);
        }
        if let Some(order_id) = record.order_id.as_deref() {
            self.orders.insert(order_id);
        }
        self.profit = math::saturating_add(self.profit, record.profit.unwrap_or_default());
        self.sales = math::saturating_add(self.sales, record.sales.unwrap_or_default());
    }
}

fn by_customer(records: &[OrderRecord]) -> BTreeMap<&str, CustomerTotals<'_>> {
    let mut customers: BTreeMap<&str, CustomerTotals<'_>> = BTreeMap::new();
    for record in records {
        if let Some(customer_id) = record.customer_id.as_deref() {
            customers.entry(customer_id).or_default().add(record);
        }
    }
    customers
}

/// Customers active in more than one calendar year, ordered by customer ID.
pub fn repeat_customers(records: &[OrderRecord]) -> Vec<RepeatCustomer> {
    by_customer(records)
        .into_iter()
        .filter(|(_, totals)| totals.active_years.len() > 1)
        .map(|(customer_id, totals)| RepeatCustomer {
            customer_id: customer_id.to_string(),
            customer_name: totals.name.map(str::to_string),
            active_years: totals.active_years.len(),
        })
        .collect()
}

/// The `limit` most profitable customers. Ties go to the smaller customer ID.
pub fn top_by_profit(records: &[OrderRecord], limit: usize) -> Vec<CustomerProfit> {
    let mut ranked: Vec<_> = by_customer(records).into_iter().collect();
    // The map yields IDs in ascending order and the sort is stable.
    ranked.sort_by(|(_, a), (_, b)| b.profit.cmp(&a.profit));

    ranked
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, (customer_id, totals))| CustomerProfit {
            rank: i + 1,
            customer_id: customer_id.to_string(),
            customer_name: totals.name.map(str::to_string),
            total_profit: totals.profit,
            total_sales: totals.sales,
            orders: totals.orders.len(),
        })
        .collect()
}

pub fn distinct_customers(records: &[OrderRecord]) -> usize {
    records
        .iter()
        .filter_map(|r| r.customer_id.as_deref())
        .collect::<HashSet<_>>()
        .len()
}

pub fn metrics(records: &[OrderRecord], top_n: usize) -> CustomerMetrics {
    CustomerMetrics {
        distinct_customers: distinct_customers(records),
        repeat_customers: repeat_customers(records),
        top_customers: top_by_profit(records, top_n),
    }
}
