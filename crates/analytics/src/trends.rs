use crate::math;
use crate::report::{MonthlyOrderTrend, QuarterlyOrderTrend, YearlyOrderTrend};
use chrono::{Datelike, NaiveDate};
use core_types::OrderRecord;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};

/// Distinct orders and sales accumulated for one period.
#[derive(Debug, Default)]
struct PeriodTotals<'a> {
    orders: HashSet<&'a str>,
    sales: Decimal,
}

/// Groups dated records by `key`. Periods come back in ascending key order.
fn group_by_period<'a, K, F>(records: &'a [OrderRecord], key: F) -> BTreeMap<K, PeriodTotals<'a>>
where
    K: Ord,
    F: Fn(NaiveDate) -> K,
{
    let mut periods: BTreeMap<K, PeriodTotals<'a>> = BTreeMap::new();
    for record in records {
        let Some(order_date) = record.order_date else {
            continue;
        };
        let totals = periods.entry(key(order_date)).or_default();
        if let Some(order_id) = record.order_id.as_deref() {
            totals.orders.insert(order_id);
        }
        totals.sales = math::saturating_add(totals.sales, record.sales.unwrap_or_default());
    }
    periods
}

/// Orders per year, with growth against the preceding year in the data.
pub fn yearly(records: &[OrderRecord]) -> Vec<YearlyOrderTrend> {
    let mut previous: Option<usize> = None;
    group_by_period(records, |d| d.year())
        .into_iter()
        .map(|(year, totals)| {
            let orders = totals.orders.len();
            let yoy_growth_pct = previous.and_then(|prev| math::growth_pct(orders, prev));
            previous = Some(orders);
            YearlyOrderTrend {
                year,
                orders,
                yoy_growth_pct,
            }
        })
        .collect()
}

pub fn quarterly(records: &[OrderRecord]) -> Vec<QuarterlyOrderTrend> {
    group_by_period(records, |d| (d.year(), d.month0() / 3 + 1))
        .into_iter()
        .map(|((year, quarter), totals)| QuarterlyOrderTrend {
            year,
            quarter,
            orders: totals.orders.len(),
            total_sales: totals.sales,
        })
        .collect()
}

pub fn monthly(records: &[OrderRecord]) -> Vec<MonthlyOrderTrend> {
    group_by_period(records, |d| (d.year(), d.month()))
        .into_iter()
        .map(|((year, month), totals)| MonthlyOrderTrend {
            year,
            month,
            orders: totals.orders.len(),
            total_sales: totals.sales,
        })
        .collect()
}

/// Number of distinct order IDs in the slice.
pub fn distinct_orders(records: &[OrderRecord]) -> usize {
    records
        .iter()
        .filter_map(|r| r.order_id.as_deref())
        .collect::<HashSet<_>>()
        .len()
}
