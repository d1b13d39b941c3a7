use crate::customers;
use crate::delivery::DelayStats;
use crate::math;
use crate::report::KpiSummary;
use crate::trends;
use core_types::OrderRecord;

/// Composes the headline numbers of every other report into one row.
pub fn summarize(records: &[OrderRecord]) -> KpiSummary {
    let total_sales = math::total(records.iter().filter_map(|r| r.sales));
    let total_profit = math::total(records.iter().filter_map(|r| r.profit));
    let total_units_sold = records
        .iter()
        .filter_map(|r| r.quantity)
        .fold(0i64, i64::saturating_add);
    let total_orders = trends::distinct_orders(records);

    let delays = DelayStats::from_records(records);
    let latest = trends::yearly(records).pop();

    tracing::debug!(
        records = records.len(),
        orders = total_orders,
        delays = delays.count,
        "Summarizing KPIs"
    );

    KpiSummary {
        total_sales,
        total_orders,
        avg_sales_per_order: math::mean(total_sales, total_orders),
        total_units_sold,
        total_profit,
        profit_margin_pct: math::percentage(total_profit, total_sales),
        total_customers: customers::distinct_customers(records),
        repeat_customers: customers::repeat_customers(records).len(),
        avg_delay_days: delays.avg_days(),
        min_delay_days: delays.min_days,
        max_delay_days: delays.max_days,
        same_day_orders: delays.same_day,
        latest_year: latest.as_ref().map(|y| y.year),
        latest_year_orders: latest.as_ref().map(|y| y.orders),
        latest_year_growth_pct: latest.and_then(|y| y.yoy_growth_pct),
    }
}
