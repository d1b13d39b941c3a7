use chrono::NaiveDate;
use core_types::Column;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Missing and unparseable value counts for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnAudit {
    pub column: Column,
    /// Absent values, including those that failed to parse.
    pub missing: usize,
    /// The share of `missing` that was present in the source but unparseable.
    pub unparseable: usize,
}

/// Data-quality overview of the whole dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletenessAudit {
    pub total_records: usize,
    pub columns: Vec<ColumnAudit>,
    /// Records whose ship date precedes their order date.
    pub negative_delays: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingDelay {
    pub order_id: Option<String>,
    pub order_date: NaiveDate,
    pub ship_date: NaiveDate,
    pub delay_days: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDeliveryTrend {
    pub state: String,
    pub min_days: i64,
    pub max_days: i64,
    pub avg_days: Decimal,
    /// Shipped records in the state.
    pub order_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyOrderTrend {
    pub year: i32,
    pub orders: usize,
    /// `None` for the first year: there is nothing to compare against.
    pub yoy_growth_pct: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterlyOrderTrend {
    pub year: i32,
    pub quarter: u32,
    pub orders: usize,
    pub total_sales: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyOrderTrend {
    pub year: i32,
    pub month: u32,
    pub orders: usize,
    pub total_sales: Decimal,
}

/// Granularity of the order-trend report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrendPeriod {
    #[default]
    Yearly,
    Quarterly,
    Monthly,
}

/// Level of the product taxonomy to group profitability by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProfitLevel {
    #[default]
    Category,
    SubCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryProfitability {
    pub category: String,
    /// Only set when grouping by `ProfitLevel::SubCategory`.
    pub sub_category: Option<String>,
    pub total_sales: Decimal,
    pub total_profit: Decimal,
    /// `None` when the group's sales sum to zero.
    pub profit_margin_pct: Option<Decimal>,
    pub avg_discount: Option<Decimal>,
    pub units_sold: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatCustomer {
    pub customer_id: String,
    pub customer_name: Option<String>,
    pub active_years: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerProfit {
    pub rank: usize,
    pub customer_id: String,
    pub customer_name: Option<String>,
    pub total_profit: Decimal,
    pub total_sales: Decimal,
    pub orders: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerMetrics {
    pub distinct_customers: usize,
    pub repeat_customers: Vec<RepeatCustomer>,
    pub top_customers: Vec<CustomerProfit>,
}

/// The single-row summary of the business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiSummary {
    // I. Revenue
    pub total_sales: Decimal,
    pub total_orders: usize,
    pub avg_sales_per_order: Option<Decimal>,
    pub total_units_sold: i64,

    // II. Profitability
    pub total_profit: Decimal,
    pub profit_margin_pct: Option<Decimal>,

    // III. Customers
    pub total_customers: usize,
    pub repeat_customers: usize,

    // IV. Shipping
    pub avg_delay_days: Option<Decimal>,
    pub min_delay_days: Option<i64>,
    pub max_delay_days: Option<i64>,
    pub same_day_orders: usize,

    // V. Most recent year
    pub latest_year: Option<i32>,
    pub latest_year_orders: Option<usize>,
    pub latest_year_growth_pct: Option<Decimal>,
}

/// Every report, computed over the same dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullReport {
    pub audit: CompletenessAudit,
    pub same_day_shipments: Vec<ShippingDelay>,
    pub delivery_by_state: Vec<StateDeliveryTrend>,
    pub yearly_trend: Vec<YearlyOrderTrend>,
    pub quarterly_trend: Vec<QuarterlyOrderTrend>,
    pub monthly_trend: Vec<MonthlyOrderTrend>,
    pub category_profitability: Vec<CategoryProfitability>,
    pub sub_category_profitability: Vec<CategoryProfitability>,
    pub customers: CustomerMetrics,
    pub kpi: KpiSummary,
}
