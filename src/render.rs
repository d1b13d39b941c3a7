use analytics::{
    CategoryProfitability, CompletenessAudit, CustomerMetrics, CustomerProfit, FullReport,
    KpiSummary, MonthlyOrderTrend, QuarterlyOrderTrend, RepeatCustomer, ShippingDelay,
    StateDeliveryTrend, YearlyOrderTrend,
};
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use configuration::OutputFormat;
use database::DateNormalization;
use serde::Serialize;
use std::fmt::Display;

/// A titled table of already formatted cells.
pub struct Section {
    pub title: String,
    pub header: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl Section {
    fn to_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(self.header.clone());
        for row in &self.rows {
            table.add_row(row.clone());
        }
        table
    }
}

/// One row of a list-shaped report.
pub trait TableRow {
    const TITLE: &'static str;
    const HEADER: &'static [&'static str];
    fn cells(&self) -> Vec<String>;
}

/// Anything the CLI can print.
pub trait Report: Serialize {
    fn sections(&self) -> Vec<Section>;
}

impl<T: TableRow + Serialize> Report for Vec<T> {
    fn sections(&self) -> Vec<Section> {
        vec![section(self)]
    }
}

fn section<T: TableRow>(rows: &[T]) -> Section {
    Section {
        title: T::TITLE.to_string(),
        header: T::HEADER.to_vec(),
        rows: rows.iter().map(TableRow::cells).collect(),
    }
}

/// Renders a report as tables or as pretty JSON.
pub fn render<R: Report>(report: &R, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Table => {
            let blocks: Vec<String> = report
                .sections()
                .iter()
                .map(|s| {
                    if s.rows.is_empty() {
                        format!("{}\n(no rows)", s.title)
                    } else {
                        format!("{}\n{}", s.title, s.to_table())
                    }
                })
                .collect();
            Ok(blocks.join("\n\n"))
        }
    }
}

/// `-` stands in for undefined values.
fn opt<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

impl TableRow for ShippingDelay {
    const TITLE: &'static str = "Shipping delays";
    const HEADER: &'static [&'static str] = &["Order ID", "Order Date", "Ship Date", "Days"];

    fn cells(&self) -> Vec<String> {
        vec![
            opt(self.order_id.as_deref()),
            self.order_date.to_string(),
            self.ship_date.to_string(),
            self.delay_days.to_string(),
        ]
    }
}

impl TableRow for StateDeliveryTrend {
    const TITLE: &'static str = "Delivery by state";
    const HEADER: &'static [&'static str] = &["State", "Min Days", "Max Days", "Avg Days", "Orders"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.state.clone(),
            self.min_days.to_string(),
            self.max_days.to_string(),
            self.avg_days.to_string(),
            self.order_count.to_string(),
        ]
    }
}

impl TableRow for YearlyOrderTrend {
    const TITLE: &'static str = "Orders per year";
    const HEADER: &'static [&'static str] = &["Year", "Orders", "YoY Growth %"];

    fn cells(&self) -> Vec<String> {
        vec![self.year.to_string(), self.orders.to_string(), opt(self.yoy_growth_pct)]
    }
}

impl TableRow for QuarterlyOrderTrend {
    const TITLE: &'static str = "Orders per quarter";
    const HEADER: &'static [&'static str] = &["Year", "Quarter", "Orders", "Sales"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.year.to_string(),
            format!("Q{}", self.quarter),
            self.orders.to_string(),
            self.total_sales.to_string(),
        ]
    }
}

impl TableRow for MonthlyOrderTrend {
    const TITLE: &'static str = "Orders per month";
    const HEADER: &'static [&'static str] = &["Year", "Month", "Orders", "Sales"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.year.to_string(),
            format!("{:02}", self.month),
            self.orders.to_string(),
            self.total_sales.to_string(),
        ]
    }
}

impl TableRow for CategoryProfitability {
    const TITLE: &'static str = "Profitability";
    const HEADER: &'static [&'static str] = &[
        "Category",
        "Sub-Category",
        "Sales",
        "Profit",
        "Margin %",
        "Avg Discount",
        "Units",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.category.clone(),
            opt(self.sub_category.as_deref()),
            self.total_sales.to_string(),
            self.total_profit.to_string(),
            opt(self.profit_margin_pct),
            opt(self.avg_discount),
            self.units_sold.to_string(),
        ]
    }
}

impl TableRow for RepeatCustomer {
    const TITLE: &'static str = "Repeat customers";
    const HEADER: &'static [&'static str] = &["Customer ID", "Customer Name", "Active Years"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.customer_id.clone(),
            opt(self.customer_name.as_deref()),
            self.active_years.to_string(),
        ]
    }
}

impl TableRow for CustomerProfit {
    const TITLE: &'static str = "Most profitable customers";
    const HEADER: &'static [&'static str] =
        &["Rank", "Customer ID", "Customer Name", "Profit", "Sales", "Orders"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.rank.to_string(),
            self.customer_id.clone(),
            opt(self.customer_name.as_deref()),
            self.total_profit.to_string(),
            self.total_sales.to_string(),
            self.orders.to_string(),
        ]
    }
}

impl TableRow for DateNormalization {
    const TITLE: &'static str = "Date normalization";
    const HEADER: &'static [&'static str] =
        &["Column", "Rewritten", "Already ISO", "Unparseable", "Skipped"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.column.to_string(),
            self.rewritten_rows.to_string(),
            self.already_iso_rows.to_string(),
            self.unparseable_rows.to_string(),
            if self.skipped { "yes" } else { "no" }.to_string(),
        ]
    }
}

impl Report for CompletenessAudit {
    fn sections(&self) -> Vec<Section> {
        let mut rows: Vec<Vec<String>> = self
            .columns
            .iter()
            .map(|c| vec![c.column.to_string(), c.missing.to_string(), c.unparseable.to_string()])
            .collect();
        rows.push(vec![
            "Ship Date before Order Date".to_string(),
            self.negative_delays.to_string(),
            "-".to_string(),
        ]);
        vec![Section {
            title: format!("Completeness audit ({} records)", self.total_records),
            header: vec!["Column", "Missing", "Unparseable"],
            rows,
        }]
    }
}

impl Report for CustomerMetrics {
    fn sections(&self) -> Vec<Section> {
        vec![
            Section {
                title: "Customers".to_string(),
                header: vec!["Distinct Customers", "Repeat Customers"],
                rows: vec![vec![
                    self.distinct_customers.to_string(),
                    self.repeat_customers.len().to_string(),
                ]],
            },
            section(&self.repeat_customers),
            section(&self.top_customers),
        ]
    }
}

impl Report for KpiSummary {
    fn sections(&self) -> Vec<Section> {
        let metric = |name: &str, value: String| vec![name.to_string(), value];
        vec![Section {
            title: "KPI summary".to_string(),
            header: vec!["Metric", "Value"],
            rows: vec![
                metric("Total Sales", self.total_sales.to_string()),
                metric("Total Orders", self.total_orders.to_string()),
                metric("Avg Sales per Order", opt(self.avg_sales_per_order)),
                metric("Units Sold", self.total_units_sold.to_string()),
                metric("Total Profit", self.total_profit.to_string()),
                metric("Profit Margin %", opt(self.profit_margin_pct)),
                metric("Customers", self.total_customers.to_string()),
                metric("Repeat Customers", self.repeat_customers.to_string()),
                metric("Avg Days to Ship", opt(self.avg_delay_days)),
                metric("Min Days to Ship", opt(self.min_delay_days)),
                metric("Max Days to Ship", opt(self.max_delay_days)),
                metric("Same-Day Orders", self.same_day_orders.to_string()),
                metric("Latest Year", opt(self.latest_year)),
                metric("Latest Year Orders", opt(self.latest_year_orders)),
                metric("Latest Year Growth %", opt(self.latest_year_growth_pct)),
            ],
        }]
    }
}

impl Report for FullReport {
    fn sections(&self) -> Vec<Section> {
        let mut sections = self.audit.sections();
        let mut same_day = section(&self.same_day_shipments);
        same_day.title = "Same-day shipments".to_string();
        sections.push(same_day);
        sections.push(section(&self.delivery_by_state));
        sections.push(section(&self.yearly_trend));
        sections.push(section(&self.quarterly_trend));
        sections.push(section(&self.monthly_trend));
        sections.push(section(&self.category_profitability));
        let mut by_sub = section(&self.sub_category_profitability);
        by_sub.title = "Profitability by sub-category".to_string();
        sections.push(by_sub);
        sections.extend(self.customers.sections());
        sections.extend(self.kpi.sections());
        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn trend() -> Vec<YearlyOrderTrend> {
        vec![
            YearlyOrderTrend {
                year: 2022,
                orders: 3,
                yoy_growth_pct: None,
            },
            YearlyOrderTrend {
                year: 2023,
                orders: 6,
                yoy_growth_pct: Some(dec!(100.00)),
            },
        ]
    }

    #[test]
    fn undefined_values_render_as_dash_in_tables() {
        let out = render(&trend(), OutputFormat::Table).unwrap();
        assert!(out.starts_with("Orders per year"));
        assert!(out.contains("YoY Growth %"));
        assert!(out.contains("100.00"));
        assert!(out.contains('-'));
    }

    #[test]
    fn undefined_values_are_null_in_json() {
        let out = render(&trend(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(value[0]["yoy_growth_pct"].is_null());
        assert_eq!(value[1]["yoy_growth_pct"], "100.00");
    }

    #[test]
    fn empty_reports_say_so() {
        let out = render(&Vec::<ShippingDelay>::new(), OutputFormat::Table).unwrap();
        assert_eq!(out, "Shipping delays\n(no rows)");
    }
}
