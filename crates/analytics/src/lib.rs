//! # Sales Reporting Engine
//!
//! This crate computes the descriptive reports over the sales table: the
//! completeness audit, shipping delays, delivery trends, order trends,
//! profitability breakdowns, customer metrics and the KPI summary.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of where
//!   the data comes from. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** Every report is a pure function of a `Dataset`.
//!   Reports never fail: ratios with a zero denominator are `None`, and rows
//!   missing a grouping key are left out of that grouping.
//! - **Deterministic Output:** Every report orders its rows explicitly, so
//!   running a report twice over the same data yields identical output.
//!
//! ## Public API
//!
//! - `ReportingEngine`: The entry point that runs individual reports or all of them.
//! - `report`: The row types each report produces.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod audit;
pub mod customers;
pub mod delivery;
pub mod engine;
pub mod error;
pub mod kpi;
mod math;
pub mod profitability;
pub mod report;
pub mod trends;

// Re-export the key components to create a clean, public-facing API.
pub use engine::ReportingEngine;
pub use error::AnalyticsError;
pub use report::{
    ColumnAudit, CategoryProfitability, CompletenessAudit, CustomerMetrics, CustomerProfit,
    FullReport, KpiSummary, MonthlyOrderTrend, ProfitLevel, QuarterlyOrderTrend, RepeatCustomer,
    ShippingDelay, StateDeliveryTrend, TrendPeriod, YearlyOrderTrend,
};
