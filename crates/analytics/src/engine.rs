use crate::error::AnalyticsError;
use crate::report::{
    CategoryProfitability, CompletenessAudit, CustomerMetrics, FullReport, KpiSummary,
    MonthlyOrderTrend, ProfitLevel, QuarterlyOrderTrend, ShippingDelay, StateDeliveryTrend,
    YearlyOrderTrend,
};
use crate::{audit, customers, delivery, kpi, profitability, trends};
use core_types::Dataset;

/// A stateless calculator for the sales reports.
///
/// The only state is the size of the top-customer ranking; every report is a
/// pure function of the `Dataset` passed in.
#[derive(Debug, Clone, Copy)]
pub struct ReportingEngine {
    top_customers: usize,
}

impl Default for ReportingEngine {
    fn default() -> Self {
        Self { top_customers: 10 }
    }
}

impl ReportingEngine {
    /// # Arguments
    ///
    /// * `top_customers` - How many customers the profit ranking returns. Must be positive.
    pub fn new(top_customers: usize) -> Result<Self, AnalyticsError> {
        if top_customers == 0 {
            return Err(AnalyticsError::InvalidParameter(
                "top_customers".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        Ok(Self { top_customers })
    }

    pub fn top_customers(&self) -> usize {
        self.top_customers
    }

    pub fn completeness_audit(&self, dataset: &Dataset) -> CompletenessAudit {
        audit::completeness(dataset)
    }

    pub fn shipping_delays(&self, dataset: &Dataset, same_day_only: bool) -> Vec<ShippingDelay> {
        delivery::shipping_delays(dataset.records(), same_day_only)
    }

    pub fn delivery_by_state(&self, dataset: &Dataset) -> Vec<StateDeliveryTrend> {
        delivery::by_state(dataset.records())
    }

    pub fn yearly_trend(&self, dataset: &Dataset) -> Vec<YearlyOrderTrend> {
        trends::yearly(dataset.records())
    }

    pub fn quarterly_trend(&self, dataset: &Dataset) -> Vec<QuarterlyOrderTrend> {
        trends::quarterly(dataset.records())
    }

    pub fn monthly_trend(&self, dataset: &Dataset) -> Vec<MonthlyOrderTrend> {
        trends::monthly(dataset.records())
    }

    pub fn profitability(&self, dataset: &Dataset, level: ProfitLevel) -> Vec<CategoryProfitability> {
        profitability::breakdown(dataset.records(), level)
    }

    pub fn customer_metrics(&self, dataset: &Dataset) -> CustomerMetrics {
        customers::metrics(dataset.records(), self.top_customers)
    }

    pub fn kpi_summary(&self, dataset: &Dataset) -> KpiSummary {
        kpi::summarize(dataset.records())
    }

    /// Runs every report over the same dataset.
    pub fn full_report(&self, dataset: &Dataset) -> FullReport {
        tracing::info!(records = dataset.len(), "Running all reports");
        FullReport {
            audit: self.completeness_audit(dataset),
            same_day_shipments: self.shipping_delays(dataset, true),
            delivery_by_state: self.delivery_by_state(dataset),
            yearly_trend: self.yearly_trend(dataset),
            quarterly_trend: self.quarterly_trend(dataset),
            monthly_trend: self.monthly_trend(dataset),
            category_profitability: self.profitability(dataset, ProfitLevel::Category),
            sub_category_profitability: self.profitability(dataset, ProfitLevel::SubCategory),
            customers: self.customer_metrics(dataset),
            kpi: self.kpi_summary(dataset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::OrderRecord;
    use rust_decimal_macros::dec;

    fn dataset() -> Dataset {
        let record = |id: &str, customer: &str, y: i32, profit| OrderRecord {
            order_id: Some(id.to_string()),
            customer_id: Some(customer.to_string()),
            category: Some("Technology".to_string()),
            sub_category: Some("Phones".to_string()),
            state: Some("Utah".to_string()),
            order_date: NaiveDate::from_ymd_opt(y, 1, 1),
            ship_date: NaiveDate::from_ymd_opt(y, 1, 3),
            sales: Some(dec!(100)),
            profit: Some(profit),
            discount: Some(dec!(0.1)),
            quantity: Some(1),
            ..Default::default()
        };
        Dataset::from_records(vec![
            record("o1", "A", 2022, dec!(10)),
            record("o2", "B", 2023, dec!(30)),
            record("o3", "A", 2023, dec!(5)),
        ])
    }

    #[test]
    fn rejects_empty_ranking() {
        assert!(matches!(
            ReportingEngine::new(0),
            Err(AnalyticsError::InvalidParameter(param, _)) if param == "top_customers"
        ));
        assert_eq!(ReportingEngine::new(3).unwrap().top_customers(), 3);
    }

    #[test]
    fn ranking_size_is_applied() {
        let engine = ReportingEngine::new(1).unwrap();
        let metrics = engine.customer_metrics(&dataset());
        assert_eq!(metrics.top_customers.len(), 1);
        assert_eq!(metrics.top_customers[0].customer_id, "B");
    }

    #[test]
    fn full_report_is_idempotent() {
        let engine = ReportingEngine::default();
        let data = dataset();
        let first = engine.full_report(&data);
        let second = engine.full_report(&data);
        assert_eq!(first, second);
        assert_eq!(first.kpi.latest_year, Some(2023));
        assert_eq!(first.yearly_trend.len(), 2);
        assert_eq!(first.sub_category_profitability.len(), 1);
        assert!(first.same_day_shipments.is_empty());
    }
}
