use crate::math;
use crate::report::{ShippingDelay, StateDeliveryTrend};
use core_types::OrderRecord;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Running min/max/mean over shipping delays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DelayStats {
    pub count: usize,
    pub total_days: i64,
    pub min_days: Option<i64>,
    pub max_days: Option<i64>,
    pub same_day: usize,
}

impl DelayStats {
    pub fn add(&mut self, days: i64) {
        self.count += 1;
        self.total_days = self.total_days.saturating_add(days);
        self.min_days = Some(self.min_days.map_or(days, |m| m.min(days)));
        self.max_days = Some(self.max_days.map_or(days, |m| m.max(days)));
        if days == 0 {
            self.same_day += 1;
        }
    }

    pub fn avg_days(&self) -> Option<Decimal> {
        math::mean(Decimal::from(self.total_days), self.count)
    }

    pub fn from_records(records: &[OrderRecord]) -> Self {
        let mut stats = Self::default();
        for days in records.iter().filter_map(OrderRecord::valid_delay_days) {
            stats.add(days);
        }
        stats
    }
}

/// The delay of every record with both dates and a non-negative delay.
pub fn shipping_delays(records: &[OrderRecord], same_day_only: bool) -> Vec<ShippingDelay> {
    let mut delays: Vec<ShippingDelay> = records
        .iter()
        .filter_map(|r| {
            let delay_days = r.valid_delay_days()?;
            Some(ShippingDelay {
                order_id: r.order_id.clone(),
                order_date: r.order_date?,
                ship_date: r.ship_date?,
                delay_days,
            })
        })
        .filter(|d| !same_day_only || d.delay_days == 0)
        .collect();

    delays.sort_by(|a, b| {
        a.order_date
            .cmp(&b.order_date)
            .then_with(|| a.order_id.cmp(&b.order_id))
            .then_with(|| a.delay_days.cmp(&b.delay_days))
    });
    delays
}

/// Min, max and mean delay per destination state.
pub fn by_state(records: &[OrderRecord]) -> Vec<StateDeliveryTrend> {
    let mut groups: BTreeMap<&str, DelayStats> = BTreeMap::new();
    for record in records {
        let (Some(state), Some(days)) = (record.state.as_deref(), record.valid_delay_days()) else {
            continue;
        };
        groups.entry(state).or_default().add(days);
    }
    tracing::debug!(states = groups.len(), "Grouped delivery delays by state");

    groups
        .into_iter()
        .filter_map(|(state, stats)| {
            Some(StateDeliveryTrend {
                state: state.to_string(),
                min_days: stats.min_days?,
                max_days: stats.max_days?,
                avg_days: stats.avg_days()?,
                order_count: stats.count,
            })
        })
        .collect()
}
