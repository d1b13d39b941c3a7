use crate::math;
use crate::report::{CategoryProfitability, ProfitLevel};
use core_types::OrderRecord;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct Totals {
    sales: Decimal,
    profit: Decimal,
    discount_sum: Decimal,
    discount_count: usize,
    units: i64,
}

impl Totals {
    fn add(&mut self, record: &OrderRecord) {
        self.sales = math::saturating_add(self.sales, record.sales.unwrap_or_default());
        self.profit = math::saturating_add(self.profit, record.profit.unwrap_or_default());
        if let Some(discount) = record.discount {
            self.discount_sum = math::saturating_add(self.discount_sum, discount);
            self.discount_count += 1;
        }
        self.units = self.units.saturating_add(record.quantity.unwrap_or_default());
    }

    fn avg_discount(&self) -> Option<Decimal> {
        if self.discount_count == 0 {
            return None;
        }
        self.discount_sum
            .checked_div(Decimal::from(self.discount_count))
            .map(|avg| math::round_dp(avg, 4))
    }
}

/// Sales, profit, margin and discount per taxonomy group.
///
/// Records without the grouping keys are left out. Groups are ordered by
/// category, then sub-category.
pub fn breakdown(records: &[OrderRecord], level: ProfitLevel) -> Vec<CategoryProfitability> {
    let mut groups: BTreeMap<(&str, Option<&str>), Totals> = BTreeMap::new();
    for record in records {
        let Some(category) = record.category.as_deref() else {
            continue;
        };
        let key = match level {
            ProfitLevel::Category => (category, None),
            ProfitLevel::SubCategory => match record.sub_category.as_deref() {
                Some(sub) => (category, Some(sub)),
                None => continue,
            },
        };
        groups.entry(key).or_default().add(record);
    }

    groups
        .into_iter()
        .map(|((category, sub_category), totals)| CategoryProfitability {
            category: category.to_string(),
            sub_category: sub_category.map(str::to_string),
            total_sales: totals.sales,
            total_profit: totals.profit,
            profit_margin_pct: math::percentage(totals.profit, totals.sales),
            avg_discount: totals.avg_discount(),
            units_sold: totals.units,
        })
        .collect()
}
