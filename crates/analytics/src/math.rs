use rust_decimal::{Decimal, RoundingStrategy};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Rounds half away from zero, the way SQL `ROUND` does.
pub(crate) fn round_dp(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

pub(crate) fn round2(value: Decimal) -> Decimal {
    round_dp(value, 2)
}

/// `numerator * 100 / denominator` to 2dp; `None` when the denominator is zero.
pub(crate) fn percentage(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator.is_zero() {
        return None;
    }
    numerator
        .checked_mul(HUNDRED)
        .and_then(|scaled| scaled.checked_div(denominator))
        .map(round2)
}

/// Percentage change from `previous` to `current`.
pub(crate) fn growth_pct(current: usize, previous: usize) -> Option<Decimal> {
    let current = Decimal::from(current);
    let previous = Decimal::from(previous);
    percentage(current - previous, previous)
}

/// Adds without panicking; an overflowing sum sticks at the representable bound.
pub(crate) fn saturating_add(total: Decimal, value: Decimal) -> Decimal {
    total.checked_add(value).unwrap_or(if value.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    })
}

/// Saturating sum of the present values.
pub(crate) fn total(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values.into_iter().fold(Decimal::ZERO, saturating_add)
}

/// Arithmetic mean to 2dp; `None` for an empty set.
pub(crate) fn mean(sum: Decimal, count: usize) -> Option<Decimal> {
    if count == 0 {
        return None;
    }
    sum.checked_div(Decimal::from(count)).map(round2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round2(dec!(2.345)), dec!(2.35));
        assert_eq!(round2(dec!(-2.345)), dec!(-2.35));
        assert_eq!(round2(dec!(2.344)), dec!(2.34));
    }

    #[test]
    fn percentage_guards_zero_denominator() {
        assert_eq!(percentage(dec!(5), Decimal::ZERO), None);
        assert_eq!(percentage(dec!(1), dec!(3)), Some(dec!(33.33)));
    }

    #[test]
    fn growth_is_relative_to_previous() {
        assert_eq!(growth_pct(6, 3), Some(dec!(100.00)));
        assert_eq!(growth_pct(3, 6), Some(dec!(-50.00)));
        assert_eq!(growth_pct(4, 0), None);
    }

    #[test]
    fn sums_saturate_instead_of_overflowing() {
        assert_eq!(total([Decimal::MAX, Decimal::MAX]), Decimal::MAX);
        assert_eq!(total([Decimal::MIN, dec!(-1)]), Decimal::MIN);
        assert_eq!(total([Decimal::MAX, dec!(-1)]), Decimal::MAX - dec!(1));
        assert_eq!(total([dec!(1.5), dec!(2.25)]), dec!(3.75));
    }

    #[test]
    fn mean_of_nothing_is_undefined() {
        assert_eq!(mean(Decimal::ZERO, 0), None);
        assert_eq!(mean(dec!(7), 3), Some(dec!(2.33)));
    }
}
