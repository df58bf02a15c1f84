//! Fixed monthly series, in thousands of currency units.

/// Months covered by both series.
pub const MONTHS: usize = 24;

/// Monthly series with exactly [`MONTHS`] samples.
pub type Series = [f64; MONTHS];

/// MRR: SaaS ramp in year 1, enterprise deals in year 2.
pub const REVENUE: Series = [
    1.0, 3.0, 5.0, 7.0, 10.0, 14.0, 17.0, 20.0, 23.0, 26.0, 30.0, 33.0, // year 1
    38.0, 44.0, 50.0, 58.0, 68.0, 80.0, 95.0, 110.0, 125.0, 138.0, 150.0, 160.0, // year 2
];

/// Monthly burn held flat at ~$45K.
pub const COST: Series = [45.0; MONTHS];

/// First `count` samples, capped at the series length.
pub fn visible(series: &Series, count: usize) -> &[f64] {
    &series[..count.min(MONTHS)]
}

/// Index of the first month where `a` is strictly above `b`.
pub fn first_month_above(a: &Series, b: &Series) -> Option<usize> {
    a.iter().zip(b).position(|(x, y)| x > y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revenue_is_non_decreasing() {
        assert!(REVENUE.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(REVENUE[0], 1.0);
        assert_eq!(REVENUE[MONTHS - 1], 160.0);
    }

    #[test]
    fn test_cost_is_flat() {
        assert!(COST.iter().all(|&v| v == 45.0));
    }

    #[test]
    fn test_visible_caps_at_length() {
        assert!(visible(&REVENUE, 0).is_empty());
        assert_eq!(visible(&REVENUE, 3), &[1.0, 3.0, 5.0]);
        assert_eq!(visible(&REVENUE, 99).len(), MONTHS);
    }

    #[test]
    fn test_revenue_clears_burn_in_month_15() {
        assert_eq!(first_month_above(&REVENUE, &COST), Some(14));
        assert!(REVENUE[13] < COST[13]);
        assert_eq!(first_month_above(&COST, &REVENUE), Some(0));
        assert_eq!(first_month_above(&COST, &COST), None);
    }
}
