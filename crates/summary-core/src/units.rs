//! Currency unit conversions between base currency and millions.

/// Base-currency units in one million.
pub const UNITS_PER_MILLION: f64 = 1_000_000.0;

/// Scale an amount stored in millions back to base currency.
pub fn millions_to_base(amount_millions: f64) -> f64 {
    amount_millions * UNITS_PER_MILLION
}

/// Convert a base-currency amount to whole millions.
///
/// Halfway cases round to the even neighbour, so `1.5M → 2` and `2.5M → 2`.
pub fn base_to_rounded_millions(amount: f64) -> i64 {
    (amount / UNITS_PER_MILLION).round_ties_even() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millions_to_base() {
        assert_eq!(millions_to_base(1.25), 1_250_000.0);
        assert_eq!(millions_to_base(0.0), 0.0);
    }

    #[test]
    fn test_base_to_rounded_millions_nearest() {
        assert_eq!(base_to_rounded_millions(0.0), 0);
        assert_eq!(base_to_rounded_millions(499_999.0), 0);
        assert_eq!(base_to_rounded_millions(1_400_000.0), 1);
        assert_eq!(base_to_rounded_millions(1_600_000.0), 2);
        assert_eq!(base_to_rounded_millions(123_456_789.0), 123);
    }

    #[test]
    fn test_base_to_rounded_millions_ties_to_even() {
        assert_eq!(base_to_rounded_millions(500_000.0), 0);
        assert_eq!(base_to_rounded_millions(1_500_000.0), 2);
        assert_eq!(base_to_rounded_millions(2_500_000.0), 2);
        assert_eq!(base_to_rounded_millions(-1_500_000.0), -2);
    }
}
