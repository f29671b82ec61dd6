//! Cent rounding for monetary amounts

/// Closing balances below half a cent are treated as fully repaid
pub const BALANCE_EPSILON: f64 = 0.005;

/// Largest accepted input amount (loan, salary, threshold, overpayments)
///
/// Keeps every intermediate value finite for the longest allowed term at
/// the highest allowed interest rate.
pub const MAX_AMOUNT: f64 = 1e12;

/// Round to whole cents, ties to even (banker's rounding)
///
/// Works on the binary value, so amounts such as 1.005 that are stored just
/// below the tie round down.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round_ties_even() / 100.0
}

/// Round to cents and snap anything within `BALANCE_EPSILON` of zero (or below) to 0
///
/// Inputs must be finite; validated configurations guarantee this.
pub fn settle_balance(amount: f64) -> f64 {
    debug_assert!(amount.is_finite(), "non-finite balance {}", amount);
    let rounded = round_cents(amount);
    if rounded < BALANCE_EPSILON {
        0.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(383.333_333), 383.33);
        assert_eq!(round_cents(770.287_5), 770.29);
        assert_eq!(round_cents(0.0), 0.0);
    }

    #[test]
    fn test_ties_go_to_even() {
        // 0.125 and 0.375 are exact in binary, so these are true ties
        assert_eq!(round_cents(0.125), 0.12);
        assert_eq!(round_cents(0.375), 0.38);
    }

    #[test]
    fn test_settle_balance_clamps_dust() {
        assert_eq!(settle_balance(1e-9), 0.0);
        assert_eq!(settle_balance(-1e-9), 0.0);
        assert_eq!(settle_balance(-3.0), 0.0);
        assert_eq!(settle_balance(0.004), 0.0);
        assert_eq!(settle_balance(0.01), 0.01);
        assert_eq!(settle_balance(91_613.04), 91_613.04);
    }

    #[test]
    #[should_panic(expected = "non-finite balance")]
    fn test_settle_balance_rejects_nan() {
        settle_balance(f64::NAN);
    }

    #[test]
    fn test_max_amount_survives_cent_rounding() {
        assert_eq!(round_cents(MAX_AMOUNT), MAX_AMOUNT);
        assert!(settle_balance(MAX_AMOUNT * 1e40).is_finite());
    }
}
