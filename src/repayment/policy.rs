//! Upfront lump sum and fixed monthly overpayment

use serde::{Deserialize, Serialize};

use crate::error::{ensure_amount, LoanError, Result};

/// A borrower's voluntary repayments
///
/// Negative, non-finite or oversized amounts are rejected at construction;
/// there is no clamping. Once built the policy cannot be changed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawRepaymentPolicy")]
pub struct RepaymentPolicy {
    /// Lump sum paid once, in the first period, before interest accrues
    upfront: f64,

    /// Extra amount paid every period
    monthly: f64,
}

/// Unvalidated form used at the serde boundary
#[derive(Debug, Deserialize)]
struct RawRepaymentPolicy {
    #[serde(default)]
    upfront: f64,
    #[serde(default)]
    monthly: f64,
}

impl TryFrom<RawRepaymentPolicy> for RepaymentPolicy {
    type Error = LoanError;

    fn try_from(raw: RawRepaymentPolicy) -> Result<Self> {
        RepaymentPolicy::new(raw.upfront, raw.monthly)
    }
}

impl RepaymentPolicy {
    /// Create a policy, failing with `InvalidParameter` on negative amounts
    pub fn new(upfront: f64, monthly: f64) -> Result<Self> {
        ensure_amount("upfront", upfront)?;
        ensure_amount("monthly", monthly)?;
        Ok(Self { upfront, monthly })
    }

    /// Upfront lump sum only
    pub fn upfront_only(upfront: f64) -> Result<Self> {
        Self::new(upfront, 0.0)
    }

    /// Monthly overpayment only
    pub fn monthly_only(monthly: f64) -> Result<Self> {
        Self::new(0.0, monthly)
    }

    pub fn upfront(&self) -> f64 {
        self.upfront
    }

    pub fn monthly(&self) -> f64 {
        self.monthly
    }

    /// True when the policy adds nothing to the income-contingent repayment
    pub fn is_zero(&self) -> bool {
        self.upfront == 0.0 && self.monthly == 0.0
    }
}
