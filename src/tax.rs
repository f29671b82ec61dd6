//! Income tax and National Insurance for the take-home pay metric
//!
//! Only used to report how much of the borrower's net pay the repayments
//! cost; nothing here feeds back into the loan balance.

use serde::{Deserialize, Serialize};

use crate::error::{ensure_fraction, ensure_non_negative, LoanError, Result};

/// A progressive income tax band: income up to `upper_limit` is taxed at `rate`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBand {
    /// `None` for the open-ended top band
    pub upper_limit: Option<f64>,
    pub rate: f64,
}

/// Income tax bands and National Insurance thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSchedule {
    /// Bands in ascending order of `upper_limit`
    pub bands: Vec<TaxBand>,

    /// NI primary threshold (no contributions below this)
    pub ni_primary_threshold: f64,

    /// NI upper earnings limit
    pub ni_upper_earnings_limit: f64,

    /// NI rate between the primary threshold and the upper earnings limit
    pub ni_main_rate: f64,

    /// NI rate above the upper earnings limit
    pub ni_upper_rate: f64,
}

impl Default for TaxSchedule {
    fn default() -> Self {
        Self::uk_2023_24()
    }
}

impl TaxSchedule {
    /// UK (England) 2023-24 rates, without the personal allowance taper
    pub fn uk_2023_24() -> Self {
        Self {
            bands: vec![
                // Personal allowance
                TaxBand {
                    upper_limit: Some(12_570.0),
                    rate: 0.0,
                },
                // Basic rate
                TaxBand {
                    upper_limit: Some(50_270.0),
                    rate: 0.20,
                },
                // Higher rate
                TaxBand {
                    upper_limit: Some(125_140.0),
                    rate: 0.40,
                },
                // Additional rate
                TaxBand {
                    upper_limit: None,
                    rate: 0.45,
                },
            ],
            ni_primary_threshold: 12_570.0,
            ni_upper_earnings_limit: 50_270.0,
            ni_main_rate: 0.12,
            ni_upper_rate: 0.02,
        }
    }

    /// Check band ordering, rates and NI thresholds
    ///
    /// Limits must be finite and strictly ascending; only the last band may be
    /// open-ended. Every rate must lie in [0, 1].
    pub fn validate(&self) -> Result<()> {
        let mut previous = 0.0;
        for (i, band) in self.bands.iter().enumerate() {
            ensure_fraction("bands.rate", band.rate)?;
            match band.upper_limit {
                Some(limit) => {
                    ensure_non_negative("bands.upper_limit", limit)?;
                    if i > 0 && limit <= previous {
                        return Err(LoanError::invalid(
                            "bands.upper_limit",
                            format!("must ascend, got {} after {}", limit, previous),
                        ));
                    }
                    previous = limit;
                }
                None if i + 1 < self.bands.len() => {
                    return Err(LoanError::invalid(
                        "bands.upper_limit",
                        "only the last band may be open-ended",
                    ));
                }
                None => {}
            }
        }

        ensure_non_negative("ni_primary_threshold", self.ni_primary_threshold)?;
        ensure_non_negative("ni_upper_earnings_limit", self.ni_upper_earnings_limit)?;
        if self.ni_upper_earnings_limit < self.ni_primary_threshold {
            return Err(LoanError::invalid(
                "ni_upper_earnings_limit",
                format!(
                    "must be >= ni_primary_threshold ({}), got {}",
                    self.ni_primary_threshold, self.ni_upper_earnings_limit
                ),
            ));
        }
        ensure_fraction("ni_main_rate", self.ni_main_rate)?;
        ensure_fraction("ni_upper_rate", self.ni_upper_rate)?;

        Ok(())
    }

    /// Annual income tax on `salary`
    pub fn income_tax(&self, salary: f64) -> f64 {
        let mut tax = 0.0;
        let mut lower = 0.0;
        let gross = salary.max(0.0);

        for band in &self.bands {
            if gross <= lower {
                break;
            }
            let upper = band.upper_limit.unwrap_or(f64::INFINITY);
            let taxable = gross.min(upper) - lower;
            tax += taxable * band.rate;
            lower = upper;
        }

        tax
    }

    /// Annual National Insurance on `salary`
    pub fn national_insurance(&self, salary: f64) -> f64 {
        if salary <= self.ni_primary_threshold {
            return 0.0;
        }
        let main_band = salary.min(self.ni_upper_earnings_limit) - self.ni_primary_threshold;
        let upper_band = (salary - self.ni_upper_earnings_limit).max(0.0);
        main_band * self.ni_main_rate + upper_band * self.ni_upper_rate
    }

    /// Salary left after income tax and NI
    pub fn take_home(&self, salary: f64) -> f64 {
        let gross = salary.max(0.0);
        gross - self.income_tax(gross) - self.national_insurance(gross)
    }

    /// Annual take-home pay when `annual_repayment` comes out of `salary` first
    pub fn take_home_after_repayment(&self, salary: f64, annual_repayment: f64) -> f64 {
        self.take_home((salary - annual_repayment).max(0.0))
    }

    /// Annual reduction in take-home pay caused by `annual_repayment`
    pub fn net_salary_lost(&self, salary: f64, annual_repayment: f64) -> f64 {
        self.take_home(salary) - self.take_home_after_repayment(salary, annual_repayment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_progressive_income_tax() {
        let schedule = TaxSchedule::uk_2023_24();
        assert_eq!(schedule.income_tax(10_000.0), 0.0);
        // 37,700 at 20% + 9,730 at 40%
        assert_abs_diff_eq!(schedule.income_tax(60_000.0), 11_432.0, epsilon = 1e-6);
        // All four bands in play
        let expected = 37_700.0 * 0.20 + 74_870.0 * 0.40 + 24_860.0 * 0.45;
        assert_abs_diff_eq!(schedule.income_tax(150_000.0), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_national_insurance() {
        let schedule = TaxSchedule::uk_2023_24();
        assert_eq!(schedule.national_insurance(12_000.0), 0.0);
        assert_abs_diff_eq!(schedule.national_insurance(30_000.0), 17_430.0 * 0.12, epsilon = 1e-6);
        assert_abs_diff_eq!(
            schedule.national_insurance(60_000.0),
            37_700.0 * 0.12 + 9_730.0 * 0.02,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_net_salary_lost_is_less_than_gross_repayment() {
        let schedule = TaxSchedule::uk_2023_24();
        let repayment = (40_000.0 - 27_295.0) * 0.09;
        let lost = schedule.net_salary_lost(40_000.0, repayment);
        // Repayment lowers taxable pay, so the net cost is below the gross repayment
        assert!(lost > 0.0);
        assert!(lost < repayment);
        assert_abs_diff_eq!(lost, repayment * (1.0 - 0.20 - 0.12), epsilon = 1e-6);
    }

    fn invalid_field(schedule: &TaxSchedule) -> String {
        match schedule.validate() {
            Err(LoanError::InvalidParameter { field, .. }) => field,
            other => panic!("expected InvalidParameter, got {:?}", other),
        }
    }

    #[test]
    fn test_uk_schedule_is_valid() {
        assert!(TaxSchedule::uk_2023_24().validate().is_ok());
    }

    #[test]
    fn test_malformed_schedules_rejected() {
        let mut schedule = TaxSchedule::uk_2023_24();
        schedule.bands[1].rate = 1.2;
        assert_eq!(invalid_field(&schedule), "bands.rate");

        let mut schedule = TaxSchedule::uk_2023_24();
        schedule.bands.swap(1, 2);
        assert_eq!(invalid_field(&schedule), "bands.upper_limit");

        let mut schedule = TaxSchedule::uk_2023_24();
        schedule.bands[0].upper_limit = None;
        assert_eq!(invalid_field(&schedule), "bands.upper_limit");

        let mut schedule = TaxSchedule::uk_2023_24();
        schedule.bands[2].upper_limit = Some(f64::INFINITY);
        assert_eq!(invalid_field(&schedule), "bands.upper_limit");

        let mut schedule = TaxSchedule::uk_2023_24();
        schedule.ni_upper_earnings_limit = 10_000.0;
        assert_eq!(invalid_field(&schedule), "ni_upper_earnings_limit");

        let mut schedule = TaxSchedule::uk_2023_24();
        schedule.ni_main_rate = -0.12;
        assert_eq!(invalid_field(&schedule), "ni_main_rate");
    }

    #[test]
    fn test_no_repayment_no_loss() {
        let schedule = TaxSchedule::default();
        assert_eq!(schedule.net_salary_lost(25_000.0, 0.0), 0.0);
    }
}
