//! Loan and borrower configuration for a simulation run

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::calendar::{DateRoll, MAX_TERM_MONTHS};
use crate::error::{ensure_amount, ensure_finite, ensure_fraction, LoanError, Result};
use crate::money::MAX_AMOUNT;
use crate::repayment::RepaymentPolicy;
use crate::tax::TaxSchedule;

/// Salary above which income-contingent repayments start (annual)
pub const DEFAULT_REPAYMENT_THRESHOLD: f64 = 27_295.0;

/// Share of salary above the threshold that is repaid
pub const DEFAULT_REPAYMENT_RATE: f64 = 0.09;

/// Annual interest rate charged on the balance
pub const DEFAULT_ANNUAL_INTEREST_RATE: f64 = 0.043;

/// How `salary_increase` is applied on each anniversary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncreaseType {
    /// `salary_increase` is a percentage (5.0 means +5%)
    #[default]
    Percent,
    /// `salary_increase` is an absolute amount added to the salary
    Fixed,
}

impl IncreaseType {
    /// Salary after one annual increase (may be negative; the caller clamps)
    pub fn apply(&self, salary: f64, increase: f64) -> f64 {
        match self {
            IncreaseType::Percent => salary * (1.0 + increase / 100.0),
            IncreaseType::Fixed => salary + increase,
        }
    }
}

impl FromStr for IncreaseType {
    type Err = LoanError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "percent" => Ok(IncreaseType::Percent),
            "fixed" => Ok(IncreaseType::Fixed),
            other => Err(LoanError::invalid(
                "increase_type",
                format!("expected 'percent' or 'fixed', got '{}'", other),
            )),
        }
    }
}

impl fmt::Display for IncreaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncreaseType::Percent => write!(f, "percent"),
            IncreaseType::Fixed => write!(f, "fixed"),
        }
    }
}

fn default_repayment_threshold() -> f64 {
    DEFAULT_REPAYMENT_THRESHOLD
}

fn default_repayment_rate() -> f64 {
    DEFAULT_REPAYMENT_RATE
}

fn default_annual_interest_rate() -> f64 {
    DEFAULT_ANNUAL_INTEREST_RATE
}

/// Everything a simulation needs, fixed before the first period runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanConfig {
    /// Date of the first simulated period
    pub start_date: NaiveDate,

    /// Any balance left when this date is reached is forgiven
    pub write_off_date: NaiveDate,

    /// Balance at the start date
    pub loan_value: f64,

    /// Annual salary in the first year
    pub salary: f64,

    /// Annual salary change (percentage or amount, see `increase_type`)
    pub salary_increase: f64,

    #[serde(default)]
    pub increase_type: IncreaseType,

    #[serde(default = "default_repayment_threshold")]
    pub repayment_threshold: f64,

    /// Fraction in [0, 1]
    #[serde(default = "default_repayment_rate")]
    pub repayment_rate: f64,

    /// Fraction in [0, 1], divided by 12 for the monthly rate
    #[serde(default = "default_annual_interest_rate")]
    pub annual_interest_rate: f64,

    #[serde(default)]
    pub repayment_policy: RepaymentPolicy,

    #[serde(default)]
    pub date_roll: DateRoll,

    /// Used for the take-home pay columns only
    #[serde(default)]
    pub tax_schedule: TaxSchedule,
}

impl LoanConfig {
    /// Create a config with the required fields, defaulting everything else
    pub fn new(
        start_date: NaiveDate,
        write_off_date: NaiveDate,
        loan_value: f64,
        salary: f64,
        salary_increase: f64,
    ) -> Self {
        Self {
            start_date,
            write_off_date,
            loan_value,
            salary,
            salary_increase,
            increase_type: IncreaseType::default(),
            repayment_threshold: DEFAULT_REPAYMENT_THRESHOLD,
            repayment_rate: DEFAULT_REPAYMENT_RATE,
            annual_interest_rate: DEFAULT_ANNUAL_INTEREST_RATE,
            repayment_policy: RepaymentPolicy::default(),
            date_roll: DateRoll::default(),
            tax_schedule: TaxSchedule::default(),
        }
    }

    pub fn with_increase_type(mut self, increase_type: IncreaseType) -> Self {
        self.increase_type = increase_type;
        self
    }

    pub fn with_repayment_terms(mut self, threshold: f64, rate: f64) -> Self {
        self.repayment_threshold = threshold;
        self.repayment_rate = rate;
        self
    }

    pub fn with_interest_rate(mut self, annual_interest_rate: f64) -> Self {
        self.annual_interest_rate = annual_interest_rate;
        self
    }

    pub fn with_repayment_policy(mut self, policy: RepaymentPolicy) -> Self {
        self.repayment_policy = policy;
        self
    }

    pub fn with_date_roll(mut self, date_roll: DateRoll) -> Self {
        self.date_roll = date_roll;
        self
    }

    /// Check every field against its allowed range
    pub fn validate(&self) -> Result<()> {
        if self.write_off_date <= self.start_date {
            return Err(LoanError::invalid(
                "write_off_date",
                format!(
                    "must be after start_date ({}), got {}",
                    self.start_date, self.write_off_date
                ),
            ));
        }

        if let Some(latest) = self
            .start_date
            .checked_add_months(Months::new(MAX_TERM_MONTHS))
        {
            if self.write_off_date > latest {
                return Err(LoanError::invalid(
                    "write_off_date",
                    format!(
                        "must be within {} months of start_date, got {}",
                        MAX_TERM_MONTHS, self.write_off_date
                    ),
                ));
            }
        }

        ensure_amount("loan_value", self.loan_value)?;
        ensure_amount("salary", self.salary)?;
        ensure_finite("salary_increase", self.salary_increase)?;
        if self.increase_type == IncreaseType::Fixed && self.salary_increase.abs() > MAX_AMOUNT {
            return Err(LoanError::invalid(
                "salary_increase",
                format!("must be within +/-{:e}, got {}", MAX_AMOUNT, self.salary_increase),
            ));
        }
        ensure_amount("repayment_threshold", self.repayment_threshold)?;
        ensure_fraction("repayment_rate", self.repayment_rate)?;
        ensure_fraction("annual_interest_rate", self.annual_interest_rate)?;
        self.tax_schedule.validate()?;

        Ok(())
    }
}
