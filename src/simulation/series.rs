//! Per-period output rows, the completed result and its summary

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::money::round_cents;

/// How a completed simulation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanOutcome {
    /// Balance reached zero before the write-off date
    Repaid,
    /// Write-off date reached with a balance outstanding
    WrittenOff,
}

impl LoanOutcome {
    pub fn is_repaid(&self) -> bool {
        matches!(self, LoanOutcome::Repaid)
    }
}

/// One simulated month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRow {
    // Timing
    /// 1-indexed period number
    pub period: u32,
    /// 1-indexed salary year (changes every 12 periods)
    pub salary_year: u32,
    pub date: NaiveDate,

    // Balance roll-forward
    pub opening_balance: f64,
    /// Upfront lump sum applied this period (first period only)
    pub upfront: f64,
    pub interest: f64,
    /// Income-contingent amount before the cap
    pub contingent_repayment: f64,
    /// Fixed monthly overpayment actually applied after the cap
    pub overpayment: f64,
    /// Contingent plus overpayment, capped at the amount outstanding
    pub repayment: f64,
    pub closing_balance: f64,

    // Borrower
    /// Annual salary in effect this period
    pub salary: f64,
    /// Annual take-home pay after the contingent repayment, tax and NI
    pub take_home_salary: f64,

    // Running totals
    /// Upfront plus repayments to date
    pub cumulative_repaid: f64,
    /// Take-home pay lost to repayments to date
    pub cumulative_net_salary_lost: f64,
}

/// Completed simulation: the period rows and how the loan ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    initial_loan_value: f64,
    rows: Vec<PeriodRow>,
    outcome: LoanOutcome,
}

impl SimulationResult {
    pub(crate) fn new(initial_loan_value: f64, rows: Vec<PeriodRow>, outcome: LoanOutcome) -> Self {
        Self {
            initial_loan_value,
            rows,
            outcome,
        }
    }

    /// Rows in chronological order
    pub fn rows(&self) -> &[PeriodRow] {
        &self.rows
    }

    pub fn outcome(&self) -> LoanOutcome {
        self.outcome
    }

    pub fn initial_loan_value(&self) -> f64 {
        self.initial_loan_value
    }

    /// Upfront lump sum plus every period's repayment
    pub fn total_repaid(&self) -> f64 {
        round_cents(self.rows.iter().map(|r| r.upfront + r.repayment).sum())
    }

    pub fn total_interest(&self) -> f64 {
        round_cents(self.rows.iter().map(|r| r.interest).sum())
    }

    pub fn final_balance(&self) -> f64 {
        self.rows
            .last()
            .map(|r| r.closing_balance)
            .unwrap_or(self.initial_loan_value)
    }

    /// Get summary statistics
    pub fn summary(&self) -> LoanSummary {
        let months_repaying = self.rows.len() as u32;
        let total_discretionary: f64 = self.rows.iter().map(|r| r.upfront + r.overpayment).sum();
        let net_salary_lost = self
            .rows
            .last()
            .map(|r| r.cumulative_net_salary_lost)
            .unwrap_or(0.0);

        LoanSummary {
            total_repaid: self.total_repaid(),
            total_interest: self.total_interest(),
            final_balance: self.final_balance(),
            outcome: self.outcome,
            months_repaying,
            years_repaying: months_repaying.div_ceil(12),
            net_salary_lost: round_cents(net_salary_lost),
            total_discretionary: round_cents(total_discretionary),
            net_salary_lost_plus_discretionary: round_cents(net_salary_lost + total_discretionary),
        }
    }
}

/// Scalar results of a completed simulation, amounts rounded to cents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSummary {
    pub total_repaid: f64,
    pub total_interest: f64,
    pub final_balance: f64,
    pub outcome: LoanOutcome,
    pub months_repaying: u32,
    /// Whole years, rounded up
    pub years_repaying: u32,
    pub net_salary_lost: f64,
    /// Upfront plus monthly overpayments actually applied
    pub total_discretionary: f64,
    pub net_salary_lost_plus_discretionary: f64,
}
