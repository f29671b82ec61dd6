//! Student Loan Model - month-by-month projection of an income-contingent loan
//!
//! This library provides:
//! - Loan simulation: interest accrual, salary-linked repayments, write-off
//! - Discretionary repayment policies (upfront lump sum, monthly overpayment)
//! - Take-home pay impact under a configurable tax schedule
//! - Parallel scenario sweeps and CSV scenario loading
//! - CSV / JSON / table output of the per-period series

pub mod calendar;
pub mod error;
pub mod money;
pub mod output;
pub mod repayment;
pub mod scenario;
pub mod simulation;
pub mod tax;

// Re-export commonly used types
pub use error::{LoanError, Result};
pub use repayment::RepaymentPolicy;
pub use scenario::{Scenario, ScenarioRunner};
pub use simulation::{
    IncreaseType, LoanConfig, LoanOutcome, LoanSimulation, LoanSummary, PeriodRow, SimulationResult,
};
pub use tax::TaxSchedule;
