//! Loan simulation: configuration, period state, the monthly engine and its output

mod config;
mod engine;
mod series;
mod state;

pub use config::{
    IncreaseType, LoanConfig, DEFAULT_ANNUAL_INTEREST_RATE, DEFAULT_REPAYMENT_RATE,
    DEFAULT_REPAYMENT_THRESHOLD,
};
pub use engine::LoanSimulation;
pub use series::{LoanOutcome, LoanSummary, PeriodRow, SimulationResult};
pub use state::SimulationState;
