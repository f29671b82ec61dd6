//! Month-by-month loan simulation

use log::{debug, info, trace};

use super::config::LoanConfig;
use super::series::{LoanOutcome, LoanSummary, PeriodRow, SimulationResult};
use super::state::SimulationState;
use crate::calendar::months_between;
use crate::error::{LoanError, Result};
use crate::money::{round_cents, settle_balance};

/// A single loan projected from its start date to repayment or write-off
///
/// Built once from a validated [`LoanConfig`]; [`run`](Self::run) may be
/// called exactly once; a second call fails with `InvalidState`. Accessors
/// fail with `InvalidState` until the run has completed.
#[derive(Debug, Clone)]
pub struct LoanSimulation {
    config: LoanConfig,
    state: SimulationState,
    result: Option<SimulationResult>,
}

impl LoanSimulation {
    /// Validate `config` and set up the starting state
    pub fn new(config: LoanConfig) -> Result<Self> {
        config.validate()?;
        debug!(
            "Loan simulation: balance {:.2}, salary {:.2} ({} {}), threshold {:.2} at {}, interest {}, {} to {}",
            config.loan_value,
            config.salary,
            config.increase_type,
            config.salary_increase,
            config.repayment_threshold,
            config.repayment_rate,
            config.annual_interest_rate,
            config.start_date,
            config.write_off_date,
        );

        let state = SimulationState::from_config(&config);
        Ok(Self {
            config,
            state,
            result: None,
        })
    }

    /// Build, run and return the result in one step
    pub fn simulate(config: LoanConfig) -> Result<SimulationResult> {
        let mut simulation = Self::new(config)?;
        simulation.run()?;
        simulation.into_result()
    }

    pub fn config(&self) -> &LoanConfig {
        &self.config
    }

    /// Current state (the final state once the run has completed)
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    /// Simulate every period until the loan is repaid or written off
    pub fn run(&mut self) -> Result<&SimulationResult> {
        if self.result.is_some() {
            return Err(LoanError::InvalidState(
                "simulation has already been run".to_string(),
            ));
        }

        let capacity = months_between(self.config.start_date, self.config.write_off_date);
        let mut rows = Vec::with_capacity(capacity as usize);

        let outcome = loop {
            let row = self.calculate_period();
            let repaid = row.closing_balance == 0.0;
            rows.push(row);

            let next_date = self.state.advance_month(&self.config);

            if repaid {
                break LoanOutcome::Repaid;
            }
            match next_date {
                Some(date) if date < self.config.write_off_date => {}
                _ => break LoanOutcome::WrittenOff,
            }
        };

        let result = SimulationResult::new(self.config.loan_value, rows, outcome);
        info!(
            "Simulation complete: {:?} after {} months, repaid {:.2}, interest {:.2}, final balance {:.2}",
            outcome,
            result.rows().len(),
            result.total_repaid(),
            result.total_interest(),
            result.final_balance(),
        );

        Ok(&*self.result.insert(result))
    }

    /// Roll the balance forward by one period
    fn calculate_period(&mut self) -> PeriodRow {
        let config = &self.config;
        let policy = &config.repayment_policy;
        let state = &mut self.state;

        let opening_balance = state.balance;
        let salary = state.salary;

        // Upfront lump sum comes off before the first period's interest
        let upfront = if state.is_first_period() {
            round_cents(policy.upfront().min(opening_balance))
        } else {
            0.0
        };
        let balance = opening_balance - upfront;

        // Annual rate divided by 12, not the equivalent monthly compound rate
        let interest = round_cents(balance * config.annual_interest_rate / 12.0);

        let contingent_repayment = if salary > config.repayment_threshold {
            round_cents((salary - config.repayment_threshold) * config.repayment_rate / 12.0)
        } else {
            0.0
        };

        // Never repay more than is outstanding this period
        let outstanding = balance + interest;
        let repayment = round_cents((contingent_repayment + policy.monthly()).min(outstanding));
        let contingent_applied = contingent_repayment.min(repayment);
        let overpayment = round_cents(repayment - contingent_applied);

        let closing_balance = settle_balance(outstanding - repayment);

        let annual_contingent = contingent_applied * 12.0;
        let take_home_salary = config
            .tax_schedule
            .take_home_after_repayment(salary, annual_contingent);
        state.net_salary_lost += config
            .tax_schedule
            .net_salary_lost(salary, annual_contingent)
            / 12.0;
        state.total_repaid += upfront + repayment;
        state.balance = closing_balance;

        let row = PeriodRow {
            period: state.periods_completed + 1,
            salary_year: state.salary_year,
            date: state.current_date,
            opening_balance,
            upfront,
            interest,
            contingent_repayment,
            overpayment,
            repayment,
            closing_balance,
            salary,
            take_home_salary,
            cumulative_repaid: round_cents(state.total_repaid),
            cumulative_net_salary_lost: state.net_salary_lost,
        };

        trace!(
            "Period {} ({}): open {:.2} upfront {:.2} interest {:.2} repay {:.2} close {:.2}",
            row.period,
            row.date,
            row.opening_balance,
            row.upfront,
            row.interest,
            row.repayment,
            row.closing_balance,
        );

        row
    }

    /// Completed result, or `InvalidState` before `run`
    pub fn result(&self) -> Result<&SimulationResult> {
        self.result.as_ref().ok_or_else(|| {
            LoanError::InvalidState("simulation has not been run yet".to_string())
        })
    }

    /// Consume the simulation and take ownership of its result
    pub fn into_result(self) -> Result<SimulationResult> {
        self.result.ok_or_else(|| {
            LoanError::InvalidState("simulation has not been run yet".to_string())
        })
    }

    /// Per-period rows in chronological order
    pub fn series(&self) -> Result<&[PeriodRow]> {
        Ok(self.result()?.rows())
    }

    pub fn summary(&self) -> Result<LoanSummary> {
        Ok(self.result()?.summary())
    }

    pub fn total_repaid(&self) -> Result<f64> {
        Ok(self.result()?.total_repaid())
    }

    pub fn total_interest(&self) -> Result<f64> {
        Ok(self.result()?.total_interest())
    }

    pub fn final_balance(&self) -> Result<f64> {
        Ok(self.result()?.final_balance())
    }

    pub fn outcome(&self) -> Result<LoanOutcome> {
        Ok(self.result()?.outcome())
    }
}
