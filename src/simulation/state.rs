//! Mutable loan state carried from one period to the next

use chrono::NaiveDate;
use log::warn;

use super::config::LoanConfig;
use crate::calendar::is_anniversary;
use crate::money::{round_cents, MAX_AMOUNT};

/// State of the loan at a period boundary
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    /// Periods completed so far
    pub periods_completed: u32,

    /// Salary year (1-indexed) of the next period
    pub salary_year: u32,

    /// Date of the next period to simulate
    pub current_date: NaiveDate,

    /// Outstanding balance, never negative
    pub balance: f64,

    /// Annual salary, never negative
    pub salary: f64,

    /// Upfront plus repayments to date
    pub total_repaid: f64,

    /// Take-home pay lost to repayments to date
    pub net_salary_lost: f64,
}

impl SimulationState {
    /// Initialize state at the start date
    pub fn from_config(config: &LoanConfig) -> Self {
        Self {
            periods_completed: 0,
            salary_year: 1,
            current_date: config.start_date,
            balance: round_cents(config.loan_value),
            salary: config.salary,
            total_repaid: 0.0,
            net_salary_lost: 0.0,
        }
    }

    /// True before the first period has been simulated
    pub fn is_first_period(&self) -> bool {
        self.periods_completed == 0
    }

    /// Close the current period and move to the next month
    ///
    /// Applies the annual salary change when a 12-period cycle completes.
    /// Returns `None` if the next date cannot be represented.
    pub fn advance_month(&mut self, config: &LoanConfig) -> Option<NaiveDate> {
        self.periods_completed += 1;

        if is_anniversary(self.periods_completed) {
            self.salary_year += 1;
            let raised = config
                .increase_type
                .apply(self.salary, config.salary_increase);
            if raised < 0.0 {
                warn!(
                    "Salary change of {} ({}) would make salary negative in year {}; clamping to 0",
                    config.salary_increase, config.increase_type, self.salary_year
                );
            }
            if raised > MAX_AMOUNT {
                warn!(
                    "Salary of {} in year {} exceeds {:e}; capping",
                    raised, self.salary_year, MAX_AMOUNT
                );
            }
            self.salary = raised.clamp(0.0, MAX_AMOUNT);
        }

        let next = config
            .date_roll
            .period_date(config.start_date, self.periods_completed)?;
        self.current_date = next;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::IncreaseType;

    fn config(increase_type: IncreaseType, increase: f64) -> LoanConfig {
        LoanConfig::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2034, 1, 1).unwrap(),
            10_000.0,
            30_000.0,
            increase,
        )
        .with_increase_type(increase_type)
    }

    #[test]
    fn test_salary_changes_once_per_year() {
        let config = config(IncreaseType::Fixed, 1_000.0);
        let mut state = SimulationState::from_config(&config);

        for _ in 0..11 {
            state.advance_month(&config);
            assert_eq!(state.salary, 30_000.0);
            assert_eq!(state.salary_year, 1);
        }

        // 12th period closes the first year
        state.advance_month(&config);
        assert_eq!(state.salary, 31_000.0);
        assert_eq!(state.salary_year, 2);
        assert_eq!(state.current_date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());

        for _ in 0..12 {
            state.advance_month(&config);
        }
        assert_eq!(state.salary, 32_000.0);
        assert_eq!(state.salary_year, 3);
    }

    #[test]
    fn test_percent_increase() {
        let config = config(IncreaseType::Percent, 10.0);
        let mut state = SimulationState::from_config(&config);
        for _ in 0..24 {
            state.advance_month(&config);
        }
        assert!((state.salary - 36_300.0).abs() < 1e-6);
    }

    #[test]
    fn test_salary_never_negative() {
        let config = config(IncreaseType::Fixed, -50_000.0);
        let mut state = SimulationState::from_config(&config);
        for _ in 0..12 {
            state.advance_month(&config);
        }
        assert_eq!(state.salary, 0.0);
    }

    #[test]
    fn test_salary_growth_capped() {
        let config = config(IncreaseType::Percent, 1_000.0);
        let mut state = SimulationState::from_config(&config);
        for _ in 0..12 * 100 {
            state.advance_month(&config);
        }
        assert_eq!(state.salary, MAX_AMOUNT);
    }
}
