//! Scenario runner for batches of independent simulations
//!
//! Each simulation owns its state, so batches run in parallel with no
//! coordination beyond collecting the results in input order.

pub mod loader;

use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::repayment::RepaymentPolicy;
use crate::simulation::{LoanConfig, LoanSimulation, SimulationResult};

pub use loader::{load_scenarios, load_scenarios_from_reader};

/// A labelled configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub config: LoanConfig,
}

impl Scenario {
    pub fn new(name: impl Into<String>, config: LoanConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }
}

/// Outcome of one scenario in a batch
#[derive(Debug)]
pub struct ScenarioOutcome {
    pub name: String,
    pub result: Result<SimulationResult>,
}

/// Runs batches of scenarios on the rayon thread pool
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    /// Run sequentially instead of on the thread pool
    sequential: bool,
}

impl ScenarioRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner that stays on the calling thread
    pub fn sequential() -> Self {
        Self { sequential: true }
    }

    /// Run a single scenario
    pub fn run(&self, config: LoanConfig) -> Result<SimulationResult> {
        LoanSimulation::simulate(config)
    }

    /// Run every scenario, preserving input order
    pub fn run_all(&self, scenarios: &[Scenario]) -> Vec<ScenarioOutcome> {
        info!("Running {} scenarios", scenarios.len());

        let simulate = |scenario: &Scenario| ScenarioOutcome {
            name: scenario.name.clone(),
            result: LoanSimulation::simulate(scenario.config.clone()),
        };

        if self.sequential {
            scenarios.iter().map(simulate).collect()
        } else {
            scenarios.par_iter().map(simulate).collect()
        }
    }

    /// Same loan with a range of upfront lump sums (monthly overpayment kept)
    pub fn upfront_sweep(
        &self,
        base: &LoanConfig,
        upfronts: &[f64],
    ) -> Result<Vec<ScenarioOutcome>> {
        let monthly = base.repayment_policy.monthly();
        let scenarios = upfronts
            .iter()
            .map(|&upfront| {
                let policy = RepaymentPolicy::new(upfront, monthly)?;
                Ok(Scenario::new(
                    format!("upfront-{:.0}", upfront),
                    base.clone().with_repayment_policy(policy),
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(self.run_all(&scenarios))
    }

    /// Same loan with a range of fixed monthly overpayments (upfront kept)
    pub fn monthly_sweep(
        &self,
        base: &LoanConfig,
        monthlies: &[f64],
    ) -> Result<Vec<ScenarioOutcome>> {
        let upfront = base.repayment_policy.upfront();
        let scenarios = monthlies
            .iter()
            .map(|&monthly| {
                let policy = RepaymentPolicy::new(upfront, monthly)?;
                Ok(Scenario::new(
                    format!("monthly-{:.0}", monthly),
                    base.clone().with_repayment_policy(policy),
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(self.run_all(&scenarios))
    }
}
