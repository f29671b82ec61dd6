//! Load borrower scenarios from CSV

use chrono::NaiveDate;
use csv::Reader;
use std::path::Path;

use super::Scenario;
use crate::calendar::DateRoll;
use crate::error::Result;
use crate::repayment::RepaymentPolicy;
use crate::simulation::{IncreaseType, LoanConfig};

/// Raw CSV row; blank optional columns take the config defaults
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(default)]
    name: Option<String>,
    start_date: NaiveDate,
    write_off_date: NaiveDate,
    loan_value: f64,
    salary: f64,
    #[serde(default)]
    salary_increase: Option<f64>,
    #[serde(default)]
    increase_type: Option<String>,
    #[serde(default)]
    repayment_threshold: Option<f64>,
    #[serde(default)]
    repayment_rate: Option<f64>,
    #[serde(default)]
    annual_interest_rate: Option<f64>,
    #[serde(default)]
    upfront: Option<f64>,
    #[serde(default)]
    monthly: Option<f64>,
    #[serde(default)]
    date_roll: Option<String>,
}

impl CsvRow {
    fn into_scenario(self, line: usize) -> Result<Scenario> {
        let mut config = LoanConfig::new(
            self.start_date,
            self.write_off_date,
            self.loan_value,
            self.salary,
            self.salary_increase.unwrap_or(0.0),
        );

        if let Some(increase_type) = self.increase_type.as_deref().filter(|s| !s.is_empty()) {
            config.increase_type = increase_type.parse::<IncreaseType>()?;
        }
        if let Some(threshold) = self.repayment_threshold {
            config.repayment_threshold = threshold;
        }
        if let Some(rate) = self.repayment_rate {
            config.repayment_rate = rate;
        }
        if let Some(rate) = self.annual_interest_rate {
            config.annual_interest_rate = rate;
        }
        if let Some(date_roll) = self.date_roll.as_deref().filter(|s| !s.is_empty()) {
            config.date_roll = date_roll.parse::<DateRoll>()?;
        }
        config.repayment_policy = RepaymentPolicy::new(
            self.upfront.unwrap_or(0.0),
            self.monthly.unwrap_or(0.0),
        )?;

        config.validate()?;

        let name = self
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("scenario-{}", line));

        Ok(Scenario { name, config })
    }
}

/// Load all scenarios from a CSV file
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<Scenario>> {
    let reader = Reader::from_path(path)?;
    collect_scenarios(reader)
}

/// Load scenarios from any reader (e.g., string buffer, stdin)
pub fn load_scenarios_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Scenario>> {
    collect_scenarios(Reader::from_reader(reader))
}

fn collect_scenarios<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<Scenario>> {
    let mut scenarios = Vec::new();

    for (idx, result) in reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        scenarios.push(row.into_scenario(idx + 1)?);
    }

    Ok(scenarios)
}
