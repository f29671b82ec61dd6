//! Compare outcomes for a range of upfront lump sums on the same loan
//!
//! Usage: cargo run --bin upfront_sweep -- --loan-value 92000 --salary 45000

use anyhow::{Context, Result};
use chrono::{Months, NaiveDate};
use clap::Parser;
use std::time::Instant;

use student_loan_model::{IncreaseType, LoanConfig, ScenarioRunner};

#[derive(Parser)]
#[command(about = "Sweep upfront repayments and compare total cost")]
struct Args {
    #[arg(long, default_value = "2024-09-01")]
    start_date: NaiveDate,

    /// Term in years before write-off
    #[arg(long, default_value_t = 30)]
    term_years: u32,

    #[arg(long, default_value_t = 92_000.0)]
    loan_value: f64,

    #[arg(long, default_value_t = 45_000.0)]
    salary: f64,

    /// Fixed annual salary rise
    #[arg(long, default_value_t = 1_500.0)]
    salary_increase: f64,

    #[arg(long, default_value_t = 0.05)]
    interest_rate: f64,

    /// Largest upfront amount tried
    #[arg(long, default_value_t = 50_000.0)]
    max_upfront: f64,

    /// Step between upfront amounts
    #[arg(long, default_value_t = 5_000.0)]
    step: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    anyhow::ensure!(args.step > 0.0, "--step must be positive");

    let write_off_date = args
        .start_date
        .checked_add_months(Months::new(args.term_years * 12))
        .context("write-off date out of range")?;

    let base = LoanConfig::new(
        args.start_date,
        write_off_date,
        args.loan_value,
        args.salary,
        args.salary_increase,
    )
    .with_increase_type(IncreaseType::Fixed)
    .with_interest_rate(args.interest_rate);

    let steps = (args.max_upfront / args.step).floor() as usize;
    let upfronts: Vec<f64> = (0..=steps).map(|i| i as f64 * args.step).collect();

    let start = Instant::now();
    let outcomes = ScenarioRunner::new().upfront_sweep(&base, &upfronts)?;
    println!("Ran {} scenarios in {:?}\n", outcomes.len(), start.elapsed());

    println!(
        "{:>10} {:>14} {:>14} {:>14} {:>8} {:>10}",
        "Upfront", "Total repaid", "Interest", "Net cost", "Months", "Repaid"
    );
    println!("{}", "-".repeat(76));

    for (upfront, outcome) in upfronts.iter().zip(&outcomes) {
        let result = outcome
            .result
            .as_ref()
            .map_err(|e| anyhow::anyhow!("{}: {}", outcome.name, e))?;
        let summary = result.summary();
        println!(
            "{:>10.0} {:>14.2} {:>14.2} {:>14.2} {:>8} {:>10}",
            upfront,
            summary.total_repaid,
            summary.total_interest,
            summary.net_salary_lost_plus_discretionary,
            summary.months_repaying,
            summary.outcome.is_repaid(),
        );
    }

    Ok(())
}
