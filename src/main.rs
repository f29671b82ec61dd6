//! Student Loan Model CLI
//!
//! Command-line interface for projecting a single loan or a batch of scenarios

use anyhow::{Context, Result};
use chrono::{Months, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use student_loan_model::calendar::DateRoll;
use student_loan_model::output::{render_table, summary_json, write_series_csv};
use student_loan_model::scenario::load_scenarios;
use student_loan_model::simulation::{
    DEFAULT_ANNUAL_INTEREST_RATE, DEFAULT_REPAYMENT_RATE, DEFAULT_REPAYMENT_THRESHOLD,
};
use student_loan_model::{
    IncreaseType, LoanConfig, LoanSimulation, LoanSummary, RepaymentPolicy, ScenarioRunner,
};

/// Project an income-contingent student loan month by month
#[derive(Parser)]
#[command(name = "student-loan", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    output: OutputFormat,

    /// Write output to this file instead of stdout
    #[arg(long, global = true)]
    out: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a single loan
    Simulate(SimulateArgs),
    /// Simulate every scenario in a CSV file
    Batch(BatchArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

#[derive(Args)]
struct SimulateArgs {
    /// First period date (YYYY-MM-DD)
    #[arg(long)]
    start_date: NaiveDate,

    /// Write-off date (YYYY-MM-DD); defaults to 30 years after the start
    #[arg(long)]
    write_off_date: Option<NaiveDate>,

    /// Loan balance at the start date
    #[arg(long)]
    loan_value: f64,

    /// Annual salary in the first year
    #[arg(long)]
    salary: f64,

    /// Annual salary change (percent or amount, see --increase-type)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    salary_increase: f64,

    /// 'percent' or 'fixed'
    #[arg(long, default_value = "percent")]
    increase_type: IncreaseType,

    #[arg(long, default_value_t = DEFAULT_REPAYMENT_THRESHOLD)]
    repayment_threshold: f64,

    #[arg(long, default_value_t = DEFAULT_REPAYMENT_RATE)]
    repayment_rate: f64,

    #[arg(long, default_value_t = DEFAULT_ANNUAL_INTEREST_RATE)]
    interest_rate: f64,

    /// Lump sum paid before the first period's interest
    #[arg(long, default_value_t = 0.0)]
    upfront: f64,

    /// Fixed extra amount paid every month
    #[arg(long, default_value_t = 0.0)]
    monthly: f64,

    /// 'same-day' or 'month-end'
    #[arg(long, default_value = "same-day")]
    date_roll: DateRoll,

    /// Number of periods shown in table output
    #[arg(long)]
    rows: Option<usize>,
}

#[derive(Args)]
struct BatchArgs {
    /// CSV file with one scenario per row
    scenarios: PathBuf,
}

/// One line of batch output
#[derive(Serialize)]
struct BatchRow<'a> {
    name: &'a str,
    total_repaid: f64,
    total_interest: f64,
    final_balance: f64,
    repaid_in_full: bool,
    months_repaying: u32,
    years_repaying: u32,
    net_salary_lost: f64,
}

impl<'a> BatchRow<'a> {
    fn new(name: &'a str, summary: &LoanSummary) -> Self {
        Self {
            name,
            total_repaid: summary.total_repaid,
            total_interest: summary.total_interest,
            final_balance: summary.final_balance,
            repaid_in_full: summary.outcome.is_repaid(),
            months_repaying: summary.months_repaying,
            years_repaying: summary.years_repaying,
            net_salary_lost: summary.net_salary_lost,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut sink: Box<dyn Write> = match &cli.out {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };

    match cli.command {
        Commands::Simulate(args) => run_simulate(args, cli.output, sink.as_mut()),
        Commands::Batch(args) => run_batch(args, cli.output, sink.as_mut()),
    }
}

fn run_simulate(args: SimulateArgs, format: OutputFormat, sink: &mut dyn Write) -> Result<()> {
    let write_off_date = match args.write_off_date {
        Some(date) => date,
        None => args
            .start_date
            .checked_add_months(Months::new(360))
            .context("start date too late for a 30 year term")?,
    };

    let policy = RepaymentPolicy::new(args.upfront, args.monthly)?;
    let config = LoanConfig::new(
        args.start_date,
        write_off_date,
        args.loan_value,
        args.salary,
        args.salary_increase,
    )
    .with_increase_type(args.increase_type)
    .with_repayment_terms(args.repayment_threshold, args.repayment_rate)
    .with_interest_rate(args.interest_rate)
    .with_repayment_policy(policy)
    .with_date_roll(args.date_roll);

    let mut simulation = LoanSimulation::new(config)?;
    let result = simulation.run()?;

    match format {
        OutputFormat::Table => write!(sink, "{}", render_table(result, args.rows))?,
        OutputFormat::Csv => write_series_csv(&mut *sink, result.rows())?,
        OutputFormat::Json => writeln!(sink, "{}", summary_json(&result.summary())?)?,
    }

    Ok(())
}

fn run_batch(args: BatchArgs, format: OutputFormat, sink: &mut dyn Write) -> Result<()> {
    let scenarios = load_scenarios(&args.scenarios)
        .with_context(|| format!("loading scenarios from {}", args.scenarios.display()))?;

    let outcomes = ScenarioRunner::new().run_all(&scenarios);

    let mut rows = Vec::with_capacity(outcomes.len());
    for outcome in &outcomes {
        let result = outcome
            .result
            .as_ref()
            .map_err(|e| anyhow::anyhow!("scenario '{}': {}", outcome.name, e))?;
        rows.push(BatchRow::new(&outcome.name, &result.summary()));
    }

    match format {
        OutputFormat::Table => {
            writeln!(
                sink,
                "{:<20} {:>12} {:>12} {:>12} {:>7} {:>12}",
                "Scenario", "Repaid", "Interest", "Balance", "Months", "Repaid?"
            )?;
            writeln!(sink, "{}", "-".repeat(80))?;
            for row in &rows {
                writeln!(
                    sink,
                    "{:<20} {:>12.2} {:>12.2} {:>12.2} {:>7} {:>12}",
                    row.name,
                    row.total_repaid,
                    row.total_interest,
                    row.final_balance,
                    row.months_repaying,
                    row.repaid_in_full,
                )?;
            }
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(&mut *sink);
            for row in &rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
        OutputFormat::Json => writeln!(sink, "{}", serde_json::to_string_pretty(&rows)?)?,
    }

    Ok(())
}
