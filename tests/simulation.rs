//! End-to-end checks through the public API

use approx::assert_abs_diff_eq;
use chrono::NaiveDate;

use student_loan_model::output::write_series_csv;
use student_loan_model::scenario::load_scenarios_from_reader;
use student_loan_model::{
    IncreaseType, LoanConfig, LoanError, LoanOutcome, LoanSimulation, RepaymentPolicy,
    ScenarioRunner,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn reference_borrower_first_month() {
    let config = LoanConfig::new(date(2024, 9, 1), date(2054, 9, 1), 92_000.0, 130_000.0, 10_000.0)
        .with_increase_type(IncreaseType::Fixed)
        .with_repayment_terms(27_295.0, 0.09)
        .with_interest_rate(0.05);

    let mut simulation = LoanSimulation::new(config).unwrap();
    simulation.run().unwrap();

    let first = &simulation.series().unwrap()[0];
    assert_eq!(first.interest, 383.33);
    assert_eq!(first.contingent_repayment, 770.29);
    assert_eq!(first.closing_balance, 91_613.04);

    let summary = simulation.summary().unwrap();
    assert_eq!(summary.outcome, LoanOutcome::Repaid);
    assert_eq!(simulation.final_balance().unwrap(), 0.0);
    assert_abs_diff_eq!(
        summary.total_repaid,
        92_000.0 + summary.total_interest,
        epsilon = 0.01
    );
}

#[test]
fn low_earner_written_off_on_schedule() {
    let config = LoanConfig::new(date(2024, 9, 1), date(2054, 9, 1), 45_000.0, 25_000.0, 0.0);
    let result = LoanSimulation::simulate(config).unwrap();

    assert_eq!(result.outcome(), LoanOutcome::WrittenOff);
    assert_eq!(result.rows().len(), 360);
    assert_eq!(result.rows().last().unwrap().date, date(2054, 8, 1));
    assert!(result.final_balance() > 45_000.0);
    assert_eq!(result.summary().net_salary_lost, 0.0);
}

#[test]
fn default_policy_matches_explicit_zero_policy() {
    let base = LoanConfig::new(date(2024, 9, 1), date(2054, 9, 1), 45_000.0, 38_000.0, 2.5);
    let explicit = base
        .clone()
        .with_repayment_policy(RepaymentPolicy::new(0.0, 0.0).unwrap());

    let implicit_result = LoanSimulation::simulate(base).unwrap();
    let explicit_result = LoanSimulation::simulate(explicit).unwrap();
    assert_eq!(implicit_result, explicit_result);
}

#[test]
fn overpaying_shortens_the_loan() {
    let base = LoanConfig::new(date(2024, 9, 1), date(2054, 9, 1), 40_000.0, 50_000.0, 3.0)
        .with_interest_rate(0.05);
    let overpaying = base
        .clone()
        .with_repayment_policy(RepaymentPolicy::monthly_only(300.0).unwrap());

    let plain = LoanSimulation::simulate(base).unwrap().summary();
    let faster = LoanSimulation::simulate(overpaying).unwrap().summary();

    assert!(faster.months_repaying < plain.months_repaying);
    assert!(faster.total_interest < plain.total_interest);
    assert!(faster.total_discretionary > 0.0);
}

#[test]
fn invalid_configs_fail_fast() {
    let bad = LoanConfig::new(date(2024, 9, 1), date(2024, 9, 1), 45_000.0, 25_000.0, 0.0);
    assert!(matches!(
        LoanSimulation::new(bad),
        Err(LoanError::InvalidParameter { .. })
    ));
    assert!(matches!(
        RepaymentPolicy::new(-1.0, 0.0),
        Err(LoanError::InvalidParameter { .. })
    ));
}

#[test]
fn batch_from_csv_runs_every_row() {
    let csv = "\
name,start_date,write_off_date,loan_value,salary,salary_increase,increase_type,upfront
low,2024-09-01,2054-09-01,45000,25000,0,fixed,0
high,2024-09-01,2054-09-01,45000,90000,2000,fixed,0
lump,2024-09-01,2054-09-01,45000,90000,2000,fixed,40000
";
    let scenarios = load_scenarios_from_reader(csv.as_bytes()).unwrap();
    let outcomes = ScenarioRunner::new().run_all(&scenarios);

    let names: Vec<&str> = outcomes.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["low", "high", "lump"]);

    let summaries: Vec<_> = outcomes
        .iter()
        .map(|o| o.result.as_ref().unwrap().summary())
        .collect();
    assert_eq!(summaries[0].outcome, LoanOutcome::WrittenOff);
    assert_eq!(summaries[1].outcome, LoanOutcome::Repaid);
    assert!(summaries[2].months_repaying < summaries[1].months_repaying);
}

#[test]
fn series_csv_has_one_line_per_period() {
    let config = LoanConfig::new(date(2024, 1, 1), date(2026, 1, 1), 10_000.0, 20_000.0, 0.0);
    let result = LoanSimulation::simulate(config).unwrap();

    let mut buf = Vec::new();
    write_series_csv(&mut buf, result.rows()).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert_eq!(text.lines().count(), result.rows().len() + 1);
}
