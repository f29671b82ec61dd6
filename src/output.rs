//! Writers for simulation output: CSV series, JSON summary, terminal table

use std::fmt::Write as _;
use std::io::Write;

use crate::error::Result;
use crate::simulation::{LoanSummary, PeriodRow, SimulationResult};

/// Write one CSV line per period, with a header row
pub fn write_series_csv<W: Write>(writer: W, rows: &[PeriodRow]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Pretty-printed JSON for a summary
pub fn summary_json(summary: &LoanSummary) -> Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}

/// Fixed-width text table of the series followed by the summary
///
/// `max_rows` limits how many periods are printed (all when `None`).
pub fn render_table(result: &SimulationResult, max_rows: Option<usize>) -> String {
    let mut out = String::new();
    let rows = result.rows();
    let shown = max_rows.unwrap_or(rows.len()).min(rows.len());

    let _ = writeln!(
        out,
        "{:>6} {:>10} {:>12} {:>10} {:>10} {:>10} {:>12} {:>12}",
        "Period", "Date", "Opening", "Upfront", "Interest", "Repaid", "Closing", "Salary"
    );
    let _ = writeln!(out, "{}", "-".repeat(90));

    for row in &rows[..shown] {
        let _ = writeln!(
            out,
            "{:>6} {:>10} {:>12.2} {:>10.2} {:>10.2} {:>10.2} {:>12.2} {:>12.2}",
            row.period,
            row.date,
            row.opening_balance,
            row.upfront,
            row.interest,
            row.repayment,
            row.closing_balance,
            row.salary,
        );
    }
    if rows.len() > shown {
        let _ = writeln!(out, "... ({} more months)", rows.len() - shown);
    }

    let summary = result.summary();
    let _ = writeln!(out);
    let _ = writeln!(out, "Summary:");
    let _ = writeln!(out, "  Total repaid: {:.2}", summary.total_repaid);
    let _ = writeln!(out, "  Total interest: {:.2}", summary.total_interest);
    let _ = writeln!(out, "  Remaining loan balance: {:.2}", summary.final_balance);
    let _ = writeln!(out, "  Loan repaid in full: {}", summary.outcome.is_repaid());
    let _ = writeln!(out, "  Months repaying: {}", summary.months_repaying);
    let _ = writeln!(out, "  Years repaying (approx): {}", summary.years_repaying);
    let _ = writeln!(out, "  Net salary lost (after tax + NI): {:.2}", summary.net_salary_lost);
    let _ = writeln!(
        out,
        "  Total net salary lost + repayments: {:.2}",
        summary.net_salary_lost_plus_discretionary
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{LoanConfig, LoanSimulation};
    use chrono::NaiveDate;

    fn short_result() -> SimulationResult {
        let config = LoanConfig::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            10_000.0,
            20_000.0,
            0.0,
        );
        LoanSimulation::simulate(config).unwrap()
    }

    #[test]
    fn test_series_csv_has_header_and_rows() {
        let result = short_result();
        let mut buf = Vec::new();
        write_series_csv(&mut buf, result.rows()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("period,salary_year,date,opening_balance"));
        assert!(lines[1].starts_with("1,1,2024-01-01,10000"));
    }

    #[test]
    fn test_summary_json_round_trips() {
        let summary = short_result().summary();
        let json = summary_json(&summary).unwrap();
        assert!(json.contains("\"outcome\": \"written_off\""));
        let parsed: LoanSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, summary);
    }

    #[test]
    fn test_table_truncates() {
        let table = render_table(&short_result(), Some(2));
        assert!(table.contains("... (1 more months)"));
        assert!(table.contains("Loan repaid in full: false"));
    }
}
