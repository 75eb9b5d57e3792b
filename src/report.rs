//! Plain-text rendering of calculator output.

use chrono::NaiveDate;
use std::fmt::{self, Write};

use crate::comparison::ComparisonScenario;
use crate::mortgage::LoanSummary;
use crate::schedule::{AmortizationSchedule, AmortizationYearRow};

/// `$1,234.57` style currency with `decimals` places. Negative amounts get a
/// leading `-`.
pub fn format_currency(amount: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, amount.abs());
    let (whole, frac) = match fixed.split_once('.') {
        Some((whole, frac)) => (whole, Some(frac)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    // rounds to zero: no "-$0.00"
    let negative = amount < 0. && fixed.bytes().any(|b| (b'1'..=b'9').contains(&b));
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push('$');
    out.push_str(&grouped);
    if let Some(frac) = frac {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Month and year, i.e. "March 2054".
pub fn format_month_year(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

fn summary_line(f: &mut fmt::Formatter<'_>, label: &str, value: &str) -> fmt::Result {
    writeln!(f, "  {:<26} {:>16}", label, value)
}

impl fmt::Display for LoanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let monthly = |amount: f64| format_currency(amount, 2);

        writeln!(f, "Loan Summary")?;
        summary_line(f, "Loan Amount", &format_currency(self.loan_amount, 0))?;
        summary_line(f, "Total Interest Paid", &format_currency(self.total_interest, 0))?;
        summary_line(f, "Total Cost of Loan", &format_currency(self.total_cost, 0))?;
        summary_line(f, "Payoff Date", &format_month_year(self.payoff_date))?;
        writeln!(f)?;

        writeln!(f, "Payment Breakdown")?;
        summary_line(f, "Principal & Interest", &monthly(self.monthly_principal_interest))?;
        summary_line(f, "Interest (lifetime avg.)", &monthly(self.average_monthly_interest()))?;
        summary_line(f, "Property Tax", &monthly(self.monthly_tax))?;
        summary_line(f, "Home Insurance", &monthly(self.monthly_insurance))?;
        summary_line(f, "PMI", &monthly(self.monthly_pmi))?;
        summary_line(f, "HOA Fees", &monthly(self.monthly_hoa))?;
        if self.extra_monthly_payment != 0. {
            summary_line(f, "Extra Payment", &monthly(self.extra_monthly_payment))?;
        }
        write!(
            f,
            "  {:<26} {:>16}",
            "Total Monthly Payment",
            monthly(self.total_monthly_payment)
        )
    }
}

impl fmt::Display for AmortizationYearRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<16} {:>14} {:>14} {:>14} {:>16}",
            format!("Year {} ({})", self.year, self.calendar_year),
            format_currency(self.principal_paid, 2),
            format_currency(self.interest_paid, 2),
            format_currency(self.total_paid, 2),
            format_currency(self.remaining_balance, 2)
        )
    }
}

impl fmt::Display for ComparisonScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let savings = self
            .savings_vs_thirty_year
            .map(|v| format_currency(v, 0))
            .unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "{:<8} {:>7} {:>16} {:>16} {:>14}",
            format!("{}-year", self.term_years),
            format!("{:.2}%", self.applied_rate),
            format_currency(self.monthly_payment, 2),
            format_currency(self.total_interest, 0),
            savings
        )
    }
}

/// Summary, year-by-year schedule and term comparison as one text block.
pub fn render_report(
    summary: &LoanSummary,
    schedule: &AmortizationSchedule,
    comparison: &[ComparisonScenario],
) -> String {
    let mut out = String::new();
    // writing to a String cannot fail
    let _ = render_into(&mut out, summary, schedule, comparison);
    out
}

fn render_into(
    out: &mut String,
    summary: &LoanSummary,
    schedule: &AmortizationSchedule,
    comparison: &[ComparisonScenario],
) -> fmt::Result {
    writeln!(out, "Monthly Payment: {}", format_currency(summary.total_monthly_payment, 2))?;
    writeln!(out, "Total Interest:  {}", format_currency(summary.total_interest, 0))?;
    writeln!(out, "Payoff Date:     {}", format_month_year(summary.payoff_date))?;
    writeln!(out)?;
    writeln!(out, "{}", summary)?;
    writeln!(out)?;

    writeln!(out, "Amortization Schedule")?;
    writeln!(
        out,
        "{:<16} {:>14} {:>14} {:>14} {:>16}",
        "Year", "Principal", "Interest", "Total", "Balance"
    )?;
    for row in schedule {
        writeln!(out, "{}", row)?;
    }
    writeln!(out)?;

    writeln!(out, "Compare Loan Options")?;
    writeln!(
        out,
        "{:<8} {:>7} {:>16} {:>16} {:>14}",
        "Term", "Rate", "Monthly Payment", "Total Interest", "Savings"
    )?;
    for scenario in comparison {
        writeln!(out, "{}", scenario)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{format_currency, format_month_year, render_report};
    use crate::comparison::compute_comparison;
    use crate::mortgage::{compute_summary, LoanInput};
    use crate::schedule::{schedule_for, ScheduleMode};
    use chrono::NaiveDate;
    use test_log::test;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1077.7072507, 2), "$1,077.71");
        assert_eq!(format_currency(147974.61, 0), "$147,975");
        assert_eq!(format_currency(999.999, 2), "$1,000.00");
        assert_eq!(format_currency(1234567.891, 2), "$1,234,567.89");
        assert_eq!(format_currency(0., 2), "$0.00");
        assert_eq!(format_currency(-50000., 0), "-$50,000");
        assert_eq!(format_currency(-0.001, 2), "$0.00");
        assert_eq!(format_currency(100., 0), "$100");
    }

    #[test]
    fn test_format_month_year() {
        assert_eq!(
            format_month_year(NaiveDate::from_ymd_opt(2054, 3, 1).unwrap()),
            "March 2054"
        );
    }

    #[test]
    fn test_render_report() {
        let input = LoanInput::new(300000., 60000., 30, 3.5)
            .with_start_date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        let summary = compute_summary(&input);
        let schedule = schedule_for(&summary, ScheduleMode::Display);
        let comparison = compute_comparison(300000., 60000., 30, 3.5);
        let report = render_report(&summary, &schedule, &comparison);

        assert!(report.starts_with("Monthly Payment: $1,077.71\n"));
        assert!(report.contains("Payoff Date:     January 2054"));
        assert!(report.contains("Year 1 (2025)"));
        assert!(report.contains("Year 5 (2029)"));
        assert!(!report.contains("Year 6"));
        assert!(report.contains("$235,394.09"));
        assert!(report.contains("2.75%"));
        assert!(report.contains("$94,810"));
        assert!(report.contains("Interest (lifetime avg.)            $411.04"));
        assert!(!report.contains("Extra Payment"));
    }
}
