//! Year-by-year amortization table.

use chrono::{Datelike, NaiveDate};
use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::loan::{add_months, payments, LoanPayment, Payments, PMTS_PER_YEAR};
use crate::mortgage::LoanSummary;

/// Years shown by [`ScheduleMode::Display`].
pub const DISPLAY_YEARS: u32 = 5;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ScheduleMode {
    /// At most the first five years.
    #[default]
    Display,
    /// Every year of the term.
    Full,
}

/// Payments aggregated over one loan year.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AmortizationYearRow {
    /// 1-based loan year.
    pub year: u32,
    /// Calendar year reached after the last payment of this loan year.
    pub calendar_year: i32,
    pub principal_paid: f64,
    pub interest_paid: f64,
    pub total_paid: f64,
    /// Balance after the year, never below zero.
    pub remaining_balance: f64,
}

/// A fixed-payment amortization, viewed one loan year at a time.
///
/// Holds only the loan parameters; rows are simulated on demand each time
/// [`iter`](Self::iter) is called.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AmortizationSchedule {
    pub loan_amount: f64,
    pub monthly_rate: f64,
    pub number_of_payments: u32,
    pub monthly_payment: f64,
    pub start_date: NaiveDate,
    pub mode: ScheduleMode,
}

pub fn generate_amortization_schedule(
    loan_amount: f64,
    monthly_rate: f64,
    number_of_payments: u32,
    monthly_payment: f64,
    start_date: NaiveDate,
) -> AmortizationSchedule {
    AmortizationSchedule {
        loan_amount,
        monthly_rate,
        number_of_payments,
        monthly_payment,
        start_date,
        mode: ScheduleMode::Display,
    }
}

/// Schedule for the principal and interest payment of an already computed summary.
pub fn schedule_for(summary: &LoanSummary, mode: ScheduleMode) -> AmortizationSchedule {
    generate_amortization_schedule(
        summary.loan_amount,
        summary.monthly_rate,
        summary.number_of_payments,
        summary.monthly_principal_interest,
        summary.start_date,
    )
    .with_mode(mode)
}

impl AmortizationSchedule {
    pub fn with_mode(mut self, mode: ScheduleMode) -> Self {
        self.mode = mode;
        self
    }

    /// Number of loan years the schedule will show at most.
    pub fn display_years(&self) -> u32 {
        let term_years = self.number_of_payments.div_ceil(PMTS_PER_YEAR);
        match self.mode {
            ScheduleMode::Display => term_years.min(DISPLAY_YEARS),
            ScheduleMode::Full => term_years,
        }
    }

    /// Every monthly payment over the full term, regardless of mode.
    pub fn payments(&self) -> Payments {
        payments(
            self.loan_amount,
            self.monthly_rate,
            self.number_of_payments,
            self.monthly_payment,
            self.start_date,
        )
    }

    pub fn iter(&self) -> YearRows {
        debug!(
            "schedule for {} over {} pmts of {}, showing {} years",
            self.loan_amount,
            self.number_of_payments,
            self.monthly_payment,
            self.display_years()
        );
        YearRows {
            payments: self.payments(),
            start_date: self.start_date,
            year: 0,
            display_years: self.display_years(),
            paid_off: false,
        }
    }
}

impl<'a> IntoIterator for &'a AmortizationSchedule {
    type Item = AmortizationYearRow;
    type IntoIter = YearRows;

    fn into_iter(self) -> YearRows {
        self.iter()
    }
}

/// Iterator over [`AmortizationYearRow`]s; see [`AmortizationSchedule::iter`].
///
/// A loan year that starts with nothing owing is still emitted once (with
/// zero payments), then iteration stops.
#[derive(Clone, Debug)]
pub struct YearRows {
    payments: Payments,
    start_date: NaiveDate,
    year: u32,
    display_years: u32,
    paid_off: bool,
}

impl Iterator for YearRows {
    type Item = AmortizationYearRow;

    fn next(&mut self) -> Option<AmortizationYearRow> {
        if self.paid_off || self.year >= self.display_years {
            return None;
        }
        self.year += 1;

        let (principal_paid, interest_paid) = self
            .payments
            .by_ref()
            .take(PMTS_PER_YEAR as usize)
            .fold((0., 0.), |(principal, interest), pmt: LoanPayment| {
                (principal + pmt.pmt_principal_paid, interest + pmt.pmt_interest_paid)
            });

        let balance = self.payments.balance();
        self.paid_off = balance <= 0.;

        Some(AmortizationYearRow {
            year: self.year,
            calendar_year: add_months(self.start_date, self.payments.made()).year(),
            principal_paid,
            interest_paid,
            total_paid: principal_paid + interest_paid,
            remaining_balance: balance.max(0.),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{generate_amortization_schedule, schedule_for, AmortizationYearRow, ScheduleMode};
    use crate::loan::{annuity_payment, monthly_rate, round};
    use crate::mortgage::{compute_summary, LoanInput};
    use chrono::NaiveDate;
    use test_log::test;

    fn rounded(row: &AmortizationYearRow) -> (u32, i32, f64, f64, f64, f64) {
        (
            row.year,
            row.calendar_year,
            round(row.principal_paid, 2),
            round(row.interest_paid, 2),
            round(row.total_paid, 2),
            round(row.remaining_balance, 2),
        )
    }

    fn thirty_year() -> LoanInput {
        LoanInput::new(300000., 60000., 30, 3.5)
            .with_start_date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
    }

    #[test]
    fn test_display_schedule() {
        let input = thirty_year();
        let summary = compute_summary(&input);
        let schedule = schedule_for(&summary, ScheduleMode::Display);
        let rows: Vec<_> = schedule.iter().map(|row| rounded(&row)).collect();

        assert_eq!(
            rows,
            vec![
                (1, 2025, 4605.91, 8326.58, 12932.49, 235394.09),
                (2, 2026, 4769.73, 8162.76, 12932.49, 230624.37),
                (3, 2027, 4939.37, 7993.12, 12932.49, 225685.00),
                (4, 2028, 5115.05, 7817.44, 12932.49, 220569.95),
                (5, 2029, 5296.97, 7635.51, 12932.49, 215272.97),
            ]
        );

        let principal: f64 = schedule.iter().map(|row| row.principal_paid).sum();
        assert!(principal <= summary.loan_amount);
    }

    #[test]
    fn test_schedule_restartable() {
        let input = thirty_year();
        let schedule = schedule_for(&compute_summary(&input), ScheduleMode::Display);
        let first: Vec<_> = schedule.iter().collect();
        let second: Vec<_> = (&schedule).into_iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_full_schedule_matches_closed_form() {
        let input = thirty_year();
        let summary = compute_summary(&input);
        let rows: Vec<_> = schedule_for(&summary, ScheduleMode::Full).iter().collect();

        assert_eq!(rows.len(), 30);
        assert_eq!(rows[29].calendar_year, 2054);
        assert_eq!(round(rows[29].remaining_balance, 2), 0.);

        let interest: f64 = rows.iter().map(|row| row.interest_paid).sum();
        let principal: f64 = rows.iter().map(|row| row.principal_paid).sum();
        assert!(((interest - summary.total_interest) / summary.total_interest).abs() < 1e-6);
        assert!(principal <= summary.loan_amount + 1e-6);
    }

    #[test]
    fn test_closed_form_across_loans() {
        let start = NaiveDate::from_ymd_opt(2020, 6, 1).unwrap();
        let loans = [(50000., 7.25, 10), (480000., 6.1, 30), (95000., 2.0, 15)];
        for (principal, rate, years) in loans {
            let r = monthly_rate(rate);
            let n = years * 12;
            let pmt = annuity_payment(principal, r, n);
            let schedule = generate_amortization_schedule(principal, r, n, pmt, start)
                .with_mode(ScheduleMode::Full);

            let simulated: f64 = schedule.iter().map(|row| row.interest_paid).sum();
            let closed_form = pmt * n as f64 - principal;
            assert!(((simulated - closed_form) / closed_form).abs() < 1e-6);

            let mut previous = principal;
            for pmt in schedule.payments() {
                assert!(pmt.pmt_end_balance < previous);
                previous = pmt.pmt_end_balance;
            }
        }
    }

    #[test]
    fn test_short_term_shows_full_term() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let r = monthly_rate(6.);
        let pmt = annuity_payment(10000., r, 36);
        let rows: Vec<_> = generate_amortization_schedule(10000., r, 36, pmt, start)
            .iter()
            .map(|row| rounded(&row))
            .collect();

        assert_eq!(
            rows,
            vec![
                (1, 2025, 3135.94, 514.69, 3650.63, 6864.06),
                (2, 2026, 3329.36, 321.28, 3650.63, 3534.70),
                (3, 2027, 3534.70, 115.93, 3650.63, 0.),
            ]
        );
    }

    #[test]
    fn test_partial_final_year() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let r = monthly_rate(4.);
        let pmt = annuity_payment(20000., r, 18);
        let schedule = generate_amortization_schedule(20000., r, 18, pmt, start);

        assert_eq!(schedule.display_years(), 2);
        let rows: Vec<_> = schedule.iter().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].calendar_year, 2025);
        assert_eq!(round(rows[1].remaining_balance, 2), 0.);
        assert_eq!(round(rows[1].total_paid, 2), round(pmt * 6., 2));
    }

    #[test]
    fn test_overpayment_stops_early() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        // payment large enough to retire the balance within the first year.
        // The final month overshoots: principal paid can exceed the loan
        // amount unless the payment comes from `annuity_payment`.
        let rows: Vec<_> = generate_amortization_schedule(10000., 0., 360, 1500., start)
            .iter()
            .collect();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].remaining_balance, 0.);
        assert_eq!(rows[0].calendar_year, 2024);
        assert_eq!(rows[0].principal_paid, 10500.);
    }

    #[test]
    fn test_no_balance_emits_single_row() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let rows: Vec<_> = generate_amortization_schedule(-5000., 0.003, 360, -20., start)
            .iter()
            .collect();

        assert_eq!(
            rows,
            vec![AmortizationYearRow {
                year: 1,
                calendar_year: 2024,
                principal_paid: 0.,
                interest_paid: 0.,
                total_paid: 0.,
                remaining_balance: 0.,
            }]
        );
    }

    #[test]
    fn test_zero_payments_is_empty() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(
            generate_amortization_schedule(10000., 0.003, 0, 0., start)
                .iter()
                .count(),
            0
        );
    }
}
