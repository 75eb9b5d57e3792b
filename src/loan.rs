use chrono::{Months, NaiveDate};
use log::trace;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Payments per year. Mortgages here always pay and compound monthly.
pub const PMTS_PER_YEAR: u32 = 12;

/// A single simulated monthly payment.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LoanPayment {
    pub pmt_number: u32,
    pub pmt_date: NaiveDate,
    pub pmt_amount: f64,
    pub pmt_interest_paid: f64,
    pub pmt_principal_paid: f64,
    pub pmt_end_balance: f64,
}

impl LoanPayment {
    pub fn new(
        pmt_number: u32,
        pmt_date: NaiveDate,
        pmt_amount: f64,
        pmt_interest_paid: f64,
        pmt_end_balance: f64,
    ) -> Self {
        Self {
            pmt_number,
            pmt_date,
            pmt_amount,
            pmt_interest_paid,
            pmt_principal_paid: pmt_amount - pmt_interest_paid,
            pmt_end_balance,
        }
    }
}

impl fmt::Display for LoanPayment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pmt number {}, date {}, payment ${:.2}, interest paid ${:.2}, \
             principal paid ${:.2}, ending balance ${:.2}",
            self.pmt_number,
            self.pmt_date,
            self.pmt_amount,
            self.pmt_interest_paid,
            self.pmt_principal_paid,
            self.pmt_end_balance
        )
    }
}

/// Round `amt` to `dec_places` decimal places.
pub fn round(amt: f64, dec_places: i32) -> f64 {
    if amt == 0. {
        0.
    } else {
        (amt * 10_f64.powi(dec_places)).round() / 10_f64.powi(dec_places)
    }
}

/// Convert an annual percentage rate (i.e., 3.5) to the monthly periodic rate.
pub fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 100. / PMTS_PER_YEAR as f64
}

/// Fixed payment that retires `principal` over `pmt_count` monthly periods.
///
/// Uses the annuity formula `P = L·r·(1+r)^n / ((1+r)^n − 1)`. A zero rate
/// degenerates to straight-line repayment, and a zero payment count yields 0
/// rather than dividing by zero. When `(1+r)^n` overflows the payment is the
/// limit of the formula, interest only (`L·r`).
pub fn annuity_payment(principal: f64, monthly_rate: f64, pmt_count: u32) -> f64 {
    if pmt_count == 0 {
        return 0.;
    }
    if monthly_rate == 0. {
        return principal / pmt_count as f64;
    }

    let factor = (1. + monthly_rate).powf(pmt_count as f64);
    if factor.is_infinite() {
        return principal * monthly_rate;
    }
    let denominator = factor - 1.;
    if denominator == 0. {
        // rate too small to register in (1+r)^n
        return principal / pmt_count as f64;
    }
    principal * monthly_rate * (factor / denominator)
}

/// `date` moved forward by `months` calendar months.
///
/// Day-of-month is clamped to the end of shorter months (Jan 31 + 1 → Feb 28/29).
/// Saturates at `NaiveDate::MAX` instead of panicking on overflow.
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Month-by-month amortization of a fixed payment.
///
/// Each step charges `balance × rate` interest and applies the remainder of
/// the payment to principal. Iteration ends once the balance is no longer
/// positive or `pmt_count` payments have been made. The iterator owns a copy
/// of its inputs, so cloning it (or calling [`payments`] again) replays the
/// same sequence.
#[derive(Clone, Debug)]
pub struct Payments {
    balance: f64,
    monthly_rate: f64,
    pmt_amount: f64,
    pmt_count: u32,
    start_date: NaiveDate,
    pmt_number: u32,
}

pub fn payments(
    principal: f64,
    monthly_rate: f64,
    pmt_count: u32,
    pmt_amount: f64,
    start_date: NaiveDate,
) -> Payments {
    Payments {
        balance: principal,
        monthly_rate,
        pmt_amount,
        pmt_count,
        start_date,
        pmt_number: 0,
    }
}

impl Payments {
    /// Balance before the next payment.
    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Payments made so far.
    pub fn made(&self) -> u32 {
        self.pmt_number
    }
}

impl Iterator for Payments {
    type Item = LoanPayment;

    fn next(&mut self) -> Option<LoanPayment> {
        if self.balance <= 0. || self.pmt_number >= self.pmt_count {
            return None;
        }

        self.pmt_number += 1;
        let interest = self.balance * self.monthly_rate;
        let principal = self.pmt_amount - interest;
        self.balance -= principal;

        let pmt_date = add_months(self.start_date, self.pmt_number);
        trace!(
            "Pmt # {}, date {}, interest {}, principal {}, end bal {}",
            self.pmt_number,
            pmt_date,
            interest,
            principal,
            self.balance
        );

        Some(LoanPayment::new(
            self.pmt_number,
            pmt_date,
            self.pmt_amount,
            interest,
            self.balance,
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.pmt_count.saturating_sub(self.pmt_number) as usize))
    }
}
