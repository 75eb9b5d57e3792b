//! Monthly payment breakdown and lifetime totals for a fixed-rate mortgage.

use chrono::{Local, NaiveDate};
use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::loan::{add_months, annuity_payment, monthly_rate, PMTS_PER_YEAR};

pub const DEFAULT_TERM_YEARS: u32 = 30;
pub const DEFAULT_ANNUAL_RATE: f64 = 3.5;

/// Down payment share of the home price below which PMI is charged.
pub const PMI_DOWN_PAYMENT_THRESHOLD: f64 = 0.20;

/// Loan parameters as entered by the borrower.
///
/// Amounts are currency, rates are percentages (3.5 means 3.5%). Nothing is
/// validated: a down payment larger than the home price simply produces a
/// negative loan amount.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LoanInput {
    pub home_price: f64,
    pub down_payment: f64,
    pub term_years: u32,
    pub annual_rate_percent: f64,
    pub start_date: NaiveDate,
    pub property_tax_annual: f64,
    pub home_insurance_annual: f64,
    pub pmi_rate_percent: f64,
    pub hoa_monthly: f64,
    pub extra_monthly_payment: f64,
}

impl Default for LoanInput {
    fn default() -> Self {
        Self {
            home_price: 0.,
            down_payment: 0.,
            term_years: DEFAULT_TERM_YEARS,
            annual_rate_percent: DEFAULT_ANNUAL_RATE,
            start_date: Local::now().date_naive(),
            property_tax_annual: 0.,
            home_insurance_annual: 0.,
            pmi_rate_percent: 0.,
            hoa_monthly: 0.,
            extra_monthly_payment: 0.,
        }
    }
}

/// `value`, or `default` when it is NaN or infinite.
pub(crate) fn finite_or(value: f64, default: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        default
    }
}

/// `term_years`, or the default 30 when it is zero.
pub(crate) fn term_or_default(term_years: u32) -> u32 {
    if term_years == 0 {
        DEFAULT_TERM_YEARS
    } else {
        term_years
    }
}

impl LoanInput {
    pub fn new(
        home_price: f64,
        down_payment: f64,
        term_years: u32,
        annual_rate_percent: f64,
    ) -> Self {
        Self {
            home_price,
            down_payment,
            term_years,
            annual_rate_percent,
            ..Self::default()
        }
    }

    pub fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = start_date;
        self
    }

    pub fn with_escrow(mut self, property_tax_annual: f64, home_insurance_annual: f64) -> Self {
        self.property_tax_annual = property_tax_annual;
        self.home_insurance_annual = home_insurance_annual;
        self
    }

    pub fn with_pmi_rate(mut self, pmi_rate_percent: f64) -> Self {
        self.pmi_rate_percent = pmi_rate_percent;
        self
    }

    pub fn with_hoa(mut self, hoa_monthly: f64) -> Self {
        self.hoa_monthly = hoa_monthly;
        self
    }

    pub fn with_extra_payment(mut self, extra_monthly_payment: f64) -> Self {
        self.extra_monthly_payment = extra_monthly_payment;
        self
    }

    /// Replace unusable values with their defaults: non-finite amounts become
    /// 0, a non-finite rate becomes 3.5 and a zero term becomes 30 years.
    pub fn normalized(&self) -> Self {
        Self {
            home_price: finite_or(self.home_price, 0.),
            down_payment: finite_or(self.down_payment, 0.),
            term_years: term_or_default(self.term_years),
            annual_rate_percent: finite_or(self.annual_rate_percent, DEFAULT_ANNUAL_RATE),
            start_date: self.start_date,
            property_tax_annual: finite_or(self.property_tax_annual, 0.),
            home_insurance_annual: finite_or(self.home_insurance_annual, 0.),
            pmi_rate_percent: finite_or(self.pmi_rate_percent, 0.),
            hoa_monthly: finite_or(self.hoa_monthly, 0.),
            extra_monthly_payment: finite_or(self.extra_monthly_payment, 0.),
        }
    }

    pub fn loan_amount(&self) -> f64 {
        self.home_price - self.down_payment
    }

    /// Down payment as a fraction of the home price; 0 when the price is 0.
    pub fn down_payment_ratio(&self) -> f64 {
        if self.home_price == 0. {
            0.
        } else {
            self.down_payment / self.home_price
        }
    }

    pub fn pmi_required(&self) -> bool {
        self.pmi_rate_percent > 0. && self.down_payment_ratio() < PMI_DOWN_PAYMENT_THRESHOLD
    }

    pub fn number_of_payments(&self) -> u32 {
        self.term_years.saturating_mul(PMTS_PER_YEAR)
    }
}

/// Derived figures for one [`LoanInput`].
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LoanSummary {
    pub loan_amount: f64,
    pub monthly_rate: f64,
    pub number_of_payments: u32,
    pub term_years: u32,
    pub monthly_principal_interest: f64,
    pub monthly_tax: f64,
    pub monthly_insurance: f64,
    pub monthly_pmi: f64,
    pub monthly_hoa: f64,
    pub extra_monthly_payment: f64,
    pub total_monthly_payment: f64,
    pub total_interest: f64,
    pub total_cost: f64,
    pub start_date: NaiveDate,
    pub payoff_date: NaiveDate,
}

impl LoanSummary {
    /// Lifetime interest spread evenly over every payment.
    pub fn average_monthly_interest(&self) -> f64 {
        if self.number_of_payments == 0 {
            0.
        } else {
            self.total_interest / self.number_of_payments as f64
        }
    }
}

/// Compute the payment breakdown and lifetime totals.
///
/// Never fails: the input is [normalized](LoanInput::normalized) first, and
/// the zero-rate and zero-price cases are special-cased so no NaN escapes.
/// The extra monthly payment is part of the monthly bill but does not reduce
/// the totals; it is not applied to principal.
pub fn compute_summary(input: &LoanInput) -> LoanSummary {
    let input = input.normalized();

    let loan_amount = input.loan_amount();
    let monthly_rate = monthly_rate(input.annual_rate_percent);
    let number_of_payments = input.number_of_payments();
    let pmts = number_of_payments as f64;
    let years = input.term_years as f64;

    let monthly_principal_interest = annuity_payment(loan_amount, monthly_rate, number_of_payments);
    let monthly_tax = input.property_tax_annual / 12.;
    let monthly_insurance = input.home_insurance_annual / 12.;
    let monthly_pmi = if input.pmi_required() {
        loan_amount * (input.pmi_rate_percent / 100.) / 12.
    } else {
        0.
    };

    let total_monthly_payment = monthly_principal_interest
        + monthly_tax
        + monthly_insurance
        + monthly_pmi
        + input.hoa_monthly
        + input.extra_monthly_payment;

    let total_interest = monthly_principal_interest * pmts - loan_amount;
    let total_cost = loan_amount
        + total_interest
        + input.property_tax_annual * years
        + input.home_insurance_annual * years
        + monthly_pmi * pmts
        + input.hoa_monthly * pmts;

    let payoff_date = add_months(input.start_date, number_of_payments);

    debug!(
        "loan {} at {}% over {} pmts: P&I {}, PMI {}, monthly {}, interest {}, payoff {}",
        loan_amount,
        input.annual_rate_percent,
        number_of_payments,
        monthly_principal_interest,
        monthly_pmi,
        total_monthly_payment,
        total_interest,
        payoff_date
    );

    LoanSummary {
        loan_amount,
        monthly_rate,
        number_of_payments,
        term_years: input.term_years,
        monthly_principal_interest,
        monthly_tax,
        monthly_insurance,
        monthly_pmi,
        monthly_hoa: input.hoa_monthly,
        extra_monthly_payment: input.extra_monthly_payment,
        total_monthly_payment,
        total_interest,
        total_cost,
        start_date: input.start_date,
        payoff_date,
    }
}
