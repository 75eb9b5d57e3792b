//! Turning raw form fields into a [`LoanInput`].
//!
//! Parsing is lenient: a field is read up to the first character that can't
//! continue a number, so `"250000 USD"` is 250000. Anything unusable falls
//! back to a default instead of producing an error.

use chrono::{Local, NaiveDate};
use log::warn;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::mortgage::{LoanInput, DEFAULT_ANNUAL_RATE, DEFAULT_TERM_YEARS};

/// Length of the run of ASCII digits at the start of `bytes`.
fn digit_run(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Longest prefix of `s` shaped like a decimal number: optional sign, digits
/// with an optional fraction, then an optional exponent. Empty when `s` does
/// not start with a number.
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = usize::from(bytes.first().is_some_and(|b| matches!(b, b'+' | b'-')));

    let whole = digit_run(&bytes[end..]);
    end += whole;
    let mut digits = whole;
    if bytes.get(end) == Some(&b'.') {
        let frac = digit_run(&bytes[end + 1..]);
        if whole + frac > 0 {
            end += 1 + frac;
            digits += frac;
        }
    }
    if digits == 0 {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = digit_run(&bytes[exp..]);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }
    &s[..end]
}

/// Leading number of `raw` (after trimming), if it is finite.
fn leading_number(raw: &str) -> Option<f64> {
    let prefix = numeric_prefix(raw.trim());
    if prefix.is_empty() {
        return None;
    }
    prefix.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Leading signed integer of `raw`, ignoring any fractional part.
fn leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let sign_len = usize::from(trimmed.starts_with(['+', '-']));
    let digits = trimmed[sign_len..]
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }
    trimmed[..sign_len + digits].parse().ok()
}

/// Parse a currency amount or percentage, or fall back to `default`.
pub fn parse_amount(raw: Option<&str>, default: f64) -> f64 {
    match raw {
        None => default,
        Some(raw) => leading_number(raw).unwrap_or_else(|| {
            if !raw.trim().is_empty() {
                warn!("could not read {:?} as a number, using {}", raw, default);
            }
            default
        }),
    }
}

/// Parse a loan term in whole years. Zero, negative or unreadable terms are 30.
pub fn parse_term(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return DEFAULT_TERM_YEARS;
    };
    match leading_integer(raw).and_then(|years| u32::try_from(years).ok()) {
        Some(years) if years > 0 => years,
        _ => {
            if !raw.trim().is_empty() {
                warn!("invalid term {:?}, using {} years", raw, DEFAULT_TERM_YEARS);
            }
            DEFAULT_TERM_YEARS
        }
    }
}

/// Parse a `YYYY-MM-DD` start date, or use `today`.
pub fn parse_date(raw: Option<&str>, today: NaiveDate) -> NaiveDate {
    let Some(raw) = raw else {
        return today;
    };
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").unwrap_or_else(|e| {
        if !raw.trim().is_empty() {
            warn!("invalid start date {:?} ({}), using {}", raw, e, today);
        }
        today
    })
}

/// Loan fields exactly as the user typed them.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawLoanInput {
    pub home_price: Option<String>,
    pub down_payment: Option<String>,
    pub term_years: Option<String>,
    pub annual_rate_percent: Option<String>,
    pub start_date: Option<String>,
    pub property_tax_annual: Option<String>,
    pub home_insurance_annual: Option<String>,
    pub pmi_rate_percent: Option<String>,
    pub hoa_monthly: Option<String>,
    pub extra_monthly_payment: Option<String>,
}

impl RawLoanInput {
    pub fn to_loan_input(&self) -> LoanInput {
        self.to_loan_input_on(Local::now().date_naive())
    }

    /// As [`to_loan_input`](Self::to_loan_input), with a fixed "today".
    pub fn to_loan_input_on(&self, today: NaiveDate) -> LoanInput {
        let amount = |field: &Option<String>| parse_amount(field.as_deref(), 0.);
        LoanInput {
            home_price: amount(&self.home_price),
            down_payment: amount(&self.down_payment),
            term_years: parse_term(self.term_years.as_deref()),
            annual_rate_percent: parse_amount(
                self.annual_rate_percent.as_deref(),
                DEFAULT_ANNUAL_RATE,
            ),
            start_date: parse_date(self.start_date.as_deref(), today),
            property_tax_annual: amount(&self.property_tax_annual),
            home_insurance_annual: amount(&self.home_insurance_annual),
            pmi_rate_percent: amount(&self.pmi_rate_percent),
            hoa_monthly: amount(&self.hoa_monthly),
            extra_monthly_payment: amount(&self.extra_monthly_payment),
        }
    }
}
