//! Side-by-side 15/20/30-year scenarios for the same loan amount.

use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::loan::{annuity_payment, monthly_rate, PMTS_PER_YEAR};
use crate::mortgage::{finite_or, term_or_default, DEFAULT_ANNUAL_RATE};

/// Term whose total interest every other scenario is measured against.
pub const BASELINE_TERM_YEARS: u32 = 30;

/// One term offered in the comparison, with the rate offset (percentage
/// points) applied when it is not the borrower's current term.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScenarioTerm {
    pub term_years: u32,
    pub rate_adjustment: f64,
}

/// Which terms to compare and how their rates relate to the quoted rate.
///
/// The default (15y −0.75, 20y −0.5, 30y ±0) is a product heuristic for
/// shorter terms pricing lower, not market data.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComparisonPolicy {
    pub terms: Vec<ScenarioTerm>,
    pub baseline_term_years: u32,
}

impl Default for ComparisonPolicy {
    fn default() -> Self {
        Self {
            terms: vec![
                ScenarioTerm {
                    term_years: 15,
                    rate_adjustment: -0.75,
                },
                ScenarioTerm {
                    term_years: 20,
                    rate_adjustment: -0.5,
                },
                ScenarioTerm {
                    term_years: BASELINE_TERM_YEARS,
                    rate_adjustment: 0.,
                },
            ],
            baseline_term_years: BASELINE_TERM_YEARS,
        }
    }
}

impl ComparisonPolicy {
    /// Rate used for `term` given the borrower's current term and rate.
    pub fn rate_for(&self, term: &ScenarioTerm, current_term: u32, current_rate: f64) -> f64 {
        if term.term_years == current_term {
            current_rate
        } else {
            current_rate + term.rate_adjustment
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComparisonScenario {
    pub term_years: u32,
    /// Annual rate in percent.
    pub applied_rate: f64,
    pub monthly_payment: f64,
    pub total_interest: f64,
    /// Interest saved relative to the 30-year scenario; `None` on that row.
    pub savings_vs_thirty_year: Option<f64>,
}

fn price_scenario(loan_amount: f64, term_years: u32, rate: f64) -> (f64, f64) {
    let pmt_count = term_years.saturating_mul(PMTS_PER_YEAR);
    let monthly_payment = annuity_payment(loan_amount, monthly_rate(rate), pmt_count);
    let total_interest = monthly_payment * pmt_count as f64 - loan_amount;
    (monthly_payment, total_interest)
}

/// Compare the default 15, 20 and 30-year scenarios.
pub fn compute_comparison(
    home_price: f64,
    down_payment: f64,
    current_term: u32,
    current_rate: f64,
) -> Vec<ComparisonScenario> {
    compute_comparison_with(
        &ComparisonPolicy::default(),
        home_price,
        down_payment,
        current_term,
        current_rate,
    )
}

/// Compare the scenarios in `policy`.
///
/// The baseline row is priced at its own scenario rate even when it is absent
/// from `policy.terms`, so savings are always defined for the other rows.
/// Arguments are defaulted like [`LoanInput::normalized`](crate::LoanInput::normalized).
pub fn compute_comparison_with(
    policy: &ComparisonPolicy,
    home_price: f64,
    down_payment: f64,
    current_term: u32,
    current_rate: f64,
) -> Vec<ComparisonScenario> {
    let loan_amount = finite_or(home_price, 0.) - finite_or(down_payment, 0.);
    let current_term = term_or_default(current_term);
    let current_rate = finite_or(current_rate, DEFAULT_ANNUAL_RATE);

    let baseline = policy
        .terms
        .iter()
        .find(|term| term.term_years == policy.baseline_term_years)
        .copied()
        .unwrap_or(ScenarioTerm {
            term_years: policy.baseline_term_years,
            rate_adjustment: 0.,
        });
    let baseline_rate = policy.rate_for(&baseline, current_term, current_rate);
    let (_, baseline_interest) = price_scenario(loan_amount, baseline.term_years, baseline_rate);

    policy
        .terms
        .iter()
        .map(|term| {
            let applied_rate = policy.rate_for(term, current_term, current_rate);
            let (monthly_payment, total_interest) =
                price_scenario(loan_amount, term.term_years, applied_rate);
            let savings_vs_thirty_year = if term.term_years == policy.baseline_term_years {
                None
            } else {
                Some(baseline_interest - total_interest)
            };
            debug!(
                "{}-year at {}%: pmt {}, interest {}, savings {:?}",
                term.term_years,
                applied_rate,
                monthly_payment,
                total_interest,
                savings_vs_thirty_year
            );
            ComparisonScenario {
                term_years: term.term_years,
                applied_rate,
                monthly_payment,
                total_interest,
                savings_vs_thirty_year,
            }
        })
        .collect()
}
