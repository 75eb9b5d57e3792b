//! Fixed-rate mortgage calculator: payment breakdown, amortization schedule
//! and term comparison.
//!
//! Every calculation is a pure function of its arguments. Parsing raw form
//! input lives in [`input`] and text rendering in [`report`], so the
//! arithmetic can be used without either.

pub mod comparison;
pub mod input;
pub mod loan;
pub mod mortgage;
pub mod report;
pub mod schedule;

pub use comparison::{
    compute_comparison, compute_comparison_with, ComparisonPolicy, ComparisonScenario,
    ScenarioTerm,
};
pub use input::RawLoanInput;
pub use loan::LoanPayment;
pub use mortgage::{compute_summary, LoanInput, LoanSummary};
pub use schedule::{
    generate_amortization_schedule, schedule_for, AmortizationSchedule, AmortizationYearRow,
    ScheduleMode,
};
