use clap::Parser;
use log::{debug, LevelFilter};
use mortgage_calc::report::render_report;
use mortgage_calc::*;
use simple_logger::SimpleLogger;

/// Fixed-rate mortgage payment, amortization and term comparison
///
/// Values are read leniently: anything that doesn't parse falls back to its
/// default (0, a 30 year term, a 3.5% rate, today's date).
#[derive(Parser, Debug)]
#[command(name = "mortgage", version)]
struct Cli {
    /// Purchase price of the home
    #[arg(long)]
    home_price: Option<String>,

    /// Cash paid up front
    #[arg(long)]
    down_payment: Option<String>,

    /// Loan term in years
    #[arg(long)]
    term: Option<String>,

    /// Annual interest rate in percent
    #[arg(long)]
    rate: Option<String>,

    /// First payment period starts here (YYYY-MM-DD)
    #[arg(long)]
    start_date: Option<String>,

    /// Annual property tax
    #[arg(long)]
    property_tax: Option<String>,

    /// Annual homeowner's insurance
    #[arg(long)]
    insurance: Option<String>,

    /// Annual PMI rate in percent of the loan amount
    #[arg(long)]
    pmi: Option<String>,

    /// Monthly HOA dues
    #[arg(long)]
    hoa: Option<String>,

    /// Extra amount added to each monthly payment
    #[arg(long)]
    extra: Option<String>,

    /// Show every year of the schedule instead of the first five
    #[arg(long)]
    full_schedule: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn raw_input(&self) -> RawLoanInput {
        RawLoanInput {
            home_price: self.home_price.clone(),
            down_payment: self.down_payment.clone(),
            term_years: self.term.clone(),
            annual_rate_percent: self.rate.clone(),
            start_date: self.start_date.clone(),
            property_tax_annual: self.property_tax.clone(),
            home_insurance_annual: self.insurance.clone(),
            pmi_rate_percent: self.pmi.clone(),
            hoa_monthly: self.hoa.clone(),
            extra_monthly_payment: self.extra.clone(),
        }
    }

    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    SimpleLogger::new().with_level(cli.log_level()).init()?;

    let input = cli.raw_input().to_loan_input();
    debug!("{:?}", input);

    let summary = compute_summary(&input);
    let mode = if cli.full_schedule {
        ScheduleMode::Full
    } else {
        ScheduleMode::Display
    };
    let schedule = schedule_for(&summary, mode);
    let comparison = compute_comparison(
        input.home_price,
        input.down_payment,
        input.term_years,
        input.annual_rate_percent,
    );

    print!("{}", render_report(&summary, &schedule, &comparison));
    Ok(())
}

// verifies that types can implement the gated traits below
#[cfg(test)]
fn is_normal<T: Sized + Send + Sync + Unpin>() {}

#[test]
fn normal_types() {
    is_normal::<LoanPayment>();
    is_normal::<LoanInput>();
    is_normal::<LoanSummary>();
    is_normal::<AmortizationSchedule>();
    is_normal::<AmortizationYearRow>();
    is_normal::<ComparisonScenario>();
    is_normal::<ComparisonPolicy>();
}

#[test]
fn cli_parses_raw_values() {
    let cli = Cli::parse_from(["mortgage", "--home-price", "300000", "--rate", "abc", "-vv"]);
    let input = cli.raw_input().to_loan_input();
    assert_eq!(input.home_price, 300000.);
    assert_eq!(input.annual_rate_percent, 3.5);
    assert_eq!(cli.log_level(), LevelFilter::Trace);
}
