//! Property Forecast CLI
//!
//! Command-line interface for amortizing a mortgage and forecasting a
//! rental property's returns

use std::fs::File;
use std::io::Write;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;

use property_forecast::{
    compare_scenarios,
    mortgage::{AmortizationSchedule, ScheduleSpan},
    scenario::DEFAULT_COMPARISON_THRESHOLD,
    ExitAssumptions, ForecastAssumptions, ForecastConfig, MortgageTerms, PaymentFrequency,
    PropertySnapshot, RateType, ScenarioRunner,
};

#[derive(Parser, Debug)]
#[command(name = "property_forecast", version, about = "Mortgage amortization and investment forecasting")]
struct Args {
    /// Loan principal
    #[arg(long, default_value_t = 492_000.0)]
    principal: f64,

    /// Nominal annual rate as a decimal fraction
    #[arg(long, default_value_t = 0.0269)]
    rate: f64,

    /// Rate type: Fixed or Variable
    #[arg(long, default_value = "Fixed")]
    rate_type: String,

    /// Amortization length in months
    #[arg(long, default_value_t = 300)]
    amortization: u32,

    /// Term length in months
    #[arg(long, default_value_t = 60)]
    term: u32,

    /// Payment frequency (Monthly, SemiMonthly, BiWeekly,
    /// AcceleratedBiWeekly, Weekly, AcceleratedWeekly)
    #[arg(long, default_value = "BiWeekly")]
    frequency: String,

    /// Mortgage start date (YYYY-MM-DD)
    #[arg(long, default_value = "2019-02-04")]
    start_date: NaiveDate,

    /// Current annualized gross rent
    #[arg(long, default_value_t = 30_000.0)]
    annual_rent: f64,

    /// Current annual operating expenses
    #[arg(long, default_value_t = 11_500.0)]
    operating_expenses: f64,

    /// Current market value
    #[arg(long, default_value_t = 650_000.0)]
    market_value: f64,

    /// Total cash invested
    #[arg(long, default_value_t = 130_000.0)]
    cash_invested: f64,

    /// Forecast horizon in years
    #[arg(long, default_value_t = 10)]
    horizon: u32,

    /// Annual rent growth for the adjusted scenario comparison
    #[arg(long)]
    adjusted_rent_growth: Option<f64>,

    /// Write the full schedule to this CSV path
    #[arg(long, default_value = "schedule_output.csv")]
    schedule_csv: String,
}

fn parse_frequency(value: &str) -> anyhow::Result<PaymentFrequency> {
    Ok(match value {
        "Monthly" => PaymentFrequency::Monthly,
        "SemiMonthly" => PaymentFrequency::SemiMonthly,
        "BiWeekly" => PaymentFrequency::BiWeekly,
        "AcceleratedBiWeekly" => PaymentFrequency::AcceleratedBiWeekly,
        "Weekly" => PaymentFrequency::Weekly,
        "AcceleratedWeekly" => PaymentFrequency::AcceleratedWeekly,
        other => anyhow::bail!("unknown payment frequency: {}", other),
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    println!("Property Forecast v0.1.0");
    println!("========================\n");

    let rate_type = match args.rate_type.as_str() {
        "Fixed" => RateType::Fixed,
        "Variable" => RateType::Variable,
        other => anyhow::bail!("unknown rate type: {}", other),
    };
    let frequency = parse_frequency(&args.frequency)?;

    let terms = MortgageTerms {
        principal: args.principal,
        nominal_annual_rate: args.rate,
        rate_type,
        variable_spread: None,
        amortization_months: args.amortization,
        term_months: args.term,
        payment_frequency: frequency,
        start_date: args.start_date,
    };

    println!("Mortgage:");
    println!("  Principal: ${:.2}", terms.principal);
    println!("  Rate: {:.4}% ({:?})", terms.nominal_annual_rate * 100.0, terms.rate_type);
    println!("  Amortization: {} months, term {} months", terms.amortization_months, terms.term_months);
    println!("  Frequency: {}", terms.payment_frequency.as_str());
    println!("  Start: {}", terms.start_date);
    println!();

    // Full amortization schedule
    let schedule = AmortizationSchedule::generate(&terms, ScheduleSpan::FullAmortization)
        .context("schedule generation failed")?;

    println!(
        "Schedule: {} payments of ${:.2} (periodic rate {:.6}%)",
        schedule.periods.len(),
        schedule.payment_amount,
        schedule.periodic_rate * 100.0
    );
    println!(
        "{:>5} {:>12} {:>12} {:>12} {:>12} {:>14}",
        "#", "Date", "Interest", "Principal", "Payment", "Balance"
    );
    println!("{}", "-".repeat(72));

    for row in schedule.periods.iter().take(12) {
        println!(
            "{:>5} {:>12} {:>12.2} {:>12.2} {:>12.2} {:>14.2}",
            row.sequence,
            row.payment_date,
            row.interest_portion,
            row.principal_portion,
            row.total_payment,
            row.remaining_balance,
        );
    }
    if schedule.periods.len() > 12 {
        println!("... ({} more payments)", schedule.periods.len() - 12);
    }

    if let Some(renewal) = schedule.renewal {
        println!(
            "\nRenewal point: ${:.2} outstanding on {} after {} payments",
            renewal.balance, renewal.date, renewal.periods_elapsed
        );
    }

    // Write full schedule to CSV
    let mut file = File::create(&args.schedule_csv)
        .with_context(|| format!("unable to create {}", args.schedule_csv))?;
    writeln!(file, "Sequence,Date,Interest,Principal,Payment,Balance")?;
    for row in &schedule.periods {
        writeln!(
            file,
            "{},{},{:.2},{:.2},{:.2},{:.2}",
            row.sequence,
            row.payment_date,
            row.interest_portion,
            row.principal_portion,
            row.total_payment,
            row.remaining_balance,
        )?;
    }
    println!("\nFull schedule written to: {}", args.schedule_csv);

    // Forecast
    let snapshot = PropertySnapshot::new(
        args.annual_rent,
        args.operating_expenses,
        args.market_value,
        args.cash_invested,
    );
    let config = ForecastConfig {
        horizon_years: args.horizon,
    };
    let runner = ScenarioRunner::new();
    let outcome = runner
        .run(&snapshot, Some(&terms), config)
        .context("forecast failed")?;

    println!("\nForecast ({} years):", args.horizon);
    println!(
        "{:>4} {:>12} {:>12} {:>12} {:>12} {:>12} {:>14} {:>14}",
        "Year", "EffIncome", "Expenses", "DebtSvc", "NetCF", "Balance", "Value", "Equity"
    );
    println!("{}", "-".repeat(100));
    for row in &outcome.forecast.rows {
        println!(
            "{:>4} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>14.2} {:>14.2}",
            row.year,
            row.effective_income,
            row.operating_expenses,
            row.debt_service,
            row.net_cash_flow,
            row.mortgage_balance,
            row.property_value,
            row.equity,
        );
    }

    let metrics = &outcome.metrics;
    println!("\nReturns:");
    println!("  IRR: {:.2}%{}", metrics.irr_percent, convergence_note(metrics.irr_converged, metrics.irr_out_of_range));
    println!("  Average annual cash flow: ${:.2}", metrics.average_annual_cash_flow);
    println!("  Sale proceeds at exit: ${:.2}", metrics.exit_sale_proceeds);
    println!("  Total profit at exit: ${:.2}", metrics.total_profit_at_exit);

    // Optional scenario comparison
    if let Some(growth) = args.adjusted_rent_growth {
        let mut adjusted_assumptions = ForecastAssumptions::default_baseline();
        adjusted_assumptions.annual_rent_growth = growth;
        let adjusted =
            ScenarioRunner::with_assumptions(adjusted_assumptions, ExitAssumptions::default_baseline())
                .run(&snapshot, Some(&terms), config)
                .context("adjusted scenario failed")?;

        let report = compare_scenarios(&outcome, &adjusted, DEFAULT_COMPARISON_THRESHOLD);
        println!("\nScenario comparison (rent growth {:.2}%):", growth * 100.0);
        println!(
            "{:<26} {:>14} {:>14} {:>12} {:>12}",
            "Metric", "Baseline", "Adjusted", "Change", "Direction"
        );
        println!("{}", "-".repeat(82));
        for delta in &report.deltas {
            println!(
                "{:<26} {:>14.2} {:>14.2} {:>12.2} {:>12}",
                delta.metric,
                delta.baseline,
                delta.adjusted,
                delta.absolute_change,
                delta.direction.as_str(),
            );
        }
    }

    Ok(())
}

fn convergence_note(converged: bool, out_of_range: bool) -> &'static str {
    match (converged, out_of_range) {
        (false, _) => " (did not converge)",
        (true, true) => " (outside normal range)",
        (true, false) => "",
    }
}
