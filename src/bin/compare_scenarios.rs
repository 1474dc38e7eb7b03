//! Compare baseline and adjusted forecast scenarios for one property
//!
//! Usage: cargo run --bin compare_scenarios
//! Adjusted assumptions come from environment variables:
//!   ADJ_RENT_GROWTH, ADJ_EXPENSE_INFLATION, ADJ_APPRECIATION,
//!   ADJ_VACANCY_RATE, ADJ_RENEWAL_RATE

use std::env;

use chrono::NaiveDate;

use property_forecast::scenario::DEFAULT_COMPARISON_THRESHOLD;
use property_forecast::{
    compare_scenarios, ExitAssumptions, ForecastAssumptions, ForecastConfig, MortgageTerms,
    PaymentFrequency, PropertySnapshot, ScenarioRunner,
};

fn env_override(name: &str, default: f64) -> f64 {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Demo property: the worked renewal example
    let snapshot = PropertySnapshot::new(30_000.0, 11_500.0, 650_000.0, 130_000.0);
    let mortgage = MortgageTerms::fixed(
        492_000.0,
        0.0269,
        300,
        60,
        PaymentFrequency::BiWeekly,
        NaiveDate::from_ymd_opt(2019, 2, 4).expect("valid date"),
    );
    let config = ForecastConfig::default();

    let baseline_assumptions = ForecastAssumptions::default_baseline();
    let adjusted_assumptions = ForecastAssumptions {
        annual_rent_growth: env_override("ADJ_RENT_GROWTH", 0.035),
        annual_expense_inflation: env_override(
            "ADJ_EXPENSE_INFLATION",
            baseline_assumptions.annual_expense_inflation,
        ),
        annual_appreciation: env_override(
            "ADJ_APPRECIATION",
            baseline_assumptions.annual_appreciation,
        ),
        vacancy_rate: env_override("ADJ_VACANCY_RATE", baseline_assumptions.vacancy_rate),
        renewal_interest_rate: env_override(
            "ADJ_RENEWAL_RATE",
            baseline_assumptions.renewal_interest_rate,
        ),
    };

    println!("{}", "=".repeat(60));
    println!("Scenario comparison");
    println!("{}", "=".repeat(60));
    println!(
        "  Baseline: rent growth {:.2}%, renewal rate {:.2}%",
        baseline_assumptions.annual_rent_growth * 100.0,
        baseline_assumptions.renewal_interest_rate * 100.0
    );
    println!(
        "  Adjusted: rent growth {:.2}%, renewal rate {:.2}%",
        adjusted_assumptions.annual_rent_growth * 100.0,
        adjusted_assumptions.renewal_interest_rate * 100.0
    );

    let baseline = ScenarioRunner::new().run(&snapshot, Some(&mortgage), config)?;
    let adjusted =
        ScenarioRunner::with_assumptions(adjusted_assumptions, ExitAssumptions::default_baseline())
            .run(&snapshot, Some(&mortgage), config)?;

    let report = compare_scenarios(&baseline, &adjusted, DEFAULT_COMPARISON_THRESHOLD);

    println!(
        "\n{:<26} {:>14} {:>14} {:>12} {:>10} {:>12}",
        "Metric", "Baseline", "Adjusted", "Change", "Pct", "Direction"
    );
    println!("{:-<93}", "");

    for delta in &report.deltas {
        let pct = delta
            .percent_change
            .map(|p| format!("{:+.2}%", p))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "{:<26} {:>14.2} {:>14.2} {:>+12.2} {:>10} {:>12}",
            delta.metric,
            delta.baseline,
            delta.adjusted,
            delta.absolute_change,
            pct,
            delta.direction.as_str(),
        );
    }

    if report.is_unchanged() {
        println!("\nNo metric moved past the {:.3}% threshold.", report.threshold * 100.0);
    }

    Ok(())
}
