//! Run forecasts for an entire portfolio CSV
//!
//! Outputs per-year aggregated cash flows and equity across all properties.
//! Supports JSON output for API integration via --json flag.

use std::env;
use std::fs::File;
use std::io::Write;
use std::time::Instant;

use anyhow::Context;
use rayon::prelude::*;
use serde::Serialize;

use property_forecast::property::{load_properties, PropertyRecord};
use property_forecast::{ForecastConfig, ScenarioOutcome, ScenarioRunner};

/// Aggregated yearly results across all properties
#[derive(Debug, Clone, Default, Serialize)]
struct AggregatedYear {
    year: u32,
    total_effective_income: f64,
    total_operating_expenses: f64,
    total_mortgage_interest: f64,
    total_mortgage_principal: f64,
    total_net_cash_flow: f64,
    total_property_value: f64,
    total_mortgage_balance: f64,
    total_equity: f64,
}

#[derive(Serialize)]
struct PortfolioResponse {
    property_count: usize,
    horizon_years: u32,
    total_invested: f64,
    total_average_annual_cash_flow: f64,
    total_profit_at_exit: f64,
    yearly: Vec<AggregatedYear>,
    properties: Vec<PropertyResponse>,
    execution_time_ms: u64,
}

#[derive(Serialize)]
struct PropertyResponse {
    property_id: u32,
    name: String,
    irr_percent: f64,
    irr_converged: bool,
    average_annual_cash_flow: f64,
    total_profit_at_exit: f64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let json_output = env::args().any(|arg| arg == "--json");
    let csv_path = env::var("PORTFOLIO_CSV").unwrap_or_else(|_| "portfolio.csv".to_string());
    let horizon_years: u32 = env::var("HORIZON_YEARS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);

    let start = Instant::now();
    if !json_output {
        println!("Loading properties from {}...", csv_path);
    }

    let records = load_properties(&csv_path)
        .with_context(|| format!("failed to load portfolio from {}", csv_path))?;
    if !json_output {
        println!("Loaded {} properties in {:?}", records.len(), start.elapsed());
    }

    let config = ForecastConfig { horizon_years };
    let runner = ScenarioRunner::new();

    let proj_start = Instant::now();

    // Run forecasts in parallel
    let outcomes: Vec<(usize, ScenarioOutcome)> = records
        .par_iter()
        .enumerate()
        .map(|(idx, record)| {
            let outcome = runner
                .run(&record.snapshot, record.mortgage.as_ref(), config)
                .with_context(|| format!("forecast failed for property {}", record.property_id))?;
            Ok((idx, outcome))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    if !json_output {
        println!("Forecasts complete in {:?}", proj_start.elapsed());
    }

    // Aggregate results by year
    let mut aggregated: Vec<AggregatedYear> = (1..=horizon_years)
        .map(|year| AggregatedYear {
            year,
            ..Default::default()
        })
        .collect();

    for (_, outcome) in &outcomes {
        for row in &outcome.forecast.rows {
            let agg = &mut aggregated[(row.year - 1) as usize];
            agg.total_effective_income += row.effective_income;
            agg.total_operating_expenses += row.operating_expenses;
            agg.total_mortgage_interest += row.mortgage_interest;
            agg.total_mortgage_principal += row.mortgage_principal;
            agg.total_net_cash_flow += row.net_cash_flow;
            agg.total_property_value += row.property_value;
            agg.total_mortgage_balance += row.mortgage_balance;
            agg.total_equity += row.equity;
        }
    }

    let total_invested: f64 = records.iter().map(|r| r.snapshot.cash_invested).sum();
    let total_average_annual_cash_flow: f64 = outcomes
        .iter()
        .map(|(_, o)| o.metrics.average_annual_cash_flow)
        .sum();
    let total_profit_at_exit: f64 = outcomes
        .iter()
        .map(|(_, o)| o.metrics.total_profit_at_exit)
        .sum();

    if json_output {
        let response = PortfolioResponse {
            property_count: records.len(),
            horizon_years,
            total_invested,
            total_average_annual_cash_flow,
            total_profit_at_exit,
            yearly: aggregated,
            properties: outcomes
                .iter()
                .map(|(idx, outcome)| property_response(&records[*idx], outcome))
                .collect(),
            execution_time_ms: start.elapsed().as_millis() as u64,
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    // Write output
    let output_path = "portfolio_forecast_output.csv";
    let mut file = File::create(output_path).context("failed to create output file")?;

    writeln!(
        file,
        "Year,EffectiveIncome,OperatingExpenses,MortgageInterest,MortgagePrincipal,NetCashFlow,PropertyValue,MortgageBalance,Equity"
    )?;
    for row in &aggregated {
        writeln!(
            file,
            "{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
            row.year,
            row.total_effective_income,
            row.total_operating_expenses,
            row.total_mortgage_interest,
            row.total_mortgage_principal,
            row.total_net_cash_flow,
            row.total_property_value,
            row.total_mortgage_balance,
            row.total_equity,
        )?;
    }

    println!("Output written to {}", output_path);

    // Print summary stats
    println!("\nPortfolio Summary:");
    println!("  Properties: {}", records.len());
    println!("  Total invested: ${:.2}", total_invested);
    println!(
        "  Average annual cash flow: ${:.2}",
        total_average_annual_cash_flow
    );
    println!("  Total profit at exit: ${:.2}", total_profit_at_exit);

    if let (Some(first), Some(last)) = (aggregated.first(), aggregated.last()) {
        println!(
            "  Year 1:  NetCF=${:.0}, Equity=${:.0}, Balance=${:.0}",
            first.total_net_cash_flow, first.total_equity, first.total_mortgage_balance
        );
        println!(
            "  Year {}: NetCF=${:.0}, Equity=${:.0}, Balance=${:.0}",
            last.year, last.total_net_cash_flow, last.total_equity, last.total_mortgage_balance
        );
    }

    for (idx, outcome) in &outcomes {
        let record = &records[*idx];
        println!(
            "  [{}] {}: IRR {:.2}%{} avg CF ${:.2}",
            record.property_id,
            record.name,
            outcome.metrics.irr_percent,
            if outcome.metrics.irr_converged { "" } else { " (not converged)" },
            outcome.metrics.average_annual_cash_flow,
        );
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}

fn property_response(record: &PropertyRecord, outcome: &ScenarioOutcome) -> PropertyResponse {
    PropertyResponse {
        property_id: record.property_id,
        name: record.name.clone(),
        irr_percent: outcome.metrics.irr_percent,
        irr_converged: outcome.metrics.irr_converged,
        average_annual_cash_flow: outcome.metrics.average_annual_cash_flow,
        total_profit_at_exit: outcome.metrics.total_profit_at_exit,
    }
}
