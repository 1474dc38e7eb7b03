//! Investment return metrics derived from a forecast
//!
//! Assembles the cash-flow vector (initial outlay, yearly net cash flows,
//! terminal sale proceeds) and solves for IRR.

use serde::{Deserialize, Serialize};

use crate::assumptions::ExitAssumptions;
use crate::error::ForecastError;
use crate::property::PropertySnapshot;

use super::irr::solve_irr;
use super::projections::ForecastResult;

/// Derived, read-only outputs of one forecast run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnMetrics {
    /// Internal rate of return on invested cash, as a percentage
    pub irr_percent: f64,

    /// False when the solver hit its iteration cap or no root exists
    pub irr_converged: bool,

    /// True when the solved rate fell outside the normal 0..100% range
    pub irr_out_of_range: bool,

    /// Mean yearly net cash flow over the horizon
    pub average_annual_cash_flow: f64,

    /// Cumulative cash flow plus sale proceeds, net of invested cash
    pub total_profit_at_exit: f64,

    /// Net proceeds of the terminal sale after selling costs and payoff
    pub exit_sale_proceeds: f64,
}

/// Compute return metrics for a completed forecast.
///
/// The sale price is the final year's appreciated value, or the final
/// year's NOI capitalized at the exit cap rate when one is supplied.
pub fn return_metrics(
    result: &ForecastResult,
    snapshot: &PropertySnapshot,
    exit: &ExitAssumptions,
) -> Result<ReturnMetrics, ForecastError> {
    exit.validate()?;

    let last = result.rows.last().ok_or_else(|| {
        ForecastError::invalid_input("forecast", "no projection rows to derive returns from")
    })?;

    let sale_price = match exit.exit_cap_rate {
        Some(cap_rate) => {
            let terminal_noi = last.effective_income - last.operating_expenses;
            terminal_noi / cap_rate
        }
        None => last.property_value,
    };
    let exit_sale_proceeds =
        sale_price * (1.0 - exit.selling_cost_rate) - last.mortgage_balance;

    let mut cashflows = Vec::with_capacity(result.rows.len() + 1);
    cashflows.push(-snapshot.cash_invested);
    cashflows.extend(result.rows.iter().map(|r| r.net_cash_flow));
    if let Some(terminal) = cashflows.last_mut() {
        *terminal += exit_sale_proceeds;
    }

    let solution = solve_irr(&cashflows);

    let summary = result.summary();
    let total_profit_at_exit =
        summary.total_net_cash_flow + exit_sale_proceeds - snapshot.cash_invested;

    Ok(ReturnMetrics {
        irr_percent: solution.rate * 100.0,
        irr_converged: solution.converged,
        irr_out_of_range: solution.out_of_range,
        average_annual_cash_flow: summary.average_annual_cash_flow,
        total_profit_at_exit,
        exit_sale_proceeds,
    })
}
