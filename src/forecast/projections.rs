//! Projection output structures for forecasts

use serde::{Deserialize, Serialize};

/// A single year of projection output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearProjection {
    /// Forecast year (1-based)
    pub year: u32,

    // Income
    pub gross_income: f64,
    pub effective_income: f64,

    // Outflows
    pub operating_expenses: f64,
    pub mortgage_interest: f64,
    pub mortgage_principal: f64,
    pub debt_service: f64,

    // Summary
    pub net_cash_flow: f64,

    // Position at year end
    pub property_value: f64,
    pub mortgage_balance: f64,
    pub equity: f64,
}

/// Complete forecast result for one property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Yearly projection rows
    pub rows: Vec<YearProjection>,
}

impl ForecastResult {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Add a projection row
    pub fn add_row(&mut self, row: YearProjection) {
        self.rows.push(row);
    }

    /// Get summary statistics
    pub fn summary(&self) -> ForecastSummary {
        let total_net_cash_flow: f64 = self.rows.iter().map(|r| r.net_cash_flow).sum();
        let total_debt_service: f64 = self.rows.iter().map(|r| r.debt_service).sum();
        let horizon_years = self.rows.len() as u32;

        let average_annual_cash_flow = if horizon_years > 0 {
            total_net_cash_flow / horizon_years as f64
        } else {
            0.0
        };

        let last = self.rows.last();
        ForecastSummary {
            horizon_years,
            total_net_cash_flow,
            total_debt_service,
            average_annual_cash_flow,
            final_property_value: last.map(|r| r.property_value).unwrap_or(0.0),
            final_mortgage_balance: last.map(|r| r.mortgage_balance).unwrap_or(0.0),
            final_equity: last.map(|r| r.equity).unwrap_or(0.0),
        }
    }
}

impl Default for ForecastResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary statistics for a forecast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub horizon_years: u32,
    pub total_net_cash_flow: f64,
    pub total_debt_service: f64,
    pub average_annual_cash_flow: f64,
    pub final_property_value: f64,
    pub final_mortgage_balance: f64,
    pub final_equity: f64,
}
