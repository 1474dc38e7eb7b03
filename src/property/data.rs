//! Property data structures matching the portfolio record format

use serde::{Deserialize, Serialize};

use crate::error::ForecastError;
use crate::mortgage::MortgageTerms;

/// Current financial snapshot of a rental property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySnapshot {
    /// Current annualized gross rent
    pub annual_gross_rent: f64,

    /// Current annual operating expenses (taxes, insurance, maintenance,
    /// management), before debt service
    pub annual_operating_expenses: f64,

    /// Current market value
    pub market_value: f64,

    /// Total cash invested to date (down payment, closing costs, capital
    /// improvements)
    pub cash_invested: f64,
}

impl PropertySnapshot {
    pub fn new(
        annual_gross_rent: f64,
        annual_operating_expenses: f64,
        market_value: f64,
        cash_invested: f64,
    ) -> Self {
        Self {
            annual_gross_rent,
            annual_operating_expenses,
            market_value,
            cash_invested,
        }
    }

    /// Net operating income before debt service
    pub fn noi(&self) -> f64 {
        self.annual_gross_rent - self.annual_operating_expenses
    }

    pub fn validate(&self) -> Result<(), ForecastError> {
        for (field, value) in [
            ("annual_gross_rent", self.annual_gross_rent),
            ("annual_operating_expenses", self.annual_operating_expenses),
            ("market_value", self.market_value),
            ("cash_invested", self.cash_invested),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ForecastError::invalid_input(
                    field,
                    format!("{} is negative or not finite", value),
                ));
            }
        }
        Ok(())
    }
}

/// A property record from the portfolio export.
///
/// A property with no mortgage is a valid cash-flow-only holding, not an
/// error case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyRecord {
    /// Unique property identifier
    pub property_id: u32,

    /// Display name (street address or nickname)
    pub name: String,

    /// Current financial snapshot
    pub snapshot: PropertySnapshot,

    /// Associated mortgage, if any
    pub mortgage: Option<MortgageTerms>,
}
