//! Forecast and exit assumptions

use serde::{Deserialize, Serialize};

use crate::error::ForecastError;

/// Growth and rate assumptions driving a multi-year forecast.
///
/// All rates are decimal fractions per year. Every field must be finite
/// and at least -1.0; vacancy must additionally stay within [0, 1].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ForecastAssumptions {
    /// Annual growth applied to gross rent
    pub annual_rent_growth: f64,

    /// Annual inflation applied to operating expenses
    pub annual_expense_inflation: f64,

    /// Annual appreciation applied to property value
    pub annual_appreciation: f64,

    /// Share of gross rent lost to vacancy and collection
    pub vacancy_rate: f64,

    /// Nominal annual rate assumed for mortgage renewals past the term
    pub renewal_interest_rate: f64,
}

impl ForecastAssumptions {
    /// Baseline assumption set used by the CLI surfaces
    pub fn default_baseline() -> Self {
        Self {
            annual_rent_growth: 0.02,
            annual_expense_inflation: 0.02,
            annual_appreciation: 0.03,
            vacancy_rate: 0.04,
            renewal_interest_rate: 0.05,
        }
    }

    /// Validate every rate before any projection loop runs.
    ///
    /// Failing fast here keeps NaN and Infinity from surfacing halfway
    /// through a projection.
    pub fn validate(&self) -> Result<(), ForecastError> {
        for (field, value) in [
            ("annual_rent_growth", self.annual_rent_growth),
            ("annual_expense_inflation", self.annual_expense_inflation),
            ("annual_appreciation", self.annual_appreciation),
            ("vacancy_rate", self.vacancy_rate),
            ("renewal_interest_rate", self.renewal_interest_rate),
        ] {
            if !value.is_finite() || value < -1.0 {
                return Err(ForecastError::InvalidAssumption { field, value });
            }
        }
        if self.vacancy_rate > 1.0 {
            return Err(ForecastError::InvalidAssumption {
                field: "vacancy_rate",
                value: self.vacancy_rate,
            });
        }
        if self.renewal_interest_rate < 0.0 {
            return Err(ForecastError::InvalidAssumption {
                field: "renewal_interest_rate",
                value: self.renewal_interest_rate,
            });
        }
        Ok(())
    }
}

/// Assumptions for the terminal sale at the end of the forecast horizon
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExitAssumptions {
    /// Selling costs (commissions, legal) as a fraction of sale price
    pub selling_cost_rate: f64,

    /// Exit capitalization rate; when present, the sale price is the final
    /// year's NOI capitalized at this rate instead of the appreciated value
    pub exit_cap_rate: Option<f64>,
}

impl ExitAssumptions {
    pub fn default_baseline() -> Self {
        Self {
            selling_cost_rate: 0.05,
            exit_cap_rate: None,
        }
    }

    pub fn validate(&self) -> Result<(), ForecastError> {
        if !self.selling_cost_rate.is_finite()
            || !(0.0..1.0).contains(&self.selling_cost_rate)
        {
            return Err(ForecastError::InvalidAssumption {
                field: "selling_cost_rate",
                value: self.selling_cost_rate,
            });
        }
        if let Some(cap) = self.exit_cap_rate {
            if !cap.is_finite() || cap <= 0.0 {
                return Err(ForecastError::InvalidAssumption {
                    field: "exit_cap_rate",
                    value: cap,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_baseline_is_valid() {
        assert!(ForecastAssumptions::default_baseline().validate().is_ok());
        assert!(ExitAssumptions::default_baseline().validate().is_ok());
    }

    #[test]
    fn test_below_floor_rejected() {
        let mut assumptions = ForecastAssumptions::default_baseline();
        assumptions.annual_rent_growth = -1.5;
        assert!(assumptions.validate().is_err());
    }

    #[test]
    fn test_nan_rejected() {
        let mut assumptions = ForecastAssumptions::default_baseline();
        assumptions.annual_appreciation = f64::NAN;
        assert!(assumptions.validate().is_err());
    }

    #[test]
    fn test_vacancy_over_one_rejected() {
        let mut assumptions = ForecastAssumptions::default_baseline();
        assumptions.vacancy_rate = 1.2;
        assert!(assumptions.validate().is_err());
    }

    #[test]
    fn test_negative_deflation_within_floor_allowed() {
        let mut assumptions = ForecastAssumptions::default_baseline();
        assumptions.annual_rent_growth = -0.10;
        assumptions.annual_appreciation = -0.25;
        assert!(assumptions.validate().is_ok());
    }

    #[test]
    fn test_zero_exit_cap_rejected() {
        let exit = ExitAssumptions {
            selling_cost_rate: 0.05,
            exit_cap_rate: Some(0.0),
        };
        assert!(exit.validate().is_err());
    }
}
