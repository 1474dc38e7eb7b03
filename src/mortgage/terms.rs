//! Mortgage definition matching the portfolio record format

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ForecastError;

/// Rate type of the mortgage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateType {
    /// Fixed rate, compounded semi-annually (Canadian convention)
    Fixed,
    /// Variable rate (prime + spread), compounded monthly
    Variable,
}

/// Payment frequency of the mortgage
///
/// Accelerated variants pay the same per-payment amount as half (biweekly)
/// or a quarter (weekly) of the monthly payment, which shortens the
/// effective amortization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentFrequency {
    Monthly,
    SemiMonthly,
    BiWeekly,
    AcceleratedBiWeekly,
    Weekly,
    AcceleratedWeekly,
}

impl PaymentFrequency {
    /// Number of payments per year
    pub fn periods_per_year(&self) -> u32 {
        match self {
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::SemiMonthly => 24,
            PaymentFrequency::BiWeekly | PaymentFrequency::AcceleratedBiWeekly => 26,
            PaymentFrequency::Weekly | PaymentFrequency::AcceleratedWeekly => 52,
        }
    }

    /// Whether the payment amount derives from the monthly baseline
    pub fn is_accelerated(&self) -> bool {
        matches!(
            self,
            PaymentFrequency::AcceleratedBiWeekly | PaymentFrequency::AcceleratedWeekly
        )
    }

    /// Get the string representation matching the portfolio record format
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentFrequency::Monthly => "Monthly",
            PaymentFrequency::SemiMonthly => "SemiMonthly",
            PaymentFrequency::BiWeekly => "BiWeekly",
            PaymentFrequency::AcceleratedBiWeekly => "AcceleratedBiWeekly",
            PaymentFrequency::Weekly => "Weekly",
            PaymentFrequency::AcceleratedWeekly => "AcceleratedWeekly",
        }
    }
}

/// A single mortgage record
///
/// Immutable for the duration of a calculation; a renewal or refinance is
/// represented by a new value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageTerms {
    /// Original loan principal
    pub principal: f64,

    /// Nominal annual interest rate as a decimal fraction (e.g. 0.0269)
    pub nominal_annual_rate: f64,

    /// Fixed or variable rate
    pub rate_type: RateType,

    /// Spread over the nominal rate, only meaningful for variable mortgages
    #[serde(default)]
    pub variable_spread: Option<f64>,

    /// Amortization length in months
    pub amortization_months: u32,

    /// Term length in months (term <= amortization)
    pub term_months: u32,

    /// Payment frequency
    pub payment_frequency: PaymentFrequency,

    /// First day of the mortgage (closing date); the first payment falls
    /// one full period later
    pub start_date: NaiveDate,
}

impl MortgageTerms {
    /// Create a fixed-rate mortgage
    pub fn fixed(
        principal: f64,
        nominal_annual_rate: f64,
        amortization_months: u32,
        term_months: u32,
        payment_frequency: PaymentFrequency,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            principal,
            nominal_annual_rate,
            rate_type: RateType::Fixed,
            variable_spread: None,
            amortization_months,
            term_months,
            payment_frequency,
            start_date,
        }
    }

    /// Create a variable-rate mortgage with a spread over the nominal rate
    pub fn variable(
        principal: f64,
        nominal_annual_rate: f64,
        variable_spread: f64,
        amortization_months: u32,
        term_months: u32,
        payment_frequency: PaymentFrequency,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            principal,
            nominal_annual_rate,
            rate_type: RateType::Variable,
            variable_spread: Some(variable_spread),
            amortization_months,
            term_months,
            payment_frequency,
            start_date,
        }
    }

    /// Effective nominal rate including the variable spread when present
    pub fn effective_nominal_rate(&self) -> f64 {
        match self.rate_type {
            RateType::Fixed => self.nominal_annual_rate,
            RateType::Variable => self.nominal_annual_rate + self.variable_spread.unwrap_or(0.0),
        }
    }

    /// Total number of payment periods over the amortization length
    ///
    /// Rounded to the nearest whole period when the amortization is not a
    /// whole number of years at 26 or 52 periods per year.
    pub fn total_periods(&self) -> u32 {
        let per_year = self.payment_frequency.periods_per_year();
        ((self.amortization_months as f64) * (per_year as f64) / 12.0).round() as u32
    }

    /// Validate the record, rejecting values the amortization math cannot
    /// meaningfully handle
    pub fn validate(&self) -> Result<(), ForecastError> {
        if !self.principal.is_finite() || self.principal <= 0.0 {
            return Err(ForecastError::invalid_input(
                "principal",
                format!("{} is not a positive amount", self.principal),
            ));
        }
        if !self.nominal_annual_rate.is_finite() || self.nominal_annual_rate < 0.0 {
            return Err(ForecastError::invalid_input(
                "nominal_annual_rate",
                format!("{} is negative or not finite", self.nominal_annual_rate),
            ));
        }
        if self.amortization_months == 0 {
            return Err(ForecastError::invalid_input(
                "amortization_months",
                "must be positive",
            ));
        }
        if self.amortization_months > 1200 {
            return Err(ForecastError::invalid_input(
                "amortization_months",
                format!("{} exceeds 100 years", self.amortization_months),
            ));
        }
        if self.term_months == 0 {
            return Err(ForecastError::invalid_input("term_months", "must be positive"));
        }
        if self.term_months > self.amortization_months {
            return Err(ForecastError::invalid_input(
                "term_months",
                format!(
                    "term {} exceeds amortization {}",
                    self.term_months, self.amortization_months
                ),
            ));
        }
        match self.rate_type {
            RateType::Fixed => {
                if self.variable_spread.is_some() {
                    return Err(ForecastError::invalid_input(
                        "variable_spread",
                        "spread supplied for a fixed-rate mortgage",
                    ));
                }
            }
            RateType::Variable => {
                if let Some(spread) = self.variable_spread {
                    if !spread.is_finite() {
                        return Err(ForecastError::invalid_input(
                            "variable_spread",
                            format!("{} is not finite", spread),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}
