//! Core forecast engine for year-by-year property projections

use chrono::Datelike;
use log::debug;

use crate::assumptions::ForecastAssumptions;
use crate::error::ForecastError;
use crate::mortgage::{
    AmortizationSchedule, MortgageTerms, PaymentPeriod, RateType, ScheduleSpan,
};
use crate::property::PropertySnapshot;

use super::projections::{ForecastResult, YearProjection};

/// Configuration for a forecast run
#[derive(Debug, Clone, Copy)]
pub struct ForecastConfig {
    /// Number of years to project
    pub horizon_years: u32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self { horizon_years: 10 }
    }
}

/// Mortgage balance trajectory across the horizon, including renewals.
///
/// Renewal segments are new `MortgageTerms` values generated at the assumed
/// renewal rate; their rows are concatenated so the forecast reads one
/// continuous payment stream.
struct BalanceTrajectory {
    rows: Vec<PaymentPeriod>,
    original_principal: f64,
}

impl BalanceTrajectory {
    fn interest_in_year(&self, year: i32) -> f64 {
        self.rows
            .iter()
            .filter(|p| p.payment_date.year() == year)
            .map(|p| p.interest_portion)
            .sum()
    }

    fn principal_in_year(&self, year: i32) -> f64 {
        self.rows
            .iter()
            .filter(|p| p.payment_date.year() == year)
            .map(|p| p.principal_portion)
            .sum()
    }

    fn balance_at_year_end(&self, year: i32) -> f64 {
        self.rows
            .iter()
            .rev()
            .find(|p| p.payment_date.year() <= year)
            .map(|p| p.remaining_balance)
            .unwrap_or(self.original_principal)
    }
}

/// Main forecast engine
pub struct ForecastEngine {
    assumptions: ForecastAssumptions,
    config: ForecastConfig,
}

impl ForecastEngine {
    /// Create a new forecast engine with given assumptions and config
    pub fn new(assumptions: ForecastAssumptions, config: ForecastConfig) -> Self {
        Self {
            assumptions,
            config,
        }
    }

    /// Run the projection for a single property.
    ///
    /// A property without a mortgage is projected cash-flow-only: every
    /// mortgage-derived column is zero.
    pub fn project(
        &self,
        snapshot: &PropertySnapshot,
        mortgage: Option<&MortgageTerms>,
    ) -> Result<ForecastResult, ForecastError> {
        self.assumptions.validate()?;
        snapshot.validate()?;
        if self.config.horizon_years == 0 || self.config.horizon_years > 100 {
            return Err(ForecastError::invalid_input(
                "horizon_years",
                format!("{} is not between 1 and 100", self.config.horizon_years),
            ));
        }

        let trajectory = match mortgage {
            Some(terms) => Some(self.balance_trajectory(terms)?),
            None => None,
        };
        let start_year = mortgage.map(|terms| terms.start_date.year());

        let mut result = ForecastResult::new();
        let mut gross_income = snapshot.annual_gross_rent;
        let mut operating_expenses = snapshot.annual_operating_expenses;
        let mut property_value = snapshot.market_value;

        for year in 1..=self.config.horizon_years {
            gross_income *= 1.0 + self.assumptions.annual_rent_growth;
            operating_expenses *= 1.0 + self.assumptions.annual_expense_inflation;
            property_value *= 1.0 + self.assumptions.annual_appreciation;

            let effective_income = gross_income * (1.0 - self.assumptions.vacancy_rate);

            // Mortgage columns come from the schedule, never recomputed
            let (mortgage_interest, mortgage_principal, mortgage_balance) =
                match (&trajectory, start_year) {
                    (Some(trajectory), Some(start_year)) => {
                        let calendar_year = start_year + (year as i32 - 1);
                        (
                            trajectory.interest_in_year(calendar_year),
                            trajectory.principal_in_year(calendar_year),
                            trajectory.balance_at_year_end(calendar_year),
                        )
                    }
                    _ => (0.0, 0.0, 0.0),
                };

            let debt_service = mortgage_interest + mortgage_principal;
            let net_cash_flow = effective_income - operating_expenses - debt_service;
            let equity = property_value - mortgage_balance;

            result.add_row(YearProjection {
                year,
                gross_income,
                effective_income,
                operating_expenses,
                mortgage_interest,
                mortgage_principal,
                debt_service,
                net_cash_flow,
                property_value,
                mortgage_balance,
                equity,
            });
        }

        Ok(result)
    }

    /// Build the mortgage balance trajectory across the forecast horizon.
    ///
    /// The initial term is generated from the mortgage as written; when the
    /// amortization outlasts the term, the remainder is carried by a renewal
    /// at the assumed renewal rate (a new `MortgageTerms` with the renewal
    /// balance and the remaining amortization).
    fn balance_trajectory(
        &self,
        terms: &MortgageTerms,
    ) -> Result<BalanceTrajectory, ForecastError> {
        let mut rows = Vec::new();

        let initial = AmortizationSchedule::generate(terms, ScheduleSpan::TermOnly)?;
        let renewal = initial.renewal;
        rows.extend(initial.periods);

        if let Some(point) = renewal {
            let remaining_months = terms.amortization_months - terms.term_months;
            if remaining_months > 0 && point.balance >= 0.01 {
                debug!(
                    "renewing {:.2} over {} months at {:.4}",
                    point.balance, remaining_months, self.assumptions.renewal_interest_rate
                );
                let renewed = MortgageTerms {
                    principal: point.balance,
                    nominal_annual_rate: self.assumptions.renewal_interest_rate,
                    rate_type: RateType::Fixed,
                    variable_spread: None,
                    amortization_months: remaining_months,
                    term_months: remaining_months,
                    payment_frequency: terms.payment_frequency,
                    start_date: point.date,
                };
                let tail =
                    AmortizationSchedule::generate(&renewed, ScheduleSpan::FullAmortization)?;
                rows.extend(tail.periods);
            }
        }

        Ok(BalanceTrajectory {
            rows,
            original_principal: terms.principal,
        })
    }
}
