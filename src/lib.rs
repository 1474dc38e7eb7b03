//! Property Forecast - mortgage amortization and investment forecasting engine
//!
//! This library provides:
//! - Canadian mortgage rate conversion (semi-annual compounding) and
//!   payment solving, including accelerated frequencies
//! - Payment-by-payment amortization schedules with calendar-exact dates
//! - Multi-year cash-flow and equity forecasting with renewal modeling
//! - IRR solving and scenario comparison

pub mod assumptions;
pub mod error;
pub mod forecast;
pub mod mortgage;
pub mod property;
pub mod scenario;

// Re-export commonly used types
pub use assumptions::{ExitAssumptions, ForecastAssumptions};
pub use error::ForecastError;
pub use forecast::{ForecastConfig, ForecastEngine, ForecastResult, ReturnMetrics, YearProjection};
pub use mortgage::{AmortizationSchedule, MortgageTerms, PaymentFrequency, PaymentPeriod, RateType};
pub use property::{PropertyRecord, PropertySnapshot};
pub use scenario::{compare_scenarios, ComparisonReport, ScenarioOutcome, ScenarioRunner};
