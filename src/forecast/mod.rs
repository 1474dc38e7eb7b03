//! Year-by-year forecasting, IRR solving, and return metrics

pub mod engine;
pub mod irr;
mod projections;
mod returns;

pub use engine::{ForecastConfig, ForecastEngine};
pub use irr::{npv, solve_irr, IrrSolution};
pub use projections::{ForecastResult, ForecastSummary, YearProjection};
pub use returns::{return_metrics, ReturnMetrics};
