//! Scenario runner and comparator
//!
//! A scenario is one assumption set applied to a property; comparing two
//! scenarios produces per-metric deltas classified as improvement,
//! regression, or noise.

use serde::{Deserialize, Serialize};

use crate::assumptions::{ExitAssumptions, ForecastAssumptions};
use crate::error::ForecastError;
use crate::forecast::{
    return_metrics, ForecastConfig, ForecastEngine, ForecastResult, ReturnMetrics,
};
use crate::mortgage::MortgageTerms;
use crate::property::{PropertyRecord, PropertySnapshot};

/// Minimum relative change before a delta is flagged as a real move
pub const DEFAULT_COMPARISON_THRESHOLD: f64 = 0.001;

/// Result of running one scenario against a property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    /// Year-by-year projections
    pub forecast: ForecastResult,

    /// Derived return metrics
    pub metrics: ReturnMetrics,
}

/// Pre-loaded scenario runner for efficient batch forecasting
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    /// Base forecast assumptions applied to every run
    base_assumptions: ForecastAssumptions,

    /// Base exit assumptions for the terminal sale
    base_exit: ExitAssumptions,
}

impl ScenarioRunner {
    /// Create runner with the default baseline assumptions
    pub fn new() -> Self {
        Self {
            base_assumptions: ForecastAssumptions::default_baseline(),
            base_exit: ExitAssumptions::default_baseline(),
        }
    }

    /// Create runner with pre-built assumptions
    pub fn with_assumptions(
        assumptions: ForecastAssumptions,
        exit: ExitAssumptions,
    ) -> Self {
        Self {
            base_assumptions: assumptions,
            base_exit: exit,
        }
    }

    /// Run a single scenario for one property
    pub fn run(
        &self,
        snapshot: &PropertySnapshot,
        mortgage: Option<&MortgageTerms>,
        config: ForecastConfig,
    ) -> Result<ScenarioOutcome, ForecastError> {
        let engine = ForecastEngine::new(self.base_assumptions, config);
        let forecast = engine.project(snapshot, mortgage)?;
        let metrics = return_metrics(&forecast, snapshot, &self.base_exit)?;
        Ok(ScenarioOutcome { forecast, metrics })
    }

    /// Run the base scenario for every property in a portfolio
    pub fn run_batch(
        &self,
        records: &[PropertyRecord],
        config: ForecastConfig,
    ) -> Result<Vec<ScenarioOutcome>, ForecastError> {
        records
            .iter()
            .map(|record| self.run(&record.snapshot, record.mortgage.as_ref(), config))
            .collect()
    }

    /// Run multiple assumption sets against a single property
    pub fn run_scenarios(
        &self,
        snapshot: &PropertySnapshot,
        mortgage: Option<&MortgageTerms>,
        assumption_sets: &[ForecastAssumptions],
        config: ForecastConfig,
    ) -> Result<Vec<ScenarioOutcome>, ForecastError> {
        assumption_sets
            .iter()
            .map(|&assumptions| {
                let runner = ScenarioRunner::with_assumptions(assumptions, self.base_exit);
                runner.run(snapshot, mortgage, config)
            })
            .collect()
    }

    /// Get reference to base assumptions for inspection/modification
    pub fn assumptions(&self) -> &ForecastAssumptions {
        &self.base_assumptions
    }

    /// Get mutable reference to base assumptions for customization
    pub fn assumptions_mut(&mut self) -> &mut ForecastAssumptions {
        &mut self.base_assumptions
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Direction of a metric move between baseline and adjusted scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeDirection {
    Improvement,
    Regression,
    Unchanged,
}

impl ChangeDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeDirection::Improvement => "improvement",
            ChangeDirection::Regression => "regression",
            ChangeDirection::Unchanged => "unchanged",
        }
    }
}

/// Delta for one metric between two scenarios
#[derive(Debug, Clone, Serialize)]
pub struct MetricDelta {
    /// Metric name
    pub metric: &'static str,

    pub baseline: f64,
    pub adjusted: f64,
    pub absolute_change: f64,

    /// Change relative to the baseline; absent when the baseline is zero
    pub percent_change: Option<f64>,

    pub direction: ChangeDirection,
}

/// Per-metric delta report between a baseline and an adjusted scenario
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub deltas: Vec<MetricDelta>,

    /// Threshold the classification used
    pub threshold: f64,
}

impl ComparisonReport {
    /// True when no metric moved past the threshold
    pub fn is_unchanged(&self) -> bool {
        self.deltas
            .iter()
            .all(|d| d.direction == ChangeDirection::Unchanged)
    }
}

/// Compare two scenario outcomes metric by metric.
///
/// Classification is sign-aware: a larger mortgage balance at exit is a
/// regression even though the delta is positive. Moves smaller than the
/// threshold (relative to the baseline, absolute when the baseline is
/// zero) are reported as unchanged.
pub fn compare_scenarios(
    baseline: &ScenarioOutcome,
    adjusted: &ScenarioOutcome,
    threshold: f64,
) -> ComparisonReport {
    let base_summary = baseline.forecast.summary();
    let adj_summary = adjusted.forecast.summary();

    // (name, baseline, adjusted, higher is better)
    let metrics: [(&'static str, f64, f64, bool); 7] = [
        (
            "irr_percent",
            baseline.metrics.irr_percent,
            adjusted.metrics.irr_percent,
            true,
        ),
        (
            "average_annual_cash_flow",
            baseline.metrics.average_annual_cash_flow,
            adjusted.metrics.average_annual_cash_flow,
            true,
        ),
        (
            "total_profit_at_exit",
            baseline.metrics.total_profit_at_exit,
            adjusted.metrics.total_profit_at_exit,
            true,
        ),
        (
            "exit_sale_proceeds",
            baseline.metrics.exit_sale_proceeds,
            adjusted.metrics.exit_sale_proceeds,
            true,
        ),
        (
            "final_equity",
            base_summary.final_equity,
            adj_summary.final_equity,
            true,
        ),
        (
            "final_property_value",
            base_summary.final_property_value,
            adj_summary.final_property_value,
            true,
        ),
        (
            "final_mortgage_balance",
            base_summary.final_mortgage_balance,
            adj_summary.final_mortgage_balance,
            false,
        ),
    ];

    let deltas = metrics
        .iter()
        .map(|&(metric, base, adj, higher_is_better)| {
            classify_delta(metric, base, adj, higher_is_better, threshold)
        })
        .collect();

    ComparisonReport { deltas, threshold }
}

fn classify_delta(
    metric: &'static str,
    baseline: f64,
    adjusted: f64,
    higher_is_better: bool,
    threshold: f64,
) -> MetricDelta {
    let absolute_change = adjusted - baseline;
    let percent_change = if baseline != 0.0 {
        Some(absolute_change / baseline.abs() * 100.0)
    } else {
        None
    };

    let significant = if baseline != 0.0 {
        (absolute_change / baseline.abs()).abs() >= threshold
    } else {
        absolute_change.abs() >= threshold
    };

    let direction = if !significant {
        ChangeDirection::Unchanged
    } else if (absolute_change > 0.0) == higher_is_better {
        ChangeDirection::Improvement
    } else {
        ChangeDirection::Regression
    };

    MetricDelta {
        metric,
        baseline,
        adjusted,
        absolute_change,
        percent_change,
        direction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mortgage::PaymentFrequency;
    use chrono::NaiveDate;

    fn test_snapshot() -> PropertySnapshot {
        PropertySnapshot::new(30_000.0, 11_500.0, 650_000.0, 130_000.0)
    }

    fn test_mortgage() -> MortgageTerms {
        MortgageTerms::fixed(
            492_000.0,
            0.0269,
            300,
            60,
            PaymentFrequency::BiWeekly,
            NaiveDate::from_ymd_opt(2019, 2, 4).unwrap(),
        )
    }

    #[test]
    fn test_identical_scenarios_report_zero_delta() {
        let runner = ScenarioRunner::new();
        let snapshot = test_snapshot();
        let mortgage = test_mortgage();

        let baseline = runner
            .run(&snapshot, Some(&mortgage), ForecastConfig::default())
            .unwrap();
        let adjusted = runner
            .run(&snapshot, Some(&mortgage), ForecastConfig::default())
            .unwrap();

        let report =
            compare_scenarios(&baseline, &adjusted, DEFAULT_COMPARISON_THRESHOLD);
        assert!(report.is_unchanged());
        for delta in &report.deltas {
            assert_eq!(delta.absolute_change, 0.0);
            assert_eq!(delta.direction, ChangeDirection::Unchanged);
        }
    }

    #[test]
    fn test_higher_rent_growth_improves_returns() {
        let snapshot = test_snapshot();
        let mortgage = test_mortgage();

        let baseline = ScenarioRunner::new()
            .run(&snapshot, Some(&mortgage), ForecastConfig::default())
            .unwrap();

        let mut optimistic = ForecastAssumptions::default_baseline();
        optimistic.annual_rent_growth = 0.05;
        let adjusted =
            ScenarioRunner::with_assumptions(optimistic, ExitAssumptions::default_baseline())
                .run(&snapshot, Some(&mortgage), ForecastConfig::default())
                .unwrap();

        let report =
            compare_scenarios(&baseline, &adjusted, DEFAULT_COMPARISON_THRESHOLD);
        let cash_flow = report
            .deltas
            .iter()
            .find(|d| d.metric == "average_annual_cash_flow")
            .unwrap();
        assert_eq!(cash_flow.direction, ChangeDirection::Improvement);

        let irr = report.deltas.iter().find(|d| d.metric == "irr_percent").unwrap();
        assert_eq!(irr.direction, ChangeDirection::Improvement);
    }

    #[test]
    fn test_higher_renewal_rate_is_regression_on_balance() {
        let snapshot = test_snapshot();
        let mortgage = test_mortgage();

        let baseline = ScenarioRunner::new()
            .run(&snapshot, Some(&mortgage), ForecastConfig::default())
            .unwrap();

        let mut expensive = ForecastAssumptions::default_baseline();
        expensive.renewal_interest_rate = 0.08;
        let adjusted =
            ScenarioRunner::with_assumptions(expensive, ExitAssumptions::default_baseline())
                .run(&snapshot, Some(&mortgage), ForecastConfig::default())
                .unwrap();

        // Costlier renewal slows principal paydown: a higher final balance
        // must read as a regression despite the positive delta
        let report =
            compare_scenarios(&baseline, &adjusted, DEFAULT_COMPARISON_THRESHOLD);
        let balance = report
            .deltas
            .iter()
            .find(|d| d.metric == "final_mortgage_balance")
            .unwrap();
        assert!(balance.absolute_change > 0.0);
        assert_eq!(balance.direction, ChangeDirection::Regression);
    }

    #[test]
    fn test_tiny_moves_are_noise() {
        let delta = classify_delta("irr_percent", 10.0, 10.0001, true, 0.001);
        assert_eq!(delta.direction, ChangeDirection::Unchanged);

        let delta = classify_delta("irr_percent", 10.0, 10.2, true, 0.001);
        assert_eq!(delta.direction, ChangeDirection::Improvement);
    }

    #[test]
    fn test_run_scenarios_orders_outcomes() {
        let snapshot = test_snapshot();
        let runner = ScenarioRunner::new();

        let sets: Vec<ForecastAssumptions> = [0.00, 0.02, 0.05]
            .iter()
            .map(|&growth| {
                let mut a = ForecastAssumptions::default_baseline();
                a.annual_rent_growth = growth;
                a
            })
            .collect();

        let outcomes = runner
            .run_scenarios(&snapshot, None, &sets, ForecastConfig::default())
            .unwrap();
        assert_eq!(outcomes.len(), 3);

        // Higher rent growth produces higher average cash flow
        assert!(
            outcomes[2].metrics.average_annual_cash_flow
                > outcomes[0].metrics.average_annual_cash_flow
        );
    }
}
