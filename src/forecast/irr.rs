//! Internal Rate of Return (IRR) calculation
//!
//! Solves for the discount rate at which the net present value of a yearly
//! cash-flow series is zero, using Newton-Raphson with an analytic
//! derivative.

use log::{debug, warn};

/// Initial guess for the annual rate
const INITIAL_GUESS: f64 = 0.10;

/// Stop when successive rate estimates move less than this
const TOLERANCE: f64 = 1e-6;

/// Iteration cap; each iteration is bounded work, so this doubles as the
/// solver's timeout
const MAX_ITERATIONS: u32 = 1000;

/// Below this the derivative is too flat for a Newton step
const DERIVATIVE_EPSILON: f64 = 1e-12;

/// Solved rates are clamped to this range; anything outside is physically
/// meaningless for a property investment
const RATE_FLOOR: f64 = -0.99;
const RATE_CEILING: f64 = 5.0;

/// Outcome of an IRR solve; always produced, never an error
#[derive(Debug, Clone, Copy)]
pub struct IrrSolution {
    /// Annual rate as a decimal fraction, clamped to [-0.99, 5.0]
    pub rate: f64,

    /// False when the iteration cap was hit or no root can exist
    pub converged: bool,

    /// True when the solved rate falls outside the normal 0..100% range
    pub out_of_range: bool,

    /// Newton iterations actually performed
    pub iterations: u32,
}

impl IrrSolution {
    fn failed() -> Self {
        Self {
            rate: 0.0,
            converged: false,
            out_of_range: false,
            iterations: 0,
        }
    }
}

/// Net present value of a cash-flow series at a given annual rate.
///
/// Index 0 is the time-zero flow (discount factor 1).
pub fn npv(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

/// NPV and its derivative with respect to the rate
fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        let discount = (1.0 + rate).powi(t as i32);
        npv += cf / discount;
        if t > 0 {
            dnpv -= (t as f64) * cf / ((1.0 + rate).powi(t as i32 + 1));
        }
    }

    (npv, dnpv)
}

/// Solve for the IRR of a yearly cash-flow series.
///
/// An empty series, an all-zero series, or a series without a sign change
/// has no root to find and comes back `converged: false` with a zero rate.
/// Hitting the iteration cap returns the last estimate, still flagged.
pub fn solve_irr(cashflows: &[f64]) -> IrrSolution {
    if cashflows.is_empty() {
        return IrrSolution::failed();
    }
    if cashflows.iter().all(|&cf| cf.abs() < 1e-10) {
        return IrrSolution::failed();
    }

    // A root requires at least one inflow and one outflow
    let has_positive = cashflows.iter().any(|&cf| cf > 1e-10);
    let has_negative = cashflows.iter().any(|&cf| cf < -1e-10);
    if !has_positive || !has_negative {
        return IrrSolution::failed();
    }

    let mut rate = INITIAL_GUESS;
    let mut converged = false;
    let mut iterations = 0;

    for i in 1..=MAX_ITERATIONS {
        iterations = i;
        let (npv, dnpv) = npv_and_derivative(cashflows, rate);

        if dnpv.abs() < DERIVATIVE_EPSILON {
            // Too flat for a Newton step; nudge the rate and keep going
            rate = if rate.abs() < 1e-6 { 0.01 } else { rate * 1.1 };
            rate = rate.clamp(RATE_FLOOR, RATE_CEILING);
            continue;
        }

        let new_rate = (rate - npv / dnpv).clamp(RATE_FLOOR, RATE_CEILING);

        if (new_rate - rate).abs() < TOLERANCE {
            rate = new_rate;
            converged = true;
            break;
        }

        rate = new_rate;
    }

    if !converged {
        warn!(
            "IRR did not converge after {} iterations, returning last estimate {:.6}",
            iterations, rate
        );
    }

    // Rates outside 0..100% are reported back to the caller as suspect
    let out_of_range = !(0.0..=1.0).contains(&rate);
    if out_of_range {
        warn!("IRR {:.4} is outside the normal 0..1 range", rate);
    }
    debug!(
        "IRR solve: rate={:.8} converged={} iterations={}",
        rate, converged, iterations
    );

    IrrSolution {
        rate,
        converged,
        out_of_range,
        iterations,
    }
}
