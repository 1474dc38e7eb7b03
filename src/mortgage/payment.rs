//! Level payment amount solver

use crate::error::ForecastError;
use crate::mortgage::terms::PaymentFrequency;

/// Round a currency amount to the cent, half away from zero
pub fn round_to_cent(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Level payment for the standard annuity, before rounding
fn annuity_payment(principal: f64, periodic_rate: f64, total_periods: u32) -> f64 {
    if periodic_rate == 0.0 {
        // No interest: straight division, no annuity denominator to vanish
        return principal / total_periods as f64;
    }
    let growth = (1.0 + periodic_rate).powi(total_periods as i32);
    principal * periodic_rate * growth / (growth - 1.0)
}

/// Compute the per-payment amount for a mortgage.
///
/// Standard frequencies use the annuity formula on their own periodic rate
/// and period count, rounded to the cent. Accelerated frequencies are
/// defined as the monthly payment divided by 2 (biweekly) or 4 (weekly),
/// not as an annuity over 26 or 52 periods; the monthly baseline is
/// recovered from the periodic rate by compounding it back up to a month.
pub fn payment_amount(
    principal: f64,
    periodic_rate: f64,
    total_periods: u32,
    frequency: PaymentFrequency,
) -> Result<f64, ForecastError> {
    if total_periods == 0 {
        return Err(ForecastError::invalid_input(
            "total_periods",
            "must be positive",
        ));
    }
    if !principal.is_finite() || principal <= 0.0 {
        return Err(ForecastError::invalid_input(
            "principal",
            format!("{} is not a positive amount", principal),
        ));
    }
    if !periodic_rate.is_finite() || periodic_rate < 0.0 {
        return Err(ForecastError::invalid_input(
            "periodic_rate",
            format!("{} is negative or not finite", periodic_rate),
        ));
    }

    let per_year = frequency.periods_per_year() as f64;
    let payment = if frequency.is_accelerated() {
        // Monthly equivalent of this mortgage: same compounding path,
        // 12 periods per year
        let monthly_rate = (1.0 + periodic_rate).powf(per_year / 12.0) - 1.0;
        let monthly_periods = (total_periods as f64 * 12.0 / per_year).round() as u32;
        let monthly_payment =
            round_to_cent(annuity_payment(principal, monthly_rate, monthly_periods));
        match frequency {
            PaymentFrequency::AcceleratedBiWeekly => monthly_payment / 2.0,
            PaymentFrequency::AcceleratedWeekly => monthly_payment / 4.0,
            _ => unreachable!(),
        }
    } else {
        round_to_cent(annuity_payment(principal, periodic_rate, total_periods))
    };

    Ok(payment)
}
