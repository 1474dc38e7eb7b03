//! Nominal-to-periodic interest rate conversion
//!
//! Canadian fixed-rate mortgages compound semi-annually regardless of the
//! payment frequency, so the per-period rate comes from
//! `(1 + nominal/2)^(2/m) - 1` with m payments per year. Variable-rate
//! mortgages compound monthly on the nominal rate instead.

use crate::error::ForecastError;
use crate::mortgage::terms::{MortgageTerms, PaymentFrequency, RateType};

/// Convert a nominal annual rate to the effective rate per payment period.
///
/// A zero nominal rate converts to exactly 0.0. Negative rates are rejected;
/// the frequency enum is closed, so there is no unrecognized-frequency case
/// left to fail on at runtime.
pub fn periodic_rate(
    nominal_annual_rate: f64,
    rate_type: RateType,
    frequency: PaymentFrequency,
) -> Result<f64, ForecastError> {
    if !nominal_annual_rate.is_finite() || nominal_annual_rate < 0.0 {
        return Err(ForecastError::invalid_input(
            "nominal_annual_rate",
            format!("{} is negative or not finite", nominal_annual_rate),
        ));
    }
    if nominal_annual_rate == 0.0 {
        return Ok(0.0);
    }

    let per_year = frequency.periods_per_year() as f64;
    let rate = match rate_type {
        // Semi-annual compounding: two compounding events against m payments
        RateType::Fixed => {
            let semi_annual = nominal_annual_rate / 2.0;
            (1.0 + semi_annual).powf(2.0 / per_year) - 1.0
        }
        // Monthly compounding of the nominal rate
        RateType::Variable => {
            let monthly = nominal_annual_rate / 12.0;
            (1.0 + monthly).powf(12.0 / per_year) - 1.0
        }
    };

    Ok(rate)
}

/// Per-period rate for a mortgage record, including the variable spread
pub fn periodic_rate_for(terms: &MortgageTerms) -> Result<f64, ForecastError> {
    periodic_rate(
        terms.effective_nominal_rate(),
        terms.rate_type,
        terms.payment_frequency,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fixed_monthly_rate() {
        // 6% nominal, semi-annual compounding: (1.03)^(1/6) - 1
        let rate = periodic_rate(0.06, RateType::Fixed, PaymentFrequency::Monthly).unwrap();
        assert_relative_eq!(rate, 0.00493862, max_relative = 1e-5);
    }

    #[test]
    fn test_fixed_biweekly_rate() {
        // 2.69% nominal biweekly, the worked renewal example
        let rate = periodic_rate(0.0269, RateType::Fixed, PaymentFrequency::BiWeekly).unwrap();
        assert_relative_eq!(rate, 0.0010282, max_relative = 1e-4);
    }

    #[test]
    fn test_fixed_semi_monthly_uses_24_periods() {
        let monthly = periodic_rate(0.05, RateType::Fixed, PaymentFrequency::Monthly).unwrap();
        let semi_monthly =
            periodic_rate(0.05, RateType::Fixed, PaymentFrequency::SemiMonthly).unwrap();
        // Two semi-monthly periods compound to one monthly period
        assert_relative_eq!(
            (1.0 + semi_monthly) * (1.0 + semi_monthly),
            1.0 + monthly,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_accelerated_shares_base_rate() {
        let biweekly = periodic_rate(0.04, RateType::Fixed, PaymentFrequency::BiWeekly).unwrap();
        let accelerated =
            periodic_rate(0.04, RateType::Fixed, PaymentFrequency::AcceleratedBiWeekly).unwrap();
        assert_eq!(biweekly, accelerated);
    }

    #[test]
    fn test_variable_monthly_is_nominal_over_twelve() {
        let rate = periodic_rate(0.045, RateType::Variable, PaymentFrequency::Monthly).unwrap();
        assert_relative_eq!(rate, 0.045 / 12.0, max_relative = 1e-12);
    }

    #[test]
    fn test_variable_differs_from_fixed() {
        let fixed = periodic_rate(0.05, RateType::Fixed, PaymentFrequency::Monthly).unwrap();
        let variable = periodic_rate(0.05, RateType::Variable, PaymentFrequency::Monthly).unwrap();
        // Monthly compounding accrues more per period than semi-annual
        assert!(variable > fixed);
    }

    #[test]
    fn test_zero_rate_is_exactly_zero() {
        for freq in [
            PaymentFrequency::Monthly,
            PaymentFrequency::SemiMonthly,
            PaymentFrequency::BiWeekly,
            PaymentFrequency::Weekly,
        ] {
            assert_eq!(periodic_rate(0.0, RateType::Fixed, freq).unwrap(), 0.0);
            assert_eq!(periodic_rate(0.0, RateType::Variable, freq).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_negative_rate_rejected() {
        assert!(periodic_rate(-0.01, RateType::Fixed, PaymentFrequency::Monthly).is_err());
    }
}
