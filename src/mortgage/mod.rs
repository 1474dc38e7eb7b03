//! Mortgage terms, rate conversion, payment solving, and amortization

mod payment;
mod rates;
mod schedule;
mod terms;
pub mod loader;

pub use payment::{payment_amount, round_to_cent};
pub use rates::{periodic_rate, periodic_rate_for};
pub use schedule::{AmortizationSchedule, PaymentPeriod, RenewalPoint, ScheduleSpan};
pub use terms::{MortgageTerms, PaymentFrequency, RateType};
