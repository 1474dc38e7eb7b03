//! Payment-by-payment amortization schedule with calendar-exact dates

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ForecastError;
use crate::mortgage::payment::{payment_amount, round_to_cent};
use crate::mortgage::rates::periodic_rate_for;
use crate::mortgage::terms::{MortgageTerms, PaymentFrequency};

/// Tolerance for comparing cent-rounded balances held in f64
const CENT_EPSILON: f64 = 1e-6;

/// A single row of the amortization schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentPeriod {
    /// Sequence number (1-based)
    pub sequence: u32,

    /// Calendar-exact payment date
    pub payment_date: NaiveDate,

    /// Interest charged this period
    pub interest_portion: f64,

    /// Principal repaid this period
    pub principal_portion: f64,

    /// Total paid this period; equals the level payment except on the
    /// final reconciliation row
    pub total_payment: f64,

    /// Balance outstanding after this payment
    pub remaining_balance: f64,
}

/// Balance and date at the end of the mortgage term (the renewal point)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RenewalPoint {
    /// Calendar end of the term
    pub date: NaiveDate,

    /// Balance outstanding at the term end
    pub balance: f64,

    /// Payments made before the term end
    pub periods_elapsed: u32,
}

/// Coverage of a generated schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleSpan {
    /// Every payment until the balance reaches zero
    FullAmortization,
    /// Only payments falling within the mortgage term
    TermOnly,
}

/// Ordered payment schedule for one mortgage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    /// Schedule rows in payment order
    pub periods: Vec<PaymentPeriod>,

    /// Original principal the schedule was built from
    pub original_principal: f64,

    /// Level payment amount the schedule was built from
    pub payment_amount: f64,

    /// Effective rate per payment period
    pub periodic_rate: f64,

    /// Renewal point, present when the term is shorter than the
    /// amortization; recorded in the same generation pass
    pub renewal: Option<RenewalPoint>,
}

/// Walks payment dates forward under a frequency convention.
///
/// Monthly dates anchor to the start date's day-of-month and clamp to the
/// last day of shorter months without losing the anchor (a schedule started
/// on the 31st pays on Feb 28/29 and returns to the 31st in March).
struct PaymentDates {
    frequency: PaymentFrequency,
    start: NaiveDate,
    current: NaiveDate,
    months_advanced: u32,
}

impl PaymentDates {
    fn new(frequency: PaymentFrequency, start: NaiveDate) -> Self {
        Self {
            frequency,
            start,
            current: start,
            months_advanced: 0,
        }
    }

    fn next(&mut self) -> NaiveDate {
        let next = match self.frequency {
            PaymentFrequency::Monthly => {
                self.months_advanced += 1;
                add_months_clamped(self.start, self.months_advanced)
            }
            PaymentFrequency::SemiMonthly => next_semi_monthly(self.current),
            PaymentFrequency::BiWeekly | PaymentFrequency::AcceleratedBiWeekly => self
                .current
                .checked_add_days(Days::new(14))
                .expect("payment date out of range"),
            PaymentFrequency::Weekly | PaymentFrequency::AcceleratedWeekly => self
                .current
                .checked_add_days(Days::new(7))
                .expect("payment date out of range"),
        };
        self.current = next;
        next
    }
}

/// Add whole calendar months, clamping the day to the target month's length
fn add_months_clamped(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .expect("payment date out of range")
}

/// First 1st-or-15th strictly after the given date
fn next_semi_monthly(date: NaiveDate) -> NaiveDate {
    if date.day() < 15 {
        NaiveDate::from_ymd_opt(date.year(), date.month(), 15).expect("mid-month date")
    } else {
        add_months_clamped(
            NaiveDate::from_ymd_opt(date.year(), date.month(), 1).expect("month start"),
            1,
        )
    }
}

impl AmortizationSchedule {
    /// Generate the schedule for a mortgage in a single pass.
    ///
    /// The final period forces its principal portion to the exact remaining
    /// balance so the schedule terminates at 0.00, never a residual
    /// fraction of a cent.
    pub fn generate(terms: &MortgageTerms, span: ScheduleSpan) -> Result<Self, ForecastError> {
        terms.validate()?;

        let periodic_rate = periodic_rate_for(terms)?;
        let total_periods = terms.total_periods();
        let payment = payment_amount(
            terms.principal,
            periodic_rate,
            total_periods,
            terms.payment_frequency,
        )?;

        let has_renewal = terms.term_months < terms.amortization_months;
        let term_end = add_months_clamped(terms.start_date, terms.term_months);

        let mut dates = PaymentDates::new(terms.payment_frequency, terms.start_date);
        let mut periods = Vec::new();
        let mut renewal = None;
        let mut balance = terms.principal;

        for sequence in 1..=total_periods {
            let payment_date = dates.next();

            if has_renewal && renewal.is_none() && payment_date > term_end {
                renewal = Some(RenewalPoint {
                    date: term_end,
                    balance,
                    periods_elapsed: sequence - 1,
                });
                if span == ScheduleSpan::TermOnly {
                    break;
                }
            }

            let interest_portion = round_to_cent(balance * periodic_rate);
            let mut principal_portion = round_to_cent(payment - interest_portion);
            if sequence == total_periods || principal_portion >= balance - CENT_EPSILON {
                principal_portion = balance;
            }
            let total_payment = if (principal_portion - balance).abs() < CENT_EPSILON {
                // Reconciliation row: pay off the exact balance
                round_to_cent(interest_portion + principal_portion)
            } else {
                payment
            };

            balance = round_to_cent(balance - principal_portion);

            periods.push(PaymentPeriod {
                sequence,
                payment_date,
                interest_portion,
                principal_portion,
                total_payment,
                remaining_balance: balance,
            });

            if balance <= 0.0 {
                balance = 0.0;
                break;
            }
        }

        // Term may outlast the amortization row count only for accelerated
        // schedules that paid off early; no renewal exists in that case.
        Ok(Self {
            periods,
            original_principal: terms.principal,
            payment_amount: payment,
            periodic_rate,
            renewal,
        })
    }

    /// Balance outstanding as of a calendar date (principal before the
    /// first payment, zero after payoff)
    pub fn balance_at(&self, date: NaiveDate) -> f64 {
        self.periods
            .iter()
            .rev()
            .find(|p| p.payment_date <= date)
            .map(|p| p.remaining_balance)
            .unwrap_or(self.original_principal)
    }

    /// Balance outstanding at the end of a calendar year
    pub fn balance_at_year_end(&self, year: i32) -> f64 {
        let year_end = NaiveDate::from_ymd_opt(year, 12, 31).expect("year end date");
        self.balance_at(year_end)
    }

    /// Interest paid across payments falling in a calendar year
    pub fn interest_paid_in_year(&self, year: i32) -> f64 {
        self.periods
            .iter()
            .filter(|p| p.payment_date.year() == year)
            .map(|p| p.interest_portion)
            .sum()
    }

    /// Principal repaid across payments falling in a calendar year
    pub fn principal_paid_in_year(&self, year: i32) -> f64 {
        self.periods
            .iter()
            .filter(|p| p.payment_date.year() == year)
            .map(|p| p.principal_portion)
            .sum()
    }

    /// Total interest over the generated rows
    pub fn total_interest(&self) -> f64 {
        self.periods.iter().map(|p| p.interest_portion).sum()
    }

    /// Total principal over the generated rows
    pub fn total_principal(&self) -> f64 {
        self.periods.iter().map(|p| p.principal_portion).sum()
    }

    /// Date of the last generated payment
    pub fn last_payment_date(&self) -> Option<NaiveDate> {
        self.periods.last().map(|p| p.payment_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mortgage::terms::MortgageTerms;
    use approx::assert_abs_diff_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn renewal_example() -> MortgageTerms {
        MortgageTerms::fixed(
            492_000.0,
            0.0269,
            300,
            60,
            PaymentFrequency::BiWeekly,
            date(2019, 2, 4),
        )
    }

    #[test]
    fn test_biweekly_term_has_130_periods() {
        let schedule =
            AmortizationSchedule::generate(&renewal_example(), ScheduleSpan::TermOnly).unwrap();
        assert_eq!(schedule.periods.len(), 130);
        assert!(schedule.renewal.is_some());
        assert_eq!(schedule.renewal.unwrap().periods_elapsed, 130);
    }

    #[test]
    fn test_term_balance_matches_declining_balance_simulation() {
        let terms = renewal_example();
        let schedule = AmortizationSchedule::generate(&terms, ScheduleSpan::TermOnly).unwrap();

        // Re-run the declining balance by hand with the same statement
        // rounding and compare to the cent
        let rate = schedule.periodic_rate;
        let payment = schedule.payment_amount;
        let mut balance = terms.principal;
        for _ in 0..130 {
            let interest = (balance * rate * 100.0).round() / 100.0;
            let principal = ((payment - interest) * 100.0).round() / 100.0;
            balance = ((balance - principal) * 100.0).round() / 100.0;
        }

        let last = schedule.periods.last().unwrap();
        assert_abs_diff_eq!(last.remaining_balance, balance, epsilon = 0.005);
        assert_abs_diff_eq!(schedule.renewal.unwrap().balance, balance, epsilon = 0.005);
    }

    #[test]
    fn test_full_amortization_terminates_at_exactly_zero() {
        let terms = MortgageTerms::fixed(
            250_000.0,
            0.0549,
            300,
            300,
            PaymentFrequency::Monthly,
            date(2021, 6, 15),
        );
        let schedule =
            AmortizationSchedule::generate(&terms, ScheduleSpan::FullAmortization).unwrap();

        let last = schedule.periods.last().unwrap();
        assert_eq!(last.remaining_balance, 0.0);
        assert_eq!(schedule.periods.len(), 300);
        assert!(schedule.renewal.is_none());
    }

    #[test]
    fn test_principal_portions_sum_to_principal() {
        let terms = MortgageTerms::fixed(
            317_450.0,
            0.0419,
            240,
            240,
            PaymentFrequency::Monthly,
            date(2020, 3, 1),
        );
        let schedule =
            AmortizationSchedule::generate(&terms, ScheduleSpan::FullAmortization).unwrap();
        assert_abs_diff_eq!(schedule.total_principal(), 317_450.0, epsilon = 1e-6);
    }

    #[test]
    fn test_rows_balance_to_the_cent() {
        let terms = renewal_example();
        let schedule =
            AmortizationSchedule::generate(&terms, ScheduleSpan::FullAmortization).unwrap();

        for row in &schedule.periods {
            assert_abs_diff_eq!(
                row.interest_portion + row.principal_portion,
                row.total_payment,
                epsilon = 1e-9
            );
        }

        let mut prior = terms.principal;
        for row in &schedule.periods {
            assert_abs_diff_eq!(
                prior - row.principal_portion,
                row.remaining_balance,
                epsilon = 1e-9
            );
            assert!(row.remaining_balance >= 0.0);
            prior = row.remaining_balance;
        }
    }

    #[test]
    fn test_monthly_dates_clamp_to_short_months() {
        let terms = MortgageTerms::fixed(
            100_000.0,
            0.05,
            300,
            300,
            PaymentFrequency::Monthly,
            date(2019, 1, 31),
        );
        let schedule =
            AmortizationSchedule::generate(&terms, ScheduleSpan::FullAmortization).unwrap();

        assert_eq!(schedule.periods[0].payment_date, date(2019, 2, 28));
        assert_eq!(schedule.periods[1].payment_date, date(2019, 3, 31));
        assert_eq!(schedule.periods[2].payment_date, date(2019, 4, 30));
        // Leap February clamps to the 29th
        assert_eq!(schedule.periods[12].payment_date, date(2020, 2, 29));
        assert_eq!(schedule.periods[13].payment_date, date(2020, 3, 31));
    }

    #[test]
    fn test_biweekly_dates_are_always_14_days_apart() {
        let schedule =
            AmortizationSchedule::generate(&renewal_example(), ScheduleSpan::FullAmortization)
                .unwrap();
        assert_eq!(schedule.periods[0].payment_date, date(2019, 2, 18));
        for pair in schedule.periods.windows(2) {
            let gap = pair[1].payment_date - pair[0].payment_date;
            assert_eq!(gap.num_days(), 14);
        }
    }

    #[test]
    fn test_weekly_dates_are_7_days_apart() {
        let terms = MortgageTerms::fixed(
            200_000.0,
            0.0349,
            120,
            120,
            PaymentFrequency::Weekly,
            date(2022, 11, 30),
        );
        let schedule =
            AmortizationSchedule::generate(&terms, ScheduleSpan::FullAmortization).unwrap();
        for pair in schedule.periods.windows(2) {
            assert_eq!((pair[1].payment_date - pair[0].payment_date).num_days(), 7);
        }
    }

    #[test]
    fn test_semi_monthly_pays_on_first_and_fifteenth() {
        let terms = MortgageTerms::fixed(
            150_000.0,
            0.045,
            120,
            120,
            PaymentFrequency::SemiMonthly,
            date(2020, 1, 10),
        );
        let schedule =
            AmortizationSchedule::generate(&terms, ScheduleSpan::FullAmortization).unwrap();

        assert_eq!(schedule.periods[0].payment_date, date(2020, 1, 15));
        assert_eq!(schedule.periods[1].payment_date, date(2020, 2, 1));
        assert_eq!(schedule.periods[2].payment_date, date(2020, 2, 15));
        for row in &schedule.periods {
            let day = row.payment_date.day();
            assert!(day == 1 || day == 15);
        }
        // 24 payments per calendar year
        let in_2021 = schedule
            .periods
            .iter()
            .filter(|p| p.payment_date.year() == 2021)
            .count();
        assert_eq!(in_2021, 24);
    }

    #[test]
    fn test_zero_rate_schedule_has_no_interest() {
        let terms = MortgageTerms::fixed(
            100_000.0,
            0.0,
            120,
            120,
            PaymentFrequency::Monthly,
            date(2020, 1, 1),
        );
        let schedule =
            AmortizationSchedule::generate(&terms, ScheduleSpan::FullAmortization).unwrap();

        assert_eq!(schedule.payment_amount, 833.33);
        for row in &schedule.periods {
            assert_eq!(row.interest_portion, 0.0);
        }
        assert_eq!(schedule.periods.last().unwrap().remaining_balance, 0.0);
        assert_abs_diff_eq!(schedule.total_principal(), 100_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_accelerated_biweekly_pays_off_sooner() {
        let base = MortgageTerms::fixed(
            400_000.0,
            0.049,
            300,
            300,
            PaymentFrequency::BiWeekly,
            date(2020, 1, 6),
        );
        let mut accelerated = base.clone();
        accelerated.payment_frequency = PaymentFrequency::AcceleratedBiWeekly;

        let plain = AmortizationSchedule::generate(&base, ScheduleSpan::FullAmortization).unwrap();
        let fast =
            AmortizationSchedule::generate(&accelerated, ScheduleSpan::FullAmortization).unwrap();

        assert!(fast.periods.len() < plain.periods.len());
        assert_eq!(fast.periods.last().unwrap().remaining_balance, 0.0);
        assert!(fast.total_interest() < plain.total_interest());
    }

    #[test]
    fn test_balance_at_date() {
        let terms = renewal_example();
        let schedule = AmortizationSchedule::generate(&terms, ScheduleSpan::TermOnly).unwrap();

        // Before the first payment the full principal is outstanding
        assert_eq!(schedule.balance_at(date(2019, 2, 10)), 492_000.0);

        // After the first payment the first row's balance applies
        let first = &schedule.periods[0];
        assert_eq!(
            schedule.balance_at(first.payment_date),
            first.remaining_balance
        );

        let last = schedule.periods.last().unwrap();
        assert_eq!(schedule.balance_at(date(2030, 1, 1)), last.remaining_balance);
    }

    #[test]
    fn test_year_accessors_partition_the_schedule() {
        let terms = MortgageTerms::fixed(
            275_000.0,
            0.0389,
            300,
            300,
            PaymentFrequency::Monthly,
            date(2020, 7, 1),
        );
        let schedule =
            AmortizationSchedule::generate(&terms, ScheduleSpan::FullAmortization).unwrap();

        let years: Vec<i32> = (2020..=2045).collect();
        let interest_sum: f64 = years.iter().map(|&y| schedule.interest_paid_in_year(y)).sum();
        let principal_sum: f64 = years
            .iter()
            .map(|&y| schedule.principal_paid_in_year(y))
            .sum();

        assert_abs_diff_eq!(interest_sum, schedule.total_interest(), epsilon = 1e-6);
        assert_abs_diff_eq!(principal_sum, 275_000.0, epsilon = 1e-6);
    }
}
