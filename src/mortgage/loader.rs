//! Load mortgage records from CSV

use std::path::Path;

use chrono::NaiveDate;
use csv::Reader;

use crate::error::ForecastError;
use crate::mortgage::terms::{MortgageTerms, PaymentFrequency, RateType};

/// Raw CSV row matching the mortgage export columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Principal")]
    principal: f64,
    #[serde(rename = "AnnualRate")]
    annual_rate: f64,
    #[serde(rename = "RateType")]
    rate_type: String,
    #[serde(rename = "VariableSpread")]
    variable_spread: Option<f64>,
    #[serde(rename = "AmortizationMonths")]
    amortization_months: u32,
    #[serde(rename = "TermMonths")]
    term_months: u32,
    #[serde(rename = "PaymentFrequency")]
    payment_frequency: String,
    #[serde(rename = "StartDate")]
    start_date: String,
}

pub(crate) fn parse_rate_type(value: &str) -> Result<RateType, ForecastError> {
    match value {
        "Fixed" => Ok(RateType::Fixed),
        "Variable" => Ok(RateType::Variable),
        other => Err(ForecastError::invalid_input(
            "rate_type",
            format!("unknown RateType: {}", other),
        )),
    }
}

pub(crate) fn parse_frequency(value: &str) -> Result<PaymentFrequency, ForecastError> {
    match value {
        "Monthly" => Ok(PaymentFrequency::Monthly),
        "SemiMonthly" => Ok(PaymentFrequency::SemiMonthly),
        "BiWeekly" => Ok(PaymentFrequency::BiWeekly),
        "AcceleratedBiWeekly" => Ok(PaymentFrequency::AcceleratedBiWeekly),
        "Weekly" => Ok(PaymentFrequency::Weekly),
        "AcceleratedWeekly" => Ok(PaymentFrequency::AcceleratedWeekly),
        other => Err(ForecastError::invalid_input(
            "payment_frequency",
            format!("unknown PaymentFrequency: {}", other),
        )),
    }
}

pub(crate) fn parse_start_date(value: &str) -> Result<NaiveDate, ForecastError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| {
        ForecastError::invalid_input("start_date", format!("{}: {}", value, e))
    })
}

impl CsvRow {
    fn to_terms(self) -> Result<MortgageTerms, ForecastError> {
        let rate_type = parse_rate_type(&self.rate_type)?;
        let terms = MortgageTerms {
            principal: self.principal,
            nominal_annual_rate: self.annual_rate,
            rate_type,
            variable_spread: match rate_type {
                RateType::Fixed => None,
                RateType::Variable => self.variable_spread,
            },
            amortization_months: self.amortization_months,
            term_months: self.term_months,
            payment_frequency: parse_frequency(&self.payment_frequency)?,
            start_date: parse_start_date(&self.start_date)?,
        };
        terms.validate()?;
        Ok(terms)
    }
}

/// Load all mortgage records from a CSV file
pub fn load_mortgages<P: AsRef<Path>>(path: P) -> Result<Vec<MortgageTerms>, ForecastError> {
    let mut reader = Reader::from_path(path.as_ref()).map_err(|e| {
        ForecastError::invalid_input("mortgage_csv", e.to_string())
    })?;
    read_rows(&mut reader)
}

/// Load mortgage records from any reader (e.g. a string buffer)
pub fn load_mortgages_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<Vec<MortgageTerms>, ForecastError> {
    let mut csv_reader = Reader::from_reader(reader);
    read_rows(&mut csv_reader)
}

fn read_rows<R: std::io::Read>(
    reader: &mut Reader<R>,
) -> Result<Vec<MortgageTerms>, ForecastError> {
    let mut mortgages = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow =
            result.map_err(|e| ForecastError::invalid_input("mortgage_csv", e.to_string()))?;
        mortgages.push(row.to_terms()?);
    }
    Ok(mortgages)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Principal,AnnualRate,RateType,VariableSpread,AmortizationMonths,TermMonths,PaymentFrequency,StartDate
492000.00,0.0269,Fixed,,300,60,BiWeekly,2019-02-04
310000.00,0.0445,Variable,-0.0090,300,60,Monthly,2021-09-15
";

    #[test]
    fn test_load_from_reader() {
        let mortgages = load_mortgages_from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(mortgages.len(), 2);

        let first = &mortgages[0];
        assert_eq!(first.principal, 492_000.0);
        assert_eq!(first.rate_type, RateType::Fixed);
        assert_eq!(first.payment_frequency, PaymentFrequency::BiWeekly);
        assert_eq!(first.variable_spread, None);

        let second = &mortgages[1];
        assert_eq!(second.rate_type, RateType::Variable);
        assert_eq!(second.variable_spread, Some(-0.009));
    }

    #[test]
    fn test_unknown_frequency_rejected() {
        let bad = "\
Principal,AnnualRate,RateType,VariableSpread,AmortizationMonths,TermMonths,PaymentFrequency,StartDate
100000.00,0.05,Fixed,,300,60,Fortnightly,2020-01-01
";
        assert!(load_mortgages_from_reader(bad.as_bytes()).is_err());
    }

    #[test]
    fn test_invalid_term_rejected_at_load() {
        let bad = "\
Principal,AnnualRate,RateType,VariableSpread,AmortizationMonths,TermMonths,PaymentFrequency,StartDate
100000.00,0.05,Fixed,,60,120,Monthly,2020-01-01
";
        assert!(load_mortgages_from_reader(bad.as_bytes()).is_err());
    }
}
