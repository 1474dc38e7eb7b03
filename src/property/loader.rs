//! Load property records from the portfolio CSV
//!
//! Mortgage columns may be left empty for a property held free and clear;
//! the record then loads with no mortgage rather than a zeroed one.

use std::path::Path;

use csv::Reader;

use crate::error::ForecastError;
use crate::mortgage::loader::{parse_frequency, parse_rate_type, parse_start_date};
use crate::mortgage::MortgageTerms;
use crate::property::data::{PropertyRecord, PropertySnapshot};

/// Raw CSV row matching the portfolio export columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "PropertyID")]
    property_id: u32,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "AnnualRent")]
    annual_rent: f64,
    #[serde(rename = "OperatingExpenses")]
    operating_expenses: f64,
    #[serde(rename = "MarketValue")]
    market_value: f64,
    #[serde(rename = "CashInvested")]
    cash_invested: f64,
    #[serde(rename = "MortgagePrincipal")]
    mortgage_principal: Option<f64>,
    #[serde(rename = "MortgageRate")]
    mortgage_rate: Option<f64>,
    #[serde(rename = "RateType")]
    rate_type: Option<String>,
    #[serde(rename = "VariableSpread")]
    variable_spread: Option<f64>,
    #[serde(rename = "AmortizationMonths")]
    amortization_months: Option<u32>,
    #[serde(rename = "TermMonths")]
    term_months: Option<u32>,
    #[serde(rename = "PaymentFrequency")]
    payment_frequency: Option<String>,
    #[serde(rename = "StartDate")]
    start_date: Option<String>,
}

impl CsvRow {
    fn to_record(self) -> Result<PropertyRecord, ForecastError> {
        let snapshot = PropertySnapshot::new(
            self.annual_rent,
            self.operating_expenses,
            self.market_value,
            self.cash_invested,
        );
        snapshot.validate()?;

        let mortgage = match self.mortgage_principal {
            None => None,
            Some(principal) => {
                let missing = |field: &'static str| {
                    ForecastError::invalid_input(field, "missing for mortgaged property")
                };
                let rate_type =
                    parse_rate_type(self.rate_type.as_deref().ok_or_else(|| missing("rate_type"))?)?;
                let terms = MortgageTerms {
                    principal,
                    nominal_annual_rate: self.mortgage_rate.ok_or_else(|| missing("mortgage_rate"))?,
                    rate_type,
                    variable_spread: self.variable_spread,
                    amortization_months: self
                        .amortization_months
                        .ok_or_else(|| missing("amortization_months"))?,
                    term_months: self.term_months.ok_or_else(|| missing("term_months"))?,
                    payment_frequency: parse_frequency(
                        self.payment_frequency
                            .as_deref()
                            .ok_or_else(|| missing("payment_frequency"))?,
                    )?,
                    start_date: parse_start_date(
                        self.start_date.as_deref().ok_or_else(|| missing("start_date"))?,
                    )?,
                };
                terms.validate()?;
                Some(terms)
            }
        };

        Ok(PropertyRecord {
            property_id: self.property_id,
            name: self.name,
            snapshot,
            mortgage,
        })
    }
}

/// Load all property records from a CSV file
pub fn load_properties<P: AsRef<Path>>(path: P) -> Result<Vec<PropertyRecord>, ForecastError> {
    let mut reader = Reader::from_path(path.as_ref())
        .map_err(|e| ForecastError::invalid_input("portfolio_csv", e.to_string()))?;
    read_rows(&mut reader)
}

/// Load property records from any reader
pub fn load_properties_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<Vec<PropertyRecord>, ForecastError> {
    let mut csv_reader = Reader::from_reader(reader);
    read_rows(&mut csv_reader)
}

fn read_rows<R: std::io::Read>(
    reader: &mut Reader<R>,
) -> Result<Vec<PropertyRecord>, ForecastError> {
    let mut records = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow =
            result.map_err(|e| ForecastError::invalid_input("portfolio_csv", e.to_string()))?;
        records.push(row.to_record()?);
    }
    Ok(records)
}
