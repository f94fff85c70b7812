//! Load raw expenses from CSV

use std::error::Error;
use std::path::Path;

use chrono::NaiveDateTime;
use csv::Reader;
use rust_decimal::Decimal;

use super::data::{Expense, TIMESTAMP_FORMAT};

/// Raw CSV row: `date,amount` with a header line.
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "date")]
    date: String,
    #[serde(rename = "amount")]
    amount: Decimal,
}

impl CsvRow {
    fn to_expense(self) -> Result<Expense, Box<dyn Error>> {
        let date = NaiveDateTime::parse_from_str(&self.date, TIMESTAMP_FORMAT)
            .map_err(|e| format!("bad date '{}': {}", self.date, e))?;
        Ok(Expense {
            date,
            amount: self.amount,
        })
    }
}

/// Load all expenses from a CSV file.
pub fn load_expenses<P: AsRef<Path>>(path: P) -> Result<Vec<Expense>, Box<dyn Error>> {
    let mut reader = Reader::from_path(path)?;
    let mut expenses = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        expenses.push(row.to_expense()?);
    }

    log::info!("loaded {} expenses", expenses.len());
    Ok(expenses)
}

/// Load expenses from any reader (e.g., string buffer, network stream).
pub fn load_expenses_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<Vec<Expense>, Box<dyn Error>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut expenses = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        expenses.push(row.to_expense()?);
    }

    Ok(expenses)
}
