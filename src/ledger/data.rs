//! Ledger value objects shared across the engine

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Wire format for all ledger and rule timestamps: second precision, no zone.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Serde adapter for [`TIMESTAMP_FORMAT`] timestamps.
pub mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// A raw expense entry before parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// When the expense occurred
    #[serde(with = "timestamp", alias = "timestamp")]
    pub date: NaiveDateTime,

    /// Spent amount
    pub amount: Decimal,
}

/// A parsed ledger entry: amount, rounded-up ceiling, and the remanent
/// (ceiling - amount) earmarked for savings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(with = "timestamp", alias = "timestamp")]
    pub date: NaiveDateTime,

    pub amount: Decimal,

    /// Amount rounded up to the next multiple of 100
    pub ceiling: Decimal,

    /// ceiling - amount, at currency precision
    pub remanent: Decimal,
}

/// A transaction rejected by validation, with the first failing rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvalidTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,

    pub message: String,
}

/// Running totals over a parse batch, at currency precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseTotals {
    pub total_expense: Decimal,
    pub total_ceiling: Decimal,
    pub total_remanent: Decimal,
}

/// Result of parsing an expense batch. Transactions keep input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedLedger {
    pub transactions: Vec<Transaction>,
    pub totals: ParseTotals,
}
