//! Per-transaction domain checks and duplicate-date bucketing

use std::collections::HashSet;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::money::round_currency;

use super::data::{InvalidTransaction, Transaction};

/// Amounts at or above this cap are rejected.
pub const AMOUNT_CAP: Decimal = dec!(500000);

/// Output of [`validate_transactions`]: three disjoint buckets covering every
/// input transaction exactly once, each preserving relative order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationBuckets {
    pub valid: Vec<Transaction>,
    pub invalid: Vec<InvalidTransaction>,
    pub duplicates: Vec<Transaction>,
}

/// Run the per-transaction rule chain; first failure wins.
///
/// `wage` and `max_invest` are optional constraint inputs: the temporal
/// resolver runs the chain without them, the validator with them.
pub fn check_transaction(
    tx: &Transaction,
    wage: Option<Decimal>,
    max_invest: Option<Decimal>,
) -> Option<&'static str> {
    if tx.amount < Decimal::ZERO || tx.ceiling < Decimal::ZERO || tx.remanent < Decimal::ZERO {
        return Some("amount, ceiling and remanent must be non-negative");
    }
    if tx.amount >= AMOUNT_CAP {
        return Some("amount must be less than 500000");
    }
    if tx.ceiling < tx.amount {
        return Some("ceiling cannot be less than amount");
    }
    if tx.ceiling % dec!(100) != Decimal::ZERO {
        return Some("ceiling must be a multiple of 100");
    }
    if round_currency(tx.ceiling - tx.amount) != round_currency(tx.remanent) {
        return Some("remanent must equal ceiling - amount");
    }
    if let Some(wage) = wage {
        if wage <= Decimal::ZERO && tx.remanent > Decimal::ZERO {
            return Some("wage must be greater than 0 when remanent exists");
        }
        if tx.remanent > wage {
            return Some("remanent cannot exceed wage");
        }
    }
    if let Some(max_invest) = max_invest {
        if tx.remanent > max_invest {
            return Some("remanent cannot exceed maxInvest");
        }
    }
    None
}

/// Validate a transaction batch against wage/budget constraints.
///
/// Duplicate-date handling is lenient here: the first occurrence of a date is
/// validated normally, every later occurrence is routed to the `duplicates`
/// bucket regardless of its own validity.
pub fn validate_transactions(
    wage: Decimal,
    max_invest: Option<Decimal>,
    transactions: &[Transaction],
) -> ValidationBuckets {
    let mut valid = Vec::new();
    let mut invalid = Vec::new();
    let mut duplicates = Vec::new();
    let mut seen_dates = HashSet::with_capacity(transactions.len());

    for tx in transactions {
        if !seen_dates.insert(tx.date) {
            duplicates.push(tx.clone());
            continue;
        }

        match check_transaction(tx, Some(wage), max_invest) {
            Some(message) => invalid.push(InvalidTransaction {
                transaction: tx.clone(),
                message: message.to_string(),
            }),
            None => valid.push(tx.clone()),
        }
    }

    ValidationBuckets {
        valid,
        invalid,
        duplicates,
    }
}
