//! Expense parsing: ceiling derivation and exact running totals

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::error::EngineError;
use crate::money::{ceil_to_hundred, round_currency};

use super::data::{Expense, ParseTotals, ParsedLedger, Transaction};

/// Parse a batch of raw expenses into transactions with running totals.
///
/// Dates must be unique within the batch; any duplicate aborts the whole
/// parse with no partial result. Totals accumulate in exact decimal and are
/// rounded to currency precision only at output. Output order = input order.
pub fn parse_expenses(expenses: &[Expense]) -> Result<ParsedLedger, EngineError> {
    let mut transactions = Vec::with_capacity(expenses.len());
    let mut seen_dates = HashSet::with_capacity(expenses.len());
    let mut total_amount = Decimal::ZERO;
    let mut total_ceiling = Decimal::ZERO;
    let mut total_remanent = Decimal::ZERO;

    for expense in expenses {
        if !seen_dates.insert(expense.date) {
            return Err(EngineError::DuplicateDate);
        }

        let ceiling = ceil_to_hundred(expense.amount);
        let remanent = ceiling - expense.amount;

        transactions.push(Transaction {
            date: expense.date,
            amount: round_currency(expense.amount),
            ceiling: round_currency(ceiling),
            remanent: round_currency(remanent),
        });

        total_amount += expense.amount;
        total_ceiling += ceiling;
        total_remanent += remanent;
    }

    Ok(ParsedLedger {
        transactions,
        totals: ParseTotals {
            total_expense: round_currency(total_amount),
            total_ceiling: round_currency(total_ceiling),
            total_remanent: round_currency(total_remanent),
        },
    })
}
