//! Engine facade over the four core operations
//!
//! The engine is a pure value-in/value-out surface: no I/O, no logging, no
//! ambient lookups. It is constructible with zero dependencies and safe to
//! call from many threads in parallel; every invocation builds fresh local
//! structures.

use rust_decimal::Decimal;

use crate::error::EngineError;
use crate::ledger::{self, Expense, ParsedLedger, Transaction, ValidationBuckets};
use crate::projection::{self, ResolvedLedger, ReturnsProjection};
use crate::rules::{EvalPeriod, ExtraPeriod, FixedPeriod, KMode};

/// Stateless savings engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct SavingsEngine;

impl SavingsEngine {
    pub fn new() -> Self {
        Self
    }

    /// Parse raw expenses into transactions with running totals.
    /// A duplicate date aborts the whole batch.
    pub fn parse_expenses(&self, expenses: &[Expense]) -> Result<ParsedLedger, EngineError> {
        ledger::parse_expenses(expenses)
    }

    /// Validate transactions against wage/budget constraints, routing repeat
    /// dates to a lenient duplicates bucket.
    pub fn validate_transactions(
        &self,
        wage: Decimal,
        max_invest: Option<Decimal>,
        transactions: &[Transaction],
    ) -> ValidationBuckets {
        ledger::validate_transactions(wage, max_invest, transactions)
    }

    /// Resolve Q/P/K rules against the ledger into a valid/invalid partition.
    pub fn filter_temporal_constraints(
        &self,
        q: &[FixedPeriod],
        p: &[ExtraPeriod],
        k: &[EvalPeriod],
        k_mode: KMode,
        transactions: &[Transaction],
    ) -> Result<ResolvedLedger, EngineError> {
        projection::filter_temporal_constraints(q, p, k, k_mode, transactions)
    }

    /// Resolve the ledger, then project investment returns per K window
    /// through the named channel.
    #[allow(clippy::too_many_arguments)]
    pub fn calculate_returns(
        &self,
        age: u32,
        wage: Decimal,
        inflation: Decimal,
        q: &[FixedPeriod],
        p: &[ExtraPeriod],
        k: &[EvalPeriod],
        k_mode: KMode,
        transactions: &[Transaction],
        channel: &str,
    ) -> Result<ReturnsProjection, EngineError> {
        projection::calculate_returns(
            age,
            wage,
            inflation,
            q,
            p,
            k,
            k_mode,
            transactions,
            channel,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use rust_decimal_macros::dec;

    use crate::ledger::TIMESTAMP_FORMAT;

    fn expense(date: &str, amount: Decimal) -> Expense {
        Expense {
            date: NaiveDateTime::parse_from_str(date, TIMESTAMP_FORMAT).unwrap(),
            amount,
        }
    }

    #[test]
    fn test_parse_validate_filter_returns_pipeline() {
        let engine = SavingsEngine::new();

        let parsed = engine
            .parse_expenses(&[
                expense("2023-10-12 20:15:00", dec!(250)),
                expense("2023-02-28 15:49:00", dec!(375)),
                expense("2023-07-01 21:59:00", dec!(620)),
                expense("2023-12-17 08:09:00", dec!(480)),
            ])
            .unwrap();
        assert_eq!(parsed.totals.total_remanent, dec!(175.00));

        let buckets =
            engine.validate_transactions(dec!(50000), None, &parsed.transactions);
        assert_eq!(buckets.valid.len(), 4);
        assert!(buckets.invalid.is_empty());
        assert!(buckets.duplicates.is_empty());

        let resolved = engine
            .filter_temporal_constraints(&[], &[], &[], KMode::Grouping, &buckets.valid)
            .unwrap();
        assert_eq!(resolved.valid.len(), 4);

        let k = vec![EvalPeriod {
            start: resolved.valid.iter().map(|tx| tx.date).min().unwrap(),
            end: resolved.valid.iter().map(|tx| tx.date).max().unwrap(),
        }];
        let projection = engine
            .calculate_returns(
                29,
                dec!(50000),
                dec!(0.055),
                &[],
                &[],
                &k,
                KMode::Grouping,
                &resolved.valid,
                "retirement",
            )
            .unwrap();
        assert_eq!(projection.savings_by_dates[0].amount, dec!(175.00));
    }
}
