//! Temporal constraint resolver: sweep-line merge of Q/P/K rules
//!
//! Single pass over the ledger in date order. Each rule boundary is admitted
//! and evicted exactly once, so a call costs O((n+q+p+k) log(n+q+p+k))
//! instead of the O(n*m) full re-scan per transaction.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::ledger::{check_transaction, InvalidTransaction, Transaction};
use crate::money::round_currency;
use crate::rules::{
    validate_periods, EvalPeriod, EvalWindow, ExtraPeriod, ExtraWindow, FixedPeriod, FixedWindow,
    KMode,
};

/// Valid/invalid partition of a ledger, both in original request order.
/// Valid entries carry the adjusted remanent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLedger {
    pub valid: Vec<Transaction>,
    pub invalid: Vec<InvalidTransaction>,
}

const OUT_OF_K_RANGE: &str = "transaction does not fall within any k period";

/// Resolve Q/P/K rules against a transaction ledger.
///
/// Preconditions (checked before any transaction processing; violation
/// aborts the whole call): every period has start <= end, and when the
/// ledger is non-empty every period lies within the [min, max] transaction
/// date span.
///
/// Q overrides the remanent, active P extras sum on top, and the result is
/// clamped at zero. With `KMode::Strict`, a transaction covered by no K
/// period is invalid; with `KMode::Grouping`, K never gates validity.
pub fn filter_temporal_constraints(
    q: &[FixedPeriod],
    p: &[ExtraPeriod],
    k: &[EvalPeriod],
    k_mode: KMode,
    transactions: &[Transaction],
) -> Result<ResolvedLedger, EngineError> {
    let bounds = match (
        transactions.iter().map(|tx| tx.date).min(),
        transactions.iter().map(|tx| tx.date).max(),
    ) {
        (Some(min), Some(max)) => Some((min, max)),
        _ => None,
    };

    validate_periods(q, "q", bounds)?;
    validate_periods(p, "p", bounds)?;
    validate_periods(k, "k", bounds)?;

    // Sweep in date order, stable on original index for equal dates
    let mut order: Vec<usize> = (0..transactions.len()).collect();
    order.sort_by_key(|&i| (transactions[i].date, i));

    let mut q_window = FixedWindow::new(q);
    let mut p_window = ExtraWindow::new(p);
    let mut k_window = EvalWindow::new(k);

    let mut valid: Vec<(usize, Transaction)> = Vec::new();
    let mut invalid: Vec<(usize, InvalidTransaction)> = Vec::new();

    for idx in order {
        let tx = &transactions[idx];

        if let Some(message) = check_transaction(tx, None, None) {
            invalid.push((
                idx,
                InvalidTransaction {
                    transaction: tx.clone(),
                    message: message.to_string(),
                },
            ));
            continue;
        }

        let fixed = q_window.advance(tx.date);
        let extra = p_window.advance(tx.date);
        let active_k = k_window.advance(tx.date);

        let adjusted = (fixed.unwrap_or(tx.remanent) + extra).max(Decimal::ZERO);

        let in_k_range = k.is_empty() || active_k > 0;
        if k_mode == KMode::Strict && !in_k_range {
            invalid.push((
                idx,
                InvalidTransaction {
                    transaction: tx.clone(),
                    message: OUT_OF_K_RANGE.to_string(),
                },
            ));
            continue;
        }

        let mut resolved = tx.clone();
        resolved.remanent = round_currency(adjusted);
        valid.push((idx, resolved));
    }

    // Callers expect request order; the sweep needed date order
    valid.sort_by_key(|(idx, _)| *idx);
    invalid.sort_by_key(|(idx, _)| *idx);

    Ok(ResolvedLedger {
        valid: valid.into_iter().map(|(_, tx)| tx).collect(),
        invalid: invalid.into_iter().map(|(_, tx)| tx).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use rust_decimal_macros::dec;

    use crate::ledger::TIMESTAMP_FORMAT;

    fn dt(raw: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).unwrap()
    }

    fn tx(date: &str, amount: Decimal, ceiling: Decimal, remanent: Decimal) -> Transaction {
        Transaction {
            date: dt(date),
            amount,
            ceiling,
            remanent,
        }
    }

    fn fixture_ledger() -> Vec<Transaction> {
        vec![
            tx("2023-10-12 20:15:00", dec!(250), dec!(300), dec!(50)),
            tx("2023-02-28 15:49:00", dec!(375), dec!(400), dec!(25)),
            tx("2023-07-01 21:59:00", dec!(620), dec!(700), dec!(80)),
            tx("2023-12-17 08:09:00", dec!(480), dec!(500), dec!(20)),
        ]
    }

    fn fixture_q() -> Vec<FixedPeriod> {
        vec![FixedPeriod {
            fixed: dec!(0),
            start: dt("2023-07-01 00:00:00"),
            end: dt("2023-07-31 23:59:59"),
        }]
    }

    fn fixture_p() -> Vec<ExtraPeriod> {
        vec![ExtraPeriod {
            extra: dec!(25),
            start: dt("2023-10-01 08:00:00"),
            end: dt("2023-12-17 08:09:00"),
        }]
    }

    fn fixture_k() -> Vec<EvalPeriod> {
        vec![
            EvalPeriod {
                start: dt("2023-03-01 00:00:00"),
                end: dt("2023-11-30 23:59:59"),
            },
            EvalPeriod {
                start: dt("2023-02-28 15:49:00"),
                end: dt("2023-12-17 08:09:00"),
            },
        ]
    }

    #[test]
    fn test_q_override_and_p_extra_fixture() {
        let ledger = fixture_ledger();
        let resolved = filter_temporal_constraints(
            &fixture_q(),
            &fixture_p(),
            &fixture_k(),
            KMode::Grouping,
            &ledger,
        )
        .unwrap();

        assert!(resolved.invalid.is_empty());
        let remanent_of = |date: &str| {
            resolved
                .valid
                .iter()
                .find(|tx| tx.date == dt(date))
                .unwrap()
                .remanent
        };
        assert_eq!(remanent_of("2023-10-12 20:15:00"), dec!(75.0));
        assert_eq!(remanent_of("2023-07-01 21:59:00"), dec!(0.0));
        assert_eq!(remanent_of("2023-12-17 08:09:00"), dec!(45.0));
        assert_eq!(remanent_of("2023-02-28 15:49:00"), dec!(25));
    }

    #[test]
    fn test_output_keeps_request_order() {
        let ledger = fixture_ledger();
        let resolved =
            filter_temporal_constraints(&[], &[], &[], KMode::Grouping, &ledger).unwrap();
        let dates: Vec<_> = resolved.valid.iter().map(|tx| tx.date).collect();
        let expected: Vec<_> = ledger.iter().map(|tx| tx.date).collect();
        assert_eq!(dates, expected);
    }

    #[test]
    fn test_idempotent_across_calls() {
        let ledger = fixture_ledger();
        let first = filter_temporal_constraints(
            &fixture_q(),
            &fixture_p(),
            &fixture_k(),
            KMode::Strict,
            &ledger,
        )
        .unwrap();
        let second = filter_temporal_constraints(
            &fixture_q(),
            &fixture_p(),
            &fixture_k(),
            KMode::Strict,
            &ledger,
        )
        .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_active_rules_leaves_remanent_unchanged() {
        let ledger = vec![
            tx("2023-07-01 00:00:00", dec!(100), dec!(100), dec!(0)),
            tx("2023-07-10 10:00:00", dec!(350), dec!(400), dec!(50)),
            tx("2023-07-31 23:59:59", dec!(100), dec!(100), dec!(0)),
        ];
        let q = vec![FixedPeriod {
            fixed: dec!(99),
            start: dt("2023-07-01 00:00:00"),
            end: dt("2023-07-05 23:59:59"),
        }];
        let resolved =
            filter_temporal_constraints(&q, &[], &[], KMode::Grouping, &ledger).unwrap();
        assert_eq!(resolved.valid[1].remanent, dec!(50));
        assert_eq!(resolved.valid[2].remanent, dec!(0));
    }

    #[test]
    fn test_q_latest_start_wins_with_tie_on_declared_index() {
        let ledger = vec![
            tx("2023-07-01 00:00:00", dec!(100), dec!(100), dec!(0)),
            tx("2023-07-10 10:00:00", dec!(350), dec!(400), dec!(50)),
            tx("2023-07-31 23:59:59", dec!(100), dec!(100), dec!(0)),
        ];
        let q = vec![
            FixedPeriod {
                fixed: dec!(10),
                start: dt("2023-07-01 00:00:00"),
                end: dt("2023-07-31 23:59:59"),
            },
            FixedPeriod {
                fixed: dec!(20),
                start: dt("2023-07-01 00:00:00"),
                end: dt("2023-07-31 23:59:59"),
            },
            FixedPeriod {
                fixed: dec!(30),
                start: dt("2023-07-05 00:00:00"),
                end: dt("2023-07-20 23:59:59"),
            },
        ];
        let resolved =
            filter_temporal_constraints(&q, &[], &[], KMode::Grouping, &ledger).unwrap();
        let target = resolved
            .valid
            .iter()
            .find(|tx| tx.date == dt("2023-07-10 10:00:00"))
            .unwrap();
        assert_eq!(target.remanent, dec!(30));
        // Equal starts after the later rule expired: lowest declared index wins
        let late = resolved
            .valid
            .iter()
            .find(|tx| tx.date == dt("2023-07-31 23:59:59"))
            .unwrap();
        assert_eq!(late.remanent, dec!(10));
    }

    #[test]
    fn test_p_overlaps_are_summed() {
        let ledger = vec![
            tx("2023-10-01 00:00:00", dec!(100), dec!(100), dec!(0)),
            tx("2023-10-12 20:15:00", dec!(250), dec!(300), dec!(50)),
            tx("2023-10-31 23:59:59", dec!(100), dec!(100), dec!(0)),
        ];
        let p = vec![
            ExtraPeriod {
                extra: dec!(10),
                start: dt("2023-10-01 00:00:00"),
                end: dt("2023-10-31 23:59:59"),
            },
            ExtraPeriod {
                extra: dec!(5),
                start: dt("2023-10-10 00:00:00"),
                end: dt("2023-10-20 23:59:59"),
            },
        ];
        let resolved =
            filter_temporal_constraints(&[], &p, &[], KMode::Grouping, &ledger).unwrap();
        let target = resolved
            .valid
            .iter()
            .find(|tx| tx.date == dt("2023-10-12 20:15:00"))
            .unwrap();
        assert_eq!(target.remanent, dec!(65));
    }

    #[test]
    fn test_negative_extra_is_clamped_at_zero() {
        let ledger = vec![tx("2023-10-12 20:15:00", dec!(250), dec!(300), dec!(50))];
        let p = vec![ExtraPeriod {
            extra: dec!(-80),
            start: dt("2023-10-12 20:15:00"),
            end: dt("2023-10-12 20:15:00"),
        }];
        let resolved =
            filter_temporal_constraints(&[], &p, &[], KMode::Grouping, &ledger).unwrap();
        assert_eq!(resolved.valid[0].remanent, dec!(0));
    }

    #[test]
    fn test_strict_mode_invalidates_outside_k() {
        let ledger = vec![
            tx("2023-07-01 00:00:00", dec!(100), dec!(100), dec!(0)),
            tx("2023-07-20 00:00:00", dec!(100), dec!(100), dec!(0)),
        ];
        let k = vec![EvalPeriod {
            start: dt("2023-07-01 00:00:00"),
            end: dt("2023-07-10 23:59:59"),
        }];

        let strict =
            filter_temporal_constraints(&[], &[], &k, KMode::Strict, &ledger).unwrap();
        assert_eq!(strict.valid.len(), 1);
        assert_eq!(strict.invalid.len(), 1);
        assert_eq!(strict.invalid[0].message, OUT_OF_K_RANGE);

        let grouping =
            filter_temporal_constraints(&[], &[], &k, KMode::Grouping, &ledger).unwrap();
        assert!(grouping.invalid.is_empty());
    }

    #[test]
    fn test_strict_mode_with_no_k_rules_is_vacuously_in_range() {
        let ledger = fixture_ledger();
        let resolved =
            filter_temporal_constraints(&[], &[], &[], KMode::Strict, &ledger).unwrap();
        assert!(resolved.invalid.is_empty());
        assert_eq!(resolved.valid.len(), 4);
    }

    #[test]
    fn test_invalid_transaction_skips_temporal_adjustment() {
        let ledger = vec![
            tx("2023-07-01 00:00:00", dec!(100), dec!(100), dec!(0)),
            tx("2023-07-10 00:00:00", dec!(120), dec!(150), dec!(30)),
            tx("2023-07-31 23:59:59", dec!(100), dec!(100), dec!(0)),
        ];
        let resolved = filter_temporal_constraints(
            &fixture_q(),
            &[],
            &[],
            KMode::Grouping,
            &ledger,
        )
        .unwrap();
        assert_eq!(resolved.invalid.len(), 1);
        assert_eq!(
            resolved.invalid[0].message,
            "ceiling must be a multiple of 100"
        );
        // The broken transaction keeps its own remanent
        assert_eq!(resolved.invalid[0].transaction.remanent, dec!(30));
    }

    #[test]
    fn test_inverted_period_aborts_call() {
        let ledger = vec![tx("2023-10-12 20:15:00", dec!(250), dec!(300), dec!(50))];
        let q = vec![FixedPeriod {
            fixed: dec!(0),
            start: dt("2023-12-31 23:59:59"),
            end: dt("2023-01-01 00:00:00"),
        }];
        assert_eq!(
            filter_temporal_constraints(&q, &[], &[], KMode::Grouping, &ledger),
            Err(EngineError::PeriodStartAfterEnd { label: "q", index: 0 })
        );
    }

    #[test]
    fn test_out_of_bounds_period_aborts_call() {
        let ledger = fixture_ledger();
        let p = vec![ExtraPeriod {
            extra: dec!(25),
            start: dt("2023-10-01 08:00:00"),
            end: dt("2023-12-31 23:59:59"),
        }];
        assert_eq!(
            filter_temporal_constraints(&[], &p, &[], KMode::Grouping, &ledger),
            Err(EngineError::PeriodOutOfBounds { label: "p", index: 0 })
        );
    }

    #[test]
    fn test_empty_ledger_accepts_any_well_formed_periods() {
        let resolved = filter_temporal_constraints(
            &fixture_q(),
            &fixture_p(),
            &fixture_k(),
            KMode::Strict,
            &[],
        )
        .unwrap();
        assert!(resolved.valid.is_empty());
        assert!(resolved.invalid.is_empty());
    }
}
