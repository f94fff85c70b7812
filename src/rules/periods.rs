//! Q/P/K period types and their preconditions

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::ledger::timestamp;

/// A time window with inclusive endpoints.
pub trait Period {
    fn start(&self) -> NaiveDateTime;
    fn end(&self) -> NaiveDateTime;
}

/// Q rule: while active, replaces a transaction's remanent with `fixed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedPeriod {
    pub fixed: Decimal,

    #[serde(with = "timestamp")]
    pub start: NaiveDateTime,

    #[serde(with = "timestamp")]
    pub end: NaiveDateTime,
}

/// P rule: while active, `extra` sums additively into the resolved remanent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraPeriod {
    pub extra: Decimal,

    #[serde(with = "timestamp")]
    pub start: NaiveDateTime,

    #[serde(with = "timestamp")]
    pub end: NaiveDateTime,
}

/// K rule: gates validity in strict mode and buckets aggregated returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalPeriod {
    #[serde(with = "timestamp")]
    pub start: NaiveDateTime,

    #[serde(with = "timestamp")]
    pub end: NaiveDateTime,
}

impl Period for FixedPeriod {
    fn start(&self) -> NaiveDateTime {
        self.start
    }
    fn end(&self) -> NaiveDateTime {
        self.end
    }
}

impl Period for ExtraPeriod {
    fn start(&self) -> NaiveDateTime {
        self.start
    }
    fn end(&self) -> NaiveDateTime {
        self.end
    }
}

impl Period for EvalPeriod {
    fn start(&self) -> NaiveDateTime {
        self.start
    }
    fn end(&self) -> NaiveDateTime {
        self.end
    }
}

/// How K periods are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KMode {
    /// K buckets results only
    #[default]
    Grouping,
    /// K also gates transaction validity
    Strict,
}

/// Check period preconditions for one rule set.
///
/// Every period must have start <= end. When the ledger is non-empty,
/// `bounds` carries its [min, max] date span and every period must be fully
/// contained in it. Violations abort the whole call.
pub fn validate_periods<P: Period>(
    periods: &[P],
    label: &'static str,
    bounds: Option<(NaiveDateTime, NaiveDateTime)>,
) -> Result<(), EngineError> {
    for (index, period) in periods.iter().enumerate() {
        if period.start() > period.end() {
            return Err(EngineError::PeriodStartAfterEnd { label, index });
        }
        if let Some((min_date, max_date)) = bounds {
            if period.start() < min_date || period.end() > max_date {
                return Err(EngineError::PeriodOutOfBounds { label, index });
            }
        }
    }
    Ok(())
}
