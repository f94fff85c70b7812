//! Investment return projector: K-window bucketing and channel growth

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::ledger::{timestamp, Transaction};
use crate::money::{compound_factor, round_currency};
use crate::rules::{EvalPeriod, ExtraPeriod, FixedPeriod, KMode};

use super::channel::{Channel, InvestmentContext};
use super::resolver::filter_temporal_constraints;

/// Savings aggregated over one K period, grown through a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsByDate {
    #[serde(with = "timestamp")]
    pub start: NaiveDateTime,

    #[serde(with = "timestamp")]
    pub end: NaiveDateTime,

    /// Sum of resolved remanents dated inside [start, end]
    pub amount: Decimal,

    /// Inflation-adjusted growth over the horizon, net of the principal
    pub profits: Decimal,

    pub tax_benefit: Decimal,
}

/// Returns projection response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnsProjection {
    pub channel: String,

    /// Total amount over all valid transactions, not only those inside K windows
    pub transactions_total_amount: Decimal,

    pub transactions_total_ceiling: Decimal,

    /// One entry per K period, in K-list order
    pub savings_by_dates: Vec<SavingsByDate>,
}

/// Retirement age anchoring the investment horizon.
const RETIREMENT_AGE: u32 = 60;

/// Horizon floor for callers already at or past retirement age.
const MIN_HORIZON_YEARS: u32 = 5;

fn horizon_years(age: u32) -> u32 {
    if age < RETIREMENT_AGE {
        RETIREMENT_AGE - age
    } else {
        MIN_HORIZON_YEARS
    }
}

/// Project investment returns for the ledger through one channel.
///
/// Runs the temporal resolver first; its failures propagate unchanged. Valid
/// transactions are bucketed into K windows via prefix-sum range queries and
/// grown through the channel's rate and tax formulas.
#[allow(clippy::too_many_arguments)]
pub fn calculate_returns(
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
    let resolved = filter_temporal_constraints(q, p, k, k_mode, transactions)?;
    let channel: Channel = channel.parse()?;

    let years = horizon_years(age);
    let annual_income = wage * dec!(12);

    // Prefix sums over remanents in date order; range per K period found by
    // binary search on the sorted date array
    let mut sorted_valid: Vec<&Transaction> = resolved.valid.iter().collect();
    sorted_valid.sort_by_key(|tx| tx.date);
    let sorted_dates: Vec<NaiveDateTime> = sorted_valid.iter().map(|tx| tx.date).collect();
    let mut prefix: Vec<Decimal> = Vec::with_capacity(sorted_valid.len() + 1);
    let mut running = Decimal::ZERO;
    prefix.push(running);
    for tx in &sorted_valid {
        running += tx.remanent;
        prefix.push(running);
    }

    let mut savings_by_dates = Vec::with_capacity(k.len());
    for period in k {
        if period.start > period.end {
            continue;
        }

        let left = sorted_dates.partition_point(|d| *d < period.start);
        let right = sorted_dates.partition_point(|d| *d <= period.end);
        let amount = prefix[right] - prefix[left];

        let ctx = InvestmentContext {
            principal: amount,
            years,
            annual_income,
            inflation,
        };
        let nominal = channel.nominal_return(&ctx);
        let real = if years > 0 {
            nominal / compound_factor(inflation, years)
        } else {
            nominal
        };
        let tax_benefit = channel.tax_benefit(&ctx);

        savings_by_dates.push(SavingsByDate {
            start: period.start,
            end: period.end,
            amount: round_currency(amount),
            profits: round_currency(real - amount),
            tax_benefit: round_currency(tax_benefit),
        });
    }

    let total_amount = resolved
        .valid
        .iter()
        .fold(Decimal::ZERO, |acc, tx| acc + tx.amount);
    let total_ceiling = resolved
        .valid
        .iter()
        .fold(Decimal::ZERO, |acc, tx| acc + tx.ceiling);

    Ok(ReturnsProjection {
        channel: channel.id().to_string(),
        transactions_total_amount: round_currency(total_amount),
        transactions_total_ceiling: round_currency(total_ceiling),
        savings_by_dates,
    })
}
