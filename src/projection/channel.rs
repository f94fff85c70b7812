//! Investable channels: growth rates and tax-benefit formulas
//!
//! A closed set of channel kinds selected by exhaustive match. Adding a
//! channel means adding a variant and its rate/tax arms.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::EngineError;
use crate::money::compound_factor;

/// Inputs to a channel's growth and tax computations.
#[derive(Debug, Clone, PartialEq)]
pub struct InvestmentContext {
    pub principal: Decimal,
    pub years: u32,
    pub annual_income: Decimal,
    pub inflation: Decimal,
}

/// An investable destination with its own growth-rate and tax-benefit rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Retirement scheme: moderate rate, progressive-bracket tax benefit
    Retirement,
    /// Index fund: higher rate, no tax benefit
    Index,
}

impl Channel {
    /// Wire identifier.
    pub fn id(&self) -> &'static str {
        match self {
            Channel::Retirement => "retirement",
            Channel::Index => "index",
        }
    }

    /// Fixed nominal annual growth rate.
    pub fn annual_rate(&self) -> Decimal {
        match self {
            Channel::Retirement => dec!(0.0711),
            Channel::Index => dec!(0.1449),
        }
    }

    /// Nominal compound value of the principal over the horizon.
    pub fn nominal_return(&self, ctx: &InvestmentContext) -> Decimal {
        ctx.principal * compound_factor(self.annual_rate(), ctx.years)
    }

    /// Tax saved in the contribution year by investing through this channel.
    pub fn tax_benefit(&self, ctx: &InvestmentContext) -> Decimal {
        match self {
            Channel::Retirement => retirement_tax_benefit(ctx),
            Channel::Index => Decimal::ZERO,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Channel {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "retirement" => Ok(Channel::Retirement),
            "index" => Ok(Channel::Index),
            other => Err(EngineError::UnsupportedChannel(other.to_string())),
        }
    }
}

/// Deduction cap for the retirement scheme.
const DEDUCTION_CAP: Decimal = dec!(200000);

/// Share of annual income deductible through the retirement scheme.
const DEDUCTIBLE_INCOME_SHARE: Decimal = dec!(0.10);

/// Marginal tax slabs: (lower bound, upper bound, rate). Income at or below
/// the first lower bound is untaxed.
const TAX_SLABS: [(Decimal, Option<Decimal>, Decimal); 4] = [
    (dec!(700000), Some(dec!(1000000)), dec!(0.10)),
    (dec!(1000000), Some(dec!(1200000)), dec!(0.15)),
    (dec!(1200000), Some(dec!(1500000)), dec!(0.20)),
    (dec!(1500000), None, dec!(0.30)),
];

/// Progressive income tax over the slab table.
fn income_tax(income: Decimal) -> Decimal {
    if income <= TAX_SLABS[0].0 {
        return Decimal::ZERO;
    }

    let mut tax = Decimal::ZERO;
    for (lower, upper, rate) in TAX_SLABS {
        if income > lower {
            let capped = upper.map_or(income, |u| income.min(u));
            let taxable = capped - lower;
            if taxable > Decimal::ZERO {
                tax += taxable * rate;
            }
        }
    }
    tax
}

/// Benefit = tax(income) - tax(income - deduction), with the deduction
/// limited to the principal, a share of income, and a fixed cap.
fn retirement_tax_benefit(ctx: &InvestmentContext) -> Decimal {
    let deduction = ctx
        .principal
        .min(DEDUCTIBLE_INCOME_SHARE * ctx.annual_income)
        .min(DEDUCTION_CAP);
    let before = income_tax(ctx.annual_income);
    let after = income_tax((ctx.annual_income - deduction).max(Decimal::ZERO));
    before - after
}
