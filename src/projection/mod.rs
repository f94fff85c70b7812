//! Temporal constraint resolution and investment return projection

mod channel;
mod resolver;
mod returns;

pub use channel::{Channel, InvestmentContext};
pub use resolver::{filter_temporal_constraints, ResolvedLedger};
pub use returns::{calculate_returns, ReturnsProjection, SavingsByDate};
