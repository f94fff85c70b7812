//! Savings System - projection engine for ledger-based savings and investment returns
//!
//! This library provides:
//! - Expense parsing with exact decimal ceilings and running totals
//! - Transaction validation with wage and investment-cap constraints
//! - Sweep-line resolution of time-windowed override rules (Q/P/K)
//! - Investment return projection across investable channels
//! - Multi-scenario batch runner

pub mod engine;
pub mod error;
pub mod ledger;
pub mod metrics;
pub mod money;
pub mod projection;
pub mod rules;
pub mod scenario;

// Re-export commonly used types
pub use engine::SavingsEngine;
pub use error::EngineError;
pub use ledger::{Expense, ParsedLedger, Transaction, ValidationBuckets};
pub use projection::{Channel, ResolvedLedger, ReturnsProjection, SavingsByDate};
pub use rules::{EvalPeriod, ExtraPeriod, FixedPeriod, KMode};
pub use scenario::ScenarioRunner;
