//! Scenario runner for batch return projections
//!
//! Holds one rule set and ledger, then runs many projections with different
//! caller profiles without rebuilding the inputs each time.

use rayon::prelude::*;
use rust_decimal::Decimal;

use crate::engine::SavingsEngine;
use crate::error::EngineError;
use crate::ledger::Transaction;
use crate::projection::{Channel, ReturnsProjection};
use crate::rules::{EvalPeriod, ExtraPeriod, FixedPeriod, KMode};

/// One caller profile to project returns for.
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    pub age: u32,
    pub wage: Decimal,
    pub inflation: Decimal,
    pub channel: Channel,
}

/// Pre-loaded scenario runner.
///
/// The engine is pure and lock-free, so scenarios can run on as many
/// threads as rayon provides; each call builds its own sweep structures.
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    engine: SavingsEngine,
    q: Vec<FixedPeriod>,
    p: Vec<ExtraPeriod>,
    k: Vec<EvalPeriod>,
    k_mode: KMode,
    transactions: Vec<Transaction>,
}

impl ScenarioRunner {
    pub fn new(
        q: Vec<FixedPeriod>,
        p: Vec<ExtraPeriod>,
        k: Vec<EvalPeriod>,
        k_mode: KMode,
        transactions: Vec<Transaction>,
    ) -> Self {
        Self {
            engine: SavingsEngine::new(),
            q,
            p,
            k,
            k_mode,
            transactions,
        }
    }

    /// Run a single scenario.
    pub fn run(&self, config: &ScenarioConfig) -> Result<ReturnsProjection, EngineError> {
        self.engine.calculate_returns(
            config.age,
            config.wage,
            config.inflation,
            &self.q,
            &self.p,
            &self.k,
            self.k_mode,
            &self.transactions,
            config.channel.id(),
        )
    }

    /// Run scenarios sequentially, preserving config order.
    pub fn run_scenarios(
        &self,
        configs: &[ScenarioConfig],
    ) -> Vec<Result<ReturnsProjection, EngineError>> {
        configs.iter().map(|config| self.run(config)).collect()
    }

    /// Run scenarios in parallel, preserving config order.
    pub fn run_scenarios_par(
        &self,
        configs: &[ScenarioConfig],
    ) -> Vec<Result<ReturnsProjection, EngineError>> {
        configs.par_iter().map(|config| self.run(config)).collect()
    }
}
