//! Run the full returns pipeline over an expense CSV
//!
//! Reads `date,amount` rows, parses them into a ledger, applies an optional
//! rules file, and writes the returns projection as JSON.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{anyhow, Context};
use clap::Parser;
use rust_decimal::Decimal;
use serde::Deserialize;

use savings_system::ledger::loader::load_expenses;
use savings_system::metrics::{CallStatus, InMemoryMetrics, MetricsSink};
use savings_system::{EvalPeriod, ExtraPeriod, FixedPeriod, KMode, SavingsEngine};

#[derive(Debug, Parser)]
#[command(name = "run_returns", about = "Project investment returns from an expense CSV")]
struct Args {
    /// Expense CSV file with `date,amount` columns
    input: PathBuf,

    /// Investment channel id (retirement | index)
    #[arg(long, default_value = "retirement")]
    channel: String,

    /// Caller's age
    #[arg(long, default_value_t = 29)]
    age: u32,

    /// Monthly wage
    #[arg(long, default_value = "50000")]
    wage: Decimal,

    /// Annual inflation rate
    #[arg(long, default_value = "0.055")]
    inflation: Decimal,

    /// Optional JSON rules file with q/p/k period lists
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Output JSON path (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Rules file shape: all lists optional.
#[derive(Debug, Default, Deserialize)]
struct RulesFile {
    #[serde(default)]
    q: Vec<FixedPeriod>,
    #[serde(default)]
    p: Vec<ExtraPeriod>,
    #[serde(default)]
    k: Vec<EvalPeriod>,
    #[serde(default, rename = "kMode")]
    k_mode: KMode,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let start = Instant::now();

    let expenses = load_expenses(&args.input)
        .map_err(|e| anyhow!("loading {}: {}", args.input.display(), e))?;
    println!("Loaded {} expenses in {:?}", expenses.len(), start.elapsed());

    let rules: RulesFile = match &args.rules {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            serde_json::from_reader(file).with_context(|| format!("parsing {}", path.display()))?
        }
        None => RulesFile::default(),
    };

    let engine = SavingsEngine::new();
    let metrics = InMemoryMetrics::new();

    let parse_start = Instant::now();
    let parsed = engine.parse_expenses(&expenses);
    metrics.record(
        "transactions:parse",
        parse_start.elapsed(),
        if parsed.is_ok() { CallStatus::Success } else { CallStatus::Error },
    );
    let parsed = parsed?;

    // Default evaluation window: the whole ledger span
    let k = if rules.k.is_empty() {
        let min = parsed.transactions.iter().map(|tx| tx.date).min();
        let max = parsed.transactions.iter().map(|tx| tx.date).max();
        match (min, max) {
            (Some(start), Some(end)) => vec![EvalPeriod { start, end }],
            _ => Vec::new(),
        }
    } else {
        rules.k
    };

    let returns_start = Instant::now();
    let projection = engine.calculate_returns(
        args.age,
        args.wage,
        args.inflation,
        &rules.q,
        &rules.p,
        &k,
        rules.k_mode,
        &parsed.transactions,
        &args.channel,
    );
    metrics.record(
        &format!("returns:{}", args.channel),
        returns_start.elapsed(),
        if projection.is_ok() { CallStatus::Success } else { CallStatus::Error },
    );
    let projection = projection?;

    let json = serde_json::to_string_pretty(&projection)?;
    match &args.output {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(json.as_bytes())?;
            println!("Projection written to: {}", path.display());
        }
        None => println!("{}", json),
    }

    let snapshot = metrics.snapshot();
    println!("\n{} engine calls:", snapshot.requests_served);
    for stats in &snapshot.endpoint_stats {
        println!(
            "  {:<24} calls={} errors={} avg={:.3}ms",
            stats.endpoint, stats.calls, stats.errors, stats.avg_duration_ms
        );
    }

    Ok(())
}
