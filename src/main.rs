//! Savings System CLI
//!
//! Command-line demo running the full parse -> validate -> resolve -> project
//! pipeline over a sample ledger

use chrono::NaiveDateTime;
use rust_decimal_macros::dec;
use savings_system::{
    ledger::TIMESTAMP_FORMAT, EvalPeriod, Expense, ExtraPeriod, FixedPeriod, KMode, SavingsEngine,
};
use std::fs::File;
use std::io::Write;

fn dt(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).expect("bad sample timestamp")
}

fn main() {
    env_logger::init();

    println!("Savings System v0.1.0");
    println!("=====================\n");

    let engine = SavingsEngine::new();

    // Sample ledger: four expenses across 2023
    let expenses = vec![
        Expense { date: dt("2023-10-12 20:15:00"), amount: dec!(250) },
        Expense { date: dt("2023-02-28 15:49:00"), amount: dec!(375) },
        Expense { date: dt("2023-07-01 21:59:00"), amount: dec!(620) },
        Expense { date: dt("2023-12-17 08:09:00"), amount: dec!(480) },
    ];

    let parsed = engine.parse_expenses(&expenses).expect("sample ledger parses");

    println!("Parsed {} expenses:", parsed.transactions.len());
    println!("{:>20} {:>10} {:>10} {:>10}", "Date", "Amount", "Ceiling", "Remanent");
    println!("{}", "-".repeat(54));
    for tx in &parsed.transactions {
        println!(
            "{:>20} {:>10} {:>10} {:>10}",
            tx.date.format(TIMESTAMP_FORMAT),
            tx.amount,
            tx.ceiling,
            tx.remanent
        );
    }
    println!(
        "\nTotals: expense={} ceiling={} remanent={}\n",
        parsed.totals.total_expense, parsed.totals.total_ceiling, parsed.totals.total_remanent
    );

    // Override rules: July remanents fixed at 0, late-year savings boosted 25
    let q = vec![FixedPeriod {
        fixed: dec!(0),
        start: dt("2023-07-01 00:00:00"),
        end: dt("2023-07-31 23:59:59"),
    }];
    let p = vec![ExtraPeriod {
        extra: dec!(25),
        start: dt("2023-10-01 08:00:00"),
        end: dt("2023-12-17 08:09:00"),
    }];
    let k = vec![
        EvalPeriod { start: dt("2023-03-01 00:00:00"), end: dt("2023-11-30 23:59:59") },
        EvalPeriod { start: dt("2023-02-28 15:49:00"), end: dt("2023-12-17 08:09:00") },
    ];

    let resolved = engine
        .filter_temporal_constraints(&q, &p, &k, KMode::Grouping, &parsed.transactions)
        .expect("sample rules resolve");

    println!(
        "Resolved remanents ({} valid, {} invalid):",
        resolved.valid.len(),
        resolved.invalid.len()
    );
    for tx in &resolved.valid {
        println!("  {} -> {}", tx.date.format(TIMESTAMP_FORMAT), tx.remanent);
    }
    println!();

    // Project returns through both channels for a 29-year-old caller
    for channel in ["retirement", "index"] {
        let projection = engine
            .calculate_returns(
                29,
                dec!(50000),
                dec!(0.055),
                &q,
                &p,
                &k,
                KMode::Grouping,
                &parsed.transactions,
                channel,
            )
            .expect("sample projection succeeds");

        println!("Channel {}:", projection.channel);
        println!(
            "  total amount={} total ceiling={}",
            projection.transactions_total_amount, projection.transactions_total_ceiling
        );
        for row in &projection.savings_by_dates {
            println!(
                "  {} .. {}  amount={} profits={} taxBenefit={}",
                row.start.format(TIMESTAMP_FORMAT),
                row.end.format(TIMESTAMP_FORMAT),
                row.amount,
                row.profits,
                row.tax_benefit
            );
        }
        println!();
    }

    // Write resolved ledger to CSV
    let csv_path = "resolved_ledger.csv";
    let mut file = File::create(csv_path).expect("Unable to create CSV file");
    writeln!(file, "Date,Amount,Ceiling,Remanent").unwrap();
    for tx in &resolved.valid {
        writeln!(
            file,
            "{},{},{},{}",
            tx.date.format(TIMESTAMP_FORMAT),
            tx.amount,
            tx.ceiling,
            tx.remanent
        )
        .unwrap();
    }
    println!("Resolved ledger written to: {}", csv_path);
}
