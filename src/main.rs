//! forensics-engine CLI
//!
//! Run the money-muling analysis from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Analyze a batch of transactions
//! forensics-engine analyze --input transactions.json
//!
//! # Output the full JSON report
//! forensics-engine analyze --input transactions.json --format json
//!
//! # Generate a random batch with seeded muling patterns
//! forensics-engine generate --accounts 20 --transactions 100 --seed-patterns
//! ```

use chrono::{DateTime, Utc};
use forensics_engine::core::account::AccountId;
use forensics_engine::core::transaction::{Transaction, TransactionSet};
use forensics_engine::engine::AnalysisEngine;
use forensics_engine::simulation::generator::{
    generate_random_batch, inject_cycle, inject_fan_in, inject_shell_chain, ScenarioConfig,
};
use rust_decimal::Decimal;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"forensics-engine — money-muling detection over transaction batches

USAGE:
    forensics-engine <COMMAND> [OPTIONS]

COMMANDS:
    analyze     Run the full detection and scoring pipeline on a batch
    generate    Generate a random transaction batch (for testing)
    help        Show this message

OPTIONS (analyze):
    --input <FILE>           Path to JSON transactions file
    --format <FORMAT>        Output format: text (default) or json
    --include-transactions   Echo the input batch in the JSON report

OPTIONS (generate):
    --accounts <N>           Number of background accounts (default: 20)
    --transactions <N>       Number of background transactions (default: 100)
    --seed-patterns          Inject a cycle, a fan-in burst and a shell chain
    --output <FILE>          Write to file instead of stdout

EXAMPLES:
    forensics-engine analyze --input transactions.json
    forensics-engine analyze --input transactions.json --format json
    forensics-engine generate --accounts 50 --transactions 400 --seed-patterns
    forensics-engine generate --seed-patterns --output batch.json"#
    );
}

/// JSON schema for input transactions.
#[derive(serde::Deserialize)]
struct TransactionInput {
    transaction_id: String,
    sender_id: String,
    receiver_id: String,
    amount: String,
    timestamp: DateTime<Utc>,
}

#[derive(serde::Deserialize)]
struct TransactionsFile {
    transactions: Vec<TransactionInput>,
}

fn load_transactions(path: &str) -> TransactionSet {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    let file: TransactionsFile = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "transactions": [
    {{ "transaction_id": "TX-1", "sender_id": "ACC-A", "receiver_id": "ACC-B",
       "amount": "2500.00", "timestamp": "2024-03-01T09:30:00Z" }}
  ]
}}"#
        );
        process::exit(1);
    });

    let mut transactions = Vec::with_capacity(file.transactions.len());
    for input in file.transactions {
        let amount: Decimal = input.amount.parse().unwrap_or_else(|e| {
            eprintln!("Invalid amount '{}': {}", input.amount, e);
            process::exit(1);
        });
        let tx = Transaction::try_new(
            input.transaction_id,
            AccountId::new(input.sender_id),
            AccountId::new(input.receiver_id),
            amount,
            input.timestamp,
        )
        .unwrap_or_else(|e| {
            eprintln!("Invalid transaction: {}", e);
            process::exit(1);
        });
        transactions.push(tx);
    }

    TransactionSet::from_transactions(transactions).unwrap_or_else(|e| {
        eprintln!("Invalid batch: {}", e);
        process::exit(1);
    })
}

fn cmd_analyze(args: &[String]) {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut include_transactions = false;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--input requires a file path");
                    process::exit(1);
                }));
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            "--include-transactions" => {
                include_transactions = true;
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let set = load_transactions(&path);
    let engine = AnalysisEngine::new();
    let report = if include_transactions {
        engine.analyze_with_transactions(&set)
    } else {
        engine.analyze(&set)
    };

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&report).unwrap());
    } else {
        println!("=== Forensic Analysis ===");
        println!("Accounts analyzed:  {}", report.summary.total_accounts_analyzed);
        println!("Suspicious:         {}", report.summary.suspicious_accounts_flagged);
        println!("Fraud rings:        {}", report.summary.fraud_rings_detected);
        println!("Processing time:    {:.3}s", report.summary.processing_time_seconds);

        if !report.suspicious_accounts.is_empty() {
            println!("\nSuspicious accounts:");
            for account in &report.suspicious_accounts {
                let ring = account.ring_id.as_deref().unwrap_or("-");
                println!(
                    "  {:<20} {:>5.1}  [{}]  {}",
                    account.account_id,
                    account.suspicion_score,
                    account.detected_patterns.join(", "),
                    ring
                );
            }
        }

        if !report.fraud_rings.is_empty() {
            println!("\nFraud rings:");
            for ring in &report.fraud_rings {
                println!(
                    "  {} ({}, risk {:.1}): {}",
                    ring.ring_id,
                    ring.pattern_type,
                    ring.risk_score,
                    ring.member_accounts.join(" → ")
                );
            }
        }
    }
}

fn cmd_generate(args: &[String]) {
    let mut accounts = 20usize;
    let mut transactions = 100usize;
    let mut seed_patterns = false;
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--accounts" => {
                i += 1;
                accounts = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--accounts requires a number");
                    process::exit(1);
                });
            }
            "--transactions" => {
                i += 1;
                transactions = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--transactions requires a number");
                    process::exit(1);
                });
            }
            "--seed-patterns" => {
                seed_patterns = true;
            }
            "--output" => {
                i += 1;
                output_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--output requires a file path");
                    process::exit(1);
                }));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = ScenarioConfig {
        account_count: accounts,
        transaction_count: transactions,
        ..Default::default()
    };
    let mut set = generate_random_batch(&config);

    if seed_patterns {
        let mules: Vec<AccountId> = (0..4)
            .map(|i| AccountId::new(format!("MULE-{}", i)))
            .collect();
        inject_cycle(&mut set, &mules, config.start);

        let collector = AccountId::new("COLLECTOR");
        let smurfs: Vec<AccountId> = (0..10)
            .map(|i| AccountId::new(format!("SMURF-{:02}", i)))
            .collect();
        inject_fan_in(&mut set, &collector, &smurfs, config.start);

        let shells: Vec<AccountId> = (0..5)
            .map(|i| AccountId::new(format!("SHELL-{}", i)))
            .collect();
        inject_shell_chain(&mut set, &shells, config.start);
    }

    #[derive(serde::Serialize)]
    struct OutputTransaction {
        transaction_id: String,
        sender_id: String,
        receiver_id: String,
        amount: String,
        timestamp: DateTime<Utc>,
    }

    #[derive(serde::Serialize)]
    struct OutputFile {
        transactions: Vec<OutputTransaction>,
    }

    let output = OutputFile {
        transactions: set
            .transactions()
            .iter()
            .map(|tx| OutputTransaction {
                transaction_id: tx.transaction_id().to_string(),
                sender_id: tx.sender().to_string(),
                receiver_id: tx.receiver().to_string(),
                amount: tx.amount().to_string(),
                timestamp: tx.timestamp(),
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&output).unwrap();

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} transactions across {} accounts → {}",
            set.len(),
            set.accounts().len(),
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "analyze" => cmd_analyze(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
