//! VaultCore CLI
//!
//! Usage:
//!   vaultcore classify <query>
//!   vaultcore score <input.json>
//!   vaultcore lookup <address> [chain_id]
//!
//! `lookup` reads the same ETHERSCAN_* variables as the API server.

use eyre::{bail, Result, WrapErr};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use vaultcore::utils::constants::{
    get_chain_name, get_native_symbol, is_chain_supported, parse_wei, wei_to_native,
    CHAIN_ID_ETHEREUM,
};
use vaultcore::{
    classify_entity, compute_vault_score, format_address, format_number, ExplorerClient, ScanInput,
    ScoreResult, TransactionSignals,
};

const USAGE: &str = "\
Usage:
  vaultcore classify <query>              Entity type of a scanner query
  vaultcore score <input.json>            VaultScore for a ScanInput JSON file
  vaultcore lookup <address> [chain_id]   Balance, transactions and derived signals";

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        Some("classify") if args.len() >= 2 => {
            let query = args[1..].join(" ");
            println!("{}", classify_entity(&query));
        }
        Some("score") if args.len() == 2 => run_score(&args[1])?,
        Some("lookup") if args.len() == 2 || args.len() == 3 => {
            let chain_id = match args.get(2) {
                Some(raw) => raw
                    .parse::<u64>()
                    .wrap_err_with(|| format!("invalid chain_id: {}", raw))?,
                None => CHAIN_ID_ETHEREUM,
            };
            run_lookup(&args[1], chain_id).await?;
        }
        Some("help") | Some("--help") | Some("-h") => println!("{}", USAGE),
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }

    Ok(())
}

fn run_score(path: &str) -> Result<()> {
    let raw = std::fs::read_to_string(path).wrap_err_with(|| format!("cannot read {}", path))?;
    let input: ScanInput =
        serde_json::from_str(&raw).wrap_err_with(|| format!("{} is not a valid ScanInput", path))?;

    if !input.rug_pull_risk.is_finite() || !(0.0..=1.0).contains(&input.rug_pull_risk) {
        bail!("rug_pull_risk must be between 0 and 1, got {}", input.rug_pull_risk);
    }

    print_score(&compute_vault_score(&input));
    Ok(())
}

async fn run_lookup(address: &str, chain_id: u64) -> Result<()> {
    if !is_chain_supported(chain_id) {
        bail!("unsupported chain_id: {}", chain_id);
    }

    let client = ExplorerClient::from_env()?;
    let symbol = get_native_symbol(chain_id);

    let balance_wei = client.fetch_balance(address, chain_id).await?;
    let balance = parse_wei(&balance_wei).map(wei_to_native).unwrap_or(0.0);

    let transactions = client.fetch_transactions(address, chain_id).await?;
    let signals = TransactionSignals::from_transactions(address, &transactions);

    println!("🔎 {} on {}", format_address(address), get_chain_name(chain_id));
    println!("   Balance:                {} {} ({} wei)", format_number(balance), symbol, balance_wei);
    println!("   Transactions:           {}", signals.transaction_count);
    println!("   Suspicious txs:         {}", signals.suspicious_transaction_count);
    println!("   Suspicious patterns:    {}", signals.deep_scan.suspicious_pattern_count);
    println!(
        "   Value received:         {} {}",
        format_number(signals.deep_scan.total_value_received),
        symbol
    );
    println!("   Unique counterparties:  {}", signals.deep_scan.unique_interaction_count);
    println!("   Contract interactions:  {}", signals.deep_scan.contract_interaction_count);
    Ok(())
}

fn print_score(result: &ScoreResult) {
    println!(
        "🛡️ VaultScore: {}/100 ({}) {}",
        result.score,
        result.label.as_str(),
        result.label.color_code()
    );
    println!("   {}", result.label.description());
    if result.breakdown.is_empty() {
        println!("   No adjustments applied");
    }
    for adj in &result.breakdown {
        println!("   {:+4}  {:<28} {}", adj.points, adj.rule, adj.reason);
    }
}
