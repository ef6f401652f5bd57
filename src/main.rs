//! `transfer-pipeline` operator CLI.
//!
//! Loads configuration, wires the logger, error reporter and JSON-RPC chain
//! client together, and runs one command.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use alloy::primitives::Bytes;
use serde_json::Value;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use transfer_pipeline::auth::AuthState;
use transfer_pipeline::chain::units::{format_address, to_eth, to_signed_wei};
use transfer_pipeline::chain::{RpcChainClient, Wallet};
use transfer_pipeline::config::{load_config, AppConfig, StorageConfig};
use transfer_pipeline::observability::{metrics, Context, ErrorInfo};
use transfer_pipeline::storage::{FileStore, LocalStore, MemoryStore};
use transfer_pipeline::{
    validate_address, ErrorReporter, Logger, Severity, TransactionSubmitter, TransferRequest,
};

#[derive(Parser)]
#[command(name = "transfer-pipeline")]
#[command(about = "Validate and submit value transfers", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send native value to an address
    Send {
        /// Recipient address
        #[arg(long)]
        to: String,
        /// Amount in ETH, e.g. 0.01
        #[arg(long, allow_hyphen_values = true)]
        value: String,
        /// Optional hex call data
        #[arg(long)]
        data: Option<String>,
    },
    /// Show the connected account and balance
    Balance,
    /// Check an address format
    ValidateAddress { address: String },
    /// Attach a user ID to future error reports
    SetUser { id: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config);

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    match run(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(config: &AppConfig) {
    let level = config.logger_config().min_level;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("transfer_pipeline={}", level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn open_store(config: &StorageConfig) -> Arc<dyn LocalStore> {
    match &config.path {
        Some(path) => Arc::new(FileStore::open_or_empty(path)),
        None => Arc::new(MemoryStore::new()),
    }
}

async fn run(command: Commands, config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(&config.storage);
    let logger = Arc::new(Logger::new(config.logger_config()));
    let reporter = Arc::new(ErrorReporter::new(
        config.error_reporting_config(),
        logger.clone(),
        store.clone(),
    ));

    tracing::debug!(session_id = %reporter.session_id(), "Error reporter ready");

    match &command {
        Commands::ValidateAddress { address } => {
            let valid = validate_address(address);
            println!("{} is {}", address, if valid { "valid" } else { "invalid" });
            return Ok(());
        }
        Commands::SetUser { id } => {
            reporter.set_user_id(id);
            println!("Error reports will be tagged with user {}", id);
            return Ok(());
        }
        Commands::Balance | Commands::Send { .. } => {}
    }

    let wallet = match Wallet::from_env(&config.rpc.private_key_env) {
        Ok(wallet) => Some(wallet),
        Err(e) => {
            tracing::warn!(error = %e, "No signing wallet; running read-only");
            None
        }
    };

    let client = RpcChainClient::connect(config.rpc.clone(), wallet).await?;
    let submitter =
        TransactionSubmitter::new(client, config.network(), logger, reporter.clone());

    match command {
        Commands::Balance => {
            let overview = submitter.overview().await;
            let auth = AuthState::from_client(submitter.client());
            println!("network:   {} ({})", submitter.network().name, submitter.network().id);
            println!("chain id:  {}", overview.chain_id);
            match overview.account {
                Some(account) => {
                    println!("account:   {}", format_address(&account.to_string(), 4));
                    if let Some(url) = submitter.network().address_explorer_url(&account) {
                        println!("explorer:  {}", url);
                    }
                }
                None => println!("account:   not connected"),
            }
            if let Some(balance) = overview.balance {
                println!("balance:   {} ETH", to_eth(balance));
            }
            println!("authenticated: {}", auth.is_authenticated);
        }
        Commands::Send { to, value, data } => {
            // Negative amounts parse so that transfer validation rejects them.
            let amount = match to_signed_wei(&value) {
                Ok(amount) => amount,
                Err(e) => {
                    let mut context = Context::new();
                    context.insert("to".to_string(), Value::from(to));
                    context.insert("value".to_string(), Value::from(value));
                    reporter.report(ErrorInfo::from_error(&e), Severity::Medium, Some(context));
                    return Err(e.into());
                }
            };
            let mut request = TransferRequest::new(to, amount);
            if let Some(data) = data {
                request = request.with_data(Bytes::from(alloy::hex::decode(data)?));
            }

            let outcome = submitter.send(&request).await?;
            println!("Transaction sent: {}", outcome.hash);
            if let Some(url) = submitter.network().tx_explorer_url(&outcome.hash) {
                println!("{}", url);
            }
        }
        Commands::ValidateAddress { .. } | Commands::SetUser { .. } => {}
    }

    Ok(())
}
