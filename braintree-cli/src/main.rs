//! Braintree CLI
//!
//! Loads a gateway configuration, shows how it resolves, and issues
//! ad-hoc requests against the merchant API.

mod config;

use braintree_sdk::{Configuration, api_version};
use clap::{Parser, Subcommand};
use config::{ConfigLoader, Overrides};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Braintree gateway command line client
#[derive(Parser, Debug)]
#[command(name = "braintree-cli")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "BRAINTREE_CONFIG")]
    config: Option<PathBuf>,

    /// Environment name: development, sandbox or production
    #[arg(short, long, env = "BRAINTREE_ENVIRONMENT")]
    environment: Option<String>,

    #[arg(long, env = "BRAINTREE_MERCHANT_ID")]
    merchant_id: Option<String>,

    #[arg(long, env = "BRAINTREE_PUBLIC_KEY", hide_env_values = true)]
    public_key: Option<String>,

    #[arg(long, env = "BRAINTREE_PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<String>,

    /// Transport strategy: httplib, pycurl or requests
    #[arg(long)]
    http_strategy: Option<String>,

    /// Disable TLS certificate verification
    #[arg(long, default_value = "false")]
    unsafe_ssl: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the resolved configuration (keys masked)
    Show,
    /// GET a path below the merchant URL and print the JSON response
    Get {
        /// Path relative to /merchants/{merchant_id}, e.g. /plans
        path: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();
    let overrides = Overrides {
        environment: args.environment,
        merchant_id: args.merchant_id,
        public_key: args.public_key,
        private_key: args.private_key,
        http_strategy: args.http_strategy,
        unsafe_ssl: args.unsafe_ssl,
    };

    let mut configuration = ConfigLoader::new(args.config.as_ref(), overrides)
        .load()
        .map_err(|e| {
            tracing::error!("Failed to load configuration: {}", e);
            e
        })?;

    match args.command {
        Command::Show => show(&mut configuration)?,
        Command::Get { path } => get(&mut configuration, &path).await?,
    }

    Ok(())
}

fn show(configuration: &mut Configuration) -> anyhow::Result<()> {
    let snapshot = configuration.instantiate()?;
    let strategy = snapshot.http_strategy()?;

    println!("environment:        {}", snapshot.environment());
    println!("base url:           {}", snapshot.environment().base_url());
    println!("merchant url:       {}", snapshot.base_merchant_url());
    println!("public key:         {}", snapshot.public_key());
    println!("private key:        {}", snapshot.private_key());
    println!("http strategy:      {}", strategy.name());
    println!("api version:        {}", api_version());
    println!("use once:           {}", snapshot.is_use_once());
    println!("unsafe ssl:         {}", snapshot.is_use_unsafe_ssl());
    Ok(())
}

async fn get(configuration: &mut Configuration, path: &str) -> anyhow::Result<()> {
    let mut gateway = configuration.gateway()?;
    tracing::info!("GET {}{}", gateway.config().base_merchant_url(), path);

    let value: serde_json::Value = gateway.get(path).await?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// Initialize the tracing subscriber with environment-based filtering.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
