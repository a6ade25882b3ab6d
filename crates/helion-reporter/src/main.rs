use std::{io, time::Duration};

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod args;
mod chain;
mod health;
mod network;
mod report;
mod targets;
mod wallet;

use args::Args;
use chain::RpcChain;
use network::NetworkConfig;
use report::Reporter;
use wallet::RpcWallet;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = Args::parse();

    let env_filter = EnvFilter::builder()
        .with_default_directive(args.log_level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    // Fixed for the whole run
    let mut network = NetworkConfig::base_sepolia();
    if let Some(rpc_url) = &args.rpc_url {
        network = network.with_rpc_url(rpc_url);
    }
    if let Some(explorer_url) = &args.explorer_url {
        network = network.with_explorer_url(explorer_url);
    }
    tracing::info!(network = %network.name, rpc = %network.rpc_url, "Starting report");

    let chain = RpcChain::connect(&network.rpc_url).await?;

    let wallet = args.wallet_url.as_ref().map(|url| RpcWallet::new(url.as_str()));

    let mut reporter = Reporter {
        network: &network,
        chain: &chain,
        http: reqwest::Client::new(),
        health_timeout: Duration::from_secs(args.health_timeout),
        out: io::stdout().lock(),
    };
    reporter.run(wallet.as_ref(), &args.targets).await?;

    Ok(())
}
