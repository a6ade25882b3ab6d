use std::path::PathBuf;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::{health::DEFAULT_TIMEOUT, targets::DEFAULT_TARGETS_PATH};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub(crate) struct Args {
    /// JSON-RPC endpoint to query, defaults to the public Base Sepolia endpoint
    #[arg(long, env = "RPC_URL")]
    pub(crate) rpc_url: Option<Url>,

    /// Block explorer base URL used for links
    #[arg(long, env = "EXPLORER_URL")]
    pub(crate) explorer_url: Option<Url>,

    /// JSON-RPC wallet endpoint answering `eth_accounts`
    #[arg(short, long, env = "WALLET_RPC_URL")]
    pub(crate) wallet_url: Option<Url>,

    /// Path to the targets file
    #[arg(short, long, env = "TARGETS_PATH", default_value = DEFAULT_TARGETS_PATH)]
    pub(crate) targets: PathBuf,

    /// Timeout of the RPC health check, in seconds
    #[arg(long, env = "HEALTH_TIMEOUT", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub(crate) health_timeout: u64,

    /// Default log level, overridden by RUST_LOG
    #[arg(long, env = "LOG_LEVEL", default_value_t = LevelFilter::WARN)]
    pub(crate) log_level: LevelFilter,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["helion-reporter"]).unwrap();

        assert_eq!(args.targets, PathBuf::from("samples/targets.json"));
        assert_eq!(args.health_timeout, 10);
        assert_eq!(args.log_level, LevelFilter::WARN);
    }

    #[test]
    fn overrides() {
        let args = Args::try_parse_from([
            "helion-reporter",
            "--rpc-url",
            "http://localhost:8545",
            "--wallet-url",
            "http://localhost:8546",
            "--targets",
            "other.json",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(args.rpc_url.unwrap().as_str(), "http://localhost:8545/");
        assert_eq!(args.wallet_url.unwrap().as_str(), "http://localhost:8546/");
        assert_eq!(args.targets, PathBuf::from("other.json"));
        assert_eq!(args.log_level, LevelFilter::DEBUG);
    }

    #[test]
    fn rejects_invalid_url() {
        assert!(Args::try_parse_from(["helion-reporter", "--rpc-url", "not a url"]).is_err());
    }
}
