use std::{io::Write, path::Path, time::Duration};

use alloy::primitives::{utils::format_ether, Address, U256};
use chrono::{DateTime, SecondsFormat};
use eyre::eyre;
use tracing::{debug, warn};

use crate::{
    chain::ChainReader,
    health::{health_check, parse_chain_id},
    network::{short_address, NetworkConfig},
    targets::load_targets,
    wallet::{connect_wallet, WalletConnection, WalletProvider},
};

/// Prints the network diagnostics report, one section after another.
pub(crate) struct Reporter<'a, C, W> {
    pub(crate) network: &'a NetworkConfig,
    pub(crate) chain: &'a C,
    pub(crate) http: reqwest::Client,
    pub(crate) health_timeout: Duration,
    pub(crate) out: W,
}

impl<C: ChainReader, W: Write> Reporter<'_, C, W> {
    /// Runs the full report. Only the health probe and the wallet connection are
    /// allowed to fail; any other query error ends the run.
    pub(crate) async fn run<P: WalletProvider>(
        &mut self,
        wallet: Option<&P>,
        targets_path: &Path,
    ) -> eyre::Result<()> {
        self.report_network()?;
        self.report_health().await?;

        let targets = load_targets(targets_path).await;
        self.report_targets_loaded(targets.len())?;

        let connection = connect_wallet(wallet).await;
        if let WalletConnection::Unavailable(reason) = &connection {
            warn!(%reason, "Wallet connection unavailable");
            writeln!(
                self.out,
                "Wallet connection unavailable, continuing with RPC-only reads"
            )?;
        }

        self.report_balances(connection.addresses()).await?;
        self.report_block_and_gas().await?;
        self.report_bytecode(&targets).await?;

        Ok(())
    }

    pub(crate) fn report_network(&mut self) -> eyre::Result<()> {
        writeln!(self.out, "Built for Base")?;
        writeln!(self.out, "Network: {}", self.network.name)?;
        writeln!(self.out, "chainId (decimal): {}", self.network.chain_id)?;
        writeln!(self.out, "Explorer: {}", self.network.explorer_url())?;
        writeln!(self.out)?;
        Ok(())
    }

    pub(crate) async fn report_health(&mut self) -> eyre::Result<()> {
        writeln!(self.out, "RPC health check:")?;

        match health_check(&self.http, &self.network.rpc_url, self.health_timeout).await {
            Ok(chain_id) => {
                if parse_chain_id(&chain_id).is_some_and(|id| id != self.network.chain_id) {
                    warn!(
                        expected = self.network.chain_id,
                        actual = %chain_id,
                        "RPC endpoint serves a different chain"
                    );
                }
                writeln!(self.out, "- eth_chainId: {chain_id}")?;
            }
            Err(err) => {
                debug!(?err, "Health check failed");
                writeln!(self.out, "- rpc check failed: {err:#}")?;
            }
        }

        Ok(())
    }

    pub(crate) fn report_targets_loaded(&mut self, count: usize) -> eyre::Result<()> {
        writeln!(self.out, "Targets loaded: {count}")?;
        writeln!(self.out)?;
        Ok(())
    }

    pub(crate) async fn report_balances(&mut self, addresses: &[Address]) -> eyre::Result<()> {
        if addresses.is_empty() {
            return Ok(());
        }

        writeln!(self.out, "Balances:")?;
        for address in addresses {
            let balance = self.chain.balance(*address).await?;
            let address = address.to_string();

            writeln!(
                self.out,
                "- {}: {} ETH",
                short_address(&address),
                format_eth(balance)
            )?;
            writeln!(self.out, "  {}", self.network.address_link(&address))?;
        }
        writeln!(self.out)?;

        Ok(())
    }

    pub(crate) async fn report_block_and_gas(&mut self) -> eyre::Result<()> {
        let latest = self.chain.block_number().await?;
        let timestamp = self.chain.block_timestamp(latest).await?;
        let gas_price = self.chain.gas_price().await?;

        writeln!(self.out, "Block and gas data:")?;
        writeln!(self.out, "- Latest block: {latest}")?;
        writeln!(self.out, "  {}", self.network.block_link(latest))?;
        writeln!(self.out, "- Timestamp: {}", iso_timestamp(timestamp)?)?;
        writeln!(self.out, "- Gas price (gwei): {}", format_gwei(gas_price))?;
        writeln!(self.out)?;

        Ok(())
    }

    pub(crate) async fn report_bytecode(&mut self, targets: &[String]) -> eyre::Result<()> {
        writeln!(self.out, "Bytecode checks:")?;

        for target in targets {
            let Some(address) = parse_target(target) else {
                debug!(%target, "Skipping invalid address");
                continue;
            };

            let code = self.chain.code_at(address).await?;
            let verdict = if code.is_empty() {
                "no bytecode"
            } else {
                "bytecode found"
            };

            writeln!(self.out, "- {}: {verdict}", short_address(target))?;
            writeln!(self.out, "  {}", self.network.code_link(target))?;
        }

        Ok(())
    }
}

/// Accepts `0x` followed by 40 hex digits. All-lowercase input is taken as is;
/// anything with an uppercase letter must carry a valid EIP-55 checksum.
pub(crate) fn parse_target(target: &str) -> Option<Address> {
    let hex = target.strip_prefix("0x")?;
    if hex.len() != 40 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    if hex.bytes().any(|b| b.is_ascii_uppercase()) {
        return Address::parse_checksummed(target, None).ok();
    }

    target.parse().ok()
}

/// Decimal ether with trailing zeros trimmed, e.g. `1`, `0.25`.
pub(crate) fn format_eth(wei: U256) -> String {
    let formatted = format_ether(wei);
    match formatted.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                whole.to_owned()
            } else {
                format!("{whole}.{fraction}")
            }
        }
        None => formatted,
    }
}

/// Gwei with three decimals, ties rounded up.
pub(crate) fn format_gwei(wei: u128) -> String {
    let milli = wei.saturating_add(500_000) / 1_000_000;
    format!("{}.{:03}", milli / 1000, milli % 1000)
}

/// ISO-8601 UTC with millisecond precision, e.g. `2024-06-01T12:00:00.000Z`.
pub(crate) fn iso_timestamp(unix_seconds: u64) -> eyre::Result<String> {
    let seconds =
        i64::try_from(unix_seconds).map_err(|_| eyre!("timestamp {unix_seconds} out of range"))?;
    let datetime = DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| eyre!("timestamp {unix_seconds} out of range"))?;

    Ok(datetime.to_rfc3339_opts(SecondsFormat::Millis, true))
}
