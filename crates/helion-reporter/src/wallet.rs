use alloy::{
    primitives::Address,
    providers::{Provider, ProviderBuilder, RootProvider},
    transports::BoxTransport,
};
use eyre::WrapErr;
use tracing::{debug, info};

/// Something that can disclose the addresses of a user's accounts.
pub(crate) trait WalletProvider {
    async fn addresses(&self) -> eyre::Result<Vec<Address>>;
}

/// Wallet reached over JSON-RPC, answering `eth_accounts`.
///
/// The endpoint is only dialled when addresses are requested, so an unreachable
/// wallet surfaces as an unavailable connection rather than a startup error.
#[derive(Debug, Clone)]
pub(crate) struct RpcWallet {
    wallet_url: String,
}

impl RpcWallet {
    pub(crate) fn new(wallet_url: impl Into<String>) -> Self {
        Self {
            wallet_url: wallet_url.into(),
        }
    }

    async fn provider(&self) -> eyre::Result<RootProvider<BoxTransport>> {
        ProviderBuilder::new()
            .on_builtin(&self.wallet_url)
            .await
            .wrap_err_with(|| format!("failed to reach wallet at {}", self.wallet_url))
    }
}

impl WalletProvider for RpcWallet {
    async fn addresses(&self) -> eyre::Result<Vec<Address>> {
        let accounts = self
            .provider()
            .await?
            .get_accounts()
            .await
            .wrap_err("wallet did not disclose accounts")?;

        Ok(accounts)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum WalletConnection {
    Connected(Vec<Address>),
    Unavailable(String),
}

impl WalletConnection {
    pub(crate) fn addresses(&self) -> &[Address] {
        match self {
            Self::Connected(addresses) => addresses,
            Self::Unavailable(_) => &[],
        }
    }
}

pub(crate) async fn connect_wallet<W: WalletProvider>(wallet: Option<&W>) -> WalletConnection {
    let Some(wallet) = wallet else {
        debug!("No wallet provider configured");
        return WalletConnection::Unavailable("no wallet provider configured".to_owned());
    };

    match wallet.addresses().await {
        Ok(addresses) => {
            info!(count = addresses.len(), "Wallet connected");
            WalletConnection::Connected(addresses)
        }
        Err(err) => WalletConnection::Unavailable(format!("{err:#}")),
    }
}
