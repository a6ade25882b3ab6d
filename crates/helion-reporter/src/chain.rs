use alloy::{
    eips::BlockNumberOrTag,
    primitives::{Address, Bytes, U256},
    providers::{Provider, ProviderBuilder, RootProvider},
    rpc::types::BlockTransactionsKind,
    transports::BoxTransport,
};
use eyre::{eyre, WrapErr};

/// Read-only queries the reporter needs from a chain.
pub(crate) trait ChainReader {
    async fn balance(&self, address: Address) -> eyre::Result<U256>;

    async fn block_number(&self) -> eyre::Result<u64>;

    /// Unix timestamp of the given block.
    async fn block_timestamp(&self, number: u64) -> eyre::Result<u64>;

    /// Current gas price in wei.
    async fn gas_price(&self) -> eyre::Result<u128>;

    async fn code_at(&self, address: Address) -> eyre::Result<Bytes>;
}

#[derive(Debug, Clone)]
pub(crate) struct RpcChain {
    provider: RootProvider<BoxTransport>,
}

impl RpcChain {
    pub(crate) async fn connect(rpc_url: &str) -> eyre::Result<Self> {
        let provider = ProviderBuilder::new()
            .on_builtin(rpc_url)
            .await
            .wrap_err_with(|| format!("invalid RPC endpoint {rpc_url}"))?;

        Ok(Self { provider })
    }
}

impl ChainReader for RpcChain {
    async fn balance(&self, address: Address) -> eyre::Result<U256> {
        self.provider
            .get_balance(address)
            .await
            .wrap_err_with(|| format!("failed to fetch balance of {address}"))
    }

    async fn block_number(&self) -> eyre::Result<u64> {
        self.provider
            .get_block_number()
            .await
            .wrap_err("failed to fetch latest block number")
    }

    async fn block_timestamp(&self, number: u64) -> eyre::Result<u64> {
        let block = self
            .provider
            .get_block_by_number(
                BlockNumberOrTag::Number(number),
                BlockTransactionsKind::Hashes,
            )
            .await
            .wrap_err_with(|| format!("failed to fetch block {number}"))?
            .ok_or_else(|| eyre!("block {number} not found"))?;

        Ok(block.header.timestamp)
    }

    async fn gas_price(&self) -> eyre::Result<u128> {
        self.provider
            .get_gas_price()
            .await
            .wrap_err("failed to fetch gas price")
    }

    async fn code_at(&self, address: Address) -> eyre::Result<Bytes> {
        self.provider
            .get_code_at(address)
            .await
            .wrap_err_with(|| format!("failed to fetch code of {address}"))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{cell::RefCell, collections::HashMap};

    use alloy::primitives::address;

    use super::*;

    /// In-memory chain that records which addresses had their code queried.
    #[derive(Default)]
    pub(crate) struct FakeChain {
        pub(crate) balances: HashMap<Address, U256>,
        pub(crate) code: HashMap<Address, Bytes>,
        pub(crate) block_number: u64,
        pub(crate) timestamp: u64,
        pub(crate) gas_price: u128,
        pub(crate) fail_block: bool,
        pub(crate) code_queries: RefCell<Vec<Address>>,
    }

    impl ChainReader for FakeChain {
        async fn balance(&self, address: Address) -> eyre::Result<U256> {
            self.balances
                .get(&address)
                .copied()
                .ok_or_else(|| eyre!("unknown account {address}"))
        }

        async fn block_number(&self) -> eyre::Result<u64> {
            if self.fail_block {
                return Err(eyre!("connection reset"));
            }
            Ok(self.block_number)
        }

        async fn block_timestamp(&self, number: u64) -> eyre::Result<u64> {
            if number != self.block_number {
                return Err(eyre!("block {number} not found"));
            }
            Ok(self.timestamp)
        }

        async fn gas_price(&self) -> eyre::Result<u128> {
            Ok(self.gas_price)
        }

        async fn code_at(&self, address: Address) -> eyre::Result<Bytes> {
            self.code_queries.borrow_mut().push(address);
            Ok(self.code.get(&address).cloned().unwrap_or_default())
        }
    }

    #[tokio::test]
    async fn rpc_chain_reads_code() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "method": "eth_getCode",
            })))
            .with_header("content-type", "application/json")
            .with_body(r#"{"jsonrpc":"2.0","id":0,"result":"0x6080"}"#)
            .create_async()
            .await;

        let chain = RpcChain::connect(&server.url()).await.unwrap();
        let code = chain
            .code_at(address!("4200000000000000000000000000000000000006"))
            .await
            .unwrap();

        assert_eq!(code, Bytes::from_static(&[0x60, 0x80]));
    }

    #[tokio::test]
    async fn rpc_chain_reads_empty_code() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "method": "eth_getCode",
            })))
            .with_header("content-type", "application/json")
            .with_body(r#"{"jsonrpc":"2.0","id":0,"result":"0x"}"#)
            .create_async()
            .await;

        let chain = RpcChain::connect(&server.url()).await.unwrap();
        let code = chain
            .code_at(address!("036CbD53842c5426634e7929541eC2318f3dCF7e"))
            .await
            .unwrap();

        assert!(code.is_empty());
    }

    #[tokio::test]
    async fn rpc_chain_reads_gas_price() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "method": "eth_gasPrice",
            })))
            .with_header("content-type", "application/json")
            .with_body(r#"{"jsonrpc":"2.0","id":0,"result":"0xf4240"}"#)
            .create_async()
            .await;

        let chain = RpcChain::connect(&server.url()).await.unwrap();

        assert_eq!(chain.gas_price().await.unwrap(), 1_000_000);
    }

    #[tokio::test]
    async fn rpc_chain_surfaces_node_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"jsonrpc":"2.0","id":0,"error":{"code":-32000,"message":"header not found"}}"#,
            )
            .create_async()
            .await;

        let chain = RpcChain::connect(&server.url()).await.unwrap();

        assert!(chain.block_number().await.is_err());
    }
}
