use std::time::Duration;

use eyre::{eyre, WrapErr};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'a str,
    id: u64,
    method: &'a str,
    params: &'a [Value],
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorObject>,
}

/// Issues a single raw `eth_chainId` call and returns the result as sent by the node.
///
/// A string result is returned verbatim, any other JSON value as its JSON text and
/// an absent or `null` result as `null`.
pub(crate) async fn health_check(
    client: &reqwest::Client,
    rpc_url: &str,
    timeout: Duration,
) -> eyre::Result<String> {
    let payload = RpcRequest {
        jsonrpc: "2.0",
        id: 1,
        method: "eth_chainId",
        params: &[],
    };

    let response = client
        .post(rpc_url)
        .json(&payload)
        .timeout(timeout)
        .send()
        .await
        .wrap_err("eth_chainId request failed")?
        .error_for_status()?;

    let body: RpcResponse = response
        .json()
        .await
        .wrap_err("eth_chainId response is not JSON-RPC")?;
    debug!(?body, "Health check response");

    match body {
        RpcResponse {
            result: Some(Value::String(chain_id)),
            ..
        } => Ok(chain_id),
        RpcResponse {
            result: Some(other),
            ..
        } => Ok(other.to_string()),
        RpcResponse {
            error: Some(err), ..
        } => Err(eyre!("node returned error {}: {}", err.code, err.message)),
        RpcResponse { .. } => Ok("null".to_owned()),
    }
}

/// Parses a `0x`-prefixed quantity such as `0x14a34`.
pub(crate) fn parse_chain_id(hex: &str) -> Option<u64> {
    let digits = hex.strip_prefix("0x").or_else(|| hex.strip_prefix("0X"))?;
    u64::from_str_radix(digits, 16).ok()
}
