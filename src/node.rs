use crate::error::Error;
use crate::types::Address;
use crate::utils::config::Settings;
use crate::utils::parse_quantity;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

/// Minimal ABI surface consumed by the flow. Selectors are the first four
/// bytes of the keccak-256 hash of the canonical signature.
pub mod abi {
    use super::{Address, Error};

    pub const SEL_BALANCE_OF: [u8; 4] = [0x70, 0xa0, 0x82, 0x31]; // balanceOf(address)
    pub const SEL_OWNER: [u8; 4] = [0x8d, 0xa5, 0xcb, 0x5b]; // owner()
    pub const SEL_START: [u8; 4] = [0xbe, 0x9a, 0x65, 0x55]; // start()
    pub const SEL_DURATION: [u8; 4] = [0x0f, 0xb5, 0xa6, 0xb4]; // duration()
    pub const SEL_RELEASABLE: [u8; 4] = [0xa3, 0xf8, 0xea, 0xce]; // releasable(address)
    pub const SEL_RELEASED: [u8; 4] = [0x98, 0x52, 0x59, 0x5c]; // released(address)
    pub const SEL_RELEASE: [u8; 4] = [0x19, 0x16, 0x55, 0x87]; // release(address)

    /// Selector plus zero or more address arguments, each left-padded to a
    /// 32-byte word.
    pub fn encode_call(selector: [u8; 4], args: &[Address]) -> Vec<u8> {
        let mut data = Vec::with_capacity(4 + args.len() * 32);
        data.extend_from_slice(&selector);
        for arg in args {
            data.extend_from_slice(&[0u8; 12]);
            data.extend_from_slice(arg.as_bytes());
        }
        data
    }

    /// Decodes a single uint256 return word. Values above u128::MAX are
    /// rejected as malformed rather than silently truncated.
    pub fn decode_uint(output: &[u8]) -> Result<u128, Error> {
        if output.len() < 32 {
            return Err(Error::RpcFailure(format!(
                "short return data: {} bytes",
                output.len()
            )));
        }
        let word = &output[..32];
        if word[..16].iter().any(|b| *b != 0) {
            return Err(Error::RpcFailure(
                "return value exceeds supported amount range".to_string(),
            ));
        }
        let mut raw = [0u8; 16];
        raw.copy_from_slice(&word[16..32]);
        Ok(u128::from_be_bytes(raw))
    }

    /// Decodes a single address return word (last 20 bytes of the word).
    pub fn decode_address(output: &[u8]) -> Result<Address, Error> {
        if output.len() < 32 {
            return Err(Error::RpcFailure(format!(
                "short return data: {} bytes",
                output.len()
            )));
        }
        Address::from_slice(&output[12..32])
            .map_err(|_| Error::RpcFailure("malformed address in return data".to_string()))
    }
}

/// Outcome of a mined transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Receipt {
    pub status: bool,
}

/// Read-only boundary to the remote node. The JSON-RPC client implements
/// it for production; tests substitute an in-memory double.
#[allow(async_fn_in_trait)]
pub trait Node {
    async fn native_balance(&self, address: &Address) -> Result<u128, Error>;
    async fn call(&self, to: &Address, data: Vec<u8>) -> Result<Vec<u8>, Error>;
    async fn transaction_receipt(&self, tx_hash: &str) -> Result<Option<Receipt>, Error>;
}

/// JSON-RPC node client over HTTP. Every request carries the configured
/// timeout; expiry surfaces as `RpcFailure` instead of hanging the flow.
pub struct RpcNode {
    client: reqwest::Client,
    url: String,
    request_id: AtomicU64,
}

impl RpcNode {
    pub fn new(url: impl Into<String>, timeout: std::time::Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(RpcNode {
            client,
            url: url.into(),
            request_id: AtomicU64::new(1),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, Error> {
        RpcNode::new(settings.rpc_address.clone(), settings.rpc_timeout)
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, Error> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": self.request_id.fetch_add(1, Ordering::Relaxed),
            "method": method,
            "params": params,
        });

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::RpcFailure(format!("node request timed out: {method}"))
                } else {
                    Error::RpcFailure(format!("node request failed: {e}"))
                }
            })?;

        let payload: Value = response
            .json()
            .await
            .map_err(|e| Error::RpcFailure(format!("malformed node response: {e}")))?;

        if let Some(error) = payload.get("error") {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown node error");
            return Err(Error::RpcFailure(format!("{method}: {message}")));
        }

        payload
            .get("result")
            .cloned()
            .ok_or_else(|| Error::RpcFailure(format!("{method}: response carries no result")))
    }
}

impl Node for RpcNode {
    async fn native_balance(&self, address: &Address) -> Result<u128, Error> {
        let result = self
            .request("eth_getBalance", json!([address.to_string(), "latest"]))
            .await?;
        let raw = result
            .as_str()
            .ok_or_else(|| Error::RpcFailure("eth_getBalance: non-string result".to_string()))?;
        parse_quantity(raw)
    }

    async fn call(&self, to: &Address, data: Vec<u8>) -> Result<Vec<u8>, Error> {
        let result = self
            .request(
                "eth_call",
                json!([
                    { "to": to.to_string(), "data": format!("0x{}", hex::encode(&data)) },
                    "latest"
                ]),
            )
            .await?;
        let raw = result
            .as_str()
            .ok_or_else(|| Error::RpcFailure("eth_call: non-string result".to_string()))?;
        hex::decode(raw.strip_prefix("0x").unwrap_or(raw))
            .map_err(|e| Error::RpcFailure(format!("eth_call: malformed return data: {e}")))
    }

    async fn transaction_receipt(&self, tx_hash: &str) -> Result<Option<Receipt>, Error> {
        let result = self
            .request("eth_getTransactionReceipt", json!([tx_hash]))
            .await?;
        if result.is_null() {
            return Ok(None);
        }
        let status = result
            .get("status")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Error::RpcFailure("eth_getTransactionReceipt: missing status".to_string())
            })?;
        Ok(Some(Receipt {
            status: parse_quantity(status)? == 1,
        }))
    }
}
