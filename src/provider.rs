use crate::error::Error;
use crate::utils::config::Settings;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tokio::sync::mpsc;

/// Change notification pushed by the wallet. Payloads arrive untyped from
/// the provider and are validated by the session when applied.
#[derive(Debug, Clone)]
pub enum ProviderEvent {
    AccountsChanged(Vec<String>),
    ChainChanged(u64),
}

/// Capability boundary to the wallet. The session receives an
/// implementation explicitly instead of reaching for an ambient handle,
/// which is what makes test doubles possible.
///
/// Dropping the receiver returned by `subscribe` releases the
/// subscription; implementations prune closed channels on emit.
#[allow(async_fn_in_trait)]
pub trait WalletProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, Error>;
    fn subscribe(&self) -> mpsc::UnboundedReceiver<ProviderEvent>;
}

/// Wallet bridge speaking EIP-1193-style methods over HTTP JSON-RPC, e.g.
/// an unlocked development node or a local signing daemon. An HTTP bridge
/// cannot push change notifications, so its subscriptions stay silent;
/// event handling is exercised against providers that do push.
pub struct HttpWalletProvider {
    client: reqwest::Client,
    url: String,
    request_id: AtomicU64,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<ProviderEvent>>>,
}

impl HttpWalletProvider {
    pub fn new(url: impl Into<String>, timeout: std::time::Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(HttpWalletProvider {
            client,
            url: url.into(),
            request_id: AtomicU64::new(1),
            subscribers: Mutex::new(Vec::new()),
        })
    }

    /// `ProviderMissing` when no wallet bridge is configured; the caller
    /// surfaces an install/configure prompt instead of crashing.
    pub fn from_settings(settings: &Settings) -> Result<Self, Error> {
        let url = settings
            .wallet_rpc_url
            .clone()
            .ok_or(Error::ProviderMissing)?;
        HttpWalletProvider::new(url, settings.rpc_timeout)
    }
}

impl WalletProvider for HttpWalletProvider {
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
                if e.is_connect() {
                    // An unreachable bridge reads the same as a missing one.
                    Error::ProviderMissing
                } else if e.is_timeout() {
                    Error::RpcFailure(format!("wallet request timed out: {method}"))
                } else {
                    Error::RpcFailure(format!("wallet request failed: {e}"))
                }
            })?;

        let payload: Value = response
            .json()
            .await
            .map_err(|e| Error::RpcFailure(format!("malformed wallet response: {e}")))?;

        if let Some(error) = payload.get("error") {
            let code = error.get("code").and_then(Value::as_i64).unwrap_or(-1);
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown wallet error")
                .to_string();
            return Err(Error::Provider { code, message });
        }

        payload
            .get("result")
            .cloned()
            .ok_or_else(|| Error::RpcFailure(format!("{method}: response carries no result")))
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<ProviderEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|sender| !sender.is_closed());
        subscribers.push(tx);
        rx
    }
}
