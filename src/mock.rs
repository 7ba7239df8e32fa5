//! In-memory doubles for the wallet provider and the node, shared by the
//! unit tests. Responses are queued or keyed up front; every request is
//! recorded for assertions on call order and payloads.

use crate::error::Error;
use crate::node::{Node, Receipt};
use crate::provider::{ProviderEvent, WalletProvider};
use crate::types::Address;
use crate::utils::config::NetworkProfile;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tokio::sync::mpsc;

pub fn sepolia_profile() -> NetworkProfile {
    NetworkProfile {
        chain_id: 11_155_111,
        chain_name: "Sepolia Testnet".to_string(),
        rpc_url: "https://rpc.sepolia.org".to_string(),
        currency_name: "Ether".to_string(),
        currency_symbol: "ETH".to_string(),
        explorer_url: "https://sepolia.etherscan.io".to_string(),
    }
}

/// Wallet double answering from a FIFO queue of prepared outcomes. A
/// request past the end of the queue fails loudly instead of hanging the
/// test.
pub struct MockProvider {
    responses: Mutex<VecDeque<Result<Value, Error>>>,
    calls: Mutex<Vec<(String, Value)>>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<ProviderEvent>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        MockProvider {
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn push_ok(&self, value: Value) {
        self.responses.lock().unwrap().push_back(Ok(value));
    }

    pub fn push_err(&self, error: Error) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn emit(&self, event: ProviderEvent) {
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|sender| sender.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().unwrap().len()
    }
}

impl WalletProvider for MockProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, Error> {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), params));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::RpcFailure(format!("unexpected request: {method}"))))
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<ProviderEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().unwrap().push(tx);
        rx
    }
}

/// Node double keyed by address and call selector. Unconfigured reads
/// fail with `RpcFailure`, which doubles as the failure injection for
/// error-path tests.
pub struct MockNode {
    native: Mutex<HashMap<Address, u128>>,
    returns: Mutex<HashMap<(Address, [u8; 4]), Vec<u8>>>,
    receipts: Mutex<VecDeque<Option<Receipt>>>,
    native_calls: Mutex<u64>,
    contract_calls: Mutex<Vec<(Address, Vec<u8>)>>,
    receipt_calls: Mutex<u64>,
}

impl MockNode {
    pub fn new() -> Self {
        MockNode {
            native: Mutex::new(HashMap::new()),
            returns: Mutex::new(HashMap::new()),
            receipts: Mutex::new(VecDeque::new()),
            native_calls: Mutex::new(0),
            contract_calls: Mutex::new(Vec::new()),
            receipt_calls: Mutex::new(0),
        }
    }

    pub fn set_native(&self, address: Address, base_units: u128) {
        self.native.lock().unwrap().insert(address, base_units);
    }

    pub fn set_uint(&self, to: Address, selector: [u8; 4], value: u128) {
        let mut word = [0u8; 32];
        word[16..].copy_from_slice(&value.to_be_bytes());
        self.returns
            .lock()
            .unwrap()
            .insert((to, selector), word.to_vec());
    }

    pub fn set_address(&self, to: Address, selector: [u8; 4], value: Address) {
        let mut word = [0u8; 32];
        word[12..].copy_from_slice(value.as_bytes());
        self.returns
            .lock()
            .unwrap()
            .insert((to, selector), word.to_vec());
    }

    pub fn push_receipt(&self, receipt: Option<Receipt>) {
        self.receipts.lock().unwrap().push_back(receipt);
    }

    pub fn native_call_count(&self) -> u64 {
        *self.native_calls.lock().unwrap()
    }

    pub fn contract_calls(&self) -> Vec<(Address, Vec<u8>)> {
        self.contract_calls.lock().unwrap().clone()
    }

    pub fn receipt_call_count(&self) -> u64 {
        *self.receipt_calls.lock().unwrap()
    }
}

impl Node for MockNode {
    async fn native_balance(&self, address: &Address) -> Result<u128, Error> {
        *self.native_calls.lock().unwrap() += 1;
        self.native
            .lock()
            .unwrap()
            .get(address)
            .copied()
            .ok_or_else(|| Error::RpcFailure(format!("no native balance set for {address}")))
    }

    async fn call(&self, to: &Address, data: Vec<u8>) -> Result<Vec<u8>, Error> {
        if data.len() < 4 {
            return Err(Error::RpcFailure("calldata shorter than a selector".to_string()));
        }
        let selector = [data[0], data[1], data[2], data[3]];
        self.contract_calls.lock().unwrap().push((*to, data));
        self.returns
            .lock()
            .unwrap()
            .get(&(*to, selector))
            .cloned()
            .ok_or_else(|| {
                Error::RpcFailure(format!(
                    "no return configured for {to} selector 0x{}",
                    hex::encode(selector)
                ))
            })
    }

    async fn transaction_receipt(&self, _tx_hash: &str) -> Result<Option<Receipt>, Error> {
        *self.receipt_calls.lock().unwrap() += 1;
        Ok(self.receipts.lock().unwrap().pop_front().flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn emit_reaches_live_subscribers_and_prunes_dropped_ones() {
        let provider = MockProvider::new();
        let mut receiver = provider.subscribe();
        let dropped = provider.subscribe();
        drop(dropped);

        provider.emit(ProviderEvent::ChainChanged(1));
        assert!(matches!(
            receiver.try_recv(),
            Ok(ProviderEvent::ChainChanged(1))
        ));
        assert_eq!(provider.subscriber_count(), 1);
    }
}
