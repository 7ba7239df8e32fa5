use crate::error::Error;
use crate::provider::{ProviderEvent, WalletProvider};
use crate::types::Address;
use crate::utils::config::NetworkProfile;
use crate::utils::constants::PROVIDER_CODE_UNRECOGNIZED_CHAIN;
use crate::utils::{parse_quantity, to_hex_quantity};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStatus {
    Ok,
    Mismatch { actual: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Connected {
        account: Address,
        chain_id: u64,
        network: NetworkStatus,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct ConnectedAccount {
    pub address: Address,
    pub chain_id: u64,
    pub network: NetworkStatus,
}

/// Epoch ticket taken before a fetch cycle. A result is applied only if
/// its ticket is still current when it resolves, so a change notification
/// that lands mid-fetch supersedes the stale result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Connection state machine over an injected wallet provider:
/// `Disconnected -> Connecting -> Connected(Ok | Mismatch)`. Connected
/// persists until the provider revokes access or the process ends; there
/// is no logout beyond dropping the session.
pub struct WalletSession<P> {
    provider: P,
    expected_chain_id: u64,
    network_profile: NetworkProfile,
    state: SessionState,
    epoch: u64,
    in_flight: AtomicBool,
}

impl<P: WalletProvider> WalletSession<P> {
    pub fn new(provider: P, expected_chain_id: u64, network_profile: NetworkProfile) -> Self {
        WalletSession {
            provider,
            expected_chain_id,
            network_profile,
            state: SessionState::Disconnected,
            epoch: 0,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn account(&self) -> Option<Address> {
        match self.state {
            SessionState::Connected { account, .. } => Some(account),
            _ => None,
        }
    }

    pub fn is_wrong_network(&self) -> bool {
        matches!(
            self.state,
            SessionState::Connected {
                network: NetworkStatus::Mismatch { .. },
                ..
            }
        )
    }

    /// Requests account access and adopts the first authorized account.
    /// Re-entrant calls while one is outstanding return `Busy`.
    pub async fn connect(&mut self) -> Result<ConnectedAccount, Error> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(Error::Busy);
        }
        self.state = SessionState::Connecting;
        let result = self.connect_inner().await;
        if result.is_err() {
            self.state = SessionState::Disconnected;
        }
        self.in_flight.store(false, Ordering::SeqCst);
        result
    }

    async fn connect_inner(&mut self) -> Result<ConnectedAccount, Error> {
        let accounts = self
            .provider
            .request("eth_requestAccounts", json!([]))
            .await?;
        let address = first_account(&accounts)?;
        let chain_id = self.active_chain_id().await?;
        Ok(self.adopt(address, chain_id))
    }

    /// Permissions re-request so the user can pick a different account in
    /// the wallet, then the full adopt+guard sequence on the result.
    pub async fn request_additional_accounts(&mut self) -> Result<ConnectedAccount, Error> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(Error::Busy);
        }
        let result = self.request_additional_accounts_inner().await;
        self.in_flight.store(false, Ordering::SeqCst);
        result
    }

    async fn request_additional_accounts_inner(&mut self) -> Result<ConnectedAccount, Error> {
        self.provider
            .request("wallet_requestPermissions", json!([{ "eth_accounts": {} }]))
            .await?;
        let accounts = self.provider.request("eth_accounts", json!([])).await?;
        let address = first_account(&accounts)?;
        let chain_id = self.active_chain_id().await?;
        self.epoch += 1; // a fresh fetch cycle supersedes anything pending
        Ok(self.adopt(address, chain_id))
    }

    /// Compares the active chain id against the expected one and updates
    /// the connected state. A matching id clears any prior mismatch.
    pub fn guard_network(&mut self, chain_id: u64) -> NetworkStatus {
        let network = if chain_id == self.expected_chain_id {
            NetworkStatus::Ok
        } else {
            NetworkStatus::Mismatch { actual: chain_id }
        };
        if let SessionState::Connected {
            account,
            chain_id: ref mut current,
            network: ref mut status,
        } = self.state
        {
            let _ = account;
            *current = chain_id;
            *status = network;
        }
        network
    }

    /// Asks the wallet to switch to the expected chain. When the wallet
    /// does not know the chain (code 4902), falls back to registering the
    /// configured network profile. Re-guards against the chain the wallet
    /// reports afterwards.
    pub async fn switch_network(&mut self) -> Result<NetworkStatus, Error> {
        let params = json!([{ "chainId": to_hex_quantity(self.expected_chain_id) }]);
        match self
            .provider
            .request("wallet_switchEthereumChain", params)
            .await
        {
            Ok(_) => {}
            Err(e) if e.provider_code() == Some(PROVIDER_CODE_UNRECOGNIZED_CHAIN) => {
                self.add_network().await?;
            }
            Err(e) => return Err(e),
        }
        let chain_id = self.active_chain_id().await?;
        Ok(self.guard_network(chain_id))
    }

    /// Registers the expected chain with the wallet: RPC URL, display
    /// name, native currency and explorer URL from the configured profile.
    pub async fn add_network(&self) -> Result<(), Error> {
        let profile = &self.network_profile;
        let params = json!([{
            "chainId": to_hex_quantity(profile.chain_id),
            "chainName": profile.chain_name,
            "rpcUrls": [profile.rpc_url],
            "nativeCurrency": {
                "name": profile.currency_name,
                "symbol": profile.currency_symbol,
                "decimals": 18,
            },
            "blockExplorerUrls": [profile.explorer_url],
        }]);
        self.provider
            .request("wallet_addEthereumChain", params)
            .await?;
        Ok(())
    }

    /// Scoped acquisition of the provider's change notifications; dropping
    /// the receiver releases the subscription.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<ProviderEvent> {
        self.provider.subscribe()
    }

    /// Applies a change notification: adopts the new account or chain,
    /// re-runs the network guard and bumps the fetch epoch so results of
    /// any in-flight fetch are discarded.
    pub fn handle_event(&mut self, event: ProviderEvent) -> FetchTicket {
        self.epoch += 1;
        match event {
            ProviderEvent::AccountsChanged(accounts) => match accounts.first() {
                Some(raw) => match raw.parse::<Address>() {
                    Ok(address) => {
                        if let SessionState::Connected {
                            account: ref mut current,
                            ..
                        } = self.state
                        {
                            *current = address;
                        }
                    }
                    Err(_) => log::warn!("ignoring malformed account in change event: {raw}"),
                },
                None => self.state = SessionState::Disconnected,
            },
            ProviderEvent::ChainChanged(chain_id) => {
                self.guard_network(chain_id);
            }
        }
        self.fetch_ticket()
    }

    pub fn fetch_ticket(&self) -> FetchTicket {
        FetchTicket(self.epoch)
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.0 == self.epoch
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    async fn active_chain_id(&self) -> Result<u64, Error> {
        let result = self.provider.request("eth_chainId", json!([])).await?;
        let raw = result
            .as_str()
            .ok_or_else(|| Error::RpcFailure("eth_chainId: non-string result".to_string()))?;
        let value = parse_quantity(raw)?;
        u64::try_from(value)
            .map_err(|_| Error::RpcFailure(format!("eth_chainId out of range: {raw}")))
    }

    fn adopt(&mut self, address: Address, chain_id: u64) -> ConnectedAccount {
        self.state = SessionState::Connected {
            account: address,
            chain_id,
            network: NetworkStatus::Ok,
        };
        let network = self.guard_network(chain_id);
        ConnectedAccount {
            address,
            chain_id,
            network,
        }
    }

    #[cfg(test)]
    pub(crate) fn mark_in_flight(&self) {
        self.in_flight.store(true, Ordering::SeqCst);
    }
}

fn first_account(accounts: &Value) -> Result<Address, Error> {
    let list = accounts
        .as_array()
        .ok_or_else(|| Error::RpcFailure("wallet returned a non-list of accounts".to_string()))?;
    let raw = list
        .first()
        .and_then(Value::as_str)
        .ok_or_else(|| Error::RpcFailure("wallet returned no accounts".to_string()))?;
    raw.parse()
        .map_err(|_| Error::RpcFailure(format!("wallet returned a malformed account: {raw}")))
}
