use crate::error::Error;
use crate::types::Address;
use crate::utils::constants::{
    DEFAULT_CHAIN_NAME, DEFAULT_EXPECTED_CHAIN_ID, DEFAULT_EXPLORER_URL,
    DEFAULT_GENESIS_ADDRESSES, DEFAULT_NATIVE_CURRENCY_NAME, DEFAULT_NATIVE_CURRENCY_SYMBOL,
    DEFAULT_NETWORK, DEFAULT_NEYXT_TOKEN_ADDRESS, DEFAULT_PUBLIC_RPC_URL,
    DEFAULT_RPC_TIMEOUT_SECS,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use dotenvy::dotenv;
use once_cell::sync::OnceCell;
use std::collections::{HashMap, HashSet};
use std::env;
use std::time::Duration;

static SETTINGS: OnceCell<Settings> = OnceCell::new();

/// Chain profile handed to `wallet_addEthereumChain` when the wallet does
/// not know the expected chain.
#[derive(Debug, Clone)]
pub struct NetworkProfile {
    pub chain_id: u64,
    pub chain_name: String,
    pub rpc_url: String,
    pub currency_name: String,
    pub currency_symbol: String,
    pub explorer_url: String,
}

/// Immutable runtime configuration, loaded once at startup. Components
/// receive the pieces they need by reference instead of reading ambient
/// globals, so tests can inject their own values.
#[derive(Debug, Clone)]
pub struct Settings {
    pub expected_chain_id: u64,
    pub token_address: Address,
    pub rpc_address: String,
    pub wallet_rpc_url: Option<String>,
    pub rpc_timeout: Duration,
    pub genesis_addresses: HashSet<Address>,
    pub vesting_wallets: HashMap<Address, Address>,
    pub network_profile: NetworkProfile,
}

impl Settings {
    pub fn from_env() -> Result<Self, Error> {
        let expected_chain_id = match env::var("EXPECTED_CHAIN_ID") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| Error::Config(format!("EXPECTED_CHAIN_ID is not a number: {raw}")))?,
            Err(_) => DEFAULT_EXPECTED_CHAIN_ID,
        };

        let token_address: Address = env::var("NEYXT_TOKEN_ADDRESS")
            .unwrap_or_else(|_| DEFAULT_NEYXT_TOKEN_ADDRESS.to_string())
            .parse()
            .map_err(|e| Error::Config(format!("NEYXT_TOKEN_ADDRESS: {e}")))?;

        let rpc_address = env::var("RPC_ADDRESS").unwrap_or_else(|_| {
            let network = env::var("NETWORK").unwrap_or_else(|_| DEFAULT_NETWORK.to_string());
            let api_key = env::var("INFURA_API_KEY").unwrap_or_default();
            format!("https://{network}.infura.io/v3/{api_key}")
        });

        let wallet_rpc_url = env::var("WALLET_RPC_URL").ok().filter(|v| !v.is_empty());

        let rpc_timeout = match env::var("RPC_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.parse::<u64>()
                    .map_err(|_| Error::Config(format!("RPC_TIMEOUT_SECS is not a number: {raw}")))?,
            ),
            Err(_) => Duration::from_secs(DEFAULT_RPC_TIMEOUT_SECS),
        };

        let genesis_addresses = match env::var("GENESIS_ADDRESSES") {
            Ok(raw) => parse_genesis_addresses(&raw)?,
            Err(_) => parse_genesis_addresses(&DEFAULT_GENESIS_ADDRESSES.join(","))?,
        };

        let vesting_wallets = match env::var("VESTING_WALLETS_BASE64") {
            Ok(raw) if !raw.is_empty() => decode_vesting_wallets(&raw)?,
            _ => HashMap::new(),
        };

        let network_profile = NetworkProfile {
            chain_id: expected_chain_id,
            chain_name: env::var("CHAIN_NAME").unwrap_or_else(|_| DEFAULT_CHAIN_NAME.to_string()),
            rpc_url: env::var("PUBLIC_RPC_URL")
                .unwrap_or_else(|_| DEFAULT_PUBLIC_RPC_URL.to_string()),
            currency_name: env::var("NATIVE_CURRENCY_NAME")
                .unwrap_or_else(|_| DEFAULT_NATIVE_CURRENCY_NAME.to_string()),
            currency_symbol: env::var("NATIVE_CURRENCY_SYMBOL")
                .unwrap_or_else(|_| DEFAULT_NATIVE_CURRENCY_SYMBOL.to_string()),
            explorer_url: env::var("EXPLORER_URL")
                .unwrap_or_else(|_| DEFAULT_EXPLORER_URL.to_string()),
        };

        Ok(Settings {
            expected_chain_id,
            token_address,
            rpc_address,
            wallet_rpc_url,
            rpc_timeout,
            genesis_addresses,
            vesting_wallets,
            network_profile,
        })
    }
}

/// Comma-separated allowlist; every entry is parsed (and thereby
/// normalized), a malformed entry fails startup instead of being skipped.
pub fn parse_genesis_addresses(raw: &str) -> Result<HashSet<Address>, Error> {
    let mut out = HashSet::new();
    for entry in raw.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let address: Address = entry
            .parse()
            .map_err(|e| Error::Config(format!("GENESIS_ADDRESSES: {e}")))?;
        out.insert(address);
    }
    Ok(out)
}

/// Base64-encoded JSON object mapping beneficiary to vesting-wallet
/// contract address.
pub fn decode_vesting_wallets(raw: &str) -> Result<HashMap<Address, Address>, Error> {
    let bytes = BASE64
        .decode(raw.trim())
        .map_err(|e| Error::Config(format!("VESTING_WALLETS_BASE64 is not valid base64: {e}")))?;
    let mapping: HashMap<Address, Address> = serde_json::from_slice(&bytes)
        .map_err(|e| Error::Config(format!("VESTING_WALLETS_BASE64 is not a valid mapping: {e}")))?;
    Ok(mapping)
}

pub fn init() -> Result<(), Error> {
    dotenv().ok();
    let settings = Settings::from_env()?;
    SETTINGS
        .set(settings)
        .map_err(|_| Error::Config("settings already initialized".to_string()))
}

pub fn settings() -> &'static Settings {
    SETTINGS.get().expect("settings not initialized")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genesis_parsing_normalizes_case() {
        let set = parse_genesis_addresses(
            "0x1134Bb07cb7F35946E7e02f58cA7fcC64698B59b, 0x99BB88CBC2A1D0B12F3BA63CD51AC919B7601179",
        )
        .unwrap();
        assert_eq!(set.len(), 2);
        let lower: Address = "0x1134bb07cb7f35946e7e02f58ca7fcc64698b59b".parse().unwrap();
        assert!(set.contains(&lower));
    }

    #[test]
    fn genesis_parsing_rejects_malformed_entries() {
        assert!(parse_genesis_addresses("0x1234,").is_err());
    }

    #[test]
    fn vesting_mapping_roundtrip() {
        let json = r#"{"0x1134Bb07cb7F35946E7e02f58cA7fcC64698B59b":"0x99Bb88cbC2A1D0B12f3BA63Cd51aC919B7601179"}"#;
        let encoded = BASE64.encode(json);
        let mapping = decode_vesting_wallets(&encoded).unwrap();
        let beneficiary: Address = "0x1134bb07cb7f35946e7e02f58ca7fcc64698b59b".parse().unwrap();
        let wallet: Address = "0x99bb88cbc2a1d0b12f3ba63cd51ac919b7601179".parse().unwrap();
        assert_eq!(mapping.get(&beneficiary), Some(&wallet));
    }

    #[test]
    fn vesting_mapping_rejects_garbage() {
        assert!(decode_vesting_wallets("!!!not-base64!!!").is_err());
        assert!(decode_vesting_wallets(&BASE64.encode("[1,2,3]")).is_err());
    }
}
