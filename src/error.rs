use thiserror::Error;

/// Failures surfaced by the discovery and claim flow. Every variant is
/// converted to a single user-visible message at the command boundary;
/// none of them tears the process down from inside an operation.
#[derive(Error, Debug)]
pub enum Error {
    #[error("No compatible wallet provider is available. Set WALLET_RPC_URL to a wallet bridge endpoint or install a compatible wallet")]
    ProviderMissing,

    #[error("Invalid Ethereum address: {0}")]
    InvalidAddress(String),

    #[error("Wrong Network: expected chain {expected}, connected to chain {actual}")]
    WrongNetwork { expected: u64, actual: u64 },

    #[error("Node request failed: {0}")]
    RpcFailure(String),

    #[error("Transaction rejected in the wallet")]
    TransactionRejected,

    #[error("Transaction reverted: {0}")]
    TransactionReverted(String),

    /// Raw wallet-bridge error kept with its numeric code until the
    /// operation boundary maps it (4001 rejection, 4902 unknown chain).
    #[error("Wallet provider error {code}: {message}")]
    Provider { code: i64, message: String },

    #[error("Another operation is already in progress")]
    Busy,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Numeric code of the underlying wallet-bridge error, if any.
    pub fn provider_code(&self) -> Option<i64> {
        match self {
            Error::Provider { code, .. } => Some(*code),
            _ => None,
        }
    }
}
