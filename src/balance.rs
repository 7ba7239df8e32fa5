use crate::error::Error;
use crate::node::{abi, Node};
use crate::types::Address;
use crate::utils::{format_native_amount, format_token_amount};

/// Display-ready balances for one address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balances {
    pub native: String,
    pub token: String,
}

/// Read-only balance queries against the token contract and the native
/// coin, over an injected node connection.
pub struct BalanceReader<'a, N> {
    node: &'a N,
    token: Address,
}

impl<'a, N: Node> BalanceReader<'a, N> {
    pub fn new(node: &'a N, token: Address) -> Self {
        BalanceReader { node, token }
    }

    /// Native-coin balance fixed to four fractional digits.
    pub async fn native_balance(&self, address: &Address) -> Result<String, Error> {
        let base_units = self.node.native_balance(address).await?;
        Ok(format_native_amount(base_units))
    }

    /// Token balance truncated to whole tokens with thousands separators.
    pub async fn token_balance(&self, address: &Address) -> Result<String, Error> {
        let data = abi::encode_call(abi::SEL_BALANCE_OF, &[*address]);
        let output = self.node.call(&self.token, data).await?;
        Ok(format_token_amount(abi::decode_uint(&output)?))
    }

    /// Issues both reads concurrently and waits for both outcomes before
    /// reporting, so one failing read never hides the other's result.
    pub async fn fetch(&self, address: &Address) -> Result<Balances, Error> {
        let (native, token) = tokio::join!(
            self.native_balance(address),
            self.token_balance(address)
        );
        match (native, token) {
            (Ok(native), Ok(token)) => Ok(Balances { native, token }),
            (Err(e), Ok(_)) | (Ok(_), Err(e)) => Err(e),
            (Err(native_err), Err(token_err)) => {
                log::warn!("token balance read also failed: {token_err}");
                Err(native_err)
            }
        }
    }
}
