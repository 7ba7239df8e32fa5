use crate::error::Error;
use crate::node::{abi, Node};
use crate::types::Address;
use crate::utils::constants::SECONDS_PER_DAY;
use chrono::DateTime;
use std::collections::{HashMap, HashSet};

/// Vesting-wallet entitlement for one beneficiary. Amounts are in base
/// units (18 decimals); timestamps are chain seconds.
///
/// `total_locked` is the vesting wallet's current token balance. The
/// schedule accessor contributes only `releasable`; the two conventions
/// are not interchangeable and this is the one displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VestingSchedule {
    pub beneficiary: Address,
    pub vesting_wallet: Address,
    pub start: u64,
    pub duration: u64,
    pub total_locked: u128,
    pub releasable: u128,
    pub released: u128,
}

impl VestingSchedule {
    pub fn duration_days(&self) -> u64 {
        self.duration / SECONDS_PER_DAY
    }

    /// Whole-second schedule math; already-elapsed schedules report zero.
    pub fn remaining_days(&self, now: u64) -> f64 {
        let end = self.start.saturating_add(self.duration);
        end.saturating_sub(now) as f64 / SECONDS_PER_DAY as f64
    }

    /// Start date for display, local formatting only.
    pub fn start_date(&self) -> String {
        DateTime::from_timestamp(self.start as i64, 0)
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

/// Allowlist membership and vesting-schedule lookups. The allowlist and
/// the beneficiary-to-wallet mapping are injected configuration, loaded
/// once at startup and immutable afterwards.
pub struct EligibilityChecker<'a, N> {
    node: &'a N,
    allowlist: &'a HashSet<Address>,
    vesting_wallets: &'a HashMap<Address, Address>,
    token: Address,
}

impl<'a, N: Node> EligibilityChecker<'a, N> {
    pub fn new(
        node: &'a N,
        allowlist: &'a HashSet<Address>,
        vesting_wallets: &'a HashMap<Address, Address>,
        token: Address,
    ) -> Self {
        EligibilityChecker {
            node,
            allowlist,
            vesting_wallets,
            token,
        }
    }

    /// Pure set membership, no I/O. Addresses are normalized at parse
    /// time, so this is a case-insensitive compare.
    pub fn is_allowlisted(&self, address: &Address) -> bool {
        self.allowlist.contains(address)
    }

    /// `None` without any contract read when the beneficiary has no
    /// mapped vesting wallet. The ownership check gates the remaining
    /// reads: schedule data is never fetched for a non-beneficiary.
    pub async fn vesting_schedule(
        &self,
        beneficiary: &Address,
    ) -> Result<Option<VestingSchedule>, Error> {
        let Some(wallet) = self.vesting_wallets.get(beneficiary) else {
            return Ok(None);
        };

        let owner_word = self
            .node
            .call(wallet, abi::encode_call(abi::SEL_OWNER, &[]))
            .await?;
        if abi::decode_address(&owner_word)? != *beneficiary {
            return Ok(None);
        }

        let token_arg = [self.token];
        let wallet_arg = [*wallet];
        let (duration, start, releasable, released, total_locked) = tokio::join!(
            self.read_uint(wallet, abi::SEL_DURATION, &[]),
            self.read_uint(wallet, abi::SEL_START, &[]),
            self.read_uint(wallet, abi::SEL_RELEASABLE, &token_arg),
            self.read_uint(wallet, abi::SEL_RELEASED, &token_arg),
            self.read_uint(&self.token, abi::SEL_BALANCE_OF, &wallet_arg),
        );

        Ok(Some(VestingSchedule {
            beneficiary: *beneficiary,
            vesting_wallet: *wallet,
            start: as_timestamp(start?)?,
            duration: as_timestamp(duration?)?,
            total_locked: total_locked?,
            releasable: releasable?,
            released: released?,
        }))
    }

    async fn read_uint(
        &self,
        to: &Address,
        selector: [u8; 4],
        args: &[Address],
    ) -> Result<u128, Error> {
        let output = self.node.call(to, abi::encode_call(selector, args)).await?;
        abi::decode_uint(&output)
    }
}

fn as_timestamp(value: u128) -> Result<u64, Error> {
    u64::try_from(value)
        .map_err(|_| Error::RpcFailure(format!("timestamp out of range: {value}")))
}
