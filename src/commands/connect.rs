use crate::balance::BalanceReader;
use crate::eligibility::EligibilityChecker;
use crate::error::Error;
use crate::node::RpcNode;
use crate::provider::HttpWalletProvider;
use crate::session::{NetworkStatus, WalletSession};
use crate::utils::config::{settings, Settings};
use crate::utils::constants::{NATIVE_SYMBOL, TOKEN_SYMBOL};
use crate::utils::format_token_amount;

pub async fn print_connect() -> Result<(), Error> {
    let settings = settings();
    let mut session = open_session(settings)?;

    let connected = session.connect().await?;
    println!("Connected account: {}", connected.address);

    if let NetworkStatus::Mismatch { actual } = connected.network {
        // values stay hidden on the wrong chain
        println!(
            "Wrong network: connected to chain {actual}, expected {}. Run `switch-network` first.",
            settings.expected_chain_id
        );
        return Ok(());
    }

    print_account_overview(&session, settings).await
}

pub(crate) fn open_session(
    settings: &Settings,
) -> Result<WalletSession<HttpWalletProvider>, Error> {
    let provider = HttpWalletProvider::from_settings(settings)?;
    Ok(WalletSession::new(
        provider,
        settings.expected_chain_id,
        settings.network_profile.clone(),
    ))
}

/// Balances and entitlement for the session's account. Results are only
/// rendered when the fetch ticket taken beforehand is still current, so
/// figures for a superseded account or chain are dropped.
pub(crate) async fn print_account_overview(
    session: &WalletSession<HttpWalletProvider>,
    settings: &Settings,
) -> Result<(), Error> {
    let Some(address) = session.account() else {
        return Ok(());
    };
    let ticket = session.fetch_ticket();

    let node = RpcNode::from_settings(settings)?;
    let reader = BalanceReader::new(&node, settings.token_address);
    let checker = EligibilityChecker::new(
        &node,
        &settings.genesis_addresses,
        &settings.vesting_wallets,
        settings.token_address,
    );

    let balances = reader.fetch(&address).await?;
    let schedule = checker.vesting_schedule(&address).await?;

    if !session.is_current(&ticket) {
        log::info!("Discarding stale results for {}", address.truncated());
        return Ok(());
    }

    println!("{} {NATIVE_SYMBOL}", balances.native);
    println!("{} {TOKEN_SYMBOL}", balances.token);

    if checker.is_allowlisted(&address) {
        println!("Genesis address: yes");
    }
    if let Some(schedule) = schedule {
        println!(
            "Claimable now: {} {TOKEN_SYMBOL}",
            format_token_amount(schedule.releasable)
        );
    }
    Ok(())
}
