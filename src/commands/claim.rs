use crate::balance::BalanceReader;
use crate::claim::{release_and_refresh, ClaimExecutor, ClaimPhase};
use crate::commands::connect::open_session;
use crate::eligibility::EligibilityChecker;
use crate::error::Error;
use crate::node::RpcNode;
use crate::session::NetworkStatus;
use crate::utils::config::settings;
use crate::utils::constants::{NATIVE_SYMBOL, TOKEN_SYMBOL};
use crate::utils::format_token_amount;

pub async fn print_claim() -> Result<(), Error> {
    let settings = settings();
    let mut session = open_session(settings)?;

    let connected = session.connect().await?;
    if let NetworkStatus::Mismatch { actual } = connected.network {
        return Err(Error::WrongNetwork {
            expected: settings.expected_chain_id,
            actual,
        });
    }
    let beneficiary = connected.address;

    let node = RpcNode::from_settings(settings)?;
    let reader = BalanceReader::new(&node, settings.token_address);
    let checker = EligibilityChecker::new(
        &node,
        &settings.genesis_addresses,
        &settings.vesting_wallets,
        settings.token_address,
    );

    let Some(schedule) = checker.vesting_schedule(&beneficiary).await? else {
        println!("No vesting wallet attached to {beneficiary}, nothing to claim");
        return Ok(());
    };
    if schedule.releasable == 0 {
        println!("Nothing claimable yet for {}", beneficiary.truncated());
        return Ok(());
    }
    println!(
        "Claiming {} {TOKEN_SYMBOL} from {}",
        format_token_amount(schedule.releasable),
        schedule.vesting_wallet.truncated()
    );

    let executor = ClaimExecutor::new(session.provider(), &node);
    let outcome = release_and_refresh(
        &executor,
        &reader,
        &checker,
        &beneficiary,
        &schedule.vesting_wallet,
        &settings.token_address,
        &mut |phase| match phase {
            ClaimPhase::AwaitingApproval => println!("Waiting for approval in the wallet..."),
            ClaimPhase::Submitted => println!("Transaction submitted, waiting for confirmation..."),
            ClaimPhase::Confirmed => println!("Transaction confirmed"),
        },
    )
    .await?;

    log::info!("Claim confirmed: {}", outcome.tx_hash);
    println!("Transaction: {}", outcome.tx_hash);
    println!("{} {NATIVE_SYMBOL}", outcome.balances.native);
    println!("{} {TOKEN_SYMBOL}", outcome.balances.token);
    if let Some(schedule) = outcome.schedule {
        println!(
            "Claimable now: {} {TOKEN_SYMBOL}",
            format_token_amount(schedule.releasable)
        );
        println!(
            "Already released: {} {TOKEN_SYMBOL}",
            format_token_amount(schedule.released)
        );
    }
    Ok(())
}
