use crate::eligibility::EligibilityChecker;
use crate::error::Error;
use crate::node::RpcNode;
use crate::types::Address;
use crate::utils::config::settings;
use crate::utils::constants::TOKEN_SYMBOL;
use crate::utils::format_token_amount;
use std::time::{SystemTime, UNIX_EPOCH};

pub async fn print_vesting_status(beneficiary: &str) -> Result<(), Error> {
    let beneficiary: Address = beneficiary.parse()?;
    let settings = settings();
    let node = RpcNode::from_settings(settings)?;
    let checker = EligibilityChecker::new(
        &node,
        &settings.genesis_addresses,
        &settings.vesting_wallets,
        settings.token_address,
    );

    let Some(schedule) = checker.vesting_schedule(&beneficiary).await? else {
        println!("No vesting wallet attached to {beneficiary}");
        return Ok(());
    };

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| Error::Config(format!("system clock before epoch: {e}")))?
        .as_secs();

    println!("Vesting wallet: {}", schedule.vesting_wallet);
    println!("Start date: {}", schedule.start_date());
    println!("Duration: {} days", schedule.duration_days());
    println!("Remaining: {:.1} days", schedule.remaining_days(now));
    println!(
        "Locked: {} {TOKEN_SYMBOL}",
        format_token_amount(schedule.total_locked)
    );
    println!(
        "Claimable now: {} {TOKEN_SYMBOL}",
        format_token_amount(schedule.releasable)
    );
    println!(
        "Already released: {} {TOKEN_SYMBOL}",
        format_token_amount(schedule.released)
    );
    Ok(())
}
