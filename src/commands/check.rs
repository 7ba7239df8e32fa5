use crate::eligibility::EligibilityChecker;
use crate::error::Error;
use crate::node::RpcNode;
use crate::types::Address;
use crate::utils::config::settings;

pub async fn print_check(address: &str) -> Result<(), Error> {
    let address: Address = address.parse()?;
    let settings = settings();
    let node = RpcNode::from_settings(settings)?;
    let checker = EligibilityChecker::new(
        &node,
        &settings.genesis_addresses,
        &settings.vesting_wallets,
        settings.token_address,
    );

    if checker.is_allowlisted(&address) {
        println!("{address} is a genesis address");
    } else {
        println!("{address} is not a genesis address");
    }

    match checker.vesting_schedule(&address).await? {
        Some(schedule) => {
            println!(
                "Vesting wallet {} attached, schedule starts {}",
                schedule.vesting_wallet.truncated(),
                schedule.start_date()
            );
        }
        None => println!("No vesting wallet attached"),
    }
    Ok(())
}
