use crate::commands::connect::{open_session, print_account_overview};
use crate::error::Error;
use crate::session::NetworkStatus;
use crate::utils::config::settings;

pub async fn print_switch_account() -> Result<(), Error> {
    let settings = settings();
    let mut session = open_session(settings)?;

    session.connect().await?;
    let connected = session.request_additional_accounts().await?;
    println!("Active account: {}", connected.address);

    if let NetworkStatus::Mismatch { actual } = connected.network {
        println!(
            "Wrong network: connected to chain {actual}, expected {}. Run `switch-network` first.",
            settings.expected_chain_id
        );
        return Ok(());
    }

    print_account_overview(&session, settings).await
}
