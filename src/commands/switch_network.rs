use crate::commands::connect::open_session;
use crate::error::Error;
use crate::session::NetworkStatus;
use crate::utils::config::settings;

pub async fn print_switch_network() -> Result<(), Error> {
    let settings = settings();
    let mut session = open_session(settings)?;

    session.connect().await?;
    match session.switch_network().await? {
        NetworkStatus::Ok => {
            println!("Wallet is on the expected chain {}", settings.expected_chain_id);
            Ok(())
        }
        NetworkStatus::Mismatch { actual } => Err(Error::WrongNetwork {
            expected: settings.expected_chain_id,
            actual,
        }),
    }
}
