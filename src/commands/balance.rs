use crate::balance::BalanceReader;
use crate::error::Error;
use crate::node::RpcNode;
use crate::types::Address;
use crate::utils::config::settings;
use crate::utils::constants::{NATIVE_SYMBOL, TOKEN_SYMBOL};

pub async fn print_balance(address: &str) -> Result<(), Error> {
    let address: Address = address.parse()?;
    let settings = settings();
    let node = RpcNode::from_settings(settings)?;
    let reader = BalanceReader::new(&node, settings.token_address);

    let balances = reader.fetch(&address).await?;
    log::info!("Balances for {}", address.truncated());
    println!("{} {NATIVE_SYMBOL}", balances.native);
    println!("{} {TOKEN_SYMBOL}", balances.token);
    Ok(())
}
