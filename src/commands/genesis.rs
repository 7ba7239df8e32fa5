use crate::error::Error;
use crate::utils::config::settings;

pub fn print_genesis_addresses() -> Result<(), Error> {
    let mut addresses: Vec<String> = settings()
        .genesis_addresses
        .iter()
        .map(|address| address.to_string())
        .collect();
    addresses.sort();

    for address in addresses {
        println!("{address}");
    }
    Ok(())
}
