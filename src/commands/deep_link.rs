use crate::error::Error;
use crate::utils::constants::DEEP_LINK_URL;

/// Mobile browsers have no injected wallet; the deep link reopens the
/// flow inside the wallet's own browser.
pub fn print_deep_link() -> Result<(), Error> {
    println!("{DEEP_LINK_URL}");
    Ok(())
}
