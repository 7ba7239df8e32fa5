use crate::error::Error;
use crate::utils::constants::{NATIVE_DECIMALS, TOKEN_DECIMALS};

pub mod config;
pub mod constants;

/// Parses a JSON-RPC hex quantity ("0x1a2b") into an integer.
pub fn parse_quantity(raw: &str) -> Result<u128, Error> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);
    if digits.is_empty() {
        return Ok(0);
    }
    u128::from_str_radix(digits, 16)
        .map_err(|_| Error::RpcFailure(format!("malformed quantity in node response: {raw}")))
}

pub fn to_hex_quantity(value: u64) -> String {
    format!("0x{value:x}")
}

/// Native-coin balance rendered with exactly four fractional digits,
/// "0.0000" for a zero balance.
pub fn format_native_amount(base_units: u128) -> String {
    let scale = 10u128.pow(NATIVE_DECIMALS);
    let whole = base_units / scale;
    let fraction = (base_units % scale) / 10u128.pow(NATIVE_DECIMALS - 4);
    format!("{whole}.{fraction:04}")
}

/// Token balance truncated to whole tokens with thousands separators,
/// "0" for a zero balance. Fractional token units are not shown.
pub fn format_token_amount(base_units: u128) -> String {
    format_with_thousands_separator(base_units / 10u128.pow(TOKEN_DECIMALS))
}

pub fn format_with_thousands_separator(value: u128) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_parsing() {
        assert_eq!(parse_quantity("0x0").unwrap(), 0);
        assert_eq!(parse_quantity("0x").unwrap(), 0);
        assert_eq!(parse_quantity("0xaa36a7").unwrap(), 11_155_111);
        assert!(parse_quantity("0xzz").is_err());
    }

    #[test]
    fn native_formatting_keeps_four_digits() {
        assert_eq!(format_native_amount(0), "0.0000");
        assert_eq!(format_native_amount(10u128.pow(18)), "1.0000");
        // 1.23456... ETH truncates to 1.2345
        assert_eq!(format_native_amount(1_234_567_890_000_000_000), "1.2345");
        assert_eq!(format_native_amount(5 * 10u128.pow(14)), "0.0005");
    }

    #[test]
    fn token_formatting_truncates_and_groups() {
        assert_eq!(format_token_amount(0), "0");
        assert_eq!(format_token_amount(999_999_999_999_999_999), "0");
        assert_eq!(format_token_amount(1_234_567 * 10u128.pow(18)), "1,234,567");
        assert_eq!(format_token_amount(1_000 * 10u128.pow(18) + 1), "1,000");
    }

    #[test]
    fn thousands_separator_grouping() {
        assert_eq!(format_with_thousands_separator(0), "0");
        assert_eq!(format_with_thousands_separator(100), "100");
        assert_eq!(format_with_thousands_separator(1_000), "1,000");
        assert_eq!(format_with_thousands_separator(12_345_678), "12,345,678");
    }
}
