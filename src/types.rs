use crate::error::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A 20-byte Ethereum address, normalized to lowercase at parse time so
/// that membership and ownership comparisons are case-insensitive by
/// construction.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; 20]);

impl Address {
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != 20 {
            return Err(Error::InvalidAddress(format!(
                "expected 20 bytes, got {}",
                bytes.len()
            )));
        }
        let mut out = [0u8; 20];
        out.copy_from_slice(bytes);
        Ok(Address(out))
    }

    /// Shortened display form used in logs: `0x1134...b59b` style.
    pub fn truncated(&self) -> String {
        let full = self.to_string();
        format!("{}...{}", &full[..6], &full[full.len() - 4..])
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let hex_part = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| Error::InvalidAddress(trimmed.to_string()))?;
        if hex_part.len() != 40 {
            return Err(Error::InvalidAddress(trimmed.to_string()));
        }
        let bytes = hex::decode(hex_part.to_ascii_lowercase())
            .map_err(|_| Error::InvalidAddress(trimmed.to_string()))?;
        Address::from_slice(&bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_normalizes_mixed_case() {
        let mixed: Address = "0x1134Bb07cb7F35946E7e02f58cA7fcC64698B59b".parse().unwrap();
        let lower: Address = "0x1134bb07cb7f35946e7e02f58ca7fcc64698b59b".parse().unwrap();
        assert_eq!(mixed, lower);
        assert_eq!(
            mixed.to_string(),
            "0x1134bb07cb7f35946e7e02f58ca7fcc64698b59b"
        );
    }

    #[test]
    fn rejects_malformed_input() {
        assert!("".parse::<Address>().is_err());
        assert!("1134bb07cb7f35946e7e02f58ca7fcc64698b59b".parse::<Address>().is_err());
        assert!("0x1234".parse::<Address>().is_err());
        assert!("0xzz34bb07cb7f35946e7e02f58ca7fcc64698b59b".parse::<Address>().is_err());
    }

    #[test]
    fn truncated_form() {
        let address: Address = "0x1134Bb07cb7F35946E7e02f58cA7fcC64698B59b".parse().unwrap();
        assert_eq!(address.truncated(), "0x1134...b59b");
    }
}
