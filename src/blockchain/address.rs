//! Account address parsing and EIP-55 checksum normalization.

use alloy::primitives::Address;
use std::str::FromStr;
use thiserror::Error;

/// Why an address string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("address is empty")]
    Empty,

    #[error("invalid address '{input}': {reason}")]
    Invalid { input: String, reason: &'static str },

    #[error("address '{0}' has an invalid checksum")]
    BadChecksum(String),
}

/// Parse an address given with or without `0x`, in any case.
///
/// All-lowercase and all-uppercase input is accepted as is. Mixed-case input
/// is treated as EIP-55 and must carry a valid checksum.
pub fn normalize_address(input: &str) -> Result<Address, AddressError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AddressError::Empty);
    }

    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if body.len() != 40 {
        return Err(AddressError::Invalid {
            input: trimmed.to_string(),
            reason: "expected 40 hex characters",
        });
    }
    if !body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(AddressError::Invalid {
            input: trimmed.to_string(),
            reason: "contains non-hex characters",
        });
    }

    let address = Address::from_str(body).map_err(|_| AddressError::Invalid {
        input: trimmed.to_string(),
        reason: "not a 20-byte hex string",
    })?;

    let has_upper = body.bytes().any(|b| b.is_ascii_uppercase());
    let has_lower = body.bytes().any(|b| b.is_ascii_lowercase());
    if has_upper && has_lower && &address.to_checksum(None)[2..] != body {
        return Err(AddressError::BadChecksum(trimmed.to_string()));
    }

    Ok(address)
}

/// Normalize to the EIP-55 mixed-case string form.
pub fn to_checksum(input: &str) -> Result<String, AddressError> {
    normalize_address(input).map(|address| address.to_checksum(None))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECKSUMMED: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn test_lowercase_is_checksummed() {
        let normalized = to_checksum(&CHECKSUMMED.to_lowercase()).unwrap();
        assert_eq!(normalized, CHECKSUMMED);
    }

    #[test]
    fn test_without_prefix() {
        let normalized = to_checksum(&CHECKSUMMED[2..].to_uppercase()).unwrap();
        assert_eq!(normalized, CHECKSUMMED);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        for input in [
            CHECKSUMMED,
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
            "  0xCBA756ADBDD00CD47F56E2691711567FE0725D97 ",
        ] {
            let once = to_checksum(input).unwrap();
            let twice = to_checksum(&once).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_invalid_inputs_are_rejected() {
        assert_eq!(normalize_address(""), Err(AddressError::Empty));
        assert!(matches!(
            normalize_address("0x1234"),
            Err(AddressError::Invalid { .. })
        ));
        assert!(matches!(
            normalize_address("0xzzzzb6053F3E94C9b9A09f33669435E7Ef1BeAed"),
            Err(AddressError::Invalid { .. })
        ));
        assert!(matches!(
            normalize_address("not an address"),
            Err(AddressError::Invalid { .. })
        ));
    }

    #[test]
    fn test_bad_checksum_is_rejected() {
        let tampered = "0x5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
        assert_eq!(
            normalize_address(tampered),
            Err(AddressError::BadChecksum(tampered.to_string()))
        );
    }
}
