//! Address format checks.

const ADDRESS_HEX_LEN: usize = 40;

/// True iff `s` is `0x` followed by exactly 40 hex digits, either case.
///
/// Checksums are not enforced.
pub fn validate_address(s: &str) -> bool {
    match s.strip_prefix("0x") {
        Some(hex) => hex.len() == ADDRESS_HEX_LEN && hex.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_addresses() {
        assert!(validate_address("0x1234567890abcdef1234567890abcdef12345678"));
        assert!(validate_address("0xABCDEFABCDEFABCDEFABCDEFABCDEFABCDEFABCD"));
        assert!(validate_address("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
    }

    #[test]
    fn test_invalid_addresses() {
        for s in [
            "",
            "0x",
            "1234567890abcdef1234567890abcdef12345678",
            "0X1234567890abcdef1234567890abcdef12345678",
            "0x1234567890abcdef1234567890abcdef1234567",
            "0x1234567890abcdef1234567890abcdef123456789",
            "0x1234567890abcdef1234567890abcdef1234567g",
            " 0x1234567890abcdef1234567890abcdef12345678",
            "0x1234567890abcdef1234567890abcdef1234567٣",
            "not-an-address",
        ] {
            assert!(!validate_address(s), "{:?} should be rejected", s);
        }
    }

    #[test]
    fn test_repeatable() {
        let s = "0x1234567890abcdef1234567890abcdef12345678";
        assert_eq!(validate_address(s), validate_address(s));
    }
}
