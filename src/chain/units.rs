//! Unit conversion and display helpers.

use alloy::primitives::utils::{format_ether, parse_ether};
use alloy::primitives::{I256, U256};

use crate::chain::types::{ChainError, ChainResult};

/// Parse a decimal ETH amount ("0.1") into wei.
pub fn to_wei(eth: &str) -> ChainResult<U256> {
    parse_ether(eth.trim())
        .map_err(|e| ChainError::InvalidAmount(format!("'{}': {}", eth, e)))
}

/// Parse a signed decimal ETH amount ("-0.5") into wei. Range and sign
/// checks are left to transfer validation.
pub fn to_signed_wei(eth: &str) -> ChainResult<I256> {
    let trimmed = eth.trim();
    let (negative, magnitude) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let wei = I256::try_from(to_wei(magnitude)?)
        .map_err(|_| ChainError::InvalidAmount(format!("'{}': out of range", eth)))?;
    Ok(if negative { -wei } else { wei })
}

/// Render wei as a decimal ETH amount with 18 fractional digits.
pub fn to_eth(wei: U256) -> String {
    format_ether(wei)
}

/// Shorten an address for display, keeping `chars` hex digits at each end:
/// `0x1234...5678`. Short inputs are returned unchanged.
pub fn format_address(address: &str, chars: usize) -> String {
    if address.is_empty() || !address.is_ascii() || address.len() <= chars * 2 + 2 {
        return address.to_string();
    }
    format!(
        "{}...{}",
        &address[..chars + 2],
        &address[address.len() - chars..]
    )
}
