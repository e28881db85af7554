//! String formatting utilities.
//!
//! Provides functions for formatting values for display, including hex prefix
//! management, hex dumps, word splitting and wei amount scaling.

use super::constants::WORD_SIZE;
use alloy_primitives::U256;

/// Display units for wei amounts, smallest first, as (decimals, name).
const WEI_UNITS: [(u8, &str); 11] = [
	(0, "Wei"),
	(3, "KWei"),
	(6, "MWei"),
	(9, "GWei"),
	(12, "Microether"),
	(15, "Milliether"),
	(18, "Ether"),
	(21, "KEther"),
	(24, "MEther"),
	(27, "GEther"),
	(30, "TEther"),
];

/// Adds "0x" prefix to a hex string if it doesn't already have one.
pub fn with_0x_prefix(hex_str: &str) -> String {
	if hex_str.to_lowercase().starts_with("0x") {
		hex_str.to_string()
	} else {
		format!("0x{}", hex_str)
	}
}

/// Removes "0x" or "0X" prefix from a hex string if present.
pub fn without_0x_prefix(hex_str: &str) -> &str {
	hex_str
		.strip_prefix("0x")
		.or_else(|| hex_str.strip_prefix("0X"))
		.unwrap_or(hex_str)
}

/// Renders bytes as a "0x"-prefixed lowercase hex string.
pub fn hex_dump(bytes: &[u8]) -> String {
	with_0x_prefix(&hex::encode(bytes))
}

/// Splits data into consecutive 32-byte words.
///
/// A length that is not a multiple of the word size yields a shorter final word
/// holding the remaining bytes.
pub fn split_words(data: &[u8]) -> impl Iterator<Item = &[u8]> {
	data.chunks(WORD_SIZE)
}

/// Formats a token amount with decimal places for display.
///
/// Converts a raw integer amount to a human-readable decimal, trimming trailing
/// zeros, e.g. `("1500000", 6)` becomes `"1.5"`.
pub fn format_token_amount(amount: &str, decimals: u8) -> String {
	if decimals == 0 {
		return amount.to_string();
	}

	let decimal_places = decimals as usize;

	// Handle amounts smaller than 1 token
	let (integer_part, decimal_part) = if amount.len() <= decimal_places {
		let decimal_str = format!("{:0>width$}", amount, width = decimal_places);
		("0".to_string(), decimal_str)
	} else {
		let split_pos = amount.len() - decimal_places;
		(
			amount[..split_pos].to_string(),
			amount[split_pos..].to_string(),
		)
	};

	let decimal_trimmed = decimal_part.trim_end_matches('0');

	if decimal_trimmed.is_empty() {
		integer_part
	} else {
		format!("{}.{}", integer_part, decimal_trimmed)
	}
}

/// Formats a wei amount in the largest unit it reaches, e.g. `1.5 GWei`.
///
/// Zero is rendered as a bare `0`.
pub fn format_wei(amount: U256) -> String {
	if amount.is_zero() {
		return "0".to_string();
	}

	let ten = U256::from(10u8);
	let (decimals, unit) = WEI_UNITS
		.iter()
		.rev()
		.find(|(decimals, _)| amount >= ten.pow(U256::from(*decimals)))
		.copied()
		.unwrap_or(WEI_UNITS[0]);

	format!(
		"{} {}",
		format_token_amount(&amount.to_string(), decimals),
		unit
	)
}
