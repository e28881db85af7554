//! Conversion utilities for user-supplied amounts.

use alloy_primitives::U256;
use thiserror::Error;

/// Errors that can occur while parsing an amount.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConversionError {
	#[error("Unknown unit: {0}")]
	UnknownUnit(String),
	#[error("Invalid amount: {0}")]
	InvalidAmount(String),
}

/// Returns the number of decimals of a named unit.
fn unit_decimals(unit: &str) -> Option<usize> {
	match unit {
		"" | "wei" => Some(0),
		"kwei" | "babbage" => Some(3),
		"mwei" | "lovelace" => Some(6),
		"gwei" | "shannon" => Some(9),
		"szabo" | "microether" => Some(12),
		"finney" | "milliether" => Some(15),
		"ether" => Some(18),
		_ => None,
	}
}

/// Parses an amount into wei.
///
/// Accepts a bare integer (wei) or a decimal number followed by a unit, with or
/// without a space: `21000000000`, `21 gwei`, `1.5ether`. Units are
/// case-insensitive. Fractions finer than one wei are rejected.
pub fn parse_wei(input: &str) -> Result<U256, ConversionError> {
	let trimmed = input.trim();
	let split = trimmed
		.find(|c: char| c.is_ascii_alphabetic())
		.unwrap_or(trimmed.len());
	let (amount, unit) = trimmed.split_at(split);
	let amount = amount.trim();
	let unit = unit.trim().to_ascii_lowercase();

	let decimals =
		unit_decimals(&unit).ok_or_else(|| ConversionError::UnknownUnit(unit.clone()))?;

	let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));
	if whole.is_empty() && fraction.is_empty() {
		return Err(ConversionError::InvalidAmount(input.to_string()));
	}
	if fraction.len() > decimals {
		return Err(ConversionError::InvalidAmount(format!(
			"{} has more decimal places than {} allows",
			amount, unit
		)));
	}

	let digits = format!("{}{:0<width$}", whole, fraction, width = decimals);
	if !digits.chars().all(|c| c.is_ascii_digit()) {
		return Err(ConversionError::InvalidAmount(input.to_string()));
	}

	U256::from_str_radix(&digits, 10)
		.map_err(|e| ConversionError::InvalidAmount(format!("{}: {}", input, e)))
}
