//! Utility functions for common type conversions and transformations.
//!
//! This module provides helpers for hex prefixes, hex dumps, word splitting and
//! converting between wei amounts and their human-readable forms.

pub mod constants;
pub mod conversion;
pub mod formatting;

pub use constants::{BASE_TRANSFER_GAS, HASH_HEX_LENGTH, SELECTOR_SIZE, WORD_SIZE};
pub use conversion::{parse_wei, ConversionError};
pub use formatting::{
	format_token_amount, format_wei, hex_dump, split_words, with_0x_prefix, without_0x_prefix,
};
