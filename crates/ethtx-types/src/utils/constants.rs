//! Protocol constants shared across the ethtx crates.

/// Width of an ABI word and of a log data word, in bytes.
pub const WORD_SIZE: usize = 32;

/// Length of a function selector, in bytes.
pub const SELECTOR_SIZE: usize = 4;

/// Gas charged for a plain value transfer with no call data.
pub const BASE_TRANSFER_GAS: u64 = 21_000;

/// Number of hex characters in a 32-byte transaction hash, without prefix.
pub const HASH_HEX_LENGTH: usize = 64;
