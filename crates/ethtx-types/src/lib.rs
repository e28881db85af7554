//! Common types module for the ethtx tool.
//!
//! This module defines the transaction, receipt and log records shared by every
//! ethtx crate, together with the canonical (RLP) codec used to hash, decode and
//! transmit transactions, and the JSON-RPC wire shapes returned by nodes.

/// Transaction receipts and event logs.
pub mod receipt;
/// JSON-RPC wire representations of transactions and receipts.
pub mod rpc;
/// Zeroizing string wrapper for passphrases and private keys.
pub mod secret_string;
/// Legacy transactions, their canonical encoding and signature handling.
pub mod transaction;
/// Utility functions for hex, unit and amount conversions.
pub mod utils;

pub use alloy_primitives::{keccak256, Address, Bytes, TxKind, B256, U256, U64};
pub use receipt::{Log, Receipt};
pub use rpc::{RpcLog, RpcReceipt, RpcTransaction};
pub use secret_string::SecretString;
pub use transaction::{unsigned_call, CodecError, Signature, Transaction, UnsignedTransaction};
pub use utils::{
	format_token_amount, format_wei, hex_dump, parse_wei, split_words, with_0x_prefix,
	without_0x_prefix, ConversionError, BASE_TRANSFER_GAS, HASH_HEX_LENGTH, SELECTOR_SIZE,
	WORD_SIZE,
};
