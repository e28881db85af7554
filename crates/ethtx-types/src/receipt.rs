//! Receipt types for mined transactions.

use alloy_primitives::{Address, Bytes, B256};
use serde::{Deserialize, Serialize};

/// Event log emitted during transaction execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
	/// The contract that emitted the log.
	pub address: Address,
	/// Indexed topics, at most four.
	#[serde(default)]
	pub topics: Vec<B256>,
	/// Unindexed payload, conventionally a sequence of 32-byte words.
	pub data: Bytes,
}

/// Execution result of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
	/// Status flag: 0 means the transaction reverted.
	pub status: u64,
	/// Gas consumed by the transaction.
	pub gas_used: u64,
	/// Address of the deployed contract, for contract creations.
	pub contract_address: Option<Address>,
	/// Logs in emission order.
	pub logs: Vec<Log>,
}

impl Receipt {
	/// Returns true unless the transaction reverted.
	pub fn succeeded(&self) -> bool {
		self.status != 0
	}
}
