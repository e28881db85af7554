//! JSON-RPC wire types.
//!
//! These mirror the objects returned by `eth_getTransactionByHash` and
//! `eth_getTransactionReceipt`. They are converted into the domain types after
//! validation, never used directly by rendering code.

use crate::receipt::{Log, Receipt};
use crate::transaction::{CodecError, Transaction};
use alloy_consensus::TxLegacy;
use alloy_primitives::{Address, Bytes, B256, U256, U64};
use serde::{Deserialize, Serialize};

/// Transaction object as served by a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcTransaction {
	pub hash: B256,
	pub nonce: U64,
	#[serde(default)]
	pub gas_price: Option<U256>,
	pub gas: U64,
	#[serde(default)]
	pub to: Option<Address>,
	pub value: U256,
	pub input: Bytes,
	pub v: U256,
	pub r: U256,
	pub s: U256,
	/// Block the transaction was included in; `None` while pending.
	#[serde(default)]
	pub block_number: Option<U64>,
	#[serde(default, rename = "type")]
	pub transaction_type: Option<U64>,
}

impl RpcTransaction {
	/// Returns true when the node has not yet included the transaction in a block.
	pub fn is_pending(&self) -> bool {
		self.block_number.is_none()
	}
}

impl TryFrom<RpcTransaction> for Transaction {
	type Error = CodecError;

	/// Rebuilds the transaction and checks it hashes to what the node reported.
	fn try_from(rpc: RpcTransaction) -> Result<Self, Self::Error> {
		if let Some(transaction_type) = rpc.transaction_type {
			if transaction_type != U64::ZERO {
				return Err(CodecError::UnsupportedType(transaction_type.to::<u64>()));
			}
		}

		let gas_price = rpc.gas_price.ok_or(CodecError::MissingField("gasPrice"))?;
		let unsigned = TxLegacy {
			chain_id: None,
			nonce: rpc.nonce.to::<u64>(),
			gas_price: u128::try_from(&gas_price).map_err(|_| CodecError::OutOfRange("gasPrice"))?,
			gas_limit: rpc.gas.to::<u64>(),
			to: rpc.to.into(),
			value: rpc.value,
			input: rpc.input,
		};
		let v = u128::try_from(&rpc.v).map_err(|_| CodecError::OutOfRange("v"))?;
		let tx = Transaction::from_parts(unsigned, v, rpc.r, rpc.s)?;

		let actual = tx.hash();
		if actual != rpc.hash {
			return Err(CodecError::HashMismatch {
				expected: rpc.hash,
				actual,
			});
		}
		Ok(tx)
	}
}

/// Log object as served by a node.
pub type RpcLog = Log;

/// Receipt object as served by a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcReceipt {
	/// Absent on pre-Byzantium receipts, which carry a state root instead.
	#[serde(default)]
	pub status: Option<U64>,
	pub gas_used: U64,
	#[serde(default)]
	pub contract_address: Option<Address>,
	#[serde(default)]
	pub logs: Vec<RpcLog>,
}

impl From<RpcReceipt> for Receipt {
	fn from(rpc: RpcReceipt) -> Self {
		Receipt {
			status: rpc.status.map_or(1, |status| status.to::<u64>()),
			gas_used: rpc.gas_used.to::<u64>(),
			contract_address: rpc.contract_address,
			logs: rpc.logs,
		}
	}
}
