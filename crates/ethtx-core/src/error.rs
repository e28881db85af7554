//! Error taxonomy shared by the locator, renderer and canceller.

use ethtx_account::AccountError;
use ethtx_delivery::DeliveryError;
use ethtx_types::{CodecError, B256};
use thiserror::Error;

/// Errors that can occur while locating, inspecting or replacing a transaction.
#[derive(Debug, Error)]
pub enum TxError {
	/// The user-supplied identifier is neither a hash nor a raw transaction.
	#[error("Invalid input: {0}")]
	Input(String),
	/// A raw blob or node record could not be turned into a valid transaction.
	#[error(transparent)]
	Decode(#[from] CodecError),
	/// The node does not know the transaction.
	#[error("Transaction {0} not found")]
	NotFound(B256),
	/// The transaction is in a state that does not allow the operation.
	#[error("{0}")]
	Precondition(String),
	/// Transport failure, timeout or rejection by the node.
	#[error(transparent)]
	Network(#[from] DeliveryError),
	/// No usable key for the sender, or the signer failed.
	#[error(transparent)]
	Signing(#[from] AccountError),
}
