//! Replacing pending transactions.
//!
//! A pending transaction cannot be withdrawn, only superseded: a new transaction
//! from the same sender with the same nonce and a higher gas price takes its
//! place once mined. The replacement built here is a zero-value transfer from
//! the sender to itself.

use crate::locator::{TransactionLocator, TransactionRef};
use crate::TxError;
use ethtx_account::AccountService;
use ethtx_delivery::DeliveryService;
use ethtx_types::{
	unsigned_call, Address, Transaction, UnsignedTransaction, B256, BASE_TRANSFER_GAS, U256,
};
use std::sync::Arc;

/// A replacement ready to be signed by `sender`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
	pub sender: Address,
	pub transaction: UnsignedTransaction,
}

/// Gas price used when none is given: the original plus one ninth, rounded down.
pub fn bumped_gas_price(gas_price: u128) -> u128 {
	gas_price.saturating_add(gas_price / 9)
}

/// Fails unless the transaction is still pending.
pub fn ensure_pending(pending: bool) -> Result<(), TxError> {
	if pending {
		Ok(())
	} else {
		Err(TxError::Precondition(
			"Transaction has already been mined".to_string(),
		))
	}
}

/// Builds the self-transfer that supersedes `tx`.
///
/// `gas_price` overrides the bumped price verbatim when given.
pub fn build_replacement(
	tx: &Transaction,
	pending: bool,
	gas_price: Option<u128>,
	chain_id: u64,
) -> Result<Replacement, TxError> {
	ensure_pending(pending)?;

	let sender = tx.recover_sender()?;
	let gas_price = gas_price.unwrap_or_else(|| bumped_gas_price(tx.gas_price()));

	Ok(Replacement {
		sender,
		transaction: unsigned_call(
			tx.nonce(),
			gas_price,
			BASE_TRANSFER_GAS,
			sender,
			U256::ZERO,
			Some(chain_id),
		),
	})
}

/// Cancels pending transactions by signing and submitting replacements.
pub struct TransactionCanceller {
	delivery: Arc<DeliveryService>,
	account: Arc<AccountService>,
	locator: TransactionLocator,
}

impl TransactionCanceller {
	pub fn new(delivery: Arc<DeliveryService>, account: Arc<AccountService>) -> Self {
		Self {
			locator: TransactionLocator::new(Arc::clone(&delivery)),
			delivery,
			account,
		}
	}

	/// Replaces the pending transaction `input` and returns the replacement's hash.
	///
	/// Nothing is signed or sent unless the node reports the transaction as
	/// pending. Every call submits a new transaction.
	pub async fn cancel(&self, input: &str, gas_price: Option<u128>) -> Result<B256, TxError> {
		let reference = TransactionRef::parse(input)?;
		if matches!(reference, TransactionRef::RawBlob(_)) {
			return Err(TxError::Input(
				"cancelling requires the hash of a pending transaction".to_string(),
			));
		}

		let (tx, pending) = self.locator.resolve(reference).await?;
		ensure_pending(pending)?;

		let chain_id = self.delivery.get_chain_id().await?;
		let replacement = build_replacement(&tx, pending, gas_price, chain_id)?;
		tracing::debug!(
			original = %tx.hash(),
			nonce = tx.nonce(),
			gas_price = %replacement.transaction.gas_price,
			"Built replacement"
		);

		let signed = self
			.account
			.sign(replacement.transaction, replacement.sender)
			.await?;
		let hash = self.delivery.submit(signed.encoded().into()).await?;

		tracing::info!(
			group = "transaction",
			command = "cancel",
			address = %replacement.sender.to_checksum(None),
			networkid = chain_id,
			gas = signed.gas_limit(),
			gasprice = %signed.gas_price(),
			transactionid = %hash,
			"success"
		);

		Ok(hash)
	}
}
