//! Account management module for the ethtx tool.
//!
//! This module provides the signing seam used when replacing a pending
//! transaction: given an unsigned transaction and the address that must sign
//! it, an account implementation returns the signed transaction or explains
//! why it cannot.

use async_trait::async_trait;
use ethtx_types::{Address, Transaction, UnsignedTransaction};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod local;
}

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
	/// Error that occurs when signing operations fail.
	#[error("Signing failed: {0}")]
	SigningFailed(String),
	/// Error that occurs when a cryptographic key is invalid or malformed.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
	/// No configured key belongs to the requested address.
	#[error("No key available for address {0}")]
	UnknownAddress(Address),
	/// Error that occurs when locating or unlocking a keystore file.
	#[error("Keystore error: {0}")]
	Keystore(String),
}

/// Trait defining the interface for account implementations.
///
/// Implementations hold or can unlock private keys, and sign on behalf of the
/// address the caller names.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait AccountInterface: Send + Sync {
	/// Signs `tx` with the key belonging to `from`.
	///
	/// Fails with [`AccountError::UnknownAddress`] when no key for `from` is
	/// available.
	async fn sign_transaction(
		&self,
		tx: UnsignedTransaction,
		from: Address,
	) -> Result<Transaction, AccountError>;
}

/// Service that manages account operations.
///
/// This struct wraps an underlying account implementation and checks that
/// what it signed really recovers to the requested address.
pub struct AccountService {
	/// The underlying account implementation.
	implementation: Box<dyn AccountInterface>,
}

impl AccountService {
	/// Creates a new AccountService with the specified implementation.
	pub fn new(implementation: Box<dyn AccountInterface>) -> Self {
		Self { implementation }
	}

	/// Signs a transaction on behalf of `from`.
	pub async fn sign(
		&self,
		tx: UnsignedTransaction,
		from: Address,
	) -> Result<Transaction, AccountError> {
		let signed = self.implementation.sign_transaction(tx, from).await?;

		let signer = signed
			.recover_sender()
			.map_err(|e| AccountError::SigningFailed(e.to_string()))?;
		if signer != from {
			return Err(AccountError::SigningFailed(format!(
				"signature recovers to {} instead of {}",
				signer, from
			)));
		}

		tracing::debug!(address = %from, hash = %signed.hash(), "Signed transaction");
		Ok(signed)
	}
}
