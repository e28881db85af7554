//! Local account implementation.
//!
//! Signs with keys available on this machine: a raw private key from the
//! configuration, or an encrypted JSON keystore file unlocked with a
//! passphrase. Keystore files are found by the address embedded in their file
//! name, as written by geth (`UTC--<timestamp>--<address>`).

use crate::{AccountError, AccountInterface};
use alloy_network::TxSignerSync;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use ethtx_config::AccountConfig;
use ethtx_types::{Address, SecretString, Transaction, UnsignedTransaction};
use std::path::{Path, PathBuf};

/// Local account backed by a private key and/or a keystore directory.
pub struct LocalAccount {
	private_key: Option<SecretString>,
	keystore_dir: Option<PathBuf>,
	passphrase: Option<SecretString>,
}

impl LocalAccount {
	/// Creates a local account from its key sources.
	///
	/// A blank private key, as left by an unset `${VAR:-}` reference, counts as absent.
	pub fn new(
		private_key: Option<SecretString>,
		keystore_dir: Option<PathBuf>,
		passphrase: Option<SecretString>,
	) -> Self {
		Self {
			private_key: private_key.filter(|key| !key.with_exposed(|k| k.trim().is_empty())),
			keystore_dir,
			passphrase,
		}
	}

	/// Returns a signer whose address is `from`.
	fn signer_for(&self, from: &Address) -> Result<PrivateKeySigner, AccountError> {
		if let Some(private_key) = &self.private_key {
			let signer = private_key
				.with_exposed(|key| key.trim().parse::<PrivateKeySigner>())
				.map_err(|_| AccountError::InvalidKey("Invalid private key format".to_string()))?;
			if signer.address() == *from {
				return Ok(signer);
			}
			tracing::debug!(
				configured = %signer.address(),
				requested = %from,
				"Configured private key belongs to another address"
			);
		}

		if let Some(dir) = &self.keystore_dir {
			if let Some(path) = find_keystore(dir, from)? {
				let passphrase = self.passphrase.as_ref().ok_or_else(|| {
					AccountError::Keystore(format!(
						"a passphrase is required to unlock {}",
						path.display()
					))
				})?;
				let signer = passphrase
					.with_exposed(|pass| PrivateKeySigner::decrypt_keystore(&path, pass))
					.map_err(|e| {
						AccountError::Keystore(format!(
							"failed to unlock {}: {}",
							path.display(),
							e
						))
					})?;
				if signer.address() != *from {
					return Err(AccountError::Keystore(format!(
						"{} holds the key for {} instead of {}",
						path.display(),
						signer.address(),
						from
					)));
				}
				return Ok(signer);
			}
		}

		Err(AccountError::UnknownAddress(*from))
	}
}

/// Finds the keystore file for `address` in `dir`.
///
/// Matches file names ending with the lowercase hex address, with or without
/// a `0x` prefix.
pub fn find_keystore(dir: &Path, address: &Address) -> Result<Option<PathBuf>, AccountError> {
	let needle = hex::encode(address.as_slice());
	let entries = std::fs::read_dir(dir).map_err(|e| {
		AccountError::Keystore(format!("cannot read {}: {}", dir.display(), e))
	})?;

	for entry in entries {
		let entry = entry.map_err(|e| AccountError::Keystore(e.to_string()))?;
		let name = entry.file_name().to_string_lossy().to_lowercase();
		if name.ends_with(&needle) && entry.path().is_file() {
			return Ok(Some(entry.path()));
		}
	}
	Ok(None)
}

/// Signs the transaction with the signer's key, keeping its chain id.
fn sign_with(
	signer: &PrivateKeySigner,
	mut tx: UnsignedTransaction,
) -> Result<Transaction, AccountError> {
	let signature = signer
		.sign_transaction_sync(&mut tx)
		.map_err(|e| AccountError::SigningFailed(e.to_string()))?;
	Ok(Transaction::new(tx, signature))
}

#[async_trait]
impl AccountInterface for LocalAccount {
	async fn sign_transaction(
		&self,
		tx: UnsignedTransaction,
		from: Address,
	) -> Result<Transaction, AccountError> {
		let signer = self.signer_for(&from)?;
		sign_with(&signer, tx)
	}
}

/// Factory function to create a local account from configuration.
///
/// # Parameters
/// - `config`: the `[account]` section (private key and/or keystore directory)
/// - `passphrase`: passphrase for keystore files, usually from the command line
pub fn create_account(
	config: &AccountConfig,
	passphrase: Option<SecretString>,
) -> Result<Box<dyn AccountInterface>, AccountError> {
	if let Some(dir) = &config.keystore_dir {
		if !dir.is_dir() {
			return Err(AccountError::Keystore(format!(
				"{} is not a directory",
				dir.display()
			)));
		}
	}

	Ok(Box::new(LocalAccount::new(
		config.private_key.clone(),
		config.keystore_dir.clone(),
		passphrase,
	)))
}
