//! Transaction locator.
//!
//! Resolves what the user typed into a transaction: either a 32-byte hash looked
//! up on the node, or a raw canonical encoding decoded locally.

use crate::TxError;
use ethtx_delivery::DeliveryService;
use ethtx_types::{
	without_0x_prefix, CodecError, Receipt, Transaction, B256, HASH_HEX_LENGTH,
};
use std::sync::Arc;

/// What a user-supplied transaction string refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionRef {
	/// Hash of a transaction known to the node.
	Identifier(B256),
	/// Canonical encoding of a transaction, still to be decoded.
	RawBlob(Vec<u8>),
}

impl TransactionRef {
	/// Classifies an input string.
	///
	/// Anything longer than a hash is taken as a raw transaction; otherwise the
	/// input must be exactly a 32-byte hash. Shorter hex strings such as
	/// addresses are rejected rather than padded.
	pub fn parse(input: &str) -> Result<Self, TxError> {
		let trimmed = input.trim();
		if trimmed.is_empty() {
			return Err(TxError::Input("a transaction is required".to_string()));
		}

		let digits = without_0x_prefix(trimmed);
		if digits.len() > HASH_HEX_LENGTH {
			let bytes = hex::decode(digits).map_err(|e| CodecError::Hex(e.to_string()))?;
			return Ok(TransactionRef::RawBlob(bytes));
		}

		if digits.len() != HASH_HEX_LENGTH || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
			return Err(TxError::Input(format!(
				"'{}' is neither a transaction hash nor a raw transaction",
				trimmed
			)));
		}

		let hash = digits
			.parse::<B256>()
			.map_err(|e| TxError::Input(format!("invalid transaction hash: {}", e)))?;
		Ok(TransactionRef::Identifier(hash))
	}
}

/// Resolves transaction references against a node.
pub struct TransactionLocator {
	delivery: Arc<DeliveryService>,
}

impl TransactionLocator {
	/// Creates a locator that looks transactions up through `delivery`.
	pub fn new(delivery: Arc<DeliveryService>) -> Self {
		Self { delivery }
	}

	/// Resolves `input` to a transaction and whether it is still pending.
	pub async fn locate(&self, input: &str) -> Result<(Transaction, bool), TxError> {
		self.resolve(TransactionRef::parse(input)?).await
	}

	/// Resolves an already classified reference.
	pub async fn resolve(&self, reference: TransactionRef) -> Result<(Transaction, bool), TxError> {
		match reference {
			TransactionRef::RawBlob(bytes) => {
				let tx = Transaction::decode_canonical(&bytes)?;
				tracing::debug!(hash = %tx.hash(), "Decoded raw transaction");
				Ok((tx, false))
			}
			TransactionRef::Identifier(hash) => {
				let record = self
					.delivery
					.get_transaction(hash)
					.await?
					.ok_or(TxError::NotFound(hash))?;
				let pending = record.is_pending();
				let tx = Transaction::try_from(record)?;
				tracing::debug!(%hash, pending, "Fetched transaction");
				Ok((tx, pending))
			}
		}
	}

	/// Fetches the receipt of a mined transaction.
	///
	/// Pending transactions have no receipt. Lookup failures are logged and
	/// treated as absence; the receipt only enriches what is shown.
	pub async fn receipt(&self, tx: &Transaction, pending: bool) -> Option<Receipt> {
		if pending {
			return None;
		}

		let hash = tx.hash();
		match self.delivery.get_receipt(hash).await {
			Ok(receipt) => receipt.map(Receipt::from),
			Err(error) => {
				tracing::warn!(%hash, %error, "Failed to obtain receipt");
				None
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use ethtx_delivery::{DeliveryError, MockDeliveryInterface};
	use ethtx_types::{RpcReceipt, RpcTransaction, U256, U64};
	use std::time::Duration;

	const EIP155_RAW: &str = "f86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83";

	fn sample() -> Transaction {
		Transaction::decode_canonical(&hex::decode(EIP155_RAW).unwrap()).unwrap()
	}

	fn record(tx: &Transaction, block_number: Option<u64>) -> RpcTransaction {
		RpcTransaction {
			hash: tx.hash(),
			nonce: U64::from(tx.nonce()),
			gas_price: Some(U256::from(tx.gas_price())),
			gas: U64::from(tx.gas_limit()),
			to: tx.to(),
			value: tx.value(),
			input: tx.input().clone(),
			v: U256::from(tx.v()),
			r: tx.signature().r(),
			s: tx.signature().s(),
			block_number: block_number.map(U64::from),
			transaction_type: None,
		}
	}

	fn locator(mock: MockDeliveryInterface) -> TransactionLocator {
		TransactionLocator::new(Arc::new(DeliveryService::new(
			Box::new(mock),
			None,
			Duration::from_secs(5),
		)))
	}

	#[test]
	fn test_parse_identifier() {
		let hash = format!("0x{}", "ab".repeat(32));
		assert_eq!(
			TransactionRef::parse(&hash).unwrap(),
			TransactionRef::Identifier(B256::repeat_byte(0xab))
		);
		assert_eq!(
			TransactionRef::parse(&"AB".repeat(32)).unwrap(),
			TransactionRef::Identifier(B256::repeat_byte(0xab))
		);
	}

	#[test]
	fn test_parse_boundary() {
		// 64 hex characters is a hash, 65 is a raw transaction.
		let sixty_four = "1".repeat(64);
		assert!(matches!(
			TransactionRef::parse(&sixty_four),
			Ok(TransactionRef::Identifier(_))
		));

		let sixty_five = "1".repeat(65);
		assert!(matches!(
			TransactionRef::parse(&sixty_five),
			Err(TxError::Decode(CodecError::Hex(_)))
		));

		let sixty_six = "1".repeat(66);
		assert!(matches!(
			TransactionRef::parse(&sixty_six),
			Ok(TransactionRef::RawBlob(bytes)) if bytes.len() == 33
		));
	}

	#[test]
	fn test_parse_rejects_address() {
		let result = TransactionRef::parse("0x5FfC014343cd971B7eb70732021E26C35B744cc4");
		assert!(matches!(result, Err(TxError::Input(_))));
	}

	#[test]
	fn test_parse_rejects_bad_input() {
		assert!(matches!(TransactionRef::parse("  "), Err(TxError::Input(_))));
		assert!(matches!(
			TransactionRef::parse(&format!("0x{}zz", "0".repeat(62))),
			Err(TxError::Input(_))
		));
		assert!(matches!(
			TransactionRef::parse(&format!("0x{}zz", "0".repeat(80))),
			Err(TxError::Decode(_))
		));
	}

	#[tokio::test]
	async fn test_locate_raw_transaction() {
		let mut mock = MockDeliveryInterface::new();
		mock.expect_transaction_by_hash().never();

		let (tx, pending) = locator(mock)
			.locate(&format!("0x{}", EIP155_RAW))
			.await
			.unwrap();
		assert!(!pending);
		assert_eq!(tx.nonce(), 9);
		assert_eq!(tx.encoded(), hex::decode(EIP155_RAW).unwrap());
	}

	#[tokio::test]
	async fn test_locate_rejects_malformed_raw_transaction() {
		let mut bytes = hex::decode(EIP155_RAW).unwrap();
		bytes.push(0x00);

		let result = locator(MockDeliveryInterface::new())
			.locate(&hex::encode(bytes))
			.await;
		assert!(matches!(
			result,
			Err(TxError::Decode(CodecError::TrailingBytes(1)))
		));
	}

	#[tokio::test]
	async fn test_locate_pending_by_hash() {
		let tx = sample();
		let hash = tx.hash();
		let node_record = record(&tx, None);

		let mut mock = MockDeliveryInterface::new();
		mock.expect_transaction_by_hash()
			.withf(move |requested| *requested == hash)
			.times(1)
			.returning(move |_| Ok(Some(node_record.clone())));

		let (located, pending) = locator(mock).locate(&hash.to_string()).await.unwrap();
		assert!(pending);
		assert_eq!(located, tx);
	}

	#[tokio::test]
	async fn test_locate_mined_by_hash() {
		let tx = sample();
		let node_record = record(&tx, Some(46147));

		let mut mock = MockDeliveryInterface::new();
		mock.expect_transaction_by_hash()
			.returning(move |_| Ok(Some(node_record.clone())));

		let (_, pending) = locator(mock).locate(&tx.hash().to_string()).await.unwrap();
		assert!(!pending);
	}

	#[tokio::test]
	async fn test_locate_not_found() {
		let mut mock = MockDeliveryInterface::new();
		mock.expect_transaction_by_hash().returning(|_| Ok(None));

		let hash = B256::repeat_byte(0x01);
		let result = locator(mock).locate(&hash.to_string()).await;
		assert!(matches!(result, Err(TxError::NotFound(h)) if h == hash));
	}

	#[tokio::test]
	async fn test_locate_network_error() {
		let mut mock = MockDeliveryInterface::new();
		mock.expect_transaction_by_hash()
			.returning(|_| Err(DeliveryError::Network("connection refused".to_string())));

		let result = locator(mock)
			.locate(&B256::repeat_byte(0x01).to_string())
			.await;
		assert!(matches!(result, Err(TxError::Network(_))));
	}

	#[tokio::test]
	async fn test_locate_rejects_inconsistent_record() {
		let tx = sample();
		let mut node_record = record(&tx, None);
		node_record.value = U256::from(1u64);

		let mut mock = MockDeliveryInterface::new();
		mock.expect_transaction_by_hash()
			.returning(move |_| Ok(Some(node_record.clone())));

		let result = locator(mock).locate(&tx.hash().to_string()).await;
		assert!(matches!(
			result,
			Err(TxError::Decode(CodecError::HashMismatch { .. }))
		));
	}

	#[tokio::test]
	async fn test_receipt() {
		let tx = sample();
		let mut mock = MockDeliveryInterface::new();
		mock.expect_transaction_receipt().times(1).returning(|_| {
			Ok(Some(RpcReceipt {
				status: Some(U64::ZERO),
				gas_used: U64::from(21000u64),
				contract_address: None,
				logs: Vec::new(),
			}))
		});
		let locator = locator(mock);

		assert!(locator.receipt(&tx, true).await.is_none());

		let receipt = locator.receipt(&tx, false).await.unwrap();
		assert!(!receipt.succeeded());
		assert_eq!(receipt.gas_used, 21000);
	}

	#[tokio::test]
	async fn test_receipt_failure_is_absence() {
		let mut mock = MockDeliveryInterface::new();
		mock.expect_transaction_receipt()
			.returning(|_| Err(DeliveryError::Network("boom".to_string())));

		assert!(locator(mock).receipt(&sample(), false).await.is_none());
	}
}
