//! Transaction delivery module for the ethtx tool.
//!
//! This module handles every conversation with a node: looking transactions and
//! receipts up, querying the chain id, submitting signed transactions and
//! reverse-resolving addresses to names. Each call is bounded by a timeout so a
//! stalled node surfaces as an error instead of a hang.

use async_trait::async_trait;
use ethtx_types::{Address, Bytes, RpcReceipt, RpcTransaction, B256};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod evm {
		pub mod alloy;
		pub mod ens;
	}
}

/// Errors that can occur during delivery operations.
#[derive(Debug, Error)]
pub enum DeliveryError {
	/// Error that occurs during network communication or when the node rejects a request.
	#[error("Network error: {0}")]
	Network(String),
	/// The node did not answer within the configured bound.
	#[error("{operation} timed out after {seconds}s")]
	Timeout {
		operation: &'static str,
		seconds: u64,
	},
}

/// Trait defining the interface for chain RPC providers.
///
/// Lookups return `Ok(None)` when the node does not know the object; errors are
/// reserved for transport failures and rejected requests.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait DeliveryInterface: Send + Sync {
	/// Fetches a transaction by hash, pending or mined.
	async fn transaction_by_hash(&self, hash: B256)
		-> Result<Option<RpcTransaction>, DeliveryError>;

	/// Fetches the receipt of a mined transaction.
	async fn transaction_receipt(&self, hash: B256) -> Result<Option<RpcReceipt>, DeliveryError>;

	/// Returns the chain id the node is serving.
	async fn chain_id(&self) -> Result<u64, DeliveryError>;

	/// Submits a signed transaction in its canonical encoding and returns its hash.
	async fn send_raw_transaction(&self, encoded: Bytes) -> Result<B256, DeliveryError>;
}

/// Trait defining the interface for reverse name resolution.
///
/// Most addresses have no name, so absence is the common case and is not an error.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait NameResolver: Send + Sync {
	/// Returns the primary name of `address`, if it has one.
	async fn reverse_resolve(&self, address: Address) -> Option<String>;
}

/// Service that bounds every delivery call with a timeout.
///
/// The DeliveryService wraps a delivery implementation and an optional name
/// resolver. Timeouts surface as [`DeliveryError::Timeout`]; resolver timeouts
/// simply yield no name.
pub struct DeliveryService {
	/// The underlying chain RPC implementation.
	implementation: Box<dyn DeliveryInterface>,
	/// Reverse name resolution, if enabled.
	resolver: Option<Box<dyn NameResolver>>,
	/// Upper bound for each remote call.
	timeout: Duration,
}

impl DeliveryService {
	/// Creates a new DeliveryService.
	pub fn new(
		implementation: Box<dyn DeliveryInterface>,
		resolver: Option<Box<dyn NameResolver>>,
		timeout: Duration,
	) -> Self {
		Self {
			implementation,
			resolver,
			timeout,
		}
	}

	async fn bounded<T, F>(&self, operation: &'static str, call: F) -> Result<T, DeliveryError>
	where
		F: Future<Output = Result<T, DeliveryError>>,
	{
		match tokio::time::timeout(self.timeout, call).await {
			Ok(result) => result,
			Err(_) => {
				tracing::warn!(operation, timeout = ?self.timeout, "Remote call timed out");
				Err(DeliveryError::Timeout {
					operation,
					seconds: self.timeout.as_secs(),
				})
			}
		}
	}

	/// Fetches a transaction by hash.
	pub async fn get_transaction(
		&self,
		hash: B256,
	) -> Result<Option<RpcTransaction>, DeliveryError> {
		self.bounded(
			"eth_getTransactionByHash",
			self.implementation.transaction_by_hash(hash),
		)
		.await
	}

	/// Fetches the receipt of a mined transaction.
	pub async fn get_receipt(&self, hash: B256) -> Result<Option<RpcReceipt>, DeliveryError> {
		self.bounded(
			"eth_getTransactionReceipt",
			self.implementation.transaction_receipt(hash),
		)
		.await
	}

	/// Returns the chain id the node is serving.
	pub async fn get_chain_id(&self) -> Result<u64, DeliveryError> {
		self.bounded("eth_chainId", self.implementation.chain_id())
			.await
	}

	/// Submits a signed transaction once; there are no retries.
	pub async fn submit(&self, encoded: Bytes) -> Result<B256, DeliveryError> {
		self.bounded(
			"eth_sendRawTransaction",
			self.implementation.send_raw_transaction(encoded),
		)
		.await
	}

	/// Reverse-resolves an address, returning `None` on absence, failure or timeout.
	pub async fn lookup_name(&self, address: Address) -> Option<String> {
		let resolver = self.resolver.as_ref()?;
		match tokio::time::timeout(self.timeout, resolver.reverse_resolve(address)).await {
			Ok(name) => name,
			Err(_) => {
				tracing::debug!(%address, "Reverse resolution timed out");
				None
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	/// Delivery stub whose calls never finish in time.
	struct StalledNode;

	#[async_trait]
	impl DeliveryInterface for StalledNode {
		async fn transaction_by_hash(
			&self,
			_hash: B256,
		) -> Result<Option<RpcTransaction>, DeliveryError> {
			tokio::time::sleep(Duration::from_secs(5)).await;
			Ok(None)
		}

		async fn transaction_receipt(
			&self,
			_hash: B256,
		) -> Result<Option<RpcReceipt>, DeliveryError> {
			tokio::time::sleep(Duration::from_secs(5)).await;
			Ok(None)
		}

		async fn chain_id(&self) -> Result<u64, DeliveryError> {
			Ok(1)
		}

		async fn send_raw_transaction(&self, _encoded: Bytes) -> Result<B256, DeliveryError> {
			tokio::time::sleep(Duration::from_secs(5)).await;
			Ok(B256::ZERO)
		}
	}

	struct StalledResolver;

	#[async_trait]
	impl NameResolver for StalledResolver {
		async fn reverse_resolve(&self, _address: Address) -> Option<String> {
			tokio::time::sleep(Duration::from_secs(5)).await;
			Some("late.eth".to_string())
		}
	}

	struct FixedResolver;

	#[async_trait]
	impl NameResolver for FixedResolver {
		async fn reverse_resolve(&self, address: Address) -> Option<String> {
			(address == Address::repeat_byte(0x01)).then(|| "alice.eth".to_string())
		}
	}

	#[tokio::test]
	async fn test_stalled_calls_time_out() {
		let service = DeliveryService::new(
			Box::new(StalledNode),
			None,
			Duration::from_millis(20),
		);

		let result = service.get_transaction(B256::ZERO).await;
		assert!(matches!(
			result,
			Err(DeliveryError::Timeout {
				operation: "eth_getTransactionByHash",
				..
			})
		));

		let result = service.submit(Bytes::new()).await;
		assert!(matches!(result, Err(DeliveryError::Timeout { .. })));

		assert_eq!(service.get_chain_id().await.unwrap(), 1);
	}

	#[tokio::test]
	async fn test_lookup_name() {
		let service = DeliveryService::new(
			Box::new(StalledNode),
			Some(Box::new(FixedResolver)),
			Duration::from_millis(20),
		);
		assert_eq!(
			service.lookup_name(Address::repeat_byte(0x01)).await,
			Some("alice.eth".to_string())
		);
		assert_eq!(service.lookup_name(Address::repeat_byte(0x02)).await, None);

		let stalled = DeliveryService::new(
			Box::new(StalledNode),
			Some(Box::new(StalledResolver)),
			Duration::from_millis(20),
		);
		assert_eq!(stalled.lookup_name(Address::repeat_byte(0x01)).await, None);

		let disabled = DeliveryService::new(Box::new(StalledNode), None, Duration::from_millis(20));
		assert_eq!(disabled.lookup_name(Address::repeat_byte(0x01)).await, None);
	}
}
