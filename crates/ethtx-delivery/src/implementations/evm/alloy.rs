//! JSON-RPC delivery implementation for EVM nodes.
//!
//! This module provides the concrete implementation of the DeliveryInterface
//! trait over HTTP using the Alloy provider. Transactions and receipts are
//! requested as raw JSON-RPC calls and deserialized into the wire types of
//! `ethtx-types`, so legacy fields such as `v` and `gasPrice` are kept exactly
//! as the node reports them.

use super::ens::EnsResolver;
use crate::{DeliveryError, DeliveryInterface, DeliveryService, NameResolver};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_transport::TransportError;
use alloy_transport_http::Http;
use async_trait::async_trait;
use ethtx_config::NetworkConfig;
use ethtx_types::{with_0x_prefix, Address, Bytes, RpcReceipt, RpcTransaction, B256};
use std::sync::Arc;
use std::time::Duration;

/// Shared handle to an HTTP provider.
pub type HttpProvider = Arc<dyn Provider<Http<reqwest::Client>> + Send + Sync>;

/// Alloy-based EVM delivery implementation.
///
/// Talks to a single node. Every lookup is a plain JSON-RPC request; the
/// surrounding [`DeliveryService`] bounds each one with a timeout.
pub struct AlloyDelivery {
	provider: HttpProvider,
}

impl AlloyDelivery {
	/// Creates a new AlloyDelivery connected to `rpc_url`.
	///
	/// No request is made here; an unreachable node is reported by the first
	/// call that needs it.
	pub fn new(rpc_url: &str) -> Result<Self, DeliveryError> {
		let url: reqwest::Url = rpc_url
			.trim()
			.parse()
			.map_err(|e| DeliveryError::Network(format!("Invalid RPC URL {}: {}", rpc_url, e)))?;

		let provider = ProviderBuilder::new().on_http(url);

		Ok(Self {
			provider: Arc::new(provider) as HttpProvider,
		})
	}

	/// Returns the underlying provider, for components that share the connection.
	pub fn provider(&self) -> HttpProvider {
		Arc::clone(&self.provider)
	}
}

fn network_error(context: &str, err: TransportError) -> DeliveryError {
	DeliveryError::Network(format!("{}: {}", context, err))
}

#[async_trait]
impl DeliveryInterface for AlloyDelivery {
	async fn transaction_by_hash(
		&self,
		hash: B256,
	) -> Result<Option<RpcTransaction>, DeliveryError> {
		tracing::debug!(%hash, "Requesting transaction");
		let transaction: Option<RpcTransaction> = self
			.provider
			.client()
			.request("eth_getTransactionByHash", (hash,))
			.await
			.map_err(|e| network_error("Failed to get transaction", e))?;
		Ok(transaction)
	}

	async fn transaction_receipt(&self, hash: B256) -> Result<Option<RpcReceipt>, DeliveryError> {
		tracing::debug!(%hash, "Requesting receipt");
		let receipt: Option<RpcReceipt> = self
			.provider
			.client()
			.request("eth_getTransactionReceipt", (hash,))
			.await
			.map_err(|e| network_error("Failed to get receipt", e))?;
		Ok(receipt)
	}

	async fn chain_id(&self) -> Result<u64, DeliveryError> {
		self.provider
			.get_chain_id()
			.await
			.map_err(|e| network_error("Failed to get chain id", e))
	}

	async fn send_raw_transaction(&self, encoded: Bytes) -> Result<B256, DeliveryError> {
		let pending = self
			.provider
			.send_raw_transaction(&encoded)
			.await
			.map_err(|e| network_error("Failed to send transaction", e))?;

		let tx_hash = *pending.tx_hash();
		let hash_str = with_0x_prefix(&hex::encode(tx_hash));
		tracing::debug!(tx_hash = %hash_str, "Submitted transaction");

		Ok(tx_hash)
	}
}

/// Factory function to create the delivery service for a node.
///
/// # Parameters
/// - `network`: the `[network]` section (RPC URL, timeout and ENS registry)
/// - `resolve_names`: whether addresses should be reverse-resolved through ENS
///
/// # Returns
/// A DeliveryService whose calls are bounded by `network.timeout_seconds`.
pub fn create_http_delivery(
	network: &NetworkConfig,
	resolve_names: bool,
) -> Result<DeliveryService, DeliveryError> {
	let delivery = AlloyDelivery::new(&network.rpc_url)?;

	let resolver = if resolve_names {
		let registry: Address = network.ens_registry.parse().map_err(|e| {
			DeliveryError::Network(format!(
				"Invalid ENS registry {}: {}",
				network.ens_registry, e
			))
		})?;
		Some(Box::new(EnsResolver::new(delivery.provider(), registry)) as Box<dyn NameResolver>)
	} else {
		None
	};

	Ok(DeliveryService::new(
		Box::new(delivery),
		resolver,
		Duration::from_secs(network.timeout_seconds),
	))
}
