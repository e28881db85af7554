//! ENS reverse resolution.
//!
//! An address's primary name lives at the node `<hex address>.addr.reverse`.
//! The registry names the resolver for that node, and the resolver's
//! `name(bytes32)` returns the name itself. Anyone can claim any name in their
//! own reverse record, so a name is only reported when its forward `addr`
//! record points back at the address.

use super::alloy::HttpProvider;
use crate::NameResolver;
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::{sol, SolCall};
use async_trait::async_trait;
use ethtx_types::{keccak256, Address, B256};

sol! {
	interface IEnsRegistry {
		function resolver(bytes32 node) external view returns (address);
	}

	interface INameResolver {
		function name(bytes32 node) external view returns (string);
	}

	interface IAddrResolver {
		function addr(bytes32 node) external view returns (address);
	}
}

/// Computes the ENS namehash of a dotted name.
pub fn namehash(name: &str) -> B256 {
	let mut node = B256::ZERO;
	if name.is_empty() {
		return node;
	}
	for label in name.rsplit('.') {
		let label_hash = keccak256(label.as_bytes());
		node = keccak256([node.as_slice(), label_hash.as_slice()].concat());
	}
	node
}

/// Name of the reverse record of `address`.
pub fn reverse_name(address: &Address) -> String {
	format!("{}.addr.reverse", hex::encode(address.as_slice()))
}

/// Read-only contract calls, as performed by `eth_call`.
#[async_trait]
pub trait ContractCall: Send + Sync {
	/// Calls `to` with `data` and returns the raw output.
	async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, String>;
}

#[async_trait]
impl ContractCall for HttpProvider {
	async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, String> {
		let request = TransactionRequest::default().to(to).input(data.into());
		Provider::call(self.as_ref(), &request)
			.await
			.map(|bytes| bytes.to_vec())
			.map_err(|e| e.to_string())
	}
}

/// Reverse resolver backed by the ENS registry contract.
pub struct EnsResolver {
	caller: Box<dyn ContractCall>,
	registry: Address,
}

impl EnsResolver {
	/// Creates a resolver that queries `registry` through `caller`.
	pub fn new(caller: impl ContractCall + 'static, registry: Address) -> Self {
		Self {
			caller: Box::new(caller),
			registry,
		}
	}

	/// Resolver contract registered for `node`, if any.
	async fn resolver_of(&self, node: B256) -> Result<Option<Address>, String> {
		let call = IEnsRegistry::resolverCall { node };
		let output = self.caller.call(self.registry, call.abi_encode()).await?;
		let resolver = IEnsRegistry::resolverCall::abi_decode_returns(&output, true)
			.map_err(|e| e.to_string())?
			._0;
		Ok(Some(resolver).filter(|resolver| *resolver != Address::ZERO))
	}

	async fn lookup(&self, address: &Address) -> Result<Option<String>, String> {
		let node = namehash(&reverse_name(address));
		let Some(resolver) = self.resolver_of(node).await? else {
			return Ok(None);
		};

		let call = INameResolver::nameCall { node };
		let output = self.caller.call(resolver, call.abi_encode()).await?;
		let name = INameResolver::nameCall::abi_decode_returns(&output, true)
			.map_err(|e| e.to_string())?
			._0;
		if name.is_empty() {
			return Ok(None);
		}

		let forward = namehash(&name);
		let Some(resolver) = self.resolver_of(forward).await? else {
			tracing::debug!(%address, %name, "Reverse name has no resolver");
			return Ok(None);
		};
		let call = IAddrResolver::addrCall { node: forward };
		let output = self.caller.call(resolver, call.abi_encode()).await?;
		let resolved = IAddrResolver::addrCall::abi_decode_returns(&output, true)
			.map_err(|e| e.to_string())?
			._0;
		if resolved != *address {
			tracing::debug!(%address, %name, %resolved, "Reverse name resolves elsewhere");
			return Ok(None);
		}

		Ok(Some(name))
	}
}

#[async_trait]
impl NameResolver for EnsResolver {
	async fn reverse_resolve(&self, address: Address) -> Option<String> {
		match self.lookup(&address).await {
			Ok(name) => name,
			Err(error) => {
				tracing::debug!(%address, %error, "Reverse resolution failed");
				None
			}
		}
	}
}
