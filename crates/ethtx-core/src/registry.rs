//! Function signature registry.
//!
//! Maps 4-byte call selectors to human-readable signatures so call data can be
//! shown as `transfer(address,uint256) [0x.., 0x..]` instead of an opaque dump.

use ethtx_types::{hex_dump, keccak256, split_words, SELECTOR_SIZE};
use std::collections::HashMap;

/// Signatures every registry starts with.
const DEFAULT_SIGNATURES: &[&str] = &[
	// ERC-20
	"totalSupply()",
	"balanceOf(address)",
	"transfer(address,uint256)",
	"transferFrom(address,address,uint256)",
	"approve(address,uint256)",
	"allowance(address,address)",
	"name()",
	"symbol()",
	"decimals()",
	// ERC-721
	"ownerOf(uint256)",
	"safeTransferFrom(address,address,uint256)",
	"safeTransferFrom(address,address,uint256,bytes)",
	"setApprovalForAll(address,bool)",
	"getApproved(uint256)",
	"isApprovedForAll(address,address)",
	// ERC-777
	"send(address,uint256,bytes)",
	"authorizeOperator(address)",
	"revokeOperator(address)",
	// Wrapped ether
	"deposit()",
	"withdraw(uint256)",
	// ENS registry and resolvers
	"setOwner(bytes32,address)",
	"setSubnodeOwner(bytes32,bytes32,address)",
	"setResolver(bytes32,address)",
	"setAddr(bytes32,address)",
	"setName(string)",
	"setText(bytes32,string,string)",
	"setContenthash(bytes32,bytes)",
	// Multisig wallets
	"submitTransaction(address,uint256,bytes)",
	"confirmTransaction(uint256)",
	"revokeConfirmation(uint256)",
	"executeTransaction(uint256)",
	"execTransaction(address,uint256,bytes,uint8,uint256,uint256,uint256,address,address,bytes)",
];

/// A 4-byte function selector.
pub type Selector = [u8; SELECTOR_SIZE];

/// Registry of known function signatures, keyed by selector.
///
/// Registering a signature whose selector is already known replaces the earlier
/// entry; selector collisions are not errors.
#[derive(Debug, Clone, Default)]
pub struct FunctionSignatureRegistry {
	signatures: HashMap<Selector, String>,
}

impl FunctionSignatureRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a registry holding the built-in token, NFT, ENS and wallet signatures.
	pub fn with_defaults() -> Self {
		let mut registry = Self::new();
		for signature in DEFAULT_SIGNATURES {
			registry.register(signature);
		}
		registry
	}

	/// Computes the selector of a signature, ignoring whitespace.
	pub fn selector_of(text: &str) -> Selector {
		selector_of_normalized(&normalize(text))
	}

	/// Registers a signature. Empty text is ignored.
	pub fn register(&mut self, text: &str) {
		let normalized = normalize(text);
		if normalized.is_empty() {
			return;
		}
		let selector = selector_of_normalized(&normalized);
		if let Some(previous) = self.signatures.insert(selector, normalized) {
			tracing::trace!(
				selector = %hex_dump(&selector),
				previous = %previous,
				"Replaced function signature"
			);
		}
	}

	/// Registers every entry of a semicolon-separated list.
	pub fn extend_from_list(&mut self, list: &str) {
		for signature in list.split(';') {
			self.register(signature);
		}
	}

	/// Returns the signature registered for `selector`.
	pub fn lookup(&self, selector: &Selector) -> Option<&str> {
		self.signatures.get(selector).map(String::as_str)
	}

	/// Number of registered selectors.
	pub fn len(&self) -> usize {
		self.signatures.len()
	}

	/// Returns true when nothing is registered.
	pub fn is_empty(&self) -> bool {
		self.signatures.is_empty()
	}

	/// Renders call data for display.
	///
	/// Data with a known selector becomes the signature followed by its
	/// arguments as 32-byte words (the last one possibly short). Anything else,
	/// including data shorter than a selector, is dumped as hex.
	pub fn decode(&self, data: &[u8]) -> String {
		if data.len() < SELECTOR_SIZE {
			return hex_dump(data);
		}

		let (selector, arguments) = data.split_at(SELECTOR_SIZE);
		let mut key = [0u8; SELECTOR_SIZE];
		key.copy_from_slice(selector);

		match self.lookup(&key) {
			Some(signature) if arguments.is_empty() => signature.to_string(),
			Some(signature) => {
				let words: Vec<String> = split_words(arguments).map(hex_dump).collect();
				format!("{} [{}]", signature, words.join(", "))
			}
			None => hex_dump(data),
		}
	}
}

fn normalize(text: &str) -> String {
	text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn selector_of_normalized(normalized: &str) -> Selector {
	let digest = keccak256(normalized.as_bytes());
	let mut selector = [0u8; SELECTOR_SIZE];
	selector.copy_from_slice(&digest[..SELECTOR_SIZE]);
	selector
}
