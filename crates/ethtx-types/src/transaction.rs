//! Legacy transaction model and canonical codec.
//!
//! A transaction is encoded as the RLP list
//! `[nonce, gasPrice, gasLimit, to, value, data, v, r, s]`; its hash is the
//! keccak-256 digest of that encoding. Signatures follow EIP-155 when `v`
//! carries a chain id, and the original Homestead scheme (`v` of 27/28) otherwise.
//! Encoding, signing hashes and recovery come from `alloy-consensus`.

use alloy_consensus::transaction::{from_eip155_value, to_eip155_value, RlpEcdsaTx};
use alloy_consensus::{SignableTransaction, Signed, TxLegacy};
use alloy_primitives::{Address, Bytes, PrimitiveSignature, TxKind, B256, U256};
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Errors that can occur while decoding, validating or recovering transactions.
#[derive(Debug, Error)]
pub enum CodecError {
	/// The input was not valid hexadecimal.
	#[error("Invalid hex: {0}")]
	Hex(String),
	/// The RLP structure was malformed.
	#[error("Malformed transaction encoding: {0}")]
	Rlp(String),
	/// Bytes remained after the transaction list.
	#[error("{0} trailing bytes after transaction")]
	TrailingBytes(usize),
	/// The encoding is a typed envelope, which is not supported.
	#[error("Unsupported transaction type {0:#04x}")]
	UnsupportedType(u64),
	/// A field required to rebuild the transaction was missing.
	#[error("Missing field: {0}")]
	MissingField(&'static str),
	/// A field does not fit the range a legacy transaction allows.
	#[error("Field out of range: {0}")]
	OutOfRange(&'static str),
	/// The recomputed hash differs from the one reported for the transaction.
	#[error("Hash mismatch: expected {expected}, computed {actual}")]
	HashMismatch { expected: B256, actual: B256 },
	/// The signature could not be used to recover a sender.
	#[error("Invalid signature: {0}")]
	InvalidSignature(String),
}

impl From<alloy_rlp::Error> for CodecError {
	fn from(err: alloy_rlp::Error) -> Self {
		CodecError::Rlp(err.to_string())
	}
}

/// A transaction before it has been signed.
///
/// This is the shape handed to signers: the signing hash covers its fields
/// plus, when present, the chain id.
pub type UnsignedTransaction = TxLegacy;

/// ECDSA signature with the parity of its R point.
pub type Signature = PrimitiveSignature;

/// A signed legacy transaction.
///
/// The hash is sealed when the signature is attached and is always derived
/// from the canonical encoding, so a transaction cannot disagree with its own hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction(Signed<TxLegacy>);

impl Transaction {
	/// Attaches a signature to an unsigned transaction.
	pub fn new(tx: UnsignedTransaction, signature: Signature) -> Self {
		Self(tx.into_signed(signature))
	}

	/// Rebuilds a transaction from its fields and a raw `v` value.
	///
	/// `v` determines both the signature parity and the chain id.
	pub fn from_parts(
		mut tx: UnsignedTransaction,
		v: u128,
		r: U256,
		s: U256,
	) -> Result<Self, CodecError> {
		let (y_parity, chain_id) = from_eip155_value(v)
			.ok_or_else(|| CodecError::InvalidSignature(format!("unsupported v value {}", v)))?;
		tx.chain_id = chain_id;
		Ok(Self::new(tx, Signature::new(r, s, y_parity)))
	}

	/// Returns the unsigned portion of the transaction, including its chain id.
	pub fn unsigned(&self) -> &UnsignedTransaction {
		self.0.tx()
	}

	pub fn nonce(&self) -> u64 {
		self.unsigned().nonce
	}

	pub fn gas_price(&self) -> u128 {
		self.unsigned().gas_price
	}

	pub fn gas_limit(&self) -> u64 {
		self.unsigned().gas_limit
	}

	/// Recipient, or `None` for a contract creation.
	pub fn to(&self) -> Option<Address> {
		self.unsigned().to.to().copied()
	}

	pub fn value(&self) -> U256 {
		self.unsigned().value
	}

	pub fn input(&self) -> &Bytes {
		&self.unsigned().input
	}

	pub fn signature(&self) -> &Signature {
		self.0.signature()
	}

	/// The `v` value as it appears in the encoding.
	pub fn v(&self) -> u128 {
		to_eip155_value(self.signature().v(), self.chain_id())
	}

	/// Returns true when the transaction deploys a contract.
	pub fn is_contract_creation(&self) -> bool {
		self.unsigned().to.is_create()
	}

	/// Chain id encoded in `v`, if the transaction is EIP-155 protected.
	pub fn chain_id(&self) -> Option<u64> {
		self.unsigned().chain_id
	}

	/// Returns the digest that was signed to produce this transaction.
	pub fn signature_hash(&self) -> B256 {
		self.0.signature_hash()
	}

	/// Returns the canonical encoding of the transaction.
	pub fn encoded(&self) -> Vec<u8> {
		let mut out = Vec::with_capacity(self.0.rlp_encoded_length());
		self.0.rlp_encode(&mut out);
		out
	}

	/// Returns the transaction hash.
	pub fn hash(&self) -> B256 {
		*self.0.hash()
	}

	/// Decodes a transaction from its canonical encoding.
	///
	/// The whole input must be consumed: trailing bytes are rejected, as are
	/// typed (EIP-2718) envelopes.
	pub fn decode_canonical(bytes: &[u8]) -> Result<Self, CodecError> {
		if let Some(&first) = bytes.first() {
			if first <= 0x7f {
				return Err(CodecError::UnsupportedType(u64::from(first)));
			}
		}

		let mut buf = bytes;
		let signed = TxLegacy::rlp_decode_signed(&mut buf)?;
		if !buf.is_empty() {
			return Err(CodecError::TrailingBytes(buf.len()));
		}
		Ok(Self(signed))
	}

	/// Recovers the address that signed the transaction.
	pub fn recover_sender(&self) -> Result<Address, CodecError> {
		self.0
			.recover_signer()
			.map_err(|e| CodecError::InvalidSignature(e.to_string()))
	}
}

/// Builds the unsigned form of a plain value transfer or call.
pub fn unsigned_call(
	nonce: u64,
	gas_price: u128,
	gas_limit: u64,
	to: Address,
	value: U256,
	chain_id: Option<u64>,
) -> UnsignedTransaction {
	TxLegacy {
		chain_id,
		nonce,
		gas_price,
		gas_limit,
		to: TxKind::Call(to),
		value,
		input: Bytes::new(),
	}
}

/// JSON shape of a transaction, as served by nodes.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TransactionJson {
	nonce: U256,
	gas_price: U256,
	gas: U256,
	to: Option<Address>,
	value: U256,
	input: Bytes,
	v: U256,
	r: U256,
	s: U256,
	hash: B256,
}

impl Serialize for Transaction {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		TransactionJson {
			nonce: U256::from(self.nonce()),
			gas_price: U256::from(self.gas_price()),
			gas: U256::from(self.gas_limit()),
			to: self.to(),
			value: self.value(),
			input: self.input().clone(),
			v: U256::from(self.v()),
			r: self.signature().r(),
			s: self.signature().s(),
			hash: self.hash(),
		}
		.serialize(serializer)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_network::TxSignerSync;
	use alloy_primitives::{address, b256, hex};
	use alloy_rlp::{Encodable, Header};
	use alloy_signer_local::PrivateKeySigner;

	// The EIP-155 example transaction: nonce 9, 20 gwei, 21000 gas, 1 ether to 0x3535..., chain 1.
	const EIP155_RAW: &str = "f86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83";

	fn eip155_tx() -> Transaction {
		Transaction::decode_canonical(&hex::decode(EIP155_RAW).unwrap()).unwrap()
	}

	fn sign(mut unsigned: UnsignedTransaction, signer: &PrivateKeySigner) -> Transaction {
		let signature = signer.sign_transaction_sync(&mut unsigned).unwrap();
		Transaction::new(unsigned, signature)
	}

	#[test]
	fn test_decode_eip155_example() {
		let tx = eip155_tx();
		assert_eq!(tx.nonce(), 9);
		assert_eq!(tx.gas_price(), 20_000_000_000);
		assert_eq!(tx.gas_limit(), 21000);
		assert_eq!(
			tx.to(),
			Some(address!("3535353535353535353535353535353535353535"))
		);
		assert_eq!(tx.value(), U256::from(1_000_000_000_000_000_000u64));
		assert!(tx.input().is_empty());
		assert_eq!(tx.v(), 37);
		assert_eq!(tx.chain_id(), Some(1));
	}

	#[test]
	fn test_eip155_signature_hash_and_sender() {
		let tx = eip155_tx();
		assert_eq!(
			tx.signature_hash(),
			b256!("daf5a779ae972f972197303d7b574746c7ef83eadac0f2791ad23db92e4c8e53")
		);
		assert_eq!(
			tx.recover_sender().unwrap(),
			address!("9d8A62f656a8d1615C1294fd71e9CFb3E4855A4F")
		);
	}

	#[test]
	fn test_round_trip_preserves_fields_and_hash() {
		let tx = eip155_tx();
		let encoded = tx.encoded();
		assert_eq!(hex::encode(&encoded), EIP155_RAW);

		let decoded = Transaction::decode_canonical(&encoded).unwrap();
		assert_eq!(decoded, tx);
		assert_eq!(decoded.hash(), tx.hash());
	}

	#[test]
	fn test_from_parts_matches_decoded() {
		let tx = eip155_tx();
		let rebuilt = Transaction::from_parts(
			tx.unsigned().clone(),
			tx.v(),
			tx.signature().r(),
			tx.signature().s(),
		)
		.unwrap();
		assert_eq!(rebuilt, tx);
	}

	#[test]
	fn test_contract_creation_round_trip() {
		let signer = PrivateKeySigner::from_bytes(&B256::repeat_byte(0x42)).unwrap();
		let tx = sign(
			TxLegacy {
				chain_id: Some(5),
				nonce: 0,
				gas_price: 1_000_000_000,
				gas_limit: 500_000,
				to: TxKind::Create,
				value: U256::ZERO,
				input: Bytes::from(vec![0x60, 0x80, 0x60, 0x40]),
			},
			&signer,
		);

		let decoded = Transaction::decode_canonical(&tx.encoded()).unwrap();
		assert!(decoded.is_contract_creation());
		assert_eq!(decoded.to(), None);
		assert_eq!(decoded, tx);
		assert_eq!(decoded.chain_id(), Some(5));
	}

	#[test]
	fn test_sign_then_recover() {
		let signer = PrivateKeySigner::from_bytes(&B256::repeat_byte(0x11)).unwrap();
		let expected = signer.address();

		for chain_id in [None, Some(1), Some(1337)] {
			let tx = sign(
				unsigned_call(7, 3, 21000, expected, U256::ZERO, chain_id),
				&signer,
			);
			assert_eq!(tx.chain_id(), chain_id);
			assert_eq!(tx.recover_sender().unwrap(), expected);
		}
	}

	#[test]
	fn test_largest_chain_id_does_not_overflow_v() {
		let signer = PrivateKeySigner::from_bytes(&B256::repeat_byte(0x11)).unwrap();
		let tx = sign(
			unsigned_call(0, 1, 21000, signer.address(), U256::ZERO, Some(u64::MAX)),
			&signer,
		);
		assert!(tx.v() >= 35 + 2 * u128::from(u64::MAX));

		let decoded = Transaction::decode_canonical(&tx.encoded()).unwrap();
		assert_eq!(decoded.chain_id(), Some(u64::MAX));
		assert_eq!(decoded.recover_sender().unwrap(), signer.address());
	}

	#[test]
	fn test_rejects_trailing_bytes() {
		let mut bytes = hex::decode(EIP155_RAW).unwrap();
		bytes.push(0x00);
		assert!(matches!(
			Transaction::decode_canonical(&bytes),
			Err(CodecError::TrailingBytes(1))
		));
	}

	#[test]
	fn test_rejects_wrong_field_count() {
		// A list of three integers.
		let short = hex::decode("c3010203").unwrap();
		assert!(matches!(
			Transaction::decode_canonical(&short),
			Err(CodecError::Rlp(_))
		));

		// Valid transaction body with a tenth field appended.
		let tx = eip155_tx();
		let mut payload = Vec::new();
		tx.unsigned().rlp_encode_fields(&mut payload);
		tx.v().encode(&mut payload);
		tx.signature().r().encode(&mut payload);
		tx.signature().s().encode(&mut payload);
		1u8.encode(&mut payload);
		let mut long = Vec::new();
		Header {
			list: true,
			payload_length: payload.len(),
		}
		.encode(&mut long);
		long.extend_from_slice(&payload);
		assert!(matches!(
			Transaction::decode_canonical(&long),
			Err(CodecError::Rlp(_))
		));
	}

	#[test]
	fn test_rejects_string_and_typed_envelopes() {
		assert!(matches!(
			Transaction::decode_canonical(&hex::decode("8401020304").unwrap()),
			Err(CodecError::Rlp(_))
		));
		assert!(matches!(
			Transaction::decode_canonical(&[0x02, 0xc0]),
			Err(CodecError::UnsupportedType(2))
		));
	}

	#[test]
	fn test_invalid_v_is_reported() {
		let tx = eip155_tx();
		let result = Transaction::from_parts(
			tx.unsigned().clone(),
			3,
			tx.signature().r(),
			tx.signature().s(),
		);
		assert!(matches!(result, Err(CodecError::InvalidSignature(_))));
	}

	#[test]
	fn test_unrecoverable_signature() {
		let tx = eip155_tx();
		let broken = Transaction::new(
			tx.unsigned().clone(),
			Signature::new(U256::ZERO, tx.signature().s(), false),
		);
		assert!(matches!(
			broken.recover_sender(),
			Err(CodecError::InvalidSignature(_))
		));
	}

	#[test]
	fn test_json_form() {
		let tx = eip155_tx();
		let json = serde_json::to_value(&tx).unwrap();
		assert_eq!(json["nonce"], "0x9");
		assert_eq!(json["gas"], "0x5208");
		assert_eq!(json["v"], "0x25");
		assert_eq!(json["input"], "0x");
		assert_eq!(json["hash"], serde_json::to_value(tx.hash()).unwrap());
	}
}
