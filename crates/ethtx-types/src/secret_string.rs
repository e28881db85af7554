//! Secret string type for passphrases and private keys.
//!
//! `SecretString` zeroes its buffer on drop and never prints its contents, so a
//! keystore passphrase or raw key can travel through configuration and logs
//! without leaking.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::Zeroizing;

/// A string that is zeroed on drop and redacted in `Debug`, `Display` and serialization.
#[derive(Clone)]
pub struct SecretString(Zeroizing<String>);

impl SecretString {
	/// Wraps a string.
	pub fn new(s: String) -> Self {
		Self(Zeroizing::new(s))
	}

	/// Exposes the secret to a closure.
	///
	/// Keeping the exposure inside a closure keeps the plain text out of
	/// long-lived bindings.
	pub fn with_exposed<F, R>(&self, f: F) -> R
	where
		F: FnOnce(&str) -> R,
	{
		f(&self.0)
	}

	/// Returns true if the secret is empty.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl fmt::Debug for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "SecretString(***REDACTED***)")
	}
}

impl fmt::Display for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "***REDACTED***")
	}
}

impl From<String> for SecretString {
	fn from(s: String) -> Self {
		Self::new(s)
	}
}

impl From<&str> for SecretString {
	fn from(s: &str) -> Self {
		Self::new(s.to_string())
	}
}

impl PartialEq for SecretString {
	fn eq(&self, other: &Self) -> bool {
		self.0.as_str() == other.0.as_str()
	}
}

impl Eq for SecretString {}

impl Serialize for SecretString {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str("***REDACTED***")
	}
}

impl<'de> Deserialize<'de> for SecretString {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let s = String::deserialize(deserializer)?;
		Ok(SecretString::new(s))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_passphrase_is_redacted() {
		let passphrase = SecretString::from("correct horse");
		assert_eq!(format!("{:?}", passphrase), "SecretString(***REDACTED***)");
		assert_eq!(format!("{}", passphrase), "***REDACTED***");
		assert_eq!(
			serde_json::to_string(&passphrase).unwrap(),
			"\"***REDACTED***\""
		);
	}

	#[test]
	fn test_with_exposed() {
		let key = SecretString::from("0x4646464646464646464646464646464646464646464646464646464646464646");
		assert_eq!(key.with_exposed(|s| s.len()), 66);
		assert!(!key.is_empty());
		assert_eq!(key, SecretString::from(key.with_exposed(str::to_string)));
	}
}
