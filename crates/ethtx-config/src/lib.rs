//! Configuration module for the ethtx tool.
//!
//! Configuration is optional: every field has a default, and a TOML file only
//! needs the values it overrides. String values may reference environment
//! variables as `${VAR_NAME}` or `${VAR_NAME:-default}`, which is how private
//! keys are usually supplied:
//!
//! ```toml
//! [network]
//! rpc_url = "https://mainnet.example.org"
//! timeout_seconds = 30
//!
//! [account]
//! keystore_dir = "/home/alice/.ethereum/keystore"
//! private_key = "${ETHTX_PRIVATE_KEY:-}"
//! ```

use ethtx_types::{Address, SecretString};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Address of the ENS registry, identical on mainnet and the public testnets.
pub const DEFAULT_ENS_REGISTRY: &str = "0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e";

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
	/// Node connection settings.
	#[serde(default)]
	pub network: NetworkConfig,
	/// Key material used to sign replacement transactions.
	#[serde(default)]
	pub account: AccountConfig,
}

/// Node connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
	/// HTTP(S) JSON-RPC endpoint.
	#[serde(default = "default_rpc_url")]
	pub rpc_url: String,
	/// Upper bound for each remote call, in seconds.
	#[serde(default = "default_timeout_seconds")]
	pub timeout_seconds: u64,
	/// ENS registry used for reverse resolution.
	#[serde(default = "default_ens_registry")]
	pub ens_registry: String,
}

impl Default for NetworkConfig {
	fn default() -> Self {
		Self {
			rpc_url: default_rpc_url(),
			timeout_seconds: default_timeout_seconds(),
			ens_registry: default_ens_registry(),
		}
	}
}

/// Signing key configuration.
///
/// Either source may be set. Keystore files are looked up by the sender's
/// address and unlocked with the passphrase given on the command line.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AccountConfig {
	/// Directory of encrypted JSON keystore files.
	pub keystore_dir: Option<PathBuf>,
	/// Hex-encoded private key.
	pub private_key: Option<SecretString>,
}

fn default_rpc_url() -> String {
	"http://localhost:8545".to_string()
}

fn default_timeout_seconds() -> u64 {
	30
}

fn default_ens_registry() -> String {
	DEFAULT_ENS_REGISTRY.to_string()
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	// Limit input size to keep regex matching bounded
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name.as_str()) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name.as_str()
					)));
				}
			},
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	// Apply replacements in reverse order to maintain positions
	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

impl Config {
	/// Loads configuration from a TOML file, resolving environment variables.
	pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let content = tokio::fs::read_to_string(path).await.map_err(|e| {
			ConfigError::Io(std::io::Error::new(
				e.kind(),
				format!("Cannot read {}: {}", path.display(), e),
			))
		})?;
		content.parse()
	}

	/// Applies command-line overrides on top of the loaded values.
	pub fn with_overrides(mut self, rpc_url: Option<String>, timeout_seconds: Option<u64>) -> Self {
		if let Some(rpc_url) = rpc_url {
			self.network.rpc_url = rpc_url;
		}
		if let Some(timeout_seconds) = timeout_seconds {
			self.network.timeout_seconds = timeout_seconds;
		}
		self
	}

	/// Parsed ENS registry address.
	pub fn ens_registry(&self) -> Result<Address, ConfigError> {
		self.network.ens_registry.parse().map_err(|e| {
			ConfigError::Validation(format!(
				"Invalid ens_registry '{}': {}",
				self.network.ens_registry, e
			))
		})
	}

	/// Validates the configuration.
	///
	/// Checks that the RPC URL is an HTTP(S) endpoint, the timeout is non-zero
	/// and the ENS registry is a valid address.
	pub fn validate(&self) -> Result<(), ConfigError> {
		let rpc_url = self.network.rpc_url.trim();
		if rpc_url.is_empty() {
			return Err(ConfigError::Validation("rpc_url cannot be empty".into()));
		}
		if !(rpc_url.starts_with("http://") || rpc_url.starts_with("https://")) {
			return Err(ConfigError::Validation(format!(
				"rpc_url must be an http(s) URL, got '{}'",
				rpc_url
			)));
		}
		if self.network.timeout_seconds == 0 {
			return Err(ConfigError::Validation(
				"timeout_seconds must be greater than zero".into(),
			));
		}
		self.ens_registry()?;
		Ok(())
	}
}

impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
