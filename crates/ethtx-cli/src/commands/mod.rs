//! Command implementations and the state they share.

use ethtx_account::AccountError;
use ethtx_config::{Config, ConfigError};
use ethtx_core::TxError;
use ethtx_delivery::DeliveryError;
use std::path::Path;
use thiserror::Error;

pub mod cancel;
pub mod info;

/// Errors reported by a command, each with the step that failed.
#[derive(Debug, Error)]
pub enum CliError {
	#[error("Failed to load configuration: {0}")]
	Config(#[from] ConfigError),
	#[error("Failed to connect to node: {0}")]
	Connection(#[from] DeliveryError),
	#[error("Failed to set up account: {0}")]
	Account(#[from] AccountError),
	#[error("Failed to obtain transaction: {0}")]
	Locate(#[source] TxError),
	#[error("Failed to cancel transaction: {0}")]
	Cancel(#[source] TxError),
	#[error("Failed to obtain JSON for transaction: {0}")]
	Json(#[from] serde_json::Error),
}

/// Settings every command runs with.
#[derive(Debug, Clone)]
pub struct Context {
	pub config: Config,
	pub quiet: bool,
	pub verbose: bool,
}

impl Context {
	/// Loads the configuration file, if any, and applies command-line overrides.
	pub async fn load(
		config_path: Option<&Path>,
		connection: Option<String>,
		timeout: Option<u64>,
		quiet: bool,
		verbose: bool,
	) -> Result<Self, CliError> {
		let config = match config_path {
			Some(path) => {
				tracing::debug!(path = %path.display(), "Loading configuration");
				Config::from_file(path).await?
			}
			None => Config::default(),
		};

		let config = config.with_overrides(connection, timeout);
		config.validate()?;

		Ok(Self {
			config,
			quiet,
			verbose,
		})
	}
}
