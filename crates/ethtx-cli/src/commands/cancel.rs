//! `ethtx transaction cancel`.

use super::{CliError, Context};
use clap::Args;
use ethtx_account::implementations::local::create_account;
use ethtx_account::AccountService;
use ethtx_core::TransactionCanceller;
use ethtx_delivery::implementations::evm::alloy::create_http_delivery;
use ethtx_types::{parse_wei, SecretString};
use std::sync::Arc;

/// Arguments of `transaction cancel`.
///
/// Ethereum cannot withdraw a pending transaction; this overwrites it with a
/// 0-value transfer back to the sender at the same nonce. The replacement
/// costs 21000 gas and defaults to a gas price 11% above the original.
#[derive(Args, Debug)]
pub struct CancelArgs {
	/// Hash of the pending transaction
	#[arg(long)]
	pub transaction: String,

	/// Gas price of the replacement, in wei or with a unit (e.g. "25 gwei")
	#[arg(long, value_parser = parse_gas_price)]
	pub gasprice: Option<u128>,

	/// Passphrase unlocking the sender's keystore file
	#[arg(long, env = "ETHTX_PASSPHRASE", hide_env_values = true, value_parser = parse_secret)]
	pub passphrase: Option<SecretString>,
}

fn parse_gas_price(input: &str) -> Result<u128, String> {
	let wei = parse_wei(input).map_err(|e| e.to_string())?;
	u128::try_from(&wei).map_err(|_| format!("Gas price too large: {}", input))
}

fn parse_secret(input: &str) -> Result<SecretString, String> {
	Ok(SecretString::from(input))
}

pub async fn run(args: &CancelArgs, context: &Context) -> Result<(), CliError> {
	let delivery = Arc::new(create_http_delivery(&context.config.network, false)?);
	let account = Arc::new(AccountService::new(create_account(
		&context.config.account,
		args.passphrase.clone(),
	)?));

	let hash = TransactionCanceller::new(delivery, account)
		.cancel(&args.transaction, args.gasprice)
		.await
		.map_err(CliError::Cancel)?;

	if !context.quiet {
		println!("{}", hash);
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_gas_price() {
		assert_eq!(parse_gas_price("1000").unwrap(), 1000);
		assert_eq!(parse_gas_price("1.5 gwei").unwrap(), 1_500_000_000);
		assert!(parse_gas_price("fast").unwrap_err().contains("fast"));
		assert!(parse_gas_price("1000000000000000000000 ether")
			.unwrap_err()
			.contains("too large"));
	}
}
