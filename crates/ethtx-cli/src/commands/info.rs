//! `ethtx transaction info`.

use super::{CliError, Context};
use clap::Args;
use ethtx_core::{
	addresses_of, render, resolve_aliases, FunctionSignatureRegistry, TransactionLocator,
};
use ethtx_delivery::implementations::evm::alloy::create_http_delivery;
use ethtx_types::hex_dump;
use std::sync::Arc;

/// Arguments of `transaction info`.
///
/// In quiet mode the command prints nothing and exits with 0 if the
/// transaction exists, otherwise 1.
#[derive(Args, Debug)]
pub struct InfoArgs {
	/// Transaction hash, or a raw transaction as hex
	#[arg(long)]
	pub transaction: String,

	/// Output the transaction as raw hex
	#[arg(long, conflicts_with = "json")]
	pub raw: bool,

	/// Output the transaction as JSON
	#[arg(long)]
	pub json: bool,

	/// Semicolon-separated list of custom function signatures (e.g. myFunc(address,bytes32);myFunc2(bool))
	#[arg(long)]
	pub signatures: Option<String>,
}

pub async fn run(args: &InfoArgs, context: &Context) -> Result<(), CliError> {
	let delivery = Arc::new(create_http_delivery(&context.config.network, true)?);
	let locator = TransactionLocator::new(Arc::clone(&delivery));

	let (tx, pending) = locator
		.locate(&args.transaction)
		.await
		.map_err(CliError::Locate)?;

	if context.quiet {
		return Ok(());
	}

	if args.raw {
		println!("{}", hex_dump(&tx.encoded()));
		return Ok(());
	}

	if args.json {
		println!("{}", serde_json::to_string(&tx)?);
		return Ok(());
	}

	let mut registry = FunctionSignatureRegistry::with_defaults();
	if let Some(signatures) = &args.signatures {
		registry.extend_from_list(signatures);
	}

	let receipt = locator.receipt(&tx, pending).await;
	let aliases = resolve_aliases(&delivery, addresses_of(&tx, receipt.as_ref())).await;
	let report = render(
		&tx,
		pending,
		receipt.as_ref(),
		context.verbose,
		&registry,
		&aliases,
	);
	print!("{}", report);

	Ok(())
}
