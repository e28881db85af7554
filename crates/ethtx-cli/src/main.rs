//! Main entry point for the ethtx tool.
//!
//! `ethtx transaction info` describes a transaction given its hash or its raw
//! encoding; `ethtx transaction cancel` supersedes a pending transaction with a
//! zero-value transfer to its sender. Command output goes to stdout, logs and
//! errors to stderr. The exit code is 0 on success and 1 on any failure.

use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

use commands::{cancel::CancelArgs, info::InfoArgs, CliError, Context};

/// Command-line arguments for ethtx.
#[derive(Parser, Debug)]
#[command(name = "ethtx", author, version, about, long_about = None)]
struct Args {
	/// Path to an optional TOML configuration file
	#[arg(long, global = true)]
	config: Option<PathBuf>,

	/// JSON-RPC endpoint, overriding the configured one
	#[arg(long, global = true)]
	connection: Option<String>,

	/// Timeout for each remote call, in seconds
	#[arg(long, global = true)]
	timeout: Option<u64>,

	/// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
	#[arg(long, global = true, default_value = "info")]
	log_level: String,

	/// Print nothing; report the outcome through the exit code only
	#[arg(long, global = true)]
	quiet: bool,

	/// Print additional detail, such as transaction logs
	#[arg(long, global = true)]
	verbose: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Inspect and manage transactions
	#[command(subcommand)]
	Transaction(TransactionCommand),
}

#[derive(Subcommand, Debug)]
enum TransactionCommand {
	/// Obtain information about a transaction
	Info(InfoArgs),
	/// Cancel a pending transaction by replacing it with a 0-value self-transfer
	Cancel(CancelArgs),
}

/// Installs the tracing subscriber, writing to stderr.
///
/// Quiet mode disables logging entirely.
fn init_tracing(args: &Args) {
	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter = if args.quiet {
		EnvFilter::new("off")
	} else {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level))
	};

	fmt()
		.with_env_filter(env_filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.init();
}

/// Whether `--quiet` appears among the raw arguments, before any `--`.
///
/// Used when parsing fails and the parsed flag is unavailable.
fn quiet_requested<I, S>(args: I) -> bool
where
	I: IntoIterator<Item = S>,
	S: AsRef<OsStr>,
{
	args.into_iter()
		.skip(1)
		.map_while(|arg| (arg.as_ref() != "--").then_some(arg))
		.any(|arg| arg.as_ref() == "--quiet")
}

/// Prints a parsing failure. Help and version output always goes to stdout;
/// usage errors go to `stderr` unless `quiet` is set.
fn report_parse_error(
	error: &clap::Error,
	quiet: bool,
	stderr: &mut impl Write,
) -> io::Result<()> {
	if !error.use_stderr() {
		return error.print();
	}
	if !quiet {
		write!(stderr, "{}", error.render())?;
	}
	Ok(())
}

async fn run(args: Args) -> Result<(), CliError> {
	let context = Context::load(
		args.config.as_deref(),
		args.connection,
		args.timeout,
		args.quiet,
		args.verbose,
	)
	.await?;

	match args.command {
		Command::Transaction(TransactionCommand::Info(info)) => {
			commands::info::run(&info, &context).await
		}
		Command::Transaction(TransactionCommand::Cancel(cancel)) => {
			commands::cancel::run(&cancel, &context).await
		}
	}
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
	let args = match Args::try_parse() {
		Ok(args) => args,
		Err(error) => {
			let quiet = quiet_requested(std::env::args_os());
			if report_parse_error(&error, quiet, &mut io::stderr()).is_err() || error.use_stderr() {
				return ExitCode::FAILURE;
			}
			return ExitCode::SUCCESS;
		}
	};

	init_tracing(&args);
	let quiet = args.quiet;

	match run(args).await {
		Ok(()) => ExitCode::SUCCESS,
		Err(error) => {
			if !quiet {
				eprintln!("error: {}", error);
			}
			ExitCode::FAILURE
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::CommandFactory;

	#[test]
	fn test_command_definition() {
		Args::command().debug_assert();
	}

	#[test]
	fn test_parse_info() {
		let args = Args::try_parse_from([
			"ethtx",
			"transaction",
			"info",
			"--transaction=0xabc",
			"--json",
			"--signatures=myFunc(address,bytes32);myFunc2(bool)",
			"--verbose",
		])
		.unwrap();

		assert!(args.verbose);
		assert!(!args.quiet);
		assert_eq!(args.log_level, "info");
		match args.command {
			Command::Transaction(TransactionCommand::Info(info)) => {
				assert_eq!(info.transaction, "0xabc");
				assert!(info.json);
				assert!(!info.raw);
				assert_eq!(
					info.signatures.as_deref(),
					Some("myFunc(address,bytes32);myFunc2(bool)")
				);
			}
			other => panic!("unexpected command: {:?}", other),
		}
	}

	#[test]
	fn test_parse_cancel() {
		let args = Args::try_parse_from([
			"ethtx",
			"--connection",
			"https://rpc.example",
			"transaction",
			"cancel",
			"--transaction",
			"0xabc",
			"--gasprice",
			"21 gwei",
			"--passphrase",
			"secret",
			"--quiet",
		])
		.unwrap();

		assert!(args.quiet);
		assert_eq!(args.connection.as_deref(), Some("https://rpc.example"));
		match args.command {
			Command::Transaction(TransactionCommand::Cancel(cancel)) => {
				assert_eq!(cancel.gasprice, Some(21_000_000_000));
				assert_eq!(
					cancel.passphrase.map(|p| p.with_exposed(str::to_string)),
					Some("secret".to_string())
				);
			}
			other => panic!("unexpected command: {:?}", other),
		}
	}

	#[test]
	fn test_rejects_bad_gas_price() {
		let result = Args::try_parse_from([
			"ethtx",
			"transaction",
			"cancel",
			"--transaction=0xabc",
			"--gasprice=3 bananas",
		]);
		assert!(result.is_err());
	}

	#[test]
	fn test_transaction_is_required() {
		assert!(Args::try_parse_from(["ethtx", "transaction", "info"]).is_err());
	}

	#[test]
	fn test_quiet_requested() {
		assert!(quiet_requested(["ethtx", "transaction", "info", "--quiet"]));
		assert!(quiet_requested(["ethtx", "--quiet", "transaction", "info"]));
		assert!(!quiet_requested(["ethtx", "transaction", "info"]));
		assert!(!quiet_requested(["ethtx", "transaction", "info", "--", "--quiet"]));
		assert!(!quiet_requested(["--quiet"]));
	}

	#[test]
	fn test_quiet_parse_errors_print_nothing() {
		let failures = [
			vec!["ethtx", "transaction", "info", "--quiet"],
			vec![
				"ethtx",
				"--quiet",
				"transaction",
				"cancel",
				"--transaction",
				"0xabc",
				"--gasprice",
				"fast",
			],
		];

		for argv in failures {
			let error = Args::try_parse_from(&argv).unwrap_err();
			assert!(error.use_stderr());
			assert!(quiet_requested(&argv));

			let mut stderr = Vec::new();
			report_parse_error(&error, true, &mut stderr).unwrap();
			assert!(stderr.is_empty());
		}
	}

	#[test]
	fn test_parse_errors_are_printed_without_quiet() {
		let error = Args::try_parse_from(["ethtx", "transaction", "info"]).unwrap_err();

		let mut stderr = Vec::new();
		report_parse_error(&error, false, &mut stderr).unwrap();
		let text = String::from_utf8(stderr).unwrap();
		assert!(text.contains("--transaction"), "unexpected output: {}", text);
	}
}
