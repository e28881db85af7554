//! Human-readable transaction reports.
//!
//! Rendering is pure: names for addresses are looked up beforehand with
//! [`resolve_aliases`] and passed in, so a report can be built and tested
//! without a node.

use crate::registry::FunctionSignatureRegistry;
use ethtx_delivery::DeliveryService;
use ethtx_types::{format_wei, hex_dump, split_words, Address, Receipt, Transaction, U256};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Column at which top-level values start.
const VALUE_COLUMN: usize = 24;
const TAB_WIDTH: usize = 8;

/// One line of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
	/// Nesting level; top-level fields are at depth 0.
	pub depth: usize,
	pub label: String,
	pub value: Option<String>,
}

/// Ordered lines describing a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
	lines: Vec<ReportLine>,
}

impl Report {
	fn push(&mut self, depth: usize, label: impl Into<String>, value: Option<String>) {
		self.lines.push(ReportLine {
			depth,
			label: label.into(),
			value,
		});
	}

	fn field(&mut self, label: &str, value: impl Into<String>) {
		self.push(0, label, Some(value.into()));
	}

	/// Lines in display order.
	pub fn lines(&self) -> &[ReportLine] {
		&self.lines
	}

	/// Value of the first top-level line with `label`.
	pub fn value_of(&self, label: &str) -> Option<&str> {
		self.lines
			.iter()
			.find(|line| line.depth == 0 && line.label == label)
			.and_then(|line| line.value.as_deref())
	}
}

impl fmt::Display for ReportLine {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let label = format!("{}:", self.label);
		match (&self.value, self.depth) {
			(None, depth) => write!(f, "{}{}", "\t".repeat(depth), label),
			(Some(value), 0) => {
				let tabs = (VALUE_COLUMN.saturating_sub(label.len()) + TAB_WIDTH - 1) / TAB_WIDTH;
				write!(f, "{}{}{}", label, "\t".repeat(tabs.max(1)), value)
			}
			(Some(value), depth) => write!(f, "{}{}\t{}", "\t".repeat(depth), label, value),
		}
	}
}

impl fmt::Display for Report {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for line in &self.lines {
			writeln!(f, "{}", line)?;
		}
		Ok(())
	}
}

/// Addresses worth naming in the report of `tx`.
pub fn addresses_of(tx: &Transaction, receipt: Option<&Receipt>) -> Vec<Address> {
	let mut addresses = Vec::new();
	if let Ok(sender) = tx.recover_sender() {
		addresses.push(sender);
	}
	match (tx.to(), receipt.and_then(|r| r.contract_address)) {
		(Some(to), _) => addresses.push(to),
		(None, Some(created)) => addresses.push(created),
		(None, None) => {}
	}
	addresses
}

/// Looks up names for `addresses`; addresses without a name are left out.
///
/// Each distinct address is looked up once.
pub async fn resolve_aliases(
	delivery: &DeliveryService,
	addresses: impl IntoIterator<Item = Address>,
) -> HashMap<Address, String> {
	let mut aliases = HashMap::new();
	let mut visited = HashSet::new();
	for address in addresses {
		if !visited.insert(address) {
			continue;
		}
		if let Some(name) = delivery.lookup_name(address).await {
			aliases.insert(address, name);
		}
	}
	aliases
}

fn annotate(address: &Address, aliases: &HashMap<Address, String>) -> String {
	let checksummed = address.to_checksum(None);
	match aliases.get(address) {
		Some(alias) => format!("{} ({})", alias, checksummed),
		None => checksummed,
	}
}

fn wei_amount(amount: U256) -> String {
	format!("{} ({})", amount, format_wei(amount))
}

/// Builds the report for a transaction.
///
/// `receipt` is expected only for mined transactions. Logs are listed when
/// `verbose` is set and the receipt has any.
pub fn render(
	tx: &Transaction,
	pending: bool,
	receipt: Option<&Receipt>,
	verbose: bool,
	registry: &FunctionSignatureRegistry,
	aliases: &HashMap<Address, String>,
) -> Report {
	let mut report = Report::default();

	let kind = match (pending, tx.is_contract_creation()) {
		(true, true) => "Pending contract creation",
		(true, false) => "Pending transaction",
		(false, true) => "Mined contract creation",
		(false, false) => "Mined transaction",
	};
	report.field("Type", kind);

	if let Some(receipt) = receipt {
		report.field(
			"Result",
			if receipt.succeeded() { "Succeeded" } else { "Failed" },
		);
	}

	match tx.recover_sender() {
		Ok(sender) => report.field("From", annotate(&sender, aliases)),
		Err(error) => tracing::debug!(%error, "Cannot recover sender"),
	}

	match (tx.to(), receipt.and_then(|r| r.contract_address)) {
		(Some(to), _) => report.field("To", annotate(&to, aliases)),
		(None, Some(created)) => report.field("Contract address", annotate(&created, aliases)),
		(None, None) => {}
	}

	report.field("Nonce", tx.nonce().to_string());
	report.field("Gas limit", tx.gas_limit().to_string());
	if let Some(receipt) = receipt {
		report.field("Gas used", receipt.gas_used.to_string());
	}
	report.field("Gas price", wei_amount(U256::from(tx.gas_price())));
	report.field("Value", wei_amount(tx.value()));

	if !tx.input().is_empty() {
		report.field("Data", registry.decode(tx.input()));
	}

	if let Some(receipt) = receipt.filter(|r| verbose && !r.logs.is_empty()) {
		report.push(0, "Logs", None);
		for (i, log) in receipt.logs.iter().enumerate() {
			report.push(1, i.to_string(), None);
			report.push(2, "Address", Some(log.address.to_checksum(None)));
			if !log.topics.is_empty() {
				report.push(2, "Topics", None);
				for (j, topic) in log.topics.iter().enumerate() {
					report.push(3, j.to_string(), Some(hex_dump(topic.as_slice())));
				}
			}
			if !log.data.is_empty() {
				report.push(2, "Data", None);
				for (j, word) in split_words(&log.data).enumerate() {
					report.push(3, j.to_string(), Some(hex_dump(word)));
				}
			}
		}
	}

	report
}
