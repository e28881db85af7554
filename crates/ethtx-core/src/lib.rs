//! Transaction introspection and replacement engine.
//!
//! This crate turns what a user types into a transaction, describes it, and
//! replaces it while it is still pending:
//!
//! - [`TransactionLocator`] resolves a hash or a raw encoded transaction;
//! - [`render`] produces the human-readable report, decoding call data with a
//!   [`FunctionSignatureRegistry`];
//! - [`build_replacement`] and [`TransactionCanceller`] supersede a pending
//!   transaction with a zero-value self-transfer at the same nonce.

mod error;
pub mod locator;
pub mod registry;
pub mod renderer;
pub mod replacement;

pub use error::TxError;
pub use locator::{TransactionLocator, TransactionRef};
pub use registry::{FunctionSignatureRegistry, Selector};
pub use renderer::{addresses_of, render, resolve_aliases, Report, ReportLine};
pub use replacement::{
	build_replacement, bumped_gas_price, ensure_pending, Replacement, TransactionCanceller,
};
