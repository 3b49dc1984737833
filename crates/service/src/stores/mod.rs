//! Trait seams between the HTTP layer and storage, plus the query types
//! both sides share.

pub mod profile_registry;
pub mod transaction_ledger;

pub use profile_registry::{ProfileLookup, ProfileQuery, ProfileRegistry};
pub use transaction_ledger::{TransactionFilter, TransactionLedger};

/// Query-string values are optional and an empty value counts as absent.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
