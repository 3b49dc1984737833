//! Service layer for the KYC registry and the transaction ledger.
//! - `storage`: whole-file JSON array store and sequential id generation.
//! - `stores`: trait seams the HTTP layer depends on, plus query types.
//! - `file`: flat-file implementations of those traits.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod stores;
pub mod file;
