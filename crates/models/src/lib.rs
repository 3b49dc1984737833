//! Record shapes persisted by the flat-file collections.
//!
//! JSON field names are the canonical upper/snake spellings (`KYC_ID`,
//! `Account_Number`, ...). Input types carry everything a client may send;
//! the stored types add the generated identifiers.

pub mod errors;
pub mod kyc_profile;
pub mod transaction;

pub use kyc_profile::{KycProfile, KycProfileInput};
pub use transaction::{normalize_keys, Transaction, TransactionInput};
