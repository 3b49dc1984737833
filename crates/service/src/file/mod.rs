//! Flat-file implementations of the store traits.

pub mod kyc_profiles;
pub mod transactions;
