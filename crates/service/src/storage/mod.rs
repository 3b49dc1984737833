//! Storage abstractions for service layer
//!
//! One file per collection, read and rewritten whole on every operation.

pub mod id_sequence;
pub mod json_array_store;
