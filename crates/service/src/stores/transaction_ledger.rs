use async_trait::async_trait;
use models::{Transaction, TransactionInput};
use serde::Deserialize;

use crate::errors::ServiceError;
use crate::stores::present;

/// Trait abstraction for transaction storage.
#[async_trait]
pub trait TransactionLedger: Send + Sync {
    async fn create(&self, input: TransactionInput) -> Result<Transaction, ServiceError>;
    async fn by_phone(&self, phone: &str) -> Result<Vec<Transaction>, ServiceError>;
    async fn search(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>, ServiceError>;
    async fn update(&self, phone: &str, txn_id: &str, input: TransactionInput) -> Result<Transaction, ServiceError>;
    /// Returns the id of the removed transaction.
    async fn delete(&self, phone: &str, txn_id: &str) -> Result<String, ServiceError>;
}

/// Optional search predicates, AND-combined. Identifiers match exactly;
/// free-text fields match as case-insensitive substrings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionFilter {
    pub phone_number: Option<String>,
    pub transaction_type: Option<String>,
    pub category: Option<String>,
    pub merchant: Option<String>,
    pub mode: Option<String>,
    pub location: Option<String>,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl TransactionFilter {
    pub fn is_empty(&self) -> bool {
        [&self.phone_number, &self.transaction_type, &self.category, &self.merchant, &self.mode, &self.location]
            .into_iter()
            .all(|v| present(v).is_none())
    }

    pub fn matches(&self, t: &Transaction) -> bool {
        present(&self.phone_number).map_or(true, |p| t.phone_number == p)
            && present(&self.transaction_type).map_or(true, |ty| t.transaction_type == ty)
            && present(&self.category).map_or(true, |c| contains_ci(&t.category, c))
            && present(&self.merchant).map_or(true, |m| contains_ci(&t.merchant_or_payee, m))
            && present(&self.mode).map_or(true, |m| contains_ci(&t.mode, m))
            && present(&self.location).map_or(true, |l| contains_ci(&t.location, l))
    }
}
