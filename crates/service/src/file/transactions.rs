use std::sync::Arc;

use models::{Transaction, TransactionInput};
use tracing::{debug, info};

use crate::errors::ServiceError;
use crate::storage::{
    id_sequence::{CUSTOMER_ID, TRANSACTION_ID},
    json_array_store::{JsonArrayStore, StoredRecord},
};
use crate::stores::{TransactionFilter, TransactionLedger};

impl StoredRecord for Transaction {
    fn normalize(raw: &mut serde_json::Map<String, serde_json::Value>) {
        models::normalize_keys(raw);
    }
}

const NONE_FOR_PHONE: &str = "No transactions found.";
const NO_MATCHES: &str = "No matching transactions found.";
const TXN_NOT_FOUND: &str = "Transaction not found.";

/// Bank transactions persisted as one JSON array.
///
/// Every insert draws a fresh `Transaction_ID` and `Customer_ID`; both are
/// fixed for the life of the record.
#[derive(Clone)]
pub struct TransactionStore {
    store: Arc<JsonArrayStore<Transaction>>,
}

impl TransactionStore {
    pub async fn new<P: Into<std::path::PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let store = JsonArrayStore::new("transactions", path).await?;
        Ok(Arc::new(Self { store }))
    }

    pub async fn create(&self, input: TransactionInput) -> Result<Transaction, ServiceError> {
        input.validate()?;
        let created = self
            .store
            .mutate(|records| {
                let txn_id = TRANSACTION_ID.next(records.iter().map(|t| t.transaction_id.as_str()));
                let customer_id = CUSTOMER_ID.next(records.iter().map(|t| t.customer_id.as_str()));
                let txn = input.into_transaction(txn_id, customer_id);
                records.push(txn.clone());
                Ok(txn)
            })
            .await?;
        info!(txn_id = %created.transaction_id, customer_id = %created.customer_id, "transaction created");
        Ok(created)
    }

    pub async fn by_phone(&self, phone: &str) -> Result<Vec<Transaction>, ServiceError> {
        let found: Vec<Transaction> = self
            .store
            .load()
            .await?
            .into_iter()
            .filter(|t| t.phone() == phone)
            .collect();
        if found.is_empty() {
            return Err(ServiceError::not_found(NONE_FOR_PHONE));
        }
        Ok(found)
    }

    /// Linear scan with every supplied predicate applied; an empty filter returns everything.
    pub async fn search(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>, ServiceError> {
        let records = self.store.load().await?;
        let total = records.len();
        let found: Vec<Transaction> = records.into_iter().filter(|t| filter.matches(t)).collect();
        debug!(total, matched = found.len(), "transaction search");
        if found.is_empty() {
            return Err(ServiceError::not_found(NO_MATCHES));
        }
        Ok(found)
    }

    pub async fn update(&self, phone: &str, txn_id: &str, input: TransactionInput) -> Result<Transaction, ServiceError> {
        input.validate()?;
        let updated = self
            .store
            .mutate(|records| {
                let existing = records
                    .iter_mut()
                    .find(|t| t.matches_key(phone, txn_id))
                    .ok_or_else(|| ServiceError::not_found(TXN_NOT_FOUND))?;
                existing.replace_details(input);
                Ok(existing.clone())
            })
            .await?;
        info!(txn_id = %updated.transaction_id, "transaction updated");
        Ok(updated)
    }

    pub async fn delete(&self, phone: &str, txn_id: &str) -> Result<String, ServiceError> {
        self.store
            .mutate(|records| {
                let before = records.len();
                records.retain(|t| !t.matches_key(phone, txn_id));
                if records.len() == before {
                    return Err(ServiceError::not_found(TXN_NOT_FOUND));
                }
                Ok(())
            })
            .await?;
        info!(%txn_id, "transaction deleted");
        Ok(txn_id.to_string())
    }
}

#[async_trait::async_trait]
impl TransactionLedger for TransactionStore {
    async fn create(&self, input: TransactionInput) -> Result<Transaction, ServiceError> { self.create(input).await }
    async fn by_phone(&self, phone: &str) -> Result<Vec<Transaction>, ServiceError> { self.by_phone(phone).await }
    async fn search(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>, ServiceError> { self.search(filter).await }
    async fn update(&self, phone: &str, txn_id: &str, input: TransactionInput) -> Result<Transaction, ServiceError> { self.update(phone, txn_id, input).await }
    async fn delete(&self, phone: &str, txn_id: &str) -> Result<String, ServiceError> { self.delete(phone, txn_id).await }
}
