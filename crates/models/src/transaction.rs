use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{require_non_blank, ModelError};

/// Transaction fields a client submits; also the replacement body for updates.
///
/// Human-readable key spellings found in some exported files
/// (`"Account Number"`, `"Merchant/Payee"`, ...) are accepted as aliases and
/// always written back under the canonical names.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TransactionInput {
    #[serde(rename = "Account_Number", alias = "Account Number")]
    pub account_number: String,
    #[serde(rename = "Transaction_Date", alias = "Transaction Date")]
    pub transaction_date: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Transaction_Amount", alias = "Transaction Amount")]
    pub transaction_amount: f64,
    #[serde(rename = "Account_Balance", alias = "Account Balance")]
    pub account_balance: f64,
    #[serde(rename = "Transaction_Type", alias = "Transaction Type")]
    pub transaction_type: String,
    #[serde(rename = "Mode")]
    pub mode: String,
    #[serde(rename = "Merchant_or_Payee", alias = "Merchant or Payee", alias = "Merchant/Payee")]
    pub merchant_or_payee: String,
    #[serde(rename = "IFSC_Code", alias = "IFSC Code")]
    pub ifsc_code: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Phone_Number", alias = "Phone Number")]
    pub phone_number: String,
}

impl TransactionInput {
    pub fn validate(&self) -> Result<(), ModelError> {
        require_non_blank("Phone_Number", &self.phone_number)
    }

    pub fn into_transaction(self, transaction_id: String, customer_id: String) -> Transaction {
        Transaction {
            account_number: self.account_number,
            transaction_date: self.transaction_date,
            description: self.description,
            category: self.category,
            transaction_amount: self.transaction_amount,
            account_balance: self.account_balance,
            transaction_type: self.transaction_type,
            mode: self.mode,
            merchant_or_payee: self.merchant_or_payee,
            ifsc_code: self.ifsc_code,
            location: self.location,
            phone_number: self.phone_number,
            transaction_id,
            customer_id,
        }
    }
}

/// Stored transaction: submitted fields plus the generated `Transaction_ID` and `Customer_ID`.
// Flat on purpose: serde aliases do not survive `#[serde(flatten)]`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    #[serde(rename = "Account_Number", alias = "Account Number")]
    pub account_number: String,
    #[serde(rename = "Transaction_Date", alias = "Transaction Date")]
    pub transaction_date: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Transaction_Amount", alias = "Transaction Amount")]
    pub transaction_amount: f64,
    #[serde(rename = "Account_Balance", alias = "Account Balance")]
    pub account_balance: f64,
    #[serde(rename = "Transaction_Type", alias = "Transaction Type")]
    pub transaction_type: String,
    #[serde(rename = "Mode")]
    pub mode: String,
    #[serde(rename = "Merchant_or_Payee", alias = "Merchant or Payee", alias = "Merchant/Payee")]
    pub merchant_or_payee: String,
    #[serde(rename = "IFSC_Code", alias = "IFSC Code")]
    pub ifsc_code: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Phone_Number", alias = "Phone Number")]
    pub phone_number: String,
    #[serde(rename = "Transaction_ID", alias = "Transaction ID")]
    pub transaction_id: String,
    #[serde(rename = "Customer_ID", alias = "Customer ID")]
    pub customer_id: String,
}

impl Transaction {
    pub fn phone(&self) -> &str {
        &self.phone_number
    }

    pub fn matches_key(&self, phone: &str, txn_id: &str) -> bool {
        self.phone_number == phone && self.transaction_id == txn_id
    }

    /// Replace every submitted field, keeping both generated ids.
    pub fn replace_details(&mut self, details: TransactionInput) {
        let transaction_id = std::mem::take(&mut self.transaction_id);
        let customer_id = std::mem::take(&mut self.customer_id);
        *self = details.into_transaction(transaction_id, customer_id);
    }
}

/// Alternate spellings found in exported ledgers, paired with the canonical key.
pub const KEY_SPELLINGS: &[(&str, &str)] = &[
    ("Account Number", "Account_Number"),
    ("Transaction Date", "Transaction_Date"),
    ("Transaction Amount", "Transaction_Amount"),
    ("Account Balance", "Account_Balance"),
    ("Transaction Type", "Transaction_Type"),
    ("Merchant or Payee", "Merchant_or_Payee"),
    ("Merchant/Payee", "Merchant_or_Payee"),
    ("IFSC Code", "IFSC_Code"),
    ("Phone Number", "Phone_Number"),
    ("Transaction ID", "Transaction_ID"),
    ("Customer ID", "Customer_ID"),
];

/// Rename alternate keys of a raw stored record to their canonical spelling.
///
/// If a record carries both spellings the canonical value is kept and the
/// alternate one dropped.
pub fn normalize_keys(record: &mut Map<String, Value>) {
    for (alternate, canonical) in KEY_SPELLINGS {
        if let Some(value) = record.remove(*alternate) {
            if !record.contains_key(*canonical) {
                record.insert((*canonical).to_string(), value);
            }
        }
    }
}
