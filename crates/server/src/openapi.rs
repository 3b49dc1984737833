#![allow(non_snake_case)]

use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct MessageDoc { pub message: String }

#[derive(ToSchema)]
pub struct ErrorDoc { pub detail: String }

#[derive(ToSchema)]
pub struct KycProfileInputDoc {
    pub PREFIX: String,
    pub FNAME: String,
    pub LNAME: String,
    /// Derived as "PREFIX FNAME LNAME" when omitted.
    pub FULLNAME: Option<String>,
    pub GENDER: String,
    pub DOB: String,
    pub PAN: String,
    pub Address: String,
    pub PERM_PIN: String,
    pub MOB_CODE: String,
    pub MOB_NUM: String,
    pub EMAIL_ID: String,
}

#[derive(ToSchema)]
pub struct KycProfileDoc {
    pub PREFIX: String,
    pub FNAME: String,
    pub LNAME: String,
    pub FULLNAME: String,
    pub GENDER: String,
    pub DOB: String,
    pub PAN: String,
    pub Address: String,
    pub PERM_PIN: String,
    pub MOB_CODE: String,
    pub MOB_NUM: String,
    pub EMAIL_ID: String,
    /// KYC0001, KYC0002, ...
    pub KYC_ID: String,
}

#[derive(ToSchema)]
pub struct TransactionInputDoc {
    pub Account_Number: String,
    pub Transaction_Date: String,
    pub Description: String,
    pub Category: String,
    pub Transaction_Amount: f64,
    pub Account_Balance: f64,
    pub Transaction_Type: String,
    pub Mode: String,
    pub Merchant_or_Payee: String,
    pub IFSC_Code: String,
    pub Location: String,
    pub Phone_Number: String,
}

#[derive(ToSchema)]
pub struct TransactionDoc {
    pub Account_Number: String,
    pub Transaction_Date: String,
    pub Description: String,
    pub Category: String,
    pub Transaction_Amount: f64,
    pub Account_Balance: f64,
    pub Transaction_Type: String,
    pub Mode: String,
    pub Merchant_or_Payee: String,
    pub IFSC_Code: String,
    pub Location: String,
    pub Phone_Number: String,
    /// TXN00001, TXN00002, ...
    pub Transaction_ID: String,
    /// CUST1001, CUST1002, ...
    pub Customer_ID: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::profiles::add_profile,
        crate::routes::profiles::list_profiles,
        crate::routes::profiles::get_profile,
        crate::routes::profiles::update_profile,
        crate::routes::profiles::delete_profile,
        crate::routes::transactions::add_transaction,
        crate::routes::transactions::get_transactions,
        crate::routes::transactions::search_transactions,
        crate::routes::transactions::update_transaction,
        crate::routes::transactions::delete_transaction,
    ),
    components(
        schemas(
            HealthResponse,
            MessageDoc,
            ErrorDoc,
            KycProfileInputDoc,
            KycProfileDoc,
            TransactionInputDoc,
            TransactionDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "kyc"),
        (name = "ledger")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_record_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/add_profile",
            "/profiles",
            "/profile",
            "/update_profile/{phone}/{kyc_id}",
            "/delete_profile/{phone}/{kyc_id}",
            "/add_transaction",
            "/transactions/{phone_number}",
            "/transactions/search",
            "/update_transaction/{phone_number}/{txn_id}",
            "/delete_transaction/{phone_number}/{txn_id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
