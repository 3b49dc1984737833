use std::sync::Arc;

use models::{KycProfile, KycProfileInput};
use tracing::info;

use crate::errors::ServiceError;
use crate::storage::{
    id_sequence::KYC_ID,
    json_array_store::{JsonArrayStore, StoredRecord},
};
use crate::stores::{ProfileLookup, ProfileRegistry};

impl StoredRecord for KycProfile {}

const DUPLICATE_PAN: &str = "Profile with this PAN already exists.";
const PROFILE_NOT_FOUND: &str = "Profile not found.";

/// KYC profiles persisted as one JSON array. PAN is unique across the file.
#[derive(Clone)]
pub struct ProfileStore {
    store: Arc<JsonArrayStore<KycProfile>>,
}

impl ProfileStore {
    /// Bind the registry to a file; a missing file is an empty registry.
    pub async fn new<P: Into<std::path::PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let store = JsonArrayStore::new("kyc_profiles", path).await?;
        Ok(Arc::new(Self { store }))
    }

    pub async fn create(&self, input: KycProfileInput) -> Result<KycProfile, ServiceError> {
        input.validate()?;
        let created = self
            .store
            .mutate(|records| {
                if records.iter().any(|p| p.pan() == input.pan) {
                    return Err(ServiceError::DuplicateKey(DUPLICATE_PAN.into()));
                }
                let kyc_id = KYC_ID.next(records.iter().map(|p| p.kyc_id.as_str()));
                let profile = input.into_profile(kyc_id);
                records.push(profile.clone());
                Ok(profile)
            })
            .await?;
        info!(kyc_id = %created.kyc_id, "profile created");
        Ok(created)
    }

    pub async fn list(&self) -> Result<Vec<KycProfile>, ServiceError> {
        self.store.load().await
    }

    /// Profiles matching the lookup; none is `NotFound`.
    pub async fn find(&self, lookup: &ProfileLookup) -> Result<Vec<KycProfile>, ServiceError> {
        let found: Vec<KycProfile> = self
            .store
            .load()
            .await?
            .into_iter()
            .filter(|p| lookup.matches(p))
            .collect();
        if found.is_empty() {
            return Err(ServiceError::not_found(PROFILE_NOT_FOUND));
        }
        Ok(found)
    }

    /// Replace every submitted field of the profile at `(phone, kyc_id)`; `KYC_ID` is kept.
    pub async fn update(&self, phone: &str, kyc_id: &str, input: KycProfileInput) -> Result<KycProfile, ServiceError> {
        input.validate()?;
        let updated = self
            .store
            .mutate(|records| {
                let idx = records
                    .iter()
                    .position(|p| p.matches_key(phone, kyc_id))
                    .ok_or_else(|| ServiceError::not_found(PROFILE_NOT_FOUND))?;
                let clash = records
                    .iter()
                    .enumerate()
                    .any(|(i, p)| i != idx && p.pan() == input.pan);
                if clash {
                    return Err(ServiceError::DuplicateKey(DUPLICATE_PAN.into()));
                }
                let kept_id = records[idx].kyc_id.clone();
                records[idx] = input.into_profile(kept_id);
                Ok(records[idx].clone())
            })
            .await?;
        info!(kyc_id = %updated.kyc_id, "profile updated");
        Ok(updated)
    }

    pub async fn delete(&self, phone: &str, kyc_id: &str) -> Result<String, ServiceError> {
        self.store
            .mutate(|records| {
                let before = records.len();
                records.retain(|p| !p.matches_key(phone, kyc_id));
                if records.len() == before {
                    return Err(ServiceError::not_found(PROFILE_NOT_FOUND));
                }
                Ok(())
            })
            .await?;
        info!(%kyc_id, "profile deleted");
        Ok(kyc_id.to_string())
    }
}

#[async_trait::async_trait]
impl ProfileRegistry for ProfileStore {
    async fn create(&self, input: KycProfileInput) -> Result<KycProfile, ServiceError> { self.create(input).await }
    async fn list(&self) -> Result<Vec<KycProfile>, ServiceError> { self.list().await }
    async fn find(&self, lookup: &ProfileLookup) -> Result<Vec<KycProfile>, ServiceError> { self.find(lookup).await }
    async fn update(&self, phone: &str, kyc_id: &str, input: KycProfileInput) -> Result<KycProfile, ServiceError> { self.update(phone, kyc_id, input).await }
    async fn delete(&self, phone: &str, kyc_id: &str) -> Result<String, ServiceError> { self.delete(phone, kyc_id).await }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn input(pan: &str, phone: &str) -> KycProfileInput {
        KycProfileInput {
            prefix: "Ms".into(),
            first_name: "Asha".into(),
            last_name: "Rao".into(),
            full_name: None,
            gender: "F".into(),
            dob: "1988-07-21".into(),
            pan: pan.into(),
            address: "4 Residency Road, Bengaluru".into(),
            perm_pin: "560025".into(),
            mob_code: "+91".into(),
            mob_num: phone.into(),
            email_id: "asha@example.com".into(),
        }
    }

    async fn setup_store() -> Result<(Arc<ProfileStore>, std::path::PathBuf), ServiceError> {
        let tmp = std::env::temp_dir().join(format!("kyc_profiles_{}.json", Uuid::new_v4()));
        Ok((ProfileStore::new(&tmp).await?, tmp))
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids_and_full_name() -> Result<(), anyhow::Error> {
        let (store, tmp) = setup_store().await?;
        let a = store.create(input("AAAAA1111A", "9000000001")).await?;
        let b = store.create(input("BBBBB2222B", "9000000002")).await?;
        assert_eq!(a.kyc_id, "KYC0001");
        assert_eq!(b.kyc_id, "KYC0002");
        assert_eq!(a.details.full_name.as_deref(), Some("Ms Asha Rao"));
        assert_eq!(store.list().await?.len(), 2);
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_pan_rejected_and_store_unchanged() -> Result<(), anyhow::Error> {
        let (store, tmp) = setup_store().await?;
        store.create(input("AAAAA1111A", "9000000001")).await?;
        let before = store.list().await?;

        let res = store.create(input("AAAAA1111A", "9000000099")).await;
        assert!(matches!(res, Err(ServiceError::DuplicateKey(_))));
        assert_eq!(store.list().await?, before);
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn find_by_supported_lookups() -> Result<(), anyhow::Error> {
        let (store, tmp) = setup_store().await?;
        store.create(input("AAAAA1111A", "9000000001")).await?;
        store.create(input("BBBBB2222B", "9000000001")).await?;

        let by_phone = store.find(&ProfileLookup::Phone("9000000001".into())).await?;
        assert_eq!(by_phone.len(), 2);

        let by_pan_dob = store
            .find(&ProfileLookup::PanAndDob { pan: "BBBBB2222B".into(), dob: "1988-07-21".into() })
            .await?;
        assert_eq!(by_pan_dob.len(), 1);
        assert_eq!(by_pan_dob[0].kyc_id, "KYC0002");

        let miss = store
            .find(&ProfileLookup::PhoneAndPan { phone: "9000000002".into(), pan: "AAAAA1111A".into() })
            .await;
        assert!(matches!(miss, Err(ServiceError::NotFound(_))));
        assert!(matches!(store.find(&ProfileLookup::Unsupported).await, Err(ServiceError::NotFound(_))));
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn update_keeps_id_and_guards_pan() -> Result<(), anyhow::Error> {
        let (store, tmp) = setup_store().await?;
        let a = store.create(input("AAAAA1111A", "9000000001")).await?;
        store.create(input("BBBBB2222B", "9000000002")).await?;

        let mut changed = input("AAAAA1111A", "9000000001");
        changed.address = "New address".into();
        changed.full_name = Some("Asha R.".into());
        let updated = store.update("9000000001", &a.kyc_id, changed).await?;
        assert_eq!(updated.kyc_id, a.kyc_id);
        assert_eq!(updated.details.address, "New address");
        assert_eq!(updated.details.full_name.as_deref(), Some("Asha R."));

        let clash = store.update("9000000001", &a.kyc_id, input("BBBBB2222B", "9000000001")).await;
        assert!(matches!(clash, Err(ServiceError::DuplicateKey(_))));

        let missing = store.update("9000000002", &a.kyc_id, input("CCCCC3333C", "9000000002")).await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn delete_by_composite_key() -> Result<(), anyhow::Error> {
        let (store, tmp) = setup_store().await?;
        let a = store.create(input("AAAAA1111A", "9000000001")).await?;
        let b = store.create(input("BBBBB2222B", "9000000002")).await?;

        assert!(matches!(store.delete("9000000002", &a.kyc_id).await, Err(ServiceError::NotFound(_))));
        assert_eq!(store.delete("9000000001", &a.kyc_id).await?, a.kyc_id);

        let left = store.list().await?;
        assert_eq!(left, vec![b]);

        // ids are not reused after deletion of the lower one
        let c = store.create(input("CCCCC3333C", "9000000003")).await?;
        assert_eq!(c.kyc_id, "KYC0003");
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
