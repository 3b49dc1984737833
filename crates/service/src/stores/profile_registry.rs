use async_trait::async_trait;
use models::{KycProfile, KycProfileInput};
use serde::Deserialize;

use crate::errors::ServiceError;
use crate::stores::present;

/// Trait abstraction for KYC profile storage.
#[async_trait]
pub trait ProfileRegistry: Send + Sync {
    async fn create(&self, input: KycProfileInput) -> Result<KycProfile, ServiceError>;
    async fn list(&self) -> Result<Vec<KycProfile>, ServiceError>;
    async fn find(&self, lookup: &ProfileLookup) -> Result<Vec<KycProfile>, ServiceError>;
    async fn update(&self, phone: &str, kyc_id: &str, input: KycProfileInput) -> Result<KycProfile, ServiceError>;
    /// Returns the id of the removed profile.
    async fn delete(&self, phone: &str, kyc_id: &str) -> Result<String, ServiceError>;
}

/// Raw `GET /profile` query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileQuery {
    pub phone: Option<String>,
    pub dob: Option<String>,
    pub pan: Option<String>,
}

/// The parameter combinations a profile lookup understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileLookup {
    Phone(String),
    PanAndDob { pan: String, dob: String },
    PhoneAndPan { phone: String, pan: String },
    /// Any other combination; matches nothing.
    Unsupported,
}

impl ProfileQuery {
    pub fn lookup(&self) -> ProfileLookup {
        match (present(&self.phone), present(&self.pan), present(&self.dob)) {
            (Some(phone), None, None) => ProfileLookup::Phone(phone.to_string()),
            (None, Some(pan), Some(dob)) => ProfileLookup::PanAndDob { pan: pan.to_string(), dob: dob.to_string() },
            (Some(phone), Some(pan), None) => ProfileLookup::PhoneAndPan { phone: phone.to_string(), pan: pan.to_string() },
            _ => ProfileLookup::Unsupported,
        }
    }
}

impl ProfileLookup {
    pub fn matches(&self, profile: &KycProfile) -> bool {
        match self {
            Self::Phone(phone) => profile.phone() == phone,
            Self::PanAndDob { pan, dob } => profile.pan() == pan && profile.dob() == dob,
            Self::PhoneAndPan { phone, pan } => profile.pan() == pan && profile.phone() == phone,
            Self::Unsupported => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(phone: Option<&str>, dob: Option<&str>, pan: Option<&str>) -> ProfileQuery {
        ProfileQuery {
            phone: phone.map(Into::into),
            dob: dob.map(Into::into),
            pan: pan.map(Into::into),
        }
    }

    #[test]
    fn supported_combinations() {
        assert_eq!(q(Some("98"), None, None).lookup(), ProfileLookup::Phone("98".into()));
        assert_eq!(
            q(None, Some("1990-01-01"), Some("P1")).lookup(),
            ProfileLookup::PanAndDob { pan: "P1".into(), dob: "1990-01-01".into() }
        );
        assert_eq!(
            q(Some("98"), None, Some("P1")).lookup(),
            ProfileLookup::PhoneAndPan { phone: "98".into(), pan: "P1".into() }
        );
    }

    #[test]
    fn other_combinations_unsupported() {
        assert_eq!(q(None, None, None).lookup(), ProfileLookup::Unsupported);
        assert_eq!(q(None, None, Some("P1")).lookup(), ProfileLookup::Unsupported);
        assert_eq!(q(None, Some("1990-01-01"), None).lookup(), ProfileLookup::Unsupported);
        assert_eq!(q(Some("98"), Some("1990-01-01"), None).lookup(), ProfileLookup::Unsupported);
        assert_eq!(q(Some("98"), Some("1990-01-01"), Some("P1")).lookup(), ProfileLookup::Unsupported);
    }

    #[test]
    fn empty_values_count_as_absent() {
        assert_eq!(q(Some("98"), Some(""), Some("")).lookup(), ProfileLookup::Phone("98".into()));
    }
}
