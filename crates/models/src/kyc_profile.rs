use serde::{Deserialize, Serialize};

use crate::errors::{require_non_blank, ModelError};

/// Identity fields a client submits when registering or replacing a profile.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct KycProfileInput {
    #[serde(rename = "PREFIX")]
    pub prefix: String,
    #[serde(rename = "FNAME")]
    pub first_name: String,
    #[serde(rename = "LNAME")]
    pub last_name: String,
    #[serde(rename = "FULLNAME", default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(rename = "GENDER")]
    pub gender: String,
    #[serde(rename = "DOB")]
    pub dob: String,
    #[serde(rename = "PAN")]
    pub pan: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "PERM_PIN")]
    pub perm_pin: String,
    #[serde(rename = "MOB_CODE")]
    pub mob_code: String,
    #[serde(rename = "MOB_NUM")]
    pub mob_num: String,
    #[serde(rename = "EMAIL_ID")]
    pub email_id: String,
}

impl KycProfileInput {
    /// PAN and mobile number address the profile later, so they cannot be blank.
    pub fn validate(&self) -> Result<(), ModelError> {
        require_non_blank("PAN", &self.pan)?;
        require_non_blank("MOB_NUM", &self.mob_num)?;
        Ok(())
    }

    /// `"{PREFIX} {FNAME} {LNAME}"`
    pub fn derived_full_name(&self) -> String {
        format!("{} {} {}", self.prefix, self.first_name, self.last_name)
    }

    /// Attach the generated id, filling `FULLNAME` from the name parts when absent or empty.
    pub fn into_profile(mut self, kyc_id: String) -> KycProfile {
        let missing = self.full_name.as_deref().map_or(true, |n| n.is_empty());
        if missing {
            self.full_name = Some(self.derived_full_name());
        }
        KycProfile { details: self, kyc_id }
    }
}

/// Stored profile: submitted fields plus `KYC_ID`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct KycProfile {
    #[serde(flatten)]
    pub details: KycProfileInput,
    #[serde(rename = "KYC_ID")]
    pub kyc_id: String,
}

impl KycProfile {
    pub fn pan(&self) -> &str {
        &self.details.pan
    }

    pub fn phone(&self) -> &str {
        &self.details.mob_num
    }

    pub fn dob(&self) -> &str {
        &self.details.dob
    }

    pub fn matches_key(&self, phone: &str, kyc_id: &str) -> bool {
        self.phone() == phone && self.kyc_id == kyc_id
    }
}
