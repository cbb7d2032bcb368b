//! Worker registration record and the registration payload it is built from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppError, Result};

/// Verification status of a registered worker.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum WorkerStatus {
    /// Awaiting administrative verification.
    Pending,
    /// Verified; the default for new registrations.
    #[default]
    Verified,
}

impl WorkerStatus {
    /// Storage representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Verified => "Verified",
        }
    }

    /// Parse the storage representation.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` for an unknown status string.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Verified" => Ok(Self::Verified),
            other => Err(AppError::Db(format!("invalid worker status: {other}"))),
        }
    }
}

/// Free-text applicant details. Every field is optional; absent means
/// "unknown" and renders as a placeholder.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkerProfile {
    /// Job designation.
    pub designation: Option<String>,
    /// Applicant full name.
    pub name: Option<String>,
    /// Father's or husband's name.
    pub fh_name: Option<String>,
    /// Date of birth as entered.
    pub dob: Option<String>,
    /// Gender.
    pub sex: Option<String>,
    /// Blood group.
    pub blood_group: Option<String>,
    /// Social category.
    pub category: Option<String>,
    /// Marital status.
    pub marital_status: Option<String>,
    /// Contact number.
    pub mobile_no: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Address for correspondence.
    pub communication_address: Option<String>,
    /// Permanent address.
    pub address: Option<String>,
    /// Highest qualification.
    pub education: Option<String>,
    /// Aadhaar number.
    pub aadhaar_no: Option<String>,
    /// PAN card number.
    pub pan_no: Option<String>,
    /// e-Shram card number.
    pub eshram_no: Option<String>,
    /// Bank account holder name.
    pub acc_name: Option<String>,
    /// Bank account number.
    pub acc_no: Option<String>,
    /// IFSC code.
    pub ifsc: Option<String>,
    /// Bank name.
    pub bank_name: Option<String>,
    /// Railway division. Stored, never printed.
    pub division: Option<String>,
    /// Goods shed. Stored, never printed.
    pub shed: Option<String>,
}

/// A registered worker.
///
/// `form_no` is assigned once at creation and never changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkerRecord {
    /// Opaque record identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Human-facing form number, `SGWC/<ZONE>/<NNNNNN>`.
    pub form_no: String,
    /// Operator who submitted the registration.
    pub admin_id: String,
    /// Operator-supplied zone code as submitted.
    pub zone: Option<String>,
    /// Verification status.
    pub status: WorkerStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Stored applicant photo.
    pub photo_url: Option<String>,
    /// Stored scan of the signed paper form.
    pub scan_link: Option<String>,
    /// Applicant details.
    #[serde(flatten)]
    pub profile: WorkerProfile,
}

/// Registration request body.
///
/// Mirrors the flat shape the registration form submits. Unknown fields
/// are rejected instead of being persisted.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Registration {
    /// Submitting operator; required.
    #[serde(default)]
    pub admin_id: String,
    /// Zone code.
    pub zone: Option<String>,
    /// Already-stored applicant photo.
    pub photo_url: Option<String>,
    /// See [`WorkerProfile::designation`].
    pub designation: Option<String>,
    /// See [`WorkerProfile::name`].
    pub name: Option<String>,
    /// See [`WorkerProfile::fh_name`].
    pub fh_name: Option<String>,
    /// See [`WorkerProfile::dob`].
    pub dob: Option<String>,
    /// See [`WorkerProfile::sex`].
    pub sex: Option<String>,
    /// See [`WorkerProfile::blood_group`].
    pub blood_group: Option<String>,
    /// See [`WorkerProfile::category`].
    pub category: Option<String>,
    /// See [`WorkerProfile::marital_status`].
    pub marital_status: Option<String>,
    /// See [`WorkerProfile::mobile_no`].
    pub mobile_no: Option<String>,
    /// See [`WorkerProfile::email`].
    pub email: Option<String>,
    /// See [`WorkerProfile::communication_address`].
    pub communication_address: Option<String>,
    /// See [`WorkerProfile::address`].
    pub address: Option<String>,
    /// See [`WorkerProfile::education`].
    pub education: Option<String>,
    /// See [`WorkerProfile::aadhaar_no`].
    pub aadhaar_no: Option<String>,
    /// See [`WorkerProfile::pan_no`].
    pub pan_no: Option<String>,
    /// See [`WorkerProfile::eshram_no`].
    pub eshram_no: Option<String>,
    /// See [`WorkerProfile::acc_name`].
    pub acc_name: Option<String>,
    /// See [`WorkerProfile::acc_no`].
    pub acc_no: Option<String>,
    /// See [`WorkerProfile::ifsc`].
    pub ifsc: Option<String>,
    /// See [`WorkerProfile::bank_name`].
    pub bank_name: Option<String>,
    /// See [`WorkerProfile::division`].
    pub division: Option<String>,
    /// See [`WorkerProfile::shed`].
    pub shed: Option<String>,
}

/// Longest zone code accepted in a form number.
pub const MAX_ZONE_LEN: usize = 16;

impl Registration {
    /// Check the fields that must be present before a form number is spent.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` when `adminId` is missing or the zone
    /// is not a short code of ASCII letters, digits, and `-`.
    pub fn validate(&self) -> Result<()> {
        if self.admin_id.trim().is_empty() {
            return Err(AppError::Validation("adminId is required".into()));
        }
        if let Some(zone) = self.zone.as_deref().map(str::trim) {
            let valid = zone.len() <= MAX_ZONE_LEN
                && zone.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
            if !valid {
                return Err(AppError::Validation(format!(
                    "zone must be at most {MAX_ZONE_LEN} ASCII letters, digits or '-'"
                )));
            }
        }
        Ok(())
    }

    /// Build the persisted record for an allocated form number.
    #[must_use]
    pub fn into_record(self, form_no: String) -> WorkerRecord {
        WorkerRecord {
            id: Uuid::new_v4().to_string(),
            form_no,
            admin_id: self.admin_id.trim().to_owned(),
            zone: clean(self.zone),
            status: WorkerStatus::default(),
            created_at: Utc::now(),
            photo_url: clean(self.photo_url),
            scan_link: None,
            profile: WorkerProfile {
                designation: clean(self.designation),
                name: clean(self.name),
                fh_name: clean(self.fh_name),
                dob: clean(self.dob),
                sex: clean(self.sex),
                blood_group: clean(self.blood_group),
                category: clean(self.category),
                marital_status: clean(self.marital_status),
                mobile_no: clean(self.mobile_no),
                email: clean(self.email),
                communication_address: clean(self.communication_address),
                address: clean(self.address),
                education: clean(self.education),
                aadhaar_no: clean(self.aadhaar_no),
                pan_no: clean(self.pan_no),
                eshram_no: clean(self.eshram_no),
                acc_name: clean(self.acc_name),
                acc_no: clean(self.acc_no),
                ifsc: clean(self.ifsc),
                bank_name: clean(self.bank_name),
                division: clean(self.division),
                shed: clean(self.shed),
            },
        }
    }
}

/// Trim a submitted value; blank input counts as absent.
fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
