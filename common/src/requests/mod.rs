use crate::model::{GuaranteeStatus, GuaranteeType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Payload for creating a guarantee. The store assigns the id and timestamps.
///
/// `currency` and `status` fall back to the home currency and `pending`
/// when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGuarantee {
    pub guarantee_number: String,
    pub guarantee_type: GuaranteeType,
    pub value: f64,
    #[serde(default)]
    pub currency: Option<String>,
    pub issue_date: NaiveDate,
    pub expiry_date: NaiveDate,
    #[serde(default)]
    pub status: Option<GuaranteeStatus>,
    pub bank_name: String,
}

/// Partial update: only the supplied fields change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuaranteeUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guarantee_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guarantee_type: Option<GuaranteeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<GuaranteeStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
}

impl GuaranteeUpdate {
    pub fn is_empty(&self) -> bool {
        *self == GuaranteeUpdate::default()
    }
}

/// Outcome of a bulk CSV import. Individual failures are only counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub success: usize,
    pub errors: usize,
}
