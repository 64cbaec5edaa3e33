use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A bank guarantee as held by the store.
///
/// `id`, `created_at` and `updated_at` are assigned by the store; the client
/// never fabricates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuaranteeRecord {
    pub id: String, // UUID
    pub guarantee_number: String,
    pub guarantee_type: GuaranteeType,
    pub value: f64,
    pub currency: String,
    pub issue_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub status: GuaranteeStatus,
    pub bank_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The closed set of guarantee categories.
///
/// Serialized as a lowercase slug; shown to users through [`GuaranteeType::label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuaranteeType {
    Performance,
    Initial,
    Final,
    Maintenance,
}

impl GuaranteeType {
    pub const ALL: [GuaranteeType; 4] = [
        GuaranteeType::Performance,
        GuaranteeType::Initial,
        GuaranteeType::Final,
        GuaranteeType::Maintenance,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            GuaranteeType::Performance => "performance",
            GuaranteeType::Initial => "initial",
            GuaranteeType::Final => "final",
            GuaranteeType::Maintenance => "maintenance",
        }
    }

    /// Display label in the dashboard language.
    pub fn label(self) -> &'static str {
        match self {
            GuaranteeType::Performance => "ضمان أداء",
            GuaranteeType::Initial => "ضمان ابتدائي",
            GuaranteeType::Final => "ضمان نهائي",
            GuaranteeType::Maintenance => "ضمان صيانة",
        }
    }

    /// Resolves either a display label or a slug (case-insensitive).
    pub fn from_label(text: &str) -> Option<Self> {
        let text = text.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.label() == text || t.slug().eq_ignore_ascii_case(text))
    }
}

impl fmt::Display for GuaranteeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for GuaranteeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| format!("unknown guarantee type '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuaranteeStatus {
    Active,
    #[default]
    Pending,
    Expired,
}

impl GuaranteeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            GuaranteeStatus::Active => "active",
            GuaranteeStatus::Pending => "pending",
            GuaranteeStatus::Expired => "expired",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GuaranteeStatus::Active => "نشط",
            GuaranteeStatus::Pending => "قيد المراجعة",
            GuaranteeStatus::Expired => "منتهي الصلاحية",
        }
    }
}

impl fmt::Display for GuaranteeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GuaranteeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(GuaranteeStatus::Active),
            "pending" => Ok(GuaranteeStatus::Pending),
            "expired" => Ok(GuaranteeStatus::Expired),
            other => Err(format!("unknown guarantee status '{}'", other)),
        }
    }
}
