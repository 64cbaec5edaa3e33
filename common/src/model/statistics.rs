use crate::model::guarantee::GuaranteeType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate figures computed by the store.
///
/// These are fetched independently of the live list, so the two may
/// briefly disagree after a change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total: u64,
    pub total_value: f64,
    pub active_count: u64,
    pub pending_count: u64,
    pub expired_count: u64,
    /// Record count per guarantee type; types with no records are absent.
    pub type_distribution: BTreeMap<GuaranteeType, u64>,
}
