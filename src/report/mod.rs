pub mod catalogue;
pub mod derive;

pub use self::catalogue::{BaseConfig, SharedSettings, TypeCatalogue, TypeDefinition, TypeDetail};
pub use self::derive::{derive_batch, derive_record, primary_type, rank_items};

use serde::{Deserialize, Serialize};

/// Visual thickness per rank tier: first, second, everything else.
pub const THICKNESS_TIERS: [u32; 3] = [30, 20, 10];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricItem {
    pub label: String,
    pub value: f64,
}

impl MetricItem {
    pub fn new(label: &str, value: f64) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedItem {
    pub label: String,
    pub value: f64,
    pub rank: u32,
    pub thickness: u32,
}

/// Both ring groups of one report. Items are stored in rank order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DualRingLayout {
    pub outer: Vec<RankedItem>,
    pub inner: Vec<RankedItem>,
    pub outer_total: f64,
    pub inner_total: f64,
}

pub type TypeScore = MetricItem;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRecord {
    pub name: String,
    pub date: String,
    pub dual_ring: DualRingLayout,
    pub type_scores: Vec<TypeScore>,
    pub primary_type: String,
    /// `None` when the catalogue has no entry for the primary type.
    pub type_detail: Option<TypeDetail>,
}
