use serde::{Deserialize, Serialize};

/// Sentinel for fields whose true value could not be extracted.
pub const UNKNOWN: &str = "Unknown";

/// Sentinel for a missing or empty faction emblem.
pub const NO_FACTION: &str = "None";

/// One parsed marketplace listing. Field order is the CSV column order.
/// Optional fields serialize as empty cells when absent; the string fields
/// carry sentinel defaults instead because the source format treats them as
/// always-present columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub image_url: Option<String>,
    pub name: String,
    pub quantity: String,
    pub duration: String,
    pub seller: String,
    pub faction: String,
    pub price: String,
    pub data_entry: Option<String>,
    pub data_id: Option<String>,
    pub data_name: Option<String>,
    pub data_type: Option<String>,
}

impl Default for ListingRecord {
    fn default() -> Self {
        Self {
            image_url: None,
            name: UNKNOWN.to_string(),
            quantity: UNKNOWN.to_string(),
            duration: UNKNOWN.to_string(),
            seller: UNKNOWN.to_string(),
            faction: NO_FACTION.to_string(),
            price: UNKNOWN.to_string(),
            data_entry: None,
            data_id: None,
            data_name: None,
            data_type: None,
        }
    }
}

impl ListingRecord {
    /// CSV header names, in serialization order.
    pub fn field_names() -> &'static [&'static str] {
        &[
            "image_url",
            "name",
            "quantity",
            "duration",
            "seller",
            "faction",
            "price",
            "data_entry",
            "data_id",
            "data_name",
            "data_type",
        ]
    }
}
