use serde::{Deserialize, Serialize};

/// Jeden řádek z `GET /_cat/indices?format=json`.
///
/// Cat API vrací hodnoty jako stringy a u zavřených indexů může
/// docs.count/store.size úplně chybět.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSummary {
    pub health: Option<String>, // green, yellow, red; null u zavřeného indexu
    pub status: String,         // open, close
    pub index: String,
    pub uuid: String,
    pub pri: String,
    pub rep: String,
    #[serde(rename = "docs.count")]
    pub docs_count: Option<String>,
    #[serde(rename = "docs.deleted")]
    pub docs_deleted: Option<String>,
    #[serde(rename = "store.size")]
    pub store_size: Option<String>,
    #[serde(rename = "pri.store.size")]
    pub pri_store_size: Option<String>,
}
