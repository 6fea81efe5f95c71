use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Dokument tak, jak ho vracíme klientům: opaque JSON payload plus
/// identita přidělená Elasticsearchem. Schéma se nevynucuje.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_version", skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    #[serde(rename = "_source")]
    pub source: Value,
}

impl DocumentRecord {
    /// Vytáhne dokument z odpovědi `GET /{index}/_doc/{id}`.
    pub fn from_get_response(response: &Value) -> Self {
        Self {
            index: response["_index"].as_str().unwrap_or("").to_string(),
            id: response["_id"].as_str().unwrap_or("").to_string(),
            version: response["_version"].as_u64(),
            source: response["_source"].clone(),
        }
    }
}

/// Refresh parametr mutujících dokumentových operací:
/// `true`, `false` nebo `"wait_for"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RefreshMode {
    Flag(bool),
    Policy(String),
}

impl RefreshMode {
    /// Hodnota pro query parametr `?refresh=`.
    pub fn as_param(&self) -> String {
        match self {
            RefreshMode::Flag(true) => "true".to_string(),
            RefreshMode::Flag(false) => "false".to_string(),
            RefreshMode::Policy(policy) => policy.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_from_get_response() {
        let response = json!({
            "_index": "products",
            "_id": "42",
            "_version": 3,
            "_seq_no": 7,
            "found": true,
            "_source": {"name": "widget", "price": 9.99}
        });

        let doc = DocumentRecord::from_get_response(&response);
        assert_eq!(doc.index, "products");
        assert_eq!(doc.id, "42");
        assert_eq!(doc.version, Some(3));
        assert_eq!(doc.source, json!({"name": "widget", "price": 9.99}));
    }

    #[test]
    fn test_document_wire_names() {
        let doc = DocumentRecord {
            index: "products".to_string(),
            id: "42".to_string(),
            version: None,
            source: json!({"name": "widget"}),
        };

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["_index"], "products");
        assert_eq!(value["_id"], "42");
        assert!(value.get("_version").is_none());
    }

    #[test]
    fn test_refresh_mode_parsing() {
        let flag: RefreshMode = serde_json::from_value(json!(true)).unwrap();
        assert_eq!(flag.as_param(), "true");

        let policy: RefreshMode = serde_json::from_value(json!("wait_for")).unwrap();
        assert_eq!(policy.as_param(), "wait_for");
    }
}
