use serde_json::{json, Map, Value};

use super::client::{EsClient, EsError};
use crate::models::{ClusterHealth, DocumentRecord, IndexSummary, RefreshMode};

/// Sloupce pro cat indices - stejná sada, jakou čte frontend tabulka indexů.
const CAT_INDICES_COLUMNS: &str =
    "health,status,index,uuid,pri,rep,docs.count,docs.deleted,store.size,pri.store.size";

/// Parametry pro `POST /api/documents/search` přeložené na search body.
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub index: String,
    pub query: Option<Value>,
    pub from: Option<u64>,
    pub size: Option<u64>,
    pub sort: Option<Value>,
}

impl SearchParams {
    /// Sestaví tělo requestu s defaulty: match_all, from 0, size 10.
    pub fn to_body(&self) -> Value {
        let mut body = Map::new();
        body.insert(
            "query".to_string(),
            self.query.clone().unwrap_or_else(|| json!({"match_all": {}})),
        );
        body.insert("from".to_string(), json!(self.from.unwrap_or(0)));
        body.insert("size".to_string(), json!(self.size.unwrap_or(10)));
        if let Some(sort) = &self.sort {
            body.insert("sort".to_string(), sort.clone());
        }
        Value::Object(body)
    }
}

/// Aktualizace dokumentu: partial doc nebo script, volitelný refresh.
#[derive(Debug, Clone)]
pub struct UpdateParams {
    pub doc: Option<Value>,
    pub script: Option<Value>,
    pub refresh: Option<RefreshMode>,
}

impl EsClient {
    /// Získá cluster health
    pub async fn cluster_health(&self) -> Result<ClusterHealth, EsError> {
        self.get("/_cluster/health").await
    }

    /// Získá cluster stats (passthrough)
    pub async fn cluster_stats(&self) -> Result<Value, EsError> {
        self.get("/_cluster/stats").await
    }

    /// Získá stats všech nodů (passthrough, mapa node id -> stats)
    pub async fn nodes_stats(&self) -> Result<Value, EsError> {
        self.get("/_nodes/stats").await
    }

    /// Získá seznam indexů (cat API)
    pub async fn cat_indices(&self) -> Result<Vec<IndexSummary>, EsError> {
        let path = format!("/_cat/indices?format=json&h={}", CAT_INDICES_COLUMNS);
        self.get(&path).await
    }

    /// Získá detailní info o indexu (settings, mappings, aliases)
    pub async fn get_index(&self, name: &str) -> Result<Value, EsError> {
        let path = format!("/{}", name);
        self.get(&path).await
    }

    /// Vytvoří index; body může nést settings/mappings/aliases
    pub async fn create_index(&self, name: &str, body: Value) -> Result<Value, EsError> {
        let path = format!("/{}", name);
        self.put(&path, body).await
    }

    /// Smaže index
    pub async fn delete_index(&self, name: &str) -> Result<Value, EsError> {
        let path = format!("/{}", name);
        self.delete(&path).await
    }

    /// Zavře index
    pub async fn close_index(&self, name: &str) -> Result<Value, EsError> {
        let path = format!("/{}/_close", name);
        self.post(&path, json!({})).await
    }

    /// Otevře index
    pub async fn open_index(&self, name: &str) -> Result<Value, EsError> {
        let path = format!("/{}/_open", name);
        self.post(&path, json!({})).await
    }

    /// Refreshne index - nově zapsané dokumenty budou viditelné pro search
    pub async fn refresh_index(&self, name: &str) -> Result<Value, EsError> {
        let path = format!("/{}/_refresh", name);
        self.post(&path, json!({})).await
    }

    /// Zjistí zda index existuje
    pub async fn index_exists(&self, name: &str) -> Result<bool, EsError> {
        match self.get::<Value>(&format!("/{}", name)).await {
            Ok(_) => Ok(true),
            Err(EsError::Status { status: 404, .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Počet dokumentů v indexu, volitelně omezený query
    pub async fn count(&self, index: &str, query: Option<Value>) -> Result<u64, EsError> {
        let path = format!("/{}/_count", index);
        let response: Value = match query {
            Some(query) => self.post(&path, json!({ "query": query })).await?,
            None => self.get(&path).await?,
        };
        Ok(response["count"].as_u64().unwrap_or(0))
    }

    /// Search pomocí Query DSL
    pub async fn search(&self, params: &SearchParams) -> Result<Value, EsError> {
        let path = format!("/{}/_search", params.index);
        self.post(&path, params.to_body()).await
    }

    /// Získá jeden dokument podle id
    pub async fn get_document(&self, index: &str, id: &str) -> Result<DocumentRecord, EsError> {
        let path = format!("/{}/_doc/{}", index, id);
        let response: Value = self.get(&path).await?;
        Ok(DocumentRecord::from_get_response(&response))
    }

    /// Upsert dokumentu - s id jde o PUT na konkrétní dokument,
    /// bez id nechá Elasticsearch id vygenerovat
    pub async fn index_document(
        &self,
        index: &str,
        id: Option<&str>,
        document: Value,
        refresh: Option<&RefreshMode>,
    ) -> Result<Value, EsError> {
        let mut path = match id {
            Some(id) => format!("/{}/_doc/{}", index, id),
            None => format!("/{}/_doc", index),
        };
        if let Some(refresh) = refresh {
            path = format!("{}?refresh={}", path, refresh.as_param());
        }

        match id {
            Some(_) => self.put(&path, document).await,
            None => self.post(&path, document).await,
        }
    }

    /// Aktualizuje dokument (partial doc nebo script)
    pub async fn update_document(
        &self,
        index: &str,
        id: &str,
        params: &UpdateParams,
    ) -> Result<Value, EsError> {
        let mut body = Map::new();
        if let Some(doc) = &params.doc {
            body.insert("doc".to_string(), doc.clone());
        }
        if let Some(script) = &params.script {
            body.insert("script".to_string(), script.clone());
        }

        let mut path = format!("/{}/_update/{}", index, id);
        if let Some(refresh) = &params.refresh {
            path = format!("{}?refresh={}", path, refresh.as_param());
        }

        self.post(&path, Value::Object(body)).await
    }

    /// Smaže dokument; refresh se vynucuje, aby smazání bylo hned viditelné
    pub async fn delete_document(
        &self,
        index: &str,
        id: &str,
        refresh: &RefreshMode,
    ) -> Result<Value, EsError> {
        let path = format!("/{}/_doc/{}?refresh={}", index, id, refresh.as_param());
        self.delete(&path).await
    }
}
