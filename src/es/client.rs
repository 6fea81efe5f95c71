use base64::Engine;
use reqwest::{Client, Method, RequestBuilder};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::config::Config;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Chyby transportní vrstvy.
///
/// Rozlišuje síťové selhání (upstream nedostupný), ne-2xx odpověď clusteru
/// a nerozparsovatelné tělo odpovědi. Retry se nedělá nikde.
#[derive(Debug, Error)]
pub enum EsError {
    #[error("elasticsearch unreachable: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("elasticsearch error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode elasticsearch response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Přihlašovací údaje k clusteru.
#[derive(Debug, Clone)]
pub enum EsCredentials {
    None,
    Basic { username: String, password: String },
    ApiKey(String),
}

impl EsCredentials {
    /// Odvodí credentials z konfigurace - API key má přednost před basic auth.
    pub fn from_config(config: &Config) -> Self {
        if let Some(key) = &config.api_key {
            return Self::ApiKey(key.clone());
        }
        match (&config.username, &config.password) {
            (Some(username), Some(password)) => Self::Basic {
                username: username.clone(),
                password: password.clone(),
            },
            _ => Self::None,
        }
    }
}

/// Zakóduje API key do tvaru pro Authorization hlavičku.
///
/// Elasticsearch očekává `ApiKey base64(id:secret)`. Hodnota z prostředí
/// může být buď už zakódovaná, nebo surový pár `id:secret`.
fn encode_api_key(key: &str) -> String {
    if key.contains(':') {
        base64::engine::general_purpose::STANDARD.encode(key)
    } else {
        key.to_string()
    }
}

#[derive(Debug, Deserialize)]
struct RootResponse {
    cluster_name: String,
    version: VersionInfo,
}

#[derive(Debug, Deserialize)]
struct VersionInfo {
    number: String,
}

/// Informace o clusteru z root endpointu.
#[derive(Debug, Clone)]
pub struct ClusterInfo {
    pub cluster_name: String,
    pub version: String,
}

#[derive(Debug, Clone)]
pub struct EsClient {
    base_url: String,
    client: Client,
    credentials: EsCredentials,
}

impl EsClient {
    pub fn new(base_url: &str, insecure: bool, credentials: EsCredentials) -> Result<Self, EsError> {
        // Ořízni trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(insecure)
            .build()
            .map_err(EsError::Transport)?;

        Ok(Self {
            base_url,
            client,
            credentials,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, EsError> {
        Self::new(
            &config.es_url,
            config.insecure,
            EsCredentials::from_config(config),
        )
    }

    /// Ověří dostupnost clusteru a vrátí jeho jméno a verzi.
    pub async fn ping(&self) -> Result<ClusterInfo, EsError> {
        let root: RootResponse = self.get("").await?;
        Ok(ClusterInfo {
            cluster_name: root.cluster_name,
            version: root.version.number,
        })
    }

    /// Univerzální GET request
    pub async fn get<T>(&self, path: &str) -> Result<T, EsError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .request(Method::GET, path)
            .send()
            .await
            .map_err(EsError::Transport)?;

        Self::handle_response(response).await
    }

    /// Univerzální POST request
    pub async fn post<T>(&self, path: &str, body: Value) -> Result<T, EsError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .request(Method::POST, path)
            .json(&body)
            .send()
            .await
            .map_err(EsError::Transport)?;

        Self::handle_response(response).await
    }

    /// Univerzální PUT request
    pub async fn put<T>(&self, path: &str, body: Value) -> Result<T, EsError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .request(Method::PUT, path)
            .json(&body)
            .send()
            .await
            .map_err(EsError::Transport)?;

        Self::handle_response(response).await
    }

    /// Univerzální DELETE request
    pub async fn delete<T>(&self, path: &str) -> Result<T, EsError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .request(Method::DELETE, path)
            .send()
            .await
            .map_err(EsError::Transport)?;

        Self::handle_response(response).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let request = self.client.request(method, &url);

        match &self.credentials {
            EsCredentials::None => request,
            EsCredentials::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
            EsCredentials::ApiKey(key) => {
                request.header("Authorization", format!("ApiKey {}", encode_api_key(key)))
            }
        }
    }

    async fn handle_response<T>(response: reqwest::Response) -> Result<T, EsError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error response".to_string());
            return Err(EsError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response.json::<T>().await.map_err(EsError::Decode)
    }

    #[allow(dead_code)]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_passthrough() {
        // Už zakódovaný klíč se nechává tak jak je
        assert_eq!(encode_api_key("VnVhQ2ZHY0JDZGJrU"), "VnVhQ2ZHY0JDZGJrU");
    }

    #[test]
    fn test_api_key_pair_encoding() {
        let encoded = encode_api_key("my-id:my-secret");
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(&encoded)
            .unwrap();
        assert_eq!(decoded, b"my-id:my-secret");
    }

    #[test]
    fn test_base_url_trimmed() {
        let client = EsClient::new("http://localhost:9200/", false, EsCredentials::None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9200");
    }

    #[test]
    fn test_credentials_precedence() {
        let config = Config {
            es_url: "http://localhost:9200".to_string(),
            username: Some("elastic".to_string()),
            password: Some("changeme".to_string()),
            api_key: Some("abc123".to_string()),
            insecure: false,
            proxy_url: None,
        };

        // API key vyhrává nad basic auth
        match EsCredentials::from_config(&config) {
            EsCredentials::ApiKey(key) => assert_eq!(key, "abc123"),
            other => panic!("expected api key credentials, got {:?}", other),
        }
    }
}
