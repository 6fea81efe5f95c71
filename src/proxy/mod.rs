use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::placement::IndicesPlacementData;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Chyby upstream proxy.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("cluster proxy unreachable: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("cluster proxy error ({code}): {message}")]
    Upstream { code: String, message: String },

    #[error("failed to decode cluster proxy response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Wire obálka proxy: `{code, message, data}`.
///
/// Překlad na `Result` se děje jen tady na hranici - dál už teče
/// kanonický result typ, obálka proxy se nikam nepropaguje.
#[derive(Debug, Deserialize)]
struct ProxyEnvelope<T> {
    code: String,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

impl<T> ProxyEnvelope<T> {
    fn into_result(self) -> Result<T, ProxyError> {
        match self.data {
            Some(data) if self.code == "200" => Ok(data),
            _ => Err(ProxyError::Upstream {
                code: self.code,
                message: if self.message.is_empty() {
                    "cluster proxy request failed".to_string()
                } else {
                    self.message
                },
            }),
        }
    }
}

/// Klient upstream proxy API (`CLUSTER_API_URL`).
#[derive(Debug, Clone)]
pub struct ProxyClient {
    base_url: String,
    client: Client,
}

impl ProxyClient {
    pub fn new(base_url: &str) -> Result<Self, ProxyError> {
        let base_url = base_url.trim_end_matches('/').to_string();

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ProxyError::Transport)?;

        Ok(Self { base_url, client })
    }

    async fn get_enveloped<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ProxyError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(ProxyError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProxyError::Upstream {
                code: status.as_u16().to_string(),
                message: format!("cluster proxy returned {}", status),
            });
        }

        let envelope: ProxyEnvelope<T> = response.json().await.map_err(ProxyError::Decode)?;
        envelope.into_result()
    }

    /// Získá rozmístění shardů přes proxy.
    pub async fn indices_placement(
        &self,
        include_hidden_index: bool,
        include_closed_index: bool,
    ) -> Result<IndicesPlacementData, ProxyError> {
        self.get_enveloped(
            "/app/indices/indices-placement",
            &[
                ("include_hidden_index", include_hidden_index.to_string()),
                ("include_closed_index", include_closed_index.to_string()),
            ],
        )
        .await
    }

    /// Stav clusteru z proxy (passthrough)
    pub async fn cluster_status(&self) -> Result<Value, ProxyError> {
        self.get_enveloped("/app/cluster/cluster-status", &[]).await
    }

    /// Stav nodů z proxy (passthrough)
    pub async fn node_status(&self) -> Result<Value, ProxyError> {
        self.get_enveloped("/app/cluster/node-status", &[]).await
    }
}
