use std::env;

const DEFAULT_ES_URL: &str = "http://localhost:9200";

/// Konfigurace připojení, načtená jednou při startu procesu.
///
/// Po startu je neměnná - transport klient z ní postavený se sdílí
/// přes `Arc` a za běhu se nerekonfiguruje.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL Elasticsearch clusteru
    pub es_url: String,
    /// Basic auth přihlašovací údaje
    pub username: Option<String>,
    pub password: Option<String>,
    /// API key - má přednost před basic auth
    pub api_key: Option<String>,
    /// Vypnout ověřování TLS certifikátu
    pub insecure: bool,
    /// Base URL upstream proxy (indices-placement, cluster-status)
    pub proxy_url: Option<String>,
}

impl Config {
    /// Načte konfiguraci z proměnných prostředí.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let es_url = get("ELASTICSEARCH_URL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_ES_URL.to_string());

        // "false" vypíná ověřování certifikátu, cokoliv jiného ho nechává zapnuté
        let insecure = get("ELASTICSEARCH_TLS_REJECT_UNAUTHORIZED")
            .map(|v| v == "false")
            .unwrap_or(false);

        Self {
            es_url,
            username: get("ELASTICSEARCH_USERNAME").filter(|v| !v.is_empty()),
            password: get("ELASTICSEARCH_PASSWORD").filter(|v| !v.is_empty()),
            api_key: get("ELASTICSEARCH_API_KEY").filter(|v| !v.is_empty()),
            insecure,
            proxy_url: get("CLUSTER_API_URL").filter(|v| !v.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(move |key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config_from(&[]);
        assert_eq!(cfg.es_url, "http://localhost:9200");
        assert!(cfg.username.is_none());
        assert!(cfg.api_key.is_none());
        assert!(!cfg.insecure);
        assert!(cfg.proxy_url.is_none());
    }

    #[test]
    fn test_tls_toggle() {
        let cfg = config_from(&[("ELASTICSEARCH_TLS_REJECT_UNAUTHORIZED", "false")]);
        assert!(cfg.insecure);

        let cfg = config_from(&[("ELASTICSEARCH_TLS_REJECT_UNAUTHORIZED", "true")]);
        assert!(!cfg.insecure);
    }

    #[test]
    fn test_empty_values_ignored() {
        let cfg = config_from(&[("ELASTICSEARCH_URL", ""), ("ELASTICSEARCH_USERNAME", "")]);
        assert_eq!(cfg.es_url, "http://localhost:9200");
        assert!(cfg.username.is_none());
    }

    #[test]
    fn test_full_config() {
        let cfg = config_from(&[
            ("ELASTICSEARCH_URL", "https://es.internal:9200"),
            ("ELASTICSEARCH_USERNAME", "elastic"),
            ("ELASTICSEARCH_PASSWORD", "changeme"),
            ("CLUSTER_API_URL", "http://proxy.internal:8000"),
        ]);
        assert_eq!(cfg.es_url, "https://es.internal:9200");
        assert_eq!(cfg.username.as_deref(), Some("elastic"));
        assert_eq!(cfg.password.as_deref(), Some("changeme"));
        assert_eq!(cfg.proxy_url.as_deref(), Some("http://proxy.internal:8000"));
    }
}
