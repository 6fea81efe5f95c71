use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::models::ClusterHealth;

/// Joinovaný pohled na cluster z jednoho refreshe.
///
/// Immutable per fetch - každý poll ho celý nahradí, nikdy se nemerguje
/// se starším stavem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterSnapshot {
    pub health: ClusterHealth,
    pub nodes: Vec<NodeSnapshot>,
    pub refreshed_at: DateTime<Utc>,
}

/// Normalizované zdroje jednoho nodu.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSnapshot {
    pub id: String,
    pub name: String,
    pub host: String,
    pub roles: Vec<String>,
    /// Odvozené z rolí - nodes.stats nehlásí zvoleného mastera
    pub master_eligible: bool,
    pub cpu_percent: Option<u8>,
    pub ram_percent: Option<u8>,
    pub heap_percent: Option<u8>,
    pub disk_percent: Option<u8>,
    pub indexing_pressure_percent: Option<u8>,
    pub search_active: u64,
    pub search_queue: u64,
}

fn percent(used: Option<u64>, total: Option<u64>) -> Option<u8> {
    match (used, total) {
        (Some(used), Some(total)) if total > 0 => Some(((used * 100) / total).min(100) as u8),
        _ => None,
    }
}

/// Promítne surovou odpověď `GET /_nodes/stats` na seznam node snapshotů.
///
/// Chybějící podstromy (mixed-version cluster, node bez fs statistik)
/// dávají `None`, ne chybu. Pořadí kopíruje iteraci upstream mapy.
pub fn normalize_nodes(stats_response: &Value) -> Vec<NodeSnapshot> {
    let Some(nodes_map) = stats_response["nodes"].as_object() else {
        return Vec::new();
    };

    let mut nodes = Vec::with_capacity(nodes_map.len());
    for (node_id, stats) in nodes_map {
        let roles: Vec<String> = stats["roles"]
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(|s| s.to_string()))
                    .collect()
            })
            .unwrap_or_default();
        let master_eligible = roles.iter().any(|role| role == "master");

        let cpu_percent = stats["os"]["cpu"]["percent"].as_u64().map(|v| v.min(100) as u8);

        // os.mem.used_percent posílá ES přímo; starší verze jen used/total
        let ram_percent = stats["os"]["mem"]["used_percent"]
            .as_u64()
            .map(|v| v.min(100) as u8)
            .or_else(|| {
                percent(
                    stats["os"]["mem"]["used_in_bytes"].as_u64(),
                    stats["os"]["mem"]["total_in_bytes"].as_u64(),
                )
            });

        let heap_percent = stats["jvm"]["mem"]["heap_used_percent"]
            .as_u64()
            .map(|v| v.min(100) as u8);

        let disk_percent = match (
            stats["fs"]["total"]["available_in_bytes"].as_u64(),
            stats["fs"]["total"]["total_in_bytes"].as_u64(),
        ) {
            (Some(available), Some(total)) if total > 0 => {
                percent(Some(total.saturating_sub(available)), Some(total))
            }
            _ => None,
        };

        let indexing_pressure_percent = percent(
            stats["indexing_pressure"]["memory"]["current"]["all_in_bytes"].as_u64(),
            stats["indexing_pressure"]["memory"]["limit_in_bytes"].as_u64(),
        );

        nodes.push(NodeSnapshot {
            id: node_id.clone(),
            name: stats["name"].as_str().unwrap_or("unknown").to_string(),
            host: stats["host"].as_str().unwrap_or("-").to_string(),
            roles,
            master_eligible,
            cpu_percent,
            ram_percent,
            heap_percent,
            disk_percent,
            indexing_pressure_percent,
            search_active: stats["thread_pool"]["search"]["active"].as_u64().unwrap_or(0),
            search_queue: stats["thread_pool"]["search"]["queue"].as_u64().unwrap_or(0),
        });
    }

    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixture() -> Value {
        json!({
            "_nodes": {"total": 2, "successful": 2, "failed": 0},
            "cluster_name": "docs-cluster",
            "nodes": {
                "abc123": {
                    "name": "es-data-0",
                    "host": "10.0.0.11",
                    "roles": ["data", "master", "ingest"],
                    "os": {
                        "cpu": {"percent": 42},
                        "mem": {
                            "used_percent": 63,
                            "used_in_bytes": 6_700_000_000u64,
                            "total_in_bytes": 10_700_000_000u64
                        }
                    },
                    "jvm": {"mem": {"heap_used_percent": 55}},
                    "fs": {"total": {"total_in_bytes": 100_000u64, "available_in_bytes": 25_000u64}},
                    "indexing_pressure": {
                        "memory": {
                            "current": {"all_in_bytes": 1_000u64},
                            "limit_in_bytes": 10_000u64
                        }
                    },
                    "thread_pool": {"search": {"active": 3, "queue": 7}}
                },
                "def456": {
                    "name": "es-coord-0",
                    "host": "10.0.0.12",
                    "roles": []
                }
            }
        })
    }

    #[test]
    fn test_normalize_full_node() {
        let nodes = normalize_nodes(&fixture());
        assert_eq!(nodes.len(), 2);

        let data = nodes.iter().find(|n| n.id == "abc123").unwrap();
        assert_eq!(data.name, "es-data-0");
        assert_eq!(data.host, "10.0.0.11");
        assert!(data.master_eligible);
        assert_eq!(data.cpu_percent, Some(42));
        assert_eq!(data.ram_percent, Some(63));
        assert_eq!(data.heap_percent, Some(55));
        assert_eq!(data.disk_percent, Some(75));
        assert_eq!(data.indexing_pressure_percent, Some(10));
        assert_eq!(data.search_active, 3);
        assert_eq!(data.search_queue, 7);
    }

    #[test]
    fn test_normalize_sparse_node() {
        let nodes = normalize_nodes(&fixture());

        let coord = nodes.iter().find(|n| n.id == "def456").unwrap();
        assert!(!coord.master_eligible);
        assert_eq!(coord.cpu_percent, None);
        assert_eq!(coord.ram_percent, None);
        assert_eq!(coord.heap_percent, None);
        assert_eq!(coord.disk_percent, None);
        assert_eq!(coord.indexing_pressure_percent, None);
        assert_eq!(coord.search_active, 0);
    }

    #[test]
    fn test_normalize_missing_nodes_map() {
        assert!(normalize_nodes(&json!({})).is_empty());
        assert!(normalize_nodes(&json!({"nodes": null})).is_empty());
    }

    #[test]
    fn test_percent_bounds() {
        assert_eq!(percent(Some(0), Some(100)), Some(0));
        assert_eq!(percent(Some(50), Some(100)), Some(50));
        assert_eq!(percent(Some(200), Some(100)), Some(100));
        assert_eq!(percent(Some(1), Some(0)), None);
        assert_eq!(percent(None, Some(100)), None);
    }
}
