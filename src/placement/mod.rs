use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Node tak, jak ho popisuje placement payload z proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementNode {
    pub id: String,
    pub name: String,
    pub host: String,
    pub roles: Vec<String>,
    pub is_master: bool,
}

/// Shard přiřazený konkrétnímu nodu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShardInfo {
    pub shard: String,
    pub prirep: String, // "p" nebo "r"
    pub state: String,  // "STARTED", "RELOCATING", ...
    pub node_id: String,
    pub node_name: String,
    pub store: String,
    pub docs: String,
}

/// Shard bez přiřazeného nodu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnassignedShard {
    pub shard: String,
    pub prirep: String,
    pub state: String,
}

/// Rozmístění jednoho indexu: sparse mapa node-name -> shardy
/// plus samostatný bucket unassigned shardů.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexPlacement {
    pub index: String,
    pub status: String, // open, close
    #[serde(default)]
    pub shards_by_node: HashMap<String, Vec<ShardInfo>>,
    #[serde(default)]
    pub unassigned: Vec<UnassignedShard>,
}

/// Kompletní placement payload: nody a indexy v pořadí, v jakém je
/// poslal upstream. Žádné vlastní řazení se nevynucuje.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicesPlacementData {
    pub nodes: Vec<PlacementNode>,
    pub indices: Vec<IndexPlacement>,
    pub has_unassigned_shards: bool,
}

/// Hlavička jednoho sloupce gridu (jeden index).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridColumn {
    pub index: String,
    pub status: String,
    pub assigned_shards: usize,
    pub unassigned_shards: usize,
}

/// Jeden řádek gridu: node plus buňka pro každý index.
/// Buňky jsou zarovnané na pořadí sloupců; prázdný seznam znamená
/// "tento index nemá na tomto nodu žádný shard".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRow {
    pub node: PlacementNode,
    pub cells: Vec<Vec<ShardInfo>>,
}

/// Hustý grid pro zobrazení: sparse mapování {node x index}
/// materializované tak, že každý pár má buňku.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementGrid {
    pub columns: Vec<GridColumn>,
    /// Syntetický "Unassigned" pseudo-řádek - bucket per sloupec.
    /// Chybí úplně, pokud cluster žádné unassigned shardy nemá.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unassigned_row: Option<Vec<Vec<UnassignedShard>>>,
    pub rows: Vec<NodeRow>,
}

/// Přeloží sparse placement na hustý grid.
///
/// Čistá funkce bez I/O: dvojí spuštění nad stejným vstupem dává
/// identický výstup. Pořadí řádků a sloupců kopíruje vstupní payload.
pub fn build_grid(data: &IndicesPlacementData) -> PlacementGrid {
    let columns = data
        .indices
        .iter()
        .map(|placement| GridColumn {
            index: placement.index.clone(),
            status: placement.status.clone(),
            assigned_shards: placement.shards_by_node.values().map(Vec::len).sum(),
            unassigned_shards: placement.unassigned.len(),
        })
        .collect();

    let rows = data
        .nodes
        .iter()
        .map(|node| NodeRow {
            node: node.clone(),
            cells: data
                .indices
                .iter()
                .map(|placement| {
                    placement
                        .shards_by_node
                        .get(&node.name)
                        .cloned()
                        .unwrap_or_default()
                })
                .collect(),
        })
        .collect();

    let unassigned_row = data.has_unassigned_shards.then(|| {
        data.indices
            .iter()
            .map(|placement| placement.unassigned.clone())
            .collect()
    });

    PlacementGrid {
        columns,
        unassigned_row,
        rows,
    }
}
