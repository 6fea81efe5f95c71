pub mod cluster;
pub mod document;
pub mod index;

pub use cluster::ClusterHealth;
pub use document::{DocumentRecord, RefreshMode};
pub use index::IndexSummary;
