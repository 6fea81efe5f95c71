//! Headless administrační konzole pro Elasticsearch cluster.
//!
//! JSON API nad Elasticsearch REST rozhraním (cluster health, správa indexů,
//! dokumenty) plus serverová část stavové vrstvy: polling controller,
//! paralelní join snapshotů a builder placement gridu.

pub mod config;
pub mod es;
pub mod handlers;
pub mod models;
pub mod monitor;
pub mod placement;
pub mod proxy;
