use anyhow::{Context, Result};
use clap::Parser;
use std::str::FromStr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use elastic_console::config::Config;
use elastic_console::es::EsClient;
use elastic_console::handlers::{self, AppState};
use elastic_console::monitor::{self, RefreshInterval};
use elastic_console::proxy::ProxyClient;

#[derive(Parser, Debug)]
#[command(name = "elastic-console")]
#[command(about = "Elasticsearch cluster administration console", long_about = None)]
struct Args {
    /// Host pro HTTP server
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port pro HTTP server
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Interval automatického obnovování cluster snapshotu
    /// (manual, 5s, 15s, 30s, 60s)
    #[arg(long, default_value = "manual", value_parser = parse_refresh_interval)]
    refresh_interval: RefreshInterval,
}

fn parse_refresh_interval(value: &str) -> Result<RefreshInterval, String> {
    RefreshInterval::from_str(value)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Inicializuj logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "elastic_console=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse CLI argumenty
    let args = Args::parse();

    tracing::info!("Starting Elastic Console...");

    // Konfigurace z prostředí; klienti se staví jednou a sdílí se dál
    let config = Config::from_env();

    let es = Arc::new(EsClient::from_config(&config).context("Failed to create Elasticsearch client")?);

    // Ověř dostupnost clusteru - selhání nebrání startu, chyby se
    // hlásí per request
    match es.ping().await {
        Ok(info) => tracing::info!(
            "Connected to cluster '{}' (Elasticsearch {})",
            info.cluster_name,
            info.version
        ),
        Err(e) => tracing::warn!("Elasticsearch not reachable at startup: {}", e),
    }

    let proxy = match &config.proxy_url {
        Some(url) => Some(Arc::new(
            ProxyClient::new(url).context("Failed to create cluster proxy client")?,
        )),
        None => None,
    };

    // Spusť monitor clusteru
    let (monitor, monitor_task) = monitor::spawn(es.clone(), args.refresh_interval);
    tracing::info!("Cluster monitor started (refresh interval: {})", args.refresh_interval);

    // Shared state
    let state = Arc::new(AppState {
        es,
        proxy,
        monitor: monitor.clone(),
    });

    // Vytvoř axum router
    let app = handlers::router(state);

    // Adresa serveru
    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Ukonči monitor a počkej na doběhnutí úlohy
    monitor.shutdown();
    let _ = monitor_task.await;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
