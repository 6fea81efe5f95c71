pub mod snapshot;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::es::{EsClient, EsError};
use crate::models::ClusterHealth;

pub use snapshot::{normalize_nodes, ClusterSnapshot, NodeSnapshot};

/// Interval automatického obnovování dashboardu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshInterval {
    Manual,
    Secs5,
    Secs15,
    Secs30,
    Secs60,
}

impl RefreshInterval {
    /// Perioda časovače; `None` znamená žádný časovač (manual).
    pub fn period(self) -> Option<Duration> {
        match self {
            RefreshInterval::Manual => None,
            RefreshInterval::Secs5 => Some(Duration::from_secs(5)),
            RefreshInterval::Secs15 => Some(Duration::from_secs(15)),
            RefreshInterval::Secs30 => Some(Duration::from_secs(30)),
            RefreshInterval::Secs60 => Some(Duration::from_secs(60)),
        }
    }
}

impl FromStr for RefreshInterval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().trim_end_matches('s') {
            "manual" => Ok(RefreshInterval::Manual),
            "5" => Ok(RefreshInterval::Secs5),
            "15" => Ok(RefreshInterval::Secs15),
            "30" => Ok(RefreshInterval::Secs30),
            "60" => Ok(RefreshInterval::Secs60),
            _ => Err(format!(
                "invalid refresh interval '{}', expected one of: manual, 5s, 15s, 30s, 60s",
                s
            )),
        }
    }
}

impl fmt::Display for RefreshInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshInterval::Manual => write!(f, "manual"),
            RefreshInterval::Secs5 => write!(f, "5s"),
            RefreshInterval::Secs15 => write!(f, "15s"),
            RefreshInterval::Secs30 => write!(f, "30s"),
            RefreshInterval::Secs60 => write!(f, "60s"),
        }
    }
}

impl Serialize for RefreshInterval {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Zdroj dat pro snapshot join. Trait existuje kvůli dependency injection:
/// monitor se testuje s falešným zdrojem místo živého clusteru.
pub trait SnapshotSource: Send + Sync + 'static {
    fn fetch_health(&self) -> impl Future<Output = Result<ClusterHealth, EsError>> + Send;
    fn fetch_nodes(&self) -> impl Future<Output = Result<Value, EsError>> + Send;
}

impl SnapshotSource for EsClient {
    async fn fetch_health(&self) -> Result<ClusterHealth, EsError> {
        self.cluster_health().await
    }

    async fn fetch_nodes(&self) -> Result<Value, EsError> {
        self.nodes_stats().await
    }
}

/// Fáze životního cyklu publikovaného stavu.
///
/// `Loading` platí jen do prvního dokončeného fetche - tiché refreshe
/// se do ní už nikdy nevrací.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitorPhase {
    Loading,
    Ready,
    Failed,
}

/// Publikovaný stav monitoru.
///
/// Při chybě zůstává viditelný poslední dobrý snapshot; nahrazuje se
/// jen při úspěšném refreshi, a to celý najednou.
#[derive(Debug, Clone, Serialize)]
pub struct MonitorState {
    pub phase: MonitorPhase,
    pub snapshot: Option<ClusterSnapshot>,
    pub last_error: Option<String>,
}

impl Default for MonitorState {
    fn default() -> Self {
        Self {
            phase: MonitorPhase::Loading,
            snapshot: None,
            last_error: None,
        }
    }
}

/// Ovládání běžícího monitoru. Klonovatelné - sdílí se v AppState.
#[derive(Clone)]
pub struct MonitorHandle {
    state_rx: watch::Receiver<MonitorState>,
    interval_tx: Arc<watch::Sender<RefreshInterval>>,
    refresh: Arc<Notify>,
    cancel: CancellationToken,
}

impl MonitorHandle {
    /// Aktuální publikovaný stav.
    pub fn state(&self) -> MonitorState {
        self.state_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<MonitorState> {
        self.state_rx.clone()
    }

    /// Aktuálně nastavený interval.
    pub fn interval(&self) -> RefreshInterval {
        *self.interval_tx.borrow()
    }

    /// Přepne interval; běžící plán se okamžitě zruší a postaví znovu.
    pub fn set_interval(&self, interval: RefreshInterval) {
        self.interval_tx.send_replace(interval);
    }

    /// Vyžádá okamžitý refresh mimo plán.
    pub fn refresh_now(&self) {
        self.refresh.notify_one();
    }

    /// Ukončí monitor: žádný další tick, rozdělaný fetch se zahodí.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

/// Spustí monitor nad daným zdrojem a vrátí handle plus join handle
/// úlohy (na ten se čeká při graceful shutdownu).
pub fn spawn<S: SnapshotSource>(
    source: Arc<S>,
    interval: RefreshInterval,
) -> (MonitorHandle, JoinHandle<()>) {
    let (state_tx, state_rx) = watch::channel(MonitorState::default());
    let (interval_tx, interval_rx) = watch::channel(interval);
    let refresh = Arc::new(Notify::new());
    let cancel = CancellationToken::new();

    let task = tokio::spawn(run(
        source,
        interval_rx,
        refresh.clone(),
        state_tx,
        cancel.clone(),
    ));

    let handle = MonitorHandle {
        state_rx,
        interval_tx: Arc::new(interval_tx),
        refresh,
        cancel,
    };

    (handle, task)
}

/// Paralelní join obou upstream volání: obě letí souběžně, úspěch
/// vyžaduje obě, první chyba vyhrává. Částečný výsledek se nepublikuje.
async fn fetch_snapshot<S: SnapshotSource>(source: &S) -> Result<ClusterSnapshot, EsError> {
    let (health, nodes) = tokio::try_join!(source.fetch_health(), source.fetch_nodes())?;

    Ok(ClusterSnapshot {
        health,
        nodes: normalize_nodes(&nodes),
        refreshed_at: Utc::now(),
    })
}

fn publish(state_tx: &watch::Sender<MonitorState>, result: Result<ClusterSnapshot, EsError>) {
    state_tx.send_modify(|state| match result {
        Ok(snapshot) => {
            state.phase = MonitorPhase::Ready;
            state.snapshot = Some(snapshot);
            state.last_error = None;
        }
        Err(e) => {
            tracing::warn!("cluster snapshot refresh failed: {}", e);
            state.phase = MonitorPhase::Failed;
            state.last_error = Some(e.to_string());
            // poslední dobrý snapshot zůstává viditelný
        }
    });
}

async fn run<S: SnapshotSource>(
    source: Arc<S>,
    mut interval_rx: watch::Receiver<RefreshInterval>,
    refresh: Arc<Notify>,
    state_tx: watch::Sender<MonitorState>,
    cancel: CancellationToken,
) {
    // Úvodní načtení - jediné, které se hlásí jako Loading
    tokio::select! {
        _ = cancel.cancelled() => return,
        result = fetch_snapshot(source.as_ref()) => publish(&state_tx, result),
    }

    loop {
        let period = interval_rx.borrow_and_update().period();
        let mut ticker = period.map(|period| {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            ticker
        });
        if let Some(period) = period {
            tracing::debug!("auto-refresh scheduled every {:?}", period);
        }

        loop {
            // Čekej na podnět: zrušení, přepnutí intervalu, ruční refresh, tick
            tokio::select! {
                _ = cancel.cancelled() => return,
                changed = interval_rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    // Přestav časovač podle nového intervalu
                    break;
                }
                _ = refresh.notified() => {}
                _ = tick(ticker.as_mut()) => {}
            }

            // Tichý refresh; zrušení za letu fetch zahodí a stav už nesáhne
            tokio::select! {
                _ = cancel.cancelled() => return,
                result = fetch_snapshot(source.as_ref()) => publish(&state_tx, result),
            }
        }
    }
}

async fn tick(ticker: Option<&mut time::Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        // Manual: žádný časovač, větev nikdy nevystřelí
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_parsing() {
        assert_eq!("manual".parse::<RefreshInterval>(), Ok(RefreshInterval::Manual));
        assert_eq!("5s".parse::<RefreshInterval>(), Ok(RefreshInterval::Secs5));
        assert_eq!("15".parse::<RefreshInterval>(), Ok(RefreshInterval::Secs15));
        assert_eq!("30S".parse::<RefreshInterval>(), Ok(RefreshInterval::Secs30));
        assert_eq!("60s".parse::<RefreshInterval>(), Ok(RefreshInterval::Secs60));
        assert!("90s".parse::<RefreshInterval>().is_err());
        assert!("".parse::<RefreshInterval>().is_err());
    }

    #[test]
    fn test_interval_display_round_trip() {
        for interval in [
            RefreshInterval::Manual,
            RefreshInterval::Secs5,
            RefreshInterval::Secs15,
            RefreshInterval::Secs30,
            RefreshInterval::Secs60,
        ] {
            let parsed: RefreshInterval = interval.to_string().parse().unwrap();
            assert_eq!(parsed, interval);
        }
    }

    #[test]
    fn test_interval_periods() {
        assert_eq!(RefreshInterval::Manual.period(), None);
        assert_eq!(
            RefreshInterval::Secs15.period(),
            Some(Duration::from_secs(15))
        );
    }
}
