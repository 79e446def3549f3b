//! Host-side periodic sweeping of expired sessions
//!
//! The store never sweeps on its own. Hosts that want a fixed-interval sweep
//! can start one here and keep the returned handles for shutdown.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::store::SessionStore;
use crate::error::{MemoryError, Result};

/// Result of a single sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    /// Sessions removed because they were idle past the TTL
    pub sessions_removed: usize,
    /// Sessions still tracked after the sweep
    pub sessions_remaining: usize,
}

/// Runs one sweep against the store
///
/// Both counts are taken under the same lock, so concurrent writers cannot
/// skew the report.
pub async fn sweep_once(store: &SessionStore) -> SweepReport {
    let (sessions_removed, sessions_remaining) = store.cleanup_expired_with_remaining().await;

    if sessions_removed == 0 {
        debug!(sessions_remaining, "Sweep found no expired sessions");
    }

    SweepReport {
        sessions_removed,
        sessions_remaining,
    }
}

/// Starts a background task that sweeps the store every `every`
///
/// The first sweep happens one full interval after start. Returns a
/// JoinHandle for graceful shutdown coordination and a shutdown sender; the
/// task also stops if the sender is dropped.
///
/// # Returns
/// * `Err(MemoryError::InvalidConfiguration)` - If `every` is zero
pub fn start_sweep_task(
    store: SessionStore,
    every: Duration,
) -> Result<(JoinHandle<()>, mpsc::Sender<()>)> {
    if every.is_zero() {
        return Err(MemoryError::invalid_configuration(
            "sweep interval must be a positive duration",
        ));
    }

    let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

    let handle = tokio::spawn(async move {
        let start = tokio::time::Instant::now() + every;
        let mut interval = tokio::time::interval_at(start, every);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        info!(interval_ms = every.as_millis() as u64, "Sweep task started");

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    sweep_once(&store).await;
                }
                _ = shutdown_rx.recv() => {
                    info!("Sweep task received shutdown signal, stopping");
                    break;
                }
            }
        }
    });

    Ok((handle, shutdown_tx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Role;

    #[tokio::test]
    async fn test_sweep_once_reports_counts() {
        let store = SessionStore::new(5, Duration::from_millis(40)).unwrap();
        store.add_message("old", Role::User, "bye").await;
        tokio::time::sleep(Duration::from_millis(80)).await;
        store.add_message("new", Role::User, "hi").await;

        let report = sweep_once(&store).await;
        assert_eq!(
            report,
            SweepReport {
                sessions_removed: 1,
                sessions_remaining: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_sweep_task_removes_expired_sessions() {
        let store = SessionStore::new(5, Duration::from_millis(30)).unwrap();
        store.add_message("idle", Role::User, "hello").await;

        let (handle, shutdown_tx) =
            start_sweep_task(store.clone(), Duration::from_millis(20)).unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(!store.contains_session("idle").await);

        shutdown_tx.send(()).await.unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_sweep_task_stops_when_sender_dropped() {
        let store = SessionStore::new(5, Duration::from_secs(60)).unwrap();
        let (handle, shutdown_tx) = start_sweep_task(store, Duration::from_secs(3600)).unwrap();

        drop(shutdown_tx);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweep task should stop once the sender is dropped")
            .unwrap();
    }

    #[tokio::test]
    async fn test_sweep_task_rejects_zero_interval() {
        let store = SessionStore::new(5, Duration::from_secs(60)).unwrap();
        store.add_message("kept", Role::User, "hello").await;

        let result = start_sweep_task(store.clone(), Duration::ZERO);
        assert!(matches!(
            result,
            Err(MemoryError::InvalidConfiguration { .. })
        ));

        // Store is untouched and still usable
        assert!(store.contains_session("kept").await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_sweep_report_consistent_with_concurrent_writers() {
        let store = SessionStore::new(5, Duration::from_secs(60)).unwrap();

        let writer = {
            let store = store.clone();
            tokio::spawn(async move {
                for i in 0..200 {
                    store
                        .add_message(&format!("session-{}", i), Role::User, "hi")
                        .await;
                }
            })
        };

        // Nothing can expire, so every report must match what the map held at
        // that instant: zero removed and a count that never goes backwards
        let mut last_remaining = 0;
        for _ in 0..50 {
            let report = sweep_once(&store).await;
            assert_eq!(report.sessions_removed, 0);
            assert!(report.sessions_remaining >= last_remaining);
            last_remaining = report.sessions_remaining;
            tokio::task::yield_now().await;
        }

        writer.await.unwrap();
        assert_eq!(sweep_once(&store).await.sessions_remaining, 200);
    }
}
