//! Periodic dashboard refresh
//!
//! Keeps the latest snapshot for one location, refreshed on a fixed interval.
//! Each refresh replaces the previous snapshot wholesale; a failed refresh keeps
//! the last good one. Stopping (or dropping) the poller ends the timer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use shared::{DashboardWeatherSnapshot, Location};
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;

use super::weather::WeatherService;

/// Background refresher for one dashboard location
pub struct DashboardPoller {
    location: Location,
    interval: Duration,
    is_running: Arc<AtomicBool>,
    wake: Arc<Notify>,
    snapshots: watch::Receiver<Option<DashboardWeatherSnapshot>>,
    handle: Option<JoinHandle<()>>,
}

impl DashboardPoller {
    /// Start polling. The first fetch happens immediately.
    pub fn start(service: WeatherService, location: Location, interval: Duration) -> Self {
        let is_running = Arc::new(AtomicBool::new(true));
        let wake = Arc::new(Notify::new());
        let (sender, snapshots) = watch::channel(None);

        let handle = tokio::spawn(Self::poll_loop(
            service,
            location.clone(),
            interval,
            Arc::clone(&is_running),
            Arc::clone(&wake),
            sender,
        ));

        tracing::info!(
            location = %location,
            interval_secs = interval.as_secs(),
            "Dashboard poller started"
        );

        Self {
            location,
            interval,
            is_running,
            wake,
            snapshots,
            handle: Some(handle),
        }
    }

    async fn poll_loop(
        service: WeatherService,
        location: Location,
        interval: Duration,
        is_running: Arc<AtomicBool>,
        wake: Arc<Notify>,
        sender: watch::Sender<Option<DashboardWeatherSnapshot>>,
    ) {
        while is_running.load(Ordering::SeqCst) {
            match service.get_dashboard_weather(&location).await {
                Ok(snapshot) => {
                    tracing::debug!(
                        location = %location,
                        last_updated = %snapshot.last_updated,
                        "Dashboard snapshot refreshed"
                    );
                    sender.send_replace(Some(snapshot));
                }
                Err(e) => {
                    tracing::warn!(location = %location, "Dashboard refresh failed: {}", e);
                }
            }

            if !is_running.load(Ordering::SeqCst) {
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = wake.notified() => {
                    tracing::debug!(location = %location, "Dashboard poller woken");
                }
            }
        }

        tracing::info!(location = %location, "Dashboard poller stopped");
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Receiver that observes every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<Option<DashboardWeatherSnapshot>> {
        self.snapshots.clone()
    }

    /// Most recent successful snapshot, if any
    pub fn latest(&self) -> Option<DashboardWeatherSnapshot> {
        self.snapshots.borrow().clone()
    }

    /// Skip the rest of the current wait and refresh now
    pub fn refresh_now(&self) {
        self.wake.notify_one();
    }

    /// Stop polling. An in-flight fetch finishes but nothing further is scheduled.
    pub fn stop(&self) {
        self.is_running.store(false, Ordering::SeqCst);
        self.wake.notify_one();
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::SeqCst)
    }

    /// Stop and wait for the background task to exit
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!("Dashboard poller task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for DashboardPoller {
    fn drop(&mut self) {
        self.stop();
    }
}
