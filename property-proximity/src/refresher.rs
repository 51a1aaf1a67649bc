//! Cached, periodically refreshed proximity status.
//!
//! The refresher owns the only shared mutable state of the proximity core:
//! the current [`LocationStatus`] and the time it was produced. Both are
//! mirrored into a [`KeyValueStore`] so the next process start can render the
//! last known state immediately.
//!
//! Overlapping refreshes are not de-duplicated. Each completed resolution
//! replaces the status, so the last one to *finish* wins.

use crate::models::LocationStatus;
use crate::platform::GeolocationPlatform;
use crate::resolver::LocationResolver;
use crate::store::{load_json, save_json, KeyValueStore};
use chrono::Utc;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};

/// Store key holding the JSON-serialized last status
pub const STATUS_KEY: &str = "location_status";
/// Store key holding the epoch-millisecond timestamp of the last status
pub const STATUS_TIME_KEY: &str = "location_status_time";

/// What the visibility signal did while a refresh was in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisibilityDuring {
    Unchanged,
    /// Went hidden at least once; it may be visible again by now
    Hidden,
    Closed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefresherConfig {
    /// Cadence of the periodic refresh while the app is visible
    pub refresh_interval: Duration,
    /// Window in which triggered refreshes are absorbed; `None` disables it
    pub throttle: Option<Duration>,
    /// Refresh immediately when the app returns to the foreground
    pub refresh_on_focus: bool,
}

impl Default for RefresherConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(2 * 60),
            throttle: Some(Duration::from_secs(15)),
            refresh_on_focus: true,
        }
    }
}

struct Inner<P, S> {
    resolver: LocationResolver<P>,
    store: S,
    config: RefresherConfig,
    status: watch::Sender<LocationStatus>,
    last_refreshed_ms: Mutex<Option<i64>>,
    last_started: Mutex<Option<Instant>>,
}

/// Polling and caching wrapper around [`LocationResolver`]
pub struct ProximityRefresher<P, S> {
    inner: Arc<Inner<P, S>>,
}

impl<P, S> Clone for ProximityRefresher<P, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P, S> ProximityRefresher<P, S>
where
    P: GeolocationPlatform,
    S: KeyValueStore,
{
    /// Create a refresher, seeding the status from the store when a cached
    /// value is present
    pub fn new(resolver: LocationResolver<P>, store: S, config: RefresherConfig) -> Self {
        let cached: Option<LocationStatus> = load_json(&store, STATUS_KEY);
        let cached_ms = match store.get(STATUS_TIME_KEY) {
            Ok(raw) => raw.and_then(|s| s.trim().parse::<i64>().ok()),
            Err(e) => {
                log::warn!("Could not read cached status time: {}", e);
                None
            }
        };

        if let Some(status) = &cached {
            log::debug!("Restored cached location status '{}'", status.state());
        }

        let (status, _) = watch::channel(cached.unwrap_or_default());

        Self {
            inner: Arc::new(Inner {
                resolver,
                store,
                config,
                status,
                last_refreshed_ms: Mutex::new(cached_ms),
                last_started: Mutex::new(None),
            }),
        }
    }

    /// Current status; never undefined, `Idle` before any resolution
    pub fn status(&self) -> LocationStatus {
        self.inner.status.borrow().clone()
    }

    /// Subscribe to status changes
    pub fn subscribe(&self) -> watch::Receiver<LocationStatus> {
        self.inner.status.subscribe()
    }

    /// Epoch milliseconds of the last applied status, including a cached one
    pub fn last_refreshed_ms(&self) -> Option<i64> {
        self.inner.last_refreshed_ms.lock().ok().and_then(|g| *g)
    }

    pub fn resolver(&self) -> &LocationResolver<P> {
        &self.inner.resolver
    }

    pub fn config(&self) -> &RefresherConfig {
        &self.inner.config
    }

    /// Resolve now and overwrite the current status unconditionally
    pub async fn refresh(&self) -> LocationStatus {
        self.mark_started();
        let next = self.inner.resolver.resolve().await;
        self.apply(next.clone());
        next
    }

    /// Refresh triggered by navigation or a similar UI event.
    ///
    /// Returns `None` when the request was absorbed by the throttle window or
    /// automatic retries are off for the current status.
    pub async fn request_refresh(&self) -> Option<LocationStatus> {
        if !self.auto_refresh_allowed() {
            log::debug!(
                "Skipping triggered refresh while status is '{}'",
                self.status().state()
            );
            return None;
        }
        if !self.try_begin_throttled() {
            log::debug!("Triggered refresh suppressed by throttle");
            return None;
        }

        let next = self.inner.resolver.resolve().await;
        self.apply(next.clone());
        Some(next)
    }

    /// Denied permission and missing capability are not retried without an
    /// explicit user action
    pub fn auto_refresh_allowed(&self) -> bool {
        self.inner.resolver.is_supported() && !self.inner.status.borrow().is_denied()
    }

    /// Drive the periodic refresh from a foreground signal.
    ///
    /// While `visibility` reads `true` the status is refreshed every
    /// `refresh_interval`; when it turns `false` the timer is torn down, and
    /// it restarts with an immediate refresh once visible again. Returns when
    /// the visibility sender is dropped.
    pub async fn run(&self, mut visibility: watch::Receiver<bool>) {
        let period = self.inner.config.refresh_interval;
        let mut first_visible = true;

        loop {
            let visible = *visibility.borrow_and_update();
            if !visible {
                if visibility.changed().await.is_err() {
                    break;
                }
                continue;
            }

            let during = if first_visible {
                first_visible = false;
                self.while_watching(&mut visibility, self.refresh()).await
            } else if self.inner.config.refresh_on_focus {
                self.while_watching(&mut visibility, self.refresh_if_allowed()).await
            } else {
                VisibilityDuring::Unchanged
            };
            match during {
                VisibilityDuring::Closed => break,
                // re-read: either hidden now, or back and due a focus refresh
                VisibilityDuring::Hidden => continue,
                VisibilityDuring::Unchanged => {}
            }

            log::info!("Proximity timer started ({:?} interval)", period);
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match self.while_watching(&mut visibility, self.refresh_if_allowed()).await {
                            VisibilityDuring::Closed => {
                                log::info!("Visibility source closed, stopping proximity timer");
                                return;
                            }
                            VisibilityDuring::Hidden => {
                                log::info!("App hidden during refresh, proximity timer stopped");
                                break;
                            }
                            VisibilityDuring::Unchanged => {}
                        }
                    }
                    changed = visibility.changed() => {
                        if changed.is_err() {
                            log::info!("Visibility source closed, stopping proximity timer");
                            return;
                        }
                        if !*visibility.borrow_and_update() {
                            log::info!("App hidden, proximity timer stopped");
                            break;
                        }
                    }
                }
            }
        }

        log::info!("Visibility source closed, stopping proximity timer");
    }

    /// Runs `work` to completion while recording visibility changes, so a
    /// hide followed by a show is not lost to the channel keeping only the
    /// latest value
    async fn while_watching<F: Future>(
        &self,
        visibility: &mut watch::Receiver<bool>,
        work: F,
    ) -> VisibilityDuring {
        tokio::pin!(work);
        let mut during = VisibilityDuring::Unchanged;

        loop {
            tokio::select! {
                _ = &mut work => return during,
                changed = visibility.changed(), if during != VisibilityDuring::Closed => {
                    match changed {
                        Err(_) => during = VisibilityDuring::Closed,
                        Ok(()) => {
                            if !*visibility.borrow_and_update() {
                                during = VisibilityDuring::Hidden;
                            }
                        }
                    }
                }
            }
        }
    }

    async fn refresh_if_allowed(&self) {
        if self.auto_refresh_allowed() {
            self.refresh().await;
        } else {
            log::debug!(
                "Skipping automatic refresh while status is '{}'",
                self.status().state()
            );
        }
    }

    fn mark_started(&self) {
        if let Ok(mut last) = self.inner.last_started.lock() {
            *last = Some(Instant::now());
        }
    }

    /// Checks the throttle window and records a start when it is open
    fn try_begin_throttled(&self) -> bool {
        let Ok(mut last) = self.inner.last_started.lock() else {
            return true;
        };
        if let (Some(window), Some(prev)) = (self.inner.config.throttle, *last) {
            if prev.elapsed() < window {
                return false;
            }
        }
        *last = Some(Instant::now());
        true
    }

    fn apply(&self, next: LocationStatus) {
        let now_ms = Utc::now().timestamp_millis();

        if let Err(e) = save_json(&self.inner.store, STATUS_KEY, &next) {
            log::warn!("Failed to persist location status: {}", e);
        }
        if let Err(e) = self.inner.store.set(STATUS_TIME_KEY, &now_ms.to_string()) {
            log::warn!("Failed to persist location status time: {}", e);
        }
        if let Ok(mut last) = self.inner.last_refreshed_ms.lock() {
            *last = Some(now_ms);
        }

        log::debug!("Location status is now '{}'", next.state());
        self.inner.status.send_replace(next);
    }
}
