use crate::config::AppConfig;
use crate::error::AppError;
use property_proximity::{
    GeolocationPlatform, KeyValueStore, LocationResolver, LocationStatus, PropertyRegistry,
    ProximityRefresher,
};
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tokio::sync::watch;
use tokio::task::JoinHandle;

const METERS_PER_MILE: f64 = 1609.344;
const FEET_PER_METER: f64 = 3.28084;

// Global property registry, loaded once at startup
static REGISTRY: OnceLock<Arc<PropertyRegistry>> = OnceLock::new();

/// Loads the property registry on first use and returns the shared instance.
/// A broken configuration is fatal, so errors are returned rather than
/// replaced with an empty registry.
pub fn init_registry(path: &Path) -> Result<Arc<PropertyRegistry>, AppError> {
    if let Some(registry) = REGISTRY.get() {
        return Ok(Arc::clone(registry));
    }
    let loaded = Arc::new(PropertyRegistry::load(path)?);
    Ok(Arc::clone(REGISTRY.get_or_init(|| loaded)))
}

/// Builds a refresher from the app config
pub fn build_refresher<P, S>(
    config: &AppConfig,
    platform: P,
    registry: Arc<PropertyRegistry>,
    store: S,
) -> ProximityRefresher<P, S>
where
    P: GeolocationPlatform,
    S: KeyValueStore,
{
    let resolver = LocationResolver::new(platform, registry).with_options(config.position_options());
    ProximityRefresher::new(resolver, store, config.refresher_config())
}

/// A refresher with its foreground loop running in the background
pub struct ProximityService<P, S> {
    refresher: ProximityRefresher<P, S>,
    visibility: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl<P, S> ProximityService<P, S>
where
    P: GeolocationPlatform + 'static,
    S: KeyValueStore + 'static,
{
    /// Spawns the refresh loop; `visible` is the app's current foreground state
    pub fn start(refresher: ProximityRefresher<P, S>, visible: bool) -> Self {
        let (visibility, rx) = watch::channel(visible);
        let task = tokio::spawn({
            let refresher = refresher.clone();
            async move { refresher.run(rx).await }
        });
        log::info!("Proximity service started (visible: {})", visible);
        Self {
            refresher,
            visibility,
            task,
        }
    }

    pub fn refresher(&self) -> &ProximityRefresher<P, S> {
        &self.refresher
    }

    /// Forward app foreground/background transitions
    pub fn set_visible(&self, visible: bool) {
        self.visibility.send_if_modified(|current| {
            let changed = *current != visible;
            *current = visible;
            changed
        });
    }

    pub fn status(&self) -> LocationStatus {
        self.refresher.status()
    }

    pub fn proximity_text(&self) -> String {
        proximity_text(&self.refresher.status())
    }

    /// Stops the loop. The last status stays available through the refresher.
    pub async fn stop(self) {
        drop(self.visibility);
        if let Err(e) = self.task.await {
            log::error!("Proximity loop ended abnormally: {}", e);
        }
    }
}

/// One-line human summary of a status for headers and alert prompts
pub fn proximity_text(status: &LocationStatus) -> String {
    match status {
        LocationStatus::Idle => "Locating…".to_string(),
        LocationStatus::Denied { .. } => "Location blocked".to_string(),
        LocationStatus::Unavailable { .. } => "Location unavailable".to_string(),
        LocationStatus::Error { .. } => "Location error".to_string(),
        LocationStatus::Located { nearest, .. } => match nearest {
            Some(m) if m.within_radius => m.name.clone(),
            Some(m) => format!(
                "Not at any property • closest {} ({})",
                m.name,
                format_distance_us(m.distance_meters)
            ),
            None => "Not at any property".to_string(),
        },
    }
}

/// US-customary distance: feet under a tenth of a mile, miles otherwise
pub fn format_distance_us(meters: f64) -> String {
    if !meters.is_finite() {
        return String::new();
    }

    let miles = meters / METERS_PER_MILE;
    if miles < 0.1 {
        return format!("{}ft", (meters * FEET_PER_METER).round());
    }
    if miles < 1.0 {
        format!("{:.2}mi", miles)
    } else {
        format!("{:.1}mi", miles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::kv_store::SqliteStore;
    use property_proximity::{
        Fix, NearestMatch, Position, PositionError, PositionOptions, STATUS_KEY,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingPlatform {
        calls: AtomicUsize,
    }

    impl GeolocationPlatform for CountingPlatform {
        fn is_supported(&self) -> bool {
            true
        }

        async fn current_position(
            &self,
            _options: PositionOptions,
        ) -> Result<Position, PositionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Position {
                latitude: 34.0,
                longitude: -84.0,
                accuracy: Some(8.0),
            })
        }
    }

    fn registry() -> Arc<PropertyRegistry> {
        Arc::new(
            PropertyRegistry::from_json(
                r#"{"defaultRadiusMeters": 150, "properties": [
                    {"code": "SP", "name": "Sterling Place", "lat": 34.0, "lon": -84.0}
                ]}"#,
            )
            .unwrap(),
        )
    }

    fn located(nearest: Option<NearestMatch>) -> LocationStatus {
        LocationStatus::Located {
            coords: Fix {
                lat: 34.0,
                lon: -84.0,
                accuracy_meters: None,
            },
            nearest,
        }
    }

    fn nearest(distance: f64, within: bool) -> NearestMatch {
        NearestMatch {
            code: "SP".to_string(),
            name: "Sterling Place".to_string(),
            distance_meters: distance,
            radius_meters: 150.0,
            within_radius: within,
        }
    }

    #[test]
    fn test_format_distance_us() {
        assert_eq!(format_distance_us(f64::NAN), "");
        assert_eq!(format_distance_us(f64::INFINITY), "");
        assert_eq!(format_distance_us(0.0), "0ft");
        assert_eq!(format_distance_us(100.0), "328ft");
        assert_eq!(format_distance_us(500.0), "0.31mi");
        assert_eq!(format_distance_us(1609.344), "1.0mi");
        assert_eq!(format_distance_us(12_000.0), "7.5mi");
    }

    #[test]
    fn test_proximity_text() {
        assert_eq!(proximity_text(&LocationStatus::Idle), "Locating…");
        assert_eq!(proximity_text(&LocationStatus::denied("x")), "Location blocked");
        assert_eq!(proximity_text(&LocationStatus::unavailable("x")), "Location unavailable");
        assert_eq!(proximity_text(&LocationStatus::error("x")), "Location error");
        assert_eq!(proximity_text(&located(Some(nearest(12.0, true)))), "Sterling Place");
        assert_eq!(
            proximity_text(&located(Some(nearest(500.0, false)))),
            "Not at any property • closest Sterling Place (0.31mi)"
        );
        assert_eq!(proximity_text(&located(None)), "Not at any property");
    }

    #[test]
    fn test_init_registry_missing_file_is_fatal() {
        let err = init_registry(Path::new("/nonexistent/property_locations.json")).unwrap_err();
        assert!(matches!(err, AppError::Registry(_)));
    }

    #[tokio::test]
    async fn test_build_refresher_uses_config() {
        let mut config = AppConfig::default();
        config.position_timeout_secs = 5;
        config.refresh_throttle_secs = 0;

        let platform = CountingPlatform {
            calls: AtomicUsize::new(0),
        };
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        let refresher = build_refresher(&config, platform, registry(), Arc::clone(&store));

        assert_eq!(refresher.resolver().options().timeout, Duration::from_secs(5));
        assert_eq!(refresher.config().throttle, None);

        let status = refresher.refresh().await;
        assert!(status.is_on_property());
        assert!(store.get(STATUS_KEY).unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_service_follows_visibility() {
        let platform = CountingPlatform {
            calls: AtomicUsize::new(0),
        };
        let refresher = build_refresher(
            &AppConfig::default(),
            platform,
            registry(),
            Arc::new(SqliteStore::in_memory().unwrap()),
        );
        let service = ProximityService::start(refresher, true);

        let mut rx = service.refresher().subscribe();
        rx.changed().await.unwrap();
        assert_eq!(service.proximity_text(), "Sterling Place");
        assert_eq!(service.refresher().resolver().platform().calls.load(Ordering::SeqCst), 1);

        service.set_visible(false);
        tokio::time::sleep(Duration::from_secs(10 * 60)).await;
        assert_eq!(service.refresher().resolver().platform().calls.load(Ordering::SeqCst), 1);

        service.stop().await;
    }
}
