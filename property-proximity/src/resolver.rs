use crate::models::{Fix, LocationStatus};
use crate::platform::{GeolocationPlatform, PermissionState, PositionErrorCode, PositionOptions};
use crate::registry::PropertyRegistry;
use std::sync::Arc;

const REASON_UNSUPPORTED: &str = "Geolocation not supported.";
const REASON_DENIED: &str = "Location permission denied.";
const REASON_UNAVAILABLE: &str = "Position unavailable.";
const REASON_TIMEOUT: &str = "Location request timed out.";
const REASON_UNKNOWN: &str = "Unknown location error.";

/// Turns one platform position query into a [`LocationStatus`]
pub struct LocationResolver<P> {
    platform: P,
    registry: Arc<PropertyRegistry>,
    options: PositionOptions,
}

impl<P: GeolocationPlatform> LocationResolver<P> {
    pub fn new(platform: P, registry: Arc<PropertyRegistry>) -> Self {
        Self {
            platform,
            registry,
            options: PositionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PositionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &PropertyRegistry {
        &self.registry
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn options(&self) -> PositionOptions {
        self.options
    }

    /// Whether the host can provide a position at all
    pub fn is_supported(&self) -> bool {
        self.platform.is_supported()
    }

    /// Resolve the current location. Never fails: every outcome is a status.
    pub async fn resolve(&self) -> LocationStatus {
        if !self.platform.is_supported() {
            return LocationStatus::unavailable(REASON_UNSUPPORTED);
        }

        match self.platform.query_permission().await {
            Ok(PermissionState::Denied) => return LocationStatus::denied(REASON_DENIED),
            Ok(_) => {}
            // Permission APIs are unreliable on some platforms; fall through
            Err(e) => log::debug!("Permission query failed, ignoring: {}", e),
        }

        let query = self.platform.current_position(self.options);
        let result = match tokio::time::timeout(self.options.timeout, query).await {
            Ok(result) => result,
            Err(_) => {
                log::debug!("Position query exceeded {:?}", self.options.timeout);
                return LocationStatus::error(REASON_TIMEOUT);
            }
        };

        match result {
            Ok(pos) => {
                let coords = Fix {
                    lat: pos.latitude,
                    lon: pos.longitude,
                    accuracy_meters: pos.accuracy,
                };
                let nearest = self.registry.match_nearest(coords.coordinate());
                log::debug!(
                    "Resolved fix ({}, {}) nearest={:?}",
                    coords.lat,
                    coords.lon,
                    nearest.as_ref().map(|n| (&n.code, n.distance_meters))
                );
                LocationStatus::Located { coords, nearest }
            }
            Err(e) => {
                log::debug!("Position query failed: {}", e);
                match e.code {
                    PositionErrorCode::PermissionDenied => LocationStatus::denied(REASON_DENIED),
                    PositionErrorCode::PositionUnavailable => {
                        LocationStatus::unavailable(REASON_UNAVAILABLE)
                    }
                    PositionErrorCode::Timeout => LocationStatus::error(REASON_TIMEOUT),
                    PositionErrorCode::Unknown => {
                        if e.message.trim().is_empty() {
                            LocationStatus::error(REASON_UNKNOWN)
                        } else {
                            LocationStatus::error(e.message)
                        }
                    }
                }
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakePlatform;
    use super::*;
    use crate::platform::{PositionError, PositionErrorCode};
    use crate::registry::PropertyLocation;
    use std::time::Duration;

    fn registry() -> Arc<PropertyRegistry> {
        Arc::new(PropertyRegistry::new(
            100.0,
            vec![PropertyLocation {
                code: "HP".to_string(),
                name: "Hamilton Park".to_string(),
                lat: 34.0,
                lon: -84.0,
                radius_meters: Some(150.0),
            }],
        ))
    }

    #[tokio::test]
    async fn test_unsupported_platform_is_unavailable() {
        let mut platform = FakePlatform::at(34.0, -84.0);
        platform.supported = false;
        let resolver = LocationResolver::new(platform, registry());

        let status = resolver.resolve().await;
        assert_eq!(status, LocationStatus::unavailable(REASON_UNSUPPORTED));
        assert_eq!(resolver.platform().calls(), 0);
    }

    #[tokio::test]
    async fn test_prior_denial_short_circuits() {
        let mut platform = FakePlatform::at(34.0, -84.0);
        platform.permission = Ok(PermissionState::Denied);
        let resolver = LocationResolver::new(platform, registry());

        assert!(resolver.resolve().await.is_denied());
        assert_eq!(resolver.platform().calls(), 0);
    }

    #[tokio::test]
    async fn test_permission_query_failure_is_ignored() {
        let mut platform = FakePlatform::at(34.0, -84.0);
        platform.permission = Err("permissions API exploded".to_string());
        let resolver = LocationResolver::new(platform, registry());

        let status = resolver.resolve().await;
        assert!(status.is_on_property());
        assert_eq!(resolver.platform().calls(), 1);
    }

    #[tokio::test]
    async fn test_successful_fix_matches_property() {
        let resolver = LocationResolver::new(FakePlatform::at(34.0, -84.0), registry());

        match resolver.resolve().await {
            LocationStatus::Located { coords, nearest } => {
                assert_eq!(coords.lat, 34.0);
                assert_eq!(coords.accuracy_meters, Some(10.0));
                let nearest = nearest.unwrap();
                assert_eq!(nearest.code, "HP");
                assert!(nearest.distance_meters < 1e-6);
                assert!(nearest.within_radius);
            }
            other => panic!("unexpected status {:?}", other),
        }

        let opts = resolver.platform().last_options.lock().unwrap().unwrap();
        assert!(opts.enable_high_accuracy);
        assert_eq!(opts.maximum_age, Duration::ZERO);
    }

    #[tokio::test]
    async fn test_empty_registry_yields_no_match() {
        let resolver = LocationResolver::new(
            FakePlatform::at(34.0, -84.0),
            Arc::new(PropertyRegistry::new(100.0, Vec::new())),
        );
        match resolver.resolve().await {
            LocationStatus::Located { nearest, .. } => assert!(nearest.is_none()),
            other => panic!("unexpected status {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_codes_map_to_statuses() {
        let cases = [
            (1, LocationStatus::denied(REASON_DENIED)),
            (2, LocationStatus::unavailable(REASON_UNAVAILABLE)),
            (3, LocationStatus::error(REASON_TIMEOUT)),
        ];
        for (code, expected) in cases {
            let platform = FakePlatform::failing(PositionError::new(
                PositionErrorCode::from_code(code),
                "platform says no",
            ));
            let resolver = LocationResolver::new(platform, registry());
            assert_eq!(resolver.resolve().await, expected, "code {}", code);
        }
    }

    #[tokio::test]
    async fn test_unclassified_error_keeps_message() {
        let platform =
            FakePlatform::failing(PositionError::new(PositionErrorCode::Unknown, "GPS chip on fire"));
        let resolver = LocationResolver::new(platform, registry());
        assert_eq!(resolver.resolve().await, LocationStatus::error("GPS chip on fire"));

        let platform = FakePlatform::failing(PositionError::new(PositionErrorCode::Unknown, ""));
        let resolver = LocationResolver::new(platform, registry());
        assert_eq!(resolver.resolve().await, LocationStatus::error(REASON_UNKNOWN));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_platform_times_out() {
        let platform = FakePlatform::at(34.0, -84.0);
        platform.set_delay(Duration::from_secs(600));
        let resolver = LocationResolver::new(platform, registry()).with_options(PositionOptions {
            timeout: Duration::from_secs(5),
            ..PositionOptions::default()
        });

        assert_eq!(resolver.resolve().await, LocationStatus::error(REASON_TIMEOUT));
    }
}
