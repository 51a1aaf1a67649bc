//! # Property Proximity
//!
//! Live "which property am I at?" status for field apps.
//!
//! This crate provides:
//! - Haversine distance between coordinates
//! - A read-only registry of managed properties with matching radii
//! - A location resolver that turns one platform position query into a
//!   [`LocationStatus`]
//! - A refresher that caches the status on-device and keeps it current while
//!   the app is in the foreground
//!
//! ## Platform Separation
//!
//! Sensor access, permission prompts and persistence are injected through the
//! [`GeolocationPlatform`] and [`KeyValueStore`] traits, so everything here
//! runs unchanged in tests with in-memory fakes.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use property_proximity::{LocationResolver, ProximityRefresher, PropertyRegistry, RefresherConfig};
//!
//! let registry = Arc::new(PropertyRegistry::load(Path::new("data/property_locations.json"))?);
//! let resolver = LocationResolver::new(platform, registry);
//! let refresher = ProximityRefresher::new(resolver, store, RefresherConfig::default());
//!
//! tokio::spawn({
//!     let refresher = refresher.clone();
//!     async move { refresher.run(visibility_rx).await }
//! });
//! ```

pub mod geo;
pub mod models;
pub mod platform;
pub mod refresher;
pub mod registry;
pub mod resolver;
pub mod store;

pub use geo::{distance_meters, Coordinate, EARTH_RADIUS_M};
pub use models::{Fix, LocationStatus, NearestMatch};
pub use platform::{
    GeolocationPlatform, PermissionState, Position, PositionError, PositionErrorCode,
    PositionOptions,
};
pub use refresher::{ProximityRefresher, RefresherConfig, STATUS_KEY, STATUS_TIME_KEY};
pub use registry::{PropertyLocation, PropertyRegistry, RegistryError};
pub use resolver::LocationResolver;
pub use store::{load_json, save_json, KeyValueStore, MemoryStore, StoreError};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const M_PER_DEG_LAT: f64 = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;

    struct FixedPlatform(Result<Position, PositionError>);

    impl GeolocationPlatform for FixedPlatform {
        fn is_supported(&self) -> bool {
            true
        }

        async fn current_position(
            &self,
            _options: PositionOptions,
        ) -> Result<Position, PositionError> {
            self.0.clone()
        }
    }

    fn one_property() -> Arc<PropertyRegistry> {
        let json = r#"{
            "defaultRadiusMeters": 100,
            "properties": [{ "code": "P1", "name": "Sterling Place", "lat": 34.0, "lon": -84.0, "radiusMeters": 150 }]
        }"#;
        Arc::new(PropertyRegistry::from_json(json).unwrap())
    }

    fn at(lat: f64, lon: f64) -> FixedPlatform {
        FixedPlatform(Ok(Position {
            latitude: lat,
            longitude: lon,
            accuracy: None,
        }))
    }

    #[tokio::test]
    async fn test_on_property_end_to_end() {
        let resolver = LocationResolver::new(at(34.0, -84.0), one_property());
        let refresher = ProximityRefresher::new(resolver, MemoryStore::new(), RefresherConfig::default());

        let status = refresher.refresh().await;
        let nearest = status.nearest().unwrap();
        assert!(nearest.distance_meters.abs() < 1e-6);
        assert!(nearest.within_radius);
    }

    #[tokio::test]
    async fn test_500m_off_property_end_to_end() {
        let resolver = LocationResolver::new(at(34.0 + 500.0 / M_PER_DEG_LAT, -84.0), one_property());
        let status = resolver.resolve().await;
        let nearest = status.nearest().unwrap();
        assert!(!nearest.within_radius);
        assert!((nearest.distance_meters - 500.0).abs() <= 25.0);
    }

    #[tokio::test]
    async fn test_permission_denied_end_to_end() {
        let platform = FixedPlatform(Err(PositionError::new(
            PositionErrorCode::from_code(1),
            "User denied Geolocation",
        )));
        let status = LocationResolver::new(platform, one_property()).resolve().await;
        assert_eq!(status.state(), "denied");
    }
}
