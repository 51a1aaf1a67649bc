use crate::geo::{distance_meters, Coordinate};
use crate::models::NearestMatch;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Error type for loading the property registry
#[derive(Debug)]
pub enum RegistryError {
    IoError(std::io::Error),
    ParseError(serde_json::Error),
    Invalid(String),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::IoError(e) => write!(f, "Failed to read property configuration: {}", e),
            RegistryError::ParseError(e) => write!(f, "Malformed property configuration: {}", e),
            RegistryError::Invalid(msg) => write!(f, "Invalid property configuration: {}", msg),
        }
    }
}

impl std::error::Error for RegistryError {}

impl From<std::io::Error> for RegistryError {
    fn from(err: std::io::Error) -> Self {
        RegistryError::IoError(err)
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        RegistryError::ParseError(err)
    }
}

/// A managed property with its matching radius override
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyLocation {
    pub code: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_meters: Option<f64>,
}

impl PropertyLocation {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

/// Read-only, ordered list of properties.
///
/// The document shape is
/// `{ "defaultRadiusMeters": 150, "properties": [{ "code", "name", "lat", "lon", "radiusMeters"? }] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRegistry {
    default_radius_meters: f64,
    properties: Vec<PropertyLocation>,
}

impl PropertyRegistry {
    /// Builds a registry without validation. Configuration files go through
    /// [`PropertyRegistry::from_json`] instead.
    pub fn new(default_radius_meters: f64, properties: Vec<PropertyLocation>) -> Self {
        Self {
            default_radius_meters,
            properties,
        }
    }

    /// Parse and validate a registry document
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let registry: PropertyRegistry = serde_json::from_str(json)?;
        registry.validate()?;
        Ok(registry)
    }

    /// Load the registry from a JSON file, failing on absent or malformed data
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let raw = std::fs::read_to_string(path)?;
        let registry = Self::from_json(&raw)?;
        log::info!(
            "Loaded {} properties from {:?} (default radius {} m)",
            registry.properties.len(),
            path,
            registry.default_radius_meters
        );
        Ok(registry)
    }

    fn validate(&self) -> Result<(), RegistryError> {
        if !(self.default_radius_meters.is_finite() && self.default_radius_meters > 0.0) {
            return Err(RegistryError::Invalid(format!(
                "defaultRadiusMeters must be positive, got {}",
                self.default_radius_meters
            )));
        }
        if self.properties.is_empty() {
            return Err(RegistryError::Invalid("no properties configured".to_string()));
        }

        let mut seen = HashSet::new();
        for prop in &self.properties {
            if prop.code.trim().is_empty() {
                return Err(RegistryError::Invalid(format!(
                    "property '{}' has an empty code",
                    prop.name
                )));
            }
            if !seen.insert(prop.code.as_str()) {
                return Err(RegistryError::Invalid(format!(
                    "duplicate property code '{}'",
                    prop.code
                )));
            }
            if !(prop.lat.is_finite() && (-90.0..=90.0).contains(&prop.lat))
                || !(prop.lon.is_finite() && (-180.0..=180.0).contains(&prop.lon))
            {
                return Err(RegistryError::Invalid(format!(
                    "property '{}' has out-of-range coordinates ({}, {})",
                    prop.code, prop.lat, prop.lon
                )));
            }
            if let Some(r) = prop.radius_meters {
                if !(r.is_finite() && r > 0.0) {
                    return Err(RegistryError::Invalid(format!(
                        "property '{}' has non-positive radius {}",
                        prop.code, r
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn default_radius_meters(&self) -> f64 {
        self.default_radius_meters
    }

    pub fn properties(&self) -> &[PropertyLocation] {
        &self.properties
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn get(&self, code: &str) -> Option<&PropertyLocation> {
        self.properties.iter().find(|p| p.code == code)
    }

    /// Effective matching radius for a property
    pub fn radius_for(&self, prop: &PropertyLocation) -> f64 {
        prop.radius_meters.unwrap_or(self.default_radius_meters)
    }

    /// Linear scan for the closest property. On exact distance ties the
    /// earlier entry wins. Returns `None` for an empty registry.
    pub fn match_nearest(&self, here: Coordinate) -> Option<NearestMatch> {
        let mut best: Option<(&PropertyLocation, f64)> = None;

        for prop in &self.properties {
            let distance = distance_meters(here, prop.coordinate());
            let closer = match best {
                None => true,
                Some((_, best_distance)) => distance < best_distance,
            };
            if closer {
                best = Some((prop, distance));
            }
        }

        best.map(|(prop, distance_meters)| {
            let radius_meters = self.radius_for(prop);
            NearestMatch {
                code: prop.code.clone(),
                name: prop.name.clone(),
                distance_meters,
                radius_meters,
                within_radius: distance_meters <= radius_meters,
            }
        })
    }
}
