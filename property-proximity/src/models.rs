use crate::geo::Coordinate;
use serde::{Deserialize, Serialize};

/// A single resolved position with optional accuracy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fix {
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy_meters: Option<f64>,
}

impl Fix {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

/// The closest registered property to a fix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearestMatch {
    pub code: String,
    pub name: String,
    pub distance_meters: f64,
    pub radius_meters: f64,
    pub within_radius: bool,
}

/// Outcome of one location resolution.
///
/// Serialized as `{"state": "...", ...}` so a cached value written by an
/// earlier session reads back losslessly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum LocationStatus {
    /// No resolution attempted yet
    #[default]
    Idle,
    /// The platform cannot provide a position
    Unavailable { reason: String },
    /// Location permission refused
    Denied { reason: String },
    /// Timeout or unclassified platform failure
    Error { reason: String },
    /// Successful fix
    #[serde(rename = "ok")]
    Located {
        coords: Fix,
        nearest: Option<NearestMatch>,
    },
}

impl LocationStatus {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        LocationStatus::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn denied(reason: impl Into<String>) -> Self {
        LocationStatus::Denied {
            reason: reason.into(),
        }
    }

    pub fn error(reason: impl Into<String>) -> Self {
        LocationStatus::Error {
            reason: reason.into(),
        }
    }

    /// Wire name of the active variant
    pub fn state(&self) -> &'static str {
        match self {
            LocationStatus::Idle => "idle",
            LocationStatus::Unavailable { .. } => "unavailable",
            LocationStatus::Denied { .. } => "denied",
            LocationStatus::Error { .. } => "error",
            LocationStatus::Located { .. } => "ok",
        }
    }

    /// Human-readable failure reason, if this is a failure variant
    pub fn reason(&self) -> Option<&str> {
        match self {
            LocationStatus::Unavailable { reason }
            | LocationStatus::Denied { reason }
            | LocationStatus::Error { reason } => Some(reason),
            LocationStatus::Idle | LocationStatus::Located { .. } => None,
        }
    }

    pub fn nearest(&self) -> Option<&NearestMatch> {
        match self {
            LocationStatus::Located { nearest, .. } => nearest.as_ref(),
            _ => None,
        }
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, LocationStatus::Denied { .. })
    }

    /// True when the fix lies inside the radius of its nearest property
    pub fn is_on_property(&self) -> bool {
        self.nearest().map(|n| n.within_radius).unwrap_or(false)
    }
}
