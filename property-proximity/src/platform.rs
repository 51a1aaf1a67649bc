//! Seams to the host platform's location services.
//!
//! The resolver never talks to a sensor directly; it drives an implementation
//! of [`GeolocationPlatform`]. Mobile shells bridge this to the OS location
//! API, tests use a scripted fake.

use std::future::Future;
use std::time::Duration;

/// Options for a single-shot position query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    pub timeout: Duration,
    /// Maximum age of a cached platform fix; zero means always a fresh fix
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout: Duration::from_secs(15),
            maximum_age: Duration::ZERO,
        }
    }
}

/// Raw position as reported by the platform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,
}

/// Coarse permission state reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    Prompt,
    Denied,
    /// The platform has no permission query
    Unknown,
}

/// Standard geolocation error classes (1, 2, 3 on the web platform)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionErrorCode {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Unknown,
}

impl PositionErrorCode {
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => PositionErrorCode::PermissionDenied,
            2 => PositionErrorCode::PositionUnavailable,
            3 => PositionErrorCode::Timeout,
            _ => PositionErrorCode::Unknown,
        }
    }
}

/// Failure of a position query
#[derive(Debug, Clone, PartialEq)]
pub struct PositionError {
    pub code: PositionErrorCode,
    pub message: String,
}

impl PositionError {
    pub fn new(code: PositionErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for PositionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for PositionError {}

/// Host location capability
pub trait GeolocationPlatform: Send + Sync {
    /// Whether the host has any location capability at all
    fn is_supported(&self) -> bool;

    /// Best-effort permission lookup. Platforms without a permission API keep
    /// the default, which reports [`PermissionState::Unknown`].
    fn query_permission(&self) -> impl Future<Output = Result<PermissionState, String>> + Send {
        async { Ok(PermissionState::Unknown) }
    }

    /// Request one position fix
    fn current_position(
        &self,
        options: PositionOptions,
    ) -> impl Future<Output = Result<Position, PositionError>> + Send;
}
