//! # Crisis Checklist
//!
//! Device-side core of a crisis-response checklist app for property staff.
//!
//! This crate wires the reusable libraries into the app:
//! - [`property_proximity`] for "which property am I at?", cached in the
//!   on-device SQLite database and refreshed while the app is visible
//! - [`photo_compress`] for shrinking photo attachments to a byte budget
//! - Incident reports posted as JSON to leadership and form webhooks
//! - Per-device checklist progress and form drafts, with resets
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use crisis_checklist::{config::AppConfig, logging, services};
//!
//! logging::init_logging(log::LevelFilter::Info);
//! let config = AppConfig::load(Path::new("crisis-checklist.toml"))?;
//!
//! let registry = services::init_registry(&config.properties_path)?;
//! let store = Arc::new(services::SqliteStore::open(&config.database_path)?);
//! let refresher = services::build_refresher(&config, platform, registry, Arc::clone(&store));
//! let proximity = services::ProximityService::start(refresher, true);
//!
//! let checklists = services::ChecklistService::new(store);
//! if checklists.toggle("fire", 0)?.prompt_leadership {
//!     // show the leadership alert
//! }
//!
//! // later, on app pause / resume
//! proximity.set_visible(false);
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;

#[cfg(feature = "components")]
pub mod components;

pub use config::AppConfig;
pub use error::AppError;

pub use photo_compress;
pub use property_proximity;
