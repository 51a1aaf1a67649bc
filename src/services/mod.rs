pub mod checklist_service;
pub mod kv_store;
pub mod photo_service;
pub mod proximity_service;
pub mod report_service;

pub use checklist_service::{ChecklistService, ToggleOutcome};
pub use kv_store::SqliteStore;
pub use photo_service::{compress_photo, compress_photos, data_url_to_base64, format_kb, size_note};
pub use proximity_service::{
    build_refresher, format_distance_us, init_registry, proximity_text, ProximityService,
};
pub use report_service::ReportService;
