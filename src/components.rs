//! Dioxus UI components for the proximity header, checklist progress and
//! photo attachments

use crate::models::{ChecklistProgress, CompressedPhoto};
use crate::services::{format_kb, proximity_text, size_note};
use dioxus::prelude::*;
use property_proximity::LocationStatus;

/// Header badge showing which property the device is at.
/// No retry button while permission is denied.
#[component]
pub fn ProximityBadge(status: LocationStatus, on_retry: EventHandler<()>) -> Element {
    let text = proximity_text(&status);
    let color = match &status {
        LocationStatus::Located { .. } if status.is_on_property() => "#1b7f3b",
        LocationStatus::Located { .. } | LocationStatus::Idle => "#555",
        _ => "#b3261e",
    };
    let title = status.reason().unwrap_or_default().to_string();

    rsx! {
        div {
            style: "display: flex; align-items: center; gap: 8px; font-size: 14px;",
            span { style: "color: {color};", title: "{title}", "📍 {text}" }
            if !status.is_denied() {
                button {
                    style: "border: none; background: none; color: #0b57d0; cursor: pointer;",
                    onclick: move |_| on_retry.call(()),
                    "Refresh"
                }
            }
        }
    }
}

/// Size line and best-effort caveat for one compressed attachment
#[component]
pub fn PhotoSizeNote(photo: CompressedPhoto, max_kb: usize) -> Element {
    let sizes = format!(
        "Original: {} • Compressed: {}",
        format_kb(photo.original_bytes),
        format_kb(photo.compressed_bytes)
    );
    let note = size_note(&photo, max_kb);

    rsx! {
        div {
            div { style: "font-size: 12px; color: #555;", "{sizes}" }
            if let Some(note) = note {
                div { style: "font-size: 12px; color: #b3261e; margin-top: 4px;", "{note}" }
            }
        }
    }
}

/// "3/10 complete • 7 remaining" with a bar
#[component]
pub fn ChecklistProgressBar(progress: ChecklistProgress) -> Element {
    let pct = progress.percent();
    let remaining = match progress.remaining() {
        0 => String::new(),
        n => format!(" • {} remaining", n),
    };
    let summary = format!("{}/{} complete{}", progress.done(), progress.total(), remaining);

    rsx! {
        div {
            div {
                style: "display: flex; justify-content: space-between; font-size: 12px; color: #555;",
                span { "{summary}" }
                span { "{pct}%" }
            }
            div {
                style: "height: 6px; background: #eee; border-radius: 3px; margin-top: 4px;",
                div { style: "height: 6px; width: {pct}%; background: #1b7f3b; border-radius: 3px;" }
            }
        }
    }
}
