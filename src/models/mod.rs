pub mod checklist;
pub mod photo;
pub mod report;

pub use checklist::{
    checklist_for, Checklist, ChecklistItem, ChecklistPart, ChecklistProgress, CrisisCategory,
    LinkItem, LinkMeta, CATEGORIES,
};
pub use photo::{CompressedPhoto, FilePayload, PickedPhoto};
pub use report::{FormSubmission, LeadershipAlert, SubmitResponse};
